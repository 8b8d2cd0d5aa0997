//! voicegate - offline voice enrollment and verification.
//!
//! Reads raw PCM16 signed little-endian audio files, keeps enrolled
//! reference embeddings in a JSON snapshot, and prints the
//! verification decision. A rejected or faulted verification exits
//! non-zero so scripts can gate an action on the result.

mod index;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use voicegate_audio::{PreprocessConfig, Preprocessor, RawAudioSample};
use voicegate_vecstore::EmbeddingIndex;
use voicegate_verify::{Verifier, VerifyConfig};
use voicegate_voiceprint::FbankEmbedder;

use crate::index::FileIndex;

/// Offline voice enrollment and verification.
#[derive(Parser, Debug)]
#[command(name = "voicegate")]
#[command(about = "Offline voice enrollment and verification")]
struct Args {
    /// Path to the enrollment snapshot
    #[arg(long, default_value = "voicegate-state.json")]
    state: PathBuf,

    /// Cosine similarity threshold for acceptance
    #[arg(long, default_value_t = 0.75)]
    threshold: f32,

    /// Target waveform duration in milliseconds
    #[arg(long, default_value_t = 1000)]
    duration_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store a reference voice for a user
    Enroll {
        /// Unique user identifier
        user_id: String,
        /// Raw PCM16LE audio file
        file: PathBuf,
        /// Sample rate of the file in Hz
        #[arg(long, default_value_t = 16000)]
        rate: u32,
        /// Channel count of the file
        #[arg(long, default_value_t = 1)]
        channels: u16,
    },
    /// Verify a voice sample against a user's reference
    Verify {
        /// Claimed user identifier
        user_id: String,
        /// Raw PCM16LE audio file
        file: PathBuf,
        /// Sample rate of the file in Hz
        #[arg(long, default_value_t = 16000)]
        rate: u32,
        /// Channel count of the file
        #[arg(long, default_value_t = 1)]
        channels: u16,
    },
    /// List enrolled users
    List,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    let index = Arc::new(FileIndex::open(&args.state)?);
    let verifier = Verifier::new(
        Preprocessor::new(PreprocessConfig {
            target_duration: Duration::from_millis(args.duration_ms),
            ..PreprocessConfig::default()
        }),
        Arc::new(FbankEmbedder::default()),
        index.clone(),
        VerifyConfig {
            threshold: args.threshold,
            ..VerifyConfig::default()
        },
    );

    match args.command {
        Command::Enroll {
            user_id,
            file,
            rate,
            channels,
        } => {
            let raw = read_pcm(&file, rate, channels)?;
            verifier
                .enroll_with_file(&user_id, &raw, &file.display().to_string())
                .with_context(|| format!("enroll {user_id}"))?;
            println!("enrolled {user_id} ({:.2}s of audio)", raw.duration().as_secs_f64());
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify {
            user_id,
            file,
            rate,
            channels,
        } => {
            let raw = read_pcm(&file, rate, channels)?;
            let outcome = verifier
                .verify(&user_id, &raw)
                .with_context(|| format!("verify {user_id}"))?;
            if outcome.verified {
                println!(
                    "verified {user_id} (score {:.4})",
                    outcome.score.unwrap_or_default()
                );
                Ok(ExitCode::SUCCESS)
            } else {
                let reason = outcome
                    .reason
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "unknown".into());
                match outcome.score {
                    Some(score) => println!("rejected {user_id}: {reason} (score {score:.4})"),
                    None => println!("rejected {user_id}: {reason}"),
                }
                Ok(ExitCode::from(1))
            }
        }
        Command::List => {
            println!("{} enrolled user(s)", index.len());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_pcm(path: &PathBuf, rate: u32, channels: u16) -> Result<RawAudioSample> {
    let pcm = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(RawAudioSample::new(pcm, rate, channels))
}
