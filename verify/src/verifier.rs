use std::sync::Arc;

use voicegate_audio::{Preprocessor, RawAudioSample};
use voicegate_vecstore::{EmbeddingIndex, Match, RecordMeta};
use voicegate_voiceprint::EmbeddingModel;

use crate::config::VerifyConfig;
use crate::error::VerifyError;
use crate::outcome::{MatchOutcome, RejectReason};
use crate::phase::AttemptState;

/// The verification engine.
///
/// Holds the shared, read-only pipeline pieces: one preprocessor (so
/// enrollment and verification cannot drift apart in target duration),
/// one embedding model, one embedding index. Attempts borrow these and
/// own everything else, so independent attempts may run concurrently.
pub struct Verifier {
    preprocessor: Preprocessor,
    model: Arc<dyn EmbeddingModel>,
    index: Arc<dyn EmbeddingIndex>,
    cfg: VerifyConfig,
}

impl Verifier {
    pub fn new(
        preprocessor: Preprocessor,
        model: Arc<dyn EmbeddingModel>,
        index: Arc<dyn EmbeddingIndex>,
        cfg: VerifyConfig,
    ) -> Self {
        Self {
            preprocessor,
            model,
            index,
            cfg: cfg.with_defaults(),
        }
    }

    pub fn config(&self) -> &VerifyConfig {
        &self.cfg
    }

    /// Captures `raw` as the user's reference voice.
    ///
    /// Runs preprocess -> extract -> upsert. Any stage fault aborts
    /// the attempt before a record is written; there are no partial
    /// enrollments. Re-enrolling replaces the previous reference.
    pub fn enroll(&self, user_id: &str, raw: &RawAudioSample) -> Result<(), VerifyError> {
        self.enroll_inner(user_id, raw, None)
    }

    /// Like [`Verifier::enroll`], recording the capture filename in
    /// the enrollment metadata.
    pub fn enroll_with_file(
        &self,
        user_id: &str,
        raw: &RawAudioSample,
        file_name: &str,
    ) -> Result<(), VerifyError> {
        self.enroll_inner(user_id, raw, Some(file_name))
    }

    fn enroll_inner(
        &self,
        user_id: &str,
        raw: &RawAudioSample,
        file_name: Option<&str>,
    ) -> Result<(), VerifyError> {
        let mut state = AttemptState::new();
        state.advance(); // Capturing: the sample is handed over

        state.advance(); // Preprocessing
        let waveform = self.preprocessor.preprocess(raw)?;

        state.advance(); // Extracting
        let embedding = self.model.extract(&waveform)?;

        let mut meta = RecordMeta::now(self.cfg.source_tag.clone());
        if let Some(name) = file_name {
            meta = meta.with_file(name);
        }
        self.index.upsert(user_id, embedding.as_slice(), meta)?;

        tracing::info!(user_id, dim = embedding.dim(), "enrolled reference voice");
        Ok(())
    }

    /// Evaluates whether `raw` is the voice of `claimed_user_id`.
    ///
    /// Fails with [`VerifyError`] on pipeline faults; otherwise
    /// returns the decision. A claim for a user with no reference
    /// record is rejected as [`RejectReason::NotEnrolled`] before any
    /// audio is processed or the index queried.
    pub fn verify(
        &self,
        claimed_user_id: &str,
        raw: &RawAudioSample,
    ) -> Result<MatchOutcome, VerifyError> {
        let mut state = AttemptState::new();

        // Fail closed before spending any work: an unenrolled claim
        // can never verify, and the index is not queried for it.
        if !self.index.contains(claimed_user_id)? {
            tracing::info!(claimed = claimed_user_id, "rejected: not enrolled");
            return Ok(MatchOutcome::rejected(RejectReason::NotEnrolled, None));
        }

        state.advance(); // Capturing: the sample is handed over
        state.advance(); // Preprocessing
        let waveform = self.preprocessor.preprocess(raw)?;

        state.advance(); // Extracting
        let embedding = self.model.extract(&waveform)?;

        state.advance(); // Querying
        let matches = self.index.query(embedding.as_slice(), self.cfg.top_k)?;

        state.advance(); // Decided
        let outcome = decide(claimed_user_id, &matches, self.cfg.threshold);
        match (&outcome.reason, outcome.score) {
            (None, Some(score)) => {
                tracing::info!(claimed = claimed_user_id, score, "verified")
            }
            (Some(reason), score) => {
                tracing::info!(claimed = claimed_user_id, %reason, ?score, "rejected")
            }
            _ => {}
        }
        Ok(outcome)
    }
}

/// The three-way decision rule over the ranked matches.
///
/// The top match must carry the claimed identity AND clear the score
/// threshold; either check failing alone rejects. An empty result
/// despite the earlier enrollment check (possible with an eventually
/// consistent remote index) fails closed as NotEnrolled.
fn decide(claimed_user_id: &str, matches: &[Match], threshold: f32) -> MatchOutcome {
    let Some(top) = matches.first() else {
        return MatchOutcome::rejected(RejectReason::NotEnrolled, None);
    };

    if top.user_id != claimed_user_id {
        return MatchOutcome::rejected(RejectReason::IdentityMismatch, Some(top.score));
    }
    if top.score < threshold {
        return MatchOutcome::rejected(RejectReason::LowConfidence, Some(top.score));
    }
    MatchOutcome::verified(top.score)
}
