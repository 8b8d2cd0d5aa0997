use criterion::{criterion_group, criterion_main, Criterion};
use voicegate_audio::{PreprocessConfig, Preprocessor, RawAudioSample};
use voicegate_voiceprint::{EmbeddingModel, FbankEmbedder};

fn bench_extract(c: &mut Criterion) {
    let samples: Vec<f32> = (0..20000)
        .map(|i| {
            let t = i as f32 / 16000.0;
            (2.0 * std::f32::consts::PI * 220.0 * t).sin() * 0.5
        })
        .collect();
    let raw = RawAudioSample::from_f32(&samples, 16000, 1);
    let preprocessor = Preprocessor::new(PreprocessConfig::default());
    let waveform = preprocessor.preprocess(&raw).unwrap();
    let model = FbankEmbedder::default();

    c.bench_function("fbank_embedder_extract_1s", |b| {
        b.iter(|| model.extract(&waveform).unwrap())
    });

    c.bench_function("preprocess_1s", |b| {
        b.iter(|| preprocessor.preprocess(&raw).unwrap())
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
