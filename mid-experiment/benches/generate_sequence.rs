use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use mid_experiment::{
    ExperimentSettings, SeedMode, SeedProvider, SubjectData, TrialSequenceGenerator,
};

fn seeded_settings(blocks: usize, trials: usize) -> ExperimentSettings {
    let mut settings = ExperimentSettings::new(blocks, trials);
    SeedProvider::new(SeedMode::Individual)
        .setup(&mut settings, &SubjectData::new("bench"))
        .expect("bench settings are valid");
    settings
}

/// Sequence generation for session sizes from a pilot run up to a long scanner protocol.
pub fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_sequence");
    group
        .sample_size(50)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));

    let generator = TrialSequenceGenerator::new();
    for (blocks, trials) in [(2, 20), (4, 120), (10, 1200)] {
        let settings = seeded_settings(blocks, trials);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{blocks}x{}", trials / blocks)),
            &settings,
            |b, s| b.iter(|| generator.generate(black_box(s)).unwrap()),
        );
    }

    group.finish();
}

pub fn bench_subject_seed(c: &mut Criterion) {
    c.bench_function("subject_seed", |b| {
        b.iter(|| mid_experiment::subject_seed(black_box("sub-0042")))
    });
}

criterion_group!(benches, bench_generate, bench_subject_seed);
criterion_main!(benches);
