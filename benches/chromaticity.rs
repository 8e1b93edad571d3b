use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use uvsn_rs::image_pipeline::{
    BlackLevel, ChromaticityEngine, PixelBuffer, PixelSamples, export_archive,
    ExposureRecord, ImageResult, LampCondition, compute_chromaticity,
};

fn generate_mock_buffer(width: usize, height: usize) -> PixelBuffer {
    let samples: Vec<u16> = (0..width * height * 3)
        .map(|i| (512 + i.wrapping_mul(2654435761) % 15000) as u16)
        .collect();
    PixelBuffer::new(width, height, PixelSamples::U16(samples), 14)
        .expect("mock buffer dimensions")
        .with_black_level(BlackLevel::Scalar(512.0))
}

fn benchmark_chromaticity_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("chromaticity_by_size");

    let sizes = vec![
        (100, 100, "100x100"),
        (500, 500, "500x500"),
        (1000, 1000, "1000x1000"),
    ];

    for (width, height, label) in sizes {
        let buffer = generate_mock_buffer(width, height);

        group.bench_with_input(BenchmarkId::from_parameter(label), &buffer, |b, buffer| {
            b.iter(|| compute_chromaticity(black_box(buffer), true));
        });
    }

    group.finish();
}

fn benchmark_map_and_histogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_and_histogram");
    let buffer = generate_mock_buffer(500, 500);
    let engine = ChromaticityEngine::default();

    group.bench_function("map", |b| {
        b.iter(|| engine.map(black_box(&buffer), true));
    });

    let map = engine.map(&buffer, true).expect("mock buffer has valid pixels");
    for bins in [32, 100, 256] {
        group.bench_with_input(BenchmarkId::new("histogram", bins), &bins, |b, &bins| {
            b.iter(|| map.histogram(black_box(bins)));
        });
    }

    group.finish();
}

fn benchmark_archive_export(c: &mut Criterion) {
    let buffer = generate_mock_buffer(64, 64);
    let stats = compute_chromaticity(&buffer, true).expect("mock buffer has valid pixels");
    let results: Vec<ImageResult> = (0..200)
        .map(|i| ImageResult {
            image_name: format!("IMG_{:04}.dng", i % 150),
            lamp_condition: LampCondition::Nm254,
            chromaticity: stats,
            exposure: ExposureRecord::from_exposure(Some(100.0), Some(2.8), Some(1.0 / 125.0)),
        })
        .collect();

    c.bench_function("archive_export_200", |b| {
        b.iter(|| export_archive(black_box(&results)));
    });
}

criterion_group!(
    benches,
    benchmark_chromaticity_sizes,
    benchmark_map_and_histogram,
    benchmark_archive_export
);
criterion_main!(benches);
