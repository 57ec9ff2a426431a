use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use depth_cloud_rs::depth_pipeline::{
    AsciiPlyWriter, CameraIntrinsics, FrameKind, FrameNormalizer, NormalizedFrame, PixelFormat, PointCloudProjector,
    PointCloudWriter, RawFrame, SampleRange,
};

fn generate_depth_bytes(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let depth = 500.0 + ((x + y) % 4000) as f32;
            data.extend_from_slice(&depth.to_ne_bytes());
        }
    }
    data
}

fn intrinsics() -> CameraIntrinsics {
    CameraIntrinsics::new(365.456, 365.456, 254.878, 205.395)
}

fn benchmark_normalize_and_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth_to_cloud");

    let sizes = vec![(64, 53, "64x53"), (256, 212, "256x212"), (512, 424, "512x424")];

    for (width, height, label) in sizes {
        let data = generate_depth_bytes(width, height);

        group.bench_with_input(BenchmarkId::from_parameter(label), &data, |b, data| {
            let normalizer = FrameNormalizer::default();
            let projector = PointCloudProjector::new(intrinsics());

            b.iter(|| {
                let Ok(frame) = RawFrame::new(FrameKind::Depth, width, height, PixelFormat::Float32, data) else {
                    return;
                };
                let Ok(depth) = normalizer.normalize(black_box(&frame)) else {
                    return;
                };
                let _ = projector.project(&depth);
            });
        });
    }

    group.finish();
}

fn benchmark_ply_encoding(c: &mut Criterion) {
    let (width, height) = (512, 424);
    let samples = (0..width * height).map(|i| (i % 4500) as f32 / 4499.92).collect();
    let depth = NormalizedFrame::scalar(FrameKind::Depth, width, height, SampleRange::Unit, samples);
    let Ok(cloud) = PointCloudProjector::new(intrinsics()).project(&depth) else {
        return;
    };

    c.bench_function("ascii_ply_512x424", |b| {
        b.iter(|| {
            let mut output = Vec::with_capacity(cloud.len() * 32);
            let _ = AsciiPlyWriter.write_cloud(black_box(&cloud), &mut output);
        });
    });
}

criterion_group!(benches, benchmark_normalize_and_project, benchmark_ply_encoding);
criterion_main!(benches);
