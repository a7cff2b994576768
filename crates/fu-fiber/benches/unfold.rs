use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fu_core::{Image, Raster};
use fu_fiber::{Curve, FiberExtractor, UnfoldConfig, densify, estimate_normals};

/// Sinusoidal bright fiber on a dark background, two channels.
fn build_fiber_raster(width: usize, height: usize) -> (Raster, Curve) {
    let mid = height as f32 / 2.0;
    let amp = height as f32 / 6.0;
    let center = |x: f32| mid + amp * (x / 80.0).sin();

    let mut a = vec![0u8; width * height];
    let mut b = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let d = (y as f32 - center(x as f32)).abs();
            if d < 2.0 {
                a[y * width + x] = 220;
                b[y * width + x] = 90;
            }
        }
    }
    let a = Image::from_vec(width, height, a).expect("valid image");
    let b = Image::from_vec(width, height, b).expect("valid image");
    let raster = Raster::from_u8_channels(&[a.as_view(), b.as_view()]).expect("valid raster");

    let xy: Vec<[f32; 2]> = (10..width - 10)
        .step_by(8)
        .map(|x| [x as f32, center(x as f32)])
        .collect();
    let curve = Curve::from_xy(&xy).expect("non-empty curve");
    (raster, curve)
}

fn bench_normals(c: &mut Criterion) {
    let (_, curve) = build_fiber_raster(1280, 512);
    let points = densify(&curve);

    c.bench_function("fu_fiber_normals_1280", |b| {
        b.iter(|| {
            let normals = estimate_normals(black_box(&points));
            black_box(normals.len());
        });
    });
}

fn bench_extract(c: &mut Criterion) {
    let (raster, curve) = build_fiber_raster(1280, 512);
    let curves = vec![curve; 4];
    let ext = FiberExtractor::new(UnfoldConfig::default()).expect("valid config");

    c.bench_function("fu_fiber_extract_4x1280_r4", |b| {
        b.iter(|| {
            let fibers = ext
                .extract(black_box(&raster), black_box(&curves))
                .expect("valid config");
            black_box(fibers.len());
        });
    });
}

criterion_group!(benches, bench_normals, bench_extract);
criterion_main!(benches);
