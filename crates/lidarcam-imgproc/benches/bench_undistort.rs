use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use lidarcam_image::Image;
use lidarcam_imgproc::{
    calibration::{distortion::PolynomialDistortion, CameraIntrinsic},
    interpolation::InterpolationMode,
    undistort::{undistort_image, CorrectionMap},
};

fn bench_undistort(c: &mut Criterion) {
    let mut group = c.benchmark_group("Undistort");

    let distortion = PolynomialDistortion::from_coefficients(&[-0.28, 0.07, 0.0002, 0.00002, 0.0]);

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image_size = [*width, *height].into();
        let image = Image::<u8, 3>::new(image_size, vec![0u8; width * height * 3]).unwrap();

        let intrinsic = CameraIntrinsic {
            fx: *width as f64,
            fy: *width as f64,
            cx: *width as f64 / 2.0,
            cy: *height as f64 / 2.0,
        };

        group.bench_with_input(
            BenchmarkId::new("undistort_image", &parameter_string),
            &image,
            |b, i| {
                b.iter(|| {
                    undistort_image(
                        black_box(i),
                        black_box(&intrinsic),
                        black_box(&distortion),
                        InterpolationMode::Bilinear,
                    )
                })
            },
        );

        let map = CorrectionMap::new(&intrinsic, &intrinsic, &distortion, image_size).unwrap();

        group.bench_with_input(
            BenchmarkId::new("correction_map_apply", &parameter_string),
            &image,
            |b, i| b.iter(|| map.apply(black_box(i), InterpolationMode::Bilinear)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_undistort);
criterion_main!(benches);
