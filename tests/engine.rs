mod common;

use common::synthetic_image::{checkerboard_rgb, noise_rgb};
use stencil_filter::engine::partition_rows;
use stencil_filter::image::ImageView;
use stencil_filter::stencil::GradientMode;
use stencil_filter::{apply_filter, FilterConfig, FilterError, FilterKind, ParallelFilterEngine};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const DIFFUSION: FilterKind = FilterKind::Diffusion {
    gradient: GradientMode::Forward,
};

#[test]
fn single_tap_gaussian_is_identity() {
    init_logging();
    let image = noise_rgb(23, 17, 7);
    for iterations in [1usize, 2, 3] {
        let config = FilterConfig::default()
            .with_kernel_size(1)
            .with_sigma(0.8)
            .with_iterations(iterations)
            .with_threads(4);
        let run = apply_filter(&image, FilterKind::Gaussian, config).unwrap();
        assert_eq!(run.image, image, "iterations={iterations}");
    }
}

#[test]
fn output_is_independent_of_thread_count() {
    init_logging();
    let image = noise_rgb(37, 29, 42);
    let kinds = [
        FilterKind::Gaussian,
        DIFFUSION,
        FilterKind::Diffusion {
            gradient: GradientMode::Centered,
        },
    ];
    for kind in kinds {
        for iterations in [1usize, 4] {
            let base = FilterConfig::default()
                .with_kernel_size(5)
                .with_sigma(1.3)
                .with_edge_constant(15.0)
                .with_iterations(iterations);
            let reference = apply_filter(&image, kind, base.with_threads(1)).unwrap();
            for threads in [2usize, 3, 8, 29, 40] {
                let run = apply_filter(&image, kind, base.with_threads(threads)).unwrap();
                assert_eq!(
                    run.image, reference.image,
                    "kind={kind:?} iterations={iterations} threads={threads}"
                );
            }
        }
    }
}

#[test]
fn more_threads_than_rows_still_covers_every_row() {
    init_logging();
    let image = checkerboard_rgb(12, 3, 2);
    let config = FilterConfig::default().with_kernel_size(3).with_threads(8);
    let run = apply_filter(&image, FilterKind::Gaussian, config).unwrap();
    assert_eq!(run.bands, partition_rows(3, 8));
    assert_eq!(run.bands.iter().filter(|b| b.is_empty()).count(), 7);

    let single = apply_filter(&image, FilterKind::Gaussian, config.with_threads(1)).unwrap();
    assert_eq!(run.image, single.image);
}

#[test]
fn kernel_larger_than_image_is_handled() {
    init_logging();
    let image = checkerboard_rgb(3, 2, 1);
    let config = FilterConfig::default()
        .with_kernel_size(15)
        .with_sigma(4.0)
        .with_threads(2);
    let run = apply_filter(&image, FilterKind::Gaussian, config).unwrap();
    assert_eq!(run.image.width(), 3);
    assert_eq!(run.image.height(), 2);
    assert_eq!(run.degenerate_pixels, 0);
}

#[test]
fn even_kernel_size_is_promoted() {
    let image = noise_rgb(16, 16, 3);
    let even = FilterConfig::default().with_kernel_size(4).with_threads(2);
    let odd = even.with_kernel_size(5);
    let a = apply_filter(&image, FilterKind::Gaussian, even).unwrap();
    let b = apply_filter(&image, FilterKind::Gaussian, odd).unwrap();
    assert_eq!(a.image, b.image);

    let engine = ParallelFilterEngine::new(even).unwrap();
    assert_eq!(engine.config().kernel_size, 5);
}

#[test]
fn invalid_parameters_are_rejected() {
    let image = noise_rgb(4, 4, 1);
    let cases = [
        (FilterKind::Gaussian, FilterConfig::default().with_sigma(0.0)),
        (FilterKind::Gaussian, FilterConfig::default().with_iterations(0)),
        (FilterKind::Gaussian, FilterConfig::default().with_threads(0)),
        (FilterKind::Gaussian, FilterConfig::default().with_kernel_size(0)),
        (DIFFUSION, FilterConfig::default().with_edge_constant(-2.0)),
    ];
    for (kind, config) in cases {
        let err = apply_filter(&image, kind, config).unwrap_err();
        assert!(
            matches!(err, FilterError::InvalidConfig(_)),
            "kind={kind:?} config={config:?} err={err}"
        );
    }
}

#[test]
fn repeated_passes_keep_smoothing() {
    let image = noise_rgb(24, 24, 11);
    let variance = |img: &stencil_filter::RgbImage| {
        let reds: Vec<f64> = img.as_raw().chunks_exact(3).map(|px| f64::from(px[0])).collect();
        let mean = reds.iter().sum::<f64>() / reds.len() as f64;
        reds.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / reds.len() as f64
    };
    let config = FilterConfig::default().with_kernel_size(5).with_threads(3);
    let one = apply_filter(&image, FilterKind::Gaussian, config).unwrap();
    let five = apply_filter(&image, FilterKind::Gaussian, config.with_iterations(5)).unwrap();
    assert!(variance(&one.image) < 0.5 * variance(&image));
    assert!(variance(&five.image) < variance(&one.image));
}
