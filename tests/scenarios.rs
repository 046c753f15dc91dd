use stencil_filter::kernel::KernelTable;
use stencil_filter::stencil::GradientMode;
use stencil_filter::{apply_filter, FilterConfig, FilterKind, RgbImage};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn uniform_image_is_a_fixed_point_of_both_rules() {
    init_logging();
    let image = RgbImage::filled(4, 4, [128, 128, 128]).unwrap();
    let kinds = [
        FilterKind::Gaussian,
        FilterKind::Diffusion {
            gradient: GradientMode::Forward,
        },
        FilterKind::Diffusion {
            gradient: GradientMode::Centered,
        },
    ];
    for kind in kinds {
        for kernel_size in [1usize, 3, 4, 9] {
            for iterations in [1usize, 2, 7] {
                let config = FilterConfig::default()
                    .with_kernel_size(kernel_size)
                    .with_sigma(2.0)
                    .with_iterations(iterations)
                    .with_threads(3);
                let run = apply_filter(&image, kind, config).unwrap();
                assert_eq!(
                    run.image, image,
                    "kind={kind:?} kernel={kernel_size} iterations={iterations}"
                );
            }
        }
    }
}

#[test]
fn bright_corner_spreads_into_neighbors() {
    init_logging();
    let mut image = RgbImage::filled(2, 2, [0, 0, 0]).unwrap();
    image.put_pixel(0, 0, [255, 0, 0]);
    let config = FilterConfig::default()
        .with_kernel_size(3)
        .with_sigma(1.0)
        .with_iterations(1)
        .with_threads(2);
    let out = apply_filter(&image, FilterKind::Gaussian, config).unwrap().image;

    assert!(out.pixel(0, 0)[0] < 255);
    assert!(out.pixel(1, 0)[0] > 0);
    assert!(out.pixel(0, 1)[0] > 0);
    assert!(out.pixel(1, 1)[0] > 0);
    // green and blue stay empty
    for y in 0..2 {
        for x in 0..2 {
            assert_eq!(out.pixel(x, y)[1..], [0, 0]);
        }
    }
}

#[test]
fn gaussian_corner_matches_hand_computed_replicate_convolution() {
    init_logging();
    let mut image = RgbImage::filled(5, 5, [0, 0, 0]).unwrap();
    for y in 0..5 {
        for x in 0..5 {
            let v = (x * 40 + y * 10) as u8;
            image.put_pixel(x, y, [v, 200 - v / 2, 90]);
        }
    }
    let config = FilterConfig::default()
        .with_kernel_size(3)
        .with_sigma(1.0)
        .with_threads(2);
    let out = apply_filter(&image, FilterKind::Gaussian, config).unwrap().image;

    // edge replication at (0, 0): the clamped window reads rows/cols [0, 0, 1]
    let table = KernelTable::build(3, 1.0).unwrap();
    let clamped = [0usize, 0, 1];
    let mut expected = [0.0f64; 2];
    for (ky, &sy) in clamped.iter().enumerate() {
        for (kx, &sx) in clamped.iter().enumerate() {
            let w = f64::from(table.row(ky)[kx]);
            let px = image.pixel(sx, sy);
            expected[0] += w * f64::from(px[0]);
            expected[1] += w * f64::from(px[1]);
        }
    }
    let got = out.pixel(0, 0);
    assert_eq!(f64::from(got[0]), expected[0].round(), "red");
    assert_eq!(f64::from(got[1]), expected[1].round(), "green");
    assert_eq!(got[2], 90);
}

#[test]
fn diffusion_keeps_edges_sharper_than_gaussian() {
    init_logging();
    let mut image = RgbImage::filled(16, 8, [20, 20, 20]).unwrap();
    for y in 0..8 {
        for x in 8..16 {
            image.put_pixel(x, y, [230, 230, 230]);
        }
    }
    let config = FilterConfig::default()
        .with_kernel_size(3)
        .with_sigma(1.0)
        .with_edge_constant(20.0)
        .with_iterations(5)
        .with_threads(4);
    let diffused = apply_filter(
        &image,
        FilterKind::Diffusion {
            gradient: GradientMode::Forward,
        },
        config,
    )
    .unwrap()
    .image;
    let blurred = apply_filter(&image, FilterKind::Gaussian, config).unwrap().image;

    let contrast =
        |img: &RgbImage| i32::from(img.pixel(8, 4)[0]) - i32::from(img.pixel(7, 4)[0]);
    assert_eq!(contrast(&diffused), 210);
    assert!(contrast(&blurred) < 210);
}
