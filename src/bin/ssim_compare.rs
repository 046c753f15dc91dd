use std::env;
use std::path::Path;
use stencil_filter::image::io::load_grayscale_image;
use stencil_filter::quality::ssim;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1);
    let (reference, test) = match (args.next(), args.next()) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(usage()),
    };
    let reference = load_grayscale_image(Path::new(&reference))?;
    let test = load_grayscale_image(Path::new(&test))?;
    let score = ssim(&reference, &test)?;
    println!("{score:.6}");
    Ok(())
}

fn usage() -> String {
    "Usage: ssim_compare <reference-image> <test-image>".to_string()
}
