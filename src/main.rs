use log::info;
use std::env;
use std::path::Path;
use std::time::Instant;
use stencil_filter::config::tool::load_config;
use stencil_filter::diagnostics::{elapsed_ms, FilterReport};
use stencil_filter::image::io::{
    load_grayscale_image, load_rgb_image, save_rgb_image, write_json_file,
};
use stencil_filter::image::ImageView;
use stencil_filter::quality::ssim;
use stencil_filter::ParallelFilterEngine;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let engine = ParallelFilterEngine::new(config.params.resolve()).map_err(|e| e.to_string())?;
    let filter = engine.filter_for(config.filter).map_err(|e| e.to_string())?;
    let image = load_rgb_image(&config.input)?;

    info!(
        "beginning {} filter: window={} iterations={} threads={}",
        config.filter.label(),
        filter.window(),
        engine.config().iterations,
        engine.config().threads
    );
    let start = Instant::now();
    let run = engine
        .run_detailed(&image, &filter)
        .map_err(|e| e.to_string())?;
    info!("finished, time taken: {:.2} s", elapsed_ms(start) / 1000.0);

    save_rgb_image(&run.image, &config.output.image)?;

    let ssim_score = match &config.reference {
        Some(path) => {
            let reference = load_grayscale_image(path)?;
            let score = ssim(&reference, &run.image.to_gray())?;
            println!("SSIM vs {}: {score:.4}", path.display());
            Some(score)
        }
        None => None,
    };

    if let Some(report_path) = &config.output.report_json {
        let report = FilterReport {
            width: run.image.width(),
            height: run.image.height(),
            filter: config.filter,
            config: *engine.config(),
            bands: run.bands,
            degenerate_pixels: run.degenerate_pixels,
            ssim: ssim_score,
            timing: run.timing,
        };
        write_json_file(report_path, &report)?;
        println!("Saved run report to {}", report_path.display());
    }

    println!("Saved filtered image to {}", config.output.image.display());
    Ok(())
}

fn usage() -> String {
    "Usage: stencil_filter <config.json>".to_string()
}
