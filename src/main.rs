// src/main.rs

use anyhow::Result;
use lane_detector::{Config, LaneDetector};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());
    let config_found = Path::new(&config_path).exists();
    let config = if config_found {
        Config::load(&config_path)?
    } else {
        Config::default()
    };

    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            format!("lane_detector={}", config.logging.level)
        }))
        .init();

    info!("🚗 Lane Detection Starting");
    if config_found {
        info!("✓ Configuration loaded from {}", config_path);
    } else {
        warn!("{} not found, using defaults", config_path);
    }

    let detector = LaneDetector::new(config.clone());

    let images = find_image_files(&config.io.input_dir)?;
    if images.is_empty() {
        error!("No image files found in {}", config.io.input_dir);
        return Ok(());
    }
    info!("Found {} image file(s) to process", images.len());

    std::fs::create_dir_all(&config.io.output_dir)?;

    let mut failures = 0usize;
    for (idx, path) in images.iter().enumerate() {
        info!(
            "Processing image {}/{}: {}",
            idx + 1,
            images.len(),
            path.display()
        );
        match process_image(&detector, path, &config.io.output_dir) {
            Ok(output) => info!("  ✓ saved {}", output.display()),
            Err(e) => {
                failures += 1;
                error!("  ✗ {}: {:#}", path.display(), e);
            }
        }
    }

    info!(
        "Done: {} annotated, {} failed",
        images.len() - failures,
        failures
    );
    Ok(())
}

fn find_image_files(input_dir: &str) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    let image_extensions = vec!["jpg", "jpeg", "png", "bmp", "JPG", "JPEG", "PNG", "BMP"];

    for entry in WalkDir::new(input_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if let Some(ext) = path.extension() {
            if image_extensions.contains(&ext.to_str().unwrap_or("")) {
                images.push(path.to_path_buf());
            }
        }
    }

    images.sort();
    Ok(images)
}

fn process_image(detector: &LaneDetector, path: &Path, output_dir: &str) -> Result<PathBuf> {
    let frame = image::open(path)?.to_rgb8();
    let annotated = detector.detect_lane(&frame)?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("frame");
    let output = PathBuf::from(output_dir).join(format!("{}_lane.png", stem));
    annotated.save(&output)?;
    Ok(output)
}
