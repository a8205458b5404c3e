//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod models;
pub mod password;
pub mod scan;

use std::path::Path;

use snscan_core::{LabelAnalyzer, PureLabelOcr, ScanConfig};

/// Load configuration: an explicit path wins, then the default config file
/// if present, then built-in defaults.
pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<ScanConfig> {
    match config_path {
        Some(path) => Ok(ScanConfig::from_file(Path::new(path))?),
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                Ok(ScanConfig::from_file(&default_path)?)
            } else {
                Ok(ScanConfig::default())
            }
        }
    }
}

/// Resolve the model directory and build a ready-to-use analyzer.
pub(crate) fn build_analyzer(
    model_dir: Option<&Path>,
    config: &ScanConfig,
) -> anyhow::Result<LabelAnalyzer<PureLabelOcr>> {
    let model_dir = model_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| models::get_variant_dir(models::get_active_variant()));

    let det_model = model_dir.join(&config.models.detection_model);
    if !det_model.exists() {
        anyhow::bail!(
            "OCR models not found in {} - run 'snscan models download' first",
            model_dir.display()
        );
    }

    let engine = PureLabelOcr::from_dir(&model_dir, &config.models, config.ocr.clone())
        .map_err(|e| anyhow::anyhow!("failed to load OCR models: {}", e))?;

    Ok(LabelAnalyzer::new(engine, config))
}
