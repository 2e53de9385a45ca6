use crate::types::{
    Config, EdgeConfig, EstimatorConfig, HoughConfig, IoConfig, LoggingConfig, MaskConfig,
    OverlayConfig, RoiConfig,
};
use anyhow::Result;
use std::fs;

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            white_lower: 130,
            white_upper: 255,
            yellow_lower: [20, 100, 110],
            yellow_upper: [30, 180, 240],
            gray_lower: 80,
            gray_upper: 130,
            night_mean_ch0: 30.0,
            night_mean_ch1: 33.0,
            night_mean_ch2: 30.0,
        }
    }
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            bottom_frac: 0.6,
            top_frac: 0.3,
            top_left_frac: 0.45,
            top_right_frac: 0.55,
        }
    }
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            low_threshold: 50.0,
            high_threshold: 150.0,
        }
    }
}

impl Default for HoughConfig {
    fn default() -> Self {
        Self {
            rho_resolution: 1.0,
            theta_resolution: std::f64::consts::PI / 180.0,
            vote_threshold: 15,
            min_line_length: 10.0,
            max_line_gap: 20,
        }
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            slope_threshold: 0.5,
            legacy_ratio_slope: false,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            lower_frac: 0.5,
            upper_frac: 0.4,
            fill_color: [0, 255, 0],
            alpha: 0.8,
            beta: 1.0,
            gamma: 0.0,
        }
    }
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            input_dir: "input".to_string(),
            output_dir: "output".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
