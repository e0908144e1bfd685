//! Command-line argument parsing for the headless demo runner
//!
//! Supports:
//! - An alternate toolkit config file
//! - A YAML layout of windows to spawn
//! - A JSON script of messages replayed through `update`
//! - Overriding the viewport size

use clap::Parser;
use std::path::PathBuf;

/// Spawn a window layout headlessly and print the resulting tree
#[derive(Parser, Debug)]
#[command(name = "miniwin", version, about = "Headless mini-window toolkit runner")]
pub struct CliArgs {
    /// Toolkit config file (default: ~/.config/miniwin/config.yaml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// YAML list of window configs to spawn
    #[arg(long, value_name = "FILE")]
    pub layout: Option<PathBuf>,

    /// JSON list of messages to replay after spawning
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, value_name = "PX")]
    pub width: Option<f32>,

    /// Viewport height in pixels
    #[arg(long, value_name = "PX")]
    pub height: Option<f32>,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, PartialEq)]
pub struct StartupConfig {
    pub config_path: Option<PathBuf>,
    pub layout_path: Option<PathBuf>,
    pub script_path: Option<PathBuf>,
    /// Viewport override as (width, height); a missing side keeps the config value
    pub viewport: (Option<f32>, Option<f32>),
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> Result<StartupConfig, String> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(format!("--{} must be a positive number, got {}", name, value));
                }
            }
        }

        Ok(StartupConfig {
            config_path: self.config,
            layout_path: self.layout,
            script_path: self.script,
            viewport: (self.width, self.height),
        })
    }
}
