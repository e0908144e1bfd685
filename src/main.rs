//! miniwin - headless runner
//!
//! Spawns a window layout, replays a message script through `update` and
//! prints the resulting document outline.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use miniwin::cli::{CliArgs, StartupConfig};
use miniwin::config::ToolkitConfig;
use miniwin::dom::dump;
use miniwin::update::update;
use miniwin::window::WindowConfig;
use miniwin::{Msg, Workspace};

fn main() -> Result<()> {
    miniwin::tracing::init();

    let startup = CliArgs::parse().into_config().map_err(|e| anyhow!(e))?;
    let config = load_config(&startup)?;
    let mut ws = Workspace::open(config);

    if let Some(path) = &startup.layout_path {
        for window in load_layout(path)? {
            let window_type = window.window_type.clone();
            ws.spawn(window)
                .with_context(|| format!("failed to spawn `{}` window", window_type))?;
        }
    }
    ws.layout();

    if let Some(path) = &startup.script_path {
        for msg in load_script(path)? {
            if let Some(cmd) = update(&mut ws, msg) {
                tracing::trace!(?cmd, "command");
            }
        }
    }

    let body = ws.doc().body();
    print!("{}", dump(ws.doc(), body));
    Ok(())
}

fn load_config(startup: &StartupConfig) -> Result<ToolkitConfig> {
    let mut config = match &startup.config_path {
        Some(path) => ToolkitConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ToolkitConfig::load(),
    };
    let (width, height) = startup.viewport;
    if let Some(width) = width {
        config.layout.viewport_width = width;
    }
    if let Some(height) = height {
        config.layout.viewport_height = height;
    }
    Ok(config)
}

fn load_layout(path: &Path) -> Result<Vec<WindowConfig>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("invalid layout {}", path.display()))
}

fn load_script(path: &Path) -> Result<Vec<Msg>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid script {}", path.display()))
}
