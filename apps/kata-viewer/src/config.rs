use anyhow::{Context, Result};
use kata_common::RenderParameters;
use kata_render::{ReadbackSize, RenderConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Viewer settings, loaded from an optional JSON file and then overridden by
/// command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// GUI window size in physical pixels.
    pub width: u32,
    pub height: u32,
    pub single_window: bool,
    pub readback: ReadbackSize,
    /// Initial values for the parameter panel.
    pub parameters: RenderParameters,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            single_window: false,
            readback: ReadbackSize::default(),
            parameters: RenderParameters::default(),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub single_window: bool,
    pub readback: Option<ReadbackSize>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid viewer config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// `--single-window` can only switch the mode on.
    pub fn apply(&mut self, overrides: Overrides) {
        self.single_window |= overrides.single_window;
        if let Some(readback) = overrides.readback {
            self.readback = readback;
        }
        if let Some(width) = overrides.width {
            self.width = width;
        }
        if let Some(height) = overrides.height {
            self.height = height;
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            single_window: self.single_window,
            readback: self.readback,
        }
    }
}
