use serde::{Deserialize, Serialize};

use timebox_common::Granularity;

use crate::dispatcher::Key;

/// Space between the widget border and the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 30.0,
            left: 30.0,
        }
    }
}

/// Chart geometry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Initial width in pixels.
    #[serde(default = "default_width")]
    pub width: f32,

    /// Initial height in pixels.
    #[serde(default = "default_height")]
    pub height: f32,

    /// Plot margins.
    #[serde(default)]
    pub margin: Margin,

    /// Period size used to snap dragged time ranges.
    #[serde(default)]
    pub granularity: Granularity,
}

fn default_width() -> f32 {
    800.0
}

fn default_height() -> f32 {
    600.0
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin: Margin::default(),
            granularity: Granularity::default(),
        }
    }
}

/// Pointer and keyboard interaction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Width of the resize band around each committed timebox, in pixels.
    #[serde(default = "default_handle_size")]
    pub handle_size: f32,

    /// Keys that delete the selected timebox.
    #[serde(default = "default_delete_keys")]
    pub delete_keys: Vec<Key>,

    /// Maximum vertical distance for hover hits, in pixels.
    #[serde(default = "default_hover_distance")]
    pub hover_distance: f32,
}

fn default_handle_size() -> f32 {
    6.0
}

fn default_delete_keys() -> Vec<Key> {
    vec![Key::Delete, Key::Backspace]
}

fn default_hover_distance() -> f32 {
    12.0
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            handle_size: default_handle_size(),
            delete_keys: default_delete_keys(),
            hover_distance: default_hover_distance(),
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub interaction: InteractionConfig,
}
