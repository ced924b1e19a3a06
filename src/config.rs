//! Engine configuration and the process-wide resources the engine reads.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::style::compute::{pt_to_px, StyleDefaults};

// ---------------------------------------------------------------------------
// Font metrics
// ---------------------------------------------------------------------------

/// Vertical metrics of a font at one size, in px.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FontMetrics {
    pub ascent: f32,
    pub descent: f32,
    /// Distance of the strikethrough line above the baseline.
    pub strikethrough_position: f32,
    pub strikethrough_thickness: f32,
}

/// Where font metrics come from. Text shaping lives outside the engine; it
/// only needs enough to place baselines.
pub trait FontMetricsSource: Send + Sync + fmt::Debug {
    fn metrics(&self, family: &str, size_px: f32) -> FontMetrics;
}

/// Proportional metrics for hosts without a font backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleFontMetrics;

impl FontMetricsSource for SimpleFontMetrics {
    fn metrics(&self, _family: &str, size_px: f32) -> FontMetrics {
        let size = size_px.max(0.0);
        FontMetrics {
            ascent: size * 0.8,
            descent: size * 0.2,
            strikethrough_position: size * 0.3,
            strikethrough_thickness: (size / 14.0).max(1.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Icon theme
// ---------------------------------------------------------------------------

/// Name of the icon every theme must provide.
pub const MISSING_ICON: &str = "image-missing";

/// Lookup of named icons.
pub trait IconTheme: Send + Sync + fmt::Debug {
    fn has_icon(&self, name: &str) -> bool;
}

/// A fixed set of icon names.
#[derive(Debug, Clone)]
pub struct BuiltinIconTheme {
    names: HashSet<String>,
}

impl BuiltinIconTheme {
    const DEFAULT_ICONS: [&'static str; 8] = [
        MISSING_ICON,
        "object-select-symbolic",
        "list-remove-symbolic",
        "pan-down-symbolic",
        "pan-up-symbolic",
        "pan-start-symbolic",
        "pan-end-symbolic",
        "window-close-symbolic",
    ];

    /// A theme with exactly `names`, plus the missing-image icon.
    pub fn with_icons<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: HashSet<String> = names.into_iter().map(Into::into).collect();
        names.insert(MISSING_ICON.to_string());
        Self { names }
    }
}

impl Default for BuiltinIconTheme {
    fn default() -> Self {
        Self::with_icons(Self::DEFAULT_ICONS)
    }
}

impl IconTheme for BuiltinIconTheme {
    fn has_icon(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`StyleEngine`](crate::engine::StyleEngine).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Target frames per second of the frame clock.
    pub fps: u32,
    /// Initial value of `font-family`.
    pub default_font_family: String,
    /// Initial value of `font-size`, in px.
    pub default_font_size: f32,
    /// Install the builtin theme provider.
    pub builtin_theme: bool,
    /// Application stylesheet, installed at application priority.
    pub css: Option<String>,
    /// Share child styles through the per-parent cache.
    pub parent_cache: bool,
    pub font_metrics: Arc<dyn FontMetricsSource>,
    pub icon_theme: Arc<dyn IconTheme>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            default_font_family: "sans-serif".to_string(),
            default_font_size: pt_to_px(10.0),
            builtin_theme: true,
            css: None,
            parent_cache: true,
            font_metrics: Arc::new(SimpleFontMetrics),
            icon_theme: Arc::new(BuiltinIconTheme::default()),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_default_font(mut self, family: impl Into<String>, size_px: f32) -> Self {
        self.default_font_family = family.into();
        self.default_font_size = size_px;
        self
    }

    pub fn with_builtin_theme(mut self, enabled: bool) -> Self {
        self.builtin_theme = enabled;
        self
    }

    pub fn with_css(mut self, css: impl Into<String>) -> Self {
        self.css = Some(css.into());
        self
    }

    pub fn with_parent_cache(mut self, enabled: bool) -> Self {
        self.parent_cache = enabled;
        self
    }

    pub fn with_font_metrics(mut self, source: Arc<dyn FontMetricsSource>) -> Self {
        self.font_metrics = source;
        self
    }

    pub fn with_icon_theme(mut self, theme: Arc<dyn IconTheme>) -> Self {
        self.icon_theme = theme;
        self
    }

    /// Frame interval in microseconds.
    pub fn frame_interval_us(&self) -> i64 {
        1_000_000 / i64::from(self.fps.max(1))
    }

    pub(crate) fn style_defaults(&self) -> StyleDefaults {
        let size = if self.default_font_size.is_finite() && self.default_font_size >= 0.0 {
            self.default_font_size
        } else {
            log::debug!("default font size {} clamped", self.default_font_size);
            StyleDefaults::default().font_size
        };
        StyleDefaults {
            font_family: Arc::from(self.default_font_family.as_str()),
            font_size: size,
        }
    }
}
