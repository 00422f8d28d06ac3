//! Explorer tuning.

use std::time::Duration;

use thiserror::Error;

use crate::surface::HoverConfig;

/// Query limits, animation timing, layout spacing and interaction behavior.
/// The defaults mirror the movie-database demo this engine grew out of:
/// a small bounded neighborhood, a one-second morph at roughly 60 frames
/// per second, and direction-following hover highlights.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Cap on nodes fetched by the initial scan.
    pub node_limit: usize,
    /// Cap on edges fetched between the scanned nodes.
    pub edge_limit: usize,
    /// Wall-clock length of one layout morph.
    pub morph_duration: Duration,
    /// Spacing between animation frames.
    pub frame_interval: Duration,
    /// Distance between layout rings.
    pub layer_spacing: f32,
    /// Follow edge direction when computing hover reachability.
    pub directed_reachability: bool,
    pub hover: HoverConfig,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            node_limit: 25,
            edge_limit: 100,
            morph_duration: Duration::from_secs(1),
            frame_interval: Duration::from_millis(16),
            layer_spacing: 100.0,
            directed_reachability: true,
            hover: HoverConfig::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be at least 1")]
    ZeroLimit(&'static str),
    #[error("{0} must be a positive duration")]
    ZeroDuration(&'static str),
    #[error("frame_interval must not exceed morph_duration")]
    FrameIntervalTooLong,
    #[error("layer_spacing must be finite and positive")]
    BadLayerSpacing,
}

impl ExplorerConfig {
    /// Reject configurations that cannot drive the engine: zero limits,
    /// zero durations, a frame longer than the whole morph, or a spacing
    /// that would put every ring in the same place.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_limit == 0 {
            return Err(ConfigError::ZeroLimit("node_limit"));
        }
        if self.edge_limit == 0 {
            return Err(ConfigError::ZeroLimit("edge_limit"));
        }
        if self.morph_duration.is_zero() {
            return Err(ConfigError::ZeroDuration("morph_duration"));
        }
        if self.frame_interval.is_zero() {
            return Err(ConfigError::ZeroDuration("frame_interval"));
        }
        if self.frame_interval > self.morph_duration {
            return Err(ConfigError::FrameIntervalTooLong);
        }
        if !self.layer_spacing.is_finite() || self.layer_spacing <= 0.0 {
            return Err(ConfigError::BadLayerSpacing);
        }
        Ok(())
    }
}
