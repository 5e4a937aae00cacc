//! Canvas configuration.
//!
//! Every field has a default, so a partial JSON document such as
//! `{"max_zoom": 4.0}` is a valid config.

use serde::{Deserialize, Serialize};

/// Screen dimensions of the canvas element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// Tunables for zoom bounds, node sizing, and keyboard scoping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Lower zoom bound (inclusive).
    pub min_zoom: f32,
    /// Upper zoom bound (inclusive).
    pub max_zoom: f32,
    /// Multiplicative factor per wheel notch. Zooming out divides by it.
    pub zoom_step: f32,
    /// Smallest width a resize may produce.
    pub min_node_width: f32,
    /// Smallest height a resize may produce.
    pub min_node_height: f32,
    /// When `true`, Delete/Backspace coming from a text input does not
    /// delete the selection. Off by default, which keeps deletion global.
    pub scoped_delete: bool,
    /// Pick radius around a port, in canvas units.
    pub port_hit_radius: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.25,
            max_zoom: 3.0,
            zoom_step: 1.1,
            min_node_width: 120.0,
            min_node_height: 60.0,
            scoped_delete: false,
            port_hit_radius: 8.0,
        }
    }
}

impl CanvasConfig {
    /// Parse a config from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: CanvasConfig =
            serde_json::from_str(json).map_err(|e| format!("invalid canvas config: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs whose zoom range or step cannot work.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(format!(
                "zoom range must satisfy 0 < min_zoom <= max_zoom (got {}..{})",
                self.min_zoom, self.max_zoom
            ));
        }
        if self.zoom_step <= 1.0 {
            return Err(format!("zoom_step must exceed 1.0 (got {})", self.zoom_step));
        }
        Ok(())
    }

    /// Clamp a zoom level into the configured range. An inverted range
    /// (never produced by [`CanvasConfig::from_json`]) pins to `max_zoom`.
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_board_limits() {
        let c = CanvasConfig::default();
        assert_eq!(c.min_zoom, 0.25);
        assert_eq!(c.max_zoom, 3.0);
        assert_eq!(c.zoom_step, 1.1);
        assert!(!c.scoped_delete);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = CanvasConfig::from_json(r#"{"max_zoom": 4.0, "scoped_delete": true}"#).unwrap();
        assert_eq!(c.max_zoom, 4.0);
        assert!(c.scoped_delete);
        assert_eq!(c.min_zoom, 0.25);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = CanvasConfig::from_json(r#"{"min_zoom": 2.0, "max_zoom": 1.0}"#).unwrap_err();
        assert!(err.contains("zoom range"), "{err}");
    }

    #[test]
    fn flat_step_is_rejected() {
        assert!(CanvasConfig::from_json(r#"{"zoom_step": 1.0}"#).is_err());
    }

    #[test]
    fn clamp_zoom_respects_bounds() {
        let c = CanvasConfig::default();
        assert_eq!(c.clamp_zoom(10.0), 3.0);
        assert_eq!(c.clamp_zoom(0.01), 0.25);
        assert_eq!(c.clamp_zoom(1.5), 1.5);
    }

    #[test]
    fn clamp_zoom_with_inverted_range_pins_to_max() {
        let c = CanvasConfig {
            min_zoom: 2.0,
            max_zoom: 1.0,
            ..CanvasConfig::default()
        };
        assert_eq!(c.clamp_zoom(0.5), 1.0);
        assert_eq!(c.clamp_zoom(5.0), 1.0);
    }
}
