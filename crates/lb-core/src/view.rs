//! Screen ↔ canvas transform.
//!
//! `screen = canvas * zoom + pan`. Pan is a screen-space offset applied
//! after scaling, so panning speed does not depend on zoom.

use crate::config::CanvasConfig;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Which way a wheel notch (or shortcut) zooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Map a wheel delta to a direction: scrolling up (negative delta) zooms in.
    pub fn from_wheel_delta(delta_y: f32) -> Self {
        if delta_y < 0.0 { Self::In } else { Self::Out }
    }
}

/// Current pan/zoom of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub zoom: f32,
    pub pan: Point,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::ORIGIN,
        }
    }
}

impl ViewTransform {
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        (screen - self.pan) / self.zoom
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        canvas * self.zoom + self.pan
    }

    /// Convert a screen-space delta into a canvas-space delta.
    pub fn screen_delta_to_canvas(&self, delta: Point) -> Point {
        delta / self.zoom
    }

    /// Zoom one step toward (or away from) `pointer`, keeping the canvas
    /// point under `pointer` fixed. The new zoom is clamped to the config
    /// range. Returns `true` if the zoom level changed.
    pub fn zoom_at(&mut self, pointer: Point, direction: ZoomDirection, config: &CanvasConfig) -> bool {
        let factor = match direction {
            ZoomDirection::In => config.zoom_step,
            ZoomDirection::Out => 1.0 / config.zoom_step,
        };
        self.zoom_to(pointer, self.zoom * factor, config)
    }

    /// Set zoom to `target` (clamped) around `pointer`.
    pub fn zoom_to(&mut self, pointer: Point, target: f32, config: &CanvasConfig) -> bool {
        let old = self.zoom;
        let new = config.clamp_zoom(target);
        if new == old {
            return false;
        }
        self.pan = pointer - (pointer - self.pan) * (new / old);
        self.zoom = new;
        log::trace!("zoom {old:.3} -> {new:.3}, pan ({:.1}, {:.1})", self.pan.x, self.pan.y);
        true
    }

    /// Shift the view by a screen-space delta.
    pub fn pan_by(&mut self, delta: Point) {
        self.pan += delta;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The transform as an affine map from canvas to screen space.
    pub fn affine(&self) -> kurbo::Affine {
        let z = f64::from(self.zoom);
        kurbo::Affine::new([z, 0.0, 0.0, z, f64::from(self.pan.x), f64::from(self.pan.y)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: Point, b: Point, tol: f32) -> bool {
        (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol
    }

    #[test]
    fn zoom_in_keeps_cursor_point() {
        let config = CanvasConfig::default();
        let mut view = ViewTransform::default();
        let cursor = Point::new(100.0, 100.0);

        assert!(view.zoom_at(cursor, ZoomDirection::In, &config));
        assert!((view.zoom - 1.1).abs() < 1e-6);
        assert!(close(view.screen_to_canvas(cursor), cursor, 1e-4));
        assert!(close(view.pan, Point::new(-10.0, -10.0), 1e-4));
    }

    #[test]
    fn zoom_out_divides_by_step() {
        let config = CanvasConfig::default();
        let mut view = ViewTransform::default();
        view.zoom_at(Point::ORIGIN, ZoomDirection::Out, &config);
        assert!((view.zoom - 1.0 / 1.1).abs() < 1e-6);
    }

    #[test]
    fn zoom_at_bound_is_noop() {
        let config = CanvasConfig::default();
        let mut view = ViewTransform {
            zoom: 3.0,
            pan: Point::new(12.0, -4.0),
        };
        assert!(!view.zoom_at(Point::new(50.0, 50.0), ZoomDirection::In, &config));
        assert_eq!(view.zoom, 3.0);
        assert_eq!(view.pan, Point::new(12.0, -4.0));
    }

    #[test]
    fn clamped_step_still_keeps_cursor_point() {
        let config = CanvasConfig::default();
        let mut view = ViewTransform {
            zoom: 2.9,
            pan: Point::new(30.0, 40.0),
        };
        let cursor = Point::new(200.0, 150.0);
        let before = view.screen_to_canvas(cursor);
        view.zoom_at(cursor, ZoomDirection::In, &config);
        assert_eq!(view.zoom, 3.0);
        assert!(close(view.screen_to_canvas(cursor), before, 1e-3));
    }

    #[test]
    fn screen_canvas_roundtrip() {
        let view = ViewTransform {
            zoom: 2.0,
            pan: Point::new(50.0, -20.0),
        };
        let canvas = Point::new(10.0, 10.0);
        let screen = view.canvas_to_screen(canvas);
        assert_eq!(screen, Point::new(70.0, 0.0));
        assert_eq!(view.screen_to_canvas(screen), canvas);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut view = ViewTransform {
            zoom: 0.5,
            pan: Point::new(3.0, 4.0),
        };
        view.reset();
        let once = view;
        view.reset();
        assert_eq!(view, once);
        assert_eq!(view, ViewTransform::default());
    }

    #[test]
    fn affine_matches_canvas_to_screen() {
        let view = ViewTransform {
            zoom: 1.5,
            pan: Point::new(7.0, 9.0),
        };
        let mapped = view.affine() * kurbo::Point::new(10.0, 20.0);
        let expected = view.canvas_to_screen(Point::new(10.0, 20.0));
        assert!((mapped.x as f32 - expected.x).abs() < 1e-4);
        assert!((mapped.y as f32 - expected.y).abs() < 1e-4);
    }

    fn direction() -> impl Strategy<Value = ZoomDirection> {
        prop_oneof![Just(ZoomDirection::In), Just(ZoomDirection::Out)]
    }

    proptest! {
        #[test]
        fn zoom_stays_in_bounds(steps in prop::collection::vec(direction(), 0..80)) {
            let config = CanvasConfig::default();
            let mut view = ViewTransform::default();
            for dir in steps {
                view.zoom_at(Point::new(400.0, 300.0), dir, &config);
                prop_assert!(view.zoom >= 0.25 && view.zoom <= 3.0);
            }
        }

        #[test]
        fn cursor_point_is_fixed(
            px in -2000.0f32..2000.0,
            py in -2000.0f32..2000.0,
            panx in -1000.0f32..1000.0,
            pany in -1000.0f32..1000.0,
            zoom in 0.25f32..3.0,
            dir in direction(),
        ) {
            let config = CanvasConfig::default();
            let mut view = ViewTransform { zoom, pan: Point::new(panx, pany) };
            let cursor = Point::new(px, py);
            let before = view.screen_to_canvas(cursor);
            view.zoom_at(cursor, dir, &config);
            let after = view.screen_to_canvas(cursor);
            let tol = 1e-3 * (1.0 + before.x.abs().max(before.y.abs()));
            prop_assert!(close(before, after, tol), "{before:?} != {after:?}");
        }
    }
}
