use crate::error::{Error, Result};
use narwhal_core::config::NarwhalConfig;
use std::time::Duration;

/// Scroll-wheel zoom step on platforms whose trackpads emit many small wheel events.
pub const FINE_ZOOM_SENSITIVITY: f64 = 0.1;
pub const DEFAULT_ZOOM_SENSITIVITY: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct CameraOptions {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// `zoom_in` multiplies the zoom by `1 + zoom_sensitivity`.
    pub zoom_sensitivity: f64,
    /// Default duration of smooth pan/zoom animations.
    pub animation: Duration,
    /// Quiet period after the last resize notification before the camera resets.
    pub resize_debounce: Duration,
    /// Fraction of the fit zoom given up as margin when content is shrunk to fit.
    pub fit_padding: f64,
    /// World-space margin kept around rects panned into view.
    pub pan_into_view_padding: f64,
    /// Reset automatically when the viewport resizes. Needs a resize source.
    pub auto_resize: bool,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 2.0,
            zoom_sensitivity: platform_zoom_sensitivity(),
            animation: Duration::from_millis(250),
            resize_debounce: Duration::from_millis(200),
            fit_padding: 0.04,
            pan_into_view_padding: 60.0,
            auto_resize: false,
        }
    }
}

pub fn platform_zoom_sensitivity() -> f64 {
    if cfg!(any(target_os = "macos", target_os = "ios")) {
        FINE_ZOOM_SENSITIVITY
    } else {
        DEFAULT_ZOOM_SENSITIVITY
    }
}

fn millis(key: &str, v: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(v.max(0.0) / 1000.0).map_err(|_| Error::InvalidOptions {
        message: format!("{key} {v} ms is out of range"),
    })
}

impl CameraOptions {
    pub fn from_config(config: &NarwhalConfig) -> Result<Self> {
        let mut out = Self::default();
        if let Some(v) = config.get_f64("camera.minZoom") {
            out.min_zoom = v;
        }
        if let Some(v) = config.get_f64("camera.maxZoom") {
            out.max_zoom = v;
        }
        if let Some(v) = config.get_f64("camera.zoomSensitivity") {
            out.zoom_sensitivity = v;
        }
        if let Some(v) = config.get_f64("camera.animationMs") {
            out.animation = millis("camera.animationMs", v)?;
        }
        if let Some(v) = config.get_f64("camera.resizeDebounceMs") {
            out.resize_debounce = millis("camera.resizeDebounceMs", v)?;
        }
        if let Some(v) = config.get_f64("camera.fitPadding") {
            out.fit_padding = v;
        }
        if let Some(v) = config.get_f64("camera.panIntoViewPadding") {
            out.pan_into_view_padding = v;
        }
        if let Some(v) = config.get_bool("camera.autoResize") {
            out.auto_resize = v;
        }
        out.validate()?;
        Ok(out)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(Error::InvalidOptions {
                message: format!(
                    "zoom range [{}, {}] must be positive and ordered",
                    self.min_zoom, self.max_zoom
                ),
            });
        }
        if !(self.zoom_sensitivity > 0.0) {
            return Err(Error::InvalidOptions {
                message: format!("zoom sensitivity {} must be positive", self.zoom_sensitivity),
            });
        }
        if !(0.0..1.0).contains(&self.fit_padding) {
            return Err(Error::InvalidOptions {
                message: format!("fit padding {} must be in [0, 1)", self.fit_padding),
            });
        }
        Ok(())
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return 1.0f64.clamp(self.min_zoom, self.max_zoom);
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}
