//! Per-channel tween state for camera animations.
//!
//! An animation is plain data: start value, target, start time and duration. The camera
//! samples active tweens from its `tick`, and cancelling one just drops it, leaving whatever
//! value the last sample applied.

use narwhal_core::geom::{Point, ViewSpace};

/// Cubic ease-in-ease-out, `3t² - 2t³`, with `t` clamped to `[0, 1]`.
pub fn ease_in_out(t: f64) -> f64 {
    let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
    t * t * (3.0 - 2.0 * t)
}

pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Point<ViewSpace> {
    fn lerp(self, to: Self, t: f64) -> Self {
        euclid::point2(
            Lerp::lerp(self.x, to.x, t),
            Lerp::lerp(self.y, to.y, t),
        )
    }
}

impl Lerp for (Point<ViewSpace>, f64) {
    fn lerp(self, to: Self, t: f64) -> Self {
        (Lerp::lerp(self.0, to.0, t), Lerp::lerp(self.1, to.1, t))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    pub from: T,
    pub to: T,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
        }
    }

    /// Eased value at `now_ms` and whether the tween has reached its target.
    pub fn sample(&self, now_ms: f64) -> (T, bool) {
        if self.duration_ms <= 0.0 {
            return (self.to, true);
        }
        let t = (now_ms - self.start_ms) / self.duration_ms;
        if t >= 1.0 {
            return (self.to, true);
        }
        (self.from.lerp(self.to, ease_in_out(t)), false)
    }
}

/// The independent animation slots. Each holds at most one tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Pan,
    Zoom,
    PanZoom,
}

impl Channel {
    /// Channels whose running tween must be cancelled before starting one on `self`: every
    /// channel that drives the same quantity.
    pub fn conflicts(self) -> &'static [Channel] {
        match self {
            Channel::Pan => &[Channel::Pan, Channel::PanZoom],
            Channel::Zoom => &[Channel::Zoom, Channel::PanZoom],
            Channel::PanZoom => &[Channel::Pan, Channel::Zoom, Channel::PanZoom],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Animations {
    pub pan: Option<Tween<Point<ViewSpace>>>,
    pub zoom: Option<Tween<f64>>,
    pub pan_zoom: Option<Tween<(Point<ViewSpace>, f64)>>,
}

impl Animations {
    pub fn is_active(&self, channel: Channel) -> bool {
        match channel {
            Channel::Pan => self.pan.is_some(),
            Channel::Zoom => self.zoom.is_some(),
            Channel::PanZoom => self.pan_zoom.is_some(),
        }
    }

    pub fn any_active(&self) -> bool {
        self.pan.is_some() || self.zoom.is_some() || self.pan_zoom.is_some()
    }

    /// Returns whether a tween was running.
    pub fn cancel(&mut self, channel: Channel) -> bool {
        match channel {
            Channel::Pan => self.pan.take().is_some(),
            Channel::Zoom => self.zoom.take().is_some(),
            Channel::PanZoom => self.pan_zoom.take().is_some(),
        }
    }

    pub fn cancel_all(&mut self) {
        self.pan = None;
        self.zoom = None;
        self.pan_zoom = None;
    }
}
