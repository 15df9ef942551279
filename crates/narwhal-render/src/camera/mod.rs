//! Pan/zoom camera over the graph canvas.
//!
//! Three coordinate spaces are involved:
//! - device space: top-left of the rendering surface, one unit per device pixel (pointer
//!   events arrive here),
//! - view space: top-left of the canvas element, i.e. device space minus the element's
//!   on-screen offset,
//! - world space: where graph geometry lives.
//!
//! The camera state is `view = world * zoom + pan`. Animations are per-channel tweens advanced
//! by [`Camera::tick`], which the host calls from its display-refresh callback.

pub mod animation;
pub mod host;
pub mod options;

use crate::error::{Error, Result};
use animation::{Animations, Channel, Tween};
use host::{
    Clock, FrameHandle, FrameScheduler, PolledScheduler, ResizeSource, Subscription,
    SystemClock, ViewportElement,
};
use narwhal_core::Node;
use narwhal_core::geom::{DeviceSpace, Point, Rect, Size, Vector, ViewSpace, point, vector};
use std::rc::Rc;
use std::time::Duration;

pub use options::CameraOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanListenerId(u64);

type PanListener = Box<dyn FnMut(Point<ViewSpace>)>;

#[derive(Default)]
pub struct CameraBuilder {
    viewport: Option<Rc<dyn ViewportElement>>,
    clock: Option<Rc<dyn Clock>>,
    scheduler: Option<Rc<dyn FrameScheduler>>,
    resize_source: Option<Rc<dyn ResizeSource>>,
    options: CameraOptions,
}

impl CameraBuilder {
    pub fn viewport(mut self, viewport: Rc<dyn ViewportElement>) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn scheduler(mut self, scheduler: Rc<dyn FrameScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn resize_source(mut self, source: Rc<dyn ResizeSource>) -> Self {
        self.resize_source = Some(source);
        self
    }

    pub fn options(mut self, options: CameraOptions) -> Self {
        self.options = options;
        self
    }

    /// Fails without a viewport, and when auto-resize is on but no resize source was given.
    pub fn build(self) -> Result<Camera> {
        let viewport = self.viewport.ok_or(Error::MissingViewport)?;
        self.options.validate()?;

        let resize_subscription = if self.options.auto_resize {
            let source = self
                .resize_source
                .as_ref()
                .ok_or(Error::MissingResizeSource)?;
            Some(source.subscribe())
        } else {
            None
        };

        Ok(Camera {
            viewport,
            clock: self.clock.unwrap_or_else(|| Rc::new(SystemClock::default())),
            scheduler: self
                .scheduler
                .unwrap_or_else(|| Rc::new(PolledScheduler::default())),
            resize_source: self.resize_source,
            resize_subscription,
            options: self.options,
            pan: Point::origin(),
            zoom: 1.0,
            content: None,
            animations: Animations::default(),
            frame: None,
            resize_deadline_ms: None,
            pan_listeners: Vec::new(),
            next_listener: 0,
            destroyed: false,
        })
    }
}

pub struct Camera {
    viewport: Rc<dyn ViewportElement>,
    clock: Rc<dyn Clock>,
    scheduler: Rc<dyn FrameScheduler>,
    resize_source: Option<Rc<dyn ResizeSource>>,
    resize_subscription: Option<Subscription>,
    options: CameraOptions,

    pan: Point<ViewSpace>,
    zoom: f64,
    /// World-space bounds of everything drawn, used by `reset`.
    content: Option<Rect>,

    animations: Animations,
    frame: Option<FrameHandle>,
    resize_deadline_ms: Option<f64>,

    pan_listeners: Vec<(PanListenerId, PanListener)>,
    next_listener: u64,
    destroyed: bool,
}

impl std::fmt::Debug for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("pan", &self.pan)
            .field("zoom", &self.zoom)
            .field("content", &self.content)
            .field("animations", &self.animations)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Camera {
    pub fn builder() -> CameraBuilder {
        CameraBuilder::default()
    }

    pub fn options(&self) -> &CameraOptions {
        &self.options
    }

    pub fn pan(&self) -> Point<ViewSpace> {
        self.pan
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn content_bounds(&self) -> Option<Rect> {
        self.content
    }

    /// Updates the world-space bounds `reset` fits to. Does not move the camera.
    pub fn set_content_bounds(&mut self, bounds: Option<Rect>) {
        self.content = bounds;
    }

    pub fn is_animating(&self, channel: Channel) -> bool {
        self.animations.is_active(channel)
    }

    pub fn viewport_size(&self) -> Size<ViewSpace> {
        let r = self.viewport.bounding_rect();
        Size::new(r.width().max(0.0), r.height().max(0.0))
    }

    fn view_center(&self) -> Point<ViewSpace> {
        let s = self.viewport_size();
        point(s.width / 2.0, s.height / 2.0)
    }

    // ----- coordinate conversion -------------------------------------------------------

    pub fn device_to_view(&self, p: Point<DeviceSpace>) -> Point<ViewSpace> {
        let origin = self.viewport.bounding_rect().min;
        point(p.x - origin.x, p.y - origin.y)
    }

    pub fn view_to_device(&self, p: Point<ViewSpace>) -> Point<DeviceSpace> {
        let origin = self.viewport.bounding_rect().min;
        point(p.x + origin.x, p.y + origin.y)
    }

    pub fn view_to_world(&self, p: Point<ViewSpace>) -> Point {
        point((p.x - self.pan.x) / self.zoom, (p.y - self.pan.y) / self.zoom)
    }

    pub fn world_to_view(&self, p: Point) -> Point<ViewSpace> {
        point(p.x * self.zoom + self.pan.x, p.y * self.zoom + self.pan.y)
    }

    /// Converts a pointer position into graph coordinates.
    pub fn dom_to_world_space(&self, p: Point<DeviceSpace>) -> Point {
        self.view_to_world(self.device_to_view(p))
    }

    pub fn world_to_dom(&self, p: Point) -> Point<DeviceSpace> {
        self.view_to_device(self.world_to_view(p))
    }

    /// The part of world space currently on screen.
    pub fn visible_world_rect(&self) -> Rect {
        let s = self.viewport_size();
        Rect::new(
            self.view_to_world(point(0.0, 0.0)),
            self.view_to_world(point(s.width, s.height)),
        )
    }

    // ----- instantaneous moves ---------------------------------------------------------

    fn apply_pan(&mut self, pan: Point<ViewSpace>) {
        if pan == self.pan {
            return;
        }
        self.pan = pan;
        for (_, listener) in &mut self.pan_listeners {
            listener(pan);
        }
    }

    fn apply_zoom_at(&mut self, zoom: f64, anchor: Point<ViewSpace>) {
        let zoom = self.options.clamp_zoom(zoom);
        let world = self.view_to_world(anchor);
        self.zoom = zoom;
        self.apply_pan(point(anchor.x - world.x * zoom, anchor.y - world.y * zoom));
    }

    /// Moves the camera so the world origin lands on `pan` in view space.
    pub fn pan_to(&mut self, pan: Point<ViewSpace>) {
        self.apply_pan(pan);
    }

    pub fn pan_by(&mut self, delta: Vector<ViewSpace>) {
        self.apply_pan(self.pan + delta);
    }

    /// Zooms around the viewport center.
    pub fn zoom_to(&mut self, level: f64) {
        self.apply_zoom_at(level, self.view_center());
    }

    /// Zooms keeping the world point under `anchor` in place (wheel zoom at the cursor).
    pub fn zoom_at(&mut self, level: f64, anchor: Point<DeviceSpace>) {
        let anchor = self.device_to_view(anchor);
        self.apply_zoom_at(level, anchor);
    }

    // ----- fit -------------------------------------------------------------------------

    /// Pan and zoom that center the content without ever zooming in past 1.0.
    ///
    /// Content smaller than the viewport keeps its natural scale; larger content is shrunk
    /// to fit, minus `fit_padding`. Without content the world origin is centered.
    pub fn fit_target(&self) -> (Point<ViewSpace>, f64) {
        let center = self.view_center();
        let Some(bounds) = self.content else {
            return (center, self.options.clamp_zoom(1.0));
        };

        let view = self.viewport_size();
        let fit = (view.width / bounds.width()).min(view.height / bounds.height());
        let zoom = if fit.is_nan() || fit > 1.0 {
            1.0
        } else {
            fit * (1.0 - self.options.fit_padding)
        };
        let zoom = self.options.clamp_zoom(zoom);

        let c = bounds.center();
        let pan = point(center.x - c.x * zoom, center.y - c.y * zoom);
        tracing::debug!(fit, zoom, pan_x = pan.x, pan_y = pan.y, "camera fit");
        (pan, zoom)
    }

    /// Centers and fits the content immediately.
    pub fn reset(&mut self) {
        self.cancel_all_animations();
        let (pan, zoom) = self.fit_target();
        self.zoom = zoom;
        self.apply_pan(pan);
    }

    /// Animates towards the `reset` target.
    pub fn smooth_reset(&mut self, duration: Option<Duration>) {
        let (pan, zoom) = self.fit_target();
        self.smooth_pan_and_zoom(pan, zoom, duration);
    }

    // ----- animations ------------------------------------------------------------------

    fn duration_ms(&self, duration: Option<Duration>) -> f64 {
        duration.unwrap_or(self.options.animation).as_secs_f64() * 1000.0
    }

    fn begin(&mut self, channel: Channel) -> f64 {
        for &c in channel.conflicts() {
            if self.animations.cancel(c) {
                tracing::trace!(channel = ?c, "cancelled camera animation");
            }
        }
        self.ensure_frame();
        self.clock.now_ms()
    }

    pub fn smooth_pan(&mut self, target: Point<ViewSpace>, duration: Option<Duration>) {
        let start = self.begin(Channel::Pan);
        let ms = self.duration_ms(duration);
        self.animations.pan = Some(Tween::new(self.pan, target, start, ms));
    }

    pub fn smooth_zoom(&mut self, level: f64, duration: Option<Duration>) {
        let start = self.begin(Channel::Zoom);
        let ms = self.duration_ms(duration);
        let target = self.options.clamp_zoom(level);
        self.animations.zoom = Some(Tween::new(self.zoom, target, start, ms));
    }

    pub fn smooth_pan_and_zoom(
        &mut self,
        pan: Point<ViewSpace>,
        level: f64,
        duration: Option<Duration>,
    ) {
        let start = self.begin(Channel::PanZoom);
        let ms = self.duration_ms(duration);
        let target = (pan, self.options.clamp_zoom(level));
        self.animations.pan_zoom = Some(Tween::new((self.pan, self.zoom), target, start, ms));
    }

    pub fn zoom_in(&mut self) {
        let level = self.zoom * (1.0 + self.options.zoom_sensitivity);
        self.smooth_zoom(level, None);
    }

    pub fn zoom_out(&mut self) {
        let level = self.zoom / (1.0 + self.options.zoom_sensitivity);
        self.smooth_zoom(level, None);
    }

    pub fn cancel_animation(&mut self, channel: Channel) -> bool {
        self.animations.cancel(channel)
    }

    pub fn cancel_all_animations(&mut self) {
        self.animations.cancel_all();
    }

    // ----- pan into view ---------------------------------------------------------------

    /// Minimal world-space scroll that brings `rect`, grown by `padding`, fully on screen.
    ///
    /// Positive components move the visible region right/down. When the padded rect is
    /// larger than the view on an axis, its left/top edge wins.
    pub fn scroll_delta_into_view(&self, rect: Rect, padding: f64) -> Vector {
        let padded = rect.inflate(padding, padding);
        let visible = self.visible_world_rect();
        vector(
            axis_delta(padded.min.x, padded.max.x, visible.min.x, visible.max.x),
            axis_delta(padded.min.y, padded.max.y, visible.min.y, visible.max.y),
        )
    }

    /// Smooth-pans just enough to show `rect` with `padding` around it (the configured
    /// default when `None`). Returns `false` when it was already visible.
    pub fn pan_into_view(&mut self, rect: Rect, padding: Option<f64>) -> bool {
        let padding = padding.unwrap_or(self.options.pan_into_view_padding);
        let delta = self.scroll_delta_into_view(rect, padding);
        if delta.x == 0.0 && delta.y == 0.0 {
            return false;
        }
        let target = point(
            self.pan.x - delta.x * self.zoom,
            self.pan.y - delta.y * self.zoom,
        );
        self.smooth_pan(target, None);
        true
    }

    pub fn pan_node_into_view(&mut self, node: &Node, padding: Option<f64>) -> Result<bool> {
        let bounds = node
            .bounds()
            .ok_or_else(|| narwhal_core::Error::MissingPosition {
                node_id: node.id.clone(),
            })?;
        Ok(self.pan_into_view(bounds, padding))
    }

    // ----- frame loop ------------------------------------------------------------------

    fn ensure_frame(&mut self) {
        if self.frame.is_none() && !self.destroyed {
            self.frame = Some(self.scheduler.request_frame());
        }
    }

    /// Advances animations and the resize debounce. Call once per display refresh after a
    /// frame was requested; requests the next frame while work remains.
    pub fn tick(&mut self) {
        self.frame = None;
        if self.destroyed {
            return;
        }
        let now = self.clock.now_ms();

        if let Some(tween) = self.animations.pan_zoom {
            let ((pan, zoom), done) = tween.sample(now);
            self.zoom = zoom;
            self.apply_pan(pan);
            if done {
                self.animations.pan_zoom = None;
                tracing::trace!("pan+zoom animation finished");
            }
        }
        if let Some(tween) = self.animations.zoom {
            let (zoom, done) = tween.sample(now);
            self.apply_zoom_at(zoom, self.view_center());
            if done {
                self.animations.zoom = None;
                tracing::trace!("zoom animation finished");
            }
        }
        if let Some(tween) = self.animations.pan {
            let (pan, done) = tween.sample(now);
            self.apply_pan(pan);
            if done {
                self.animations.pan = None;
                tracing::trace!("pan animation finished");
            }
        }

        if let Some(deadline) = self.resize_deadline_ms {
            if now >= deadline {
                self.resize_deadline_ms = None;
                tracing::debug!("viewport resize settled; resetting camera");
                self.reset();
            }
        }

        if self.animations.any_active() || self.resize_deadline_ms.is_some() {
            self.ensure_frame();
        }
    }

    /// Host callback for a viewport resize notification. Bursts are coalesced: the camera
    /// resets once no notification arrived for `resize_debounce`.
    pub fn notify_resize(&mut self) {
        if self.resize_subscription.is_none() {
            return;
        }
        let quiet_ms = self.options.resize_debounce.as_secs_f64() * 1000.0;
        self.resize_deadline_ms = Some(self.clock.now_ms() + quiet_ms);
        self.ensure_frame();
    }

    pub fn resize_pending(&self) -> bool {
        self.resize_deadline_ms.is_some()
    }

    // ----- pan notifications -----------------------------------------------------------

    /// Registers a callback fired with the new pan whenever it changes, animation frames
    /// included.
    pub fn on_pan(&mut self, listener: impl FnMut(Point<ViewSpace>) + 'static) -> PanListenerId {
        self.next_listener += 1;
        let id = PanListenerId(self.next_listener);
        self.pan_listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_pan_listener(&mut self, id: PanListenerId) -> bool {
        let before = self.pan_listeners.len();
        self.pan_listeners.retain(|(lid, _)| *lid != id);
        before != self.pan_listeners.len()
    }

    // ----- teardown --------------------------------------------------------------------

    fn teardown(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.animations.cancel_all();
        self.resize_deadline_ms = None;
        if let Some(frame) = self.frame.take() {
            self.scheduler.cancel_frame(frame);
        }
        if let (Some(source), Some(sub)) =
            (self.resize_source.as_ref(), self.resize_subscription.take())
        {
            source.unsubscribe(sub);
        }
        self.pan_listeners.clear();
        tracing::debug!("camera destroyed");
    }

    /// Cancels animations and the pending frame, and unsubscribes from resize
    /// notifications. Dropping the camera does the same.
    pub fn destroy(mut self) {
        self.teardown();
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn axis_delta(lo: f64, hi: f64, visible_lo: f64, visible_hi: f64) -> f64 {
    if lo < visible_lo {
        lo - visible_lo
    } else if hi > visible_hi {
        hi - visible_hi
    } else {
        0.0
    }
}
