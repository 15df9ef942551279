//! What the camera needs from its host environment.
//!
//! The camera never talks to a window system directly. A host (a browser binding, a native
//! toolkit, a test) implements these traits and forwards the events it receives. All methods
//! take `&self`: hosts are shared between the camera and the event loop that drives it, so
//! implementations use interior mutability.

use narwhal_core::geom::{DeviceSpace, Rect};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::time::Instant;

/// Monotonic time source, in milliseconds since an arbitrary origin.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Handle of a requested display-refresh callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(pub u64);

/// Schedules "call `Camera::tick` before the next repaint" requests.
pub trait FrameScheduler {
    fn request_frame(&self) -> FrameHandle;
    fn cancel_frame(&self, handle: FrameHandle);
}

/// The element the graph is rendered into.
pub trait ViewportElement {
    /// On-screen bounds of the element in device space.
    fn bounding_rect(&self) -> Rect<DeviceSpace>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(pub u64);

/// Source of viewport resize notifications. After subscribing, the host forwards each
/// notification to `Camera::notify_resize`.
pub trait ResizeSource {
    fn subscribe(&self) -> Subscription;
    fn unsubscribe(&self, subscription: Subscription);
}

/// Wall-clock time from [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Scheduler for hosts that call `Camera::tick` every frame anyway: requests are recorded
/// but nothing is scheduled.
#[derive(Debug, Default)]
pub struct PolledScheduler {
    next: Cell<u64>,
}

impl FrameScheduler for PolledScheduler {
    fn request_frame(&self) -> FrameHandle {
        let id = self.next.get() + 1;
        self.next.set(id);
        FrameHandle(id)
    }

    fn cancel_frame(&self, _handle: FrameHandle) {}
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Scheduler that keeps pending frame requests until the driver fires them.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: Cell<u64>,
    pending: RefCell<BTreeSet<FrameHandle>>,
}

impl ManualScheduler {
    pub fn has_pending(&self) -> bool {
        !self.pending.borrow().is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Consumes every pending request, as if the display refreshed. Returns whether any was
    /// pending; the driver then calls `Camera::tick` once.
    pub fn fire(&self) -> bool {
        let mut pending = self.pending.borrow_mut();
        let fired = !pending.is_empty();
        pending.clear();
        fired
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self) -> FrameHandle {
        let handle = FrameHandle(self.next.get() + 1);
        self.next.set(handle.0);
        self.pending.borrow_mut().insert(handle);
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.pending.borrow_mut().remove(&handle);
    }
}

/// Viewport whose bounds are set by the driver.
#[derive(Debug)]
pub struct FixedViewport {
    rect: Cell<Rect<DeviceSpace>>,
}

impl FixedViewport {
    pub fn new(rect: Rect<DeviceSpace>) -> Self {
        Self {
            rect: Cell::new(rect),
        }
    }

    pub fn set_rect(&self, rect: Rect<DeviceSpace>) {
        self.rect.set(rect);
    }
}

impl ViewportElement for FixedViewport {
    fn bounding_rect(&self) -> Rect<DeviceSpace> {
        self.rect.get()
    }
}

/// Resize source that only tracks who is subscribed.
#[derive(Debug, Default)]
pub struct ManualResizeSource {
    next: Cell<u64>,
    active: RefCell<BTreeSet<u64>>,
}

impl ManualResizeSource {
    pub fn subscriber_count(&self) -> usize {
        self.active.borrow().len()
    }
}

impl ResizeSource for ManualResizeSource {
    fn subscribe(&self) -> Subscription {
        let id = self.next.get() + 1;
        self.next.set(id);
        self.active.borrow_mut().insert(id);
        Subscription(id)
    }

    fn unsubscribe(&self, subscription: Subscription) {
        self.active.borrow_mut().remove(&subscription.0);
    }
}
