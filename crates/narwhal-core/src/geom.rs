#![forbid(unsafe_code)]

//! 2D geometry primitives shared by the path engine and the camera.
//!
//! Points and vectors are `euclid` value types tagged with the coordinate space they live in,
//! so a device-space pointer position cannot be mixed up with a world-space waypoint by
//! accident. Every operation returns a new value.

/// The boundless plane where graph geometry lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldSpace {}

/// Origin at the top-left of the canvas element; the camera maps world space onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSpace {}

/// Origin at the top-left of the rendering surface, one unit per device pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceSpace {}

pub type Point<U = WorldSpace> = euclid::Point2D<f64, U>;
pub type Vector<U = WorldSpace> = euclid::Vector2D<f64, U>;
pub type Size<U = WorldSpace> = euclid::Size2D<f64, U>;
/// Axis-aligned rectangle; `min` is the top-left corner, `max` the bottom-right one.
pub type Rect<U = WorldSpace> = euclid::Box2D<f64, U>;

pub fn point<U>(x: f64, y: f64) -> Point<U> {
    euclid::point2(x, y)
}

pub fn vector<U>(x: f64, y: f64) -> Vector<U> {
    euclid::vec2(x, y)
}

/// Builds a rectangle from its four edges.
pub fn rect<U>(left: f64, top: f64, right: f64, bottom: f64) -> Rect<U> {
    Rect::new(point(left, top), point(right, bottom))
}

/// `p + v`.
pub fn add<U>(p: Point<U>, v: Vector<U>) -> Point<U> {
    p + v
}

/// The vector pointing from `p1` to `p2`.
pub fn between<U>(p1: Point<U>, p2: Point<U>) -> Vector<U> {
    p2 - p1
}

/// Extra vector operations the path engine needs on top of `euclid`.
pub trait VectorExt: Sized {
    /// Rotates 90° counter-clockwise: `(x, y) -> (-y, x)`.
    fn perpendicular(self) -> Self;

    /// Unit vector in the same direction. The zero vector maps to itself.
    fn normalized_or_zero(self) -> Self;

    /// Rounds both components to `decimals` decimal places.
    fn rounded_to(self, decimals: u32) -> Self;

    fn inverted(self) -> Self;

    /// Component-wise product, used to project a delta onto the layout flow.
    fn component_mul(self, other: Self) -> Self;
}

impl<U> VectorExt for Vector<U> {
    fn perpendicular(self) -> Self {
        vector(-self.y, self.x)
    }

    fn normalized_or_zero(self) -> Self {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return Vector::zero();
        }
        self / len
    }

    fn rounded_to(self, decimals: u32) -> Self {
        let factor = 10f64.powi(decimals as i32);
        vector(
            (self.x * factor).round() / factor,
            (self.y * factor).round() / factor,
        )
    }

    fn inverted(self) -> Self {
        -self
    }

    fn component_mul(self, other: Self) -> Self {
        vector(self.x * other.x, self.y * other.y)
    }
}

/// Bounding box of a set of rectangles, or `None` when the iterator is empty.
///
/// Degenerate (zero-area) rectangles still count, unlike `Box2D::union`.
pub fn union_all<U>(rects: impl IntoIterator<Item = Rect<U>>) -> Option<Rect<U>> {
    rects
        .into_iter()
        .reduce(|acc, r| Rect::new(acc.min.min(r.min), acc.max.max(r.max)))
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
///
/// When `a == b` the line is undefined and the distance collapses to `0`.
pub fn distance_from_line<U>(p: Point<U>, a: Point<U>, b: Point<U>) -> f64 {
    let normal = between(a, b).normalized_or_zero().perpendicular();
    between(a, p).dot(normal).abs()
}
