//! Coordinate formatting for SVG path and polygon attributes.

use std::fmt::Write as _;

/// Decimal places kept for every printed coordinate.
pub(crate) const COORD_DECIMALS: i32 = 3;

/// Appends `x,y`, each rounded to [`COORD_DECIMALS`] places in shortest form, so float noise
/// such as `48.209999999999994` prints as `48.21`. Non-finite values print as `0`, and so
/// does anything that rounds to `-0`.
pub(crate) fn fmt_pair_into(out: &mut String, x: f64, y: f64) {
    push_coord(out, x);
    out.push(',');
    push_coord(out, y);
}

fn push_coord(out: &mut String, v: f64) {
    let scale = 10f64.powi(COORD_DECIMALS);
    let rounded = if v.is_finite() {
        (v * scale).round() / scale
    } else {
        0.0
    };
    // Adding +0 turns -0 into 0.
    let _ = write!(out, "{}", rounded + 0.0);
}
