//! # Drawing helpers
//!
//! Annotation colours and the few composite shapes the detector and simulator draw. Lines are
//! built on `imageproc`'s drawing functions. Everything clips against the frame bounds.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use image::Rgb;
use imageproc::{drawing::draw_line_segment_mut, point::Point};

use crate::Frame;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
pub const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Draw a line segment `thickness` pixels wide, as a bundle of one pixel segments offset
/// across a `thickness` square.
pub fn draw_thick_line(
    frame: &mut Frame,
    start: Point<i32>,
    end: Point<i32>,
    colour: Rgb<u8>,
    thickness: u32
) {
    let t = thickness.max(1) as i32;

    for ox in -(t / 2)..(t - t / 2) {
        for oy in -(t / 2)..(t - t / 2) {
            draw_line_segment_mut(
                frame,
                ((start.x + ox) as f32, (start.y + oy) as f32),
                ((end.x + ox) as f32, (end.y + oy) as f32),
                colour
            );
        }
    }
}

/// Draw the outline of a closed polygon.
pub fn draw_polygon(frame: &mut Frame, points: &[Point<i32>], colour: Rgb<u8>, thickness: u32) {
    let n = points.len();

    for i in 0..n {
        draw_thick_line(frame, points[i], points[(i + 1) % n], colour, thickness);
    }
}

/// Draw an axis-aligned elliptical ring whose stroke of `thickness` pixels is centred on the
/// ellipse with the given semi-axes.
///
/// A pixel is on the ring if it lies within the outer ellipse and outside the inner one. The
/// tests run in floating point, so maps of any size can be drawn.
pub fn draw_ellipse_ring(
    frame: &mut Frame,
    centre: Point<i32>,
    semi_axes: (u32, u32),
    colour: Rgb<u8>,
    thickness: u32
) {
    let half = (thickness / 2) as f64;
    let (a, b) = (semi_axes.0 as f64, semi_axes.1 as f64);
    let outer = (a + half, b + half);
    let inner = (a - half, b - half);

    let within = |dx: f64, dy: f64, (rx, ry): (f64, f64)| {
        rx > 0.0 && ry > 0.0 && (dx / rx).powi(2) + (dy / ry).powi(2) <= 1.0
    };

    // Bounding box of the outer ellipse, clipped to the frame
    let (cx, cy) = (centre.x as i64, centre.y as i64);
    let (rx, ry) = (outer.0.ceil() as i64, outer.1.ceil() as i64);
    let x_range = (cx - rx).max(0)..=(cx + rx).min(frame.width() as i64 - 1);
    let y_range = (cy - ry).max(0)..=(cy + ry).min(frame.height() as i64 - 1);

    for y in y_range {
        for x in x_range.clone() {
            let (dx, dy) = ((x - cx) as f64, (y - cy) as f64);

            if within(dx, dy, outer) && !within(dx, dy, inner) {
                frame.put_pixel(x as u32, y as u32, colour);
            }
        }
    }
}
