//! # Contour geometry
//!
//! Polygon measures used to classify marker regions. Contours are treated as closed polygons
//! whose last point joins back to the first.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use imageproc::{geometry::min_area_rect, point::Point};
use nalgebra::Point2;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Raw spatial moments of a polygon up to first order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    /// Enclosed area, never negative.
    pub m00: f64,

    /// First moment about the y axis, the sum of x over the area.
    pub m10: f64,

    /// First moment about the x axis, the sum of y over the area.
    pub m01: f64
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Moments {
    /// Compute the moments of the area enclosed by a closed polygon using Green's theorem.
    ///
    /// The result does not depend on the winding direction of the polygon.
    pub fn from_polygon(points: &[Point<i32>]) -> Self {
        let mut m = Self::default();
        let n = points.len();

        for i in 0..n {
            let (pi, pj) = (points[i], points[(i + 1) % n]);
            let (xi, yi, xj, yj) = (pi.x as f64, pi.y as f64, pj.x as f64, pj.y as f64);
            let cross = xi * yj - xj * yi;

            m.m00 += cross;
            m.m10 += (xi + xj) * cross;
            m.m01 += (yi + yj) * cross;
        }

        m.m00 /= 2.0;
        m.m10 /= 6.0;
        m.m01 /= 6.0;

        if m.m00 < 0.0 {
            m.m00 = -m.m00;
            m.m10 = -m.m10;
            m.m01 = -m.m01;
        }

        m
    }

    /// The centroid of the polygon, or `None` if it encloses no area.
    pub fn centroid(&self) -> Option<Point2<f64>> {
        if self.m00 == 0.0 {
            None
        }
        else {
            Some(Point2::new(self.m10 / self.m00, self.m01 / self.m00))
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Area enclosed by a closed polygon.
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    Moments::from_polygon(points).m00
}

/// Ratio of the long side to the short side of the minimum area rectangle enclosing the
/// points, zero if the rectangle has no area.
pub fn min_rect_aspect_ratio(points: &[Point<i32>]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }

    let corners = min_area_rect(points);
    let side = |a: Point<i32>, b: Point<i32>| {
        ((b.x - a.x) as f64).hypot((b.y - a.y) as f64)
    };

    let (s0, s1) = (side(corners[0], corners[1]), side(corners[1], corners[2]));
    let (long, short) = (s0.max(s1), s0.min(s1));

    if short <= 0.0 {
        0.0
    }
    else {
        long / short
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rect_outline(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<Point<i32>> {
        let mut pts = Vec::new();
        for y in y0..y1 {
            pts.push(Point::new(x0, y));
        }
        for x in x0..x1 {
            pts.push(Point::new(x, y1));
        }
        for y in (y0 + 1..=y1).rev() {
            pts.push(Point::new(x1, y));
        }
        for x in (x0 + 1..=x1).rev() {
            pts.push(Point::new(x, y0));
        }
        pts
    }

    #[test]
    fn test_moments() {
        let square = vec![
            Point::new(0, 0),
            Point::new(0, 4),
            Point::new(4, 4),
            Point::new(4, 0),
        ];

        let m = Moments::from_polygon(&square);
        assert_eq!(m.m00, 16.0);
        assert_eq!(m.centroid(), Some(Point2::new(2.0, 2.0)));

        // Winding does not matter
        let rev: Vec<_> = square.iter().rev().cloned().collect();
        assert_eq!(Moments::from_polygon(&rev), m);

        // Degenerate shapes have no centroid
        let line = vec![Point::new(0, 0), Point::new(5, 0), Point::new(0, 0)];
        assert_eq!(Moments::from_polygon(&line).centroid(), None);
        assert_eq!(Moments::from_polygon(&[Point::new(3, 3)]).centroid(), None);
    }

    #[test]
    fn test_contour_area() {
        // A 10 by 100 pixel stripe traced through its border pixel centres
        let outline = rect_outline(10, 0, 19, 99);
        assert_eq!(contour_area(&outline), 9.0 * 99.0);
        assert_eq!(contour_area(&[]), 0.0);
    }

    #[test]
    fn test_min_rect_aspect_ratio() {
        // Corners come back snapped outwards to whole pixels, so allow a pixel either way
        let stripe = min_rect_aspect_ratio(&rect_outline(0, 0, 9, 99));
        assert!(stripe > 9.0 && stripe < 12.5, "stripe ratio was {}", stripe);

        // A diamond is a rotated square
        let diamond = vec![
            Point::new(50, 0),
            Point::new(0, 50),
            Point::new(50, 100),
            Point::new(100, 50),
        ];
        let ratio = min_rect_aspect_ratio(&diamond);
        assert!((ratio - 1.0).abs() < 0.1, "diamond ratio was {}", ratio);

        // Rectangles with no area
        assert_eq!(min_rect_aspect_ratio(&[Point::new(1, 1)]), 0.0);
        assert_eq!(min_rect_aspect_ratio(&[Point::new(0, 0), Point::new(6, 8)]), 0.0);
        assert_eq!(min_rect_aspect_ratio(&[]), 0.0);
    }
}
