//! # Marker mask and contour extraction
//!
//! Marker pixels form 8-connected regions. Only the outer borders of regions which are not
//! nested inside a hole of another region are kept.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use image::{imageops, GrayImage, Luma};
use imageproc::{
    contours::{find_contours, BorderType, Contour},
    point::Point,
};

use crate::Frame;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Mask value of a marker pixel.
pub const MARKER: u8 = 255;

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Threshold a frame, a pixel is a marker if every channel is at or below `threshold`.
pub fn marker_mask(frame: &Frame, threshold: u8) -> GrayImage {
    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        if frame.get_pixel(x, y).0.iter().all(|&c| c <= threshold) {
            Luma([MARKER])
        }
        else {
            Luma([0])
        }
    })
}

/// Find the outer contours of all marker regions which are not nested inside another region.
///
/// Contours are returned in the raster order of each region's first pixel.
pub fn find_outer_contours(mask: &GrayImage) -> Vec<Contour<i32>> {
    // Border following never starts an outer border in the first column, so the mask is
    // traced inside a one pixel background frame and shifted back afterwards.
    let mut framed = GrayImage::new(mask.width() + 2, mask.height() + 2);
    imageops::replace(&mut framed, mask, 1, 1);

    find_contours::<i32>(&framed)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|mut c| {
            for p in c.points.iter_mut() {
                *p = Point::new(p.x - 1, p.y - 1);
            }
            c
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::draw::{BLACK, WHITE};
    use imageproc::point::Point;

    fn mask_from_rows(rows: &[&str]) -> GrayImage {
        let mut frame = Frame::from_pixel(rows[0].len() as u32, rows.len() as u32, WHITE);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    frame.put_pixel(x as u32, y as u32, BLACK);
                }
            }
        }
        marker_mask(&frame, 60)
    }

    fn sorted(points: &[Point<i32>]) -> Vec<(i32, i32)> {
        let mut v: Vec<_> = points.iter().map(|p| (p.x, p.y)).collect();
        v.sort();
        v.dedup();
        v
    }

    #[test]
    fn test_mask() {
        let mut frame = Frame::from_pixel(3, 1, WHITE);
        frame.put_pixel(0, 0, image::Rgb([60, 60, 60]));
        frame.put_pixel(1, 0, image::Rgb([10, 61, 10]));

        let mask = marker_mask(&frame, 60);
        assert_eq!(mask.get_pixel(0, 0).0[0], MARKER);
        assert_eq!(mask.get_pixel(1, 0).0[0], 0);
        assert_eq!(mask.get_pixel(2, 0).0[0], 0);
    }

    #[test]
    fn test_square_contour() {
        let mask = mask_from_rows(&[
            "......",
            ".##...",
            ".##...",
            "......",
        ]);

        let contours = find_outer_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(sorted(&contours[0].points), vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn test_raster_order() {
        let mask = mask_from_rows(&[
            "....#",
            ".....",
            "###..",
        ]);

        let contours = find_outer_contours(&mask);
        assert_eq!(contours.len(), 2);
        assert_eq!(sorted(&contours[0].points), vec![(4, 0)]);
        assert_eq!(sorted(&contours[1].points), vec![(0, 2), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_nested_regions_ignored() {
        let mask = mask_from_rows(&[
            ".......",
            ".#####.",
            ".#...#.",
            ".#.#.#.",
            ".#...#.",
            ".#####.",
            ".......",
        ]);

        // The dot inside the ring is nested, only the ring's outer border is found
        let contours = find_outer_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(sorted(&contours[0].points).len(), 16);
        assert!(contours[0].points.iter().all(|p| p.x == 1 || p.x == 5 || p.y == 1 || p.y == 5));
    }

    #[test]
    fn test_regions_on_the_frame_edge() {
        let mask = mask_from_rows(&[
            "##..#",
            "#...#",
            ".....",
            "....#",
        ]);

        let contours = find_outer_contours(&mask);
        assert_eq!(contours.len(), 3);
        assert_eq!(sorted(&contours[0].points), vec![(0, 0), (0, 1), (1, 0)]);
        assert_eq!(sorted(&contours[1].points), vec![(4, 0), (4, 1)]);
        assert_eq!(sorted(&contours[2].points), vec![(4, 3)]);
    }

    #[test]
    fn test_diagonal_regions_are_connected() {
        let mask = mask_from_rows(&[
            "#..",
            ".#.",
            "..#",
        ]);

        assert_eq!(find_outer_contours(&mask).len(), 1);
    }
}
