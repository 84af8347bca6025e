//! Rendering of the simulated camera view and the overview map

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use image::imageops;
use imageproc::{
    drawing::draw_filled_circle_mut,
    geometric_transformations::{warp_into_with, Interpolation},
    point::Point,
};
use nalgebra::{Point2, Rotation2, Vector2};

use super::KinematicSimulator;
use crate::draw::{self, RED, WHITE};
use crate::Frame;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Radius of the robot marker on the overview map.
const ROBOT_RADIUS: i32 = 5;

/// Length of the heading line on the overview map.
const HEADING_LEN: f64 = 20.0;

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl KinematicSimulator {
    /// Render the camera view from the robot's current pose.
    ///
    /// The view is the padded map rotated about the robot by `theta + 90 deg`, so that the
    /// heading points up, then cropped with the robot at the bottom centre. Only the pixels
    /// inside the crop window are resampled, samples falling outside the padded map are white.
    pub fn get_frame(&self) -> Frame {
        let (view_w, view_h) = (self.params.view_width, self.params.view_height);

        let centre = Point2::new(
            self.pose.x + self.pad as f64,
            self.pose.y + self.pad as f64
        );
        let rot = Rotation2::new(self.pose.theta + std::f64::consts::FRAC_PI_2);

        let crop_x = (centre.x - view_w as f64 / 2.0).floor();
        let crop_y = (centre.y - view_h as f64).floor();

        let mut view = Frame::new(view_w, view_h);

        // Position in the rotated image, mapped back into the padded map
        let mapping = move |i: f32, j: f32| {
            let dst = Point2::new(crop_x + i as f64, crop_y + j as f64);
            let src = centre + rot * (dst - centre);
            (src.x as f32, src.y as f32)
        };

        warp_into_with(&self.padded_map, mapping, Interpolation::Bilinear, WHITE, &mut view);

        view
    }

    /// Copy of the map with the robot's position and heading drawn on.
    pub fn get_map_with_robot(&self) -> Frame {
        let mut vis = self.map.clone();

        let pos = Point::new(self.pose.x as i32, self.pose.y as i32);
        let heading = Vector2::new(self.pose.theta.cos(), self.pose.theta.sin()) * HEADING_LEN;
        let end = Point::new(
            (self.pose.x + heading.x) as i32,
            (self.pose.y + heading.y) as i32
        );

        draw_filled_circle_mut(&mut vis, (pos.x, pos.y), ROBOT_RADIUS, RED);
        draw::draw_thick_line(&mut vis, pos, end, RED, 2);

        vis
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Surround the map with a white border `pad` pixels wide.
pub(super) fn pad_map(map: &Frame, pad: u32) -> Frame {
    let mut padded = Frame::from_pixel(map.width() + 2 * pad, map.height() + 2 * pad, WHITE);
    imageops::replace(&mut padded, map, pad as i64, pad as i64);
    padded
}
