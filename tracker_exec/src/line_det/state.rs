//! Implementations for the LineDet state structure

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use imageproc::{
    drawing::draw_filled_circle_mut,
    geometry::{approximate_polygon_dp, arc_length},
    point::Point,
};
use log::trace;
use serde::Serialize;

// Internal
use super::{contour_area, find_outer_contours, marker_mask, min_rect_aspect_ratio};
use super::{Moments, Params};
use crate::draw::{self, BLUE, GREEN, RED, YELLOW};
use crate::Frame;
use util::module::State;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Douglas-Peucker tolerance for drawing candidates, as a fraction of the contour perimeter.
const SIMPLIFY_EPSILON_FRAC: f64 = 0.005;

/// Radius of the centroid marker.
///
/// Units: pixels
const CENTROID_RADIUS: i32 = 5;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Line detection module state.
///
/// Detection itself is stateless, only the parameters are held between cycles.
#[derive(Debug, Default)]
pub struct LineDet {
    params: Params
}

/// Output of a single detection.
#[derive(Debug, Clone, Default)]
pub struct DetectionResult {
    /// Normalised horizontal offset of the line from the frame centre, between -1 (left edge)
    /// and +1 (right edge). `None` if no line was found.
    pub deviation: Option<f64>,

    /// Copy of the input frame with diagnostic overlays. `None` only if there was no input
    /// frame.
    pub annotated: Option<Frame>
}

/// Status report for LineDet processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// Number of outer contours found in the mask.
    pub num_contours: usize,

    /// Number of regions rejected for enclosing too little area.
    pub num_rejected_area: usize,

    /// Number of regions rejected for not being elongated enough.
    pub num_rejected_shape: usize,

    /// Number of regions accepted as possible lines.
    pub num_candidates: usize,

    /// Area of the selected line region.
    ///
    /// Units: pixels
    pub line_area: Option<f64>
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl State for LineDet {
    type Params = Params;

    type InputData = Option<Frame>;
    type OutputData = DetectionResult;
    type StatusReport = StatusReport;

    const PARAMS_FILE: &'static str = "line_det.toml";

    fn from_params(params: Self::Params) -> Self {
        Self { params }
    }

    fn proc(&mut self, input_data: Self::InputData) -> (Self::OutputData, Self::StatusReport) {
        match input_data {
            Some(frame) => detect_owned(frame, &self.params),
            None => (DetectionResult::default(), StatusReport::default())
        }
    }
}

impl LineDet {
    /// The parameters currently in use.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Replace the parameters, used when they are retuned at runtime.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Detect the marker line in a frame.
///
/// The input frame is not modified, annotations are drawn onto a copy.
pub fn detect(frame: Option<&Frame>, params: &Params) -> DetectionResult {
    match frame {
        Some(f) => detect_owned(f.clone(), params).0,
        None => DetectionResult::default()
    }
}

/// Detect the line, drawing annotations directly onto the given frame.
fn detect_owned(mut frame: Frame, params: &Params) -> (DetectionResult, StatusReport) {
    let mut report = StatusReport::default();

    let mask = marker_mask(&frame, params.threshold);
    let contours = find_outer_contours(&mask);
    report.num_contours = contours.len();

    // ---- CLASSIFICATION ----

    let mut best: Option<(f64, &[Point<i32>])> = None;

    for contour in contours.iter() {
        let points = &contour.points[..];
        let area = contour_area(points);

        if area <= params.min_area as f64 {
            report.num_rejected_area += 1;
            draw::draw_polygon(&mut frame, points, RED, 1);
            continue;
        }

        if min_rect_aspect_ratio(points) < params.min_aspect_ratio {
            report.num_rejected_shape += 1;
            draw::draw_polygon(&mut frame, points, YELLOW, 1);
            continue;
        }

        report.num_candidates += 1;

        let epsilon = SIMPLIFY_EPSILON_FRAC * arc_length(points, true);
        if epsilon > 0.0 {
            draw::draw_polygon(&mut frame, &approximate_polygon_dp(points, epsilon, true), GREEN, 2);
        }
        else {
            draw::draw_polygon(&mut frame, points, GREEN, 2);
        }

        // Strictly greater, so the first region found wins a tie
        if best.map(|(a, _)| area > a).unwrap_or(true) {
            best = Some((area, points));
        }
    }

    trace!("LineDet report: {:?}", report);

    // ---- SELECTION ----

    let centroid = best.and_then(|(area, points)| {
        report.line_area = Some(area);
        Moments::from_polygon(points).centroid()
    });

    let deviation = centroid.map(|c| {
        let half_width = frame.width() as f64 / 2.0;
        let (cx, cy) = (c.x.round() as i32, c.y.round() as i32);

        draw_filled_circle_mut(&mut frame, (cx, cy), CENTROID_RADIUS, RED);
        draw::draw_thick_line(
            &mut frame,
            Point::new(half_width as i32, cy),
            Point::new(cx, cy),
            BLUE,
            2
        );

        (c.x - half_width) / half_width
    });

    (
        DetectionResult {
            deviation,
            annotated: Some(frame)
        },
        report
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::draw::{BLACK, WHITE};

    /// Draw a black vertical stripe ten pixels wide centred on `centre_x`.
    fn stripe_frame(centre_x: u32) -> Frame {
        let mut frame = Frame::from_pixel(100, 100, WHITE);
        for y in 0..100 {
            for x in (centre_x - 5)..(centre_x + 5) {
                frame.put_pixel(x, y, BLACK);
            }
        }
        frame
    }

    fn stripe_params() -> Params {
        Params {
            min_area: 500,
            ..Params::default()
        }
    }

    #[test]
    fn test_no_frame() {
        let result = detect(None, &Params::default());
        assert!(result.deviation.is_none());
        assert!(result.annotated.is_none());

        let (result, report) = LineDet::default().proc(None);
        assert!(result.deviation.is_none());
        assert!(result.annotated.is_none());
        assert_eq!(report, StatusReport::default());
    }

    #[test]
    fn test_blank_frame() {
        let frame = Frame::from_pixel(100, 100, WHITE);
        let result = detect(Some(&frame), &Params::default());

        assert!(result.deviation.is_none());
        assert_eq!(result.annotated, Some(frame));
    }

    #[test]
    fn test_stripe_positions() {
        let params = stripe_params();

        let centre = detect(Some(&stripe_frame(50)), &params).deviation.unwrap();
        assert!(centre.abs() < 0.1, "centre deviation was {}", centre);

        let left = detect(Some(&stripe_frame(25)), &params).deviation.unwrap();
        assert!((left + 0.5).abs() < 0.05, "left deviation was {}", left);

        let right = detect(Some(&stripe_frame(75)), &params).deviation.unwrap();
        assert!((right - 0.5).abs() < 0.05, "right deviation was {}", right);
    }

    /// Fill the rectangle `[x0, x1) x [y0, y1)` of a white frame with black.
    fn block_frame(x0: u32, x1: u32, y0: u32, y1: u32) -> Frame {
        let mut frame = Frame::from_pixel(100, 100, WHITE);
        for y in y0..y1 {
            for x in x0..x1 {
                frame.put_pixel(x, y, BLACK);
            }
        }
        frame
    }

    #[test]
    fn test_regions_touching_frame_edges() {
        let params = stripe_params();

        // Stripes against the left and right edges
        let (result, report) = LineDet::from_params(params).proc(Some(block_frame(0, 12, 0, 100)));
        assert_eq!(report.num_contours, 1);
        assert_eq!(report.line_area, Some(11.0 * 99.0));
        let left = result.deviation.unwrap();
        assert!((left + 0.89).abs() < 0.01, "left edge deviation was {}", left);

        let right = detect(Some(&block_frame(88, 100, 0, 100)), &params).deviation.unwrap();
        assert!((right - 0.87).abs() < 0.01, "right edge deviation was {}", right);

        // A bar along the top edge
        let top = detect(Some(&block_frame(20, 80, 0, 10)), &params).deviation.unwrap();
        assert!((top + 0.01).abs() < 0.01, "top edge deviation was {}", top);

        // A block in the top left corner
        let (result, report) = LineDet::from_params(params).proc(Some(block_frame(0, 30, 0, 30)));
        assert_eq!(report.line_area, Some(29.0 * 29.0));
        let corner = result.deviation.unwrap();
        assert!((corner + 0.71).abs() < 0.01, "corner deviation was {}", corner);

        // And the bottom right one
        let corner = detect(Some(&block_frame(70, 100, 70, 100)), &params).deviation.unwrap();
        assert!((corner - 0.69).abs() < 0.01, "corner deviation was {}", corner);
    }

    #[test]
    fn test_input_not_modified() {
        let frame = stripe_frame(25);
        let original = frame.clone();

        let result = detect(Some(&frame), &stripe_params());
        assert_eq!(frame, original);

        // The annotated copy has the centroid marker and the offset line
        let annotated = result.annotated.unwrap();
        assert_eq!(*annotated.get_pixel(25, 45), RED);
        assert_eq!(*annotated.get_pixel(40, 50), BLUE);
    }

    #[test]
    fn test_rejections() {
        let mut frame = stripe_frame(75);

        // A small blob and a large square
        for y in 10..14 {
            for x in 10..14 {
                frame.put_pixel(x, y, BLACK);
            }
        }
        for y in 40..80 {
            for x in 10..50 {
                frame.put_pixel(x, y, BLACK);
            }
        }

        let params = Params {
            min_area: 500,
            min_aspect_ratio: 2.0,
            ..Params::default()
        };

        let mut line_det = LineDet::from_params(params);
        let (result, report) = line_det.proc(Some(frame));

        assert_eq!(report.num_contours, 3);
        assert_eq!(report.num_rejected_area, 1);
        assert_eq!(report.num_rejected_shape, 1);
        assert_eq!(report.num_candidates, 1);
        assert_eq!(report.line_area, Some(891.0));

        let deviation = result.deviation.unwrap();
        assert!((deviation - 0.5).abs() < 0.05);

        let annotated = result.annotated.unwrap();
        assert_eq!(*annotated.get_pixel(10, 10), RED);
        assert_eq!(*annotated.get_pixel(10, 40), YELLOW);
    }

    #[test]
    fn test_largest_candidate_selected() {
        let mut frame = Frame::from_pixel(100, 100, WHITE);
        for y in 0..100 {
            for x in 10..20 {
                frame.put_pixel(x, y, BLACK);
            }
            for x in 70..90 {
                frame.put_pixel(x, y, BLACK);
            }
        }

        let result = detect(Some(&frame), &stripe_params());
        let deviation = result.deviation.unwrap();
        assert!((deviation - 0.59).abs() < 0.01, "deviation was {}", deviation);
    }

    #[test]
    fn test_equal_candidates_first_wins() {
        // Two identical stripes, the left one is met first in raster order
        let mut frame = Frame::from_pixel(100, 100, WHITE);
        for y in 0..100 {
            for x in (20..30).chain(70..80) {
                frame.put_pixel(x, y, BLACK);
            }
        }

        let mut line_det = LineDet::from_params(stripe_params());
        let (result, report) = line_det.proc(Some(frame));
        assert_eq!(report.num_candidates, 2);
        assert_eq!(report.line_area, Some(891.0));

        let deviation = result.deviation.unwrap();
        assert!((deviation + 0.51).abs() < 0.01, "deviation was {}", deviation);
    }

    #[test]
    fn test_nested_region_ignored() {
        // A thick dark ring around a dark blob, the blob is never a candidate
        let mut frame = Frame::from_pixel(100, 100, WHITE);
        for y in 10..90 {
            for x in 10..90 {
                let ring = x < 20 || x >= 80 || y < 20 || y >= 80;
                let blob = x >= 40 && x < 60 && y >= 30 && y < 70;
                if ring || blob {
                    frame.put_pixel(x, y, BLACK);
                }
            }
        }

        let mut line_det = LineDet::from_params(Params {
            min_area: 100,
            min_aspect_ratio: 0.0,
            ..Params::default()
        });
        let (_, report) = line_det.proc(Some(frame));
        assert_eq!(report.num_contours, 1);
        assert_eq!(report.num_candidates, 1);
    }

    #[test]
    fn test_set_params() {
        let mut line_det = LineDet::default();
        let frame = stripe_frame(50);

        // The default minimum area rejects the stripe
        let (result, _) = line_det.proc(Some(frame.clone()));
        assert!(result.deviation.is_none());

        line_det.set_params(stripe_params());
        assert_eq!(line_det.params().min_area, 500);
        let (result, _) = line_det.proc(Some(frame));
        assert!(result.deviation.is_some());
    }
}
