//! # Frame sources
//!
//! Anything which can feed frames into the tracking loop. Besides the simulator, frames can be
//! played back from a directory of images.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

use crate::Frame;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Extensions of the files played back by [`ImageDirSource`], compared case-insensitively.
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A source of frames for the tracking loop.
pub trait FrameSource {
    /// Get the next frame, or `None` if the source is exhausted.
    fn get_frame(&mut self) -> Option<Frame>;

    /// Whether the image is mirrored left to right relative to the robot's body, in which case
    /// the steering polarity must be flipped.
    fn is_mirrored(&self) -> bool {
        false
    }
}

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Plays back every image in a directory in file name order.
#[derive(Debug)]
pub struct ImageDirSource {
    paths: Vec<PathBuf>,
    next: usize
}

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Errors which can occur while opening a frame source.
#[derive(Debug, Error)]
pub enum FrameSourceError {
    #[error("Cannot read the frame directory: {0}")]
    CannotReadDir(std::io::Error),

    #[error("No images found in {0:?}")]
    NoFrames(PathBuf)
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl ImageDirSource {
    /// Open the given directory, which must contain at least one image.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, FrameSourceError> {
        let mut paths = Vec::new();

        for entry in std::fs::read_dir(dir.as_ref()).map_err(FrameSourceError::CannotReadDir)? {
            let path = entry.map_err(FrameSourceError::CannotReadDir)?.path();

            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                .unwrap_or(false);

            if is_image && path.is_file() {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(FrameSourceError::NoFrames(dir.as_ref().to_path_buf()));
        }

        paths.sort();
        debug!("Found {} frames in {:?}", paths.len(), dir.as_ref());

        Ok(Self { paths, next: 0 })
    }

    /// Number of frames which have not yet been played.
    pub fn remaining(&self) -> usize {
        self.paths.len() - self.next
    }
}

impl FrameSource for ImageDirSource {
    /// Load the next image. A file which cannot be decoded ends the stream.
    fn get_frame(&mut self) -> Option<Frame> {
        let path = self.paths.get(self.next)?;
        self.next += 1;

        match image::open(path) {
            Ok(img) => Some(img.to_rgb8()),
            Err(e) => {
                warn!("Cannot load frame {:?}: {}", path, e);
                self.next = self.paths.len();
                None
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::draw::{BLACK, WHITE};

    fn temp_dir(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("tracker_frames_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    #[test]
    fn test_playback_order() {
        let dir = temp_dir("order");

        Frame::from_pixel(4, 3, WHITE).save(dir.join("frame_001.png")).unwrap();
        Frame::from_pixel(4, 3, BLACK).save(dir.join("frame_000.png")).unwrap();
        std::fs::write(dir.join("notes.txt"), "not a frame").unwrap();

        let mut source = ImageDirSource::new(&dir).unwrap();
        assert_eq!(source.remaining(), 2);
        assert!(!source.is_mirrored());

        let first = source.get_frame().unwrap();
        assert_eq!(first.dimensions(), (4, 3));
        assert_eq!(*first.get_pixel(0, 0), BLACK);
        assert_eq!(*source.get_frame().unwrap().get_pixel(0, 0), WHITE);
        assert!(source.get_frame().is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_bad_frame_ends_stream() {
        let dir = temp_dir("bad");

        std::fs::write(dir.join("a.png"), "definitely not a png").unwrap();
        Frame::from_pixel(2, 2, WHITE).save(dir.join("b.png")).unwrap();

        let mut source = ImageDirSource::new(&dir).unwrap();
        assert!(source.get_frame().is_none());
        assert_eq!(source.remaining(), 0);
        assert!(source.get_frame().is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_open_errors() {
        let dir = temp_dir("empty");
        assert!(matches!(ImageDirSource::new(&dir), Err(FrameSourceError::NoFrames(_))));
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(
            ImageDirSource::new(dir.join("missing")),
            Err(FrameSourceError::CannotReadDir(_))
        ));
    }
}
