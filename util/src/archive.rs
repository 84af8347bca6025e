//! Struct archiving functionality
//!
//! To add archiving functionality to a struct implement the `Archived` trait.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::path::Path;
use std::fs::{File, OpenOptions};
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
#[derive(Default)]
pub struct Archiver {
    writer: Option<Writer<File>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while archiving.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Cannot open the archive file: {0}")]
    FileError(std::io::Error),

    #[error("Cannot write the record: {0}")]
    CsvError(csv::Error),

    #[error("Cannot flush the archive: {0}")]
    FlushError(std::io::Error),

    #[error("The archiver has not been initialised")]
    NotInit
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A trait which enables a struct to be archived as a csv.
///
/// To implement this trait, the struct shall have an `Archiver` member which
/// shall be setup in the struct's `init` or `new` functions.
pub trait Archived {
    /// Write the archives for this struct
    fn write(&mut self) -> Result<(), ArchiveError>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        Self::from_full_path(session.arch_root.join(path))
    }

    /// Create a new archiver writing to the given file, which is truncated.
    pub fn from_full_path<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(ArchiveError::FileError)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(ArchiveError::FileError)?;

        let w = WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        Ok(Self {
            writer: Some(w)
        })
    }

    /// Serialise a record into the archive.
    ///
    /// Records must be flat structs, the header is taken from the first
    /// record's field names.
    pub fn serialise<T: Serialize>(
        &mut self, record: T
    ) -> Result<(), ArchiveError> {
        match self.writer {
            Some(ref mut w) => {
                w.serialize(record).map_err(ArchiveError::CsvError)?;
                w.flush().map_err(ArchiveError::FlushError)
            },
            None => Err(ArchiveError::NotInit)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Record {
        cycle: u64,
        value: Option<f64>
    }

    #[test]
    fn test_archiver() {
        let mut path = std::env::temp_dir();
        path.push(format!("util_archive_{}", std::process::id()));
        path.push("records.csv");

        let mut arch = Archiver::from_full_path(&path).unwrap();
        arch.serialise(Record { cycle: 0, value: Some(0.5) }).unwrap();
        arch.serialise(Record { cycle: 1, value: None }).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "cycle,value\n0,0.5\n1,\n");

        assert!(matches!(
            Archiver::default().serialise(Record { cycle: 2, value: None }),
            Err(ArchiveError::NotInit)
        ));

        std::fs::remove_file(&path).unwrap();
    }
}
