//! Error types shared by the dataset readers and the classifier.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::dataset::DatasetKind;

/// Everything that can go wrong while opening, reading, or classifying a dataset.
///
/// None of these are recoverable for the current run: a failure means the
/// input files are malformed or mismatched, not that a single record is bad.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot open dataset {}: {source}", .path.display())]
    DatasetUnavailable { path: PathBuf, source: io::Error },

    #[error("{kind}: invalid magic number, expected 0x{expected:08X}, found 0x{found:08X}")]
    CorruptHeader {
        kind: DatasetKind,
        expected: u32,
        found: u32,
    },

    #[error("{kind}: stream ends before the {} byte header", .kind.header_size())]
    TruncatedHeader { kind: DatasetKind },

    #[error("image set: invalid dimensions {rows}x{cols}")]
    InvalidDimensions { rows: u32, cols: u32 },

    #[error("{kind}: record {index} out of range (count {count})")]
    IndexOutOfRange {
        kind: DatasetKind,
        index: usize,
        count: usize,
    },

    #[error("{kind}: record {index} truncated, expected {expected} bytes, read {read}")]
    TruncatedRead {
        kind: DatasetKind,
        index: usize,
        expected: u64,
        read: u64,
    },

    #[error(
        "image shape mismatch: expected {}x{}, found {}x{}",
        .expected.0,
        .expected.1,
        .found.0,
        .found.1
    )]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("image of {rows}x{cols} needs {} pixels, got {found}", .rows * .cols)]
    PixelCountMismatch {
        rows: usize,
        cols: usize,
        found: usize,
    },

    #[error("{field} of {value} does not fit in a 32-bit header field")]
    HeaderFieldOverflow { field: &'static str, value: usize },

    #[error("image set has {images} records but label set has {labels}")]
    CountMismatch { images: usize, labels: usize },

    #[error("number of neighbors must be at least 1")]
    InvalidNeighborCount,

    #[error("training set contains no images")]
    EmptyTrainingSet,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
