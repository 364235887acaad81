//! MNIST-format (IDX) dataset access.
//!
//! An image set and a label set are two separate big-endian files:
//! - image set: magic `0x00000803`, image count, row count, column count, then
//!   `count * rows * cols` raw pixel bytes, row-major, images concatenated in order
//! - label set: magic `0x00000801`, item count, then one label byte per item
//!
//! The readers parse the header once at open time and then serve single records
//! by index, seeking to the record's offset on every access. Nothing beyond the
//! header is loaded up front.
//!
//! # Examples
//!
//! ```rust
//! use std::io::Cursor;
//! use mnist_knn::dataset::{encode_image_set, Image, ImageSet};
//!
//! let images = vec![Image::new(1, 2, vec![0, 255]).unwrap()];
//! let bytes = encode_image_set(1, 2, &images).unwrap();
//!
//! let mut set = ImageSet::from_reader(Cursor::new(bytes)).unwrap();
//! assert_eq!(set.len(), 1);
//! assert_eq!(set.image(0).unwrap().pixels(), &[0, 255]);
//! ```

use std::fmt;

pub mod encode;
pub mod header;
pub mod image_set;
pub mod label_set;

pub use encode::{encode_image_set, encode_label_set};
pub use header::{
    ImageSetHeader, LabelSetHeader, IMAGE_SET_HEADER_SIZE, IMAGE_SET_MAGIC,
    LABEL_SET_HEADER_SIZE, LABEL_SET_MAGIC,
};
pub use image_set::{Image, ImageSet};
pub use label_set::{Label, LabelSet};

/// Which of the two file kinds a header or record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    ImageSet,
    LabelSet,
}

impl DatasetKind {
    /// The magic number that identifies this kind of file.
    pub fn magic(&self) -> u32 {
        match self {
            DatasetKind::ImageSet => IMAGE_SET_MAGIC,
            DatasetKind::LabelSet => LABEL_SET_MAGIC,
        }
    }

    /// Size of the fixed header in bytes; record data starts right after it.
    pub fn header_size(&self) -> usize {
        match self {
            DatasetKind::ImageSet => IMAGE_SET_HEADER_SIZE,
            DatasetKind::LabelSet => LABEL_SET_HEADER_SIZE,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::ImageSet => write!(f, "image set"),
            DatasetKind::LabelSet => write!(f, "label set"),
        }
    }
}

/// Reads into `buf` until it is full or the stream is exhausted, returning the byte count.
/// A short stream is not an error here; callers compare the count themselves.
pub(crate) fn read_fully<R: std::io::Read>(
    reader: &mut R,
    buf: &mut [u8],
) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
