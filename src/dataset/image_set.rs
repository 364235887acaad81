//! Random-access reader over an image set file.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::header::{ImageSetHeader, IMAGE_SET_HEADER_SIZE};
use super::DatasetKind;
use crate::error::{Error, Result};

/// A single grayscale image: `rows * cols` unsigned 8-bit intensities, row-major.
///
/// The image owns its pixel buffer outright; it is released when the value is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pixels: Vec<u8>,
    rows: usize,
    cols: usize,
}

impl Image {
    /// Builds an image, checking that `pixels` holds exactly `rows * cols` values.
    pub fn new(rows: usize, cols: usize, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != rows * cols {
            return Err(Error::PixelCountMismatch {
                rows,
                cols,
                found: pixels.len(),
            });
        }
        Ok(Self { pixels, rows, cols })
    }

    /// An image with every pixel set to `value`.
    pub fn filled(rows: usize, cols: usize, value: u8) -> Self {
        Self {
            pixels: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Intensity at `(row, col)`, or `None` outside the image.
    pub fn pixel(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.pixels.get(row * self.cols + col).copied()
    }
}

/// An open image set: the parsed header plus the seekable stream it came from.
///
/// Every call to [`ImageSet::image`] seeks to the record's offset before reading,
/// so records can be requested in any order, repeatedly, with identical results.
#[derive(Debug)]
pub struct ImageSet<R> {
    reader: R,
    header: ImageSetHeader,
}

impl ImageSet<BufReader<File>> {
    /// Opens an image set file and validates its header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::DatasetUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> ImageSet<R> {
    /// Parses the header from the start of `reader`.
    pub fn from_reader(mut reader: R) -> Result<Self> {
        reader.seek(SeekFrom::Start(0))?;
        let header = ImageSetHeader::read_from(&mut reader)?;
        Ok(Self { reader, header })
    }

    /// Loads image `index` (0-based).
    ///
    /// # Errors
    ///
    /// - `IndexOutOfRange` if `index` is not below the header's image count.
    /// - `TruncatedRead` if the file ends inside the record.
    pub fn image(&mut self, index: usize) -> Result<Image> {
        let count = self.len();
        if index >= count {
            return Err(Error::IndexOutOfRange {
                kind: DatasetKind::ImageSet,
                index,
                count,
            });
        }

        let size = self.header.image_size();
        let truncated = |read: u64| Error::TruncatedRead {
            kind: DatasetKind::ImageSet,
            index,
            expected: size,
            read,
        };

        // An offset past what any stream can address means the file cannot hold the record.
        let offset = match (index as u64)
            .checked_mul(size)
            .and_then(|o| o.checked_add(IMAGE_SET_HEADER_SIZE as u64))
        {
            Some(offset) if offset <= i64::MAX as u64 => offset,
            _ => return Err(truncated(0)),
        };
        self.reader.seek(SeekFrom::Start(offset))?;

        // The buffer grows with the bytes actually present, not with what the header claims.
        let mut pixels = Vec::new();
        let read = (&mut self.reader).take(size).read_to_end(&mut pixels)? as u64;
        if read < size {
            return Err(truncated(read));
        }

        Ok(Image {
            pixels,
            rows: self.rows(),
            cols: self.cols(),
        })
    }

    /// Iterates over all images in index order.
    pub fn iter(&mut self) -> impl Iterator<Item = Result<Image>> + '_ {
        (0..self.len()).map(move |i| self.image(i))
    }
}

impl<R> ImageSet<R> {
    pub fn header(&self) -> &ImageSetHeader {
        &self.header
    }

    /// Number of images the header declares.
    pub fn len(&self) -> usize {
        self.header.image_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rows(&self) -> usize {
        self.header.row_count as usize
    }

    pub fn cols(&self) -> usize {
        self.header.col_count as usize
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }
}
