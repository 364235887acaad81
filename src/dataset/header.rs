//! Fixed-size big-endian headers of image and label files.

use std::io::Read;

use log::debug;

use super::{read_fully, DatasetKind};
use crate::error::{Error, Result};

/// Magic number at the start of an image set file.
pub const IMAGE_SET_MAGIC: u32 = 0x0000_0803;
/// Magic number at the start of a label set file.
pub const LABEL_SET_MAGIC: u32 = 0x0000_0801;

/// magic, image count, row count, column count: four `u32`s.
pub const IMAGE_SET_HEADER_SIZE: usize = 16;
/// magic, item count: two `u32`s.
pub const LABEL_SET_HEADER_SIZE: usize = 8;

/// Parsed header of an image set file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSetHeader {
    pub magic: u32,
    pub image_count: u32,
    pub row_count: u32,
    pub col_count: u32,
}

/// Parsed header of a label set file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSetHeader {
    pub magic: u32,
    pub item_count: u32,
}

impl ImageSetHeader {
    /// Header for a well-formed image set with the given dimensions.
    pub fn new(image_count: u32, row_count: u32, col_count: u32) -> Self {
        Self {
            magic: IMAGE_SET_MAGIC,
            image_count,
            row_count,
            col_count,
        }
    }

    /// Reads and validates a header from a stream positioned at offset 0.
    ///
    /// Fails with `CorruptHeader` if the magic is not the image set magic (a label
    /// file opened as an image file ends up here), and with `InvalidDimensions`
    /// if either dimension is zero.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; IMAGE_SET_HEADER_SIZE];
        read_header_bytes(reader, &mut buf, DatasetKind::ImageSet)?;

        let header = Self {
            magic: be_u32(&buf, 0),
            image_count: be_u32(&buf, 4),
            row_count: be_u32(&buf, 8),
            col_count: be_u32(&buf, 12),
        };
        check_magic(DatasetKind::ImageSet, header.magic)?;
        if header.row_count == 0 || header.col_count == 0 {
            return Err(Error::InvalidDimensions {
                rows: header.row_count,
                cols: header.col_count,
            });
        }

        debug!(
            "image set header: {} images of {}x{}",
            header.image_count, header.row_count, header.col_count
        );
        Ok(header)
    }

    /// Number of pixel bytes in one image. Cannot overflow: both factors are `u32`.
    pub fn image_size(&self) -> u64 {
        u64::from(self.row_count) * u64::from(self.col_count)
    }

    /// Encodes the header in file order, big-endian.
    pub fn to_bytes(&self) -> [u8; IMAGE_SET_HEADER_SIZE] {
        let mut out = [0u8; IMAGE_SET_HEADER_SIZE];
        out[0..4].copy_from_slice(&self.magic.to_be_bytes());
        out[4..8].copy_from_slice(&self.image_count.to_be_bytes());
        out[8..12].copy_from_slice(&self.row_count.to_be_bytes());
        out[12..16].copy_from_slice(&self.col_count.to_be_bytes());
        out
    }
}

impl LabelSetHeader {
    /// Header for a well-formed label set with `item_count` labels.
    pub fn new(item_count: u32) -> Self {
        Self {
            magic: LABEL_SET_MAGIC,
            item_count,
        }
    }

    /// Reads and validates a header from a stream positioned at offset 0.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; LABEL_SET_HEADER_SIZE];
        read_header_bytes(reader, &mut buf, DatasetKind::LabelSet)?;

        let header = Self {
            magic: be_u32(&buf, 0),
            item_count: be_u32(&buf, 4),
        };
        check_magic(DatasetKind::LabelSet, header.magic)?;

        debug!("label set header: {} items", header.item_count);
        Ok(header)
    }

    pub fn to_bytes(&self) -> [u8; LABEL_SET_HEADER_SIZE] {
        let mut out = [0u8; LABEL_SET_HEADER_SIZE];
        out[0..4].copy_from_slice(&self.magic.to_be_bytes());
        out[4..8].copy_from_slice(&self.item_count.to_be_bytes());
        out
    }
}

fn read_header_bytes<R: Read>(reader: &mut R, buf: &mut [u8], kind: DatasetKind) -> Result<()> {
    if read_fully(reader, buf)? < buf.len() {
        return Err(Error::TruncatedHeader { kind });
    }
    Ok(())
}

fn check_magic(kind: DatasetKind, found: u32) -> Result<()> {
    let expected = kind.magic();
    if found != expected {
        return Err(Error::CorruptHeader {
            kind,
            expected,
            found,
        });
    }
    Ok(())
}

#[inline]
fn be_u32(buf: &[u8], start: usize) -> u32 {
    u32::from_be_bytes([buf[start], buf[start + 1], buf[start + 2], buf[start + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_image_header_big_endian() {
        let bytes = [
            0x00, 0x00, 0x08, 0x03, // magic
            0x00, 0x00, 0xEA, 0x60, // 60000 images
            0x00, 0x00, 0x00, 0x1C, // 28 rows
            0x00, 0x00, 0x00, 0x1C, // 28 cols
        ];
        let header = ImageSetHeader::read_from(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(header, ImageSetHeader::new(60000, 28, 28));
        assert_eq!(header.image_size(), 784);
    }

    #[test]
    fn test_parse_label_header_big_endian() {
        let bytes = [0x00, 0x00, 0x08, 0x01, 0x00, 0x00, 0x27, 0x10];
        let header = LabelSetHeader::read_from(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(header, LabelSetHeader::new(10000));
    }

    #[test]
    fn test_label_file_rejected_as_image_set() {
        let mut bytes = LabelSetHeader::new(4).to_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 12]);
        match ImageSetHeader::read_from(&mut Cursor::new(bytes)) {
            Err(Error::CorruptHeader {
                kind,
                expected,
                found,
            }) => {
                assert_eq!(kind, DatasetKind::ImageSet);
                assert_eq!(expected, IMAGE_SET_MAGIC);
                assert_eq!(found, LABEL_SET_MAGIC);
            }
            other => panic!("expected CorruptHeader, got {:?}", other),
        }
    }

    #[test]
    fn test_image_file_rejected_as_label_set() {
        let bytes = ImageSetHeader::new(1, 2, 2).to_bytes();
        let result = LabelSetHeader::read_from(&mut Cursor::new(bytes));
        assert!(matches!(
            result,
            Err(Error::CorruptHeader {
                kind: DatasetKind::LabelSet,
                found: IMAGE_SET_MAGIC,
                ..
            })
        ));
    }

    #[test]
    fn test_short_header() {
        let bytes = [0x00, 0x00, 0x08, 0x03, 0x00, 0x00];
        let result = ImageSetHeader::read_from(&mut Cursor::new(bytes));
        assert!(matches!(
            result,
            Err(Error::TruncatedHeader {
                kind: DatasetKind::ImageSet
            })
        ));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let bytes = ImageSetHeader::new(3, 0, 28).to_bytes();
        let result = ImageSetHeader::read_from(&mut Cursor::new(bytes));
        assert!(matches!(
            result,
            Err(Error::InvalidDimensions { rows: 0, cols: 28 })
        ));
    }

    #[test]
    fn test_to_bytes_layout() {
        let bytes = ImageSetHeader::new(2, 3, 4).to_bytes();
        assert_eq!(
            bytes,
            [0, 0, 8, 3, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 4]
        );
        assert_eq!(LabelSetHeader::new(258).to_bytes(), [0, 0, 8, 1, 0, 0, 1, 2]);
    }
}
