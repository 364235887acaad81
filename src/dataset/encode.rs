//! Encoding images and labels into the on-disk dataset format.

use super::header::{ImageSetHeader, LabelSetHeader};
use super::image_set::Image;
use super::label_set::Label;
use crate::error::{Error, Result};

/// Encodes `images` as a complete image set file of `rows x cols` images.
///
/// Every image must have the declared shape; the first one that does not is
/// reported as a `ShapeMismatch`.
pub fn encode_image_set(rows: usize, cols: usize, images: &[Image]) -> Result<Vec<u8>> {
    let header = ImageSetHeader::new(
        to_u32("image count", images.len())?,
        to_u32("row count", rows)?,
        to_u32("column count", cols)?,
    );

    let mut out = Vec::with_capacity(header.to_bytes().len() + images.len() * rows * cols);
    out.extend_from_slice(&header.to_bytes());
    for image in images {
        if image.shape() != (rows, cols) {
            return Err(Error::ShapeMismatch {
                expected: (rows, cols),
                found: image.shape(),
            });
        }
        out.extend_from_slice(image.pixels());
    }
    Ok(out)
}

/// Encodes `labels` as a complete label set file.
pub fn encode_label_set(labels: &[Label]) -> Result<Vec<u8>> {
    let header = LabelSetHeader::new(to_u32("item count", labels.len())?);
    let mut out = Vec::with_capacity(header.to_bytes().len() + labels.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(labels);
    Ok(out)
}

fn to_u32(field: &'static str, value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::HeaderFieldOverflow { field, value })
}
