//! Random-access reader over a label set file.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::header::{LabelSetHeader, LABEL_SET_HEADER_SIZE};
use super::{read_fully, DatasetKind};
use crate::error::{Error, Result};

/// Class label of one image; one byte per record on disk.
pub type Label = u8;

/// An open label set: the parsed header plus its seekable stream.
#[derive(Debug)]
pub struct LabelSet<R> {
    reader: R,
    header: LabelSetHeader,
}

impl LabelSet<BufReader<File>> {
    /// Opens a label set file and validates its header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::DatasetUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> LabelSet<R> {
    pub fn from_reader(mut reader: R) -> Result<Self> {
        reader.seek(SeekFrom::Start(0))?;
        let header = LabelSetHeader::read_from(&mut reader)?;
        Ok(Self { reader, header })
    }

    /// Reads label `index` (0-based), seeking to `8 + index` first.
    pub fn label(&mut self, index: usize) -> Result<Label> {
        let count = self.len();
        if index >= count {
            return Err(Error::IndexOutOfRange {
                kind: DatasetKind::LabelSet,
                index,
                count,
            });
        }

        let offset = LABEL_SET_HEADER_SIZE as u64 + index as u64;
        self.reader.seek(SeekFrom::Start(offset))?;

        let mut byte = [0u8; 1];
        let read = read_fully(&mut self.reader, &mut byte)?;
        if read < 1 {
            return Err(Error::TruncatedRead {
                kind: DatasetKind::LabelSet,
                index,
                expected: 1,
                read: read as u64,
            });
        }
        Ok(byte[0])
    }
}

impl<R> LabelSet<R> {
    pub fn header(&self) -> &LabelSetHeader {
        &self.header
    }

    pub fn len(&self) -> usize {
        self.header.item_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
