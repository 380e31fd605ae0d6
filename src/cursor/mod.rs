// WHY: both splitters hand out the same kind of segment so callers can switch
// between zero-copy views and independent copies with one flag

pub mod lines;
pub mod pattern;

pub use lines::LineCursor;
pub use pattern::{Pattern, PatternCursor};

use crate::text::TextBuffer;

/// One piece produced by a cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Independent copy (`stringify = true`)
    Copied(Vec<u8>),
    /// Zero-copy view into the cursor's buffer
    Borrowed(TextBuffer<'a>),
}

impl<'a> Segment<'a> {
    pub(crate) fn new(bytes: &'a [u8], stringify: bool) -> Self {
        if stringify {
            Segment::Copied(bytes.to_vec())
        } else {
            Segment::Borrowed(TextBuffer::borrowed(bytes))
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Segment::Copied(bytes) => bytes.as_slice(),
            Segment::Borrowed(text) => text.as_bytes(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_copied(&self) -> bool {
        matches!(self, Segment::Copied(_))
    }

    /// Convert into a buffer; copies become owned buffers, views stay borrowed
    pub fn into_buffer(self) -> TextBuffer<'a> {
        match self {
            Segment::Copied(bytes) => TextBuffer::from_vec(bytes),
            Segment::Borrowed(text) => text,
        }
    }
}

impl AsRef<[u8]> for Segment<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
