// WHY: joining is done in two passes (measure, then fill) so the output is
// allocated exactly once and never reallocated while copying

use crate::text::TextBuffer;

/// One input to [`TextBuffer::from_concat`]: raw bytes or an existing buffer
#[derive(Debug, Clone, Copy)]
pub enum ConcatPart<'p> {
    Bytes(&'p [u8]),
    Text(&'p TextBuffer<'p>),
}

impl AsRef<[u8]> for ConcatPart<'_> {
    fn as_ref(&self) -> &[u8] {
        match self {
            ConcatPart::Bytes(bytes) => *bytes,
            ConcatPart::Text(text) => text.as_bytes(),
        }
    }
}

impl<'p> From<&'p [u8]> for ConcatPart<'p> {
    fn from(bytes: &'p [u8]) -> Self {
        ConcatPart::Bytes(bytes)
    }
}

impl<'p> From<&'p str> for ConcatPart<'p> {
    fn from(text: &'p str) -> Self {
        ConcatPart::Bytes(text.as_bytes())
    }
}

impl<'p> From<&'p TextBuffer<'p>> for ConcatPart<'p> {
    fn from(text: &'p TextBuffer<'p>) -> Self {
        ConcatPart::Text(text)
    }
}

/// Bytes needed for `parts` joined by a delimiter of `delimiter_len` bytes
pub(crate) fn concat_len<P: AsRef<[u8]>>(parts: &[P], delimiter_len: usize) -> usize {
    let content: usize = parts.iter().map(|part| part.as_ref().len()).sum();
    content + delimiter_len * parts.len().saturating_sub(1)
}

pub(crate) fn concat_into<P: AsRef<[u8]>>(parts: &[P], delimiter: &[u8], total: usize) -> Vec<u8> {
    let mut dest = Vec::with_capacity(total);
    let last = parts.len().saturating_sub(1);

    for (i, part) in parts.iter().enumerate() {
        dest.extend_from_slice(part.as_ref());
        if i != last {
            dest.extend_from_slice(delimiter);
        }
    }

    debug_assert_eq!(dest.len(), total);
    dest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::OwnershipPolicy;

    #[test]
    fn test_concat_with_delimiter() {
        let joined = TextBuffer::from_concat(&["a", "b", "c"], b",");
        assert_eq!(joined.as_bytes(), b"a,b,c");
        assert_eq!(joined.policy(), OwnershipPolicy::OwnedDefault);
    }

    #[test]
    fn test_concat_empty_list() {
        let none: [&str; 0] = [];
        assert_eq!(TextBuffer::from_concat(&none, b"--").len(), 0);
        assert_eq!(TextBuffer::from_concat(&none, b"").len(), 0);
    }

    #[test]
    fn test_concat_single_part_has_no_delimiter() {
        let joined = TextBuffer::from_concat(&["only"], b", ");
        assert_eq!(joined.as_bytes(), b"only");
    }

    #[test]
    fn test_concat_mixed_parts() {
        let source = b"middle".to_vec();
        let borrowed = TextBuffer::borrowed(&source);
        let owned = TextBuffer::from_system_copy(b"end");
        let parts = [
            ConcatPart::from("start"),
            ConcatPart::from(&borrowed),
            ConcatPart::Text(&owned),
            ConcatPart::from(&b""[..]),
        ];

        let joined = TextBuffer::from_concat(&parts, b"|");
        assert_eq!(joined.as_bytes(), b"start|middle|end|");
    }

    #[test]
    fn test_concat_len_matches_output() {
        let parts = ["ab", "", "cde"];
        let total = concat_len(&parts, 2);
        assert_eq!(total, 9);
        assert_eq!(concat_into(&parts, b"::", total), b"ab::::cde");
    }
}
