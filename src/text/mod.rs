// WHY: one value type for bytes that may live in the heap, in a system-allocated
// block, in a mapping, or in somebody else's storage; release is decided by the tag

mod system;
pub(crate) mod wipe;

use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io;
use std::ops::Deref;
use std::ptr::NonNull;

use memmap2::{MmapMut, MmapOptions};
use regex_automata::meta::Regex;
use tracing::{debug, trace};

use crate::cursor::{LineCursor, Pattern, PatternCursor};
use crate::error::TextError;
use crate::save::{save_bytes, SaveTarget};

pub use system::SystemBlock;
use wipe::explicit_memzero;

/// How a buffer's memory was obtained, and therefore how it is released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnershipPolicy {
    /// Someone else's storage; nothing to release
    Borrowed,
    /// Heap memory from the global allocator
    OwnedDefault,
    /// Heap memory from the platform allocator
    OwnedSystem,
    /// A memory-mapped region; released by unmapping
    Mapped,
}

impl OwnershipPolicy {
    pub fn is_owned(self) -> bool {
        !matches!(self, OwnershipPolicy::Borrowed)
    }
}

enum Storage<'a> {
    Borrowed(&'a [u8]),
    OwnedDefault(Box<[u8]>),
    OwnedSystem(SystemBlock),
    Mapped(MmapMut),
}

/// A byte range together with the policy that owns (or does not own) it.
///
/// Owned buffers are `TextBuffer<'static>`. Borrowed buffers and spans carry the
/// lifetime of the bytes they point into, so the compiler rejects any use after
/// the parent is gone.
pub struct TextBuffer<'a> {
    storage: Storage<'a>,
    /// Zero the region before it is released
    secure_wipe: bool,
}

impl TextBuffer<'static> {
    /// Copy `source` into a fresh `OwnedDefault` buffer
    ///
    /// An empty source does not allocate.
    pub fn from_bytes(source: &[u8]) -> Self {
        Self::owned(source.into())
    }

    pub fn empty() -> Self {
        Self::owned(Box::default())
    }

    /// Adopt an existing allocation without copying
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self::owned(bytes.into_boxed_slice())
    }

    /// Copy `source` into memory obtained from the system allocator
    pub fn from_system_copy(source: &[u8]) -> Self {
        Self::from_system_block(SystemBlock::copy_from(source))
    }

    /// Adopt a block allocated by [`std::alloc::System`]
    ///
    /// # Safety
    /// Same contract as [`SystemBlock::from_raw`].
    pub unsafe fn from_system_raw(ptr: NonNull<u8>, len: usize) -> Self {
        Self::from_system_block(SystemBlock::from_raw(ptr, len))
    }

    pub fn from_system_block(block: SystemBlock) -> Self {
        debug!("Adopting {} bytes from the system allocator", block.len());
        Self {
            storage: Storage::OwnedSystem(block),
            secure_wipe: false,
        }
    }

    /// Adopt a writable mapping; it is unmapped when the buffer is dropped
    pub fn from_mmap(map: MmapMut) -> Self {
        debug!("Adopting mapped region of {} bytes", map.len());
        Self {
            storage: Storage::Mapped(map),
            secure_wipe: false,
        }
    }

    /// Map `file` privately (copy-on-write), so wiping never touches the file itself
    ///
    /// Empty files cannot be mapped and produce the empty owned buffer instead.
    pub fn map_file(file: &File) -> io::Result<Self> {
        let len = file.metadata()?.len();
        if len == 0 {
            return Ok(Self::empty());
        }

        // SAFETY: the mapping is private; the caller must not truncate the file
        // while the buffer is alive
        let map = unsafe { MmapOptions::new().map_copy(file)? };
        Ok(Self::from_mmap(map))
    }

    /// Join `parts` with `delimiter` into one freshly owned buffer
    ///
    /// The result is measured first and filled second, so exactly one
    /// allocation happens and no delimiter follows the final part.
    pub fn from_concat<P: AsRef<[u8]>>(parts: &[P], delimiter: &[u8]) -> Self {
        let total = crate::concat::concat_len(parts, delimiter.len());
        let bytes = crate::concat::concat_into(parts, delimiter, total);
        debug!("Concatenated {} parts into {} bytes", parts.len(), total);
        Self::from_vec(bytes)
    }

    fn owned(bytes: Box<[u8]>) -> Self {
        Self {
            storage: Storage::OwnedDefault(bytes),
            secure_wipe: false,
        }
    }
}

impl<'a> TextBuffer<'a> {
    /// Reference `source` directly, without copying
    pub fn borrowed(source: &'a [u8]) -> Self {
        Self {
            storage: Storage::Borrowed(source),
            secure_wipe: false,
        }
    }

    /// Copy `source` when `copy` is set, otherwise borrow it
    pub fn new(source: &'a [u8], copy: bool) -> Self {
        if copy {
            TextBuffer::from_bytes(source)
        } else {
            TextBuffer::borrowed(source)
        }
    }

    pub fn policy(&self) -> OwnershipPolicy {
        match self.storage {
            Storage::Borrowed(_) => OwnershipPolicy::Borrowed,
            Storage::OwnedDefault(_) => OwnershipPolicy::OwnedDefault,
            Storage::OwnedSystem(_) => OwnershipPolicy::OwnedSystem,
            Storage::Mapped(_) => OwnershipPolicy::Mapped,
        }
    }

    pub fn is_owned(&self) -> bool {
        self.policy().is_owned()
    }

    pub fn secure_wipe(&self) -> bool {
        self.secure_wipe
    }

    /// Request zeroing before release. Borrowed buffers have nothing to release.
    pub fn set_secure_wipe(&mut self, enabled: bool) -> Result<(), TextError> {
        if enabled && !self.is_owned() {
            return Err(TextError::SecureWipeOnBorrowed);
        }
        self.secure_wipe = enabled;
        Ok(())
    }

    pub fn with_secure_wipe(mut self) -> Result<Self, TextError> {
        self.set_secure_wipe(true)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.storage {
            Storage::Borrowed(bytes) => *bytes,
            Storage::OwnedDefault(bytes) => &bytes[..],
            Storage::OwnedSystem(block) => block.as_slice(),
            Storage::Mapped(map) => &map[..],
        }
    }

    /// Start address of the bytes, for diagnostics and interop only
    pub fn as_ptr(&self) -> *const u8 {
        self.as_bytes().as_ptr()
    }

    /// Byte at 1-based `pos`, or `None` when out of range
    pub fn byte_at(&self, pos: i64) -> Option<u8> {
        let index = usize::try_from(pos).ok()?.checked_sub(1)?;
        self.as_bytes().get(index).copied()
    }

    /// Every byte as an unsigned value, in order
    pub fn to_byte_array(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// A copy with a lifetime independent of this buffer
    pub fn to_owned_copy(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Pure byte comparison; lengths are checked before any byte is read
    pub fn equals(&self, other: &TextBuffer<'_>) -> bool {
        let (a, b) = (self.as_bytes(), other.as_bytes());
        a.len() == b.len() && a == b
    }

    /// Make sure this buffer owns its bytes. Owned buffers are left alone;
    /// borrowed ones are copied into the global heap.
    pub fn take_ownership(&mut self) {
        if let Storage::Borrowed(bytes) = self.storage {
            debug!("Taking ownership of {} borrowed bytes", bytes.len());
            self.storage = Storage::OwnedDefault(bytes.into());
        }
    }

    /// Detach from the source lifetime, copying only if the bytes are borrowed
    pub fn into_owned(mut self) -> TextBuffer<'static> {
        let secure_wipe = std::mem::take(&mut self.secure_wipe);
        let storage = match std::mem::replace(&mut self.storage, Storage::Borrowed(&[])) {
            Storage::Borrowed(bytes) => Storage::OwnedDefault(bytes.into()),
            Storage::OwnedDefault(bytes) => Storage::OwnedDefault(bytes),
            Storage::OwnedSystem(block) => Storage::OwnedSystem(block),
            Storage::Mapped(map) => Storage::Mapped(map),
        };
        TextBuffer { storage, secure_wipe }
    }

    /// Zero the whole region in place, keeping ownership and length
    pub fn wipe(&mut self) -> Result<(), TextError> {
        let region = self.owned_region_mut().ok_or(TextError::WipeNotOwned)?;
        explicit_memzero(region);
        Ok(())
    }

    /// Borrowed view of `len` bytes (or the rest) starting at 1-based `start`
    pub fn span(&self, start: i64, len: Option<usize>) -> Result<TextBuffer<'_>, TextError> {
        let bytes = self.as_bytes();
        let offset = usize::try_from(start)
            .ok()
            .filter(|&s| s >= 1 && s <= bytes.len())
            .map(|s| s - 1)
            .ok_or(TextError::SpanStartOutOfRange { start, len: bytes.len() })?;

        let remaining = bytes.len() - offset;
        let len = len.unwrap_or(remaining);
        if len > remaining {
            return Err(TextError::SpanLengthOutOfRange { len, remaining });
        }

        Ok(TextBuffer::borrowed(&bytes[offset..offset + len]))
    }

    /// Lazy iterator over lines, see [`LineCursor`]
    pub fn lines(&self, stringify: bool) -> LineCursor<'_> {
        LineCursor::new(self, stringify)
    }

    /// Lazy iterator over the pieces between matches of `pattern`
    pub fn split<P: Pattern>(&self, pattern: P, stringify: bool) -> PatternCursor<'_, P> {
        PatternCursor::new(self, pattern, stringify)
    }

    /// Compile `pattern` and split on it
    pub fn split_str(
        &self,
        pattern: &str,
        stringify: bool,
    ) -> Result<PatternCursor<'_, Regex>, TextError> {
        let regex = Regex::new(pattern).map_err(|e| TextError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(self.split(regex, stringify))
    }

    /// Write every byte to `target` in one call
    pub fn save_to_file(&self, target: SaveTarget<'_>) -> io::Result<()> {
        save_bytes(self.as_bytes(), target)
    }

    /// Alias of [`TextBuffer::save_to_file`]
    pub fn write(&self, target: SaveTarget<'_>) -> io::Result<()> {
        self.save_to_file(target)
    }

    fn owned_region_mut(&mut self) -> Option<&mut [u8]> {
        match &mut self.storage {
            Storage::Borrowed(_) => None,
            Storage::OwnedDefault(bytes) => Some(&mut bytes[..]),
            Storage::OwnedSystem(block) => Some(block.as_mut_slice()),
            Storage::Mapped(map) => Some(&mut map[..]),
        }
    }
}

impl Drop for TextBuffer<'_> {
    fn drop(&mut self) {
        let policy = self.policy();
        let wipe = self.secure_wipe;

        if wipe {
            if let Some(region) = self.owned_region_mut() {
                explicit_memzero(region);
            }
        }

        // The storage field releases itself right after this: the box through the
        // global allocator, the block through `System`, the mapping by unmapping.
        match policy {
            OwnershipPolicy::Borrowed => {}
            OwnershipPolicy::OwnedDefault
            | OwnershipPolicy::OwnedSystem
            | OwnershipPolicy::Mapped => {
                trace!(?policy, len = self.len(), wipe, "Releasing text buffer");
            }
        }
    }
}

impl Clone for TextBuffer<'_> {
    /// Borrowed buffers clone the reference; owned buffers clone into a fresh
    /// `OwnedDefault` copy that keeps the wipe flag
    fn clone(&self) -> Self {
        match self.storage {
            Storage::Borrowed(bytes) => TextBuffer::borrowed(bytes),
            _ => TextBuffer {
                storage: Storage::OwnedDefault(self.as_bytes().into()),
                secure_wipe: self.secure_wipe,
            },
        }
    }
}

impl Deref for TextBuffer<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for TextBuffer<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for TextBuffer<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for TextBuffer<'_> {}

// Contents are left out on purpose: buffers flagged for wiping may hold secrets
impl fmt::Debug for TextBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("policy", &self.policy())
            .field("len", &self.len())
            .field("secure_wipe", &self.secure_wipe)
            .finish()
    }
}

impl fmt::Display for TextBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl From<Vec<u8>> for TextBuffer<'static> {
    fn from(bytes: Vec<u8>) -> Self {
        TextBuffer::from_vec(bytes)
    }
}

impl From<String> for TextBuffer<'static> {
    fn from(text: String) -> Self {
        TextBuffer::from_vec(text.into_bytes())
    }
}
