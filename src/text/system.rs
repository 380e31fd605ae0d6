// WHY: memory handed over by code that talks to the platform allocator directly
// must go back through that same allocator, never through the global one

use std::alloc::{handle_alloc_error, GlobalAlloc, Layout, System};
use std::ptr::{self, NonNull};

/// A byte block allocated through [`std::alloc::System`]
pub struct SystemBlock {
    ptr: NonNull<u8>,
    len: usize,
}

// SAFETY: the block is uniquely owned, like a `Box<[u8]>`
unsafe impl Send for SystemBlock {}

impl SystemBlock {
    /// Allocate `bytes.len()` bytes with the system allocator and copy `bytes` in
    pub fn copy_from(bytes: &[u8]) -> Self {
        let len = bytes.len();
        if len == 0 {
            return Self { ptr: NonNull::dangling(), len: 0 };
        }

        let layout = Self::layout(len);
        // SAFETY: layout has a non-zero size
        let raw = unsafe { System.alloc(layout) };
        let Some(ptr) = NonNull::new(raw) else {
            handle_alloc_error(layout)
        };
        // SAFETY: `ptr` is a fresh allocation of `len` bytes, disjoint from `bytes`
        unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), len) };

        Self { ptr, len }
    }

    /// Adopt a block previously allocated by [`System`]
    ///
    /// # Safety
    /// `ptr` must come from `System.alloc` with a layout of `len` bytes and
    /// alignment 1 (or be dangling when `len == 0`), and must not be freed by
    /// anyone else.
    pub unsafe fn from_raw(ptr: NonNull<u8>, len: usize) -> Self {
        Self { ptr, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `ptr` is valid for `len` bytes for as long as `self` lives
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as above, and `&mut self` guarantees exclusivity
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    fn layout(len: usize) -> Layout {
        match Layout::array::<u8>(len) {
            Ok(layout) => layout,
            Err(_) => panic!("capacity overflow allocating {len} bytes"),
        }
    }
}

impl Drop for SystemBlock {
    fn drop(&mut self) {
        if self.len > 0 {
            // SAFETY: allocated by `System` with exactly this layout
            unsafe { System.dealloc(self.ptr.as_ptr(), Self::layout(self.len)) };
        }
    }
}
