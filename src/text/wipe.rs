use std::ptr;
use std::sync::atomic::{compiler_fence, Ordering};

/// Zero `bytes` with volatile stores so the writes survive dead-store elimination
/// even when the region is freed right afterwards
pub(crate) fn explicit_memzero(bytes: &mut [u8]) {
    for byte in bytes.iter_mut() {
        // SAFETY: `byte` is a valid, exclusive reference
        unsafe { ptr::write_volatile(byte, 0) };
    }
    compiler_fence(Ordering::SeqCst);
}
