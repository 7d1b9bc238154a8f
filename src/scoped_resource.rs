//! Single-owner wrapper for buffers and handles allocated by the operating system.
//!
//! A [`ScopedResource`] holds a raw pointer together with a zero-sized
//! [`Release`] type naming the routine that frees it. The pointer is freed
//! exactly once, when the wrapper is reset, cleared or dropped, and never when
//! ownership is handed out through [`ScopedResource::into_raw`].
//!
//! On Windows the crate provides:
//! - `LocalFreeRelease` for `LocalAlloc`-family buffers (`FormatMessageW`,
//!   `ConvertSidToStringSidW`),
//! - `NetApiBufferRelease` for NetAPI buffers (`NetUserGetInfo`),
//! - `FreeLibraryRelease` for module handles.

use core::ffi::c_void;
use core::fmt::{self, Debug};
use core::marker::PhantomData;
use core::mem::ManuallyDrop;
use core::ptr::{self, NonNull};

/// Routine releasing a resource handed out by the operating system.
///
/// # Safety
/// Implementors must free `ptr` with the API matching the allocator that
/// produced it. [`ScopedResource`] only calls [`Release::release`] with
/// non-null pointers it exclusively owns, and at most once per pointer.
pub unsafe trait Release {
    /// Frees `ptr`.
    ///
    /// # Safety
    /// `ptr` must have been produced by the allocator this type pairs with and
    /// must not be used after this call.
    unsafe fn release(ptr: NonNull<c_void>);
}

/// Owned pointer to an OS-allocated `T`, freed through `R` on drop.
///
/// The wrapper is move-only: it implements neither `Clone` nor `Copy`, and
/// the raw pointer field keeps it `!Send` and `!Sync`.
pub struct ScopedResource<T, R: Release> {
    ptr: *mut T,
    _release: PhantomData<R>,
}

impl<T, R: Release> ScopedResource<T, R> {
    /// Creates an empty wrapper.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ptr: ptr::null_mut(),
            _release: PhantomData,
        }
    }

    /// Takes ownership of `ptr`.
    ///
    /// # Safety
    /// `ptr` must be null or a pointer that `R` can release, and nobody else
    /// may release it.
    #[inline]
    #[must_use]
    pub const unsafe fn from_raw(ptr: *mut T) -> Self {
        Self {
            ptr,
            _release: PhantomData,
        }
    }

    /// Releases the held resource (if any), then takes ownership of `ptr`.
    ///
    /// Resetting to the pointer already held is a no-op.
    ///
    /// # Safety
    /// Same contract as [`ScopedResource::from_raw`].
    #[inline]
    pub unsafe fn reset(&mut self, ptr: *mut T) -> *mut T {
        if ptr == self.ptr {
            return self.ptr;
        }
        self.clear();
        self.ptr = ptr;
        self.ptr
    }

    /// Releases the held resource and leaves the wrapper empty.
    #[inline]
    pub fn clear(&mut self) {
        if let Some(ptr) = NonNull::new(self.ptr) {
            self.ptr = ptr::null_mut();
            // SAFETY: the pointer was owned by this wrapper and is cleared
            // before the call, so it cannot be released twice.
            unsafe { R::release(ptr.cast()) };
        }
    }

    /// Releases the held resource and returns the slot an OS call can write a
    /// new pointer into.
    ///
    /// Whatever is written through the returned pointer becomes owned by this
    /// wrapper and will be released with `R`.
    #[inline]
    pub fn out_ptr(&mut self) -> *mut *mut T {
        self.clear();
        &raw mut self.ptr
    }

    /// Gives up ownership without releasing the resource.
    #[inline]
    #[must_use]
    pub fn into_raw(self) -> *mut T {
        let this = ManuallyDrop::new(self);
        this.ptr
    }

    /// Moves the resource out, leaving this wrapper empty.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    /// Returns the held pointer without giving up ownership.
    #[inline]
    #[must_use]
    pub const fn as_ptr(&self) -> *mut T {
        self.ptr
    }

    /// `true` when nothing is held.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// Borrows the held value.
    ///
    /// # Safety
    /// The held pointer must point to an initialized `T`.
    #[inline]
    #[must_use]
    pub const unsafe fn as_ref(&self) -> Option<&T> {
        // SAFETY: guaranteed by the caller; the borrow is tied to `self`.
        unsafe { self.ptr.as_ref() }
    }
}

impl<T, R: Release> Default for ScopedResource<T, R> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R: Release> Drop for ScopedResource<T, R> {
    #[inline]
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, R: Release> Debug for ScopedResource<T, R> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScopedResource").field(&self.ptr).finish()
    }
}

#[cfg(windows)]
mod windows {
    use super::Release;
    use core::ffi::c_void;
    use core::ptr::NonNull;
    use windows_sys::Win32::Foundation::{FreeLibrary, LocalFree};
    use windows_sys::Win32::NetworkManagement::NetManagement::NetApiBufferFree;

    /// Frees with `LocalFree`.
    #[derive(Debug)]
    pub enum LocalFreeRelease {}

    // SAFETY: `LocalFree` is the documented release routine for buffers
    // allocated by `FormatMessageW` and `ConvertSidToStringSidW`.
    unsafe impl Release for LocalFreeRelease {
        #[inline]
        unsafe fn release(ptr: NonNull<c_void>) {
            // SAFETY: caller contract of `Release::release`.
            unsafe { LocalFree(ptr.as_ptr()) };
        }
    }

    /// Frees with `NetApiBufferFree`.
    #[derive(Debug)]
    pub enum NetApiBufferRelease {}

    // SAFETY: `NetApiBufferFree` is the documented release routine for
    // buffers returned by `NetUserGetInfo`.
    unsafe impl Release for NetApiBufferRelease {
        #[inline]
        unsafe fn release(ptr: NonNull<c_void>) {
            // SAFETY: caller contract of `Release::release`.
            unsafe { NetApiBufferFree(ptr.as_ptr()) };
        }
    }

    /// Unloads with `FreeLibrary`.
    #[derive(Debug)]
    pub enum FreeLibraryRelease {}

    // SAFETY: module handles from `LoadLibraryExW` are released with `FreeLibrary`.
    unsafe impl Release for FreeLibraryRelease {
        #[inline]
        unsafe fn release(ptr: NonNull<c_void>) {
            // SAFETY: caller contract of `Release::release`.
            unsafe { FreeLibrary(ptr.as_ptr()) };
        }
    }
}

#[cfg(windows)]
pub use windows::{FreeLibraryRelease, LocalFreeRelease, NetApiBufferRelease};

/// `LocalAlloc`-family buffer.
#[cfg(windows)]
pub type Win32Local<T> = ScopedResource<T, LocalFreeRelease>;

/// Buffer returned by a NetAPI call.
#[cfg(windows)]
pub type NetApiBuffer<T> = ScopedResource<T, NetApiBufferRelease>;

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod tests {
    use super::*;
    use std::cell::Cell;

    thread_local! {
        static RELEASED: Cell<usize> = const { Cell::new(0) };
    }

    /// Test allocator: boxes a `u32`, counts every release.
    enum CountingRelease {}

    // SAFETY: only ever paired with pointers from `Box::<u32>::into_raw`.
    unsafe impl Release for CountingRelease {
        unsafe fn release(ptr: NonNull<c_void>) {
            RELEASED.with(|count| count.set(count.get() + 1));
            // SAFETY: produced by `boxed` below.
            drop(unsafe { Box::from_raw(ptr.cast::<u32>().as_ptr()) });
        }
    }

    type Counted = ScopedResource<u32, CountingRelease>;

    fn boxed(value: u32) -> *mut u32 {
        Box::into_raw(Box::new(value))
    }

    fn released() -> usize {
        RELEASED.with(Cell::get)
    }

    #[test]
    fn empty_drop_is_a_no_op() {
        let before = released();
        drop(Counted::new());
        drop(Counted::default());
        assert_eq!(released(), before, "empty wrapper released something");
    }

    #[test]
    fn drop_releases_once() {
        let before = released();
        // SAFETY: fresh box owned by nobody else.
        let owned = unsafe { Counted::from_raw(boxed(7)) };
        // SAFETY: the box is initialized.
        assert_eq!(unsafe { owned.as_ref() }, Some(&7));
        drop(owned);
        assert_eq!(released(), before + 1, "expected exactly one release");
    }

    #[test]
    fn reset_releases_previous_value() {
        let before = released();
        let mut owned = Counted::new();
        // SAFETY: fresh boxes owned by nobody else.
        unsafe {
            owned.reset(boxed(1));
            owned.reset(boxed(2));
        }
        assert_eq!(released(), before + 1, "first value must be released on reset");
        // SAFETY: the box is initialized.
        assert_eq!(unsafe { owned.as_ref() }, Some(&2));
        drop(owned);
        assert_eq!(released(), before + 2, "second value must be released on drop");
    }

    #[test]
    fn reset_to_held_pointer_keeps_it() {
        let before = released();
        // SAFETY: fresh box owned by nobody else.
        let mut owned = unsafe { Counted::from_raw(boxed(8)) };
        let held = owned.as_ptr();
        // SAFETY: the wrapper already owns `held`.
        unsafe { owned.reset(held) };
        assert_eq!(released(), before, "same pointer must not be released");
        // SAFETY: the box is still alive and initialized.
        assert_eq!(unsafe { owned.as_ref() }, Some(&8));
        drop(owned);
        assert_eq!(released(), before + 1, "released exactly once on drop");
    }

    #[test]
    fn into_raw_transfers_ownership() {
        let before = released();
        // SAFETY: fresh box owned by nobody else.
        let owned = unsafe { Counted::from_raw(boxed(3)) };
        let raw = owned.into_raw();
        assert_eq!(released(), before, "into_raw must not release");
        // SAFETY: ownership came back to us through `into_raw`.
        drop(unsafe { Counted::from_raw(raw) });
        assert_eq!(released(), before + 1, "re-wrapped pointer must be released");
    }

    #[test]
    fn take_moves_and_leaves_empty() {
        let before = released();
        // SAFETY: fresh box owned by nobody else.
        let mut source = unsafe { Counted::from_raw(boxed(4)) };
        let moved = source.take();
        assert!(source.is_null(), "source must be empty after take");
        drop(source);
        assert_eq!(released(), before, "empty source must not release");
        drop(moved);
        assert_eq!(released(), before + 1, "moved value released once");
    }

    #[test]
    fn out_ptr_clears_and_adopts_written_pointer() {
        let before = released();
        // SAFETY: fresh box owned by nobody else.
        let mut owned = unsafe { Counted::from_raw(boxed(5)) };
        let slot = owned.out_ptr();
        assert_eq!(released(), before + 1, "out_ptr releases the old value");
        // SAFETY: `slot` points at the wrapper's field; we write a pointer it can release.
        unsafe { slot.write(boxed(6)) };
        // SAFETY: the box is initialized.
        assert_eq!(unsafe { owned.as_ref() }.copied(), Some(6));
        owned.clear();
        owned.clear();
        assert_eq!(released(), before + 2, "clear is idempotent");
    }
}
