use core::ffi::c_void;
use core::ptr;
use core::slice;

use widestring::u16cstr;
use windows_sys::Win32::System::Diagnostics::Debug::{
    FORMAT_MESSAGE_ALLOCATE_BUFFER, FORMAT_MESSAGE_FROM_HMODULE, FORMAT_MESSAGE_FROM_SYSTEM,
    FORMAT_MESSAGE_IGNORE_INSERTS, FormatMessageW,
};
use windows_sys::Win32::System::LibraryLoader::{LOAD_LIBRARY_AS_DATAFILE, LoadLibraryExW};

use super::{is_netapi_status, trim_message};
use crate::scoped_resource::{FreeLibraryRelease, ScopedResource, Win32Local};

// MAKELANGID(LANG_NEUTRAL, SUBLANG_DEFAULT)
const LANG_USER_DEFAULT: u32 = 0x0400;

type Module = ScopedResource<c_void, FreeLibraryRelease>;

/// Loads `netmsg.dll` as a message-table data file.
fn load_netmsg() -> Option<Module> {
    // SAFETY: the file name is a static terminated string; the returned handle
    // (or null) is owned by the wrapper and released with `FreeLibrary`.
    let module = unsafe {
        Module::from_raw(LoadLibraryExW(
            u16cstr!("netmsg.dll").as_ptr(),
            ptr::null_mut(),
            LOAD_LIBRARY_AS_DATAFILE,
        ))
    };
    (!module.is_null()).then_some(module)
}

pub(super) fn format_message(code: u32) -> Option<String> {
    let module = is_netapi_status(code).then(load_netmsg).flatten();
    let mut flags =
        FORMAT_MESSAGE_ALLOCATE_BUFFER | FORMAT_MESSAGE_FROM_SYSTEM | FORMAT_MESSAGE_IGNORE_INSERTS;
    if module.is_some() {
        flags |= FORMAT_MESSAGE_FROM_HMODULE;
    }
    let source = module
        .as_ref()
        .map_or(ptr::null(), |module| module.as_ptr().cast_const());

    let mut buffer = Win32Local::<u16>::new();
    // SAFETY: with FORMAT_MESSAGE_ALLOCATE_BUFFER the buffer argument is the
    // address of a pointer that receives a `LocalAlloc` buffer, which is what
    // `out_ptr` hands out. `source` is null or a live module handle.
    let len = unsafe {
        FormatMessageW(
            flags,
            source,
            code,
            LANG_USER_DEFAULT,
            buffer.out_ptr().cast::<u16>(),
            0,
            ptr::null(),
        )
    };
    if len == 0 || buffer.is_null() {
        return None;
    }
    // SAFETY: on success FormatMessageW wrote `len` code units (terminator
    // excluded) into the buffer owned by `buffer`, alive until the end of scope.
    let wide = unsafe { slice::from_raw_parts(buffer.as_ptr(), len as usize) };
    trim_message(wide)
}
