//! Thin wrappers over the Win32 path APIs.
//!
//! `GetFullPathNameW` is the lexical resolution authority and
//! `GetLongPathNameW` the 8.3-expansion and on-disk-casing authority;
//! both are called with buffers large enough for extended-length paths.

use windows::Win32::Storage::FileSystem::{GetFullPathNameW, GetLongPathNameW};
use windows::core::PCWSTR;

/// Enough for any extended-length path (32767 UTF-16 units).
const WIDE_BUF: usize = 0x8000;

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Resolve to a fully qualified path. `None` on API failure.
pub(crate) fn get_full_path_name(path: &str) -> Option<String> {
    let wide = to_wide(path);
    let mut buf = vec![0u16; WIDE_BUF];
    let len = unsafe { GetFullPathNameW(PCWSTR(wide.as_ptr()), Some(&mut buf), None) } as usize;
    if len == 0 || len > buf.len() {
        return None;
    }
    Some(String::from_utf16_lossy(&buf[..len]))
}

/// Expand a path to its long form. Requires every component to exist;
/// `None` on API failure.
pub(crate) fn get_long_path_name(path: &str) -> Option<String> {
    let wide = to_wide(path);
    let mut buf = vec![0u16; WIDE_BUF];
    let len = unsafe { GetLongPathNameW(PCWSTR(wide.as_ptr()), Some(&mut buf)) } as usize;
    if len == 0 || len > buf.len() {
        return None;
    }
    Some(String::from_utf16_lossy(&buf[..len]))
}
