//! Canonical path normalization.

use crate::fs::Filesystem;

/// Normalize and un-shorten a path into its canonical absolute form.
///
/// Long-name expansion requires every component on the way to exist,
/// which may not be the case (a manifest can declare files that are
/// gone, a selection can be `C:\FOLDER~1\SUBFOL~1` where only the first
/// component exists). So after full-path resolution the expansion is
/// attempted on successively shorter prefixes, from the last segment
/// boundary backwards; the first prefix that expands is recombined with
/// the untouched suffix. When nothing expands, the resolved path is
/// returned as-is; when even resolution fails, the length-tolerant form
/// of the input is returned. This function never fails and never
/// returns an empty string for a non-empty input.
pub fn normalize_path(fs: &dyn Filesystem, path: &str) -> String {
    let long_compat = fs.long_compatible(path.to_owned());
    let full = match fs.resolve_full(&long_compat) {
        Some(full) => full,
        None => return long_compat,
    };

    let separator = fs.separator();
    let mut end = full.len();
    loop {
        if let Some(expanded) = fs.expand_long(&full[..end]) {
            let mut result = expanded;
            result.push_str(&full[end..]);
            return fs.long_compatible(result);
        }
        match full[..end].rfind(separator) {
            Some(position) => end = position,
            None => return fs.long_compatible(full),
        }
    }
}
