//! Filesystem capability consumed by the list engine.
//!
//! Every method is best-effort: failures surface as `None` or as
//! incomplete listings, and the engine degrades per its documented
//! fallbacks instead of propagating errors.

use std::io::Read;

/// Result of enumerating a directory's immediate children.
#[derive(Debug, Clone, Default)]
pub struct DirListing {
    /// Child names in enumeration order, as reported by the platform.
    /// Pseudo-entries (`.` and `..`) may be present; the engine skips
    /// them. When enumeration dies partway the names seen so far are
    /// still here.
    pub entries: Vec<String>,
    /// False when enumeration could not be started or stopped on an
    /// error other than end-of-listing.
    pub complete: bool,
}

impl DirListing {
    /// A listing for a directory that could not be enumerated at all.
    pub fn failed() -> Self {
        Self {
            entries: Vec::new(),
            complete: false,
        }
    }
}

/// Platform filesystem primitives the engine depends on.
pub trait Filesystem {
    /// Path separator of this filesystem's string form.
    fn separator(&self) -> char;

    /// Make a path tolerant of extended-length limits. Identity by
    /// default; Windows-semantics implementations apply the `\\?\`
    /// prefix family.
    fn long_compatible(&self, path: String) -> String {
        path
    }

    /// Resolve to a fully qualified absolute path, handling `.`, `..`
    /// and relative forms lexically. `None` when resolution fails
    /// outright.
    fn resolve_full(&self, path: &str) -> Option<String>;

    /// Expand a path to its long, canonically-cased form. Every
    /// component must exist for expansion to succeed; `None` otherwise.
    fn expand_long(&self, path: &str) -> Option<String>;

    /// Whether the path names an existing directory.
    fn is_dir(&self, path: &str) -> bool;

    /// Enumerate immediate children.
    fn read_dir(&self, path: &str) -> DirListing;

    /// Open a file for reading, tolerant of extended-length paths.
    fn open(&self, path: &str) -> std::io::Result<Box<dyn Read>>;
}

/// Production filesystem backed by the platform.
///
/// On Windows, full-path resolution and long-name expansion go through
/// `GetFullPathNameW`/`GetLongPathNameW`, which are also the casing
/// authority for canonical keys. Elsewhere, resolution is lexical over
/// an absolutized path and `canonicalize` plays the long-form role
/// (resolving symbolic indirection the way short-name expansion
/// resolves 8.3 aliases).
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl StdFs {
    /// Create a new platform filesystem.
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for StdFs {
    fn separator(&self) -> char {
        std::path::MAIN_SEPARATOR
    }

    #[cfg(windows)]
    fn long_compatible(&self, path: String) -> String {
        crate::longpath::long_compatible(path)
    }

    #[cfg(windows)]
    fn resolve_full(&self, path: &str) -> Option<String> {
        crate::win::get_full_path_name(path)
    }

    #[cfg(not(windows))]
    fn resolve_full(&self, path: &str) -> Option<String> {
        use std::path::Component;

        if path.is_empty() {
            return None;
        }
        let absolute = std::path::absolute(path).ok()?;

        // std::path::absolute keeps `..` components on POSIX; squash
        // them lexically to match the fully-qualified contract.
        let mut resolved = std::path::PathBuf::new();
        for component in absolute.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                }
                other => resolved.push(other),
            }
        }

        let mut out = resolved.to_str()?.to_owned();
        if path.ends_with('/') && !out.ends_with('/') {
            out.push('/');
        }
        Some(out)
    }

    #[cfg(windows)]
    fn expand_long(&self, path: &str) -> Option<String> {
        crate::win::get_long_path_name(path)
    }

    #[cfg(not(windows))]
    fn expand_long(&self, path: &str) -> Option<String> {
        if path.is_empty() {
            return None;
        }
        let real = std::fs::canonicalize(path).ok()?;
        let mut out = real.to_str()?.to_owned();
        if path.ends_with('/') && !out.ends_with('/') {
            out.push('/');
        }
        Some(out)
    }

    fn is_dir(&self, path: &str) -> bool {
        std::path::Path::new(path).is_dir()
    }

    fn read_dir(&self, path: &str) -> DirListing {
        let iter = match std::fs::read_dir(path) {
            Ok(iter) => iter,
            Err(_) => return DirListing::failed(),
        };
        let mut entries = Vec::new();
        for entry in iter {
            match entry {
                Ok(entry) => match entry.file_name().into_string() {
                    Ok(name) => entries.push(name),
                    // A name we cannot represent ends the enumeration
                    // the way a platform error would.
                    Err(_) => {
                        return DirListing {
                            entries,
                            complete: false,
                        };
                    }
                },
                Err(_) => {
                    return DirListing {
                        entries,
                        complete: false,
                    };
                }
            }
        }
        DirListing {
            entries,
            complete: true,
        }
    }

    fn open(&self, path: &str) -> std::io::Result<Box<dyn Read>> {
        Ok(Box::new(std::fs::File::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_listing_failed() {
        let listing = DirListing::failed();
        assert!(listing.entries.is_empty());
        assert!(!listing.complete);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_resolve_full_squashes_dots() {
        let fs = StdFs::new();
        let resolved = fs.resolve_full("/tmp/a/./b/../c").unwrap();
        assert_eq!(resolved, "/tmp/a/c");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_resolve_full_keeps_trailing_separator() {
        let fs = StdFs::new();
        assert_eq!(fs.resolve_full("/tmp/a/").unwrap(), "/tmp/a/");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_resolve_full_never_escapes_root() {
        let fs = StdFs::new();
        assert_eq!(fs.resolve_full("/../..").unwrap(), "/");
    }

    #[test]
    fn test_expand_long_requires_existence() {
        let fs = StdFs::new();
        assert!(fs.expand_long("").is_none());
        assert!(
            fs.expand_long("definitely-not-an-existing-path-sumwalk")
                .is_none()
        );
    }
}
