//! Pure string helpers for Windows-style path handling.

/// Longest path the classic Win32 APIs accept without an
/// extended-length prefix.
const MAX_CLASSIC_PATH: usize = 260;

/// Make a Windows-style path tolerant of extended-length limits by
/// applying the `\\?\` (or `\\?\UNC\`) prefix once it exceeds the
/// classic limit. Short, relative, and already-prefixed paths pass
/// through unchanged.
pub fn long_compatible(path: String) -> String {
    if path.len() < MAX_CLASSIC_PATH || path.starts_with(r"\\?\") {
        return path;
    }
    if let Some(rest) = path.strip_prefix(r"\\") {
        return format!(r"\\?\UNC\{rest}");
    }
    if is_drive_absolute(&path) {
        return format!(r"\\?\{path}");
    }
    path
}

fn is_drive_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
}

/// Byte offset where the file-name portion of `path` begins, i.e. just
/// past the last separator. With a `\` separator the `/` alternate is
/// honored too, as the Win32 path helpers do.
pub fn file_name_start(path: &str, separator: char) -> usize {
    let last = if separator == '\\' {
        path.rfind(['\\', '/'])
    } else {
        path.rfind(separator)
    };
    last.map_or(0, |index| index + 1)
}

/// Extension of the file-name portion (text after its last `.`),
/// without the dot. `None` when the name carries no dot at all; a
/// trailing dot yields an empty extension.
pub fn extension_of(path: &str, separator: char) -> Option<&str> {
    let name = &path[file_name_start(path, separator)..];
    name.rfind('.').map(|index| &name[index + 1..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_paths_pass_through() {
        assert_eq!(long_compatible(r"C:\data\a.txt".to_owned()), r"C:\data\a.txt");
    }

    #[test]
    fn test_overlong_drive_path_gets_prefix() {
        let long = format!(r"C:\{}", "a".repeat(300));
        let compatible = long_compatible(long.clone());
        assert_eq!(compatible, format!(r"\\?\{long}"));
        // Applying it again changes nothing.
        assert_eq!(long_compatible(compatible.clone()), compatible);
    }

    #[test]
    fn test_overlong_unc_path_gets_unc_prefix() {
        let long = format!(r"\\server\share\{}", "a".repeat(300));
        let compatible = long_compatible(long);
        assert!(compatible.starts_with(r"\\?\UNC\server\share\"));
    }

    #[test]
    fn test_overlong_relative_path_is_left_alone() {
        let long = "a".repeat(300);
        assert_eq!(long_compatible(long.clone()), long);
    }

    #[test]
    fn test_file_name_start() {
        assert_eq!(file_name_start(r"C:\data\sums.sha256", '\\'), 8);
        assert_eq!(file_name_start("sums.sha256", '\\'), 0);
        assert_eq!(file_name_start(r"C:/data/sums.sha256", '\\'), 8);
        assert_eq!(file_name_start("/tmp/a", '/'), 5);
        // A backslash is an ordinary name character on `/` filesystems.
        assert_eq!(file_name_start(r"a\b", '/'), 0);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(r"C:\data\sums.sha256", '\\'), Some("sha256"));
        assert_eq!(extension_of(r"C:\data.d\noext", '\\'), None);
        assert_eq!(extension_of(r"C:\data\trailing.", '\\'), Some(""));
        assert_eq!(extension_of(r"C:\data\.hidden", '\\'), Some("hidden"));
    }
}
