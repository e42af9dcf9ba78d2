//! Line-oriented checksum file parsing.

use std::io::Read;

use sumwalk_core::{SumfileEntry, SumfileParser};

/// Upper bound on how much of a candidate manifest is read.
const MAX_SUMFILE_BYTES: u64 = 4 * 1024 * 1024;

/// Shortest digest accepted, in hex digits (CRC32-sized).
const MIN_HEX_DIGITS: usize = 8;

/// Longest digest accepted, in hex digits (SHA-512-sized).
const MAX_HEX_DIGITS: usize = 128;

/// Parser for the common text checksum dialects.
///
/// Strict per stream: a single non-comment line that fails to parse
/// disqualifies the whole input, so arbitrary selected text files are
/// not misread as manifests. The empty result is the "not a manifest"
/// signal, never an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineSumfileParser;

impl LineSumfileParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }
}

impl SumfileParser for LineSumfileParser {
    fn parse(&self, reader: &mut dyn Read) -> Vec<SumfileEntry> {
        let mut buf = Vec::new();
        if reader.take(MAX_SUMFILE_BYTES).read_to_end(&mut buf).is_err() {
            return Vec::new();
        }
        if buf.contains(&0) {
            return Vec::new();
        }
        let Ok(text) = std::str::from_utf8(&buf) else {
            return Vec::new();
        };
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut entries = Vec::new();
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            match parse_line(line) {
                Some(entry) => entries.push(entry),
                None => return Vec::new(),
            }
        }
        entries
    }
}

/// Parse one non-comment line. Coreutils form is tried first, BSD tag
/// form second; ambiguous lines (a valid hex token up front) resolve to
/// coreutils.
fn parse_line(line: &str) -> Option<SumfileEntry> {
    if let Some(entry) = parse_coreutils_line(line) {
        return Some(entry);
    }
    parse_bsd_line(line)
}

/// `<hex>` or `<hex>  [*]<name>`.
fn parse_coreutils_line(line: &str) -> Option<SumfileEntry> {
    let (token, rest) = match line.find(char::is_whitespace) {
        Some(pos) => (&line[..pos], line[pos..].trim_start()),
        None => (line, ""),
    };
    let digest = decode_hex(token)?;
    let filename = rest.strip_prefix('*').unwrap_or(rest);
    Some(SumfileEntry::new(filename, digest))
}

/// `NAME (<name>) = <hex>`.
fn parse_bsd_line(line: &str) -> Option<SumfileEntry> {
    let eq = line.rfind('=')?;
    let digest = decode_hex(line[eq + 1..].trim())?;
    let left = line[..eq].trim_end();
    let left = left.strip_suffix(')')?;
    let open = left.find('(')?;
    let tag = left[..open].trim();
    if tag.is_empty()
        || !tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return None;
    }
    Some(SumfileEntry::new(left[open + 1..].trim(), digest))
}

/// Decode a hex digest token of plausible length.
fn decode_hex(token: &str) -> Option<Vec<u8>> {
    if token.len() % 2 != 0 || !(MIN_HEX_DIGITS..=MAX_HEX_DIGITS).contains(&token.len()) {
        return None;
    }
    token
        .as_bytes()
        .chunks(2)
        .map(|pair| Some(hex_val(pair[0])? << 4 | hex_val(pair[1])?))
        .collect()
}

fn hex_val(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
