//! Checksum-manifest text parser for sumwalk.
//!
//! Implements the [`SumfileParser`](sumwalk_core::SumfileParser) seam
//! the list engine consumes. The parser recognizes the common text
//! dialects of checksum files:
//!
//! - GNU coreutils: `<hex>  <name>`, with an optional `*` binary marker
//! - bare digests: `<hex>` alone on a line
//! - BSD tags: `NAME (<name>) = <hex>`
//!
//! Algorithm binding is not the parser's business; the engine derives it
//! from the manifest's file extension. The parser only recovers
//! (filename, digest) pairs, returning an empty list for anything that
//! does not look like a manifest.

mod parser;

pub use parser::LineSumfileParser;

// Re-export core types for convenience
pub use sumwalk_core::{SumfileEntry, SumfileParser};
