//! Byte-to-text decoding for input documents.
//!
//! A byte order mark wins, then the `encoding` label of the XML declaration,
//! then UTF-8. Undecodable sequences become U+FFFD.

use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

/// How far into the file the XML declaration is looked for
const DECLARATION_SCAN_LEN: usize = 256;

/// Decode raw document bytes into text
pub fn decode_document(bytes: &[u8]) -> String {
    let fallback = declared_encoding(bytes).unwrap_or(UTF_8);
    let (text, used, had_errors) = fallback.decode(bytes);

    if used != UTF_8 {
        debug!("Decoded document as {}", used.name());
    }
    if had_errors {
        warn!(
            "Document contains bytes that are not valid {}, replaced with U+FFFD",
            used.name()
        );
    }

    text.into_owned()
}

/// Read the `encoding="..."` label from an ASCII-compatible XML declaration
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(DECLARATION_SCAN_LEN)];
    let head = std::str::from_utf8(head)
        .or_else(|e| std::str::from_utf8(&head[..e.valid_up_to()]))
        .ok()?;

    let declaration = head.strip_prefix("<?xml")?;
    let declaration = &declaration[..declaration.find("?>")?];
    let rest = &declaration[declaration.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();

    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let rest = &rest[1..];
    let label = &rest[..rest.find(quote)?];

    // A declaration readable as ASCII rules out UTF-16, which maps to UTF-8 here
    Encoding::for_label(label.as_bytes()).map(Encoding::output_encoding)
}
