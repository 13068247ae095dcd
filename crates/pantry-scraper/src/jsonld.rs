//! Structured-data block scanner.
//!
//! Pages are treated as plain text: recipe sites are frequently non-conformant
//! HTML, so `<script type="application/ld+json">` tags are located with a regex
//! over the raw markup instead of a DOM parse.

use std::iter::FusedIterator;
use std::sync::LazyLock;

use regex::{CaptureMatches, Regex};
use serde_json::Value;

/// Matches a JSON-LD script tag and captures its inner content. The `type`
/// value may be double-quoted, single-quoted or bare, in any letter case.
static JSONLD_SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<script[^>]*\btype\s*=\s*["']?application/ld\+json["']?[^>]*>(.*?)</script\s*>"#,
    )
    .expect("valid json-ld script regex")
});

/// Lazy iterator over the inner text of each JSON-LD script tag, in document order.
pub struct JsonLdBlocks<'h> {
    captures: CaptureMatches<'static, 'h>,
}

impl<'h> Iterator for JsonLdBlocks<'h> {
    type Item = &'h str;

    fn next(&mut self) -> Option<Self::Item> {
        self.captures
            .by_ref()
            .find_map(|cap| cap.get(1))
            .map(|m| m.as_str())
    }
}

impl FusedIterator for JsonLdBlocks<'_> {}

/// Scan `html` for JSON-LD blocks. Never fails; a page without any yields an
/// empty iterator.
#[must_use]
pub fn scan_jsonld_blocks(html: &str) -> JsonLdBlocks<'_> {
    JsonLdBlocks {
        captures: JSONLD_SCRIPT_RE.captures_iter(html),
    }
}

/// Parse one candidate block into a JSON value after [`sanitize_json`].
///
/// # Errors
///
/// Returns the `serde_json` error when the block is not valid JSON even after
/// sanitizing. Callers skip such blocks.
pub fn parse_block(block: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(&sanitize_json(block.trim()))
}

/// Repair a common JSON-LD authoring fault: raw control characters inside
/// string literals. Newlines, carriage returns and tabs are escaped; any other
/// control character inside a string is dropped. Text outside strings is
/// left untouched.
pub(crate) fn sanitize_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in json.chars() {
        if !in_string {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
            continue;
        }

        if escaped {
            escaped = false;
            out.push(c);
            continue;
        }

        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '"' => {
                in_string = false;
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }

    out
}
