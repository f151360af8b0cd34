use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// How far into the document to look for a `<meta charset>` declaration.
const META_PRESCAN_BYTES: usize = 1024;

/// Decode raw page bytes into text using: BOM -> meta charset -> chardetng fallback.
///
/// Never fails; undecodable sequences become U+FFFD.
pub fn decode_html(bytes: &[u8]) -> Cow<'_, str> {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| meta_charset(bytes))
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });
    let (text, _, _) = encoding.decode(bytes);
    text
}

/// Finds a `charset=` declared inside a `<meta ...>` tag near the top of the
/// document. A declared UTF-16 is read as UTF-8: an ASCII-compatible prescan
/// cannot have matched real UTF-16 text.
fn meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_PRESCAN_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let encoding = head
        .match_indices("<meta")
        .filter_map(|(start, _)| {
            let tag = &head[start..];
            let tag = &tag[..tag.find('>').unwrap_or(tag.len())];
            charset_label(tag)
        })
        .find_map(|label| Encoding::for_label(label.as_bytes()))?;
    if encoding == UTF_16LE || encoding == UTF_16BE {
        return Some(UTF_8);
    }
    Some(encoding)
}

fn charset_label(tag: &str) -> Option<String> {
    let start = tag.find("charset=")? + "charset=".len();
    let label: String = tag[start..]
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| !matches!(c, '"' | '\'' | ';' | '/') && !c.is_whitespace())
        .collect();
    (!label.is_empty()).then_some(label)
}
