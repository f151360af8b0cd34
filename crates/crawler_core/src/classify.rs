use crate::transfer::TransferResponse;

/// The 8-byte magic prefix of every PNG file.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

const CT_PNG: &str = "image/png";
const CT_HTML: &str = "text/html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Drop,
    IsPng,
    IsHtml,
}

/// True when `bytes` starts with [`PNG_SIGNATURE`], whatever the declared content type.
pub fn has_png_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(&PNG_SIGNATURE)
}

/// Decide what to do with a completed response from its status and content type.
///
/// Media types are matched as case-insensitive substrings, so parameters such
/// as `; charset=utf-8` do not matter.
pub fn classify(response: &TransferResponse) -> Classification {
    if response.status >= 400 {
        return Classification::Drop;
    }
    let Some(content_type) = response.content_type.as_deref() else {
        return Classification::Drop;
    };
    let content_type = content_type.to_ascii_lowercase();
    if content_type.contains(CT_PNG) {
        Classification::IsPng
    } else if content_type.contains(CT_HTML) {
        Classification::IsHtml
    } else {
        Classification::Drop
    }
}
