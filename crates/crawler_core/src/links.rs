/// Turns an HTML document into the absolute URLs it links to.
///
/// Implementations must tolerate malformed markup (yielding fewer or no
/// links rather than failing) and must not perform network access.
pub trait LinkExtractor {
    fn extract(&self, html: &[u8], base_url: &str) -> Vec<String>;
}
