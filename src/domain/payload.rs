//! Export payload returned by the data service

/// Markers the data service embeds in a 200 response to report a business error
pub const DEFAULT_ERROR_MARKERS: [&str; 2] = ["ERROR:", "Data can only be exported"];

/// Raw export body
///
/// The content is opaque; nothing here parses the CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    body: String,
}

impl ExportPayload {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.body
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.body.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn into_string(self) -> String {
        self.body
    }

    /// Returns the first marker found in the body, if any
    pub fn find_error_marker<'a, S: AsRef<str>>(&self, markers: &'a [S]) -> Option<&'a str> {
        find_error_marker(&self.body, markers)
    }
}

/// Plain substring match of `body` against `markers`, in marker order
pub fn find_error_marker<'a, S: AsRef<str>>(body: &str, markers: &'a [S]) -> Option<&'a str> {
    markers
        .iter()
        .map(AsRef::as_ref)
        .filter(|marker| !marker.is_empty())
        .find(|marker| body.contains(marker))
}

/// First `limit` characters of `text`, trimmed, with `...` when cut
pub fn excerpt(text: &str, limit: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("ERROR: no data", Some("ERROR:") ; "error prefix")]
    #[test_case("id,name\n1,x\nERROR: truncated", Some("ERROR:") ; "error mid body")]
    #[test_case("Data can only be exported for the last 30 days", Some("Data can only be exported") ; "range limit")]
    #[test_case("id,name\n1,error\n", None ; "lowercase word is data")]
    #[test_case("", None ; "empty")]
    fn test_default_markers(body: &str, expected: Option<&str>) {
        assert_eq!(find_error_marker(body, &DEFAULT_ERROR_MARKERS), expected);
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("  short  ", 200), "short");
        assert_eq!(excerpt("abcdef", 3), "abc...");
        assert_eq!(excerpt("ééé", 2), "éé...");
    }

    #[test]
    fn test_empty_marker_never_matches() {
        let markers = vec![String::new()];
        assert_eq!(find_error_marker("anything", &markers), None);
    }

    #[test]
    fn test_payload_accessors() {
        let payload = ExportPayload::new("a,b\n1,2\n");
        assert_eq!(payload.len(), 8);
        assert!(!payload.is_empty());
        assert_eq!(payload.as_bytes(), b"a,b\n1,2\n");
        assert_eq!(payload.find_error_marker(&DEFAULT_ERROR_MARKERS), None);
    }
}
