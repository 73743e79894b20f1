//! Response snapshot type

/// Status text of the synthesized offline navigation response.
pub const OFFLINE_STATUS_TEXT: &str = "Offline";

/// A response snapshot: status, headers and a fully buffered body.
///
/// Responses behave like single-read streams: the type is not `Clone`, and
/// [`into_body()`](Self::into_body) consumes it. Code that needs to both
/// store and return a response takes an explicit [`snapshot()`](Self::snapshot)
/// first, producing an independent copy for each consumer.
#[derive(Debug, PartialEq, Eq)]
pub struct Response {
    status: u16,
    status_text: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: String::new(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// The minimal `503 Offline` response served when a navigation has
    /// neither network nor a cached copy.
    pub fn offline() -> Self {
        Self::new(503, OFFLINE_STATUS_TEXT).status_text(OFFLINE_STATUS_TEXT)
    }

    pub fn status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = text.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.status_text
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value of header `name` (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the status is in the 2xx range.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consume the response, yielding its body.
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Produce an independent copy of this response.
    pub fn snapshot(&self) -> Self {
        Self {
            status: self.status,
            status_text: self.status_text.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_response_shape() {
        let resp = Response::offline();
        assert_eq!(resp.status(), 503);
        assert_eq!(resp.reason(), "Offline");
        assert!(!resp.is_ok());
    }

    #[test]
    fn ok_is_2xx_only() {
        assert!(Response::new(200, "").is_ok());
        assert!(Response::new(204, "").is_ok());
        assert!(!Response::new(304, "").is_ok());
        assert!(!Response::new(404, "").is_ok());
        assert!(!Response::new(199, "").is_ok());
    }

    #[test]
    fn snapshot_is_independent() {
        let original = Response::new(200, "body").header("Content-Type", "text/html");
        let copy = original.snapshot();
        assert_eq!(original.into_body(), b"body");
        assert_eq!(copy.header_value("content-type"), Some("text/html"));
        assert_eq!(copy.into_body(), b"body");
    }
}
