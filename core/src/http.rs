//! HTTP request and response types described as plain data.
//!
//! # Design
//! `RetableClient` builds `HttpRequest` values and parses `HttpResponse`
//! values; the `transport` module executes the round-trip. Keeping the two
//! sides as plain data makes every request shape assertable in unit tests
//! without a running server.
//!
//! The method enum is deliberately closed over the four verbs the Retable
//! API uses. A fifth verb is unrepresentable, so every match over it is
//! checked for exhaustiveness at compile time instead of falling through to
//! a silent "no response".

/// HTTP method for a request. Closed set: the Retable API uses no others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// The verb as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `RetableClient::build_*` methods and executed by
/// [`crate::transport::execute`].
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Produced by [`crate::transport::execute`], consumed by the client's body
/// parser. The status code is carried but never interpreted by the client.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
