//! Blocking HTTP executor for [`HttpRequest`] values.
//!
//! # Design
//! One ureq agent per call: each request opens, uses, and drops its own
//! connection (no pooling). Status-as-error is disabled so 4xx/5xx responses
//! come back as data — the client returns the server's JSON body to the
//! caller whatever the status was. Only failures that produce no response at
//! all (refused connection, DNS, malformed URL) become errors. No timeout is
//! configured; a hung connection blocks the caller.

use log::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Execute a request and return the response as plain data.
pub fn execute(req: &HttpRequest) -> Result<HttpResponse, ApiError> {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    debug!("{} {}", req.method.as_str(), req.path);

    let result = match (req.method, req.body.as_deref()) {
        (HttpMethod::Get, _) => with_headers(agent.get(&req.path), &req.headers).call(),
        (HttpMethod::Delete, None) => {
            with_headers(agent.delete(&req.path), &req.headers).call()
        }
        // The delete-rows endpoint takes its row ids in a JSON body.
        (HttpMethod::Delete, Some(body)) => with_headers(agent.delete(&req.path), &req.headers)
            .force_send_body()
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, Some(body)) => with_headers(agent.post(&req.path), &req.headers)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => {
            with_headers(agent.post(&req.path), &req.headers).send_empty()
        }
        (HttpMethod::Put, Some(body)) => with_headers(agent.put(&req.path), &req.headers)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Put, None) => with_headers(agent.put(&req.path), &req.headers).send_empty(),
    };

    let mut response = result.map_err(|e| ApiError::TransportError(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    debug!("{} {} -> {status}", req.method.as_str(), req.path);

    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body,
    })
}

fn with_headers<Body>(
    mut builder: ureq::RequestBuilder<Body>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<Body> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
