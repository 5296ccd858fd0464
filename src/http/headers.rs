//! Response header finalisation
//!
//! Headers that must be present on every response are collected in a
//! [`HeaderSet`] and inserted right before the response is handed to hyper.

use hyper::header::{HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN};
use hyper::Response;

/// Fixed set of headers inserted into outgoing responses
#[derive(Debug, Clone, Default)]
pub struct HeaderSet {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl HeaderSet {
    pub const fn new() -> Self {
        Self {
            headers: Vec::new(),
        }
    }

    /// `Access-Control-Allow-Origin: *`
    pub fn cors_any_origin() -> Self {
        Self::new().with(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"))
    }

    #[must_use]
    pub fn with(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Insert every header into the response, replacing existing values
    pub fn apply<B>(&self, response: &mut Response<B>) {
        let target = response.headers_mut();
        for (name, value) in &self.headers {
            target.insert(name.clone(), value.clone());
        }
    }
}
