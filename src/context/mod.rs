//! Per-request context — the parsed request plus route captures.
//!
//! A [`Context`] is handed to every handler and middleware. It owns the
//! [`Request`] and the [`PathParams`] captured by the matched route, and
//! decodes JSON bodies into typed values.

use std::collections::HashMap;

use crate::Request;

/// Path parameters extracted from the matched route pattern.
#[derive(Default, Debug, Clone)]
pub struct PathParams {
    map: HashMap<String, String>,
}

impl PathParams {
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a captured parameter value.
    pub fn insert(&mut self, name: String, value: String) {
        self.map.insert(name, value);
    }

    /// Returns a captured parameter value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }
}

/// Per-request context carrying the request and its route captures.
pub struct Context {
    request: Request,
    params: PathParams,
}

impl Context {
    /// Creates a context with no path parameters (pre-routing).
    pub fn new(request: Request) -> Self {
        Self {
            request,
            params: PathParams::new(),
        }
    }

    /// Creates a context with the parameters captured by a matched route.
    pub fn with_params(request: Request, params: PathParams) -> Self {
        Self { request, params }
    }

    /// Returns the underlying request.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Consumes the context, returning the request.
    ///
    /// Used by the router to re-wrap the request with captured parameters.
    pub fn into_request(self) -> Request {
        self.request
    }

    /// Returns the captured path parameters.
    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// Returns a query parameter value by key.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.request.query_param(key)
    }

    /// Decodes the request body as JSON into `T`.
    pub fn json<T>(&self) -> Result<T, serde_json::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_slice(self.request.body())
    }
}
