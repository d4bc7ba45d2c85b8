//! Typed wrappers over the restaurant back-end REST API
//!
//! One method per endpoint. Form payloads are validated locally before they
//! reach the network; nothing is retried.

mod account;
mod auth;
mod catalog;
mod customers;
mod floor;
mod orders;
mod users;

use crate::http::{HttpClient, NetworkHttpClient};

/// Back-end API bound to an HTTP client
#[derive(Debug, Clone)]
pub struct PosApi<H: HttpClient = NetworkHttpClient> {
    http: H,
}

impl<H: HttpClient> PosApi<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &H {
        &self.http
    }
}
