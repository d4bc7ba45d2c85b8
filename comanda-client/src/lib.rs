//! Comanda client - restaurant POS client library
//!
//! Typed access to the restaurant back-end REST API, the socket.io push
//! channel, and the screen controllers that keep the live boards in sync.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod push;
pub mod session;
pub mod views;

pub use api::PosApi;
pub use config::{ClientConfig, PushConfig};
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use push::{Notification, PushClient, PushSubscription};
pub use session::{AuthGuard, GuardDecision, Route, SessionStore};
pub use views::{LiveView, MenuView, StationView, WaiterView, apply_received, watch};

// Re-export shared types for convenience
pub use shared::client::{LoginRequest, LoginResponse};
pub use shared::message::PushEvent;
