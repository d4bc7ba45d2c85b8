//! Login session, routes and the authentication guard

pub mod guard;
pub mod route;
pub mod store;

pub use guard::{AuthGuard, GuardDecision};
pub use route::{Access, Route};
pub use store::SessionStore;
