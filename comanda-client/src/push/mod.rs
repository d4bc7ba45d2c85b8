//! Push channel (socket.io over WebSocket)

pub mod client;
pub mod codec;

pub use client::{Notification, PushClient, PushSubscription};
