//! Auth and account DTOs shared between the API layer and the CLI
//!
//! Login, registration and password recovery wizards.

use serde::{Deserialize, Serialize};

/// Login request (`POST /login`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(rename = "contrasena")]
    pub password: String,
}

/// Login response; the session itself travels in a cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "activo", default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Request a verification code (registration or password recovery)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRequest {
    #[serde(rename = "correo")]
    pub email: String,
}

/// Verify a code sent by e-mail (`POST /verificar-codigo`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeVerification {
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(rename = "codigo")]
    pub code: String,
}

/// Registration (`POST /registro`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(rename = "contrasena")]
    pub password: String,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Password reset (`POST /recuperar-contrasena`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordReset {
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(rename = "nuevaClave")]
    pub new_password: String,
    #[serde(rename = "codigo")]
    pub code: String,
}

/// Generic `{ message }` acknowledgement returned by the account endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default, alias = "mensaje")]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
