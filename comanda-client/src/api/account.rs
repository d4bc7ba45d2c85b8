//! Registration and password recovery wizards

use shared::client::{Ack, CodeRequest, CodeVerification, PasswordReset, Registration};
use shared::error::ValidationError;
use shared::validation::{MAX_NAME_LEN, validate_credentials, validate_required_text};

use super::PosApi;
use crate::ClientResult;
use crate::http::HttpClient;

fn require_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::Empty { field: "email" });
    }
    Ok(())
}

impl<H: HttpClient> PosApi<H> {
    pub async fn request_registration_code(&self, email: &str) -> ClientResult<Ack> {
        require_email(email)?;
        let body = CodeRequest {
            email: email.trim().to_string(),
        };
        self.http.post("/solicitar-codigo-registro", &body).await
    }

    pub async fn verify_code(&self, email: &str, code: &str) -> ClientResult<Ack> {
        require_email(email)?;
        validate_required_text(code, "code", 16)?;
        let body = CodeVerification {
            email: email.trim().to_string(),
            code: code.trim().to_string(),
        };
        self.http.post("/verificar-codigo", &body).await
    }

    pub async fn register(&self, registration: &Registration) -> ClientResult<Ack> {
        validate_credentials(&registration.email, &registration.password)?;
        validate_required_text(&registration.name, "name", MAX_NAME_LEN)?;
        self.http.post("/registro", registration).await
    }

    pub async fn request_password_code(&self, email: &str) -> ClientResult<Ack> {
        require_email(email)?;
        let body = CodeRequest {
            email: email.trim().to_string(),
        };
        self.http.post("/solicitar-codigo-contrasena", &body).await
    }

    pub async fn reset_password(&self, reset: &PasswordReset) -> ClientResult<Ack> {
        validate_credentials(&reset.email, &reset.new_password)?;
        validate_required_text(&reset.code, "code", 16)?;
        self.http.post("/recuperar-contrasena", reset).await
    }
}
