//! Login and the current session user

use shared::client::{LoginRequest, LoginResponse};
use shared::models::User;
use shared::validation::validate_credentials;

use super::PosApi;
use crate::http::HttpClient;
use crate::{ClientError, ClientResult};

impl<H: HttpClient> PosApi<H> {
    /// `POST /login`; the session cookie lands in the client's jar.
    ///
    /// Disabled accounts are refused with [`ClientError::InactiveAccount`].
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        validate_credentials(email, password)?;
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.http.post("/login", &request).await?;
        if !response.active {
            tracing::info!(email = %request.email, "Login refused: inactive account");
            return Err(ClientError::InactiveAccount);
        }
        tracing::info!(email = %request.email, "Logged in");
        Ok(response)
    }

    /// Profile of the logged-in user (`GET /perfil`)
    pub async fn current_user(&self) -> ClientResult<User> {
        self.http.get("/perfil").await
    }

    /// Session user as seen by the order-taking screen (`GET /usuario`)
    pub async fn session_user(&self) -> ClientResult<User> {
        self.http.get("/usuario").await
    }
}
