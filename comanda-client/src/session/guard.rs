//! One reusable authentication guard for every protected screen

use shared::models::User;

use super::route::{Access, Route};
use crate::api::PosApi;
use crate::http::HttpClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// `None` for public routes that need no user
    Allow(Option<User>),
    RedirectToLogin,
    Forbidden(User),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow(_))
    }
}

pub struct AuthGuard<'a, H: HttpClient> {
    api: &'a PosApi<H>,
}

impl<'a, H: HttpClient> AuthGuard<'a, H> {
    pub fn new(api: &'a PosApi<H>) -> Self {
        Self { api }
    }

    /// Resolve the current user for `route`.
    ///
    /// A missing session, a 401 and a failed fetch all send the user back
    /// to the login screen.
    pub async fn check(&self, route: Route) -> GuardDecision {
        if route.access() == Access::Public {
            return GuardDecision::Allow(None);
        }
        // The order-taking screen checks its session against `/usuario`
        let lookup = match route {
            Route::Menu => self.api.session_user().await,
            _ => self.api.current_user().await,
        };
        let user = match lookup {
            Ok(user) => user,
            Err(e) => {
                if e.is_unauthorized() {
                    tracing::debug!(%route, "No session");
                } else {
                    tracing::warn!(%route, "Profile fetch failed: {e}");
                }
                return GuardDecision::RedirectToLogin;
            }
        };
        decide(route, user)
    }
}

/// Decision for an already resolved user
pub fn decide(route: Route, user: User) -> GuardDecision {
    match route.access() {
        Access::Admin if !user.is_admin() => {
            tracing::info!(%route, user = %user.name, "Admin route refused");
            GuardDecision::Forbidden(user)
        }
        _ => GuardDecision::Allow(Some(user)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::MockHttp;
    use serde_json::json;
    use shared::models::Role;

    fn user(role: &str) -> User {
        User {
            id: 1,
            name: "Lucía".into(),
            email: "lucia@fioris.pe".into(),
            active: true,
            role: Some(Role { name: role.into() }),
        }
    }

    #[test]
    fn admin_routes_need_admin_role() {
        assert_eq!(
            decide(Route::Users, user("MOZO")),
            GuardDecision::Forbidden(user("MOZO"))
        );
        assert!(decide(Route::Users, user("ADMIN")).is_allowed());
        assert!(decide(Route::WaiterBoard, user("MOZO")).is_allowed());
    }

    #[tokio::test]
    async fn menu_checks_the_session_endpoint() {
        let http = MockHttp::new();
        http.respond(
            "GET",
            "/usuario",
            json!({"ID_Usuario": 2, "Nombre": "Luis", "Correo": "luis@fioris.pe", "Activo": true}),
        );
        let api = PosApi::new(http);
        let guard = AuthGuard::new(&api);

        assert!(guard.check(Route::Menu).await.is_allowed());
        // `/perfil` has no canned answer, so other screens bounce to login
        assert_eq!(guard.check(Route::Profile).await, GuardDecision::RedirectToLogin);
        assert_eq!(guard.check(Route::Login).await, GuardDecision::Allow(None));
        assert_eq!(api.http().calls_to("GET", "/usuario").len(), 1);
        assert_eq!(api.http().calls_to("GET", "/perfil").len(), 1);
    }
}
