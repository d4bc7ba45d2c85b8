//! User Model (usuario)

use serde::{Deserialize, Serialize};

/// Role name that unlocks back-office screens
pub const ROLE_ADMIN: &str = "ADMIN";

/// Role as embedded in a user (`usuario.rol`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "Nombre")]
    pub name: String,
}

/// User as returned by `/perfil`, `/usuario` and `/usuarios`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "ID_Usuario", default)]
    pub id: i64,
    #[serde(rename = "Nombre", default)]
    pub name: String,
    #[serde(rename = "Correo", default)]
    pub email: String,
    #[serde(rename = "Activo", default = "default_active")]
    pub active: bool,
    #[serde(rename = "rol", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn role_name(&self) -> Option<&str> {
        self.role.as_ref().map(|r| r.name.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.role_name() == Some(ROLE_ADMIN)
    }
}

/// Activation toggle payload (`PATCH /usuarios/:id`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserActivation {
    #[serde(rename = "Activo")]
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_detection() {
        let user: User = serde_json::from_str(
            r#"{"ID_Usuario":1,"Nombre":"Rosa","Correo":"r@x.pe","Activo":true,"rol":{"Nombre":"ADMIN"}}"#,
        )
        .unwrap();
        assert!(user.is_admin());

        let waiter: User =
            serde_json::from_str(r#"{"Nombre":"Luis","rol":{"Nombre":"MOZO"}}"#).unwrap();
        assert!(!waiter.is_admin());
        assert!(waiter.active);
    }
}
