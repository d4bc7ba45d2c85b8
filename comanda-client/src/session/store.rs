//! Session files
//!
//! The session directory holds the back-end cookie and the waiter's cart so
//! that consecutive CLI invocations behave like one browser session.

use std::fs;
use std::path::{Path, PathBuf};

use shared::cart::Cart;

use crate::ClientResult;
use crate::http::NetworkHttpClient;

const COOKIE_FILE: &str = "session.cookie";
const CART_FILE: &str = "cart.json";

#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn cookie_path(&self) -> PathBuf {
        self.dir.join(COOKIE_FILE)
    }

    fn cart_path(&self) -> PathBuf {
        self.dir.join(CART_FILE)
    }

    fn ensure_dir(&self) -> ClientResult<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    // ── Cookie ──────────────────────────────────────────────────────

    /// Persist the jar's cookie for the back-end. Returns false when the
    /// jar holds none.
    pub fn save_cookie(&self, http: &NetworkHttpClient) -> ClientResult<bool> {
        let Some(cookie) = http.session_cookie() else {
            return Ok(false);
        };
        self.ensure_dir()?;
        fs::write(self.cookie_path(), cookie)?;
        tracing::debug!(dir = %self.dir.display(), "Session cookie saved");
        Ok(true)
    }

    /// Load a saved cookie into the jar. Returns false when none is saved.
    pub fn restore_cookie(&self, http: &NetworkHttpClient) -> ClientResult<bool> {
        match fs::read_to_string(self.cookie_path()) {
            Ok(cookie) if !cookie.trim().is_empty() => {
                http.restore_session_cookie(cookie.trim());
                Ok(true)
            }
            Ok(_) => Ok(false),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub fn has_cookie(&self) -> bool {
        self.cookie_path().exists()
    }

    // ── Cart ────────────────────────────────────────────────────────

    /// Saved cart, or an empty one. A corrupt file is discarded.
    pub fn load_cart(&self) -> Cart {
        let path = self.cart_path();
        let Ok(content) = fs::read_to_string(&path) else {
            return Cart::new();
        };
        match serde_json::from_str(&content) {
            Ok(cart) => cart,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Discarding unreadable cart: {e}");
                Cart::new()
            }
        }
    }

    pub fn save_cart(&self, cart: &Cart) -> ClientResult<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(cart)?;
        fs::write(self.cart_path(), json)?;
        Ok(())
    }

    pub fn clear_cart(&self) -> ClientResult<()> {
        remove_if_exists(&self.cart_path())
    }

    /// Logout: forget the cookie and the cart
    pub fn clear(&self) -> ClientResult<()> {
        remove_if_exists(&self.cookie_path())?;
        remove_if_exists(&self.cart_path())?;
        tracing::info!(dir = %self.dir.display(), "Session cleared");
        Ok(())
    }
}

fn remove_if_exists(path: &Path) -> ClientResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;
    use shared::models::Product;
    use shared::types::ProductId;

    fn product() -> Product {
        Product {
            id: ProductId(1),
            name: "Pisco sour".into(),
            price: "18.50".parse().unwrap(),
            category_id: 2,
            area_id: 1,
            area: None,
        }
    }

    #[test]
    fn cart_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session"));
        assert!(store.load_cart().is_empty());

        let mut cart = Cart::new();
        cart.add_unit(&product());
        store.save_cart(&cart).unwrap();
        assert_eq!(store.load_cart(), cart);

        store.clear().unwrap();
        assert!(store.load_cart().is_empty());
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_cart_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        fs::write(dir.path().join(CART_FILE), "{not json").unwrap();
        assert!(store.load_cart().is_empty());
    }

    #[test]
    fn cookie_survives_new_client() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let config = ClientConfig::new("http://127.0.0.1:3000");

        let first = NetworkHttpClient::new(&config).unwrap();
        assert!(!store.save_cookie(&first).unwrap());
        first.restore_session_cookie("token=abc123");
        assert!(store.save_cookie(&first).unwrap());

        let second = NetworkHttpClient::new(&config).unwrap();
        assert!(store.restore_cookie(&second).unwrap());
        assert_eq!(second.session_cookie().as_deref(), Some("token=abc123"));

        store.clear().unwrap();
        assert!(!store.has_cookie());
    }
}
