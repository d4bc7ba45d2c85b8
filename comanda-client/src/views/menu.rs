//! Menu and cart controller (`/paginaprincipal`)
//!
//! Loads the catalog and the floor plan, keeps the waiter's cart in the
//! session directory and submits it as an order for the selected table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::board::Reaction;
use shared::cart::Cart;
use shared::message::PushEvent;
use shared::models::{Category, DiningTable, NewOrder, Product, Room, filter_products};
use shared::BoardError;
use shared::types::ProductId;
use shared::validation::validate_comment;

use super::LiveView;
use crate::api::PosApi;
use crate::http::HttpClient;
use crate::session::SessionStore;
use crate::{ClientError, ClientResult};

pub struct MenuView<'a, H: HttpClient> {
    api: &'a PosApi<H>,
    store: &'a SessionStore,
    products: Vec<Product>,
    categories: Vec<Category>,
    rooms: Vec<Room>,
    tables: Vec<DiningTable>,
    room_id: Option<i64>,
    table_id: Option<i64>,
    cart: Cart,
    last_error: Option<String>,
}

impl<'a, H: HttpClient> MenuView<'a, H> {
    /// View with the cart saved by a previous invocation
    pub fn new(api: &'a PosApi<H>, store: &'a SessionStore) -> Self {
        Self {
            api,
            store,
            products: Vec::new(),
            categories: Vec::new(),
            rooms: Vec::new(),
            tables: Vec::new(),
            room_id: None,
            table_id: None,
            cart: store.load_cart(),
            last_error: None,
        }
    }

    /// Fetch products, categories, rooms and tables
    pub async fn load(&mut self) -> ClientResult<()> {
        let (products, categories, rooms, tables) = tokio::try_join!(
            self.api.list_products(),
            self.api.list_categories(),
            self.api.list_rooms(),
            self.api.list_tables(),
        )?;
        self.products = products;
        self.categories = categories;
        self.rooms = rooms;
        self.tables = tables;
        self.tables.sort_by_key(|t| t.number);
        self.cart.relink(&self.products);

        // Keep the current selection when it still exists
        let room_id = self
            .room_id
            .filter(|id| self.rooms.iter().any(|r| r.id == *id))
            .or_else(|| self.rooms.first().map(|r| r.id));
        self.room_id = room_id;
        let keep_table = self
            .table_id
            .is_some_and(|id| self.tables_in_room().iter().any(|t| t.id == id));
        if !keep_table {
            self.table_id = self.tables_in_room().first().map(|t| t.id);
        }
        tracing::debug!(
            products = self.products.len(),
            rooms = self.rooms.len(),
            tables = self.tables.len(),
            "Menu loaded"
        );
        Ok(())
    }

    // ── Catalog ─────────────────────────────────────────────────────

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Products of an optional category whose name contains `search`
    pub fn filtered(&self, category_id: Option<i64>, search: &str) -> Vec<&Product> {
        filter_products(&self.products, category_id, search)
    }

    fn product(&self, id: ProductId) -> ClientResult<&Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("product {id}")))
    }

    // ── Floor selection ─────────────────────────────────────────────

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn selected_room(&self) -> Option<&Room> {
        let id = self.room_id?;
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn selected_table(&self) -> Option<&DiningTable> {
        let id = self.table_id?;
        self.tables.iter().find(|t| t.id == id)
    }

    /// Tables of the selected room, by number
    pub fn tables_in_room(&self) -> Vec<&DiningTable> {
        let Some(room) = self.selected_room() else {
            return Vec::new();
        };
        self.tables
            .iter()
            .filter(|t| {
                t.room_id == Some(room.id) || t.room.as_ref().is_some_and(|r| r.name == room.name)
            })
            .collect()
    }

    /// Select a room by id or name; the first of its tables becomes selected
    pub fn select_room(&mut self, room: &str) -> ClientResult<()> {
        let found = self
            .rooms
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(room) || r.id.to_string() == room)
            .ok_or_else(|| ClientError::NotFound(format!("room {room}")))?;
        self.room_id = Some(found.id);
        self.table_id = self.tables_in_room().first().map(|t| t.id);
        Ok(())
    }

    /// Select a table of the current room by its number
    pub fn select_table(&mut self, number: i64) -> ClientResult<()> {
        let room = self
            .selected_room()
            .map(|r| r.name.clone())
            .unwrap_or_default();
        let id = self
            .tables_in_room()
            .into_iter()
            .find(|t| t.number == number)
            .map(|t| t.id)
            .ok_or_else(|| BoardError::NoSuchTable {
                room,
                table: number.to_string(),
            })?;
        self.table_id = Some(id);
        Ok(())
    }

    // ── Cart ────────────────────────────────────────────────────────

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    fn persist(&self) -> ClientResult<()> {
        self.store.save_cart(&self.cart)
    }

    pub fn add_unit(&mut self, product_id: ProductId) -> ClientResult<u32> {
        let product = self.product(product_id)?.clone();
        let quantity = self.cart.add_unit(&product);
        self.persist()?;
        Ok(quantity)
    }

    pub fn remove_unit(&mut self, product_id: ProductId) -> ClientResult<u32> {
        let quantity = self.cart.remove_unit(product_id)?;
        self.persist()?;
        Ok(quantity)
    }

    pub fn remove_product(&mut self, product_id: ProductId) -> ClientResult<()> {
        self.cart.remove_product(product_id)?;
        self.persist()
    }

    /// Open a comment slot and fill it, returns the slot index
    pub fn add_comment(&mut self, product_id: ProductId, text: &str) -> ClientResult<usize> {
        validate_comment(text)?;
        let index = self.cart.add_comment(product_id)?;
        self.cart.set_comment(product_id, index, text)?;
        self.persist()?;
        Ok(index)
    }

    pub fn set_comment(&mut self, product_id: ProductId, index: usize, text: &str) -> ClientResult<()> {
        validate_comment(text)?;
        self.cart.set_comment(product_id, index, text)?;
        self.persist()
    }

    pub fn delete_comment(&mut self, product_id: ProductId, index: usize) -> ClientResult<()> {
        self.cart.delete_comment(product_id, index)?;
        self.persist()
    }

    /// Empty the cart without ordering
    pub fn cancel(&mut self) -> ClientResult<()> {
        self.cart.clear();
        self.store.clear_cart()
    }

    /// Send the cart as an order for the selected table and empty it
    pub async fn submit(&mut self, now: DateTime<Utc>) -> ClientResult<NewOrder> {
        let table = self.selected_table().ok_or(BoardError::NoTableSelected)?;
        let order = self.cart.to_order(table.id, now)?;
        self.api.submit_order(&order).await?;
        self.cart.clear();
        self.store.clear_cart()?;
        Ok(order)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[async_trait]
impl<'a, H: HttpClient> LiveView for MenuView<'a, H> {
    async fn refresh(&mut self) -> bool {
        match self.load().await {
            Ok(()) => {
                self.last_error = None;
                true
            }
            Err(e) => {
                tracing::warn!("Menu fetch failed: {e}");
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    fn apply_event(&mut self, event: &PushEvent) -> Reaction {
        match event {
            PushEvent::ProductUpdated { .. } => Reaction::Refetch,
            _ => Reaction::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::push::Notification;
    use crate::views::testing::MockHttp;
    use chrono::TimeZone;
    use serde_json::json;

    fn api() -> PosApi<MockHttp> {
        let http = MockHttp::new();
        http.respond(
            "GET",
            "/productos",
            json!([
                {"ID_Producto": 1, "Nombre": "Ceviche", "Precio": "32.00", "ID_Categoria": 1, "ID_Area": 2},
                {"ID_Producto": 2, "Nombre": "Chicha morada", "Precio": 8.5, "ID_Categoria": 2, "ID_Area": 1}
            ]),
        );
        http.respond(
            "GET",
            "/categorias",
            json!([{"ID_Categoria": 1, "Nombre": "Fondos"}, {"ID_Categoria": 2, "Nombre": "Bebidas"}]),
        );
        http.respond(
            "GET",
            "/salones",
            json!([{"ID_Salon": 1, "Nombre": "Principal"}, {"ID_Salon": 2, "Nombre": "Terraza"}]),
        );
        http.respond(
            "GET",
            "/mesas",
            json!([
                {"ID_Mesa": 12, "Numero_mesa": 4, "ID_Salon": 2},
                {"ID_Mesa": 11, "Numero_mesa": 2, "ID_Salon": 1},
                {"ID_Mesa": 10, "Numero_mesa": 1, "ID_Salon": 1}
            ]),
        );
        http.respond("POST", "/pedidos", json!({"message": "Pedido creado"}));
        PosApi::new(http)
    }

    #[tokio::test]
    async fn load_selects_first_room_and_table() {
        let api = api();
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let mut menu = MenuView::new(&api, &store);
        menu.load().await.unwrap();

        assert_eq!(menu.selected_room().unwrap().name, "Principal");
        assert_eq!(menu.selected_table().unwrap().number, 1);
        assert_eq!(menu.filtered(Some(2), "").len(), 1);
        assert_eq!(menu.filtered(None, "CEVI")[0].id, ProductId(1));

        menu.select_room("terraza").unwrap();
        assert_eq!(menu.selected_table().unwrap().id, 12);
        assert!(menu.select_table(1).is_err());
    }

    #[tokio::test]
    async fn cart_survives_reload_and_submit_clears_it() {
        let api = api();
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        let mut menu = MenuView::new(&api, &store);
        menu.load().await.unwrap();
        menu.add_unit(ProductId(1)).unwrap();
        menu.add_unit(ProductId(1)).unwrap();
        menu.add_comment(ProductId(1), " sin ají ").unwrap();
        assert!(menu.add_unit(ProductId(99)).is_err());

        // A new invocation sees the same cart
        let mut menu = MenuView::new(&api, &store);
        menu.load().await.unwrap();
        assert_eq!(menu.cart().quantity_of(ProductId(1)), 2);

        let now = Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap();
        let order = menu.submit(now).await.unwrap();
        assert_eq!(order.table_id, 10);
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].comment, "sin ají");
        assert_eq!(order.lines[1].comment, "");

        let posted = api.http().calls_to("POST", "/pedidos");
        assert_eq!(posted[0].body["ID_Estado"], 1);
        assert_eq!(posted[0].body["detalles"].as_array().unwrap().len(), 2);
        assert!(menu.cart().is_empty());
        assert!(store.load_cart().is_empty());
    }

    #[tokio::test]
    async fn product_update_reloads_catalog_and_keeps_cart() {
        let api = api();
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let mut menu = MenuView::new(&api, &store);
        assert!(menu.refresh().await);
        menu.add_unit(ProductId(2)).unwrap();

        api.http().respond(
            "GET",
            "/productos",
            json!([
                {"ID_Producto": 1, "Nombre": "Ceviche", "Precio": "32.00", "ID_Categoria": 1, "ID_Area": 2},
                {"ID_Producto": 2, "Nombre": "Chicha de jora", "Precio": "9.00", "ID_Categoria": 2, "ID_Area": 1}
            ]),
        );
        let update = Notification::Event(PushEvent::ProductUpdated { product_id: None });
        assert!(menu.handle(&update).await);
        assert_eq!(menu.filtered(None, "jora")[0].id, ProductId(2));
        assert_eq!(menu.cart().quantity_of(ProductId(2)), 1);
        assert_eq!(api.http().calls_to("GET", "/productos").len(), 2);

        // Line-item events do not touch the menu
        let served = Notification::Event(PushEvent::ItemRemoved {
            detail_id: shared::types::DetailId(5),
        });
        assert!(!menu.handle(&served).await);
        assert_eq!(api.http().calls_to("GET", "/productos").len(), 2);
    }

    #[tokio::test]
    async fn empty_cart_is_not_submitted() {
        let api = api();
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let mut menu = MenuView::new(&api, &store);
        menu.load().await.unwrap();

        let err = menu.submit(Utc::now()).await.unwrap_err();
        assert!(matches!(err, ClientError::Cart(shared::CartError::Empty)));
        assert!(api.http().calls_to("POST", "/pedidos").is_empty());
    }
}
