//! Products, categories and preparation areas

use serde::de::IgnoredAny;
use shared::models::{Area, AreaInput, Category, CategoryInput, Product, ProductCreate, ProductUpdate};
use shared::types::ProductId;
use shared::validation::{validate_area, validate_category, validate_product};

use super::PosApi;
use crate::ClientResult;
use crate::http::HttpClient;

impl<H: HttpClient> PosApi<H> {
    // ── Products ────────────────────────────────────────────────────

    pub async fn list_products(&self) -> ClientResult<Vec<Product>> {
        self.http.get("/productos").await
    }

    pub async fn create_product(&self, product: &ProductCreate) -> ClientResult<()> {
        validate_product(product)?;
        let _: IgnoredAny = self.http.post("/agregar-productos", product).await?;
        tracing::info!(name = %product.name, "Product created");
        Ok(())
    }

    pub async fn update_product(&self, id: ProductId, product: &ProductUpdate) -> ClientResult<()> {
        validate_product(product)?;
        let _: IgnoredAny = self.http.put(&format!("/productos/{id}"), product).await?;
        tracing::info!(%id, "Product updated");
        Ok(())
    }

    pub async fn delete_product(&self, id: ProductId) -> ClientResult<()> {
        let _: IgnoredAny = self.http.delete(&format!("/productos/{id}")).await?;
        tracing::info!(%id, "Product deleted");
        Ok(())
    }

    // ── Categories ──────────────────────────────────────────────────

    pub async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.http.get("/categorias").await
    }

    pub async fn create_category(&self, input: &CategoryInput) -> ClientResult<()> {
        validate_category(input)?;
        let _: IgnoredAny = self.http.post("/categorias", input).await?;
        Ok(())
    }

    pub async fn update_category(&self, id: i64, input: &CategoryInput) -> ClientResult<()> {
        validate_category(input)?;
        let _: IgnoredAny = self.http.put(&format!("/categorias/{id}"), input).await?;
        Ok(())
    }

    pub async fn delete_category(&self, id: i64) -> ClientResult<()> {
        let _: IgnoredAny = self.http.delete(&format!("/categorias/{id}")).await?;
        Ok(())
    }

    // ── Areas ───────────────────────────────────────────────────────

    pub async fn list_areas(&self) -> ClientResult<Vec<Area>> {
        self.http.get("/areas").await
    }

    pub async fn create_area(&self, input: &AreaInput) -> ClientResult<()> {
        validate_area(input)?;
        let _: IgnoredAny = self.http.post("/areas", input).await?;
        Ok(())
    }

    pub async fn update_area(&self, id: i64, input: &AreaInput) -> ClientResult<()> {
        validate_area(input)?;
        let _: IgnoredAny = self.http.put(&format!("/areas/{id}"), input).await?;
        Ok(())
    }

    pub async fn delete_area(&self, id: i64) -> ClientResult<()> {
        let _: IgnoredAny = self.http.delete(&format!("/areas/{id}")).await?;
        Ok(())
    }
}
