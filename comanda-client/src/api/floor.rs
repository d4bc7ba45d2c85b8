//! Rooms and dining tables

use serde::de::IgnoredAny;
use shared::models::{DiningTable, DiningTableInput, Room, RoomInput};
use shared::validation::{validate_room, validate_table};

use super::PosApi;
use crate::ClientResult;
use crate::http::HttpClient;

impl<H: HttpClient> PosApi<H> {
    pub async fn list_rooms(&self) -> ClientResult<Vec<Room>> {
        self.http.get("/salones").await
    }

    pub async fn create_room(&self, input: &RoomInput) -> ClientResult<()> {
        validate_room(input)?;
        let _: IgnoredAny = self.http.post("/salones", input).await?;
        Ok(())
    }

    pub async fn update_room(&self, id: i64, input: &RoomInput) -> ClientResult<()> {
        validate_room(input)?;
        let _: IgnoredAny = self.http.put(&format!("/salones/{id}"), input).await?;
        Ok(())
    }

    pub async fn delete_room(&self, id: i64) -> ClientResult<()> {
        let _: IgnoredAny = self.http.delete(&format!("/salones/{id}")).await?;
        Ok(())
    }

    pub async fn list_tables(&self) -> ClientResult<Vec<DiningTable>> {
        self.http.get("/mesas").await
    }

    pub async fn create_table(&self, input: &DiningTableInput) -> ClientResult<()> {
        validate_table(input)?;
        let _: IgnoredAny = self.http.post("/mesas", input).await?;
        Ok(())
    }

    pub async fn update_table(&self, id: i64, input: &DiningTableInput) -> ClientResult<()> {
        validate_table(input)?;
        let _: IgnoredAny = self.http.put(&format!("/mesas/{id}"), input).await?;
        Ok(())
    }

    pub async fn delete_table(&self, id: i64) -> ClientResult<()> {
        let _: IgnoredAny = self.http.delete(&format!("/mesas/{id}")).await?;
        Ok(())
    }
}
