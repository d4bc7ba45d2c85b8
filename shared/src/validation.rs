//! Input validation helpers
//!
//! Centralized length limits and checks for the back-office forms, the
//! customer document dialog and the login form.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::models::{
    AreaInput, CategoryInput, DiningTableInput, DocumentType, ProductCreate, RoomInput,
};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, area, room
pub const MAX_NAME_LEN: usize = 50;

/// Per-unit cart comments
pub const MAX_COMMENT_LEN: usize = 200;

// ── Helpers ─────────────────────────────────────────────────────────

/// Validate that a required string is non-empty (after trim) and within the length limit.
pub fn validate_required_text(
    value: &str,
    field: &'static str,
    max_len: usize,
) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    let len = trimmed.chars().count();
    if len > max_len {
        return Err(ValidationError::TooLong {
            field,
            len,
            max: max_len,
        });
    }
    Ok(())
}

pub fn validate_positive_price(price: Decimal) -> Result<(), ValidationError> {
    if price <= Decimal::ZERO {
        return Err(ValidationError::NotPositive { field: "price" });
    }
    Ok(())
}

/// DNI must be 8 digits, RUC 11 digits
pub fn validate_document(doc_type: DocumentType, document: &str) -> Result<(), ValidationError> {
    let document = document.trim();
    if document.is_empty() {
        return Err(ValidationError::Empty { field: "document" });
    }
    if !document.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::NotNumeric { field: "document" });
    }
    if document.len() != doc_type.digits() {
        return Err(ValidationError::WrongLength {
            field: "document",
            expected: doc_type.digits(),
            actual: document.len(),
        });
    }
    Ok(())
}

/// Per-unit comments may be empty but not longer than [`MAX_COMMENT_LEN`]
pub fn validate_comment(text: &str) -> Result<(), ValidationError> {
    let len = text.trim().chars().count();
    if len > MAX_COMMENT_LEN {
        return Err(ValidationError::TooLong {
            field: "comment",
            len,
            max: MAX_COMMENT_LEN,
        });
    }
    Ok(())
}

pub fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::Empty { field: "email" });
    }
    if password.trim().is_empty() {
        return Err(ValidationError::Empty { field: "password" });
    }
    Ok(())
}

// ── Form payloads ───────────────────────────────────────────────────

pub fn validate_product(product: &ProductCreate) -> Result<(), ValidationError> {
    validate_required_text(&product.name, "name", MAX_NAME_LEN)?;
    validate_positive_price(product.price)?;
    if product.category_id <= 0 {
        return Err(ValidationError::NotPositive { field: "category" });
    }
    if product.area_id <= 0 {
        return Err(ValidationError::NotPositive { field: "area" });
    }
    Ok(())
}

pub fn validate_category(input: &CategoryInput) -> Result<(), ValidationError> {
    validate_required_text(&input.name, "name", MAX_NAME_LEN)
}

pub fn validate_area(input: &AreaInput) -> Result<(), ValidationError> {
    validate_required_text(&input.name, "name", MAX_NAME_LEN)
}

pub fn validate_room(input: &RoomInput) -> Result<(), ValidationError> {
    validate_required_text(&input.name, "name", MAX_NAME_LEN)
}

pub fn validate_table(input: &DiningTableInput) -> Result<(), ValidationError> {
    if input.number <= 0 {
        return Err(ValidationError::NotPositive {
            field: "table number",
        });
    }
    if input.room_id <= 0 {
        return Err(ValidationError::NotPositive { field: "room" });
    }
    Ok(())
}
