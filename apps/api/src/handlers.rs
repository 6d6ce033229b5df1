//! HTTP handlers.

pub mod companies;
pub mod departments;
pub mod health;
pub mod organizations;
pub mod security;
pub mod tickets;
pub mod users;

use deskrail_core::AppError;
use uuid::Uuid;

pub(crate) fn parse_uuid(value: &str, field: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value)
        .map_err(|error| AppError::Validation(format!("invalid {field}: {error}")))
}
