pub mod chat;
pub mod health;

use crate::error::ApiError;

pub async fn not_found() -> ApiError {
    ApiError::NotFound("not found".to_string())
}
