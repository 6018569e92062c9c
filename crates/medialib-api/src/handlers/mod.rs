pub mod content;
pub mod upload;

use crate::error::HttpAppError;
use medialib_core::AppError;

/// Fallback for methods a route does not serve.
pub async fn method_not_allowed() -> HttpAppError {
    HttpAppError(AppError::MethodNotAllowed)
}
