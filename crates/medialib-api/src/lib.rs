//! Medialib API Library
//!
//! HTTP handlers for the content catalogue and file upload services, plus
//! application setup.

mod api_doc;
pub mod constants;
mod handlers;
mod services;
pub mod setup;
mod telemetry;

pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
