//! Data models for the media library
//!
//! `content` holds the relational rows and create/delete requests,
//! `upload` holds the file upload request and response.

mod content;
mod upload;

pub use content::*;
pub use upload::*;
