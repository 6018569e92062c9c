//! API constants

/// Versioned prefix for all service routes
pub const API_PREFIX: &str = "/api/v0";

/// Path of the served OpenAPI document
pub const OPENAPI_PATH: &str = "/api/openapi.json";
