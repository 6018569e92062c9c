//! Configuration module
//!
//! Everything is read from environment variables (a `.env` file is honoured
//! in development). Values that a deployment rarely changes, such as the
//! object store endpoint and CDN base, have defaults matching the hosted setup.

use std::env;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const DB_SCHEMA: &str = "media";
const S3_ENDPOINT: &str = "https://bucket.poehali.dev";
const S3_BUCKET: &str = "files";
const S3_REGION: &str = "us-east-1";
const CDN_BASE_URL: &str = "https://cdn.poehali.dev";

/// Console log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub log_format: LogFormat,
    // Database
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub db_schema: String,
    pub run_migrations: bool,
    // Storage
    pub storage_backend: StorageBackend,
    pub s3_endpoint: String,
    pub s3_bucket: String,
    pub s3_region: String,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub cdn_base_url: String,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    /// Remove the stored objects a content row points at when the row is deleted
    pub delete_stored_files: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::to_lowercase) {
            Some(ref f) if f == "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::S3,
        };

        let config = Config {
            server_port: lookup("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            log_format,
            database_url: lookup("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            db_schema: lookup("DB_SCHEMA").unwrap_or_else(|| DB_SCHEMA.to_string()),
            run_migrations: parse_bool(lookup("RUN_MIGRATIONS"), true),
            storage_backend,
            s3_endpoint: lookup("S3_ENDPOINT").unwrap_or_else(|| S3_ENDPOINT.to_string()),
            s3_bucket: lookup("S3_BUCKET").unwrap_or_else(|| S3_BUCKET.to_string()),
            s3_region: lookup("S3_REGION")
                .or_else(|| lookup("AWS_REGION"))
                .unwrap_or_else(|| S3_REGION.to_string()),
            aws_access_key_id: lookup("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: lookup("AWS_SECRET_ACCESS_KEY"),
            cdn_base_url: lookup("CDN_BASE_URL").unwrap_or_else(|| CDN_BASE_URL.to_string()),
            local_storage_path: lookup("LOCAL_STORAGE_PATH"),
            local_storage_base_url: lookup("LOCAL_STORAGE_BASE_URL"),
            delete_stored_files: parse_bool(lookup("DELETE_STORED_FILES"), true),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Fail fast on values that would only surface as errors mid-request.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS cannot be 0"));
        }
        if self.db_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("DB_TIMEOUT_SECONDS cannot be 0"));
        }
        if !is_sql_identifier(&self.db_schema) {
            return Err(anyhow::anyhow!(
                "DB_SCHEMA must be a plain identifier (letters, digits, underscore), got '{}'",
                self.db_schema
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.aws_access_key_id.as_deref().unwrap_or("").is_empty()
                    || self.aws_secret_access_key.as_deref().unwrap_or("").is_empty()
                {
                    return Err(anyhow::anyhow!(
                        "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set for the s3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set for the local storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {
                if self.is_production() {
                    return Err(anyhow::anyhow!(
                        "The memory storage backend cannot be used in production"
                    ));
                }
            }
        }

        Ok(())
    }
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value
        .map(|v| v.trim().to_lowercase())
        .and_then(|v| match v.as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn is_sql_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    value.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/media"),
        ("AWS_ACCESS_KEY_ID", "key"),
        ("AWS_SECRET_ACCESS_KEY", "secret"),
    ];

    #[test]
    fn defaults_match_hosted_setup() {
        let config = Config::from_lookup(lookup_from(REQUIRED)).unwrap();
        assert_eq!(config.server_port, 4000);
        assert_eq!(config.storage_backend, StorageBackend::S3);
        assert_eq!(config.s3_bucket, "files");
        assert_eq!(config.s3_endpoint, "https://bucket.poehali.dev");
        assert_eq!(config.cdn_base_url, "https://cdn.poehali.dev");
        assert_eq!(config.db_schema, "media");
        assert!(config.run_migrations);
        assert!(config.delete_stored_files);
        assert_eq!(config.log_format, LogFormat::Compact);
    }

    #[test]
    fn database_url_is_required() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn s3_backend_requires_credentials() {
        let err = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")]))
            .unwrap_err();
        assert!(err.to_string().contains("AWS_ACCESS_KEY_ID"));
    }

    #[test]
    fn schema_must_be_an_identifier() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DB_SCHEMA", "media; DROP TABLE x"));
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn local_backend_needs_path_and_url() {
        let pairs = [
            ("DATABASE_URL", "postgres://x"),
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", "/tmp/media"),
        ];
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());

        let pairs = [
            ("DATABASE_URL", "postgres://x"),
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", "/tmp/media"),
            ("LOCAL_STORAGE_BASE_URL", "http://localhost:4000/files"),
            ("DELETE_STORED_FILES", "false"),
            ("LOG_FORMAT", "JSON"),
        ];
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.storage_backend, StorageBackend::Local);
        assert!(!config.delete_stored_files);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn memory_backend_is_rejected_in_production() {
        let pairs = [
            ("DATABASE_URL", "postgres://x"),
            ("STORAGE_BACKEND", "memory"),
            ("ENVIRONMENT", "production"),
        ];
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }
}
