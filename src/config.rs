use serde::Deserialize;
use std::path::PathBuf;

/// Frontend origins allowed when `ALLOWED_ORIGINS` is not set.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 5] = [
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:5174",
    "http://127.0.0.1:5174",
    "https://kitchentreasures.netlify.app",
];

/// Where uploads are written and which directories are served statically.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StorageConfig {
    /// Uploaded spreadsheets land here.
    pub upload_dir: PathBuf,
    /// Served under `/output`.
    pub output_dir: PathBuf,
    /// Served under `/maps`.
    pub maps_dir: PathBuf,
}

impl StorageConfig {
    /// Creates all three directories (and parents) if they do not exist yet.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [&self.upload_dir, &self.output_dir, &self.maps_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("output"),
            maps_dir: PathBuf::from("maps"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub storage: StorageConfig,
    pub allowed_origins: Vec<String>,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

fn dir_var(name: &str, default: &str) -> anyhow::Result<PathBuf> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => anyhow::bail!("{} cannot be empty", name),
        Ok(value) => Ok(PathBuf::from(value.trim())),
        Err(_) => Ok(PathBuf::from(default)),
    }
}

fn number_var<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", name, value)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            storage: StorageConfig {
                upload_dir: dir_var("UPLOAD_DIR", "uploads")?,
                output_dir: dir_var("OUTPUT_DIR", "output")?,
                maps_dir: dir_var("MAPS_DIR", "maps")?,
            },
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|raw| {
                    raw.split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect::<Vec<_>>()
                })
                .filter(|origins| !origins.is_empty())
                .unwrap_or_else(|| {
                    DEFAULT_ALLOWED_ORIGINS
                        .iter()
                        .map(|origin| origin.to_string())
                        .collect()
                }),
            max_upload_bytes: number_var("MAX_UPLOAD_BYTES", 25 * 1024 * 1024)?,
            rate_limit_per_second: number_var("RATE_LIMIT_PER_SECOND", 10)?,
            rate_limit_burst: number_var("RATE_LIMIT_BURST", 20)?,
        };

        if config.max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_BYTES must be greater than zero");
        }
        if config.rate_limit_per_second == 0 || config.rate_limit_burst == 0 {
            anyhow::bail!("RATE_LIMIT_PER_SECOND and RATE_LIMIT_BURST must be greater than zero");
        }

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Server Port: {}", config.port);
        tracing::debug!("Storage: {:?}", config.storage);
        tracing::debug!("Allowed origins: {:?}", config.allowed_origins);

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            storage: StorageConfig::default(),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
            max_upload_bytes: 25 * 1024 * 1024,
            rate_limit_per_second: 10,
            rate_limit_burst: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dirs_creates_nested_directories() {
        let root = tempfile::tempdir().unwrap();
        let storage = StorageConfig {
            upload_dir: root.path().join("data/uploads"),
            output_dir: root.path().join("output"),
            maps_dir: root.path().join("maps"),
        };

        storage.ensure_dirs().unwrap();

        assert!(storage.upload_dir.is_dir());
        assert!(storage.output_dir.is_dir());
        assert!(storage.maps_dir.is_dir());
    }

    #[test]
    fn test_default_config_allows_frontend_origins() {
        let config = Config::default();
        assert_eq!(config.port, 8000);
        assert!(config
            .allowed_origins
            .contains(&"http://localhost:5173".to_string()));
    }
}
