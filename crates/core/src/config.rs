use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use once_cell::sync::Lazy;

static DEFAULT_SERVER_URL: &str = "http://localhost:8000";
static SESSION_FILE_NAME: &str = "session.json";
static ENV_DATA_DIR: &str = "TASKDECK_DATA_DIR";
static ENV_SERVER_URL: &str = "TASKDECK_SERVER";

static PROJECT_DIRS: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from("dev", "taskdeck", "taskdeck"));

#[derive(Debug, Clone)]
pub struct AppConfig {
    data_dir: PathBuf,
    server_url: String,
}

impl AppConfig {
    /// Construct [`AppConfig`] by resolving the data directory and server
    /// URL from the provided overrides, environment variables, and
    /// platform defaults.
    pub fn discover(
        data_dir_override: Option<PathBuf>,
        server_override: Option<String>,
    ) -> Result<Self> {
        let data_dir = resolve_data_dir(data_dir_override)?;
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).with_context(|| {
                format!("Failed to create data directory at {}", data_dir.display())
            })?;
        }
        Ok(Self::from_parts(data_dir, resolve_server_url(server_override)))
    }

    /// Construct [`AppConfig`] directly from resolved values.
    pub fn from_parts(data_dir: PathBuf, server_url: String) -> Self {
        Self {
            data_dir,
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

fn resolve_server_url(server_override: Option<String>) -> String {
    if let Some(url) = server_override {
        return url;
    }
    if let Ok(url) = env::var(ENV_SERVER_URL) {
        if !url.trim().is_empty() {
            return url;
        }
    }
    DEFAULT_SERVER_URL.to_string()
}

fn resolve_data_dir(data_dir_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = data_dir_override {
        return Ok(dir);
    }

    if let Ok(env_dir) = env::var(ENV_DATA_DIR) {
        return Ok(PathBuf::from(env_dir));
    }

    if let Some(project) = &*PROJECT_DIRS {
        return Ok(project.data_dir().to_path_buf());
    }

    if let Some(base) = BaseDirs::new() {
        return Ok(base.home_dir().join(".taskdeck"));
    }

    Ok(env::current_dir()?.join(".taskdeck"))
}
