// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::path::PathBuf;

// Origin the client talks to when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://baackend123.aws.com:3000";

pub const API_URL_ENV: &str = "TASKS_API_URL";
pub const SESSION_FILE_ENV: &str = "TASKS_SESSION_FILE";

const SESSION_DIR_NAME: &str = "tasks-client";
const SESSION_FILE_NAME: &str = "session.json";

/// Where the backend lives and where the session is persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            session_file: default_session_file(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `TASKS_API_URL` / `TASKS_SESSION_FILE`, read
    /// after loading a `.env` file if one is present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url;
        }
        if let Some(path) = lookup(SESSION_FILE_ENV).filter(|v| !v.trim().is_empty()) {
            config.session_file = PathBuf::from(path);
        }
        config
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }
}

fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SESSION_DIR_NAME)
        .join(SESSION_FILE_NAME)
}
