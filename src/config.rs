use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub admin: Option<AdminConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    /// Cookie signing secret. Empty means an ephemeral key per process.
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub dir: String,
    pub url_prefix: String,
    pub max_image_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: "public/uploads".to_string(),
            url_prefix: "/uploads".to_string(),
            max_image_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Admin account ensured at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

pub const DEFAULT_DATABASE_URL: &str = "sqlite://travel_agency.sqlite?mode=rwc";

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => toml::from_str(&config_str)
                .map_err(|e| format!("failed to parse config file {config_path}: {e}"))?,
            // no file: environment variables and defaults only
            Err(e) if e.kind() == ErrorKind::NotFound => Config::from_env_defaults(),
            Err(e) => {
                return Err(format!("failed to read config file {config_path}: {e}").into());
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn from_env_defaults() -> Self {
        fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
            env::var(name)
                .ok()
                .and_then(|v| v.parse::<T>().ok())
                .unwrap_or(default)
        }

        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: get_env_parse("SERVER_PORT", 3000u16),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                max_connections: get_env_parse("DB_MAX_CONNECTIONS", 5u32),
            },
            session: SessionConfig::default(),
            uploads: UploadConfig::default(),
            admin: None,
        }
    }

    /// Environment variables win over file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("SESSION_SECRET") {
            self.session.secret = v;
        }
        if let Ok(v) = env::var("SESSION_COOKIE_SECURE") {
            self.session.cookie_secure = matches!(v.as_str(), "1" | "true" | "yes");
        }
        if let Ok(v) = env::var("UPLOAD_DIR") {
            self.uploads.dir = v;
        }
        if let Ok(v) = env::var("UPLOAD_URL_PREFIX") {
            self.uploads.url_prefix = v;
        }
        if let Ok(v) = env::var("UPLOAD_MAX_IMAGE_BYTES")
            && let Ok(n) = v.parse()
        {
            self.uploads.max_image_bytes = n;
        }

        match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) => {
                self.admin = Some(AdminConfig { username, password });
            }
            (Ok(username), Err(_)) => {
                if let Some(admin) = self.admin.as_mut() {
                    admin.username = username;
                }
            }
            (Err(_), Ok(password)) => {
                if let Some(admin) = self.admin.as_mut() {
                    admin.password = password;
                }
            }
            (Err(_), Err(_)) => {}
        }
    }
}
