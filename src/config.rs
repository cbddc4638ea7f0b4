//! Application configuration loaded from environment variables.

use std::fmt::Write as _;

use serde::Deserialize;

/// Process-wide configuration snapshot.
///
/// Every field has a default, so an empty environment still produces a
/// complete snapshot. Values are not validated here; ports and other numeric
/// settings are parsed by the component that consumes them.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server ===
    /// HTTP listen port.
    #[serde(default = "default_server_port")]
    pub server_port: String,

    // === MySQL ===
    /// Database host.
    #[serde(default = "default_localhost")]
    pub mysql_host: String,

    /// Database port.
    #[serde(default = "default_mysql_port")]
    pub mysql_port: String,

    /// Database user.
    #[serde(default = "default_mysql_credential")]
    pub mysql_username: String,

    /// Database password.
    #[serde(default = "default_mysql_credential")]
    pub mysql_password: String,

    /// Database (schema) name.
    #[serde(default = "default_mysql_dbname")]
    pub mysql_dbname: String,

    /// Connection character set.
    #[serde(default = "default_mysql_charset")]
    pub mysql_charset: String,

    // === Redis ===
    /// Cache host.
    #[serde(default = "default_localhost")]
    pub redis_host: String,

    /// Cache port.
    #[serde(default = "default_redis_port")]
    pub redis_port: String,

    /// Cache password; empty means no authentication.
    #[serde(default)]
    pub redis_password: String,

    /// Logical cache database index.
    #[serde(default)]
    pub redis_db: i64,

    // === DingTalk ===
    /// DingTalk application key.
    #[serde(default)]
    pub dingtalk_appkey: String,

    /// DingTalk application secret.
    #[serde(default)]
    pub dingtalk_appsecret: String,
}

fn default_server_port() -> String {
    "8081".to_string()
}

fn default_localhost() -> String {
    "localhost".to_string()
}

fn default_mysql_port() -> String {
    "3306".to_string()
}

fn default_mysql_credential() -> String {
    "root".to_string()
}

fn default_mysql_dbname() -> String {
    "dd_oa_download".to_string()
}

fn default_mysql_charset() -> String {
    "utf8mb4".to_string()
}

fn default_redis_port() -> String {
    "6379".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: default_server_port(),
            mysql_host: default_localhost(),
            mysql_port: default_mysql_port(),
            mysql_username: default_mysql_credential(),
            mysql_password: default_mysql_credential(),
            mysql_dbname: default_mysql_dbname(),
            mysql_charset: default_mysql_charset(),
            redis_host: default_localhost(),
            redis_port: default_redis_port(),
            redis_password: String::new(),
            redis_db: 0,
            dingtalk_appkey: String::new(),
            dingtalk_appsecret: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Load configuration from an explicit set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        envy::from_iter(vars.into_iter().map(|(k, v)| (k.into(), v.into())))
    }

    /// Address the HTTP listener binds to.
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.server_port.trim())
    }

    /// Human-readable listing with secrets masked.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "  Server Port: {}", self.server_port);
        let _ = writeln!(
            out,
            "  MySQL: {}@{}:{}/{} (charset {}, password {})",
            self.mysql_username,
            self.mysql_host,
            self.mysql_port,
            self.mysql_dbname,
            self.mysql_charset,
            mask(&self.mysql_password)
        );
        let _ = writeln!(
            out,
            "  Redis: {}:{} db {} (password {})",
            self.redis_host,
            self.redis_port,
            self.redis_db,
            mask(&self.redis_password)
        );
        let _ = write!(
            out,
            "  DingTalk: appkey {}, appsecret {}",
            if self.dingtalk_appkey.is_empty() { "<unset>" } else { self.dingtalk_appkey.as_str() },
            mask(&self.dingtalk_appsecret)
        );
        out
    }
}

fn mask(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "****"
    }
}
