use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub draw: DrawConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// 空库首次启动时写入默认名单
    #[serde(default = "default_true")]
    pub seed_on_empty: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://roulette.db?mode=rwc".to_string(),
            max_connections: 10,
            seed_on_empty: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// "*" allows any origin
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "http://localhost:3000".to_string(),
        }
    }
}

/// Weighted draw parameters used by the spin endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Weight multiplier applied once per recorded win.
    pub win_decay: f64,
    /// Win counters older than this are ignored and restarted on the next win.
    pub reset_after_days: i64,
    /// A win inside this window halves the weight again.
    pub recent_win_days: i64,
    pub recent_win_factor: f64,
    pub history_limit: u64,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            win_decay: 0.7,
            reset_after_days: 90,
            recent_win_days: 7,
            recent_win_factor: 0.5,
            history_limit: 50,
        }
    }
}

/// Settings for the roster client and the wheel animation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base: String,
    pub request_timeout_ms: u64,
    /// 提示消息自动消失时间
    pub notice_ttl_ms: u64,
    /// Time the wheel spins before the draw request is sent.
    pub spin_delay_ms: u64,
    pub spin_tick_ms: u64,
    pub spin_step_deg: f64,
    pub settle_duration_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8080/api".to_string(),
            request_timeout_ms: 10_000,
            notice_ttl_ms: 3_000,
            spin_delay_ms: 5_000,
            spin_tick_ms: 30,
            spin_step_deg: 15.0,
            settle_duration_ms: 4_500,
        }
    }
}

impl ClientConfig {
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }

    pub fn spin_delay(&self) -> Duration {
        Duration::from_millis(self.spin_delay_ms)
    }

    pub fn spin_tick(&self) -> Duration {
        Duration::from_millis(self.spin_tick_ms)
    }

    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.settle_duration_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 配置文件不存在时使用默认值，随后统一由环境变量覆盖
        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => toml::from_str(&config_str).map_err(|e| {
                AppError::ConfigError(format!("failed to parse {config_path}: {e}"))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => Config::default(),
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "failed to read {config_path}: {e}"
                )));
            }
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// 权重系数必须落在 (0, 1]
    pub fn validate(&self) -> AppResult<()> {
        for (name, value) in [
            ("draw.win_decay", self.draw.win_decay),
            ("draw.recent_win_factor", self.draw.recent_win_factor),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(AppError::ConfigError(format!(
                    "{name} must be in (0, 1], got {value}"
                )));
            }
        }
        if self.client.spin_tick_ms == 0 {
            return Err(AppError::ConfigError(
                "client.spin_tick_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn apply_env(&mut self) {
        fn parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
            env::var(name).ok().and_then(|v| v.parse::<T>().ok())
        }

        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(p) = parsed("SERVER_PORT") {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(mc) = parsed("DB_MAX_CONNECTIONS") {
            self.database.max_connections = mc;
        }
        if let Some(seed) = parsed("DB_SEED_ON_EMPTY") {
            self.database.seed_on_empty = seed;
        }
        if let Ok(v) = env::var("CORS_ALLOWED_ORIGIN") {
            self.cors.allowed_origin = v;
        }
        if let Some(n) = parsed("DRAW_RESET_AFTER_DAYS") {
            self.draw.reset_after_days = n;
        }
        if let Some(n) = parsed("DRAW_RECENT_WIN_DAYS") {
            self.draw.recent_win_days = n;
        }
        if let Some(n) = parsed("DRAW_HISTORY_LIMIT") {
            self.draw.history_limit = n;
        }
        if let Ok(v) = env::var("ROULETTE_API_BASE") {
            self.client.api_base = v;
        }
        if let Some(ms) = parsed("ROULETTE_SPIN_DELAY_MS") {
            self.client.spin_delay_ms = ms;
        }
        if let Some(ms) = parsed("ROULETTE_NOTICE_TTL_MS") {
            self.client.notice_ttl_ms = ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [draw]
            history_limit = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.draw.history_limit, 10);
        assert_eq!(config.draw.reset_after_days, 90);
        assert_eq!(config.database.url, "sqlite://roulette.db?mode=rwc");
        assert!(config.database.seed_on_empty);
        assert_eq!(config.client.spin_tick_ms, 30);
    }

    #[test]
    fn test_client_durations() {
        let client = ClientConfig::default();
        assert_eq!(client.notice_ttl(), Duration::from_secs(3));
        assert_eq!(client.spin_delay(), Duration::from_secs(5));
        assert_eq!(client.settle_duration(), Duration::from_millis(4500));
    }

    #[test]
    fn test_validate_rejects_out_of_range_weights() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.draw.win_decay = 0.0;
        assert!(matches!(config.validate(), Err(AppError::ConfigError(_))));

        config.draw.win_decay = 0.7;
        config.draw.recent_win_factor = 1.5;
        assert!(matches!(config.validate(), Err(AppError::ConfigError(_))));
    }
}
