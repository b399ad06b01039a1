use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub db_max_connections: u32,
    pub webhook_url: String,
    pub webhook_timeout_secs: u64,
    pub retry_limit: u32,
    pub retry_delay_secs: u64,
    pub cache_ttl_secs: u64,
    pub incident_cache_key: String,
    pub webhook_queue_key: String,
    pub dead_letter_queue_key: String,
    pub stats_time_window_minutes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            redis_url: String::new(),
            server_host: "0.0.0.0".into(),
            server_port: 8080,
            api_base_uri: "/api/v1".into(),
            db_max_connections: 10,
            webhook_url: String::new(),
            webhook_timeout_secs: 5,
            retry_limit: 5,
            retry_delay_secs: 5,
            cache_ttl_secs: 60,
            incident_cache_key: "active_incidents".into(),
            webhook_queue_key: "webhook_queue".into(),
            dead_letter_queue_key: "webhook_dead_letter".into(),
            stats_time_window_minutes: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 从任意键值来源构建配置，未设置的可选项使用默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let required = |var: &'static str| lookup(var).ok_or(ConfigError::Missing(var));

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            webhook_url: required("WEBHOOK_URL")?,
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or(&lookup, "SERVER_PORT", defaults.server_port)?,
            api_base_uri: lookup("API_BASE_URI").unwrap_or(defaults.api_base_uri),
            db_max_connections: parse_or(
                &lookup,
                "DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,
            webhook_timeout_secs: parse_or(
                &lookup,
                "WEBHOOK_TIMEOUT_SECS",
                defaults.webhook_timeout_secs,
            )?,
            retry_limit: parse_or(&lookup, "RETRY_LIMIT", defaults.retry_limit)?,
            retry_delay_secs: parse_or(&lookup, "RETRY_DELAY_SECS", defaults.retry_delay_secs)?,
            cache_ttl_secs: parse_or(&lookup, "CACHE_TTL_SECS", defaults.cache_ttl_secs)?,
            incident_cache_key: lookup("INCIDENT_CACHE_KEY")
                .unwrap_or(defaults.incident_cache_key),
            webhook_queue_key: lookup("WEBHOOK_QUEUE_KEY").unwrap_or(defaults.webhook_queue_key),
            dead_letter_queue_key: lookup("DEAD_LETTER_QUEUE_KEY")
                .unwrap_or(defaults.dead_letter_queue_key),
            stats_time_window_minutes: parse_or(
                &lookup,
                "STATS_TIME_WINDOW_MINUTES",
                defaults.stats_time_window_minutes,
            )?,
        })
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }

    pub fn stats_window(&self) -> Duration {
        Duration::from_secs(self.stats_time_window_minutes * 60)
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}
