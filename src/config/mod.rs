use std::{env, str::FromStr, time::Duration};

use axum::http::HeaderValue;

use crate::models::{LayoutError, SeatLayout};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
    #[error("SEAT_ROWS is invalid: {0}")]
    Layout(#[from] LayoutError),
}

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub booking: BookingConfig,
}

// Настройки приложения
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub frontend_url: Option<String>,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Origins, которым разрешён CORS: в production только фронтенд,
    /// иначе локальные dev-серверы.
    pub fn allowed_origins(&self) -> Vec<String> {
        if self.is_production() {
            self.frontend_url.iter().cloned().collect()
        } else {
            vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ]
        }
    }
}

// Настройки базы данных
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub acquire_timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            _ => Err(()),
        }
    }
}

// Политика бронирования и раскладка зала
#[derive(Debug, Clone)]
pub struct BookingConfig {
    pub max_seats_per_booking: u32,
    pub lock_timeout: Duration,
    pub layout: SeatLayout,
    pub store: StoreKind,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Собирает конфигурацию из произвольного источника переменных.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &'static str, default: &str| {
            lookup(name).unwrap_or_else(|| default.to_string())
        };

        let store = parse("SEAT_STORE", var("SEAT_STORE", "postgres"))?;
        let database_url = match (store, lookup("DATABASE_URL")) {
            (_, Some(url)) => url,
            (StoreKind::Memory, None) => String::new(),
            (StoreKind::Postgres, None) => return Err(ConfigError::Missing("DATABASE_URL")),
        };

        let max_seats_per_booking: u32 =
            parse("MAX_SEATS_PER_BOOKING", var("MAX_SEATS_PER_BOOKING", "7"))?;
        if max_seats_per_booking == 0 {
            return Err(ConfigError::Invalid {
                name: "MAX_SEATS_PER_BOOKING",
                value: "0".to_string(),
            });
        }

        // 0 в PostgreSQL отключает lock_timeout, а в памяти означает мгновенный отказ
        let lock_timeout_ms: u64 =
            parse("BOOKING_LOCK_TIMEOUT_MS", var("BOOKING_LOCK_TIMEOUT_MS", "5000"))?;
        if lock_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "BOOKING_LOCK_TIMEOUT_MS",
                value: "0".to_string(),
            });
        }

        let layout = match lookup("SEAT_ROWS") {
            Some(rows) => rows.parse::<SeatLayout>()?,
            None => SeatLayout::default(),
        };

        let app = AppConfig {
            host: var("HOST", "0.0.0.0"),
            port: parse("PORT", var("PORT", "5000"))?,
            environment: var("ENVIRONMENT", "development"),
            rust_log: var("RUST_LOG", "seat_booking=debug,tower_http=debug"),
            frontend_url: lookup("FRONTEND_URL"),
        };
        for origin in app.allowed_origins() {
            if HeaderValue::from_str(&origin).is_err() {
                return Err(ConfigError::Invalid {
                    name: "FRONTEND_URL",
                    value: origin,
                });
            }
        }

        Ok(Config {
            app,
            database: DatabaseConfig {
                url: database_url,
                pool_size: parse("DB_POOL_SIZE", var("DB_POOL_SIZE", "20"))?,
                acquire_timeout: Duration::from_secs(parse(
                    "DB_ACQUIRE_TIMEOUT_SECS",
                    var("DB_ACQUIRE_TIMEOUT_SECS", "5"),
                )?),
            },
            booking: BookingConfig {
                max_seats_per_booking,
                lock_timeout: Duration::from_millis(lock_timeout_ms),
                layout,
                store,
            },
        })
    }
}

fn parse<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
