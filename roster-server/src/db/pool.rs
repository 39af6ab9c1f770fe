//! Database connection pool management
//!
//! Uses sqlx PgPool with an explicit connection limit. The database is often
//! still starting when the service comes up (compose, k8s), so the initial
//! connect runs in a bounded retry loop with a fixed delay between attempts.

use std::fmt;
use std::future::Future;
use std::io;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgConnection, PgPoolOptions};
use sqlx::{Connection, PgPool};

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default number of connection attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default delay between connection attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(3000);

/// How long a caller waits in the pool queue for a free connection.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on a single startup connection attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

const DEFAULT_PORT: u16 = 5432;

/// Where the store lives and who we are when we talk to it.
///
/// Required values have no defaults: a missing one surfaces as a failed
/// connection attempt rather than a silent fallback.
#[derive(Clone, Default)]
pub struct StoreConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl StoreConfig {
    /// Read `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD` and `DB_NAME`.
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        Self {
            host: var("DB_HOST"),
            port: parse_port(var("DB_PORT")),
            user: var("DB_USER"),
            password: var("DB_PASSWORD"),
            database: var("DB_NAME"),
        }
    }

    /// Build driver connect options, failing on the first missing setting.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        let host = require(&self.host, "DB_HOST")?;
        let user = require(&self.user, "DB_USER")?;
        let database = require(&self.database, "DB_NAME")?;

        let mut options = PgConnectOptions::new()
            .host(host)
            .port(self.port.unwrap_or(DEFAULT_PORT))
            .username(user)
            .database(database);
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        Ok(options)
    }
}

fn parse_port(raw: Option<String>) -> Option<u16> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(port) => Some(port),
        Err(_) => {
            tracing::warn!(value = %raw, default = DEFAULT_PORT, "DB_PORT is not a valid port, using default");
            None
        }
    }
}

fn require<'a>(value: &'a Option<String>, key: &'static str) -> Result<&'a str, sqlx::Error> {
    value
        .as_deref()
        .ok_or_else(|| sqlx::Error::Configuration(format!("{key} is not set").into()))
}

// Password stays out of logs.
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .finish()
    }
}

/// Pool sizing.
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    /// Hard cap on simultaneously open connections. Excess callers queue.
    pub max_connections: u32,
    /// How long a queued caller waits before the acquire fails.
    pub acquire_timeout: Duration,
    /// Bound on one startup connection attempt, separate from the retry delay.
    pub connect_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// Bounded retry with a fixed delay. Attempt 1 counts toward `max_attempts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// Zero attempts is treated as one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

/// The store stayed unreachable for every configured attempt.
#[derive(Debug, thiserror::Error)]
#[error("database unreachable after {attempts} attempt(s): {source}")]
pub struct ConnectionError {
    pub attempts: u32,
    #[source]
    pub source: sqlx::Error,
}

/// Open a pool and prove it is alive, retrying per `retry`.
///
/// # Errors
///
/// Returns [`ConnectionError`] carrying the last failure once all attempts
/// are spent.
///
/// # Example
///
/// ```ignore
/// let pool = acquire_pool(&StoreConfig::from_env(), PoolSettings::default(), RetryPolicy::default()).await?;
/// ```
pub async fn acquire_pool(
    config: &StoreConfig,
    settings: PoolSettings,
    retry: RetryPolicy,
) -> Result<PgPool, ConnectionError> {
    retry_connect(retry, |_| connect_once(config, settings)).await
}

/// Drive `connect` until it succeeds or the policy runs out.
///
/// `connect` receives the 1-based attempt index.
pub async fn retry_connect<T, F, Fut>(retry: RetryPolicy, mut connect: F) -> Result<T, ConnectionError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let max_attempts = retry.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match connect(attempt).await {
            Ok(value) => {
                tracing::info!(attempt, max_attempts, "database connected");
                return Ok(value);
            }
            Err(err) => {
                tracing::warn!(attempt, max_attempts, error = %err, "database connection failed");
                if attempt >= max_attempts {
                    return Err(ConnectionError {
                        attempts: attempt,
                        source: err,
                    });
                }
            }
        }

        tokio::time::sleep(retry.delay).await;
        attempt += 1;
    }
}

/// One attempt: a single direct connection with `SELECT 1`, then a lazy pool.
///
/// The pool's own connect path retries refused connections until
/// `acquire_timeout` and reports `PoolTimedOut`, so the liveness check goes
/// around it to fail fast with the driver's error.
async fn connect_once(config: &StoreConfig, settings: PoolSettings) -> Result<PgPool, sqlx::Error> {
    let options = config.connect_options()?;

    let mut conn = tokio::time::timeout(settings.connect_timeout, PgConnection::connect_with(&options))
        .await
        .map_err(|_| {
            sqlx::Error::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("connect timed out after {:?}", settings.connect_timeout),
            ))
        })??;

    // Liveness check
    sqlx::query("SELECT 1").execute(&mut conn).await?;
    conn.close().await?;

    Ok(PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_lazy_with(options))
}
