use std::env;
use std::fmt;
use std::sync::Arc;

use redis::aio::{ConnectionLike, ConnectionManager};
use redis::{Client, ConnectionInfo, FromRedisValue, Pipeline, RedisFuture};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::Result;

pub const DEFAULT_URL: &str = "redis://localhost:6379";
pub const DEFAULT_PREFIX: &str = "redis-store";

type Connect<C> = Arc<dyn Fn() -> RedisFuture<'static, C> + Send + Sync>;

/// Options accepted by [`Store::initialize`].
///
/// # Environment Variables
/// - `REDIS_URL` - connection endpoint (default: `redis://localhost:6379`)
/// - `REDIS_PREFIX` - key namespace (default: `redis-store`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    pub url: Option<String>,
    pub prefix: Option<String>,
}

impl StoreOptions {
    pub fn from_env() -> Self {
        Self {
            url: env::var("REDIS_URL").ok(),
            prefix: env::var("REDIS_PREFIX").ok(),
        }
    }

    /// An empty url falls back to the default, an empty prefix is kept.
    pub fn url(&self) -> &str {
        match self.url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => DEFAULT_URL,
        }
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or(DEFAULT_PREFIX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Wrap the batch in MULTI/EXEC.
    pub transaction: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { transaction: true }
    }
}

/// Shared connection handle and key namespace.
///
/// Cloning is cheap; every key wrapper holds its own clone. Building a new
/// store with [`Store::initialize`] does not affect wrappers created from an
/// older one.
///
/// Commands that park their connection on the server (`BLPOP`, `BRPOP`) run
/// on a connection of their own, opened through the connector set with
/// [`Store::with_dedicated`]. Without one they share [`Store::client`].
#[derive(Clone)]
pub struct Store<C = ConnectionManager> {
    prefix: Arc<str>,
    conn: C,
    connect: Option<Connect<C>>,
}

impl Store<ConnectionManager> {
    /// Connects to the server described by `options`.
    ///
    /// # Errors
    ///
    /// Fails if the url cannot be parsed or the first connection attempt fails.
    pub async fn initialize(options: StoreOptions) -> Result<Self> {
        let client = Client::open(options.url())?;
        let conn = ConnectionManager::new(client.clone()).await?;
        info!(
            "redis store connected to {} with prefix '{}'",
            endpoint(client.get_connection_info()),
            options.prefix()
        );
        let store = Store::with_connection(options.prefix(), conn).with_dedicated(
            move || -> RedisFuture<'static, ConnectionManager> {
                let client = client.clone();
                Box::pin(async move { ConnectionManager::new(client).await })
            },
        );
        Ok(store)
    }
}

/// Host and port (or socket path), without the credentials a url may carry.
fn endpoint(info: &ConnectionInfo) -> String {
    info.addr.to_string()
}

impl<C> Store<C>
where
    C: ConnectionLike + Clone + Send + Sync,
{
    pub fn with_connection(prefix: impl Into<String>, conn: C) -> Self {
        Store {
            prefix: Arc::from(prefix.into()),
            conn,
            connect: None,
        }
    }

    /// Sets how a connection for blocking commands is opened.
    pub fn with_dedicated<F>(mut self, connect: F) -> Self
    where
        F: Fn() -> RedisFuture<'static, C> + Send + Sync + 'static,
    {
        self.connect = Some(Arc::new(connect));
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// A handle to the shared connection.
    pub fn client(&self) -> C {
        self.conn.clone()
    }

    /// A connection nothing else is queued on, for commands that hold it
    /// until they return. Falls back to the shared connection when no
    /// connector was set.
    pub async fn dedicated_client(&self) -> Result<C> {
        match &self.connect {
            Some(connect) => Ok(connect().await?),
            None => Ok(self.client()),
        }
    }

    /// An empty command batch, atomic when `options.transaction` is set.
    pub fn pipeline(&self, options: PipelineOptions) -> Pipeline {
        let mut pipe = redis::pipe();
        if options.transaction {
            pipe.atomic();
        }
        pipe
    }

    pub async fn execute<T: FromRedisValue>(&self, pipe: &Pipeline) -> Result<T> {
        debug!("redis pipeline on '{}'", self.prefix);
        let mut conn = self.client();
        Ok(pipe.query_async(&mut conn).await?)
    }

    pub(crate) fn qualify(&self, key: &str) -> String {
        format!("{}:{key}", self.prefix)
    }
}

impl<C> fmt::Debug for Store<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("prefix", &self.prefix)
            .field("dedicated", &self.connect.is_some())
            .finish_non_exhaustive()
    }
}
