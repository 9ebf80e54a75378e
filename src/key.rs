use std::fmt;
use std::marker::PhantomData;

use redis::aio::{ConnectionLike, ConnectionManager};
use redis::{Cmd, FromRedisValue, RedisResult, Value};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::redis_comm::{self, ExpireOutcome};
use crate::store::Store;
use crate::template::Template;

/// Template arguments, the `{name}` -> value pairs used to resolve a key.
pub type Args<'a> = [(&'a str, &'a str)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Scalar,
    List,
    Set,
    SortedSet,
    Hash,
}

impl KeyType {
    pub fn is_scalar(&self) -> bool {
        self == &KeyType::Scalar
    }
    pub fn is_list(&self) -> bool {
        self == &KeyType::List
    }
    pub fn is_set(&self) -> bool {
        self == &KeyType::Set
    }
    pub fn is_sorted_set(&self) -> bool {
        self == &KeyType::SortedSet
    }
    pub fn is_hash(&self) -> bool {
        self == &KeyType::Hash
    }

    /// The name the server reports for this kind in `TYPE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Scalar => "string",
            KeyType::List => "list",
            KeyType::Set => "set",
            KeyType::SortedSet => "zset",
            KeyType::Hash => "hash",
        }
    }
}

/// Marker trait tying a wrapper to the data structure it addresses.
pub trait KeyKind {
    const TYPE: KeyType;
}

pub mod kind {
    use super::{KeyKind, KeyType};

    #[derive(Debug)]
    pub struct Scalar;
    #[derive(Debug)]
    pub struct List;
    #[derive(Debug)]
    pub struct Set;
    #[derive(Debug)]
    pub struct SortedSet;
    #[derive(Debug)]
    pub struct Hash;

    impl KeyKind for Scalar {
        const TYPE: KeyType = KeyType::Scalar;
    }
    impl KeyKind for List {
        const TYPE: KeyType = KeyType::List;
    }
    impl KeyKind for Set {
        const TYPE: KeyType = KeyType::Set;
    }
    impl KeyKind for SortedSet {
        const TYPE: KeyType = KeyType::SortedSet;
    }
    impl KeyKind for Hash {
        const TYPE: KeyType = KeyType::Hash;
    }
}

/// Construction options for a key wrapper.
///
/// `tpl` is required; `exp` is a default expiration in seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyOptions {
    pub tpl: Option<String>,
    pub exp: Option<u64>,
}

impl KeyOptions {
    pub fn new(tpl: impl Into<String>) -> Self {
        KeyOptions {
            tpl: Some(tpl.into()),
            exp: None,
        }
    }

    pub fn exp(mut self, seconds: u64) -> Self {
        self.exp = Some(seconds);
        self
    }
}

/// Remaining time to live of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// The key does not exist.
    Missing,
    /// The key exists without an expiration.
    Persistent,
    Seconds(u64),
}

impl Ttl {
    pub fn seconds(&self) -> Option<u64> {
        match self {
            Ttl::Seconds(s) => Some(*s),
            _ => None,
        }
    }
}

impl FromRedisValue for Ttl {
    fn from_redis_value(v: &Value) -> RedisResult<Self> {
        Ok(match i64::from_redis_value(v)? {
            -2 => Ttl::Missing,
            n if n < 0 => Ttl::Persistent,
            n => Ttl::Seconds(n as u64),
        })
    }
}

/// A templated key of kind `K`.
///
/// The wrapper only carries addressing metadata, every operation resolves
/// `<prefix>:<template>` from the call's arguments and issues one command on
/// the store's shared connection.
pub struct RedisKey<K, C = ConnectionManager> {
    store: Store<C>,
    template: Template,
    expire: Option<u64>,
    kind: PhantomData<K>,
}

pub type RedisString<C = ConnectionManager> = RedisKey<kind::Scalar, C>;
pub type RedisList<C = ConnectionManager> = RedisKey<kind::List, C>;
pub type RedisSet<C = ConnectionManager> = RedisKey<kind::Set, C>;
pub type RedisSortedSet<C = ConnectionManager> = RedisKey<kind::SortedSet, C>;
pub type RedisHash<C = ConnectionManager> = RedisKey<kind::Hash, C>;

impl<K, C> RedisKey<K, C>
where
    K: KeyKind,
    C: ConnectionLike + Clone + Send + Sync,
{
    /// # Errors
    ///
    /// [`Error::MissingTemplate`] without `tpl`, [`Error::InvalidTemplate`]
    /// when the template does not parse.
    pub fn new(store: &Store<C>, options: KeyOptions) -> Result<Self> {
        let tpl = options.tpl.ok_or(Error::MissingTemplate)?;
        Ok(RedisKey {
            store: store.clone(),
            template: Template::parse(&tpl)?,
            expire: options.exp,
            kind: PhantomData,
        })
    }

    pub fn key_type(&self) -> KeyType {
        K::TYPE
    }

    pub fn template(&self) -> &str {
        self.template.as_str()
    }

    pub fn default_expiry(&self) -> Option<u64> {
        self.expire
    }

    /// The fully qualified key, `<prefix>:<template with args substituted>`.
    pub fn resolve(&self, args: &Args<'_>) -> Result<String> {
        Ok(self.store.qualify(&self.template.format(args)?))
    }

    pub async fn ttl(&self, args: &Args<'_>) -> Result<Ttl> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("TTL").arg(&key)).await
    }

    /// Sets the expiration to `seconds`, or to the default expiration when
    /// `None`. With neither, nothing is sent and [`ExpireOutcome::Skipped`] is
    /// returned.
    pub async fn expire(&self, seconds: Option<u64>, args: &Args<'_>) -> Result<ExpireOutcome> {
        let key = self.resolve(args)?;
        self.reset_expiry(&key, seconds).await
    }

    /// Returns the number of keys removed.
    pub async fn delete(&self, args: &Args<'_>) -> Result<i64> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("DEL").arg(&key)).await
    }

    pub async fn exists(&self, args: &Args<'_>) -> Result<bool> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("EXISTS").arg(&key)).await
    }

    pub(crate) async fn reset_expiry(
        &self,
        key: &str,
        seconds: Option<u64>,
    ) -> Result<ExpireOutcome> {
        let mut conn = self.store.client();
        redis_comm::expire(&mut conn, key, seconds.or(self.expire)).await
    }

    pub(crate) async fn query<T: FromRedisValue>(&self, cmd: &Cmd) -> Result<T> {
        let mut conn = self.store.client();
        redis_comm::query(&mut conn, cmd).await
    }

    /// Runs `cmd` on a connection of its own so that a command the server
    /// parks does not hold up the shared one.
    pub(crate) async fn query_dedicated<T: FromRedisValue>(&self, cmd: &Cmd) -> Result<T> {
        let mut conn = self.store.dedicated_client().await?;
        redis_comm::query(&mut conn, cmd).await
    }
}

impl<K, C> Clone for RedisKey<K, C>
where
    C: Clone,
{
    fn clone(&self) -> Self {
        RedisKey {
            store: self.store.clone(),
            template: self.template.clone(),
            expire: self.expire,
            kind: PhantomData,
        }
    }
}

impl<K: KeyKind, C> fmt::Debug for RedisKey<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisKey")
            .field("type", &K::TYPE)
            .field("template", &self.template.as_str())
            .field("expire", &self.expire)
            .finish()
    }
}
