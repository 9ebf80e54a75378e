//! Templated Redis keys.
//!
//! A [`Store`] holds the shared connection and a namespace prefix. Key
//! wrappers ([`RedisString`], [`RedisList`], [`RedisSet`], [`RedisSortedSet`],
//! [`RedisHash`]) carry a template like `user:{id}:sessions` and an optional
//! default expiration; each call resolves `<prefix>:<template>` from its
//! arguments and forwards one command.
//!
//! ```no_run
//! use redis_store::{KeyOptions, RedisHash, Store, StoreOptions};
//!
//! # async fn run() -> redis_store::Result<()> {
//! let store = Store::initialize(StoreOptions {
//!     prefix: Some("app".into()),
//!     ..Default::default()
//! })
//! .await?;
//!
//! let profile: RedisHash = RedisHash::new(&store, KeyOptions::new("profile:{id}").exp(60))?;
//! profile.hmset(&[("age", "30")], &[("id", "42")]).await?;
//! let age: Option<String> = profile.hget("age", &[("id", "42")]).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod hash;
mod key;
mod list;
mod redis_comm;
mod set;
mod sorted_set;
mod store;
mod string;
mod template;

#[cfg(test)]
mod mock;

pub use error::{Error, Result};
pub use key::{
    kind, Args, KeyKind, KeyOptions, KeyType, RedisHash, RedisKey, RedisList, RedisSet,
    RedisSortedSet, RedisString, Ttl,
};
pub use redis_comm::ExpireOutcome;
pub use sorted_set::{LexBound, Limit, ScoreBound};
pub use store::{PipelineOptions, Store, StoreOptions, DEFAULT_PREFIX, DEFAULT_URL};
pub use template::Template;
