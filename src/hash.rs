use redis::aio::ConnectionLike;
use redis::{FromRedisValue, ToRedisArgs};

use crate::error::Result;
use crate::key::{kind, Args, RedisKey};
use crate::redis_comm::ExpireOutcome;

impl<C> RedisKey<kind::Hash, C>
where
    C: ConnectionLike + Clone + Send + Sync,
{
    pub async fn hget<F, RV>(&self, field: F, args: &Args<'_>) -> Result<RV>
    where
        F: ToRedisArgs,
        RV: FromRedisValue,
    {
        let key = self.resolve(args)?;
        self.query(redis::cmd("HGET").arg(&key).arg(field)).await
    }

    /// Returns 1 when the field is new, 0 when it was overwritten.
    pub async fn hset<F, V>(&self, field: F, value: V, args: &Args<'_>) -> Result<i64>
    where
        F: ToRedisArgs,
        V: ToRedisArgs,
    {
        let key = self.resolve(args)?;
        self.query(redis::cmd("HSET").arg(&key).arg(field).arg(value))
            .await
    }

    pub async fn hdel<F: ToRedisArgs>(&self, fields: F, args: &Args<'_>) -> Result<i64> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("HDEL").arg(&key).arg(fields)).await
    }

    /// Writes every pair with `HMSET`, then resets the key's default
    /// expiration.
    ///
    /// The two commands are sent one after the other, not as a transaction: if
    /// the second one is lost the fields stay written without a TTL. Use
    /// [`crate::Store::pipeline`] when both must apply together.
    pub async fn hmset<F, V>(&self, items: &[(F, V)], args: &Args<'_>) -> Result<ExpireOutcome>
    where
        F: ToRedisArgs,
        V: ToRedisArgs,
    {
        let key = self.resolve(args)?;
        let mut cmd = redis::cmd("HMSET");
        cmd.arg(&key);
        for (field, value) in items {
            cmd.arg(field).arg(value);
        }
        self.query::<()>(&cmd).await?;
        self.reset_expiry(&key, None).await
    }

    pub async fn hsetnx<F, V>(&self, field: F, value: V, args: &Args<'_>) -> Result<bool>
    where
        F: ToRedisArgs,
        V: ToRedisArgs,
    {
        let key = self.resolve(args)?;
        self.query(redis::cmd("HSETNX").arg(&key).arg(field).arg(value))
            .await
    }

    pub async fn hexists<F: ToRedisArgs>(&self, field: F, args: &Args<'_>) -> Result<bool> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("HEXISTS").arg(&key).arg(field)).await
    }

    pub async fn hkeys<RV: FromRedisValue>(&self, args: &Args<'_>) -> Result<RV> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("HKEYS").arg(&key)).await
    }

    pub async fn hgetall<RV: FromRedisValue>(&self, args: &Args<'_>) -> Result<RV> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("HGETALL").arg(&key)).await
    }
}
