use redis::aio::ConnectionLike;
use redis::{FromRedisValue, ToRedisArgs, Value};

use crate::error::Result;
use crate::key::{kind, Args, RedisKey};

impl<C> RedisKey<kind::Scalar, C>
where
    C: ConnectionLike + Clone + Send + Sync,
{
    pub async fn get<RV: FromRedisValue>(&self, args: &Args<'_>) -> Result<RV> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("GET").arg(&key)).await
    }

    /// `SET`, with `EX` when the key has a default expiration.
    pub async fn set<V: ToRedisArgs>(&self, value: V, args: &Args<'_>) -> Result<()> {
        let key = self.resolve(args)?;
        let mut cmd = redis::cmd("SET");
        cmd.arg(&key).arg(value);
        if let Some(exp) = self.default_expiry() {
            cmd.arg("EX").arg(exp);
        }
        self.query(&cmd).await
    }

    /// Sets the value only if the key is absent. Returns whether it was written.
    pub async fn setnx<V: ToRedisArgs>(&self, value: V, args: &Args<'_>) -> Result<bool> {
        let key = self.resolve(args)?;
        let mut cmd = redis::cmd("SET");
        cmd.arg(&key).arg(value).arg("NX");
        if let Some(exp) = self.default_expiry() {
            cmd.arg("EX").arg(exp);
        }
        let reply: Option<Value> = self.query(&cmd).await?;
        Ok(reply.is_some())
    }
}
