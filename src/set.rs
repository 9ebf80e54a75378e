use redis::aio::ConnectionLike;
use redis::{FromRedisValue, ToRedisArgs};

use crate::error::Result;
use crate::key::{kind, Args, RedisKey};

impl<C> RedisKey<kind::Set, C>
where
    C: ConnectionLike + Clone + Send + Sync,
{
    /// Returns how many members were newly added.
    pub async fn sadd<V: ToRedisArgs>(&self, members: V, args: &Args<'_>) -> Result<i64> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("SADD").arg(&key).arg(members)).await
    }

    pub async fn sismember<V: ToRedisArgs>(&self, member: V, args: &Args<'_>) -> Result<bool> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("SISMEMBER").arg(&key).arg(member))
            .await
    }

    pub async fn scard(&self, args: &Args<'_>) -> Result<i64> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("SCARD").arg(&key)).await
    }

    pub async fn smembers<RV: FromRedisValue>(&self, args: &Args<'_>) -> Result<RV> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("SMEMBERS").arg(&key)).await
    }

    /// Removes and returns random members, one (or nil) without `count`.
    pub async fn spop<RV: FromRedisValue>(
        &self,
        count: Option<usize>,
        args: &Args<'_>,
    ) -> Result<RV> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("SPOP").arg(&key).arg(count)).await
    }

    pub async fn srem<V: ToRedisArgs>(&self, members: V, args: &Args<'_>) -> Result<i64> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("SREM").arg(&key).arg(members)).await
    }
}
