use redis::aio::ConnectionLike;
use redis::{FromRedisValue, ToRedisArgs};

use crate::error::Result;
use crate::key::{kind, Args, RedisKey};

impl<C> RedisKey<kind::List, C>
where
    C: ConnectionLike + Clone + Send + Sync,
{
    /// Elements between `start` and `stop`, both inclusive. Negative indexes
    /// count from the tail.
    pub async fn lrange<RV: FromRedisValue>(
        &self,
        start: isize,
        stop: isize,
        args: &Args<'_>,
    ) -> Result<RV> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("LRANGE").arg(&key).arg(start).arg(stop))
            .await
    }

    /// Pushes to the head. A `Vec` or slice pushes every element. Returns the new length.
    pub async fn lpush<V: ToRedisArgs>(&self, values: V, args: &Args<'_>) -> Result<i64> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("LPUSH").arg(&key).arg(values)).await
    }

    /// Pushes to the tail. Returns the new length.
    pub async fn rpush<V: ToRedisArgs>(&self, values: V, args: &Args<'_>) -> Result<i64> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("RPUSH").arg(&key).arg(values)).await
    }

    /// Removes from the head. Without `count` the reply is a single element
    /// (or nil), with it a list.
    pub async fn lpop<RV: FromRedisValue>(
        &self,
        count: Option<usize>,
        args: &Args<'_>,
    ) -> Result<RV> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("LPOP").arg(&key).arg(count)).await
    }

    pub async fn rpop<RV: FromRedisValue>(
        &self,
        count: Option<usize>,
        args: &Args<'_>,
    ) -> Result<RV> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("RPOP").arg(&key).arg(count)).await
    }

    /// Blocking pop from the head, waiting up to `timeout` seconds (0 waits
    /// forever). `None` when the timeout elapsed.
    ///
    /// Sent on [`crate::Store::dedicated_client`], so other commands on the
    /// store keep flowing while this one waits.
    pub async fn blpop<RV: FromRedisValue>(
        &self,
        timeout: u64,
        args: &Args<'_>,
    ) -> Result<Option<RV>> {
        self.blocking_pop("BLPOP", timeout, args).await
    }

    pub async fn brpop<RV: FromRedisValue>(
        &self,
        timeout: u64,
        args: &Args<'_>,
    ) -> Result<Option<RV>> {
        self.blocking_pop("BRPOP", timeout, args).await
    }

    pub async fn lindex<RV: FromRedisValue>(&self, index: isize, args: &Args<'_>) -> Result<RV> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("LINDEX").arg(&key).arg(index)).await
    }

    pub async fn llen(&self, args: &Args<'_>) -> Result<i64> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("LLEN").arg(&key)).await
    }

    /// Removes up to `count` occurrences of `value`: from the head when
    /// positive, from the tail when negative, all of them when 0.
    pub async fn lrem<V: ToRedisArgs>(
        &self,
        value: V,
        count: isize,
        args: &Args<'_>,
    ) -> Result<i64> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("LREM").arg(&key).arg(count).arg(value))
            .await
    }

    async fn blocking_pop<RV: FromRedisValue>(
        &self,
        command: &str,
        timeout: u64,
        args: &Args<'_>,
    ) -> Result<Option<RV>> {
        let key = self.resolve(args)?;
        // reply is [key, value]
        let popped: Option<(String, RV)> =
            self.query_dedicated(redis::cmd(command).arg(&key).arg(timeout))
                .await?;
        Ok(popped.map(|(_, value)| value))
    }
}
