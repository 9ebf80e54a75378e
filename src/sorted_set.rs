use std::fmt;

use redis::aio::ConnectionLike;
use redis::{FromRedisValue, RedisWrite, ToRedisArgs};

use crate::error::Result;
use crate::key::{kind, Args, RedisKey};

/// One end of a score range: `n`, `(n`, `-inf` or `+inf` on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreBound {
    Inclusive(f64),
    Exclusive(f64),
    NegInf,
    PosInf,
}

/// One end of a lexicographic range: `[v`, `(v`, `-` or `+` on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexBound {
    Inclusive(String),
    Exclusive(String),
    Min,
    Max,
}

/// `LIMIT offset count` paging for the by-score and by-lex range queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub offset: usize,
    pub count: usize,
}

impl Limit {
    pub fn new(offset: usize, count: usize) -> Self {
        Limit { offset, count }
    }
}

fn write_score(f: &mut fmt::Formatter<'_>, score: f64) -> fmt::Result {
    if score.is_infinite() {
        f.write_str(if score > 0.0 { "+inf" } else { "-inf" })
    } else {
        write!(f, "{score}")
    }
}

impl fmt::Display for ScoreBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreBound::Inclusive(score) => write_score(f, *score),
            ScoreBound::Exclusive(score) => {
                f.write_str("(")?;
                write_score(f, *score)
            }
            ScoreBound::NegInf => f.write_str("-inf"),
            ScoreBound::PosInf => f.write_str("+inf"),
        }
    }
}

impl fmt::Display for LexBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexBound::Inclusive(v) => write!(f, "[{v}"),
            LexBound::Exclusive(v) => write!(f, "({v}"),
            LexBound::Min => f.write_str("-"),
            LexBound::Max => f.write_str("+"),
        }
    }
}

impl From<f64> for ScoreBound {
    fn from(score: f64) -> Self {
        ScoreBound::Inclusive(score)
    }
}

impl ToRedisArgs for ScoreBound {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        out.write_arg(self.to_string().as_bytes())
    }
}

impl ToRedisArgs for LexBound {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        out.write_arg(self.to_string().as_bytes())
    }
}

impl ToRedisArgs for Limit {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        out.write_arg(b"LIMIT");
        self.offset.write_redis_args(out);
        self.count.write_redis_args(out);
    }
}

impl<C> RedisKey<kind::SortedSet, C>
where
    C: ConnectionLike + Clone + Send + Sync,
{
    /// `ZADD key score member ...`. Returns how many members were new.
    pub async fn zadd<M: ToRedisArgs>(&self, members: &[(M, f64)], args: &Args<'_>) -> Result<i64> {
        let key = self.resolve(args)?;
        let mut cmd = redis::cmd("ZADD");
        cmd.arg(&key);
        for (member, score) in members {
            cmd.arg(*score).arg(member);
        }
        self.query(&cmd).await
    }

    pub async fn zcard(&self, args: &Args<'_>) -> Result<i64> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("ZCARD").arg(&key)).await
    }

    pub async fn zcount(&self, min: ScoreBound, max: ScoreBound, args: &Args<'_>) -> Result<i64> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("ZCOUNT").arg(&key).arg(min).arg(max))
            .await
    }

    /// Returns the new score.
    pub async fn zincrby<M: ToRedisArgs>(
        &self,
        amount: f64,
        member: M,
        args: &Args<'_>,
    ) -> Result<f64> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("ZINCRBY").arg(&key).arg(amount).arg(member))
            .await
    }

    pub async fn zscore<M: ToRedisArgs>(&self, member: M, args: &Args<'_>) -> Result<Option<f64>> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("ZSCORE").arg(&key).arg(member)).await
    }

    /// Zero-based rank by ascending score.
    pub async fn zrank<M: ToRedisArgs>(&self, member: M, args: &Args<'_>) -> Result<Option<i64>> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("ZRANK").arg(&key).arg(member)).await
    }

    /// Zero-based rank by descending score.
    pub async fn zrevrank<M: ToRedisArgs>(
        &self,
        member: M,
        args: &Args<'_>,
    ) -> Result<Option<i64>> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("ZREVRANK").arg(&key).arg(member))
            .await
    }

    /// Members by index, ascending.
    pub async fn zrange<RV: FromRedisValue>(
        &self,
        start: isize,
        stop: isize,
        args: &Args<'_>,
    ) -> Result<RV> {
        self.index_range("ZRANGE", start, stop, false, args).await
    }

    pub async fn zrange_withscores<RV: FromRedisValue>(
        &self,
        start: isize,
        stop: isize,
        args: &Args<'_>,
    ) -> Result<Vec<(RV, f64)>> {
        self.index_range("ZRANGE", start, stop, true, args).await
    }

    /// Members by index, descending.
    pub async fn zrevrange<RV: FromRedisValue>(
        &self,
        start: isize,
        stop: isize,
        args: &Args<'_>,
    ) -> Result<RV> {
        self.index_range("ZREVRANGE", start, stop, false, args).await
    }

    pub async fn zrevrange_withscores<RV: FromRedisValue>(
        &self,
        start: isize,
        stop: isize,
        args: &Args<'_>,
    ) -> Result<Vec<(RV, f64)>> {
        self.index_range("ZREVRANGE", start, stop, true, args).await
    }

    pub async fn zrangebyscore<RV: FromRedisValue>(
        &self,
        min: ScoreBound,
        max: ScoreBound,
        limit: Option<Limit>,
        args: &Args<'_>,
    ) -> Result<RV> {
        self.bounded_range("ZRANGEBYSCORE", min, max, limit, false, args)
            .await
    }

    pub async fn zrangebyscore_withscores<RV: FromRedisValue>(
        &self,
        min: ScoreBound,
        max: ScoreBound,
        limit: Option<Limit>,
        args: &Args<'_>,
    ) -> Result<Vec<(RV, f64)>> {
        self.bounded_range("ZRANGEBYSCORE", min, max, limit, true, args)
            .await
    }

    /// Note the bounds come `max` first, as in the command.
    pub async fn zrevrangebyscore<RV: FromRedisValue>(
        &self,
        max: ScoreBound,
        min: ScoreBound,
        limit: Option<Limit>,
        args: &Args<'_>,
    ) -> Result<RV> {
        self.bounded_range("ZREVRANGEBYSCORE", max, min, limit, false, args)
            .await
    }

    pub async fn zrevrangebyscore_withscores<RV: FromRedisValue>(
        &self,
        max: ScoreBound,
        min: ScoreBound,
        limit: Option<Limit>,
        args: &Args<'_>,
    ) -> Result<Vec<(RV, f64)>> {
        self.bounded_range("ZREVRANGEBYSCORE", max, min, limit, true, args)
            .await
    }

    pub async fn zrangebylex<RV: FromRedisValue>(
        &self,
        min: LexBound,
        max: LexBound,
        limit: Option<Limit>,
        args: &Args<'_>,
    ) -> Result<RV> {
        self.bounded_range("ZRANGEBYLEX", min, max, limit, false, args)
            .await
    }

    pub async fn zrevrangebylex<RV: FromRedisValue>(
        &self,
        max: LexBound,
        min: LexBound,
        limit: Option<Limit>,
        args: &Args<'_>,
    ) -> Result<RV> {
        self.bounded_range("ZREVRANGEBYLEX", max, min, limit, false, args)
            .await
    }

    /// Returns how many members were removed.
    pub async fn zrem<M: ToRedisArgs>(&self, members: M, args: &Args<'_>) -> Result<i64> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("ZREM").arg(&key).arg(members)).await
    }

    pub async fn zremrangebylex(
        &self,
        min: LexBound,
        max: LexBound,
        args: &Args<'_>,
    ) -> Result<i64> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("ZREMRANGEBYLEX").arg(&key).arg(min).arg(max))
            .await
    }

    pub async fn zremrangebyrank(&self, start: isize, stop: isize, args: &Args<'_>) -> Result<i64> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("ZREMRANGEBYRANK").arg(&key).arg(start).arg(stop))
            .await
    }

    pub async fn zremrangebyscore(
        &self,
        min: ScoreBound,
        max: ScoreBound,
        args: &Args<'_>,
    ) -> Result<i64> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("ZREMRANGEBYSCORE").arg(&key).arg(min).arg(max))
            .await
    }

    /// Removes and returns the lowest scored members, one without `count`.
    pub async fn zpopmin<RV: FromRedisValue>(
        &self,
        count: Option<usize>,
        args: &Args<'_>,
    ) -> Result<Vec<(RV, f64)>> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("ZPOPMIN").arg(&key).arg(count)).await
    }

    pub async fn zpopmax<RV: FromRedisValue>(
        &self,
        count: Option<usize>,
        args: &Args<'_>,
    ) -> Result<Vec<(RV, f64)>> {
        let key = self.resolve(args)?;
        self.query(redis::cmd("ZPOPMAX").arg(&key).arg(count)).await
    }

    async fn index_range<RV: FromRedisValue>(
        &self,
        command: &str,
        start: isize,
        stop: isize,
        with_scores: bool,
        args: &Args<'_>,
    ) -> Result<RV> {
        let key = self.resolve(args)?;
        let mut cmd = redis::cmd(command);
        cmd.arg(&key).arg(start).arg(stop);
        if with_scores {
            cmd.arg("WITHSCORES");
        }
        self.query(&cmd).await
    }

    /// `<command> key from to [LIMIT offset count] [WITHSCORES]`
    async fn bounded_range<B, RV>(
        &self,
        command: &str,
        from: B,
        to: B,
        limit: Option<Limit>,
        with_scores: bool,
        args: &Args<'_>,
    ) -> Result<RV>
    where
        B: ToRedisArgs,
        RV: FromRedisValue,
    {
        let key = self.resolve(args)?;
        let mut cmd = redis::cmd(command);
        cmd.arg(&key).arg(from).arg(to).arg(limit);
        if with_scores {
            cmd.arg("WITHSCORES");
        }
        self.query(&cmd).await
    }
}
