//! Runs against the server in `REDIS_URL` (default `redis://localhost:6379`):
//!
//! ```sh
//! cargo test -- --ignored
//! ```

use anyhow::{Context, Result};
use rand::Rng;
use redis_macros::{FromRedisValue, ToRedisArgs};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use redis_store::{
    ExpireOutcome, KeyOptions, Limit, PipelineOptions, RedisHash, RedisList, RedisSet,
    RedisSortedSet, RedisString, ScoreBound, Store, StoreOptions, Ttl,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn store_with_prefix(prefix: &str) -> Result<Store> {
    init_tracing();
    let options = StoreOptions {
        prefix: Some(prefix.to_string()),
        ..StoreOptions::from_env()
    };
    Store::initialize(options)
        .await
        .context("REDIS_URL should point at a running server")
}

async fn scratch_store() -> Result<Store> {
    let n: u32 = rand::thread_rng().gen();
    store_with_prefix(&format!("redis-store-test-{n}")).await
}

#[tokio::test]
#[ignore = "needs a redis server"]
async fn scalar_set_then_get() -> Result<()> {
    let store = store_with_prefix("app").await?;
    let counter: RedisString = RedisString::new(&store, KeyOptions::new("counter:{name}"))?;
    let args = [("name", "hits")];

    assert_eq!(counter.resolve(&args)?, "app:counter:hits");
    counter.set("5", &args).await?;
    let value: Option<String> = counter.get(&args).await?;
    assert_eq!(value.as_deref(), Some("5"));
    assert_eq!(counter.ttl(&args).await?, Ttl::Persistent);

    counter.delete(&args).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs a redis server"]
async fn hmset_applies_default_expiry() -> Result<()> {
    let store = scratch_store().await?;
    let profile: RedisHash = RedisHash::new(&store, KeyOptions::new("profile:{id}").exp(60))?;
    let args = [("id", "42")];

    let outcome = profile.hmset(&[("age", "30")], &args).await?;
    assert!(outcome.is_applied());
    let ttl = profile.ttl(&args).await?.seconds().context("ttl should be set")?;
    assert!(ttl > 0 && ttl <= 60, "ttl {ttl}");

    let age: Option<String> = profile.hget("age", &args).await?;
    assert_eq!(age.as_deref(), Some("30"));

    profile.delete(&args).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs a redis server"]
async fn set_with_expiry_and_setnx() -> Result<()> {
    let store = scratch_store().await?;
    let token: RedisString = RedisString::new(&store, KeyOptions::new("token:{id}").exp(30))?;
    let args = [("id", "1")];

    assert!(token.setnx("first", &args).await?);
    assert!(!token.setnx("second", &args).await?);
    let value: String = token.get(&args).await?;
    assert_eq!(value, "first");

    token.set("third", &args).await?;
    let ttl = token.ttl(&args).await?.seconds().context("ttl should be set")?;
    assert!(ttl > 0 && ttl <= 30, "ttl {ttl}");

    token.delete(&args).await?;
    assert_eq!(token.ttl(&args).await?, Ttl::Missing);
    Ok(())
}

#[tokio::test]
#[ignore = "needs a redis server"]
async fn expire_without_duration_changes_nothing() -> Result<()> {
    let store = scratch_store().await?;
    let plain: RedisString = RedisString::new(&store, KeyOptions::new("plain"))?;

    plain.set("x", &[]).await?;
    let outcome = plain.expire(None, &[]).await?;
    assert!(matches!(outcome, ExpireOutcome::Skipped));
    assert_eq!(plain.ttl(&[]).await?, Ttl::Persistent);

    plain.delete(&[]).await?;
    let outcome = plain.expire(Some(10), &[]).await?;
    assert!(matches!(outcome, ExpireOutcome::KeyMissing));
    Ok(())
}

#[tokio::test]
#[ignore = "needs a redis server"]
async fn sorted_set_paging_follows_full_order() -> Result<()> {
    let store = scratch_store().await?;
    let board: RedisSortedSet = RedisSortedSet::new(&store, KeyOptions::new("board"))?;
    let members: Vec<(String, f64)> = (0..10).map(|i| (format!("m{i}"), i as f64)).collect();
    board.zadd(&members, &[]).await?;

    let full: Vec<String> = board
        .zrangebyscore(ScoreBound::NegInf, ScoreBound::PosInf, None, &[])
        .await?;
    let page: Vec<String> = board
        .zrangebyscore(
            ScoreBound::NegInf,
            ScoreBound::PosInf,
            Some(Limit::new(3, 4)),
            &[],
        )
        .await?;
    assert_eq!(page, full[3..7].to_vec());

    let top: Vec<(String, f64)> = board.zpopmax(Some(1), &[]).await?;
    assert_eq!(top, vec![("m9".to_string(), 9.0)]);
    assert_eq!(board.zrank("m0", &[]).await?, Some(0));

    board.delete(&[]).await?;
    Ok(())
}

#[derive(Debug, PartialEq, Serialize, Deserialize, FromRedisValue, ToRedisArgs)]
struct Job {
    id: u32,
    name: String,
}

#[tokio::test]
#[ignore = "needs a redis server"]
async fn json_values_through_list_and_set() -> Result<()> {
    let store = scratch_store().await?;
    let queue: RedisList = RedisList::new(&store, KeyOptions::new("jobs:{queue}"))?;
    let seen: RedisSet = RedisSet::new(&store, KeyOptions::new("seen:{queue}"))?;
    let args = [("queue", "mail")];

    let job = Job {
        id: 7,
        name: "welcome".to_string(),
    };
    queue.rpush(&job, &args).await?;
    seen.sadd(job.id, &args).await?;

    let popped: Option<Job> = queue.blpop(1, &args).await?;
    assert_eq!(popped.as_ref(), Some(&job));
    assert!(seen.sismember(7, &args).await?);

    seen.delete(&args).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs a redis server"]
async fn transactional_pipeline_with_resolved_keys() -> Result<()> {
    let store = scratch_store().await?;
    let counter: RedisString = RedisString::new(&store, KeyOptions::new("count:{id}"))?;
    let log: RedisList = RedisList::new(&store, KeyOptions::new("log:{id}"))?;
    let args = [("id", "1")];

    let mut pipe = store.pipeline(PipelineOptions::default());
    pipe.cmd("INCR")
        .arg(counter.resolve(&args)?)
        .cmd("RPUSH")
        .arg(log.resolve(&args)?)
        .arg("incremented");
    let (count, len): (i64, i64) = store.execute(&pipe).await?;
    assert_eq!((count, len), (1, 1));

    counter.delete(&args).await?;
    log.delete(&args).await?;
    Ok(())
}
