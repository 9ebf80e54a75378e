use redis::aio::ConnectionLike;
use redis::{Arg, Cmd, FromRedisValue, RedisError};

use tracing::{debug, error, warn};

use crate::error::Result;

/// Outcome of a best-effort expiration.
///
/// Setting a TTL is a side effect that should never fail the primary write, so
/// transient failures are reported here instead of as an `Err`.
#[derive(Debug)]
pub enum ExpireOutcome {
    /// The server accepted the new TTL.
    Applied,
    /// The key did not exist, nothing was changed.
    KeyMissing,
    /// No duration was given and the key has no default expiration.
    Skipped,
    /// The command failed for a transient reason (I/O, dropped connection, timeout).
    Failed(RedisError),
}

impl ExpireOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ExpireOutcome::Applied)
    }
}

/// Command name and key, for logging.
fn describe(cmd: &Cmd) -> String {
    cmd.args_iter()
        .take(2)
        .map(|arg| match arg {
            Arg::Simple(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Arg::Cursor => "<cursor>".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sends a single command and decodes its reply.
pub(crate) async fn query<C, T>(conn: &mut C, cmd: &Cmd) -> Result<T>
where
    C: ConnectionLike + Send,
    T: FromRedisValue,
{
    debug!("redis {}", describe(cmd));
    let res: std::result::Result<T, RedisError> = cmd.query_async(conn).await;
    if let Err(e) = &res {
        error!("redis {} failed: {e}", describe(cmd));
    }
    Ok(res?)
}

pub(crate) fn is_transient(err: &RedisError) -> bool {
    err.is_io_error() || err.is_connection_dropped() || err.is_timeout()
}

/// `EXPIRE key seconds`, downgrading transient failures to [`ExpireOutcome::Failed`].
pub(crate) async fn expire<C>(
    conn: &mut C,
    key: &str,
    seconds: Option<u64>,
) -> Result<ExpireOutcome>
where
    C: ConnectionLike + Send,
{
    let Some(seconds) = seconds else {
        debug!("redis EXPIRE {key} skipped, no duration");
        return Ok(ExpireOutcome::Skipped);
    };

    let res: std::result::Result<bool, RedisError> = redis::cmd("EXPIRE")
        .arg(key)
        .arg(seconds)
        .query_async(conn)
        .await;

    match res {
        Ok(true) => Ok(ExpireOutcome::Applied),
        Ok(false) => Ok(ExpireOutcome::KeyMissing),
        Err(e) if is_transient(&e) => {
            warn!("redis EXPIRE {key} {seconds} ignored: {e}");
            Ok(ExpireOutcome::Failed(e))
        }
        Err(e) => Err(e.into()),
    }
}
