use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures::future::{self, FutureExt};
use redis::aio::ConnectionLike;
use redis::{Arg, Cmd, Pipeline, RedisFuture, RedisResult, Value};
use tokio::sync::Mutex as Line;

use crate::store::Store;

/// Scripted connection: records every command it receives and replays
/// canned replies in order. Unscripted commands get `Nil`.
///
/// Like a real connection it answers one command at a time: a command marked
/// with [`MockConnection::hang`] never returns and stalls every later command
/// sent on the same line. [`MockConnection::sibling`] opens another line that
/// shares the script and the record.
#[derive(Clone, Default)]
pub(crate) struct MockConnection {
    state: Arc<Mutex<MockState>>,
    line: Arc<Line<()>>,
}

#[derive(Default)]
struct MockState {
    commands: Vec<Vec<String>>,
    replies: VecDeque<RedisResult<Value>>,
    pipelines: Vec<String>,
    pipeline_replies: VecDeque<RedisResult<Vec<Value>>>,
    hanging: Vec<String>,
}

impl MockConnection {
    pub(crate) fn store(prefix: &str) -> (Store<MockConnection>, MockConnection) {
        let conn = MockConnection::default();
        (Store::with_connection(prefix, conn.clone()), conn)
    }

    pub(crate) fn reply(&self, value: Value) -> &Self {
        self.state.lock().unwrap().replies.push_back(Ok(value));
        self
    }

    pub(crate) fn fail(&self, err: redis::RedisError) -> &Self {
        self.state.lock().unwrap().replies.push_back(Err(err));
        self
    }

    pub(crate) fn reply_pipeline(&self, values: Vec<Value>) -> &Self {
        self.state
            .lock()
            .unwrap()
            .pipeline_replies
            .push_back(Ok(values));
        self
    }

    /// Commands named `name` are recorded but never answered.
    pub(crate) fn hang(&self, name: &str) -> &Self {
        self.state.lock().unwrap().hanging.push(name.to_string());
        self
    }

    pub(crate) fn sibling(&self) -> MockConnection {
        MockConnection {
            state: self.state.clone(),
            line: Arc::default(),
        }
    }

    pub(crate) fn same_line(&self, other: &MockConnection) -> bool {
        Arc::ptr_eq(&self.line, &other.line)
    }

    pub(crate) fn commands(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().commands.clone()
    }

    pub(crate) fn last_command(&self) -> Vec<String> {
        self.commands().pop().unwrap_or_default()
    }

    pub(crate) fn pipelines(&self) -> Vec<String> {
        self.state.lock().unwrap().pipelines.clone()
    }
}

fn args(cmd: &Cmd) -> Vec<String> {
    cmd.args_iter()
        .map(|arg| match arg {
            Arg::Simple(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Arg::Cursor => "<cursor>".to_string(),
        })
        .collect()
}

impl ConnectionLike for MockConnection {
    fn req_packed_command<'a>(&'a mut self, cmd: &'a Cmd) -> RedisFuture<'a, Value> {
        let args = args(cmd);
        let mut state = self.state.lock().unwrap();
        let hangs = state.hanging.iter().any(|name| args[0] == *name);
        let reply = if hangs {
            None
        } else {
            Some(state.replies.pop_front().unwrap_or(Ok(Value::Nil)))
        };
        state.commands.push(args);
        let line = self.line.clone();
        async move {
            let _turn = line.lock().await;
            match reply {
                Some(reply) => reply,
                None => future::pending().await,
            }
        }
        .boxed()
    }

    fn req_packed_commands<'a>(
        &'a mut self,
        cmd: &'a Pipeline,
        _offset: usize,
        _count: usize,
    ) -> RedisFuture<'a, Vec<Value>> {
        let mut state = self.state.lock().unwrap();
        let packed = String::from_utf8_lossy(&cmd.get_packed_pipeline()).into_owned();
        state.pipelines.push(packed);
        let reply = state.pipeline_replies.pop_front().unwrap_or(Ok(vec![]));
        future::ready(reply).boxed()
    }

    fn get_db(&self) -> i64 {
        0
    }
}

pub(crate) fn bulk(items: &[&str]) -> Value {
    Value::Bulk(
        items
            .iter()
            .map(|s| Value::Data(s.as_bytes().to_vec()))
            .collect(),
    )
}

pub(crate) fn data(s: &str) -> Value {
    Value::Data(s.as_bytes().to_vec())
}

/// Turns a slice of literals into the owned form `MockConnection::commands` yields.
pub(crate) fn words(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
