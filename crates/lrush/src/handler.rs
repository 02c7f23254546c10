//! Command handler for the cache shell

use lrucore::{Cache, Entry, Error, Value};
use tracing::debug;

use crate::reply::{Command, Reply};

pub struct CommandHandler {
    cache: Cache<String, Value>,
}

impl CommandHandler {
    pub fn new(cache: Cache<String, Value>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Cache<String, Value> {
        &self.cache
    }

    pub fn handle(&mut self, cmd: Command) -> Reply {
        debug!(?cmd, "handling command");
        match cmd {
            Command::Put(key, value) => self.handle_put(key, &value),
            Command::Get(key) => self.handle_get(&key),
            Command::Peek(key) => self.handle_peek(&key),
            Command::Del(keys) => self.handle_del(&keys),
            Command::Exists(keys) => self.handle_exists(&keys),
            Command::Keys => self.handle_keys(),
            Command::Len => Reply::Integer(self.cache.len() as i64),
            Command::Stats => self.handle_stats(),
            Command::Clear => {
                self.cache.clear();
                Reply::ok()
            }
            Command::Ping => Reply::Status("PONG".to_string()),
        }
    }

    fn handle_put(&mut self, key: String, value: &str) -> Reply {
        match self.cache.put_typed(Entry::new(key, Value::parse(value))) {
            Ok(()) => Reply::ok(),
            Err(e) => error_reply(&e),
        }
    }

    fn handle_get(&mut self, key: &str) -> Reply {
        match self.cache.get(key) {
            Ok(entry) => render(entry.value()),
            Err(e) => error_reply(&e),
        }
    }

    fn handle_peek(&self, key: &str) -> Reply {
        match self.cache.peek(key) {
            Some(entry) => render(entry.value()),
            None => Reply::Nil,
        }
    }

    fn handle_del(&mut self, keys: &[String]) -> Reply {
        let deleted = keys
            .iter()
            .filter(|k| matches!(self.cache.remove(k.as_str()), Ok(Some(_))))
            .count();
        Reply::Integer(deleted as i64)
    }

    fn handle_exists(&self, keys: &[String]) -> Reply {
        let count = keys.iter().filter(|k| self.cache.contains(k.as_str())).count();
        Reply::Integer(count as i64)
    }

    fn handle_keys(&self) -> Reply {
        Reply::List(self.cache.iter().map(|e| e.key().clone()).collect())
    }

    fn handle_stats(&self) -> Reply {
        match serde_json::to_string(self.cache.stats()) {
            Ok(json) => Reply::Value(json),
            Err(e) => Reply::Error(None, e.to_string()),
        }
    }
}

fn render(value: Option<&Value>) -> Reply {
    match value {
        Some(v) => Reply::Value(v.to_string()),
        None => Reply::Nil,
    }
}

fn error_reply(err: &Error) -> Reply {
    Reply::Error(Some(err.code().as_u16()), err.message())
}
