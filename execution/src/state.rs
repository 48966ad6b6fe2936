use anyhow::{Context as _, Result};
use baccarat_types::storage::{Key, Value};
use std::future::Future;

#[cfg(any(test, feature = "mocks"))]
use commonware_codec::{Encode, ReadExt};
#[cfg(any(test, feature = "mocks"))]
use std::collections::HashMap;

/// Key/value store the table persists itself into.
pub trait State {
    fn get(&self, key: &Key) -> impl Future<Output = Result<Option<Value>>>;
    fn insert(&mut self, key: Key, value: Value) -> impl Future<Output = Result<()>>;
    fn delete(&mut self, key: &Key) -> impl Future<Output = Result<()>>;

    fn apply(&mut self, changes: Vec<(Key, Option<Value>)>) -> impl Future<Output = Result<()>> {
        async {
            for (key, value) in changes {
                match value {
                    Some(value) => self.insert(key, value).await?,
                    None => self.delete(&key).await?,
                }
            }
            Ok(())
        }
    }
}

/// In-memory store holding encoded values, so every read goes through the codec.
#[cfg(any(test, feature = "mocks"))]
#[derive(Default)]
pub struct Memory {
    state: HashMap<Key, Vec<u8>>,
}

#[cfg(any(test, feature = "mocks"))]
impl Memory {
    /// Overwrite the raw bytes stored under `key`.
    pub fn insert_raw(&mut self, key: Key, raw: Vec<u8>) {
        self.state.insert(key, raw);
    }
}

#[cfg(any(test, feature = "mocks"))]
impl State for Memory {
    async fn get(&self, key: &Key) -> Result<Option<Value>> {
        let Some(raw) = self.state.get(key) else {
            return Ok(None);
        };
        let value = Value::read(&mut raw.as_slice()).context("decode value")?;
        Ok(Some(value))
    }

    async fn insert(&mut self, key: Key, value: Value) -> Result<()> {
        self.state.insert(key, value.encode().to_vec());
        Ok(())
    }

    async fn delete(&mut self, key: &Key) -> Result<()> {
        self.state.remove(key);
        Ok(())
    }
}
