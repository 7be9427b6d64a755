//! Cursor-based iteration over keys, hash fields, and set members.
//!
//! A scan call takes a deterministic snapshot of the matching elements
//! (lexicographically sorted) and slices it by the cursor, which is a plain
//! offset. If nothing is mutated between calls, resuming with the returned
//! cursor visits every element exactly once and ends with cursor 0. Under
//! concurrent mutation the guarantee is best effort: elements inserted after
//! the scan began may be missed and elements may be seen more than once.

use bytes::Bytes;
use glob_match::glob_match;
use tokio::time::Instant;

use super::{Store, StoreError, Value};

const DEFAULT_SCAN_COUNT: u64 = 10;

// Slices one page out of a sorted snapshot. A next cursor of 0 means the
// iteration is complete.
fn page<T>(snapshot: Vec<T>, cursor: u64, count: u64) -> (u64, Vec<T>) {
    let count = if count == 0 { DEFAULT_SCAN_COUNT } else { count };

    let len = snapshot.len() as u64;
    if cursor >= len {
        return (0, Vec::new());
    }

    let end = (cursor + count).min(len);
    let next_cursor = if end < len { end } else { 0 };

    let items = snapshot
        .into_iter()
        .skip(cursor as usize)
        .take((end - cursor) as usize)
        .collect();
    (next_cursor, items)
}

impl Store {
    /// One page of unexpired keys matching `pattern`.
    pub fn scan(&self, cursor: u64, pattern: &str, count: u64) -> (u64, Vec<String>) {
        let state = self.state.read().unwrap();
        let now = Instant::now();

        let mut keys: Vec<String> = state
            .entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired(now) && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();

        page(keys, cursor, count)
    }

    /// One page of field/value pairs from the hash at `key` whose fields
    /// match `pattern`. A missing or expired key yields an empty,
    /// already-complete page.
    pub fn hash_scan(
        &self,
        key: &str,
        cursor: u64,
        pattern: &str,
        count: u64,
    ) -> Result<(u64, Vec<(String, Bytes)>), StoreError> {
        let state = self.state.read().unwrap();
        let hash = match state.live(key, Instant::now()) {
            None => return Ok((0, Vec::new())),
            Some(Value::Hash(hash)) => hash,
            Some(_) => return Err(StoreError::WrongType),
        };

        let mut fields: Vec<String> = hash
            .keys()
            .filter(|field| glob_match(pattern, field))
            .cloned()
            .collect();
        fields.sort();

        let (next_cursor, fields) = page(fields, cursor, count);
        let pairs = fields
            .into_iter()
            .map(|field| {
                let value = hash[&field].clone();
                (field, value)
            })
            .collect();
        Ok((next_cursor, pairs))
    }

    /// One page of members from the set at `key` matching `pattern`. Same
    /// missing-key and wrong-kind behavior as [`Store::hash_scan`].
    pub fn set_scan(
        &self,
        key: &str,
        cursor: u64,
        pattern: &str,
        count: u64,
    ) -> Result<(u64, Vec<String>), StoreError> {
        let state = self.state.read().unwrap();
        let set = match state.live(key, Instant::now()) {
            None => return Ok((0, Vec::new())),
            Some(Value::Set(set)) => set,
            Some(_) => return Err(StoreError::WrongType),
        };

        let members: Vec<String> = set
            .iter()
            .filter(|member| glob_match(pattern, member))
            .cloned()
            .collect();

        Ok(page(members, cursor, count))
    }
}
