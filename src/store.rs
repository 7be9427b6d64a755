use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use glob_match::glob_match;
use thiserror::Error as ThisError;
use tokio::time::{Duration, Instant};

mod scan;
pub mod zset;

pub use zset::SortedSet;

/// The Store is the central data engine: a mapping from key to a type-tagged
/// value with optional expiry. It is designed to be shared and cloned cheaply
/// using reference counting; all access goes through a single reader-writer
/// lock, so every public operation is atomic with respect to every other.
///
/// Expiry is lazy: an entry whose deadline has passed is treated as absent by
/// every read and write path, whether or not [`Store::cleanup_expired`] has
/// physically removed it yet.
#[derive(Clone, Default)]
pub struct Store {
    state: Arc<RwLock<State>>,
}

#[derive(Default)]
struct State {
    entries: HashMap<String, Entry>,
}

struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

/// A stored value. The kind is fixed when the key is created and never
/// changes; operations addressed at the wrong kind fail with
/// [`StoreError::WrongType`].
pub enum Value {
    String(Bytes),
    Hash(HashMap<String, Bytes>),
    List(VecDeque<Bytes>),
    Set(BTreeSet<String>),
    SortedSet(SortedSet),
}

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum StoreError {
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,
}

impl Entry {
    fn new(value: Value) -> Entry {
        Entry {
            value,
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map_or(false, |at| at <= now)
    }
}

impl State {
    // A key is live when it is present and unexpired. Read paths go through
    // here so lazy expiry and the sweep agree on what counts as expired.
    fn live(&self, key: &str, now: Instant) -> Option<&Value> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| &entry.value)
    }

    // Write paths observe expired keys as absent by dropping them up front.
    fn evict_expired(&mut self, key: &str, now: Instant) {
        let expired = self
            .entries
            .get(key)
            .map_or(false, |entry| entry.is_expired(now));
        if expired {
            self.entries.remove(key);
        }
    }
}

/// Resolves Redis-style range bounds against a sequence of `len` elements.
/// Negative indices count from the end; both bounds are then clamped into
/// `[0, len - 1]`. `None` means the resolved range is empty.
pub(crate) fn resolve_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let len = len as i64;

    let mut start = if start < 0 { len + start } else { start };
    let mut stop = if stop < 0 { len + stop } else { stop };
    if start < 0 {
        start = 0;
    }
    if stop >= len {
        stop = len - 1;
    }
    if start > stop || start >= len {
        return None;
    }

    Some((start as usize, stop as usize))
}

impl Store {
    pub fn new() -> Store {
        Store::default()
    }

    /// Unconditionally overwrites `key` with a String value, replacing any
    /// previous value regardless of its kind.
    pub fn set_string(&self, key: &str, value: Bytes, ttl: Option<Duration>) {
        let mut state = self.state.write().unwrap();
        let entry = Entry {
            value: Value::String(value),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        state.entries.insert(key.to_string(), entry);
    }

    /// Returns the String value at `key`. A missing, expired, or
    /// non-String key all read as `None`; a wrong-kind Get is "not found"
    /// rather than a type error, by contract.
    pub fn get_string(&self, key: &str) -> Option<Bytes> {
        let state = self.state.read().unwrap();
        match state.live(key, Instant::now()) {
            Some(Value::String(data)) => Some(data.clone()),
            _ => None,
        }
    }

    /// Removes each key if physically present, expired or not. Returns the
    /// count actually removed.
    pub fn delete(&self, keys: &[String]) -> usize {
        let mut state = self.state.write().unwrap();
        keys.iter()
            .filter(|key| state.entries.remove(key.as_str()).is_some())
            .count()
    }

    /// Counts keys that are present and unexpired. A key passed twice is
    /// counted twice.
    pub fn exists(&self, keys: &[String]) -> usize {
        let state = self.state.read().unwrap();
        let now = Instant::now();
        keys.iter().filter(|key| state.live(key, now).is_some()).count()
    }

    /// Returns all unexpired keys matching a glob pattern (`*`, `?`, `[...]`,
    /// `[^...]`), sorted for deterministic output.
    pub fn keys(&self, pattern: &str) -> Vec<String> {
        let state = self.state.read().unwrap();
        let now = Instant::now();

        let mut keys: Vec<String> = state
            .entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired(now) && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Raw entry count, including expired entries the sweep has not removed
    /// yet.
    pub fn size(&self) -> usize {
        self.state.read().unwrap().entries.len()
    }

    /// Physically removes every expired entry. Intended to run on a timer
    /// external to request handling; uses the same expiry predicate as the
    /// lazy checks.
    pub fn cleanup_expired(&self) -> usize {
        let mut state = self.state.write().unwrap();
        let now = Instant::now();

        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired(now));
        before - state.entries.len()
    }

    // --- Hash ---

    /// Sets `field` in the hash at `key`, creating the hash if the key is
    /// absent. Returns 1 if the field is new, 0 if it was updated.
    pub fn hash_set(&self, key: &str, field: String, value: Bytes) -> Result<i64, StoreError> {
        let mut state = self.state.write().unwrap();
        state.evict_expired(key, Instant::now());

        let entry = state
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(Value::Hash(HashMap::new())));
        match &mut entry.value {
            Value::Hash(hash) => Ok(if hash.insert(field, value).is_none() { 1 } else { 0 }),
            _ => Err(StoreError::WrongType),
        }
    }

    pub fn hash_get(&self, key: &str, field: &str) -> Result<Option<Bytes>, StoreError> {
        let state = self.state.read().unwrap();
        match state.live(key, Instant::now()) {
            None => Ok(None),
            Some(Value::Hash(hash)) => Ok(hash.get(field).cloned()),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    /// Deletes fields from the hash at `key`, returning how many were
    /// removed. Deletes the key itself once the hash becomes empty.
    pub fn hash_del(&self, key: &str, fields: &[String]) -> Result<usize, StoreError> {
        let mut state = self.state.write().unwrap();
        state.evict_expired(key, Instant::now());

        let entry = match state.entries.get_mut(key) {
            None => return Ok(0),
            Some(entry) => entry,
        };
        let hash = match &mut entry.value {
            Value::Hash(hash) => hash,
            _ => return Err(StoreError::WrongType),
        };

        let removed = fields
            .iter()
            .filter(|field| hash.remove(field.as_str()).is_some())
            .count();
        if hash.is_empty() {
            state.entries.remove(key);
        }
        Ok(removed)
    }

    /// Returns a copy of the whole hash at `key`; an empty map if the key is
    /// absent or expired.
    pub fn hash_get_all(&self, key: &str) -> Result<HashMap<String, Bytes>, StoreError> {
        let state = self.state.read().unwrap();
        match state.live(key, Instant::now()) {
            None => Ok(HashMap::new()),
            Some(Value::Hash(hash)) => Ok(hash.clone()),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    // --- List ---

    /// Pushes values onto the head of the list at `key`, creating it if
    /// absent. Values are inserted in call order, so each subsequent value
    /// becomes the new head: `LPUSH a b c` yields `[c, b, a]`. Returns the
    /// new length.
    pub fn list_lpush(&self, key: &str, values: Vec<Bytes>) -> Result<usize, StoreError> {
        self.list_push(key, values, true)
    }

    /// Pushes values onto the tail of the list at `key`. Returns the new
    /// length.
    pub fn list_rpush(&self, key: &str, values: Vec<Bytes>) -> Result<usize, StoreError> {
        self.list_push(key, values, false)
    }

    fn list_push(&self, key: &str, values: Vec<Bytes>, front: bool) -> Result<usize, StoreError> {
        let mut state = self.state.write().unwrap();
        state.evict_expired(key, Instant::now());

        let entry = state
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(Value::List(VecDeque::new())));
        match &mut entry.value {
            Value::List(list) => {
                for value in values {
                    if front {
                        list.push_front(value);
                    } else {
                        list.push_back(value);
                    }
                }
                Ok(list.len())
            }
            _ => Err(StoreError::WrongType),
        }
    }

    pub fn list_lpop(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        self.list_pop(key, true)
    }

    pub fn list_rpop(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        self.list_pop(key, false)
    }

    fn list_pop(&self, key: &str, front: bool) -> Result<Option<Bytes>, StoreError> {
        let mut state = self.state.write().unwrap();
        state.evict_expired(key, Instant::now());

        let entry = match state.entries.get_mut(key) {
            None => return Ok(None),
            Some(entry) => entry,
        };
        let list = match &mut entry.value {
            Value::List(list) => list,
            _ => return Err(StoreError::WrongType),
        };

        let popped = if front {
            list.pop_front()
        } else {
            list.pop_back()
        };
        if list.is_empty() {
            state.entries.remove(key);
        }
        Ok(popped)
    }

    /// Returns the elements between `start` and `stop` inclusive, with
    /// Redis-style negative index resolution and clamping.
    pub fn list_range(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Bytes>, StoreError> {
        let state = self.state.read().unwrap();
        let list = match state.live(key, Instant::now()) {
            None => return Ok(Vec::new()),
            Some(Value::List(list)) => list,
            Some(_) => return Err(StoreError::WrongType),
        };

        match resolve_range(list.len(), start, stop) {
            None => Ok(Vec::new()),
            Some((start, stop)) => Ok(list
                .iter()
                .skip(start)
                .take(stop - start + 1)
                .cloned()
                .collect()),
        }
    }

    // --- Set ---

    /// Adds members to the set at `key`, creating it if absent. Returns the
    /// count of genuinely new members.
    pub fn set_add(&self, key: &str, members: Vec<String>) -> Result<usize, StoreError> {
        let mut state = self.state.write().unwrap();
        state.evict_expired(key, Instant::now());

        let entry = state
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(Value::Set(BTreeSet::new())));
        match &mut entry.value {
            Value::Set(set) => Ok(members
                .into_iter()
                .filter(|member| set.insert(member.clone()))
                .count()),
            _ => Err(StoreError::WrongType),
        }
    }

    /// Removes members from the set at `key`, returning how many were
    /// removed. Deletes the key itself once the set becomes empty.
    pub fn set_remove(&self, key: &str, members: &[String]) -> Result<usize, StoreError> {
        let mut state = self.state.write().unwrap();
        state.evict_expired(key, Instant::now());

        let entry = match state.entries.get_mut(key) {
            None => return Ok(0),
            Some(entry) => entry,
        };
        let set = match &mut entry.value {
            Value::Set(set) => set,
            _ => return Err(StoreError::WrongType),
        };

        let removed = members
            .iter()
            .filter(|member| set.remove(member.as_str()))
            .count();
        if set.is_empty() {
            state.entries.remove(key);
        }
        Ok(removed)
    }

    /// Returns all members of the set at `key`, in lexicographic order.
    pub fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let state = self.state.read().unwrap();
        match state.live(key, Instant::now()) {
            None => Ok(Vec::new()),
            Some(Value::Set(set)) => Ok(set.iter().cloned().collect()),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    pub fn set_is_member(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let state = self.state.read().unwrap();
        match state.live(key, Instant::now()) {
            None => Ok(false),
            Some(Value::Set(set)) => Ok(set.contains(member)),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    // --- Sorted set ---

    /// Adds `member` with `score` to the sorted set at `key`, creating it if
    /// absent. Returns 1 when the member is new or its score changed, 0 when
    /// the score was already exactly this value. (Reporting a score change as
    /// 1 deviates from stock Redis ZADD; it is the established contract here.)
    pub fn zadd(&self, key: &str, score: f64, member: String) -> Result<i64, StoreError> {
        let mut state = self.state.write().unwrap();
        state.evict_expired(key, Instant::now());

        let entry = state
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(Value::SortedSet(SortedSet::new())));
        match &mut entry.value {
            Value::SortedSet(zset) => Ok(if zset.insert(member, score) { 1 } else { 0 }),
            _ => Err(StoreError::WrongType),
        }
    }

    pub fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>, StoreError> {
        let state = self.state.read().unwrap();
        match state.live(key, Instant::now()) {
            None => Ok(None),
            Some(Value::SortedSet(zset)) => Ok(zset.score(member)),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    /// Returns members in rank order between `start` and `stop` inclusive,
    /// using the same negative-index rule as [`Store::list_range`].
    pub fn zrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, StoreError> {
        Ok(self
            .zrange_entries(key, start, stop)?
            .into_iter()
            .map(|(member, _)| member)
            .collect())
    }

    /// Like [`Store::zrange`] but keeps the scores, for WITHSCORES replies.
    pub fn zrange_entries(
        &self,
        key: &str,
        start: i64,
        stop: i64,
    ) -> Result<Vec<(String, f64)>, StoreError> {
        let state = self.state.read().unwrap();
        match state.live(key, Instant::now()) {
            None => Ok(Vec::new()),
            Some(Value::SortedSet(zset)) => Ok(zset.range(start, stop)),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    /// Removes members from the sorted set at `key`, returning how many were
    /// removed. Deletes the key itself once the set becomes empty.
    pub fn zrem(&self, key: &str, members: &[String]) -> Result<usize, StoreError> {
        let mut state = self.state.write().unwrap();
        state.evict_expired(key, Instant::now());

        let entry = match state.entries.get_mut(key) {
            None => return Ok(0),
            Some(entry) => entry,
        };
        let zset = match &mut entry.value {
            Value::SortedSet(zset) => zset,
            _ => return Err(StoreError::WrongType),
        };

        let removed = members
            .iter()
            .filter(|member| zset.remove(member))
            .count();
        if zset.is_empty() {
            state.entries.remove(key);
        }
        Ok(removed)
    }
}
