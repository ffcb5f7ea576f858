/*************************************************************************************************
 *
 * Chained table
 * -------------
 *
 * Text-keyed store with 16 fixed buckets. An entry's bucket is fingerprint(key) mod 16, so
 * every weakness of the fingerprint function (anagram and '0' collisions) lands colliding
 * keys in the same bucket and degrades that bucket's operations to a linear scan. The bucket
 * count never changes; there is no resize, rehash or delete.
 *
 * Duplicate keys are governed by the policy chosen at construction:
 *
 *    Append  - insert always appends, so duplicate keys coexist and lookups return the
 *              first entry in insertion order
 *    Replace - insert updates an existing entry's value in place (position preserved),
 *              so at most one entry per key exists in the whole table
 *
 * Lookup misses report KeyNotFound under both policies, whether the scanned bucket is empty
 * or merely lacks the key.
 *
 *************************************************************************************************/

use std::fmt;

use crate::hashing::{self, HashError};

pub const BUCKET_COUNT: usize = 16;

// ***********************************************************************************************

#[derive(Debug, PartialEq, Eq)]
pub enum TableError {
    Hash(HashError),
    KeyNotFound(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TableError::Hash(error) => write!(f, "{}", error),
            TableError::KeyNotFound(key) => write!(f, "No value found for key {}", key),
        }
    }
}

impl From<HashError> for TableError {
    fn from(error: HashError) -> Self {
        TableError::Hash(error)
    }
}

// ***********************************************************************************************

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuplicatePolicy {
    Append,
    Replace,
}

#[derive(Clone, Debug)]
struct Entry<V> {
    key: String,
    value: V,
}

pub struct ChainedTable<V> {
    buckets: [Vec<Entry<V>>; BUCKET_COUNT],
    policy: DuplicatePolicy,
    size: usize,
}

impl<V> ChainedTable<V> {
    pub fn new(policy: DuplicatePolicy) -> ChainedTable<V> {
        ChainedTable {
            buckets: std::array::from_fn(|_| Vec::new()),
            policy,
            size: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn bucket_for(key: &str) -> Result<usize, TableError> {
        Ok(hashing::fingerprint(key)?.remainder(BUCKET_COUNT))
    }

    /// Stores `value` under `key`. Under the Replace policy an existing entry keeps its
    /// bucket position and only its value changes.
    pub fn insert(&mut self, key: &str, value: V) -> Result<(), TableError> {
        let index = Self::bucket_for(key)?;
        let bucket = &mut self.buckets[index];

        if self.policy == DuplicatePolicy::Replace {
            if let Some(entry) = bucket.iter_mut().find(|entry| entry.key == key) {
                entry.value = value;
                return Ok(());
            }
        }

        bucket.push(Entry {
            key: key.to_string(),
            value,
        });
        self.size += 1;
        Ok(())
    }

    /// Alias for `insert`; the name the upsert-flavored consumers use.
    pub fn set(&mut self, key: &str, value: V) -> Result<(), TableError> {
        self.insert(key, value)
    }

    /// Returns the first entry matching `key` in its bucket's insertion order, or
    /// KeyNotFound when no entry with that exact key exists.
    pub fn get(&self, key: &str) -> Result<&V, TableError> {
        let index = Self::bucket_for(key)?;
        self.buckets[index]
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
            .ok_or_else(|| TableError::KeyNotFound(key.to_string()))
    }
}

// Diagnostic rendering: entries in bucket-index then insertion order. Not a durable format.
impl<V: fmt::Display> fmt::Display for ChainedTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ChainedTable {{")?;
        let mut first = true;
        for bucket in &self.buckets {
            for entry in bucket {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "'{}': {}", entry.key, entry.value)?;
                first = false;
            }
        }
        write!(f, "}}")
    }
}

/* *****************************************************************************************************************
 *
 * Tests
 *
 * *****************************************************************************************************************/
