use std::collections::BTreeMap;

/// An owned bencode value.
///
/// `Dict` is backed by a `BTreeMap` keyed on raw bytes, which orders its
/// entries lexicographically by construction — encoding a dictionary is
/// therefore just "walk the map," with no sort step needed at encode time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bencode {
    Int(i64),
    Bytes(Vec<u8>),
    /// A UTF-8 text string. Encoded identically to `Bytes` using its UTF-8
    /// byte length as the length prefix — bencode itself has no separate
    /// text type, so this only exists to spare callers a manual `.into_bytes()`.
    Text(String),
    List(Vec<Bencode>),
    Dict(BTreeMap<Vec<u8>, Bencode>),
}

impl From<i64> for Bencode {
    fn from(n: i64) -> Self {
        Bencode::Int(n)
    }
}

impl From<String> for Bencode {
    fn from(s: String) -> Self {
        Bencode::Text(s)
    }
}

impl From<&str> for Bencode {
    fn from(s: &str) -> Self {
        Bencode::Text(s.to_owned())
    }
}

impl From<Vec<u8>> for Bencode {
    fn from(b: Vec<u8>) -> Self {
        Bencode::Bytes(b)
    }
}

impl From<Vec<Bencode>> for Bencode {
    fn from(l: Vec<Bencode>) -> Self {
        Bencode::List(l)
    }
}

/// Builds a `Bencode::Dict`, skipping entries whose value is absent rather
/// than emitting them as empty strings or nulls (there is no bencode null).
#[derive(Debug, Default, Clone)]
pub struct DictBuilder {
    entries: BTreeMap<Vec<u8>, Bencode>,
}

impl DictBuilder {
    pub fn new() -> Self {
        DictBuilder { entries: BTreeMap::new() }
    }

    pub fn insert(mut self, key: &[u8], value: impl Into<Bencode>) -> Self {
        self.entries.insert(key.to_vec(), value.into());
        self
    }

    pub fn insert_if_some(self, key: &[u8], value: Option<impl Into<Bencode>>) -> Self {
        match value {
            Some(v) => self.insert(key, v),
            None => self,
        }
    }

    pub fn build(self) -> Bencode {
        Bencode::Dict(self.entries)
    }
}
