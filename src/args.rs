//! Argument bags and their normalization into wire parameters.
//!
//! The service takes every parameter as a flat string. Two encodings exist:
//!
//! - **indexed**: `artist[0]=A&artist[1]=B`, used by batch methods such as
//!   `track.scrobble`. A scalar still becomes `artist[0]`.
//! - **normal**: a single key, with lists joined by commas (`tags=a,b,c`).
//!
//! Which encoding a parameter uses is fixed per API method by
//! [`FormatRules`], not inferred from the value.
//!
//! # Example
//!
//! ```ignore
//! let args = Args::new().with("artist", "Cher").with("tags", vec!["pop", "80s"]);
//! let rules = FormatRules::new(&["artist"], &["tags"]);
//! let params = normalize(&args, &rules)?;
//! assert_eq!(params["artist[0]"], "Cher");
//! assert_eq!(params["tags"], "pop,80s");
//! ```

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::error::{Error, Result};

/// Maximum number of items kept when a list is comma-joined.
///
/// Extra items are dropped (with a warning log), never reported as an error.
pub const MAX_LIST_ITEMS: usize = 10;

/// Canonical parameter map: what gets signed and what goes on the wire.
///
/// `BTreeMap` keeps keys in byte-wise ascending order, which is the order
/// both the signature and the encoded query string use.
pub type Params = BTreeMap<String, String>;

/// A single argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    List(Vec<String>),
}

impl ArgValue {
    /// String form of a scalar, or `None` for a list.
    pub fn scalar(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Int(n) => Some(n.to_string()),
            Self::List(_) => None,
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&String> for ArgValue {
    fn from(s: &String) -> Self {
        Self::Str(s.clone())
    }
}

impl From<i64> for ArgValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for ArgValue {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<u32> for ArgValue {
    fn from(n: u32) -> Self {
        Self::Int(n.into())
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for ArgValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for ArgValue {
    fn from(items: &[&str]) -> Self {
        Self::List(items.iter().map(|s| s.to_string()).collect())
    }
}

/// Loosely-typed argument bag, keyed by parameter name.
///
/// Keys may be plain (`artist`) or pre-indexed (`artist[0]`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args(BTreeMap<String, ArgValue>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Add a string value, turning the entry into a list if `name` is
    /// already present. Used when collecting repeated `key=value` pairs.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.0.entry(name.into()) {
            Entry::Vacant(slot) => {
                slot.insert(ArgValue::Str(value));
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                ArgValue::List(items) => items.push(value),
                existing => {
                    let first = existing.scalar().unwrap_or_default();
                    *existing = ArgValue::List(vec![first, value]);
                }
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Args
where
    K: Into<String>,
    V: Into<ArgValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Per-method encoding rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatRules<'a> {
    /// Parameters sent as `name[0]`, `name[1]`, ...
    pub indexing: &'a [&'a str],
    /// Parameters sent under a single key
    pub normal: &'a [&'a str],
}

impl<'a> FormatRules<'a> {
    pub const fn new(indexing: &'a [&'a str], normal: &'a [&'a str]) -> Self {
        Self { indexing, normal }
    }

    /// Rules for a method that only takes plain parameters.
    pub const fn normal(normal: &'a [&'a str]) -> Self {
        Self {
            indexing: &[],
            normal,
        }
    }
}

/// Owned rule names derived from an argument bag, for methods that have no
/// declared rules.
///
/// Keys shaped like `name[i]` put `name` under indexing; anything else is
/// normal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferredRules {
    indexing: Vec<String>,
    normal: Vec<String>,
}

impl InferredRules {
    pub fn from_args(args: &Args) -> Self {
        let mut rules = Self::default();
        for (key, _) in args.iter() {
            match split_indexed(key) {
                Some((name, _)) => {
                    if !rules.indexing.iter().any(|n| n == name) {
                        rules.indexing.push(name.to_string());
                    }
                }
                None => rules.normal.push(key.to_string()),
            }
        }
        rules
    }

    pub fn indexing(&self) -> Vec<&str> {
        self.indexing.iter().map(String::as_str).collect()
    }

    pub fn normal(&self) -> Vec<&str> {
        self.normal.iter().map(String::as_str).collect()
    }
}

fn indexed_key(name: &str, index: usize) -> String {
    format!("{name}[{index}]")
}

/// Split `name[3]` into `("name", 3)`.
fn split_indexed(key: &str) -> Option<(&str, usize)> {
    let (name, index) = key.strip_suffix(']')?.rsplit_once('[')?;
    if name.is_empty() {
        return None;
    }
    Some((name, index.parse().ok()?))
}

fn join_list(name: &str, items: &[String]) -> String {
    if items.len() > MAX_LIST_ITEMS {
        tracing::warn!(
            param = name,
            dropped = items.len() - MAX_LIST_ITEMS,
            "List argument truncated to {} items",
            MAX_LIST_ITEMS
        );
    }
    items
        .iter()
        .take(MAX_LIST_ITEMS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Flatten `args` into the canonical parameter map according to `rules`.
///
/// Names missing from the bag are skipped; required-parameter checks are
/// left to the service. For pre-indexed input (`tags[0]`, `tags[1]`, ...)
/// the scan stops at the first missing index, so `0, 1, 3` yields only
/// `0` and `1`.
pub fn normalize(args: &Args, rules: &FormatRules<'_>) -> Result<Params> {
    let mut params = Params::new();

    for &name in rules.indexing {
        match args.get(name) {
            Some(ArgValue::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    params.insert(indexed_key(name, i), item.clone());
                }
            }
            Some(value) => {
                let value = value
                    .scalar()
                    .ok_or_else(|| Error::invalid_argument(name))?;
                params.insert(indexed_key(name, 0), value);
            }
            None => {
                for i in 0.. {
                    let key = indexed_key(name, i);
                    let Some(value) = args.get(&key) else {
                        break;
                    };
                    let value = value
                        .scalar()
                        .ok_or_else(|| Error::invalid_argument(key.as_str()))?;
                    params.insert(key, value);
                }
            }
        }
    }

    for &name in rules.normal {
        let Some(value) = args.get(name) else {
            continue;
        };
        let value = match value {
            ArgValue::List(items) => join_list(name, items),
            scalar => scalar
                .scalar()
                .ok_or_else(|| Error::invalid_argument(name))?,
        };
        params.insert(name.to_string(), value);
    }

    Ok(params)
}
