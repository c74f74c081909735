//! Query Encoder — turns an ordered parameter map into a percent-encoded
//! query string.
//!
//! The encoder is content-agnostic: `eq.`, `ilike.*…*`, `field.asc` and
//! friends are plain strings built by [`Filter`]'s helpers (or by callers)
//! before encoding.

use std::fmt;

use indexmap::IndexMap;
use url::form_urlencoded;

/// A scalar query value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Str(s) => f.write_str(s),
            QueryValue::Int(n) => write!(f, "{n}"),
            QueryValue::Float(n) => write!(f, "{n}"),
            QueryValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Int(i64::from(value))
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Int(i64::from(value))
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

/// Sort direction for the `order` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Insertion-ordered parameter map for backend reads.
///
/// Setting a key that already exists replaces its value in place, keeping
/// the original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    params: IndexMap<String, QueryValue>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw key/value; the value is passed through untouched.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// `field=eq.<value>`
    pub fn eq(self, field: impl Into<String>, value: impl fmt::Display) -> Self {
        self.param(field, format!("eq.{value}"))
    }

    /// `field=ilike.*<value>*` — case-insensitive substring match.
    pub fn ilike(self, field: impl Into<String>, value: impl fmt::Display) -> Self {
        self.param(field, format!("ilike.*{value}*"))
    }

    /// `order=<field>.asc|desc`
    pub fn order(self, field: &str, direction: Direction) -> Self {
        self.param("order", format!("{field}.{}", direction.as_str()))
    }

    pub fn limit(self, n: u32) -> Self {
        self.param("limit", n)
    }

    pub fn offset(self, n: u32) -> Self {
        self.param("offset", n)
    }

    /// Column projection, e.g. `select=count`.
    pub fn select(self, columns: &str) -> Self {
        self.param("select", columns)
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Encodes the map as `?k=v&…`, or an empty string when there is nothing
    /// to encode.
    pub fn to_query_string(&self) -> String {
        encode_query(Some(self))
    }
}

impl<K, V> FromIterator<(K, V)> for Filter
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Filter::new(), |filter, (k, v)| filter.param(k, v))
    }
}

/// Percent-encodes every entry independently, in insertion order.
/// An absent or empty filter produces no query component at all.
pub fn encode_query(filter: Option<&Filter>) -> String {
    let Some(filter) = filter.filter(|f| !f.is_empty()) else {
        return String::new();
    };

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in filter.iter() {
        serializer.append_pair(key, &value.to_string());
    }
    format!("?{}", serializer.finish())
}
