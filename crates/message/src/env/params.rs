//! The server environment map.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// One environment value: a plain string, or a list for variables a host
/// reports more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerValue {
    Single(String),
    List(Vec<String>),
}

impl ServerValue {
    /// Whether the value counts as set: empty strings, `"0"` and empty lists do not.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Single(value) => !value.is_empty() && value != "0",
            Self::List(values) => !values.is_empty(),
        }
    }

    /// The value as a single line, joining list entries with `", "`.
    pub fn to_line(&self) -> Cow<'_, str> {
        match self {
            Self::Single(value) => Cow::Borrowed(value),
            Self::List(values) => Cow::Owned(values.join(", ")),
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::List(values) => values,
        };
        values.iter().map(String::as_str)
    }
}

impl From<String> for ServerValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<&str> for ServerValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<bool> for ServerValue {
    fn from(value: bool) -> Self {
        Self::Single(if value { "1" } else { "" }.to_string())
    }
}

impl From<Vec<String>> for ServerValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for ServerValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Request environment variables as a CGI/FastCGI host hands them over:
/// `REQUEST_METHOD`, `HTTP_HOST`, `REQUEST_URI`, `SERVER_PROTOCOL` and so on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerParams {
    inner: BTreeMap<String, ServerValue>,
}

impl ServerParams {
    pub fn new() -> Self {
        Self { inner: BTreeMap::new() }
    }

    /// Snapshots the environment of the current process, the way a CGI
    /// program receives its request. Non-unicode entries are converted lossily.
    pub fn from_env() -> Self {
        std::env::vars_os()
            .map(|(key, value)| (key.to_string_lossy().into_owned(), value.to_string_lossy().into_owned()))
            .collect()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&ServerValue> {
        self.inner.get(key)
    }

    /// The value of `key` as one line, see [`ServerValue::to_line`].
    pub fn get_str(&self, key: &str) -> Option<Cow<'_, str>> {
        self.inner.get(key).map(ServerValue::to_line)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ServerValue>) -> Option<ServerValue> {
        self.inner.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<ServerValue> {
        self.inner.remove(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ServerValue> {
        self.inner.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for ServerParams
where
    K: Into<String>,
    V: Into<ServerValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self { inner: iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect() }
    }
}

impl<'a> IntoIterator for &'a ServerParams {
    type Item = (&'a String, &'a ServerValue);
    type IntoIter = btree_map::Iter<'a, String, ServerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(ServerValue::from("on").is_truthy());
        assert!(ServerValue::from("off").is_truthy());
        assert!(ServerValue::from(true).is_truthy());
        assert!(!ServerValue::from(false).is_truthy());
        assert!(!ServerValue::from("").is_truthy());
        assert!(!ServerValue::from("0").is_truthy());
        assert!(!ServerValue::from(Vec::<String>::new()).is_truthy());
    }

    #[test]
    fn list_to_line() {
        let value = ServerValue::from(vec!["a", "b"]);
        assert_eq!(value.to_line(), "a, b");
        assert_eq!(value.values().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn collect_params() {
        let server: ServerParams = [("HTTPS", "on"), ("SERVER_NAME", "example.net")].into_iter().collect();
        assert_eq!(server.len(), 2);
        assert_eq!(server.get_str("SERVER_NAME").as_deref(), Some("example.net"));
        assert_eq!(server.get_str("SERVER_PORT"), None);
    }
}
