use url::form_urlencoded;

/// Decoded query string as an ordered multimap.
///
/// Names are compared ASCII case-insensitively, matching the host's query
/// collection. Values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw (still percent-encoded) query string, without the `?`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        Self {
            pairs: form_urlencoded::parse(raw.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    pub fn from_optional(raw: Option<&str>) -> Self {
        raw.map(Self::parse).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Every value supplied for `name`, in request order.
    ///
    /// Yielded values borrow from `self` only, never from `name`.
    pub fn get_all<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = &'a str> {
        self.pairs
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.get_all(name).next()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.first(name).is_some()
    }

    /// Values of `name` with comma-joined entries split apart and trimmed.
    ///
    /// `?a=x,y&a=z` yields `x`, `y`, `z`. Empty tokens are dropped.
    pub fn split_values<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = &'a str> {
        self.get_all(name)
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Exact, case-sensitive membership test over [`Self::split_values`].
    pub fn contains_value(&self, name: &str, value: &str) -> bool {
        self.split_values(name).any(|token| token == value)
    }

    /// First value of `name` read as a boolean the way the host binds them.
    pub fn parse_bool(&self, name: &str) -> Option<bool> {
        self.first(name).and_then(|raw| {
            match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            }
        })
    }

    /// First value of `name` parsed with `FromStr`; unparsable values are
    /// treated as absent.
    pub fn parse_first<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.first(name).and_then(|raw| raw.trim().parse().ok())
    }

    /// Append a pair, keeping any existing values of `name`.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Remove every pair named `name`; returns how many were dropped.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.pairs.len();
        self.pairs.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        before - self.pairs.len()
    }

    /// Replace all values of `name` with a single `value`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove(&name);
        self.pairs.push((name, value.into()));
    }

    /// Re-encode as `application/x-www-form-urlencoded`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> From<&'a str> for QueryParams {
    fn from(raw: &'a str) -> Self {
        Self::parse(raw)
    }
}
