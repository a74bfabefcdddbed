/// Request parameter decoding
///
/// Playlist routes take URL query parameters where a key may repeat to form a
/// list. A key that is present with an empty value is kept as `Some("")`, so
/// handlers can tell "not provided" from "provided as empty".
use crate::error::{Result, ServerError};
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

#[derive(Debug, Clone, Default)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First value of `name`, if the key is present at all
    pub fn optional_string(&self, name: &str) -> Option<String> {
        self.values(name).next().map(str::to_string)
    }

    /// First value of `name`, failing with `missing_parameter` if absent
    pub fn string(&self, name: &str) -> Result<String> {
        self.optional_string(name)
            .ok_or_else(|| ServerError::missing(name))
    }

    /// Every value of a repeated `name`, in request order
    pub fn strings(&self, name: &str) -> Vec<String> {
        self.values(name).map(str::to_string).collect()
    }

    /// Every value of a repeated `name`, each parsed as an integer
    pub fn ints(&self, name: &str) -> Result<Vec<i64>> {
        self.values(name)
            .map(|value| {
                value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ServerError::invalid(name, value))
            })
            .collect()
    }

    /// Boolean `name`: `true`/`false`/`1`/`0`
    pub fn optional_bool(&self, name: &str) -> Result<Option<bool>> {
        match self.values(name).next() {
            None => Ok(None),
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Some(true)),
                "false" | "0" => Ok(Some(false)),
                _ => Err(ServerError::invalid(name, value)),
            },
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Params
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| ServerError::invalid("query", e.body_text()))?;
        Ok(Self { pairs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_are_distinct() {
        let params = Params::from_pairs([("comment", "")]);
        assert_eq!(params.optional_string("comment"), Some(String::new()));
        assert_eq!(params.optional_string("name"), None);
        assert!(matches!(
            params.string("name"),
            Err(ServerError::MissingParameter(name)) if name == "name"
        ));
    }

    #[test]
    fn repeated_keys_form_a_list() {
        let params = Params::from_pairs([("songId", "a"), ("other", "x"), ("songId", "b")]);
        assert_eq!(params.strings("songId"), vec!["a", "b"]);
        assert!(params.strings("missing").is_empty());
    }

    #[test]
    fn integer_lists_reject_garbage() {
        let params = Params::from_pairs([("i", "2"), ("i", "0")]);
        assert_eq!(params.ints("i").unwrap(), vec![2, 0]);

        let params = Params::from_pairs([("i", "2"), ("i", "two")]);
        assert!(matches!(
            params.ints("i"),
            Err(ServerError::InvalidParameter { name, value }) if name == "i" && value == "two"
        ));
    }

    #[test]
    fn booleans() {
        for (raw, expected) in [("true", true), ("1", true), ("false", false), ("0", false)] {
            let params = Params::from_pairs([("public", raw)]);
            assert_eq!(params.optional_bool("public").unwrap(), Some(expected));
        }
        assert_eq!(Params::default().optional_bool("public").unwrap(), None);

        let params = Params::from_pairs([("public", "yes")]);
        assert!(matches!(
            params.optional_bool("public"),
            Err(ServerError::InvalidParameter { .. })
        ));
    }
}
