// file: src/client/query.rs
// description: query parameter construction with repeated filter keys
// reference: https://docs.rs/reqwest/latest/reqwest/struct.RequestBuilder.html#method.query

use crate::error::{AlephError, Result};
use std::collections::BTreeMap;

pub const DEFAULT_SEARCH_LIMIT: u32 = 50;
pub const DEFAULT_EXPAND_LIMIT: u32 = 10;

/// Ordered key/value pairs; a key may repeat.
pub type QueryParams = Vec<(String, String)>;

/// Property filters sent as `filter:<key>=<value>`, one pair per value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters(BTreeMap<String, Vec<String>>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |v| (key.as_str(), v.as_str())))
    }

    fn append_to(&self, params: &mut QueryParams) {
        params.extend(
            self.iter()
                .map(|(key, value)| (format!("filter:{}", key), value.to_string())),
        );
    }

    /// Parses `key=value`, as given on the command line.
    pub fn parse_pair(raw: &str) -> Result<(String, String)> {
        match raw.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(AlephError::Validation(format!(
                "Filter must look like key=value: {}",
                raw
            ))),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Filters::new();
        for (key, value) in iter {
            filters.insert(key, value);
        }
        filters
    }
}

/// One schema name or several; each becomes its own `filter:schema` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaFilter(Vec<String>);

impl SchemaFilter {
    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for SchemaFilter {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for SchemaFilter {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<Vec<String>> for SchemaFilter {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<Vec<&str>> for SchemaFilter {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityQuery {
    pub text: String,
    pub schemas: SchemaFilter,
    pub filters: Filters,
    pub limit: u32,
    pub offset: u32,
}

impl EntityQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            schemas: SchemaFilter::default(),
            filters: Filters::new(),
            limit: DEFAULT_SEARCH_LIMIT,
            offset: 0,
        }
    }

    pub fn schema(mut self, schemas: impl Into<SchemaFilter>) -> Self {
        self.schemas = schemas.into();
        self
    }

    pub fn filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = vec![("q".to_string(), self.text.clone())];
        params.extend(
            self.schemas
                .names()
                .iter()
                .map(|name| ("filter:schema".to_string(), name.clone())),
        );
        params.push(("limit".to_string(), self.limit.to_string()));
        params.push(("offset".to_string(), self.offset.to_string()));
        self.filters.append_to(&mut params);
        params
    }
}

pub fn expand_params(limit: u32, filters: &Filters) -> QueryParams {
    let mut params = vec![("limit".to_string(), limit.to_string())];
    filters.append_to(&mut params);
    params
}

pub fn similar_params(filters: &Filters) -> QueryParams {
    let mut params = QueryParams::new();
    filters.append_to(&mut params);
    params
}
