// file: src/client/aleph.rs
// description: authenticated GET requests against the Aleph entity API
// reference: https://aleph.occrp.org/api/openapi.json

use super::query::{EntityQuery, Filters, QueryParams, expand_params, similar_params};
use crate::config::{ApiConfig, Config, FailurePolicy, PolicyConfig};
use crate::error::{AlephError, Result};
use crate::models::{
    ExpandItem, ExpansionGroup, NormalizedEntity, SearchResponse, SimilarItem,
};
use crate::utils::validation::Validator;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, warn};

const EXPAND_OK_STATUS: &str = "ok";

/// Holds no per-call state; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct AlephClient {
    client: Client,
    base_url: Url,
    authorization: Option<HeaderValue>,
    policy: PolicyConfig,
}

impl AlephClient {
    pub fn new(api: &ApiConfig, policy: PolicyConfig) -> Result<Self> {
        Validator::validate_url(&api.base_url)?;

        let base_url = Url::parse(&api.base_url)
            .map_err(|e| AlephError::Config(format!("Invalid base URL {}: {}", api.base_url, e)))?;

        let authorization = match api.api_key.as_deref() {
            Some(key) => {
                let mut value = HeaderValue::from_str(&format!("ApiKey {}", key)).map_err(|_| {
                    AlephError::Config("API key contains characters not allowed in a header".to_string())
                })?;
                value.set_sensitive(true);
                Some(value)
            }
            None => {
                warn!("No Aleph API key configured, requests will be anonymous");
                None
            }
        };

        Ok(Self {
            client: Client::new(),
            base_url,
            authorization,
            policy,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api, config.policy.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Search entities; the decoded body is returned as-is.
    pub async fn search_entities(&self, query: &EntityQuery) -> Result<SearchResponse> {
        Validator::validate_limit(query.limit)?;

        let url = self.endpoint(&["entities"])?;
        let body = self
            .get_json(url, &query.to_params(), "search entities")
            .await?;

        if !has_results_array(&body) {
            return Err(AlephError::Shape("expected 'results' array".to_string()));
        }

        serde_json::from_value(body)
            .map_err(|e| AlephError::Shape(format!("unreadable search response: {}", e)))
    }

    /// Related entities grouped by the property that connects them.
    ///
    /// A body without `status: "ok"` and a `results` array is handled per
    /// `policy.expand`: by default it yields an empty list.
    pub async fn expand_entity(
        &self,
        entity_id: &str,
        limit: u32,
        filters: &Filters,
    ) -> Result<Vec<ExpansionGroup>> {
        Validator::validate_entity_id(entity_id)?;
        Validator::validate_limit(limit)?;

        let url = self.endpoint(&["entities", entity_id, "expand"])?;
        let mut body = self
            .get_json(url, &expand_params(limit, filters), "fetch connected entities")
            .await?;

        let status_ok = body.get("status").and_then(Value::as_str) == Some(EXPAND_OK_STATUS);
        if !status_ok || !has_results_array(&body) {
            return shape_failure(
                self.policy.expand,
                "fetch connected entities",
                "expected status 'ok' and a 'results' array",
                &body,
            );
        }

        // items decode leniently, a wrong-typed field reads as absent
        let groups: Vec<ExpansionGroup> = take_results(&mut body)
            .into_iter()
            .map(|item| ExpandItem::from(item).into_group(entity_id))
            .collect();

        debug!(
            "Expanded {} into {} groups ({} entities)",
            entity_id,
            groups.len(),
            groups.iter().map(|g| g.entities.len()).sum::<usize>()
        );

        Ok(groups)
    }

    /// Entities the server considers likely duplicates of `entity_id`.
    pub async fn similar_entities(
        &self,
        entity_id: &str,
        filters: &Filters,
    ) -> Result<Vec<NormalizedEntity>> {
        Validator::validate_entity_id(entity_id)?;

        let url = self.endpoint(&["entities", entity_id, "similar"])?;
        let mut body = self
            .get_json(url, &similar_params(filters), "fetch similar entities")
            .await?;

        if !has_results_array(&body) {
            return shape_failure(
                self.policy.similar,
                "fetch similar entities",
                "'results' should be an array",
                &body,
            );
        }

        let similar: Vec<NormalizedEntity> = take_results(&mut body)
            .into_iter()
            .map(|item| SimilarItem::from(item).into_normalized())
            .collect();

        debug!("Found {} entities similar to {}", similar.len(), entity_id);

        Ok(similar)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AlephError::Config(format!("Base URL cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json(
        &self,
        url: Url,
        params: &QueryParams,
        context: &'static str,
    ) -> Result<Value> {
        let mut request = self.client.get(url.clone()).query(params);
        if let Some(authorization) = &self.authorization {
            request = request.header(AUTHORIZATION, authorization.clone());
        }

        debug!("GET {} ({} params)", url, params.len());

        let response = request
            .send()
            .await
            .map_err(|source| AlephError::Transport { context, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AlephError::Remote {
                context,
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| AlephError::Transport { context, source })?;

        serde_json::from_slice(&bytes)
            .map_err(|e| AlephError::Shape(format!("body is not valid JSON: {}", e)))
    }
}

fn has_results_array(body: &Value) -> bool {
    body.get("results").is_some_and(Value::is_array)
}

/// Moves the `results` array out of the body, leaving it empty.
fn take_results(body: &mut Value) -> Vec<Value> {
    match body.get_mut("results") {
        Some(Value::Array(items)) => std::mem::take(items),
        _ => Vec::new(),
    }
}

fn shape_failure<T: Default>(
    policy: FailurePolicy,
    context: &str,
    message: &str,
    body: &Value,
) -> Result<T> {
    match policy {
        FailurePolicy::Hard => Err(AlephError::Shape(message.to_string())),
        FailurePolicy::Soft => {
            warn!(
                "Unexpected response format while trying to {}: {} (body: {})",
                context,
                message,
                Validator::truncate_text(&body.to_string(), 200)
            );
            Ok(T::default())
        }
    }
}
