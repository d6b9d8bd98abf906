use reqwest::Client;
use serde_json::Value;

use crate::beacon::response::{
    EndpointSet, FilteringTerm, NetworkInfo, SearchResults, parse_endpoint_sets,
    parse_filtering_terms,
};
use crate::LogLevel;

/// Granularity requested from a search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    Boolean,
    Count,
    #[default]
    Record,
}

impl Granularity {
    fn as_str(self) -> &'static str {
        match self {
            Granularity::Boolean => "boolean",
            Granularity::Count => "count",
            Granularity::Record => "record",
        }
    }
}

/// Query for one entry type endpoint.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Filtering term ids, sent comma separated.
    pub filters: Vec<String>,
    pub granularity: Granularity,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl SearchQuery {
    /// Query string, without the leading `?`.
    pub(crate) fn to_query_string(&self) -> String {
        let mut params = vec![format!(
            "requestedGranularity={}",
            self.granularity.as_str()
        )];
        if !self.filters.is_empty() {
            params.push(format!(
                "filters={}",
                urlencoding::encode(&self.filters.join(","))
            ));
        }
        if let Some(skip) = self.skip {
            params.push(format!("skip={}", skip));
        }
        if let Some(limit) = self.limit {
            params.push(format!("limit={}", limit));
        }
        params.join("&")
    }
}

/// HTTP client for a Beacon (or Beacon network) API.
pub struct BeaconClient {
    client: Client,
    base_url: String,
    log_level: LogLevel,
}

impl BeaconClient {
    /// Create a client for the given API base URL.
    pub fn new(base_url: &str, log_level: LogLevel) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            log_level,
        }
    }

    /// Network metadata and aggregated items from `GET <apiBase>/`.
    pub async fn fetch_info(&self) -> Result<NetworkInfo, String> {
        let json = self.get_json("/").await?;
        Ok(NetworkInfo::from_value(&json))
    }

    /// All filtering terms.
    pub async fn fetch_filtering_terms(&self) -> Result<Vec<FilteringTerm>, String> {
        let json = self.get_json("/filtering_terms?limit=0").await?;
        Ok(parse_filtering_terms(&json))
    }

    /// Entry type endpoints from the `/map` document.
    pub async fn fetch_entry_types_map(&self) -> Result<Vec<(String, EndpointSet)>, String> {
        let json = self.get_json("/map").await?;
        Ok(parse_endpoint_sets(&json))
    }

    /// Search one entry type, e.g. `individuals` or `g_variants`.
    pub async fn search(
        &self,
        entry_type: &str,
        query: &SearchQuery,
    ) -> Result<SearchResults, String> {
        let path = format!(
            "/{}?{}",
            urlencoding::encode(entry_type),
            query.to_query_string()
        );
        let json = self.get_json(&path).await?;
        let results = SearchResults::from_value(&json);
        log::info!(
            "Search {} returned {} item(s)",
            entry_type,
            results.items.len()
        );
        Ok(results)
    }

    async fn get_json(&self, path: &str) -> Result<Value, String> {
        let url = format!("{}{}", self.base_url, path);

        if matches!(self.log_level, LogLevel::Debug) {
            log::debug!("Url: {:?}", url);
        }

        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| format!("Request failed: {e}"))?;

        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            log::warn!("Beacon API error ({}) for {}", status, url);
            return Err(format!("Beacon API error ({}): {}", status, body));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| format!("Failed to parse JSON: {e}"))
    }
}
