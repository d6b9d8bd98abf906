use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::beacon::attribute::{as_sequence, lookup, lookup_number, lookup_text, lookup_truthy};

/// One aggregation-level result: a beacon in a network, or one result set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResponseItem {
    /// Beacon identifier (`beaconId`, falling back to `id`).
    pub beacon_id: Option<String>,
    /// Existence flag reported by boolean beacons.
    pub exists: Option<bool>,
    /// Free-form `info` block.
    pub info: Option<Value>,
    /// Dataset-level results; empty when absent or not an array.
    pub items: Vec<Dataset>,
    /// `totalResultsCount`, only when it is a number.
    pub total_results_count: Option<f64>,
}

impl ResponseItem {
    /// Build from raw JSON. Never fails; malformed fields read as absent.
    pub fn from_value(json: &Value) -> Self {
        Self {
            beacon_id: lookup_text(json, &["beaconId"]).or_else(|| lookup_text(json, &["id"])),
            exists: lookup(json, &["exists"]).and_then(Value::as_bool),
            info: lookup(json, &["info"]).cloned(),
            items: as_sequence(json.get("items"))
                .iter()
                .map(Dataset::from_value)
                .collect(),
            total_results_count: lookup_number(json, &["totalResultsCount"]),
        }
    }
}

/// One dataset-level result inside a [`ResponseItem`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    /// Dataset identifier, present only when truthy.
    pub dataset: Option<String>,
    /// `resultsCount`, only when it is a number.
    pub results_count: Option<f64>,
    /// Record objects, only when `results` is an array.
    pub results: Option<Vec<Value>>,
    /// Existence flag.
    pub exists: Option<bool>,
}

impl Dataset {
    /// Build from raw JSON. Never fails.
    pub fn from_value(json: &Value) -> Self {
        Self {
            dataset: lookup_truthy(json, &["dataset"]),
            results_count: lookup_number(json, &["resultsCount"]),
            results: lookup(json, &["results"])
                .and_then(Value::as_array)
                .cloned(),
            exists: lookup(json, &["exists"]).and_then(Value::as_bool),
        }
    }

    /// Number of records carried inline.
    pub fn record_count(&self) -> usize {
        self.results.as_ref().map_or(0, Vec::len)
    }
}

/// Organization block of the Beacon info response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub welcome_url: Option<String>,
    pub logo_url: Option<String>,
    pub contact_url: Option<String>,
}

/// Response of `GET <apiBase>/`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NetworkInfo {
    /// `meta.apiVersion`.
    pub api_version: Option<String>,
    /// `response.organization`.
    pub organization: Option<Organization>,
    /// Aggregated items from the beacons of the network.
    pub items: Vec<ResponseItem>,
}

impl NetworkInfo {
    /// Build from raw JSON. Never fails.
    pub fn from_value(json: &Value) -> Self {
        let organization = lookup(json, &["response", "organization"])
            .and_then(|org| serde_json::from_value::<Organization>(org.clone()).ok());

        Self {
            api_version: lookup_text(json, &["meta", "apiVersion"]),
            organization,
            items: extract_items(json),
        }
    }
}

/// Search results for one entry type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResults {
    /// `meta.returnedGranularity`.
    pub granularity: Option<String>,
    /// One item per responding beacon or result set.
    pub items: Vec<ResponseItem>,
}

impl SearchResults {
    /// Build from raw JSON. Never fails.
    pub fn from_value(json: &Value) -> Self {
        Self {
            granularity: lookup_text(json, &["meta", "returnedGranularity"]),
            items: extract_items(json),
        }
    }
}

/// Collect result items from `response.resultSets`, falling back to a
/// top-level `responses` array.
pub(crate) fn extract_items(json: &Value) -> Vec<ResponseItem> {
    let result_sets = as_sequence(lookup(json, &["response", "resultSets"]));
    let source = if result_sets.is_empty() {
        as_sequence(json.get("responses"))
    } else {
        result_sets
    };
    source.iter().map(ResponseItem::from_value).collect()
}

/// A filtering term from `GET <apiBase>/filtering_terms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteringTerm {
    /// Term CURIE or free-text id.
    pub id: String,
    /// Human label.
    pub label: Option<String>,
    /// `ontologyTerm`, `alphanumeric` or `custom`.
    #[serde(rename = "type")]
    pub term_type: Option<String>,
    /// Entry types the term applies to.
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Parse the filtering terms list. Entries without an `id` are skipped.
pub(crate) fn parse_filtering_terms(json: &Value) -> Vec<FilteringTerm> {
    as_sequence(lookup(json, &["response", "filteringTerms"]))
        .iter()
        .filter_map(|term| match serde_json::from_value::<FilteringTerm>(term.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                log::warn!("Skipping filtering term: {e}");
                None
            }
        })
        .collect()
}

/// One entry of the `endpointSets` map from `GET <apiBase>/map`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSet {
    /// Entry type id, e.g. `individual`.
    pub entry_type: String,
    /// Collection URL.
    pub root_url: String,
    /// Single-entry URL template.
    pub single_entry_url: Option<String>,
    /// Filtering terms URL for this entry type.
    pub filtering_terms_url: Option<String>,
}

/// Parse `response.endpointSets` as `(name, endpoint)` pairs.
pub(crate) fn parse_endpoint_sets(json: &Value) -> Vec<(String, EndpointSet)> {
    let Some(sets) = lookup(json, &["response", "endpointSets"]).and_then(Value::as_object)
    else {
        return vec![];
    };

    sets.iter()
        .filter_map(|(name, set)| match serde_json::from_value::<EndpointSet>(set.clone()) {
            Ok(parsed) => Some((name.clone(), parsed)),
            Err(e) => {
                log::warn!("Skipping endpoint set {name}: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_tolerates_non_array_items_and_string_counts() {
        let item = ResponseItem::from_value(&json!({
            "beaconId": "org.example.beacon",
            "items": {"dataset": "EGA1"},
            "totalResultsCount": "12"
        }));
        assert_eq!(item.beacon_id.as_deref(), Some("org.example.beacon"));
        assert!(item.items.is_empty());
        assert_eq!(item.total_results_count, None);
    }

    #[test]
    fn dataset_reads_results() {
        let dataset = Dataset::from_value(&json!({
            "dataset": "EGA1",
            "resultsCount": 2,
            "results": [{"id": "a"}, {"id": "b"}]
        }));
        assert_eq!(dataset.dataset.as_deref(), Some("EGA1"));
        assert_eq!(dataset.results_count, Some(2.0));
        assert_eq!(dataset.record_count(), 2);
    }

    #[test]
    fn info_reads_meta_and_organization() {
        let info = NetworkInfo::from_value(&json!({
            "meta": {"apiVersion": "v2.0.0"},
            "response": {
                "organization": {"id": "org", "name": "Example", "logoUrl": "https://x/logo.png"},
                "resultSets": [{"id": "b1", "exists": true}]
            }
        }));
        assert_eq!(info.api_version.as_deref(), Some("v2.0.0"));
        let org = info.organization.unwrap();
        assert_eq!(org.name.as_deref(), Some("Example"));
        assert_eq!(org.logo_url.as_deref(), Some("https://x/logo.png"));
        assert_eq!(info.items.len(), 1);
    }

    #[test]
    fn items_fall_back_to_responses() {
        let items = extract_items(&json!({"responses": [{"beaconId": "a"}, {"beaconId": "b"}]}));
        assert_eq!(items.len(), 2);
        assert!(extract_items(&json!(null)).is_empty());
    }

    #[test]
    fn filtering_terms_skip_entries_without_id() {
        let terms = parse_filtering_terms(&json!({
            "response": {"filteringTerms": [
                {"id": "NCIT:C20197", "label": "Male", "type": "ontologyTerm", "scopes": ["individual"]},
                {"label": "no id"}
            ]}
        }));
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].term_type.as_deref(), Some("ontologyTerm"));
    }

    #[test]
    fn endpoint_sets_are_named() {
        let sets = parse_endpoint_sets(&json!({
            "response": {"endpointSets": {
                "individual": {"entryType": "individual", "rootUrl": "https://b/individuals"}
            }}
        }));
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].0, "individual");
        assert_eq!(sets[0].1.root_url, "https://b/individuals");
    }
}
