use serde::Serialize;
use serde_json::Value;

use crate::beacon::response::{Dataset, ResponseItem};

/// What a result item or dataset can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationKind {
    /// Individual records are available.
    Record,
    /// Only a tally is available.
    Count,
    /// Only existence is known.
    Boolean,
}

/// Classification of a [`ResponseItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub kind: AggregationKind,
    /// Number of datasets for `Record`, otherwise zero.
    pub dataset_count: usize,
}

/// Classify an item. Records beat a bare count, which beats neither.
pub fn classify(item: &ResponseItem) -> Classification {
    if !item.items.is_empty() {
        return Classification {
            kind: AggregationKind::Record,
            dataset_count: item.items.len(),
        };
    }

    let kind = match item.total_results_count {
        Some(count) if count > 0.0 => AggregationKind::Count,
        _ => AggregationKind::Boolean,
    };

    Classification {
        kind,
        dataset_count: 0,
    }
}

/// Classify a dataset independently of its parent item. Only a truthy
/// identifier makes a record dataset.
///
/// `resultsCount == 0` is `Boolean`: an explicit zero is not a distinguishing
/// count.
pub fn classify_dataset(dataset: &Dataset) -> AggregationKind {
    if dataset.dataset.is_some() {
        return AggregationKind::Record;
    }

    match dataset.results_count {
        Some(count) if count > 0.0 => AggregationKind::Count,
        _ => AggregationKind::Boolean,
    }
}

/// Classify raw item JSON.
pub fn classify_value(json: &Value) -> Classification {
    classify(&ResponseItem::from_value(json))
}

/// Classify raw dataset JSON.
pub fn classify_dataset_value(json: &Value) -> AggregationKind {
    classify_dataset(&Dataset::from_value(json))
}
