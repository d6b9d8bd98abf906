use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;
use serde_json::Value;

use crate::beacon::attribute::lookup_text;
use crate::beacon::cell::CellWidget;
use crate::beacon::classify::{AggregationKind, classify, classify_dataset};
use crate::beacon::format::{AttributeKind, PLACEHOLDER, humanize_key, is_skippable_key};
use crate::beacon::response::{Dataset, ResponseItem};
use crate::config::Theme;

/// Value shown in the summary column of a row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Summary {
    /// Number of datasets with records.
    Datasets(usize),
    /// Number of records.
    Records(usize),
    /// Reported tally without records.
    Count(u64),
    /// Existence only.
    Exists(bool),
}

impl Summary {
    pub fn display(&self) -> String {
        match self {
            Summary::Datasets(1) => "1 dataset".to_string(),
            Summary::Datasets(n) => format!("{} datasets", n),
            Summary::Records(1) => "1 record".to_string(),
            Summary::Records(n) => format!("{} records", n),
            Summary::Count(n) => n.to_string(),
            Summary::Exists(true) => "Yes".to_string(),
            Summary::Exists(false) => "No".to_string(),
        }
    }
}

fn count_value(count: Option<f64>) -> u64 {
    count.filter(|c| *c > 0.0).map_or(0, |c| c.round() as u64)
}

/// Sub-row for one dataset of an expanded result row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetRow {
    pub dataset: String,
    pub kind: AggregationKind,
    pub summary: Summary,
}

impl DatasetRow {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let kind = classify_dataset(dataset);
        let summary = match kind {
            AggregationKind::Record => {
                let inline = dataset.record_count();
                if inline > 0 {
                    Summary::Records(inline)
                } else {
                    Summary::Records(count_value(dataset.results_count) as usize)
                }
            }
            AggregationKind::Count => Summary::Count(count_value(dataset.results_count)),
            AggregationKind::Boolean => Summary::Exists(dataset.exists.unwrap_or(false)),
        };

        Self {
            dataset: dataset
                .dataset
                .clone()
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            kind,
            summary,
        }
    }

    /// True when the dataset reported anything.
    pub fn found(&self) -> bool {
        match self.summary {
            Summary::Exists(exists) => exists,
            Summary::Count(n) => n > 0,
            Summary::Datasets(n) | Summary::Records(n) => n > 0,
        }
    }

    /// Records carried or counted by this dataset.
    fn record_total(&self) -> u64 {
        match self.summary {
            Summary::Records(n) => n as u64,
            Summary::Count(n) => n,
            _ => 0,
        }
    }
}

/// One row of the results table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub beacon_id: String,
    pub kind: AggregationKind,
    pub summary: Summary,
    /// Only record rows open into dataset sub-rows.
    pub expandable: bool,
    pub datasets: Vec<DatasetRow>,
}

impl ResultRow {
    pub fn from_item(item: &ResponseItem) -> Self {
        let classification = classify(item);
        let summary = match classification.kind {
            AggregationKind::Record => Summary::Datasets(classification.dataset_count),
            AggregationKind::Count => Summary::Count(count_value(item.total_results_count)),
            AggregationKind::Boolean => Summary::Exists(item.exists.unwrap_or(false)),
        };
        let expandable = classification.kind == AggregationKind::Record;
        let datasets = if expandable {
            item.items.iter().map(DatasetRow::from_dataset).collect()
        } else {
            vec![]
        };

        Self {
            beacon_id: item
                .beacon_id
                .clone()
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            kind: classification.kind,
            summary,
            expandable,
            datasets,
        }
    }

    /// True when the beacon reported anything.
    pub fn found(&self) -> bool {
        match self.summary {
            Summary::Exists(exists) => exists,
            Summary::Count(n) => n > 0,
            Summary::Datasets(n) | Summary::Records(n) => n > 0,
        }
    }
}

/// Totals shown above the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub beacons_found: usize,
    /// Dataset sub-rows that reported a match.
    pub datasets: usize,
    pub records: u64,
}

/// Results table for one search.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResultsTable {
    pub rows: Vec<ResultRow>,
    pub totals: Totals,
}

impl ResultsTable {
    pub fn build(items: &[ResponseItem]) -> Self {
        let rows: Vec<ResultRow> = items.iter().map(ResultRow::from_item).collect();

        let mut totals = Totals::default();
        for row in &rows {
            if row.found() {
                totals.beacons_found += 1;
            }
            totals.datasets += row.datasets.iter().filter(|d| d.found()).count();
            totals.records += match row.summary {
                Summary::Count(n) => n,
                _ => row.datasets.iter().map(DatasetRow::record_total).sum(),
            };
        }

        Self { rows, totals }
    }
}

/// One attribute in a record detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailField {
    pub key: String,
    pub label: String,
    pub kind: AttributeKind,
    pub text: String,
    pub cell: CellWidget,
}

/// Detail view of a single record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub title: String,
    pub fields: Vec<DetailField>,
}

impl DetailView {
    /// Build from a record object. Non-objects yield an empty view.
    pub fn from_record(record: &Value) -> Self {
        let title = lookup_text(record, &["id"]).unwrap_or_else(|| PLACEHOLDER.to_string());
        let fields = record
            .as_object()
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(key, _)| !is_skippable_key(key))
                    .map(|(key, value)| {
                        let kind = AttributeKind::for_key(key);
                        let rendered = kind.render(value);
                        DetailField {
                            key: key.clone(),
                            label: humanize_key(key),
                            kind,
                            text: rendered.to_text(),
                            cell: CellWidget::from_rendered(rendered),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { title, fields }
    }

    /// Definition list for the detail modal.
    pub fn to_html(&self, theme: &Theme) -> String {
        let mut html = format!(
            "<dl class=\"record-detail\" style=\"--accent: {}\">",
            encode_double_quoted_attribute(&theme.secondary)
        );
        for field in &self.fields {
            html.push_str(&format!(
                "<dt>{}</dt><dd>{}</dd>",
                encode_text(&field.label),
                field.cell.to_html(theme)
            ));
        }
        html.push_str("</dl>");
        html
    }
}

/// State of a view fed by one fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> ViewState<T> {
    /// A failed fetch drops whatever was shown before.
    pub fn from_result(result: Result<T, String>) -> Self {
        match result {
            Ok(value) => ViewState::Ready(value),
            Err(message) => ViewState::Failed(message),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewState<U> {
        match self {
            ViewState::Loading => ViewState::Loading,
            ViewState::Failed(message) => ViewState::Failed(message),
            ViewState::Ready(value) => ViewState::Ready(f(value)),
        }
    }
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Loading
    }
}
