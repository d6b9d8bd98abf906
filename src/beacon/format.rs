use serde::Serialize;
use serde_json::Value;

use crate::beacon::attribute::{AttributeValue, as_entries, lookup, lookup_text};

/// Text shown when an attribute has nothing to render.
pub const PLACEHOLDER: &str = "-";

const INDENT: &str = "  ";

/// One output line and its nesting depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub depth: usize,
    pub text: String,
}

/// Formatter output before it is turned into text or a cell widget.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Rendered {
    lines: Vec<Line>,
}

impl Rendered {
    fn push(&mut self, text: impl Into<String>) {
        self.push_at(0, text);
    }

    fn push_at(&mut self, depth: usize, text: impl Into<String>) {
        self.lines.push(Line {
            depth,
            text: text.into(),
        });
    }

    /// Lines in output order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Number of lines, nested ones included.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when nothing survived filtering.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Plain-text form: lines joined by newlines, nested lines indented,
    /// or [`PLACEHOLDER`] when empty.
    pub fn to_text(&self) -> String {
        if self.lines.is_empty() {
            return PLACEHOLDER.to_string();
        }
        self.lines
            .iter()
            .map(|line| format!("{}{}", INDENT.repeat(line.depth), line.text))
            .collect::<Vec<String>>()
            .join("\n")
    }
}

/// Formatter selected for a record attribute key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttributeKind {
    Info,
    Variation,
    Measures,
    InterventionsOrProcedures,
    MolecularAttributes,
    CaseLevelData,
    /// Any other attribute: inline form, one line per list element.
    Generic,
}

impl AttributeKind {
    /// Pick the formatter for a record key.
    pub fn for_key(key: &str) -> Self {
        match key {
            "info" => AttributeKind::Info,
            "variation" => AttributeKind::Variation,
            "measures" | "measurements" => AttributeKind::Measures,
            "interventionsOrProcedures" => AttributeKind::InterventionsOrProcedures,
            "molecularAttributes" => AttributeKind::MolecularAttributes,
            "caseLevelData" => AttributeKind::CaseLevelData,
            _ => AttributeKind::Generic,
        }
    }

    /// Run the formatter.
    pub fn render(self, value: &Value) -> Rendered {
        match self {
            AttributeKind::Info => render_info(value),
            AttributeKind::Variation => render_variation(value),
            AttributeKind::Measures => render_measures(value),
            AttributeKind::InterventionsOrProcedures => render_interventions(value),
            AttributeKind::MolecularAttributes => render_molecular_attributes(value),
            AttributeKind::CaseLevelData => render_case_level_data(value),
            AttributeKind::Generic => render_generic(value),
        }
    }

    /// Run the formatter and produce plain text.
    pub fn format(self, value: &Value) -> String {
        self.render(value).to_text()
    }
}

/// Turn a camel or snake cased key into a label.
///
/// Only the first character is uppercased; `someKey_example` becomes
/// `Some Key example`.
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut previous: Option<char> = None;

    for ch in key.chars() {
        if ch == '_' {
            out.push(' ');
        } else {
            if ch.is_uppercase() && previous.is_some_and(char::is_lowercase) {
                out.push(' ');
            }
            out.push(ch);
        }
        previous = Some(ch);
    }

    let mut chars = out.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => out,
    }
}

/// Keys naming ontology terms are never rendered.
pub fn is_skippable_key(key: &str) -> bool {
    key.to_lowercase().contains("ontologyterm")
}

/// Single-string form of a value, `None` when nothing is renderable.
pub fn render_inline(value: &AttributeValue) -> Option<String> {
    let text = match value {
        AttributeValue::Absent => return None,
        AttributeValue::Labeled(label) => label.clone(),
        AttributeValue::Text(text) => text.clone(),
        AttributeValue::Scalar(scalar) => scalar.to_text(),
        AttributeValue::Object(entries) => entries
            .iter()
            .filter(|(key, _)| !is_skippable_key(key))
            .filter_map(|(_, entry)| render_inline(entry))
            .collect::<Vec<String>>()
            .join(", "),
        AttributeValue::List(items) => items
            .iter()
            .filter_map(render_inline)
            .collect::<Vec<String>>()
            .join(", "),
    };

    if text.is_empty() { None } else { Some(text) }
}

/// Lines for one `info` entry.
///
/// Objects give one `"Key: value"` line per non-skippable key, even when they
/// carry a `label` or `text`; the shortcut only applies to the values.
fn info_lines(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().flat_map(info_lines).collect(),
        Value::Object(entries) => entries
            .iter()
            .filter(|(key, _)| !is_skippable_key(key))
            .filter_map(|(key, entry)| {
                render_inline(&AttributeValue::from_json(entry))
                    .map(|text| format!("{}: {}", humanize_key(key), text))
            })
            .collect(),
        other => render_inline(&AttributeValue::from_json(other))
            .into_iter()
            .collect(),
    }
}

pub fn render_info(value: &Value) -> Rendered {
    let mut rendered = Rendered::default();
    let Some(entries) = value.as_object() else {
        return rendered;
    };

    for (key, entry) in entries {
        if is_skippable_key(key) {
            continue;
        }
        let nested = info_lines(entry);
        match nested.as_slice() {
            [] => {}
            [single] => rendered.push(format!("{}: {}", humanize_key(key), single)),
            lines => {
                rendered.push(format!("{}:", humanize_key(key)));
                for line in lines {
                    rendered.push(line.clone());
                }
            }
        }
    }

    rendered
}

pub fn render_variation(value: &Value) -> Rendered {
    let mut rendered = Rendered::default();

    if let Some(location_type) = lookup_text(value, &["location", "type"]) {
        rendered.push(format!("Location type: {}", humanize_key(&location_type)));
    }

    let sequence_id = lookup_text(value, &["location", "sequence_id"])
        .or_else(|| lookup_text(value, &["location", "sequenceId"]));
    if let Some(sequence_id) = sequence_id {
        rendered.push(format!("Sequence id: {}", sequence_id));
    }

    let start = lookup_text(value, &["location", "interval", "start", "value"]);
    let end = lookup_text(value, &["location", "interval", "end", "value"]);
    if let (Some(start), Some(end)) = (start, end) {
        rendered.push("Sequence interval:");
        rendered.push_at(1, format!("Start: {}", start));
        rendered.push_at(1, format!("End: {}", end));
    }

    for (key, label) in [
        ("alternateBases", "Alternate bases"),
        ("referenceBases", "Reference bases"),
        ("variantType", "Variant type"),
    ] {
        if let Some(text) = lookup_text(value, &[key]) {
            rendered.push(format!("{}: {}", label, text));
        }
    }

    rendered
}

/// Numbers get exactly two decimals; anything else renders inline.
fn measurement_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n.as_f64().map(|f| format!("{:.2}", f)),
        other => render_inline(&AttributeValue::from_json(other)),
    }
}

pub fn render_measures(value: &Value) -> Rendered {
    let mut rendered = Rendered::default();

    for entry in as_entries(Some(value)) {
        let Some(label) = lookup_text(entry, &["assayCode", "label"]) else {
            continue;
        };
        let Some(measured) = lookup(entry, &["measurementValue", "value"]).and_then(measurement_text)
        else {
            continue;
        };

        let mut line = format!("{}: {}", label, measured);
        if let Some(unit) = lookup_text(entry, &["measurementValue", "unit", "label"]) {
            line.push(' ');
            line.push_str(&unit);
        }
        if let Some(date) = lookup_text(entry, &["date"]) {
            line.push_str(&format!(" ({})", date));
        }
        rendered.push(line);
    }

    rendered
}

pub fn render_interventions(value: &Value) -> Rendered {
    let mut rendered = Rendered::default();
    for label in as_entries(Some(value))
        .into_iter()
        .filter_map(|entry| lookup_text(entry, &["procedureCode", "label"]))
    {
        rendered.push(label);
    }
    rendered
}

/// Label, then text, then id; otherwise the inline form.
fn molecular_item_text(item: &Value) -> Option<String> {
    if item.is_object() {
        lookup_text(item, &["label"])
            .or_else(|| lookup_text(item, &["text"]))
            .or_else(|| lookup_text(item, &["id"]))
            .or_else(|| render_inline(&AttributeValue::from_json(item)))
    } else {
        render_inline(&AttributeValue::from_json(item))
    }
}

pub fn render_molecular_attributes(value: &Value) -> Rendered {
    let mut rendered = Rendered::default();
    let Some(entries) = value.as_object() else {
        return rendered;
    };

    for (key, entry) in entries {
        if is_skippable_key(key) {
            continue;
        }
        let Some(items) = entry.as_array() else {
            continue;
        };
        let texts: Vec<String> = items.iter().filter_map(molecular_item_text).collect();
        if texts.is_empty() {
            continue;
        }
        rendered.push(format!("{}: {}", humanize_key(key), texts.join(", ")));
    }

    rendered
}

pub fn render_case_level_data(value: &Value) -> Rendered {
    let mut rendered = Rendered::default();
    for entry in as_entries(Some(value)) {
        let biosample = lookup_text(entry, &["biosampleId"]);
        let zygosity = lookup_text(entry, &["zygosity", "label"]);
        if let (Some(biosample), Some(zygosity)) = (biosample, zygosity) {
            rendered.push(format!("{}: {}", biosample, zygosity));
        }
    }
    rendered
}

fn render_generic(value: &Value) -> Rendered {
    let mut rendered = Rendered::default();
    match AttributeValue::from_json(value) {
        AttributeValue::List(items) => {
            for text in items.iter().filter_map(render_inline) {
                rendered.push(text);
            }
        }
        other => {
            if let Some(text) = render_inline(&other) {
                rendered.push(text);
            }
        }
    }
    rendered
}

pub fn format_info(value: &Value) -> String {
    render_info(value).to_text()
}

pub fn format_variation(value: &Value) -> String {
    render_variation(value).to_text()
}

pub fn format_measures(value: &Value) -> String {
    render_measures(value).to_text()
}

pub fn format_interventions(value: &Value) -> String {
    render_interventions(value).to_text()
}

pub fn format_molecular_attributes(value: &Value) -> String {
    render_molecular_attributes(value).to_text()
}

pub fn format_case_level_data(value: &Value) -> String {
    render_case_level_data(value).to_text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beacon::table::DetailView;
    use proptest::prelude::*;
    use serde_json::json;

    const ALL_KINDS: [AttributeKind; 7] = [
        AttributeKind::Info,
        AttributeKind::Variation,
        AttributeKind::Measures,
        AttributeKind::InterventionsOrProcedures,
        AttributeKind::MolecularAttributes,
        AttributeKind::CaseLevelData,
        AttributeKind::Generic,
    ];

    #[test]
    fn empty_inputs_render_placeholder() {
        for kind in ALL_KINDS {
            for input in [json!(null), json!({}), json!([])] {
                assert_eq!(kind.format(&input), PLACEHOLDER, "{kind:?} {input}");
            }
        }
    }

    #[test]
    fn humanize_only_capitalizes_first_character() {
        assert_eq!(humanize_key("someKey_example"), "Some Key example");
        assert_eq!(humanize_key("SequenceLocation"), "Sequence Location");
        assert_eq!(humanize_key("age_of_onset"), "Age of onset");
        assert_eq!(humanize_key(""), "");
        assert_eq!(humanize_key("HGVS"), "HGVS");
    }

    #[test]
    fn skippable_keys_are_case_insensitive() {
        assert!(is_skippable_key("someOntologyTermId"));
        assert!(is_skippable_key("ONTOLOGYTERM"));
        assert!(!is_skippable_key("ontology"));
    }

    #[test]
    fn inline_prefers_label_then_text() {
        let value = AttributeValue::from_json(&json!({
            "a": 1,
            "someOntologyTermId": "X",
            "b": {"label": "L"},
            "c": {"text": "T"},
            "d": null
        }));
        assert_eq!(render_inline(&value).as_deref(), Some("1, L, T"));
    }

    #[test]
    fn info_skips_ontology_terms() {
        assert_eq!(
            format_info(&json!({"a": 1, "someOntologyTermId": "X"})),
            "A: 1"
        );
    }

    #[test]
    fn info_nests_multi_line_entries() {
        let rendered = format_info(&json!({
            "study": "S1",
            "studyDetails": {"cohort_name": "C1", "siteCount": 3},
            "notes": ["first", "second"]
        }));
        assert_eq!(
            rendered,
            "Study: S1\nStudy Details:\nCohort name: C1\nSite Count: 3\nNotes:\nfirst\nsecond"
        );
    }

    #[test]
    fn info_objects_render_every_key() {
        assert_eq!(
            format_info(&json!({"ageGroup": {"id": "NCIT:C49685", "label": "adult"}})),
            "Age Group:\nId: NCIT:C49685\nLabel: adult"
        );
        assert_eq!(
            format_info(&json!({"ageGroup": {"label": "adult"}})),
            "Age Group: Label: adult"
        );
        assert_eq!(
            format_info(&json!({"cohort": {"design": {"label": "longitudinal"}}})),
            "Cohort: Design: longitudinal"
        );
    }

    #[test]
    fn variation_literal_case() {
        let rendered = format_variation(&json!({
            "location": {
                "type": "SequenceLocation",
                "interval": {"start": {"value": 10}, "end": {"value": 20}}
            },
            "alternateBases": "A",
            "referenceBases": "G"
        }));
        let expected = [
            "Location type: Sequence Location",
            "Sequence interval:",
            "  Start: 10",
            "  End: 20",
            "Alternate bases: A",
            "Reference bases: G",
        ]
        .join("\n");
        assert_eq!(rendered, expected);
    }

    #[test]
    fn variation_interval_needs_both_ends() {
        let rendered = format_variation(&json!({
            "location": {"sequenceId": "refseq:NC_000001.11", "interval": {"start": {"value": 10}}},
            "variantType": "SNP"
        }));
        assert_eq!(rendered, "Sequence id: refseq:NC_000001.11\nVariant type: SNP");
    }

    #[test]
    fn measures_literal_case() {
        let rendered = format_measures(&json!([{
            "assayCode": {"label": "Weight"},
            "measurementValue": {"value": 70.5, "unit": {"label": "kg"}},
            "date": "2020-01-01"
        }]));
        assert_eq!(rendered, "Weight: 70.50 kg (2020-01-01)");
    }

    #[test]
    fn measures_drop_incomplete_entries_and_pass_through_text() {
        let rendered = format_measures(&json!([
            {"assayCode": {"label": "Height"}},
            {"measurementValue": {"value": 3}},
            {"assayCode": {"label": "Grade"}, "measurementValue": {"value": "II"}},
            {"assayCode": {"label": "Count"}, "measurementValue": {"value": 3}}
        ]));
        assert_eq!(rendered, "Grade: II\nCount: 3.00");
    }

    #[test]
    fn interventions_collect_procedure_labels() {
        let rendered = format_interventions(&json!([
            {"procedureCode": {"label": "Biopsy"}},
            {"procedureCode": {"id": "NCIT:C15189"}},
            {"procedureCode": {"label": "Surgery"}}
        ]));
        assert_eq!(rendered, "Biopsy\nSurgery");
    }

    #[test]
    fn molecular_attributes_prefer_label_text_id() {
        let rendered = format_molecular_attributes(&json!({
            "geneIds": ["BRCA1", null, "TP53"],
            "molecularEffects": [{"id": "SO:0001583", "label": "missense"}, {"id": "SO:0001587"}],
            "aminoacidChanges": [],
            "annotationImpact": "HIGH",
            "effectOntologyTerm": [{"label": "hidden"}]
        }));
        assert_eq!(
            rendered,
            "Gene Ids: BRCA1, TP53\nMolecular Effects: missense, SO:0001587"
        );
    }

    #[test]
    fn case_level_data_needs_both_fields() {
        let rendered = format_case_level_data(&json!([
            {"biosampleId": "S1", "zygosity": {"label": "heterozygous"}},
            {"biosampleId": "S2"},
            {"zygosity": {"label": "homozygous"}}
        ]));
        assert_eq!(rendered, "S1: heterozygous");
    }

    #[test]
    fn dispatch_by_key() {
        assert_eq!(AttributeKind::for_key("measures"), AttributeKind::Measures);
        assert_eq!(AttributeKind::for_key("caseLevelData"), AttributeKind::CaseLevelData);
        assert_eq!(AttributeKind::for_key("sex"), AttributeKind::Generic);
        assert_eq!(
            AttributeKind::Generic.format(&json!({"id": "NCIT:C16576", "label": "female"})),
            "female"
        );
    }

    fn arb_attribute() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i32>().prop_map(|n| json!(n)),
            (-1000.0f64..1000.0).prop_map(|f| json!(f)),
            "[A-Za-z ]{0,6}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 32, 5, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::vec(
                    (
                        prop_oneof![
                            Just("label".to_string()),
                            Just("text".to_string()),
                            Just("id".to_string()),
                            Just("someOntologyTermId".to_string()),
                            Just("value".to_string()),
                            "[a-z]{1,4}(_[a-z]{1,3})?"
                        ],
                        inner
                    ),
                    0..5
                )
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn formatting_is_idempotent(input in arb_attribute()) {
            for kind in ALL_KINDS {
                prop_assert_eq!(kind.format(&input), kind.format(&input));
            }
        }
    }

    const SENTINEL: &str = "SENTINEL_ONT";

    /// Insert `key` with `hidden` into every object of `value`.
    fn plant(value: &mut Value, key: &str, hidden: &Value) {
        match value {
            Value::Object(entries) => {
                for entry in entries.values_mut() {
                    plant(entry, key, hidden);
                }
                entries.insert(key.to_string(), hidden.clone());
            }
            Value::Array(items) => {
                for item in items {
                    plant(item, key, hidden);
                }
            }
            _ => {}
        }
    }

    fn arb_planted() -> impl Strategy<Value = (Value, String)> {
        (
            arb_attribute(),
            prop_oneof![
                Just("someOntologyTermId"),
                Just("diseaseOntologyTerm"),
                Just("effect_ontologyterm"),
                Just("ONTOLOGYTERM"),
            ],
            prop_oneof![
                Just(json!(SENTINEL)),
                Just(json!([SENTINEL])),
                Just(json!({"label": SENTINEL})),
            ],
        )
            .prop_map(|(input, key, hidden)| {
                let mut wrapped = json!({ "entry": input.clone(), "list": [input] });
                plant(&mut wrapped, key, &hidden);
                (wrapped, key.to_string())
            })
    }

    proptest! {
        #[test]
        fn ontology_term_keys_never_render((input, key) in arb_planted()) {
            let label = humanize_key(&key);
            let mut outputs: Vec<String> = ALL_KINDS.iter().map(|kind| kind.format(&input)).collect();
            for field in DetailView::from_record(&input).fields {
                outputs.push(field.label);
                outputs.push(field.text);
            }
            for text in outputs {
                prop_assert!(!text.contains(SENTINEL), "{}", text);
                prop_assert!(!text.contains(&label), "{}", text);
            }
        }
    }
}
