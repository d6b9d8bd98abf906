use serde_json::{Number, Value};

/// Leaf value of a record attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// String value.
    String(String),
    /// Numeric value, kept as parsed.
    Number(Number),
    /// Boolean value.
    Boolean(bool),
}

impl Scalar {
    /// Human-readable form of the scalar.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::String(value) => value.clone(),
            Scalar::Number(value) => number_text(value),
            Scalar::Boolean(value) => value.to_string(),
        }
    }
}

/// One record attribute, normalized from arbitrary JSON.
///
/// Objects carrying a usable `label` or `text` collapse to that string so
/// every formatter matches on the variant instead of probing keys again.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Null or missing.
    Absent,
    /// String, number or boolean.
    Scalar(Scalar),
    /// Object with a `label` field.
    Labeled(String),
    /// Object with a `text` field and no `label`.
    Text(String),
    /// Any other object, entries in document order.
    Object(Vec<(String, AttributeValue)>),
    /// Array of values.
    List(Vec<AttributeValue>),
}

impl AttributeValue {
    /// Normalize a JSON value.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => AttributeValue::Absent,
            Value::Bool(b) => AttributeValue::Scalar(Scalar::Boolean(*b)),
            Value::Number(n) => AttributeValue::Scalar(Scalar::Number(n.clone())),
            Value::String(s) => AttributeValue::Scalar(Scalar::String(s.clone())),
            Value::Array(items) => {
                AttributeValue::List(items.iter().map(AttributeValue::from_json).collect())
            }
            Value::Object(map) => {
                if let Some(label) = lookup_text(value, &["label"]) {
                    return AttributeValue::Labeled(label);
                }
                if let Some(text) = lookup_text(value, &["text"]) {
                    return AttributeValue::Text(text);
                }
                AttributeValue::Object(
                    map.iter()
                        .map(|(key, entry)| (key.clone(), AttributeValue::from_json(entry)))
                        .collect(),
                )
            }
        }
    }

    /// True for `Absent`.
    pub fn is_absent(&self) -> bool {
        matches!(self, AttributeValue::Absent)
    }
}

/// Follow `path` through nested objects.
///
/// A missing key, a non-object step, or a null leaf all yield `None`, which is
/// the single place where "field not provided" is decided.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    if current.is_null() { None } else { Some(current) }
}

/// Scalar at `path` as text; empty strings count as absent.
pub fn lookup_text(value: &Value, path: &[&str]) -> Option<String> {
    match lookup(value, path)? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Value at `path` when it is truthy, as text.
///
/// `false`, `0` and `""` count as absent alongside null. Arrays and objects
/// are truthy and come back as compact JSON.
pub fn lookup_truthy(value: &Value, path: &[&str]) -> Option<String> {
    let found = lookup(value, path).filter(|v| is_truthy(v))?;
    Some(match found {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        other => other.to_string(),
    })
}

/// JavaScript truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Number at `path`.
pub fn lookup_number(value: &Value, path: &[&str]) -> Option<f64> {
    lookup(value, path)?.as_f64()
}

/// Elements of an array value; anything else is an empty sequence.
pub fn as_sequence(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    }
}

/// Entries of an attribute that may be one object or a list of objects.
pub fn as_entries(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(object @ Value::Object(_)) => vec![object],
        _ => vec![],
    }
}

/// Render a JSON number the way JSON writes it: integral floats drop `.0`.
pub fn number_text(number: &Number) -> String {
    if number.is_f64() {
        if let Some(f) = number.as_f64() {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 {
                return format!("{:.0}", f);
            }
            return f.to_string();
        }
    }
    number.to_string()
}
