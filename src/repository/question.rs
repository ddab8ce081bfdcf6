use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_CATEGORY: &str = "Misc";

/// Stored for negative indices so that no option matches.
const NO_ANSWER: usize = usize::MAX;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub category: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub answer_index: usize,
    pub explanation: String,
    pub refs: String,
}

impl Question {
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.answer_index
    }
}

/// A field that had to be coerced while normalizing one raw record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coercion {
    /// Position of the record in the source array.
    pub position: usize,
    pub field: &'static str,
    pub detail: String,
}

/// Normalize one raw JSON record. Never fails: anything missing or of the
/// wrong type falls back to a default and is reported in `coercions`.
pub fn normalize(position: usize, raw: &Value, coercions: &mut Vec<Coercion>) -> Question {
    let empty = Map::new();
    let obj = match raw.as_object() {
        Some(obj) => obj,
        None => {
            coercions.push(Coercion {
                position,
                field: "record",
                detail: format!("expected an object, got {}", kind_of(raw)),
            });
            &empty
        }
    };

    let mut note = |field: &'static str, detail: String| {
        coercions.push(Coercion {
            position,
            field,
            detail,
        });
    };

    let id = string_field(obj, "id", "", &mut note);
    let mut category = string_field(obj, "category", DEFAULT_CATEGORY, &mut note);
    if category.trim().is_empty() {
        if obj.contains_key("category") {
            note("category", format!("empty, using \"{DEFAULT_CATEGORY}\""));
        }
        category = DEFAULT_CATEGORY.to_string();
    }
    let prompt = string_field(obj, "prompt", "", &mut note);

    let options = match obj.get("options") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| scalar_to_string(item).unwrap_or_default())
            .collect(),
        None => {
            note("options", "missing, using no options".to_string());
            Vec::new()
        }
        Some(other) => {
            note(
                "options",
                format!("expected an array, got {}", kind_of(other)),
            );
            Vec::new()
        }
    };

    let answer_index = match obj.get("answerIndex") {
        Some(value) => match as_index(value) {
            Some(idx) => idx,
            None => {
                note(
                    "answerIndex",
                    format!("{value} is not an integer, using 0"),
                );
                0
            }
        },
        None => {
            note("answerIndex", "missing, using 0".to_string());
            0
        }
    };
    if !options.is_empty() && answer_index >= options.len() {
        let shown = obj
            .get("answerIndex")
            .map(Value::to_string)
            .unwrap_or_else(|| answer_index.to_string());
        note(
            "answerIndex",
            format!("{shown} is out of range for {} options", options.len()),
        );
    }

    let explanation = string_field(obj, "explanation", "", &mut note);
    let refs = string_field(obj, "refs", "", &mut note);

    Question {
        id,
        category,
        prompt,
        options,
        answer_index,
        explanation,
        refs,
    }
}

fn string_field(
    obj: &Map<String, Value>,
    key: &'static str,
    default: &str,
    note: &mut impl FnMut(&'static str, String),
) -> String {
    match obj.get(key) {
        None | Some(Value::Null) => default.to_string(),
        Some(value) => match scalar_to_string(value) {
            Some(s) => s,
            None => {
                note(key, format!("expected a string, got {}", kind_of(value)));
                default.to_string()
            }
        },
    }
}

/// Strings pass through, numbers and booleans are stringified.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integral numbers (2.0 included) as an index. Negative integers map to
/// `NO_ANSWER`; anything else is `None`.
fn as_index(value: &Value) -> Option<usize> {
    if let Some(n) = value.as_u64() {
        return Some(usize::try_from(n).unwrap_or(NO_ANSWER));
    }
    if value.as_i64().is_some() {
        return Some(NO_ANSWER);
    }
    let f = value.as_f64()?;
    if f.fract() != 0.0 {
        None
    } else if f < 0.0 || f > usize::MAX as f64 {
        Some(NO_ANSWER)
    } else {
        Some(f as usize)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
