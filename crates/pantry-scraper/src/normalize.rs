//! Field normalizers for Schema.org `Recipe` properties.
//!
//! Each property may legally arrive in several shapes (string, object, array).
//! Every normalizer first classifies the raw value into an explicit shape enum
//! and then matches on it exhaustively. All normalizers are total: an
//! unrecognized shape yields `None` or an empty list, never an error.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Number, Value};

/// `PT[nH][nM]`, unanchored. Both components are optional.
static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PT(?:([0-9]+)H)?(?:([0-9]+)M)?").expect("valid duration regex"));

/// First run of ASCII decimal digits.
static DIGIT_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid digit-run regex"));

/// JSON-LD authors routinely emit `null`, `""`, `0` or `false` to mean
/// "not provided". Those values are treated as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ---------------------------------------------------------------------------
// Duration
// ---------------------------------------------------------------------------

/// Convert an ISO-8601 `PT[nH][nM]` duration to whole minutes.
///
/// `"PT1H30M"` is 90, `"PT45M"` is 45, `"PT2H"` is 120. A missing hour or
/// minute component counts as zero. Returns `None` for absent, non-string or
/// non-matching input, and when the total does not fit in a `u32`.
#[must_use]
pub fn parse_duration_minutes(value: Option<&Value>) -> Option<u32> {
    let text = value?.as_str()?;
    let caps = DURATION_RE.captures(text)?;

    let component = |idx: usize| -> Option<u32> {
        caps.get(idx)
            .map_or(Some(0), |m| m.as_str().parse::<u32>().ok())
    };

    component(1)?.checked_mul(60)?.checked_add(component(2)?)
}

// ---------------------------------------------------------------------------
// Servings
// ---------------------------------------------------------------------------

/// Shapes observed for `recipeYield`.
#[derive(Debug)]
enum YieldShape<'a> {
    Count(&'a Number),
    Text(&'a str),
    List(&'a [Value]),
    Other,
}

impl<'a> From<&'a Value> for YieldShape<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Number(n) => YieldShape::Count(n),
            Value::String(s) => YieldShape::Text(s),
            Value::Array(items) => YieldShape::List(items),
            Value::Null | Value::Bool(_) | Value::Object(_) => YieldShape::Other,
        }
    }
}

/// Extract a serving count from `recipeYield`.
///
/// Numbers pass through. Strings yield their first run of digits, so
/// `"Serves 4-6"` is 4 and `"24 cookies"` is 24. For an array only the first
/// element is considered, and only when it is a string: the number check
/// applies to the top-level value alone, so `[8, "4 servings"]` is `None`.
#[must_use]
pub fn parse_servings(value: Option<&Value>) -> Option<u32> {
    let value = value.filter(|v| is_present(v))?;
    match YieldShape::from(value) {
        YieldShape::Count(n) => servings_from_number(n),
        YieldShape::Text(text) => first_digit_run(text),
        YieldShape::List(items) => match YieldShape::from(items.first()?) {
            YieldShape::Text(text) => first_digit_run(text),
            YieldShape::Count(_) | YieldShape::List(_) | YieldShape::Other => None,
        },
        YieldShape::Other => None,
    }
}

fn servings_from_number(n: &Number) -> Option<u32> {
    if let Some(count) = n.as_u64() {
        return u32::try_from(count).ok();
    }
    // Fractional yields ("4.5") keep their integer part.
    if n.as_f64().is_some_and(|f| f > 0.0) {
        return first_digit_run(&n.to_string());
    }
    None
}

fn first_digit_run(text: &str) -> Option<u32> {
    DIGIT_RUN_RE
        .find(text)
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

// ---------------------------------------------------------------------------
// Ingredients
// ---------------------------------------------------------------------------

/// Collect `recipeIngredient` lines, dropping non-strings and blank entries.
///
/// Anything other than an array yields an empty list.
#[must_use]
pub fn parse_ingredients(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_str)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_owned)
        .collect()
}

// ---------------------------------------------------------------------------
// Instructions
// ---------------------------------------------------------------------------

/// Shapes observed for `recipeInstructions`.
#[derive(Debug)]
enum InstructionsShape<'a> {
    Text(&'a str),
    Steps(&'a [Value]),
    Other,
}

impl<'a> From<&'a Value> for InstructionsShape<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::String(s) => InstructionsShape::Text(s),
            Value::Array(items) => InstructionsShape::Steps(items),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::Object(_) => {
                InstructionsShape::Other
            }
        }
    }
}

/// One element of a `recipeInstructions` array.
#[derive(Debug)]
enum StepShape<'a> {
    Text(&'a str),
    /// `HowToSection`: an optional heading plus nested steps.
    Section {
        name: Option<Cow<'a, str>>,
        items: &'a [Value],
    },
    /// `HowToStep` or any other object without nested steps.
    Step(&'a Map<String, Value>),
    Other,
}

impl<'a> From<&'a Value> for StepShape<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::String(s) => StepShape::Text(s),
            Value::Object(obj) => match obj.get("itemListElement") {
                Some(Value::Array(items)) => StepShape::Section {
                    name: obj.get("name").and_then(section_heading),
                    items,
                },
                _ => StepShape::Step(obj),
            },
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::Array(_) => StepShape::Other,
        }
    }
}

/// Heading text for a section `name`. Present scalars are rendered as text,
/// so a numeric name `1` becomes `"1"`.
fn section_heading(name: &Value) -> Option<Cow<'_, str>> {
    if !is_present(name) {
        return None;
    }
    match name {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Flatten `recipeInstructions` into ordered lines.
///
/// A bare string is split on newlines and each segment trimmed. Arrays are
/// flattened: plain strings are kept as-is, `HowToStep` objects contribute
/// their `text` (falling back to `name`), and `HowToSection` objects
/// contribute a `**name**` heading followed by their nested steps. Empty and
/// whitespace-only lines are dropped.
#[must_use]
pub fn parse_instructions(value: Option<&Value>) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };

    match InstructionsShape::from(value) {
        InstructionsShape::Text(text) => text
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect(),
        InstructionsShape::Steps(steps) => {
            let mut lines = Vec::new();
            for step in steps {
                flatten_step(StepShape::from(step), &mut lines);
            }
            lines.retain(|line| !line.trim().is_empty());
            lines
        }
        InstructionsShape::Other => Vec::new(),
    }
}

fn flatten_step(step: StepShape<'_>, out: &mut Vec<String>) {
    match step {
        StepShape::Text(text) => out.push(text.to_owned()),
        StepShape::Section { name, items } => {
            if let Some(name) = name {
                out.push(format!("**{name}**"));
            }
            for item in items {
                match item {
                    Value::String(text) => out.push(text.clone()),
                    Value::Object(obj) => {
                        if let Some(text) = present_str(obj, "text") {
                            out.push(text.to_owned());
                        }
                    }
                    _ => {}
                }
            }
        }
        StepShape::Step(obj) => {
            let text = obj
                .get("text")
                .filter(|v| is_present(v))
                .or_else(|| obj.get("name").filter(|v| is_present(v)));
            // A non-string `text` is residue and is dropped rather than
            // falling through to `name`.
            if let Some(text) = text.and_then(Value::as_str) {
                out.push(text.to_owned());
            }
        }
        StepShape::Other => {}
    }
}

fn present_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .filter(|v| is_present(v))
        .and_then(Value::as_str)
}

// ---------------------------------------------------------------------------
// Image
// ---------------------------------------------------------------------------

/// Shapes observed for `image`.
#[derive(Debug)]
enum ImageShape<'a> {
    Url(&'a str),
    /// `ImageObject` or any other object exposing `url`.
    Wrapped(&'a Map<String, Value>),
    List(&'a [Value]),
    Other,
}

impl<'a> From<&'a Value> for ImageShape<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::String(s) => ImageShape::Url(s),
            Value::Object(obj) => ImageShape::Wrapped(obj),
            Value::Array(items) => ImageShape::List(items),
            Value::Null | Value::Bool(_) | Value::Number(_) => ImageShape::Other,
        }
    }
}

/// Resolve `image` to a single URL. Arrays resolve to their first element.
#[must_use]
pub fn parse_image(value: Option<&Value>) -> Option<String> {
    match ImageShape::from(value?) {
        ImageShape::List(items) => image_from_single(ImageShape::from(items.first()?)),
        single => image_from_single(single),
    }
}

fn image_from_single(shape: ImageShape<'_>) -> Option<String> {
    match shape {
        ImageShape::Url(url) => Some(url).filter(|u| !u.is_empty()).map(str::to_owned),
        ImageShape::Wrapped(obj) => present_str(obj, "url").map(str::to_owned),
        ImageShape::List(_) | ImageShape::Other => None,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
