//! Finds the Schema.org `Recipe` node inside one parsed JSON-LD document.

use serde_json::Value;

const RECIPE_TYPE: &str = "Recipe";
const GRAPH_KEY: &str = "@graph";

/// Returns `true` when `@type` is `"Recipe"` or an array containing `"Recipe"`.
///
/// The comparison is exact and case-sensitive. A node with no `@type` never matches.
#[must_use]
pub fn is_recipe(node: &Value) -> bool {
    match node.get("@type") {
        Some(Value::String(s)) => s == RECIPE_TYPE,
        Some(Value::Array(types)) => types.iter().any(|t| t == RECIPE_TYPE),
        _ => false,
    }
}

/// Locate the Recipe node in `document`.
///
/// Precedence, first match wins:
/// 1. a top-level array is searched element by element;
/// 2. otherwise the document itself is tested;
/// 3. otherwise an `@graph` array on the document is searched.
///
/// Nested structures beyond these three shapes are not searched.
#[must_use]
pub fn find_recipe(document: &Value) -> Option<&Value> {
    if let Value::Array(items) = document {
        return items.iter().find(|item| is_recipe(item));
    }

    if is_recipe(document) {
        return Some(document);
    }

    document
        .get(GRAPH_KEY)
        .and_then(Value::as_array)
        .and_then(|graph| graph.iter().find(|item| is_recipe(item)))
}
