use serde::{Deserialize, Serialize};

/// Title used when the located Recipe node carries no usable `name`.
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// A recipe normalized from Schema.org JSON-LD into a single canonical shape.
///
/// Serialized with camelCase keys so the record can be handed straight to a
/// recipe-creation form or request body. Absent optionals serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecipe {
    pub title: String,
    pub description: String,
    /// The URL the extraction was requested for, verbatim.
    pub source_url: String,
    pub image_url: Option<String>,
    /// Minutes.
    pub prep_time: Option<u32>,
    /// Minutes.
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}
