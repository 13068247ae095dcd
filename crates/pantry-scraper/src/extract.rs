//! The extraction pipeline: fetch, scan, parse, locate, normalize.

use pantry_core::{AppConfig, CanonicalRecipe, UNTITLED_RECIPE};
use serde_json::Value;

use crate::error::{ExtractError, ExtractionError};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::jsonld::{parse_block, scan_jsonld_blocks};
use crate::locator::find_recipe;
use crate::normalize::{
    parse_duration_minutes, parse_image, parse_ingredients, parse_instructions, parse_servings,
};

/// Extracts [`CanonicalRecipe`]s from recipe page URLs.
///
/// Holds no per-call state, so one extractor can serve concurrent requests
/// for different URLs (share it behind an `Arc` when the fetcher is not `Clone`).
#[derive(Debug, Clone)]
pub struct RecipeExtractor<F = HttpFetcher> {
    fetcher: F,
}

impl RecipeExtractor<HttpFetcher> {
    /// Builds an extractor over an [`HttpFetcher`] configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(HttpFetcher::from_config(config)?))
    }
}

impl<F: PageFetcher> RecipeExtractor<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Fetch `url` and extract the first Recipe found in its JSON-LD.
    ///
    /// Issues exactly one fetch. Dropping the returned future abandons the
    /// in-flight request.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractionError`] whose [`kind`](ExtractionError::kind) is:
    /// - `InvalidUrl`: `url` is not an absolute `http`/`https` URL (nothing is fetched).
    /// - `NotFound` / `Blocked`: the page answered 404 / 403.
    /// - `FetchFailed`: any other non-success status, or a transport failure.
    /// - `NoStructuredData`: the page has no JSON-LD blocks.
    /// - `RecipeNotFound`: JSON-LD is present but no block holds a Recipe.
    pub async fn extract(&self, url: &str) -> Result<CanonicalRecipe, ExtractionError> {
        let html = self.fetch_page(url).await?;
        locate_and_build(&html, url).map_err(ExtractionError::from)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ExtractError> {
        validate_url(url)?;

        let page = self.fetcher.fetch(url).await.map_err(|e| {
            tracing::warn!(url, error = %e, "recipe page fetch failed");
            ExtractError::Transport {
                url: url.to_owned(),
                source: Box::new(e),
            }
        })?;

        classify_status(url, page.status)?;
        Ok(page.body)
    }
}

/// Run scan, parse, locate and normalize over HTML that is already in hand.
///
/// `source_url` is recorded verbatim on the result and is not fetched.
///
/// # Errors
///
/// Returns an [`ExtractionError`] of kind `NoStructuredData` or `RecipeNotFound`.
pub fn extract_recipe_from_html(
    html: &str,
    source_url: &str,
) -> Result<CanonicalRecipe, ExtractionError> {
    locate_and_build(html, source_url).map_err(ExtractionError::from)
}

fn locate_and_build(html: &str, source_url: &str) -> Result<CanonicalRecipe, ExtractError> {
    let mut blocks_seen = 0usize;

    for (index, block) in scan_jsonld_blocks(html).enumerate() {
        blocks_seen = index + 1;

        let document = match parse_block(block) {
            Ok(document) => document,
            Err(e) => {
                tracing::debug!(
                    url = source_url,
                    block = index,
                    error = %e,
                    "skipping invalid JSON-LD block"
                );
                continue;
            }
        };

        if let Some(recipe) = find_recipe(&document) {
            tracing::info!(url = source_url, block = index, "found Recipe in JSON-LD");
            return Ok(build_recipe(recipe, source_url));
        }
    }

    if blocks_seen == 0 {
        return Err(ExtractError::NoStructuredData);
    }

    tracing::debug!(
        url = source_url,
        blocks = blocks_seen,
        "no Recipe node in any JSON-LD block"
    );
    Err(ExtractError::RecipeNotFound)
}

/// Assemble a [`CanonicalRecipe`] from a located Recipe node.
#[must_use]
pub fn build_recipe(recipe: &Value, source_url: &str) -> CanonicalRecipe {
    CanonicalRecipe {
        title: text_field(recipe, "name").unwrap_or_else(|| UNTITLED_RECIPE.to_owned()),
        description: text_field(recipe, "description").unwrap_or_default(),
        source_url: source_url.to_owned(),
        image_url: parse_image(recipe.get("image")),
        prep_time: parse_duration_minutes(recipe.get("prepTime")),
        cook_time: parse_duration_minutes(recipe.get("cookTime")),
        servings: parse_servings(recipe.get("recipeYield")),
        ingredients: parse_ingredients(recipe.get("recipeIngredient")),
        instructions: parse_instructions(recipe.get("recipeInstructions")),
    }
}

fn text_field(node: &Value, key: &str) -> Option<String> {
    node.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn validate_url(url: &str) -> Result<(), ExtractError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| ExtractError::InvalidUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ExtractError::InvalidUrl {
            url: url.to_owned(),
            reason: format!("unsupported scheme \"{other}\""),
        }),
    }
}

fn classify_status(url: &str, status: u16) -> Result<(), ExtractError> {
    let err = match status {
        200..=299 => return Ok(()),
        404 => ExtractError::NotFound {
            url: url.to_owned(),
        },
        403 => ExtractError::Blocked {
            url: url.to_owned(),
        },
        _ => ExtractError::UnexpectedStatus {
            status,
            url: url.to_owned(),
        },
    };
    tracing::warn!(url, status, "recipe page returned non-success status");
    Err(err)
}

/// Outcome of one JSON-LD block, as reported by [`inspect_blocks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockStatus {
    Invalid { error: String },
    NoRecipe,
    Recipe { name: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockReport {
    pub index: usize,
    /// Byte length of the block's raw content.
    pub len: usize,
    pub status: BlockStatus,
}

/// Report what the scanner and locator make of every JSON-LD block on a page.
///
/// Unlike extraction this does not stop at the first Recipe.
#[must_use]
pub fn inspect_blocks(html: &str) -> Vec<BlockReport> {
    scan_jsonld_blocks(html)
        .enumerate()
        .map(|(index, block)| {
            let status = match parse_block(block) {
                Err(e) => BlockStatus::Invalid {
                    error: e.to_string(),
                },
                Ok(document) => match find_recipe(&document) {
                    Some(recipe) => BlockStatus::Recipe {
                        name: text_field(recipe, "name"),
                    },
                    None => BlockStatus::NoRecipe,
                },
            };
            BlockReport {
                index,
                len: block.len(),
                status,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
