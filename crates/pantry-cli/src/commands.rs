//! Command handlers for the CLI.
//!
//! Recipes go to stdout as pretty-printed JSON; logs go to stderr so the
//! output can be piped.

use std::path::Path;

use pantry_core::{AppConfig, CanonicalRecipe};
use pantry_scraper::{BlockReport, BlockStatus, RecipeExtractor};

/// Fetch `url`, extract its recipe and print it.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or extraction fails.
pub(crate) async fn run_extract(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let extractor = RecipeExtractor::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

    tracing::info!(url, "extracting recipe");
    let recipe = extractor.extract(url).await?;
    tracing::info!(url, title = %recipe.title, "recipe extracted");
    print_recipe(&recipe)
}

/// Extract a recipe from a saved page. `url` is recorded as the source only.
///
/// # Errors
///
/// Returns an error if the file cannot be read or extraction fails.
pub(crate) fn run_parse(file: &Path, url: &str) -> anyhow::Result<()> {
    let html = read_page(file)?;
    let recipe = pantry_scraper::extract_recipe_from_html(&html, url)?;
    print_recipe(&recipe)
}

/// Print one line per JSON-LD block in a saved page.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub(crate) fn run_blocks(file: &Path) -> anyhow::Result<()> {
    let html = read_page(file)?;
    let reports = pantry_scraper::inspect_blocks(&html);

    if reports.is_empty() {
        println!("no JSON-LD blocks found");
        return Ok(());
    }

    for report in &reports {
        println!("{}", describe_block(report));
    }
    Ok(())
}

pub(crate) fn read_page(file: &Path) -> anyhow::Result<String> {
    let html = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", file.display()))?;
    tracing::debug!(file = %file.display(), bytes = html.len(), "read saved page");
    Ok(html)
}

fn print_recipe(recipe: &CanonicalRecipe) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(recipe)?);
    Ok(())
}

pub(crate) fn describe_block(report: &BlockReport) -> String {
    let outcome = match &report.status {
        BlockStatus::Invalid { error } => format!("invalid JSON ({error})"),
        BlockStatus::NoRecipe => "no Recipe".to_owned(),
        BlockStatus::Recipe { name: Some(name) } => format!("Recipe \"{name}\""),
        BlockStatus::Recipe { name: None } => "Recipe (untitled)".to_owned(),
    };
    format!("block {} ({} bytes): {outcome}", report.index, report.len)
}
