use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::error::ErrorKind;
use crate::fetch::FetchedPage;

/// Serves one canned response and counts how often it was asked.
struct StaticFetcher {
    response: Canned,
    calls: AtomicUsize,
}

enum Canned {
    Page { status: u16, body: String },
    Refused,
}

impl StaticFetcher {
    fn page(status: u16, body: &str) -> Self {
        Self {
            response: Canned::Page {
                status,
                body: body.to_owned(),
            },
            calls: AtomicUsize::new(0),
        }
    }

    fn refused() -> Self {
        Self {
            response: Canned::Refused,
            calls: AtomicUsize::new(0),
        }
    }
}

impl PageFetcher for StaticFetcher {
    type Error = std::io::Error;

    async fn fetch(&self, _url: &str) -> Result<FetchedPage, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Canned::Page { status, body } => Ok(FetchedPage {
                status: *status,
                body: body.clone(),
            }),
            Canned::Refused => Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )),
        }
    }
}

const URL: &str = "https://example.com/recipes/sugar-cookies";

fn page_with_blocks(blocks: &[&str]) -> String {
    let scripts: String = blocks
        .iter()
        .map(|b| format!("<script type=\"application/ld+json\">{b}</script>\n"))
        .collect();
    format!("<!DOCTYPE html><html><head>{scripts}</head><body><h1>Cookies</h1></body></html>")
}

const FULL_RECIPE: &str = r#"{
    "@context": "https://schema.org",
    "@type": "Recipe",
    "name": "Christmas Sugar Cookies",
    "description": "Soft cut-out sugar cookies.",
    "image": ["https://example.com/cookies-1x1.jpg", "https://example.com/cookies-4x3.jpg"],
    "prepTime": "PT2H",
    "cookTime": "PT12M",
    "recipeYield": ["24", "24 cookies"],
    "recipeIngredient": ["3/4 cup butter", "", "2 1/4 cups flour"],
    "recipeInstructions": [
        {"@type": "HowToSection", "name": "Dough", "itemListElement": [
            {"@type": "HowToStep", "text": "Cream butter and sugar."},
            {"@type": "HowToStep", "text": "Chill the dough."}
        ]},
        {"@type": "HowToStep", "text": "Bake at 350F."}
    ]
}"#;

// -----------------------------------------------------------------------
// extract_recipe_from_html
// -----------------------------------------------------------------------

#[test]
fn builds_full_canonical_recipe() {
    let html = page_with_blocks(&[FULL_RECIPE]);
    let recipe = extract_recipe_from_html(&html, URL).unwrap();

    assert_eq!(recipe.title, "Christmas Sugar Cookies");
    assert_eq!(recipe.description, "Soft cut-out sugar cookies.");
    assert_eq!(recipe.source_url, URL);
    assert_eq!(
        recipe.image_url.as_deref(),
        Some("https://example.com/cookies-1x1.jpg")
    );
    assert_eq!(recipe.prep_time, Some(120));
    assert_eq!(recipe.cook_time, Some(12));
    assert_eq!(recipe.servings, Some(24));
    assert_eq!(recipe.ingredients, vec!["3/4 cup butter", "2 1/4 cups flour"]);
    assert_eq!(
        recipe.instructions,
        vec![
            "**Dough**",
            "Cream butter and sugar.",
            "Chill the dough.",
            "Bake at 350F."
        ]
    );
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let html = page_with_blocks(&[r#"{"@type": "Recipe"}"#]);
    let recipe = extract_recipe_from_html(&html, URL).unwrap();

    assert_eq!(recipe.title, UNTITLED_RECIPE);
    assert_eq!(recipe.description, "");
    assert_eq!(recipe.source_url, URL);
    assert!(recipe.image_url.is_none());
    assert!(recipe.prep_time.is_none());
    assert!(recipe.cook_time.is_none());
    assert!(recipe.servings.is_none());
    assert!(recipe.ingredients.is_empty());
    assert!(recipe.instructions.is_empty());
}

#[test]
fn source_url_is_kept_verbatim() {
    let url = "https://Example.com/recipe?utm_source=x#jump";
    let html = page_with_blocks(&[r#"{"@type": "Recipe", "name": "Pie"}"#]);
    assert_eq!(extract_recipe_from_html(&html, url).unwrap().source_url, url);
}

#[test]
fn skips_invalid_block_and_uses_later_recipe() {
    let html = page_with_blocks(&[
        r#"{"@type": "Recipe", "name": "Broken" "#,
        r#"{"@type": "Recipe", "name": "Valid"}"#,
    ]);
    let recipe = extract_recipe_from_html(&html, URL).unwrap();
    assert_eq!(recipe.title, "Valid");
}

#[test]
fn first_matching_block_wins() {
    let html = page_with_blocks(&[
        r#"{"@type": "WebSite", "name": "Site"}"#,
        r#"{"@graph": [{"@type": "Recipe", "name": "First"}]}"#,
        r#"{"@type": "Recipe", "name": "Second"}"#,
    ]);
    assert_eq!(extract_recipe_from_html(&html, URL).unwrap().title, "First");
}

#[test]
fn page_without_jsonld_is_no_structured_data() {
    let html = "<html><head><script>var x = 1;</script></head><body>Pie</body></html>";
    let err = extract_recipe_from_html(html, URL).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoStructuredData);
}

#[test]
fn jsonld_without_recipe_is_recipe_not_found() {
    let html = page_with_blocks(&[
        r#"{"@type": "Organization", "name": "Org"}"#,
        r#"[{"@type": "BreadcrumbList"}]"#,
    ]);
    let err = extract_recipe_from_html(&html, URL).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RecipeNotFound);
    assert!(err.to_string().starts_with("extraction failed: "), "got: {err}");
}

#[test]
fn only_invalid_blocks_is_recipe_not_found() {
    let html = page_with_blocks(&["{not json", ""]);
    let err = extract_recipe_from_html(&html, URL).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RecipeNotFound);
}

#[test]
fn repeated_extraction_is_byte_identical() {
    let html = page_with_blocks(&[FULL_RECIPE]);
    let first = serde_json::to_string(&extract_recipe_from_html(&html, URL).unwrap()).unwrap();
    let second = serde_json::to_string(&extract_recipe_from_html(&html, URL).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn raw_newlines_inside_strings_are_tolerated() {
    let html = page_with_blocks(&[
        "{\"@type\": \"Recipe\", \"name\": \"Pie\", \"recipeInstructions\": \"Mix\nBake\"}",
    ]);
    let recipe = extract_recipe_from_html(&html, URL).unwrap();
    assert_eq!(recipe.instructions, vec!["Mix", "Bake"]);
}

#[test]
fn repaired_block_takes_precedence_over_later_recipe() {
    // The first block only parses after raw newlines are escaped; it still
    // counts as the first Recipe in document order.
    let html = page_with_blocks(&[
        "{\"@type\": \"Recipe\", \"name\": \"Raw\nNewline\"}",
        r#"{"@type": "Recipe", "name": "Valid"}"#,
    ]);
    let recipe = extract_recipe_from_html(&html, URL).unwrap();
    assert_eq!(recipe.title, "Raw\nNewline");
}

#[test]
fn block_still_invalid_after_repair_yields_to_later_recipe() {
    let html = page_with_blocks(&[
        "{\"@type\": \"Recipe\", \"name\": \"Raw\nNewline\",}",
        r#"{"@type": "Recipe", "name": "Valid"}"#,
    ]);
    assert_eq!(extract_recipe_from_html(&html, URL).unwrap().title, "Valid");
}

// -----------------------------------------------------------------------
// inspect_blocks
// -----------------------------------------------------------------------

#[test]
fn inspect_blocks_reports_every_block() {
    let html = page_with_blocks(&[
        "{oops",
        r#"{"@type": "WebSite"}"#,
        r#"{"@type": "Recipe", "name": "Pie"}"#,
        r#"{"@type": "Recipe"}"#,
    ]);
    let reports = inspect_blocks(&html);

    assert_eq!(reports.len(), 4);
    assert!(matches!(reports[0].status, BlockStatus::Invalid { .. }));
    assert_eq!(reports[1].status, BlockStatus::NoRecipe);
    assert_eq!(
        reports[2].status,
        BlockStatus::Recipe {
            name: Some("Pie".to_owned())
        }
    );
    assert_eq!(reports[3].status, BlockStatus::Recipe { name: None });
    assert_eq!(reports[0].len, "{oops".len());
}

// -----------------------------------------------------------------------
// RecipeExtractor::extract
// -----------------------------------------------------------------------

#[tokio::test]
async fn extract_fetches_once_and_builds_recipe() {
    let body = page_with_blocks(&[FULL_RECIPE]);
    let extractor = RecipeExtractor::new(StaticFetcher::page(200, &body));

    let recipe = extractor.extract(URL).await.unwrap();
    assert_eq!(recipe.title, "Christmas Sugar Cookies");
    assert_eq!(extractor.fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn extract_maps_404_to_not_found() {
    let extractor = RecipeExtractor::new(StaticFetcher::page(404, ""));
    let err = extractor.extract(URL).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(
        err.to_string(),
        "extraction failed: recipe page not found, please check the URL"
    );
}

#[tokio::test]
async fn extract_maps_403_to_blocked() {
    let extractor = RecipeExtractor::new(StaticFetcher::page(403, ""));
    let err = extractor.extract(URL).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Blocked);
    assert!(err.to_string().contains("manually"), "got: {err}");
}

#[tokio::test]
async fn extract_maps_other_status_to_fetch_failed_with_code() {
    let extractor = RecipeExtractor::new(StaticFetcher::page(500, ""));
    let err = extractor.extract(URL).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FetchFailed);
    assert_eq!(err.reason().status(), Some(500));
    assert!(err.to_string().contains("HTTP 500"), "got: {err}");
}

#[tokio::test]
async fn extract_maps_transport_failure_to_fetch_failed() {
    let extractor = RecipeExtractor::new(StaticFetcher::refused());
    let err = extractor.extract(URL).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FetchFailed);
    assert!(
        matches!(err.reason(), ExtractError::Transport { .. }),
        "expected Transport, got: {err:?}"
    );
    let cause = std::error::Error::source(&err).expect("transport cause");
    assert_eq!(cause.to_string(), "connection refused");
}

#[tokio::test]
async fn extract_rejects_relative_url_without_fetching() {
    let extractor = RecipeExtractor::new(StaticFetcher::page(200, ""));
    let err = extractor.extract("/recipes/pie").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidUrl);
    assert_eq!(extractor.fetcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn extract_rejects_non_http_scheme() {
    let extractor = RecipeExtractor::new(StaticFetcher::page(200, ""));
    let err = extractor.extract("file:///etc/passwd").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidUrl);
}

#[tokio::test]
async fn extract_success_body_without_jsonld_is_no_structured_data() {
    let extractor = RecipeExtractor::new(StaticFetcher::page(200, "<html><body>hi</body></html>"));
    let err = extractor.extract(URL).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoStructuredData);
}
