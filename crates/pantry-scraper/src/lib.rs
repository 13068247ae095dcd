//! Recipe extraction from Schema.org JSON-LD embedded in recipe pages.
//!
//! The pipeline fetches a page, scans it for `application/ld+json` blocks,
//! locates the first `Recipe` node and normalizes it into a
//! [`pantry_core::CanonicalRecipe`].

pub mod error;
pub mod extract;
pub mod fetch;
pub mod jsonld;
pub mod locator;
pub mod normalize;

pub use error::{BoxError, ErrorKind, ExtractError, ExtractionError};
pub use extract::{
    build_recipe, extract_recipe_from_html, inspect_blocks, BlockReport, BlockStatus,
    RecipeExtractor,
};
pub use fetch::{FetchedPage, HttpFetcher, PageFetcher};
pub use jsonld::{parse_block, scan_jsonld_blocks, JsonLdBlocks};
pub use locator::{find_recipe, is_recipe};
pub use normalize::{
    parse_duration_minutes, parse_image, parse_ingredients, parse_instructions, parse_servings,
};
