pub mod dates;
pub mod fields;
pub mod filters;
pub mod operators;
pub mod projector;
pub mod query;
pub mod results;
pub mod sort;

pub use query::{CompiledQuery, SearchRequest};
pub use results::{ImageSearchErrorResponse, ImageSearchResponseDebug, ImageSearchResults};
