/// catalog-migrate - Game Content Catalog Migration
///
/// Core library providing the schema migration engine for JSON content
/// catalogs (enemies, items, materials) plus the batch driver that walks
/// a data tree and rewrites catalog documents.

pub mod batch;
pub mod engine;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
