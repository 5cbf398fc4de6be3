pub mod config;
pub mod delivery;
pub mod export;
pub mod filter;
pub mod mapping;
pub mod pipeline;
pub mod sanitize;
pub mod schema;
pub mod types;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::config::{ExportConfig, Overrides};
    pub use crate::delivery::{DeliveryClient, ItemSource, ItemsQuery};
    pub use crate::filter::FilterCriterion;
    pub use crate::mapping::ExportRecord;
    pub use crate::pipeline::{ExportSummary, Exporter, Preview};
    pub use crate::schema::{OutputSchema, SchemaVariant};
    pub use crate::types::ContentItem;
}
