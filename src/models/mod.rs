pub mod comparison;
pub mod loaders;
pub mod outcome;
pub mod publication;
pub mod reference;
pub mod strategy;

pub use comparison::{ArtifactInfo, ComparisonRecord};
pub use loaders::{list_files, load_catalog, parse_catalog, plan_downloads, plan_extractions};
pub use outcome::{BatchCounts, BatchReport, ItemResult, ProcessingResult, SkipReason, Stage};
pub use publication::Publication;
pub use reference::{DocumentItem, DownloadItem, ExtractionItem, Reference};
pub use strategy::{ExtractStrategy, StrategySet};
