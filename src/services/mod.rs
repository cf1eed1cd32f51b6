pub mod catalog_writer;
pub mod download_service;
pub mod extraction;
pub mod failure_writer;
pub mod llm_service;
pub mod prompt;
pub mod search_service;

pub use catalog_writer::CatalogWriter;
pub use download_service::DownloadService;
pub use extraction::{NougatExtractor, StructuralExtractor, TextExtractor};
pub use failure_writer::FailureWriter;
pub use llm_service::{GenerationRequest, LlmService, TextGenerator};
pub use prompt::SummaryPrompt;
pub use search_service::{LiteratureSearch, SearchService};
