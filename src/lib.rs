pub mod allocation;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod fetcher;   // Paginated holder enumeration
pub mod metrics;
pub mod monitoring; // Retry policy
pub mod output;
pub mod types;
pub mod utils;
pub mod winners;
