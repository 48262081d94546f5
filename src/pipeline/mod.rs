pub mod assembler;
pub mod cache;
pub mod dedup;
pub mod detail;
pub mod runner;

// Re-export the main types for easy importing
pub use assembler::ResultAssembler;
pub use cache::TtlCache;
pub use dedup::DedupRegistry;
pub use detail::DetailFetcher;
pub use runner::Pipeline;
