pub mod client;
pub mod paginator;
pub mod retry;

// Re-export the main types for easy importing
pub use client::{PlacesApi, PlacesClient};
pub use paginator::SearchPaginator;
pub use retry::retry_request;
