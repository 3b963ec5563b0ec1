// Application Layer - Use Cases and Business Logic

pub mod config;
pub mod expiry;
pub mod pagination;
pub mod unarchive;

// Re-exports
pub use config::ServiceConfig;
pub use expiry::ExpiryScheduler;
pub use pagination::{PageInfo, PageLinks, PaginatedResponse};
pub use unarchive::UnarchiveService;
