//! Storage for user records and cached session confirmations

pub mod memory;
pub mod session_cache;
pub mod traits;

// Re-export main components
pub use memory::MemoryUserStore;
pub use session_cache::SessionCache;
pub use traits::{SharedUserStore, UserStore};
