//! Check-in storage for Annie.
//!
//! The engine reads check-ins through the [`CheckInStore`] trait. File-based
//! and in-memory implementations are provided.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileCheckInStore;
pub use memory::MemoryCheckInStore;
pub use traits::CheckInStore;
