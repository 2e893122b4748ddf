//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod client_repo;
pub mod project_repo;
pub mod session_repo;
pub mod shotlist_item_repo;
pub mod shotlist_repo;
pub mod user_repo;

pub use client_repo::ClientRepo;
pub use project_repo::ProjectRepo;
pub use session_repo::SessionRepo;
pub use shotlist_item_repo::{ReorderOutcome, ShotlistItemRepo};
pub use shotlist_repo::ShotlistRepo;
pub use user_repo::UserRepo;
