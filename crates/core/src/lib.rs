//! Domain logic for the Call Sheet backend.
//!
//! This crate has no database or HTTP dependencies so the same rules can be
//! exercised from repositories, handlers and unit tests alike.

pub mod error;
pub mod pagination;
pub mod reference_image;
pub mod shotlist_schedule;
pub mod types;
pub mod validation;
