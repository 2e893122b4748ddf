pub mod access;
pub mod auth;
pub mod client;
pub mod project;
pub mod shotlist;
pub mod shotlist_item;
