//! Stateful stores and the session that composes them.

pub mod app;
pub mod auth_store;
pub mod selection;
pub mod tree;
pub mod workspace_store;
