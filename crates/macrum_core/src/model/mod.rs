//! Domain model for the business/project workspace hierarchy.
//!
//! # Responsibility
//! - Define the persisted shapes of users and the Business→Project tree.
//! - Define creation payloads and shallow-merge patches for every entity.
//!
//! # Invariants
//! - Every entity is identified by an opaque `EntityId` assigned at creation.
//! - Child entities live inside exactly one parent collection.
//! - Wire field names are camelCase and must round-trip exactly.

pub mod entity;
pub mod payload;
pub mod user;
