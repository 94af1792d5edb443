//! Identifier generation for new entities and users.

use crate::model::entity::EntityId;
use std::cell::Cell;
use uuid::Uuid;

/// Source of fresh entity ids.
///
/// Implementations must never return the same value twice within one
/// process lifetime.
pub trait IdGenerator {
    fn next_id(&self) -> EntityId;
}

/// Random UUID v4 ids. Default for production hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> EntityId {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `{prefix}-{n}` ids, starting at 1.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> EntityId {
        let value = self.next.get();
        self.next.set(value + 1);
        format!("{}-{value}", self.prefix)
    }
}

impl<T: IdGenerator + ?Sized> IdGenerator for Box<T> {
    fn next_id(&self) -> EntityId {
        (**self).next_id()
    }
}
