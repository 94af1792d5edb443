//! Core application state for Macrum.
//! This crate is the single source of truth for workspace invariants.

pub mod config;
pub mod db;
pub mod id;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod query;
pub mod repo;
pub mod store;

pub use config::CoreConfig;
pub use id::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::entity::{
    Asset, AssetType, Business, Contact, Entity, EntityId, Note, Project, ProjectStatus, Task,
};
pub use model::payload::{
    AssetPatch, BusinessPatch, ContactPatch, NewAsset, NewBusiness, NewContact, NewNote,
    NewProject, NewTask, NotePatch, ProjectPatch, TaskPatch,
};
pub use model::user::{User, UserId};
pub use persistence::{Persistence, PersistenceError, PersistenceResult};
pub use query::{
    compute_dashboard_stats, compute_dashboard_stats_on, filter_tasks, flatten_tasks,
    query_tasks, sort_tasks, DashboardStats, FormattedTask, TaskFilter, TaskSort,
    TaskStatusFilter,
};
pub use repo::kv_repo::{KeyValueStore, KvError, KvResult, SqliteKvStore};
pub use store::app::{App, WorkspaceEdit};
pub use store::auth_store::{AuthError, AuthStore};
pub use store::selection::{NavigationError, ResolvedSelection, SelectionState, ViewMode};
pub use store::workspace_store::WorkspaceStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
