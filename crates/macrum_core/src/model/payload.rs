//! Creation payloads and shallow-merge patches.
//!
//! # Responsibility
//! - Describe caller-supplied fields for add/update operations, excluding
//!   generated ones (`id`, child collections, `created_at`).
//! - Apply patches with shallow-merge semantics.
//!
//! # Invariants
//! - A patch field set to `None` leaves the target field untouched.
//! - For optional entity fields the patch uses `Option<Option<T>>`:
//!   `Some(None)` clears, `Some(Some(v))` sets.
//! - No patch can change an entity id or a note creation timestamp.

use super::entity::{
    Asset, AssetType, Business, Contact, EntityId, Note, Project, ProjectStatus, Task,
};

/// Fields for a new business.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBusiness {
    pub name: String,
    pub industry: Option<String>,
    pub description: String,
}

impl NewBusiness {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn into_business(self, id: EntityId) -> Business {
        Business {
            id,
            name: self.name,
            industry: self.industry,
            description: self.description,
            projects: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessPatch {
    pub name: Option<String>,
    pub industry: Option<Option<String>>,
    pub description: Option<String>,
}

/// Fields for a new project. `status` falls back to `Planning`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl NewProject {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn into_project(self, id: EntityId) -> Project {
        Project {
            id,
            name: self.name,
            description: self.description,
            status: self.status.unwrap_or_default(),
            start_date: self.start_date,
            end_date: self.end_date,
            tasks: Vec::new(),
            contacts: Vec::new(),
            assets: Vec::new(),
            notes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<Option<String>>,
    pub end_date: Option<Option<String>>,
}

/// Fields for a new task. Tasks always start incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub due_date: Option<String>,
}

impl NewTask {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn due(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub role: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAsset {
    pub name: String,
    pub kind: AssetType,
    pub description: Option<String>,
    pub link: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetPatch {
    pub name: Option<String>,
    pub kind: Option<AssetType>,
    pub description: Option<Option<String>>,
    pub link: Option<Option<String>>,
    pub content: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
}

/// Note updates are limited to title and content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Shallow merge of a patch into an existing entity.
pub trait Patch<T> {
    fn apply_to(self, target: &mut T);
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl Patch<Business> for BusinessPatch {
    fn apply_to(self, target: &mut Business) {
        merge(&mut target.name, self.name);
        merge(&mut target.industry, self.industry);
        merge(&mut target.description, self.description);
    }
}

impl Patch<Project> for ProjectPatch {
    fn apply_to(self, target: &mut Project) {
        merge(&mut target.name, self.name);
        merge(&mut target.description, self.description);
        merge(&mut target.status, self.status);
        merge(&mut target.start_date, self.start_date);
        merge(&mut target.end_date, self.end_date);
    }
}

impl Patch<Task> for TaskPatch {
    fn apply_to(self, target: &mut Task) {
        merge(&mut target.name, self.name);
        merge(&mut target.description, self.description);
        merge(&mut target.completed, self.completed);
        merge(&mut target.due_date, self.due_date);
    }
}

impl Patch<Contact> for ContactPatch {
    fn apply_to(self, target: &mut Contact) {
        merge(&mut target.name, self.name);
        merge(&mut target.email, self.email);
        merge(&mut target.phone, self.phone);
        merge(&mut target.role, self.role);
    }
}

impl Patch<Asset> for AssetPatch {
    fn apply_to(self, target: &mut Asset) {
        merge(&mut target.name, self.name);
        merge(&mut target.kind, self.kind);
        merge(&mut target.description, self.description);
        merge(&mut target.link, self.link);
        merge(&mut target.content, self.content);
    }
}

impl Patch<Note> for NotePatch {
    fn apply_to(self, target: &mut Note) {
        merge(&mut target.title, self.title);
        merge(&mut target.content, self.content);
    }
}

/// Builds a child entity from its creation payload.
///
/// `created_at` is only consumed by payloads that carry a creation
/// timestamp (notes).
pub trait IntoEntity {
    type Entity;

    fn into_entity(self, id: EntityId, created_at: &str) -> Self::Entity;
}

impl IntoEntity for NewTask {
    type Entity = Task;

    fn into_entity(self, id: EntityId, _created_at: &str) -> Task {
        Task {
            id,
            name: self.name,
            description: self.description,
            completed: false,
            due_date: self.due_date,
        }
    }
}

impl IntoEntity for NewContact {
    type Entity = Contact;

    fn into_entity(self, id: EntityId, _created_at: &str) -> Contact {
        Contact {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            role: self.role,
        }
    }
}

impl IntoEntity for NewAsset {
    type Entity = Asset;

    fn into_entity(self, id: EntityId, _created_at: &str) -> Asset {
        Asset {
            id,
            name: self.name,
            kind: self.kind,
            description: self.description,
            link: self.link,
            content: self.content,
        }
    }
}

impl IntoEntity for NewNote {
    type Entity = Note;

    fn into_entity(self, id: EntityId, created_at: &str) -> Note {
        Note {
            id,
            title: self.title,
            content: self.content,
            created_at: created_at.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BusinessPatch, NewBusiness, Patch, TaskPatch};
    use crate::model::entity::Task;

    #[test]
    fn business_patch_keeps_absent_fields() {
        let mut business = NewBusiness {
            name: "Acme".to_string(),
            industry: Some("Retail".to_string()),
            description: "Shop".to_string(),
        }
        .into_business("b-1".to_string());

        BusinessPatch {
            description: Some("Online shop".to_string()),
            ..BusinessPatch::default()
        }
        .apply_to(&mut business);

        assert_eq!(business.name, "Acme");
        assert_eq!(business.industry.as_deref(), Some("Retail"));
        assert_eq!(business.description, "Online shop");
    }

    #[test]
    fn optional_field_can_be_cleared() {
        let mut task = Task {
            id: "t-1".to_string(),
            name: "Ship".to_string(),
            description: String::new(),
            completed: false,
            due_date: Some("2024-05-01".to_string()),
        };

        TaskPatch {
            due_date: Some(None),
            ..TaskPatch::default()
        }
        .apply_to(&mut task);

        assert_eq!(task.due_date, None);
        assert_eq!(task.id, "t-1");
    }
}
