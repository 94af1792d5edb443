//! Workspace entities: businesses, projects and project children.
//!
//! # Responsibility
//! - Define the canonical records persisted per user.
//! - Keep optional fields optional on the wire so older data still loads.
//!
//! # Invariants
//! - `id` is never changed after creation.
//! - `Note::created_at` is assigned once and never updated.
//! - Collections keep insertion order; display order depends on it.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque entity identifier. Unique within its parent collection.
pub type EntityId = String;

/// Anything addressable by id inside a collection.
pub trait Entity {
    fn id(&self) -> &str;
}

/// Project lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    Active,
    #[serde(rename = "On Hold")]
    OnHold,
    Completed,
    Cancelled,
    /// Default for new projects.
    Planning,
}

impl ProjectStatus {
    /// All statuses in display order.
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::Active,
        ProjectStatus::OnHold,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
        ProjectStatus::Planning,
    ];

    /// Wire/display label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::OnHold => "On Hold",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Planning => "Planning",
        }
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Planning
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset category.
///
/// The set is open: labels outside the known list are kept verbatim in
/// `Custom` so stored data round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetType {
    Document,
    Image,
    Link,
    CodeSnippet,
    Video,
    Audio,
    Archive,
    Other,
    Custom(String),
}

impl AssetType {
    /// Known asset types in picker order.
    pub fn known() -> [AssetType; 8] {
        [
            AssetType::Document,
            AssetType::Image,
            AssetType::Link,
            AssetType::CodeSnippet,
            AssetType::Video,
            AssetType::Audio,
            AssetType::Archive,
            AssetType::Other,
        ]
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Document => "Document",
            Self::Image => "Image",
            Self::Link => "Link",
            Self::CodeSnippet => "Code Snippet",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Archive => "Archive",
            Self::Other => "Other",
            Self::Custom(label) => label.as_str(),
        }
    }
}

impl Default for AssetType {
    fn default() -> Self {
        Self::Document
    }
}

impl From<String> for AssetType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Document" => Self::Document,
            "Image" => Self::Image,
            "Link" => Self::Link,
            "Code Snippet" => Self::CodeSnippet,
            "Video" => Self::Video,
            "Audio" => Self::Audio,
            "Archive" => Self::Archive,
            "Other" => Self::Other,
            _ => Self::Custom(value),
        }
    }
}

impl From<&str> for AssetType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<AssetType> for String {
    fn from(value: AssetType) -> Self {
        match value {
            AssetType::Custom(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for AssetType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level grouping owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Unit of work inside a business. Owns four child collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    /// ISO date (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: EntityId,
    pub name: String,
    /// Serialized as `type` to match the stored schema.
    #[serde(rename = "type", default)]
    pub kind: AssetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Inline body for snippets and short text assets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// RFC 3339 UTC timestamp set at creation.
    #[serde(default)]
    pub created_at: String,
}

impl Business {
    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == project_id)
    }
}

impl Project {
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn contact(&self, contact_id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id == contact_id)
    }

    pub fn asset(&self, asset_id: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.id == asset_id)
    }

    pub fn note(&self, note_id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == note_id)
    }
}

macro_rules! impl_entity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> &str {
                    self.id.as_str()
                }
            }
        )+
    };
}

impl_entity!(Business, Project, Task, Contact, Asset, Note);

#[cfg(test)]
mod tests {
    use super::{AssetType, ProjectStatus};

    #[test]
    fn project_status_uses_display_labels_on_the_wire() {
        let json = serde_json::to_string(&ProjectStatus::OnHold).unwrap();
        assert_eq!(json, "\"On Hold\"");
        let decoded: ProjectStatus = serde_json::from_str("\"Planning\"").unwrap();
        assert_eq!(decoded, ProjectStatus::Planning);
        assert!(serde_json::from_str::<ProjectStatus>("\"Paused\"").is_err());
    }

    #[test]
    fn asset_type_keeps_unknown_labels() {
        let decoded: AssetType = serde_json::from_str("\"Spreadsheet\"").unwrap();
        assert_eq!(decoded, AssetType::Custom("Spreadsheet".to_string()));
        assert_eq!(serde_json::to_string(&decoded).unwrap(), "\"Spreadsheet\"");

        let snippet: AssetType = serde_json::from_str("\"Code Snippet\"").unwrap();
        assert_eq!(snippet, AssetType::CodeSnippet);
    }
}
