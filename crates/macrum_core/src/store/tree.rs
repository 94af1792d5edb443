//! Path-addressed in-place updates over the workspace tree.
//!
//! # Responsibility
//! - Resolve a path (business id, project id, child id) to a mutable node.
//! - Give every project child collection one uniform access point.
//!
//! # Invariants
//! - A lookup that misses at any level touches nothing.
//! - Removal keeps the relative order of the remaining siblings.

use crate::model::entity::{Asset, Business, Contact, Entity, Note, Project, Task};

/// Address of a node in the tree, from the root down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePath<'a> {
    Business(&'a str),
    Project {
        business_id: &'a str,
        project_id: &'a str,
    },
}

/// A collection of entities owned by a project.
pub trait ProjectChild: Entity + Sized {
    fn items(project: &Project) -> &[Self];
    fn items_mut(project: &mut Project) -> &mut Vec<Self>;
}

impl ProjectChild for Task {
    fn items(project: &Project) -> &[Self] {
        &project.tasks
    }

    fn items_mut(project: &mut Project) -> &mut Vec<Self> {
        &mut project.tasks
    }
}

impl ProjectChild for Contact {
    fn items(project: &Project) -> &[Self] {
        &project.contacts
    }

    fn items_mut(project: &mut Project) -> &mut Vec<Self> {
        &mut project.contacts
    }
}

impl ProjectChild for Asset {
    fn items(project: &Project) -> &[Self] {
        &project.assets
    }

    fn items_mut(project: &mut Project) -> &mut Vec<Self> {
        &mut project.assets
    }
}

impl ProjectChild for Note {
    fn items(project: &Project) -> &[Self] {
        &project.notes
    }

    fn items_mut(project: &mut Project) -> &mut Vec<Self> {
        &mut project.notes
    }
}

/// Finds one entity by id.
pub fn find<'a, T: Entity>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

/// Finds one entity by id for mutation.
pub fn find_mut<'a, T: Entity>(items: &'a mut [T], id: &str) -> Option<&'a mut T> {
    items.iter_mut().find(|item| item.id() == id)
}

/// Removes one entity by id, returning it.
pub fn remove<T: Entity>(items: &mut Vec<T>, id: &str) -> Option<T> {
    let index = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(index))
}

/// Resolves `path` to the project it addresses.
///
/// Returns `None` for a business path or when any level is missing.
pub fn project_mut<'a>(businesses: &'a mut [Business], path: NodePath<'_>) -> Option<&'a mut Project> {
    match path {
        NodePath::Business(_) => None,
        NodePath::Project {
            business_id,
            project_id,
        } => {
            let business = find_mut(businesses, business_id)?;
            find_mut(&mut business.projects, project_id)
        }
    }
}

/// Runs `update` on the node at `path` when the whole path exists.
pub fn update_at<R>(
    businesses: &mut [Business],
    path: NodePath<'_>,
    update: impl FnOnce(NodeMut<'_>) -> Option<R>,
) -> Option<R> {
    match path {
        NodePath::Business(business_id) => {
            find_mut(businesses, business_id).and_then(|business| update(NodeMut::Business(business)))
        }
        NodePath::Project { .. } => {
            project_mut(businesses, path).and_then(|project| update(NodeMut::Project(project)))
        }
    }
}

/// Mutable view of a resolved node.
pub enum NodeMut<'a> {
    Business(&'a mut Business),
    Project(&'a mut Project),
}

impl<'a> NodeMut<'a> {
    pub fn into_business(self) -> Option<&'a mut Business> {
        match self {
            Self::Business(business) => Some(business),
            Self::Project(_) => None,
        }
    }

    pub fn into_project(self) -> Option<&'a mut Project> {
        match self {
            Self::Project(project) => Some(project),
            Self::Business(_) => None,
        }
    }
}

/// Applies `update` to the child `child_id` of the project at `path`.
pub fn update_child<C: ProjectChild, R>(
    businesses: &mut [Business],
    path: NodePath<'_>,
    child_id: &str,
    update: impl FnOnce(&mut C) -> R,
) -> Option<R> {
    update_at(businesses, path, |node| {
        let project = node.into_project()?;
        find_mut(C::items_mut(project), child_id).map(update)
    })
}
