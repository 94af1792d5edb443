//! Workspace store: the current user's Business→Project tree.
//!
//! # Responsibility
//! - Own the in-memory tree of exactly one user at a time.
//! - Apply add/update/delete operations and persist after each change.
//!
//! # Invariants
//! - A missing business/project (or child) makes an operation a no-op:
//!   nothing is created, nothing is saved.
//! - Every applied change is saved before the call returns.
//! - Loading another user's tree first discards the current one.
//! - Updates never change ids or note creation timestamps.

use crate::id::IdGenerator;
use crate::model::entity::{
    Asset, Business, Contact, EntityId, Note, Project, ProjectStatus, Task,
};
use crate::model::payload::{
    AssetPatch, BusinessPatch, ContactPatch, IntoEntity, NewAsset, NewBusiness, NewContact,
    NewNote, NewProject, NewTask, NotePatch, Patch, ProjectPatch, TaskPatch,
};
use crate::model::user::{User, UserId};
use crate::persistence::Persistence;
use crate::repo::kv_repo::KeyValueStore;
use crate::store::tree::{self, NodePath, ProjectChild};
use chrono::{SecondsFormat, Utc};
use log::{debug, error, info};
use std::rc::Rc;

/// Store for the signed-in user's businesses.
pub struct WorkspaceStore<S: KeyValueStore> {
    persistence: Persistence<S>,
    ids: Rc<dyn IdGenerator>,
    owner: Option<UserId>,
    businesses: Vec<Business>,
}

impl<S: KeyValueStore> WorkspaceStore<S> {
    /// Creates an empty store with no owner.
    pub fn new(persistence: Persistence<S>, ids: Rc<dyn IdGenerator>) -> Self {
        Self {
            persistence,
            ids,
            owner: None,
            businesses: Vec::new(),
        }
    }

    /// Replaces the in-memory tree with `user`'s stored tree.
    pub fn load_for(&mut self, user: &User) {
        self.unload();
        self.businesses = self.persistence.load_workspace(&user.id);
        self.owner = Some(user.id.clone());
        info!(
            "event=workspace_load module=store status=ok user_id={} businesses={}",
            user.id,
            self.businesses.len()
        );
    }

    /// Drops the in-memory tree. Stored data is kept for the next login.
    pub fn unload(&mut self) {
        self.businesses = Vec::new();
        self.owner = None;
    }

    /// Id of the user whose tree is loaded.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn businesses(&self) -> &[Business] {
        &self.businesses
    }

    pub fn business(&self, business_id: &str) -> Option<&Business> {
        tree::find(&self.businesses, business_id)
    }

    pub fn project(&self, business_id: &str, project_id: &str) -> Option<&Project> {
        self.business(business_id)?.project(project_id)
    }

    pub fn task(&self, business_id: &str, project_id: &str, task_id: &str) -> Option<&Task> {
        self.child(business_id, project_id, task_id)
    }

    pub fn contact(
        &self,
        business_id: &str,
        project_id: &str,
        contact_id: &str,
    ) -> Option<&Contact> {
        self.child(business_id, project_id, contact_id)
    }

    pub fn asset(&self, business_id: &str, project_id: &str, asset_id: &str) -> Option<&Asset> {
        self.child(business_id, project_id, asset_id)
    }

    pub fn note(&self, business_id: &str, project_id: &str, note_id: &str) -> Option<&Note> {
        self.child(business_id, project_id, note_id)
    }

    /// Whether any business has at least one project.
    pub fn has_any_project(&self) -> bool {
        self.businesses
            .iter()
            .any(|business| !business.projects.is_empty())
    }

    // Businesses

    /// Appends a business. Returns its id, or `None` without an owner.
    pub fn add_business(&mut self, fields: NewBusiness) -> Option<EntityId> {
        let id = self.ids.next_id();
        self.apply("add_business", |businesses| {
            businesses.push(fields.into_business(id.clone()));
            Some(id)
        })
    }

    pub fn update_business(&mut self, business_id: &str, patch: BusinessPatch) {
        self.apply("update_business", |businesses| {
            tree::update_at(businesses, NodePath::Business(business_id), |node| {
                patch.apply_to(node.into_business()?);
                Some(())
            })
        });
    }

    /// Removes a business together with all its projects.
    pub fn delete_business(&mut self, business_id: &str) {
        self.apply("delete_business", |businesses| {
            tree::remove(businesses, business_id).map(|_| ())
        });
    }

    // Projects

    /// Appends a project to a business. Status defaults to `Planning`.
    pub fn add_project(&mut self, business_id: &str, fields: NewProject) -> Option<EntityId> {
        let id = self.ids.next_id();
        self.apply("add_project", |businesses| {
            tree::update_at(businesses, NodePath::Business(business_id), |node| {
                let business = node.into_business()?;
                business.projects.push(fields.into_project(id.clone()));
                Some(id)
            })
        })
    }

    pub fn update_project(&mut self, business_id: &str, project_id: &str, patch: ProjectPatch) {
        self.apply("update_project", |businesses| {
            tree::project_mut(businesses, project_path(business_id, project_id))
                .map(|project| patch.apply_to(project))
        });
    }

    /// Restricted update that only touches `status`.
    pub fn update_project_status(
        &mut self,
        business_id: &str,
        project_id: &str,
        status: ProjectStatus,
    ) {
        self.apply("update_project_status", |businesses| {
            tree::project_mut(businesses, project_path(business_id, project_id))
                .map(|project| project.status = status)
        });
    }

    /// Removes a project together with its tasks, contacts, assets and notes.
    pub fn delete_project(&mut self, business_id: &str, project_id: &str) {
        self.apply("delete_project", |businesses| {
            tree::update_at(businesses, NodePath::Business(business_id), |node| {
                tree::remove(&mut node.into_business()?.projects, project_id).map(|_| ())
            })
        });
    }

    // Tasks

    /// Appends an incomplete task.
    pub fn add_task(
        &mut self,
        business_id: &str,
        project_id: &str,
        fields: NewTask,
    ) -> Option<EntityId> {
        self.add_child("add_task", business_id, project_id, fields)
    }

    /// Flips `completed`. Two calls restore the original value.
    pub fn toggle_task_complete(&mut self, business_id: &str, project_id: &str, task_id: &str) {
        self.apply("toggle_task_complete", |businesses| {
            tree::update_child::<Task, _>(
                businesses,
                project_path(business_id, project_id),
                task_id,
                |task| task.completed = !task.completed,
            )
        });
    }

    pub fn update_task(
        &mut self,
        business_id: &str,
        project_id: &str,
        task_id: &str,
        patch: TaskPatch,
    ) {
        self.update_child::<Task, _>("update_task", business_id, project_id, task_id, patch);
    }

    pub fn delete_task(&mut self, business_id: &str, project_id: &str, task_id: &str) {
        self.delete_child::<Task>("delete_task", business_id, project_id, task_id);
    }

    // Contacts

    pub fn add_contact(
        &mut self,
        business_id: &str,
        project_id: &str,
        fields: NewContact,
    ) -> Option<EntityId> {
        self.add_child("add_contact", business_id, project_id, fields)
    }

    pub fn update_contact(
        &mut self,
        business_id: &str,
        project_id: &str,
        contact_id: &str,
        patch: ContactPatch,
    ) {
        self.update_child::<Contact, _>("update_contact", business_id, project_id, contact_id, patch);
    }

    pub fn delete_contact(&mut self, business_id: &str, project_id: &str, contact_id: &str) {
        self.delete_child::<Contact>("delete_contact", business_id, project_id, contact_id);
    }

    // Assets

    pub fn add_asset(
        &mut self,
        business_id: &str,
        project_id: &str,
        fields: NewAsset,
    ) -> Option<EntityId> {
        self.add_child("add_asset", business_id, project_id, fields)
    }

    pub fn update_asset(
        &mut self,
        business_id: &str,
        project_id: &str,
        asset_id: &str,
        patch: AssetPatch,
    ) {
        self.update_child::<Asset, _>("update_asset", business_id, project_id, asset_id, patch);
    }

    pub fn delete_asset(&mut self, business_id: &str, project_id: &str, asset_id: &str) {
        self.delete_child::<Asset>("delete_asset", business_id, project_id, asset_id);
    }

    // Notes

    /// Appends a note stamped with the current UTC time.
    pub fn add_note(
        &mut self,
        business_id: &str,
        project_id: &str,
        fields: NewNote,
    ) -> Option<EntityId> {
        self.add_child("add_note", business_id, project_id, fields)
    }

    /// Updates title/content. `created_at` is never touched.
    pub fn update_note(
        &mut self,
        business_id: &str,
        project_id: &str,
        note_id: &str,
        patch: NotePatch,
    ) {
        self.update_child::<Note, _>("update_note", business_id, project_id, note_id, patch);
    }

    pub fn delete_note(&mut self, business_id: &str, project_id: &str, note_id: &str) {
        self.delete_child::<Note>("delete_note", business_id, project_id, note_id);
    }

    fn child<C: ProjectChild>(&self, business_id: &str, project_id: &str, id: &str) -> Option<&C> {
        tree::find(C::items(self.project(business_id, project_id)?), id)
    }

    fn add_child<P>(
        &mut self,
        op: &'static str,
        business_id: &str,
        project_id: &str,
        fields: P,
    ) -> Option<EntityId>
    where
        P: IntoEntity,
        P::Entity: ProjectChild,
    {
        let id = self.ids.next_id();
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.apply(op, |businesses| {
            let project = tree::project_mut(businesses, project_path(business_id, project_id))?;
            <P::Entity as ProjectChild>::items_mut(project).push(fields.into_entity(id.clone(), &created_at));
            Some(id)
        })
    }

    fn update_child<C, P>(
        &mut self,
        op: &'static str,
        business_id: &str,
        project_id: &str,
        child_id: &str,
        patch: P,
    ) where
        C: ProjectChild,
        P: Patch<C>,
    {
        self.apply(op, |businesses| {
            tree::update_child::<C, _>(
                businesses,
                project_path(business_id, project_id),
                child_id,
                |child| patch.apply_to(child),
            )
        });
    }

    fn delete_child<C: ProjectChild>(
        &mut self,
        op: &'static str,
        business_id: &str,
        project_id: &str,
        child_id: &str,
    ) {
        self.apply(op, |businesses| {
            let project = tree::project_mut(businesses, project_path(business_id, project_id))?;
            tree::remove(C::items_mut(project), child_id).map(|_| ())
        });
    }

    /// Runs `change` against the tree and saves when it reports success.
    fn apply<R>(
        &mut self,
        op: &'static str,
        change: impl FnOnce(&mut Vec<Business>) -> Option<R>,
    ) -> Option<R> {
        let Some(owner) = self.owner.as_deref() else {
            debug!("event=workspace_mutation module=store op={op} status=skipped reason=no_owner");
            return None;
        };

        let Some(result) = change(&mut self.businesses) else {
            debug!(
                "event=workspace_mutation module=store op={op} status=skipped reason=missing_target user_id={owner}"
            );
            return None;
        };

        match self.persistence.save_workspace(owner, &self.businesses) {
            Ok(()) => debug!(
                "event=workspace_mutation module=store op={op} status=ok user_id={owner} businesses={}",
                self.businesses.len()
            ),
            Err(err) => error!(
                "event=workspace_save module=store op={op} status=error user_id={owner} error={err}"
            ),
        }
        Some(result)
    }
}

fn project_path<'a>(business_id: &'a str, project_id: &'a str) -> NodePath<'a> {
    NodePath::Project {
        business_id,
        project_id,
    }
}
