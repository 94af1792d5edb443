//! Application session composing the stores.
//!
//! # Responsibility
//! - Hold the auth, workspace and selection state for one process.
//! - Apply the effects that span stores (sign-in loads a tree, sign-out
//!   drops it, workspace edits prune dangling selection).
//!
//! # Invariants
//! - The loaded workspace always belongs to `auth().current_user()`.
//! - After `logout` no tree is in memory and the view is `landing`.
//! - After any workspace edit the selection only names existing nodes.

use crate::config::CoreConfig;
use crate::id::IdGenerator;
use crate::model::entity::Business;
use crate::persistence::Persistence;
use crate::query::{
    compute_dashboard_stats, query_tasks, DashboardStats, FormattedTask, TaskFilter, TaskSort,
};
use crate::repo::kv_repo::KeyValueStore;
use crate::store::auth_store::AuthStore;
use crate::store::selection::{NavigationError, SelectionState, ViewMode};
use crate::store::workspace_store::WorkspaceStore;
use log::{info, warn};
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

/// One user session over a shared persistence backend.
pub struct App<S: KeyValueStore + Clone> {
    auth: AuthStore<S>,
    workspace: WorkspaceStore<S>,
    selection: SelectionState,
}

impl<S: KeyValueStore + Clone> App<S> {
    /// Restores the persisted session. A signed-in user starts on the dashboard.
    pub fn open(
        persistence: Persistence<S>,
        config: &CoreConfig,
        ids: Rc<dyn IdGenerator>,
    ) -> Self {
        let auth = AuthStore::load(persistence.clone(), Rc::clone(&ids), config);
        let workspace = WorkspaceStore::new(persistence, ids);
        let mut app = Self {
            auth,
            workspace,
            selection: SelectionState::new(),
        };
        app.enter_workspace();
        info!(
            "event=app_open module=app status=ok view={}",
            app.selection.current_view()
        );
        app
    }

    pub fn auth(&self) -> &AuthStore<S> {
        &self.auth
    }

    pub fn workspace(&self) -> &WorkspaceStore<S> {
        &self.workspace
    }

    /// Mutable workspace access. The selection is pruned when the edit ends.
    pub fn workspace_mut(&mut self) -> WorkspaceEdit<'_, S> {
        WorkspaceEdit {
            workspace: &mut self.workspace,
            selection: &mut self.selection,
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    pub fn businesses(&self) -> &[Business] {
        self.workspace.businesses()
    }

    /// Registers and signs in; on success opens the new user's dashboard.
    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> bool {
        let signed_up = self.auth.signup(name, email, password).await;
        if signed_up {
            self.enter_workspace();
        }
        signed_up
    }

    /// Signs in; on success opens that user's dashboard.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        let logged_in = self.auth.login(email, password).await;
        if logged_in {
            self.enter_workspace();
        }
        logged_in
    }

    /// Signs out, drops the in-memory tree and returns to the landing view.
    pub fn logout(&mut self) {
        self.auth.logout();
        self.workspace.unload();
        self.selection.reset_for_guest();
    }

    pub fn set_current_view(&mut self, view: ViewMode) -> Result<(), NavigationError> {
        self.selection
            .set_current_view(view, self.auth.is_authenticated())
    }

    /// Sidebar navigation. Entering `projects` starts with nothing selected.
    pub fn navigate(&mut self, view: ViewMode) -> Result<(), NavigationError> {
        self.set_current_view(view)?;
        if view == ViewMode::Projects {
            self.selection.clear_selection();
        }
        Ok(())
    }

    /// Selects a project and shows it.
    pub fn open_project(
        &mut self,
        business_id: &str,
        project_id: &str,
    ) -> Result<(), NavigationError> {
        self.set_current_view(ViewMode::Projects)?;
        self.selection.select_business(Some(business_id));
        self.selection.select_project(Some(project_id));
        Ok(())
    }

    /// Deletes a business with its projects and drops them from the selection.
    pub fn delete_business(&mut self, business_id: &str) {
        self.workspace_mut().delete_business(business_id);
    }

    /// Deletes a project and drops it from the selection.
    pub fn delete_project(&mut self, business_id: &str, project_id: &str) {
        self.workspace_mut().delete_project(business_id, project_id);
    }

    /// Tasks of the loaded tree, as the all-tasks view lists them.
    pub fn all_tasks(&self, filter: &TaskFilter, sort: TaskSort) -> Vec<FormattedTask> {
        query_tasks(self.workspace.businesses(), filter, sort)
    }

    pub fn dashboard(&self) -> DashboardStats {
        compute_dashboard_stats(self.workspace.businesses())
    }

    fn enter_workspace(&mut self) {
        let Some(user) = self.auth.current_user() else {
            return;
        };
        self.workspace.load_for(user);
        self.selection.clear_selection();
        if let Err(err) = self.selection.set_current_view(ViewMode::Dashboard, true) {
            warn!("event=navigate module=app status=error error={err}");
        }
    }
}

/// Mutable workspace borrow. Prunes the selection against the tree on drop.
pub struct WorkspaceEdit<'a, S: KeyValueStore> {
    workspace: &'a mut WorkspaceStore<S>,
    selection: &'a mut SelectionState,
}

impl<S: KeyValueStore> Deref for WorkspaceEdit<'_, S> {
    type Target = WorkspaceStore<S>;

    fn deref(&self) -> &Self::Target {
        self.workspace
    }
}

impl<S: KeyValueStore> DerefMut for WorkspaceEdit<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.workspace
    }
}

impl<S: KeyValueStore> Drop for WorkspaceEdit<'_, S> {
    fn drop(&mut self) {
        self.selection.prune(self.workspace.businesses());
    }
}
