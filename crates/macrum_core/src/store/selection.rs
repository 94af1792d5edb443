//! Selection and navigation state.
//!
//! # Responsibility
//! - Track the selected business/project and the active top-level view.
//! - Enforce which views are reachable for guests and signed-in users.
//!
//! # Invariants
//! - Guest views (`landing`, `login`, `signup`) are only reachable while
//!   signed out; workspace views only while signed in.
//! - Selecting a business does not clear the project selection;
//!   `resolve` drops a project that does not belong to the business.

use crate::model::entity::{Business, EntityId, Project};
use crate::store::tree;
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Top-level screen shown by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    Landing,
    Login,
    Signup,
    Dashboard,
    Projects,
    AllTasks,
}

impl ViewMode {
    /// Whether the view needs a signed-in user.
    pub fn requires_auth(self) -> bool {
        matches!(self, Self::Dashboard | Self::Projects | Self::AllTasks)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Dashboard => "dashboard",
            Self::Projects => "projects",
            Self::AllTasks => "allTasks",
        }
    }
}

impl Display for ViewMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected view transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationError {
    /// Workspace view requested while signed out.
    RequiresAuth(ViewMode),
    /// Guest view requested while signed in.
    RequiresGuest(ViewMode),
}

impl Display for NavigationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequiresAuth(view) => write!(f, "view `{view}` requires a signed-in user"),
            Self::RequiresGuest(view) => write!(f, "view `{view}` is only available when signed out"),
        }
    }
}

impl Error for NavigationError {}

/// Selection resolved against the current tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSelection<'a> {
    pub business: Option<&'a Business>,
    /// Only set when the project belongs to `business`.
    pub project: Option<&'a Project>,
}

/// Selection and navigation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    selected_business_id: Option<EntityId>,
    selected_project_id: Option<EntityId>,
    current_view: ViewMode,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            selected_business_id: None,
            selected_project_id: None,
            current_view: ViewMode::Landing,
        }
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_business_id(&self) -> Option<&str> {
        self.selected_business_id.as_deref()
    }

    pub fn selected_project_id(&self) -> Option<&str> {
        self.selected_project_id.as_deref()
    }

    pub fn current_view(&self) -> ViewMode {
        self.current_view
    }

    pub fn select_business(&mut self, business_id: Option<&str>) {
        self.selected_business_id = business_id.map(str::to_string);
    }

    pub fn select_project(&mut self, project_id: Option<&str>) {
        self.selected_project_id = project_id.map(str::to_string);
    }

    pub fn clear_selection(&mut self) {
        self.selected_business_id = None;
        self.selected_project_id = None;
    }

    /// Switches view when it is reachable in the given auth state.
    pub fn set_current_view(
        &mut self,
        view: ViewMode,
        authenticated: bool,
    ) -> Result<(), NavigationError> {
        match (view.requires_auth(), authenticated) {
            (true, false) => Err(NavigationError::RequiresAuth(view)),
            (false, true) => Err(NavigationError::RequiresGuest(view)),
            _ => {
                debug!(
                    "event=navigate module=selection status=ok from={} to={}",
                    self.current_view, view
                );
                self.current_view = view;
                Ok(())
            }
        }
    }

    /// Clears selection and returns to the landing view.
    pub fn reset_for_guest(&mut self) {
        self.clear_selection();
        self.current_view = ViewMode::Landing;
    }

    /// Clears the business selection (and its project) if it is `business_id`.
    pub fn clear_business_if(&mut self, business_id: &str) {
        if self.selected_business_id.as_deref() == Some(business_id) {
            self.clear_selection();
        }
    }

    pub fn clear_project_if(&mut self, project_id: &str) {
        if self.selected_project_id.as_deref() == Some(project_id) {
            self.selected_project_id = None;
        }
    }

    /// Drops selected ids that no longer exist in `businesses`.
    ///
    /// A missing business clears the whole selection. A project is kept
    /// while it exists under any business.
    pub fn prune(&mut self, businesses: &[Business]) {
        if let Some(business_id) = self.selected_business_id.clone() {
            if tree::find(businesses, &business_id).is_none() {
                self.clear_business_if(&business_id);
            }
        }
        if let Some(project_id) = self.selected_project_id.clone() {
            let exists = businesses
                .iter()
                .any(|business| business.project(&project_id).is_some());
            if !exists {
                self.clear_project_if(&project_id);
            }
        }
    }

    /// Looks up the selected nodes in `businesses`.
    pub fn resolve<'a>(&self, businesses: &'a [Business]) -> ResolvedSelection<'a> {
        let business = self
            .selected_business_id
            .as_deref()
            .and_then(|id| tree::find(businesses, id));
        let project = business.and_then(|business| {
            self.selected_project_id
                .as_deref()
                .and_then(|id| business.project(id))
        });
        ResolvedSelection { business, project }
    }
}
