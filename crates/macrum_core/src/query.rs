//! Read-only derived views over a workspace tree.
//!
//! # Responsibility
//! - Flatten tasks with their parent context for cross-project views.
//! - Filter, sort and summarize tasks and projects.
//!
//! # Invariants
//! - Functions are pure: inputs are never mutated.
//! - Sorting is stable; tasks without a usable due date always sort last.
//! - "Today" is read once per dashboard computation.

use crate::model::entity::{Business, EntityId, ProjectStatus, Task};
use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

const UPCOMING_WINDOW_DAYS: u64 = 7;

/// A task together with the project and business it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedTask {
    #[serde(flatten)]
    pub task: Task,
    pub project_id: EntityId,
    pub project_name: String,
    pub business_id: EntityId,
    pub business_name: String,
}

impl FormattedTask {
    /// Parsed due date, `None` when absent or unparseable.
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_at().map(|due| due.date())
    }

    /// Incomplete and due strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.task.completed && self.due_date().is_some_and(|due| due < today)
    }

    fn due_at(&self) -> Option<NaiveDateTime> {
        self.task.due_date.as_deref().and_then(parse_due)
    }
}

/// Completion filter of the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatusFilter {
    All,
    Completed,
    #[default]
    Incomplete,
}

/// Task list filter. The default shows incomplete tasks with no search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskFilter {
    pub status: TaskStatusFilter,
    /// Case-insensitive substring; blank disables the search.
    pub search_term: String,
}

impl TaskFilter {
    pub fn with_status(status: TaskStatusFilter) -> Self {
        Self {
            status,
            search_term: String::new(),
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }
}

/// Task list ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    #[default]
    DueDateAsc,
    DueDateDesc,
    NameAsc,
}

/// Summary numbers and task lists for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_businesses: usize,
    pub total_projects: usize,
    pub total_tasks: usize,
    pub active_projects: usize,
    pub completed_projects: usize,
    /// Every status is present, zero when unused.
    pub projects_by_status: BTreeMap<ProjectStatus, usize>,
    /// Incomplete, due within the next seven days (inclusive), soonest first.
    pub upcoming_tasks: Vec<FormattedTask>,
    /// Incomplete, due before today, oldest first.
    pub overdue_tasks: Vec<FormattedTask>,
}

/// Lists every task, in business → project → task order.
pub fn flatten_tasks(businesses: &[Business]) -> Vec<FormattedTask> {
    businesses
        .iter()
        .flat_map(|business| {
            business.projects.iter().flat_map(move |project| {
                project.tasks.iter().map(move |task| FormattedTask {
                    task: task.clone(),
                    project_id: project.id.clone(),
                    project_name: project.name.clone(),
                    business_id: business.id.clone(),
                    business_name: business.name.clone(),
                })
            })
        })
        .collect()
}

/// Keeps the tasks that pass the status filter and the search term.
///
/// The term matches task name, project name, business name or description.
pub fn filter_tasks(tasks: Vec<FormattedTask>, filter: &TaskFilter) -> Vec<FormattedTask> {
    let needle = filter.search_term.trim().to_lowercase();
    tasks
        .into_iter()
        .filter(|task| match filter.status {
            TaskStatusFilter::All => true,
            TaskStatusFilter::Completed => task.task.completed,
            TaskStatusFilter::Incomplete => !task.task.completed,
        })
        .filter(|task| needle.is_empty() || matches_search(task, &needle))
        .collect()
}

/// Stable sort. Undated tasks go last for both due-date directions.
pub fn sort_tasks(mut tasks: Vec<FormattedTask>, sort: TaskSort) -> Vec<FormattedTask> {
    match sort {
        TaskSort::DueDateAsc => {
            tasks.sort_by(|a, b| compare_due(a.due_at(), b.due_at(), Ordering::Less))
        }
        TaskSort::DueDateDesc => {
            tasks.sort_by(|a, b| compare_due(a.due_at(), b.due_at(), Ordering::Greater))
        }
        TaskSort::NameAsc => tasks.sort_by(|a, b| compare_names(&a.task.name, &b.task.name)),
    }
    tasks
}

/// Flatten, filter and sort in one call.
pub fn query_tasks(
    businesses: &[Business],
    filter: &TaskFilter,
    sort: TaskSort,
) -> Vec<FormattedTask> {
    sort_tasks(filter_tasks(flatten_tasks(businesses), filter), sort)
}

/// Dashboard numbers relative to the local date.
pub fn compute_dashboard_stats(businesses: &[Business]) -> DashboardStats {
    compute_dashboard_stats_on(businesses, Local::now().date_naive())
}

/// Dashboard numbers relative to `today`.
pub fn compute_dashboard_stats_on(businesses: &[Business], today: NaiveDate) -> DashboardStats {
    let mut projects_by_status: BTreeMap<ProjectStatus, usize> =
        ProjectStatus::ALL.iter().map(|status| (*status, 0)).collect();
    let mut total_projects = 0;
    for project in businesses.iter().flat_map(|business| &business.projects) {
        total_projects += 1;
        *projects_by_status.entry(project.status).or_default() += 1;
    }

    let tasks = flatten_tasks(businesses);
    let total_tasks = tasks.len();
    let horizon = today
        .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX);

    let mut upcoming_tasks = Vec::new();
    let mut overdue_tasks = Vec::new();
    for task in tasks {
        if task.task.completed {
            continue;
        }
        match task.due_date() {
            Some(due) if due < today => overdue_tasks.push(task),
            Some(due) if due <= horizon => upcoming_tasks.push(task),
            _ => {}
        }
    }

    DashboardStats {
        total_businesses: businesses.len(),
        total_projects,
        total_tasks,
        active_projects: projects_by_status[&ProjectStatus::Active],
        completed_projects: projects_by_status[&ProjectStatus::Completed],
        projects_by_status,
        upcoming_tasks: sort_tasks(upcoming_tasks, TaskSort::DueDateAsc),
        overdue_tasks: sort_tasks(overdue_tasks, TaskSort::DueDateAsc),
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (kept in its own offset).
fn parse_due(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|timestamp| timestamp.naive_local())
}

fn compare_due(
    a: Option<NaiveDateTime>,
    b: Option<NaiveDateTime>,
    direction: Ordering,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if direction == Ordering::Greater => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn matches_search(task: &FormattedTask, needle: &str) -> bool {
    [
        task.task.name.as_str(),
        task.project_name.as_str(),
        task.business_name.as_str(),
        task.task.description.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::{
        compute_dashboard_stats_on, filter_tasks, flatten_tasks, query_tasks, sort_tasks,
        TaskFilter, TaskSort, TaskStatusFilter,
    };
    use crate::model::entity::{Business, Project, ProjectStatus, Task};
    use chrono::NaiveDate;

    fn task(id: &str, name: &str, due_date: Option<&str>, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            completed,
            due_date: due_date.map(str::to_string),
        }
    }

    fn project(id: &str, name: &str, status: ProjectStatus, tasks: Vec<Task>) -> Project {
        Project {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            status,
            start_date: None,
            end_date: None,
            tasks,
            contacts: Vec::new(),
            assets: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn business(id: &str, name: &str, projects: Vec<Project>) -> Business {
        Business {
            id: id.to_string(),
            name: name.to_string(),
            industry: None,
            description: String::new(),
            projects,
        }
    }

    fn ids(tasks: &[super::FormattedTask]) -> Vec<&str> {
        tasks.iter().map(|task| task.task.id.as_str()).collect()
    }

    #[test]
    fn flatten_keeps_tree_order_and_parent_context() {
        let businesses = vec![
            business(
                "b-1",
                "Acme",
                vec![
                    project("p-1", "Launch", ProjectStatus::Active, vec![task("t-1", "a", None, false)]),
                    project("p-2", "Hiring", ProjectStatus::Planning, vec![task("t-2", "b", None, false)]),
                ],
            ),
            business(
                "b-2",
                "Globex",
                vec![project("p-3", "Audit", ProjectStatus::OnHold, vec![task("t-3", "c", None, true)])],
            ),
        ];

        let flat = flatten_tasks(&businesses);
        assert_eq!(ids(&flat), vec!["t-1", "t-2", "t-3"]);
        assert_eq!(flat[2].business_id, "b-2");
        assert_eq!(flat[2].business_name, "Globex");
        assert_eq!(flat[1].project_name, "Hiring");
    }

    #[test]
    fn due_date_sorts_put_undated_last_in_both_directions() {
        let businesses = vec![business(
            "b-1",
            "Acme",
            vec![project(
                "p-1",
                "Launch",
                ProjectStatus::Active,
                vec![
                    task("A", "A", None, false),
                    task("B", "B", Some("2024-01-01"), false),
                    task("C", "C", Some("2024-01-02"), false),
                    task("D", "D", Some("not a date"), false),
                ],
            )],
        )];
        let flat = flatten_tasks(&businesses);

        let ascending = sort_tasks(flat.clone(), TaskSort::DueDateAsc);
        assert_eq!(ids(&ascending), vec!["B", "C", "A", "D"]);

        let descending = sort_tasks(flat, TaskSort::DueDateDesc);
        assert_eq!(ids(&descending), vec!["C", "B", "A", "D"]);
    }

    #[test]
    fn name_sort_ignores_case_and_is_stable() {
        let businesses = vec![business(
            "b-1",
            "Acme",
            vec![project(
                "p-1",
                "Launch",
                ProjectStatus::Active,
                vec![
                    task("t-1", "beta", None, false),
                    task("t-2", "Alpha", None, false),
                    task("t-3", "alpha", None, false),
                ],
            )],
        )];
        let sorted = sort_tasks(flatten_tasks(&businesses), TaskSort::NameAsc);
        assert_eq!(ids(&sorted), vec!["t-2", "t-3", "t-1"]);
    }

    #[test]
    fn filter_matches_parent_names_and_status() {
        let businesses = vec![business(
            "b-1",
            "Acme",
            vec![
                project("p-1", "Project Alpha", ProjectStatus::Active, vec![task("t-1", "Draft", None, false)]),
                project("p-2", "Beta", ProjectStatus::Active, vec![task("t-2", "Review", None, true)]),
            ],
        )];
        let flat = flatten_tasks(&businesses);

        let by_project = filter_tasks(
            flat.clone(),
            &TaskFilter::with_status(TaskStatusFilter::All).search("proj"),
        );
        assert_eq!(ids(&by_project), vec!["t-1"]);

        let by_business = filter_tasks(
            flat.clone(),
            &TaskFilter::with_status(TaskStatusFilter::All).search("ACME"),
        );
        assert_eq!(by_business.len(), 2);

        let completed = filter_tasks(flat.clone(), &TaskFilter::with_status(TaskStatusFilter::Completed));
        assert_eq!(ids(&completed), vec!["t-2"]);

        let default_view = query_tasks(&businesses, &TaskFilter::default().search("   "), TaskSort::default());
        assert_eq!(ids(&default_view), vec!["t-1"]);
    }

    #[test]
    fn dashboard_splits_overdue_and_upcoming() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let businesses = vec![business(
            "b-1",
            "Acme",
            vec![
                project(
                    "p-1",
                    "Launch",
                    ProjectStatus::Active,
                    vec![
                        task("yesterday", "a", Some("2024-05-09"), false),
                        task("soon", "b", Some("2024-05-13"), false),
                        task("today", "c", Some("2024-05-10T09:30:00Z"), false),
                        task("edge", "d", Some("2024-05-17"), false),
                        task("later", "e", Some("2024-05-18"), false),
                        task("done", "f", Some("2024-05-01"), true),
                        task("undated", "g", None, false),
                    ],
                ),
                project("p-2", "Wrap", ProjectStatus::Completed, Vec::new()),
            ],
        )];

        let stats = compute_dashboard_stats_on(&businesses, today);
        assert_eq!(stats.total_businesses, 1);
        assert_eq!(stats.total_projects, 2);
        assert_eq!(stats.total_tasks, 7);
        assert_eq!(stats.active_projects, 1);
        assert_eq!(stats.completed_projects, 1);
        assert_eq!(stats.projects_by_status.len(), 5);
        assert_eq!(stats.projects_by_status[&ProjectStatus::Cancelled], 0);
        assert_eq!(ids(&stats.overdue_tasks), vec!["yesterday"]);
        assert_eq!(ids(&stats.upcoming_tasks), vec!["today", "soon", "edge"]);
        assert!(stats.overdue_tasks[0].is_overdue(today));
        assert!(!stats.upcoming_tasks[0].is_overdue(today));
    }
}
