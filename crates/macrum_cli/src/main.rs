//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `macrum_core` linkage.
//! - Exercise one sign-up, a few mutations and the dashboard end to end.
//!
//! Usage: `macrum_cli [DB_PATH]`. Without a path an in-memory database is used.

use log::info;
use macrum_core::db::{open_db, open_db_in_memory};
use macrum_core::{
    App, CoreConfig, NewBusiness, NewProject, NewTask, Persistence, ProjectStatus,
    IdGenerator, SequentialIdGenerator, SqliteKvStore, TaskFilter, TaskSort, TaskStatusFilter,
    UuidIdGenerator,
};
use std::error::Error;
use std::rc::Rc;

const DEMO_EMAIL: &str = "demo@macrum.local";

fn main() -> Result<(), Box<dyn Error>> {
    let db_path = std::env::args().nth(1);
    let ids = id_generator(db_path.is_some());
    let conn = match db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let config = CoreConfig::default();
    if let Some(logging) = config.logging() {
        macrum_core::init_logging(&logging)?;
    }

    let store = SqliteKvStore::try_new(&conn)?;
    let persistence = Persistence::new(store, config.storage_namespace.clone());
    let mut app = App::open(persistence, &config, ids);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let signed_in = runtime.block_on(async {
        if app.auth().is_authenticated() {
            return true;
        }
        app.login(DEMO_EMAIL, "demo").await || app.signup("Demo", DEMO_EMAIL, "demo").await
    });
    if !signed_in {
        let reason = app
            .auth()
            .last_error()
            .map(ToString::to_string)
            .unwrap_or_default();
        return Err(format!("demo sign-in failed: {reason}").into());
    }

    if app.businesses().is_empty() {
        seed(&mut app);
    }

    let stats = app.dashboard();
    println!("macrum_core version={}", macrum_core::core_version());
    println!("view={}", app.selection().current_view());
    println!(
        "businesses={} projects={} tasks={} active={} completed={}",
        stats.total_businesses,
        stats.total_projects,
        stats.total_tasks,
        stats.active_projects,
        stats.completed_projects
    );
    println!(
        "upcoming={} overdue={}",
        stats.upcoming_tasks.len(),
        stats.overdue_tasks.len()
    );
    for task in app.all_tasks(&TaskFilter::with_status(TaskStatusFilter::All), TaskSort::DueDateAsc) {
        println!(
            "task id={} due={} completed={}",
            task.task.id,
            task.task.due_date.as_deref().unwrap_or("-"),
            task.task.completed
        );
    }
    info!(
        "event=cli_smoke module=cli status=ok tasks={}",
        stats.total_tasks
    );
    Ok(())
}

fn seed(app: &mut App<SqliteKvStore<'_>>) {
    let mut workspace = app.workspace_mut();
    let Some(business_id) = workspace.add_business(NewBusiness::named("Demo Co")) else {
        return;
    };
    let mut project = NewProject::named("Launch");
    project.status = Some(ProjectStatus::Active);
    let Some(project_id) = workspace.add_project(&business_id, project) else {
        return;
    };
    workspace.add_task(&business_id, &project_id, NewTask::named("Write brief").due("2030-01-15"));
    workspace.add_task(&business_id, &project_id, NewTask::named("Book venue"));
}

/// Stored trees outlive the process, so file databases need random ids.
fn id_generator(persistent: bool) -> Rc<dyn IdGenerator> {
    if persistent {
        Rc::new(UuidIdGenerator)
    } else {
        Rc::new(SequentialIdGenerator::new("demo"))
    }
}
