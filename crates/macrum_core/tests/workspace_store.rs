use macrum_core::db::open_db_in_memory;
use macrum_core::{
    AssetPatch, AssetType, BusinessPatch, ContactPatch, NewAsset, NewBusiness, NewContact,
    NewNote, NewProject, NewTask, NotePatch, Persistence, ProjectPatch, ProjectStatus,
    SequentialIdGenerator, SqliteKvStore, TaskPatch, User, WorkspaceStore,
};
use rusqlite::Connection;
use std::rc::Rc;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn persistence(conn: &Connection) -> Persistence<SqliteKvStore<'_>> {
    Persistence::new(SqliteKvStore::try_new(conn).unwrap(), "macrum")
}

fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        name: "Owner".to_string(),
        email: format!("{id}@example.com"),
    }
}

fn loaded_store(conn: &Connection) -> WorkspaceStore<SqliteKvStore<'_>> {
    let mut store = WorkspaceStore::new(
        persistence(conn),
        Rc::new(SequentialIdGenerator::new("id")),
    );
    store.load_for(&user("u-1"));
    store
}

#[test]
fn add_business_stores_supplied_fields_without_projects() {
    let conn = setup();
    let mut store = loaded_store(&conn);

    let fields = NewBusiness {
        name: "Acme".to_string(),
        industry: Some("Retail".to_string()),
        description: "Shops".to_string(),
    };
    let id = store.add_business(fields).unwrap();

    let business = store.business(&id).unwrap();
    assert_eq!(business.name, "Acme");
    assert_eq!(business.industry.as_deref(), Some("Retail"));
    assert_eq!(business.description, "Shops");
    assert!(business.projects.is_empty());
    assert!(!store.has_any_project());
}

#[test]
fn mutations_are_persisted_before_returning() {
    let conn = setup();
    let mut store = loaded_store(&conn);
    let business_id = store.add_business(NewBusiness::named("Acme")).unwrap();
    let project_id = store
        .add_project(&business_id, NewProject::named("Launch"))
        .unwrap();
    store.add_task(&business_id, &project_id, NewTask::named("Plan").due("2024-03-01"));

    let stored = persistence(&conn).load_workspace("u-1");
    assert_eq!(stored, store.businesses());
    assert_eq!(stored[0].projects[0].status, ProjectStatus::Planning);
}

#[test]
fn missing_parent_is_a_silent_no_op() {
    let conn = setup();
    let mut store = loaded_store(&conn);
    let business_id = store.add_business(NewBusiness::named("Acme")).unwrap();
    let before = store.businesses().to_vec();

    assert!(store.add_project("missing", NewProject::named("Ghost")).is_none());
    assert!(store
        .add_task(&business_id, "missing", NewTask::named("Ghost"))
        .is_none());
    store.update_business(
        "missing",
        BusinessPatch {
            name: Some("Renamed".to_string()),
            ..BusinessPatch::default()
        },
    );
    store.delete_project(&business_id, "missing");

    assert_eq!(store.businesses(), before.as_slice());
    assert_eq!(persistence(&conn).load_workspace("u-1"), before);
}

#[test]
fn store_without_owner_ignores_mutations() {
    let conn = setup();
    let mut store = WorkspaceStore::new(
        persistence(&conn),
        Rc::new(SequentialIdGenerator::new("id")),
    );
    assert!(store.add_business(NewBusiness::named("Acme")).is_none());
    assert!(store.businesses().is_empty());
    assert!(store.owner().is_none());
}

#[test]
fn delete_business_cascades_to_descendants() {
    let conn = setup();
    let mut store = loaded_store(&conn);
    let keep = store.add_business(NewBusiness::named("Keep")).unwrap();
    let doomed = store.add_business(NewBusiness::named("Doomed")).unwrap();
    let project_id = store
        .add_project(&doomed, NewProject::named("Launch"))
        .unwrap();
    let task_id = store
        .add_task(&doomed, &project_id, NewTask::named("Plan"))
        .unwrap();

    store.delete_business(&doomed);

    assert!(store.business(&doomed).is_none());
    assert!(store.project(&doomed, &project_id).is_none());
    assert!(store.task(&doomed, &project_id, &task_id).is_none());
    assert_eq!(store.businesses().len(), 1);
    assert_eq!(store.businesses()[0].id, keep);
}

#[test]
fn project_updates_merge_and_clear_optional_fields() {
    let conn = setup();
    let mut store = loaded_store(&conn);
    let business_id = store.add_business(NewBusiness::named("Acme")).unwrap();
    let project_id = store
        .add_project(
            &business_id,
            NewProject {
                name: "Launch".to_string(),
                start_date: Some("2024-01-01".to_string()),
                end_date: Some("2024-06-30".to_string()),
                ..NewProject::default()
            },
        )
        .unwrap();

    store.update_project(
        &business_id,
        &project_id,
        ProjectPatch {
            description: Some("Go live".to_string()),
            end_date: Some(None),
            ..ProjectPatch::default()
        },
    );
    store.update_project_status(&business_id, &project_id, ProjectStatus::OnHold);

    let project = store.project(&business_id, &project_id).unwrap();
    assert_eq!(project.id, project_id);
    assert_eq!(project.name, "Launch");
    assert_eq!(project.description, "Go live");
    assert_eq!(project.start_date.as_deref(), Some("2024-01-01"));
    assert_eq!(project.end_date, None);
    assert_eq!(project.status, ProjectStatus::OnHold);
}

#[test]
fn toggle_twice_restores_completion_and_update_merges() {
    let conn = setup();
    let mut store = loaded_store(&conn);
    let b = store.add_business(NewBusiness::named("Acme")).unwrap();
    let p = store.add_project(&b, NewProject::named("Launch")).unwrap();
    let t = store
        .add_task(&b, &p, NewTask::named("Plan").due("2024-03-01"))
        .unwrap();
    assert!(!store.task(&b, &p, &t).unwrap().completed);

    store.toggle_task_complete(&b, &p, &t);
    assert!(store.task(&b, &p, &t).unwrap().completed);
    store.toggle_task_complete(&b, &p, &t);
    assert!(!store.task(&b, &p, &t).unwrap().completed);

    store.update_task(
        &b,
        &p,
        &t,
        TaskPatch {
            name: Some("Plan launch".to_string()),
            due_date: Some(None),
            ..TaskPatch::default()
        },
    );
    let task = store.task(&b, &p, &t).unwrap();
    assert_eq!(task.name, "Plan launch");
    assert_eq!(task.due_date, None);

    store.delete_task(&b, &p, &t);
    assert!(store.task(&b, &p, &t).is_none());
}

#[test]
fn contacts_and_assets_follow_crud_rules() {
    let conn = setup();
    let mut store = loaded_store(&conn);
    let b = store.add_business(NewBusiness::named("Acme")).unwrap();
    let p = store.add_project(&b, NewProject::named("Launch")).unwrap();

    let c = store
        .add_contact(
            &b,
            &p,
            NewContact {
                name: "Pat".to_string(),
                email: Some("pat@example.com".to_string()),
                role: Some("Lead".to_string()),
                ..NewContact::default()
            },
        )
        .unwrap();
    store.update_contact(
        &b,
        &p,
        &c,
        ContactPatch {
            phone: Some(Some("555-0100".to_string())),
            role: Some(None),
            ..ContactPatch::default()
        },
    );
    let contact = store.contact(&b, &p, &c).unwrap();
    assert_eq!(contact.email.as_deref(), Some("pat@example.com"));
    assert_eq!(contact.phone.as_deref(), Some("555-0100"));
    assert_eq!(contact.role, None);

    let a = store
        .add_asset(
            &b,
            &p,
            NewAsset {
                name: "Deck".to_string(),
                kind: AssetType::Document,
                ..NewAsset::default()
            },
        )
        .unwrap();
    store.update_asset(
        &b,
        &p,
        &a,
        AssetPatch {
            kind: Some(AssetType::from("Blueprint")),
            link: Some(Some("https://example.com/deck".to_string())),
            ..AssetPatch::default()
        },
    );
    let asset = store.asset(&b, &p, &a).unwrap();
    assert_eq!(asset.kind, AssetType::Custom("Blueprint".to_string()));
    assert_eq!(asset.link.as_deref(), Some("https://example.com/deck"));

    store.delete_contact(&b, &p, &c);
    store.delete_asset(&b, &p, &a);
    let project = store.project(&b, &p).unwrap();
    assert!(project.contacts.is_empty());
    assert!(project.assets.is_empty());
}

#[test]
fn note_updates_never_touch_created_at() {
    let conn = setup();
    let mut store = loaded_store(&conn);
    let b = store.add_business(NewBusiness::named("Acme")).unwrap();
    let p = store.add_project(&b, NewProject::named("Launch")).unwrap();
    let n = store
        .add_note(
            &b,
            &p,
            NewNote {
                title: "Kickoff".to_string(),
                content: "Agenda".to_string(),
            },
        )
        .unwrap();

    let created_at = store.note(&b, &p, &n).unwrap().created_at.clone();
    assert!(created_at.ends_with('Z'));
    assert!(chrono::DateTime::parse_from_rfc3339(&created_at).is_ok());

    store.update_note(
        &b,
        &p,
        &n,
        NotePatch {
            content: Some("Minutes".to_string()),
            ..NotePatch::default()
        },
    );
    let note = store.note(&b, &p, &n).unwrap();
    assert_eq!(note.title, "Kickoff");
    assert_eq!(note.content, "Minutes");
    assert_eq!(note.created_at, created_at);

    store.delete_note(&b, &p, &n);
    assert!(store.note(&b, &p, &n).is_none());
}

#[test]
fn load_for_replaces_previous_users_tree() {
    let conn = setup();
    let mut store = loaded_store(&conn);
    store.add_business(NewBusiness::named("First user"));

    store.load_for(&user("u-2"));
    assert_eq!(store.owner(), Some("u-2"));
    assert!(store.businesses().is_empty());

    store.load_for(&user("u-1"));
    assert_eq!(store.businesses().len(), 1);

    store.unload();
    assert!(store.businesses().is_empty());
    assert_eq!(persistence(&conn).load_workspace("u-1").len(), 1);
}
