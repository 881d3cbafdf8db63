use serde_json::json;

use warden_application::RowSelection;
use warden_core::AppError;
use warden_domain::{
    DistributionJob, FieldValue, JobField, ProviderProject, Record, Role, RoleField,
};

use crate::console_event::ConsoleEvent;

use super::{ConsoleSession, ProjectBinding};

fn event(line: &str) -> ConsoleEvent {
    ConsoleEvent::parse(line).unwrap_or_else(|_| unreachable!())
}

fn role(name: &str) -> Record<Role> {
    Record::<Role>::new().with_field(RoleField::RoleName, FieldValue::Text(name.to_owned()))
}

fn projects(names: &[&str]) -> Vec<ProviderProject> {
    names
        .iter()
        .map(|name| ProviderProject::new(*name, None))
        .collect()
}

fn job_session(
    seed: Vec<Record<DistributionJob>>,
    names: &[&str],
    page_size: usize,
) -> ConsoleSession<DistributionJob> {
    ConsoleSession::new(
        seed,
        projects(names),
        RowSelection::new(page_size),
        Some(ProjectBinding::job_projects()),
    )
}

#[tokio::test]
async fn start_lists_seeded_records() {
    let mut session: ConsoleSession<Role> = ConsoleSession::new(
        vec![role("operators").with_identifier("role-1")],
        Vec::new(),
        RowSelection::new(10),
        None,
    );

    let snapshot = session.start().await;

    assert_eq!(snapshot.records.len(), 1);
    assert!(snapshot.record.is_new());
    assert!(!snapshot.fetching);
}

#[tokio::test]
async fn role_created_through_events_shows_in_records() {
    let mut session: ConsoleSession<Role> =
        ConsoleSession::new(Vec::new(), Vec::new(), RowSelection::new(10), None);
    session.start().await;

    let lines = [
        r#"{"op":"set_field","field":"roleName","value":"operators"}"#,
        r#"{"op":"add_child","item":{"descriptorName":"channel_email","context":"GLOBAL","read":true}}"#,
        r#"{"op":"commit"}"#,
    ];
    let mut last = None;
    for line in lines {
        last = session.handle(event(line)).await.ok();
    }

    let snapshot = last.unwrap_or_else(|| unreachable!());
    assert_eq!(snapshot.records.len(), 1);
    assert_eq!(snapshot.records[0].text(RoleField::RoleName), Some("operators"));
    assert!(snapshot.records[0].children()[0].access().read);
    assert!(snapshot.record.is_new());
    assert!(snapshot.field_errors.is_empty());
}

#[tokio::test]
async fn commit_without_name_reports_field_error() {
    let mut session: ConsoleSession<Role> =
        ConsoleSession::new(Vec::new(), Vec::new(), RowSelection::new(10), None);

    let snapshot = session.handle(event(r#"{"op":"commit"}"#)).await;

    let snapshot = snapshot.unwrap_or_else(|_| unreachable!());
    assert!(snapshot.field_errors.contains_key("roleName"));
}

#[tokio::test]
async fn unknown_field_and_identifier_are_rejected() {
    let mut session: ConsoleSession<Role> =
        ConsoleSession::new(Vec::new(), Vec::new(), RowSelection::new(10), None);
    session.start().await;

    let field = session
        .handle(event(r#"{"op":"set_field","field":"colour","value":"red"}"#))
        .await;
    let edit = session
        .handle(event(r#"{"op":"begin_edit","identifier":"missing"}"#))
        .await;

    assert!(matches!(field, Err(AppError::Validation(_))));
    assert!(matches!(edit, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn malformed_child_is_a_validation_error() {
    let mut session: ConsoleSession<Role> =
        ConsoleSession::new(Vec::new(), Vec::new(), RowSelection::new(10), None);

    let result = session
        .handle(event(r#"{"op":"add_child","item":{"descriptorName":" "}}"#))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn boolean_fields_follow_their_declared_kind() {
    let mut session = job_session(Vec::new(), &[], 10);

    let snapshot = session
        .handle(event(r#"{"op":"set_field","field":"enabled","value":"TRUE"}"#))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(snapshot.record.flag(JobField::Enabled), Some(true));
}

#[tokio::test]
async fn begin_copy_duplicates_existing_job() {
    let seeded = Record::<DistributionJob>::new()
        .with_identifier("job-1")
        .with_field(JobField::Name, FieldValue::Text("nightly".to_owned()));
    let mut session = job_session(vec![seeded], &[], 10);
    session.start().await;

    let snapshot = session
        .handle(event(r#"{"op":"begin_copy","identifier":"job-1"}"#))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(snapshot.record.is_new());
    assert_eq!(snapshot.record.text(JobField::Name), Some("nightly"));
}

#[tokio::test]
async fn select_all_covers_only_the_visible_page() {
    let mut session = job_session(Vec::new(), &["delta", "alpha", "charlie", "bravo"], 2);

    let snapshot = session
        .handle(event(r#"{"op":"select_all"}"#))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(
        snapshot.selection.selected,
        vec!["alpha".to_owned(), "bravo".to_owned()]
    );
    assert_eq!(snapshot.visible_projects.page_count, 2);
}

#[tokio::test]
async fn search_narrows_select_all() {
    let mut session = job_session(Vec::new(), &["alpha", "beta", "alphabet"], 10);
    session
        .handle(event(r#"{"op":"search","text":"ALPHA"}"#))
        .await
        .unwrap_or_else(|_| unreachable!());

    let snapshot = session
        .handle(event(r#"{"op":"select_all"}"#))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(
        snapshot.selection.selected,
        vec!["alpha".to_owned(), "alphabet".to_owned()]
    );
    assert_eq!(snapshot.visible_projects.total_rows, 2);
}

#[tokio::test]
async fn selecting_unknown_project_is_not_found() {
    let mut session = job_session(Vec::new(), &["alpha"], 10);

    let result = session
        .handle(event(r#"{"op":"select_row","key":"omega"}"#))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn attaching_selected_projects_skips_already_attached_ones() {
    let mut session = job_session(Vec::new(), &["alpha", "beta"], 10);
    for line in [
        r#"{"op":"open_picker"}"#,
        r#"{"op":"select_row","key":"alpha"}"#,
        r#"{"op":"attach_selected_projects"}"#,
        r#"{"op":"select_row","key":"beta"}"#,
    ] {
        session
            .handle(event(line))
            .await
            .unwrap_or_else(|_| unreachable!());
    }

    let snapshot = session
        .handle(event(r#"{"op":"attach_selected_projects"}"#))
        .await
        .unwrap_or_else(|_| unreachable!());

    let attached: Vec<&str> = snapshot
        .record
        .children()
        .iter()
        .map(|project| project.project_name().as_str())
        .collect();
    assert_eq!(attached, vec!["alpha", "beta"]);
    assert!(!snapshot.selection.picker_open);
}

#[tokio::test]
async fn roles_do_not_accept_projects() {
    let mut session: ConsoleSession<Role> =
        ConsoleSession::new(Vec::new(), projects(&["alpha"]), RowSelection::new(10), None);

    let result = session
        .handle(event(r#"{"op":"attach_selected_projects"}"#))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn read_only_selector_shows_only_attached_projects() {
    let seeded = Record::<DistributionJob>::new()
        .with_identifier("job-1")
        .with_field(JobField::Name, FieldValue::Text("nightly".to_owned()))
        .with_children(vec![
            warden_domain::JobProject::new("beta", None).unwrap_or_else(|_| unreachable!()),
        ]);
    let mut session = ConsoleSession::new(
        vec![seeded],
        projects(&["alpha", "beta", "gamma"]),
        RowSelection::read_only(10),
        Some(ProjectBinding::job_projects()),
    );
    session.start().await;

    let snapshot = session
        .handle(event(r#"{"op":"begin_edit","identifier":"job-1"}"#))
        .await
        .unwrap_or_else(|_| unreachable!());
    let selected = session
        .handle(event(r#"{"op":"select_all"}"#))
        .await
        .unwrap_or_else(|_| unreachable!());

    let shown: Vec<&str> = snapshot
        .visible_projects
        .rows
        .iter()
        .map(ProviderProject::name)
        .collect();
    assert_eq!(shown, vec!["beta"]);
    assert!(selected.selection.selected.is_empty());
}

#[tokio::test]
async fn snapshot_serializes_with_expected_keys() {
    let mut session: ConsoleSession<Role> =
        ConsoleSession::new(Vec::new(), Vec::new(), RowSelection::new(10), None);

    let snapshot = session.start().await;
    let value = serde_json::to_value(&snapshot).unwrap_or_default();

    assert_eq!(value["fetching"], json!(false));
    assert_eq!(value["error_message"], json!(null));
    assert!(value["records"].is_array());
    assert!(value["selection"]["selected"].is_array());
    assert!(value.get("record").is_some());
    assert!(value.get("field_errors").is_some());
}

#[tokio::test]
async fn attach_is_all_or_nothing_when_a_project_cannot_convert() {
    let mut session = job_session(Vec::new(), &["alpha", "  "], 10);
    for line in [
        r#"{"op":"open_picker"}"#,
        r#"{"op":"select_row","key":"alpha"}"#,
        r#"{"op":"select_row","key":"  "}"#,
    ] {
        session
            .handle(event(line))
            .await
            .unwrap_or_else(|_| unreachable!());
    }

    let result = session
        .handle(event(r#"{"op":"attach_selected_projects"}"#))
        .await;
    let snapshot = session
        .handle(event(r#"{"op":"refresh"}"#))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(snapshot.record.children().is_empty());
    assert!(snapshot.selection.picker_open);
}

#[tokio::test]
async fn out_of_range_page_is_reported_clamped() {
    let mut session = job_session(Vec::new(), &["a", "b", "c", "d", "e"], 2);

    let snapshot = session
        .handle(event(r#"{"op":"page","page":9}"#))
        .await
        .unwrap_or_else(|_| unreachable!());
    let value = serde_json::to_value(&snapshot).unwrap_or_default();

    assert_eq!(snapshot.visible_projects.page, 2);
    assert_eq!(value["visible_projects"]["page"], json!(2));
    assert!(value["selection"].get("page").is_none());
}

#[tokio::test]
async fn page_size_event_repages_projects() {
    let mut session = job_session(Vec::new(), &["a", "b", "c", "d", "e"], 2);
    session
        .handle(event(r#"{"op":"page","page":2}"#))
        .await
        .unwrap_or_else(|_| unreachable!());

    let snapshot = session
        .handle(event(r#"{"op":"page_size","page_size":4}"#))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(snapshot.selection.page_size, 4);
    assert_eq!(snapshot.visible_projects.page, 0);
    assert_eq!(snapshot.visible_projects.page_count, 2);
    assert_eq!(snapshot.visible_projects.rows.len(), 4);
}

#[tokio::test]
async fn missing_provider_projects_are_flagged_in_rows() {
    let rows: Vec<ProviderProject> =
        serde_json::from_str(r#"[{"name":"legacy","missing":true},{"name":"current"}]"#)
            .unwrap_or_default();
    let mut session = ConsoleSession::new(
        Vec::new(),
        rows,
        RowSelection::new(10),
        Some(ProjectBinding::job_projects()),
    );

    let snapshot = session.start().await;
    let value = serde_json::to_value(&snapshot).unwrap_or_default();

    assert_eq!(value["visible_projects"]["rows"][0]["name"], json!("current"));
    assert_eq!(value["visible_projects"]["rows"][0]["missing"], json!(false));
    assert_eq!(value["visible_projects"]["rows"][1]["missing"], json!(true));
}
