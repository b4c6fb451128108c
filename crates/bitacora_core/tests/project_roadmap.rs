use bitacora_core::db::open_db_in_memory;
use bitacora_core::{
    ModelValidationError, PhaseStatus, ProjectPhase, ProjectService, ProjectServiceError,
    RepoError, SqliteAgendaRepository, SqliteProjectDirectory, SqliteSessionStore,
};
use chrono::NaiveDate;
use rusqlite::Connection;

type Service<'conn> = ProjectService<
    SqliteProjectDirectory<'conn>,
    SqliteSessionStore<'conn>,
    SqliteAgendaRepository<'conn>,
>;

fn service(conn: &Connection) -> Service<'_> {
    ProjectService::new(
        SqliteProjectDirectory::try_new(conn).unwrap(),
        SqliteSessionStore::try_new(conn).unwrap(),
        SqliteAgendaRepository::try_new(conn).unwrap(),
    )
}

#[test]
fn new_project_starts_in_diagnosis() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let project = service.create_project("  Acme Retail ", "Acme SA").unwrap();
    assert_eq!(project.name, "Acme Retail");
    assert_eq!(project.current_phase, ProjectPhase::Diagnosis);

    let roadmap = service.roadmap("Acme Retail").unwrap();
    assert_eq!(roadmap.steps.len(), 4);
    assert_eq!(roadmap.steps[0].status, PhaseStatus::Current);
    assert!(roadmap.steps[1..]
        .iter()
        .all(|step| step.status == PhaseStatus::Upcoming));
}

#[test]
fn project_names_are_unique_and_non_blank() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    service.create_project("Acme Retail", "Acme SA").unwrap();

    let err = service.create_project("Acme Retail", "Otro").unwrap_err();
    assert!(matches!(
        err,
        ProjectServiceError::Repo(RepoError::Duplicate(_))
    ));

    let err = service.create_project("   ", "Otro").unwrap_err();
    assert!(matches!(
        err,
        ProjectServiceError::Validation(ModelValidationError::BlankProjectName)
    ));
}

#[test]
fn list_projects_is_sorted_by_name() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    service.create_project("Zeta", "Z").unwrap();
    service.create_project("Alfa", "A").unwrap();

    let names = service
        .list_projects()
        .unwrap()
        .into_iter()
        .map(|project| project.name)
        .collect::<Vec<_>>();
    assert_eq!(names, ["Alfa", "Zeta"]);
}

#[test]
fn set_phase_persists_and_updates_roadmap() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    service.create_project("Acme Retail", "Acme SA").unwrap();

    let updated = service.set_phase("Acme Retail", 3).unwrap();
    assert_eq!(updated.project.current_phase, ProjectPhase::Implementation);

    let reloaded = service.roadmap("Acme Retail").unwrap();
    let statuses = reloaded
        .steps
        .iter()
        .map(|step| step.status)
        .collect::<Vec<_>>();
    assert_eq!(
        statuses,
        [
            PhaseStatus::Done,
            PhaseStatus::Done,
            PhaseStatus::Current,
            PhaseStatus::Upcoming
        ]
    );
}

#[test]
fn set_phase_rejects_out_of_range_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    service.create_project("Acme Retail", "Acme SA").unwrap();

    for phase_id in [0, 5, -1] {
        let err = service.set_phase("Acme Retail", phase_id).unwrap_err();
        assert!(matches!(
            err,
            ProjectServiceError::Validation(ModelValidationError::PhaseOutOfRange(_))
        ));
    }
    assert_eq!(
        service.roadmap("Acme Retail").unwrap().project.current_phase,
        ProjectPhase::Diagnosis
    );
}

#[test]
fn unknown_project_is_reported_by_name() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service.sessions("Nadie").unwrap_err();
    assert!(matches!(err, ProjectServiceError::ProjectNotFound(name) if name == "Nadie"));
}

#[test]
fn next_session_agenda_is_replaced_on_save() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    service.create_project("Acme Retail", "Acme SA").unwrap();
    assert_eq!(service.next_session("Acme Retail").unwrap(), None);

    let date = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
    let topics = vec![
        "Precios".to_string(),
        "   ".to_string(),
        "Stock".to_string(),
    ];
    let saved = service
        .save_next_session("Acme Retail", Some(date), &topics)
        .unwrap();
    assert_eq!(saved.topics, ["Precios", "Stock"]);
    assert_eq!(service.next_session("Acme Retail").unwrap(), Some(saved));

    let replaced = service
        .save_next_session("Acme Retail", None, &["Cierre".to_string()])
        .unwrap();
    let loaded = service.next_session("Acme Retail").unwrap().unwrap();
    assert_eq!(loaded, replaced);
    assert_eq!(loaded.date, None);
}

#[test]
fn next_session_agenda_caps_topics() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    service.create_project("Acme Retail", "Acme SA").unwrap();

    let topics = ["a", "b", "c", "d"].map(String::from);
    let err = service
        .save_next_session("Acme Retail", None, &topics)
        .unwrap_err();
    assert!(matches!(
        err,
        ProjectServiceError::Validation(ModelValidationError::TooManyTopics(4))
    ));
}
