mod common;

use common::{add_application, add_candidate, at, seed, test_store};
use hrtrack_core::model::application::{Application, ApplicationStatus};
use hrtrack_core::model::application_status;
use hrtrack_core::repo::application_repo::{ApplicationRepository, SqliteApplicationRepository};
use hrtrack_core::repo::application_status_repo::{
    ApplicationStatusRepository, SqliteApplicationStatusRepository,
};
use hrtrack_core::repo::user_repo::SqliteUserRepository;
use hrtrack_core::{ApplicationService, RepoError, Repository, ServiceError};
use rust_decimal_macros::dec;

fn service(
    store: &hrtrack_core::Store,
) -> ApplicationService<SqliteApplicationRepository, SqliteApplicationStatusRepository> {
    ApplicationService::new(
        SqliteApplicationRepository::new(store.clone()),
        SqliteApplicationStatusRepository::new(store.clone()),
    )
}

fn transition(
    application_id: i64,
    old_status: Option<&str>,
    new_status: &str,
    changed_date: chrono::NaiveDateTime,
) -> ApplicationStatus {
    ApplicationStatus::new(
        application_id,
        old_status.map(str::to_string),
        new_status,
        changed_date,
    )
}

#[test]
fn duplicate_application_scenario() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let repo = SqliteApplicationRepository::new(fixture.store.clone());

    assert!(!repo
        .check_duplicate_application(seed.candidate_id, seed.job_posting_id)
        .unwrap());

    let id = repo
        .add(&Application::new(
            seed.candidate_id,
            seed.job_posting_id,
            at(2026, 4, 2, 10, 0),
        ))
        .unwrap();
    assert!(id > 0);
    assert!(repo
        .check_duplicate_application(seed.candidate_id, seed.job_posting_id)
        .unwrap());

    let by_posting = repo.get_by_job_posting(seed.job_posting_id).unwrap();
    assert_eq!(by_posting.len(), 1);
    assert_eq!(by_posting[0].id, id);
    assert_eq!(by_posting[0].candidate_id, seed.candidate_id);
}

#[test]
fn application_round_trip_includes_candidate_and_job_navigation() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let repo = SqliteApplicationRepository::new(fixture.store.clone());

    let mut application = Application::new(seed.candidate_id, seed.job_posting_id, at(2026, 4, 2, 10, 0));
    application.score = Some(dec!(87.5));
    application.notes = Some("strong systems background".to_string());
    let id = repo.add(&application).unwrap();

    let loaded = repo.get_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.applied_date, application.applied_date);
    assert_eq!(loaded.current_status, application_status::SUBMITTED);
    assert_eq!(loaded.score, Some(dec!(87.5)));
    assert_eq!(loaded.notes, application.notes);

    let navigation = loaded.navigation.unwrap();
    assert_eq!(navigation.candidate_name, "Ada Lovelace");
    assert_eq!(navigation.candidate_email, "ada@example.com");
    assert_eq!(navigation.job_title, "Backend Engineer");
}

#[test]
fn status_filters_ignore_case_and_date_range_is_inclusive() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let repo = SqliteApplicationRepository::new(fixture.store.clone());
    let other = add_candidate(&fixture.store, "Alan Turing", "alan@example.com");

    let first = add_application(&fixture.store, seed.candidate_id, seed.job_posting_id, at(2026, 4, 1, 9, 0));
    let second = add_application(&fixture.store, other, seed.job_posting_id, at(2026, 4, 3, 9, 0));
    assert!(repo.update_status(second, "Screening").unwrap());

    let screening = repo.get_by_status("SCREENING").unwrap();
    assert_eq!(screening.len(), 1);
    assert_eq!(screening[0].id, second);
    assert_eq!(repo.count_by_status("screening").unwrap(), 1);
    assert_eq!(repo.count_by_status(application_status::SUBMITTED).unwrap(), 1);

    let in_range = repo
        .get_by_date_range(at(2026, 4, 1, 9, 0), at(2026, 4, 2, 0, 0))
        .unwrap();
    assert_eq!(in_range.len(), 1);
    assert_eq!(in_range[0].id, first);

    assert_eq!(repo.get_by_candidate(other).unwrap().len(), 1);
    assert!(!repo.update_status(9999, "Hired").unwrap());
}

#[test]
fn history_is_oldest_first_and_latest_is_max_changed_date() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let application_id = add_application(
        &fixture.store,
        seed.candidate_id,
        seed.job_posting_id,
        at(2026, 4, 1, 9, 0),
    );
    let statuses = SqliteApplicationStatusRepository::new(fixture.store.clone());

    assert_eq!(statuses.get_latest_status(application_id).unwrap(), None);

    statuses
        .add(&transition(application_id, Some("Screening"), "Interviewing", at(2026, 4, 5, 9, 0)))
        .unwrap();
    statuses
        .add(&transition(application_id, None, "Submitted", at(2026, 4, 1, 9, 0)))
        .unwrap();
    statuses
        .add(&transition(application_id, Some("Submitted"), "Screening", at(2026, 4, 3, 9, 0)))
        .unwrap();

    let history = statuses.get_by_application_id(application_id).unwrap();
    let order: Vec<&str> = history.iter().map(|entry| entry.new_status.as_str()).collect();
    assert_eq!(order, vec!["Submitted", "Screening", "Interviewing"]);
    assert!(history
        .windows(2)
        .all(|pair| pair[0].changed_date <= pair[1].changed_date));

    let latest = statuses.get_latest_status(application_id).unwrap().unwrap();
    assert_eq!(latest.new_status, "Interviewing");
    assert_eq!(latest.old_status.as_deref(), Some("Screening"));
    assert_eq!(statuses.count_by_application(application_id).unwrap(), 3);
}

#[test]
fn audit_rows_refuse_delete_and_only_comments_change() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let application_id = add_application(
        &fixture.store,
        seed.candidate_id,
        seed.job_posting_id,
        at(2026, 4, 1, 9, 0),
    );
    let statuses = SqliteApplicationStatusRepository::new(fixture.store.clone());
    let id = statuses
        .record_transition(application_id, None, "Submitted", Some(seed.user_id), None)
        .unwrap();

    let err = statuses.delete(id).unwrap_err();
    assert!(matches!(err, RepoError::AppendOnly { id: rejected, .. } if rejected == id));
    assert!(statuses.exists(id).unwrap());

    let mut entry = statuses.get_by_id(id).unwrap().unwrap();
    entry.new_status = "Hired".to_string();
    entry.comments = Some("referred by the team lead".to_string());
    assert!(statuses.update(&entry).unwrap());

    let reloaded = statuses.get_by_id(id).unwrap().unwrap();
    assert_eq!(reloaded.new_status, "Submitted");
    assert_eq!(reloaded.comments.as_deref(), Some("referred by the team lead"));
    assert!(reloaded.updated_date.is_some());
}

#[test]
fn actor_queries_and_navigation_survive_user_removal() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let application_id = add_application(
        &fixture.store,
        seed.candidate_id,
        seed.job_posting_id,
        at(2026, 4, 1, 9, 0),
    );
    let statuses = SqliteApplicationStatusRepository::new(fixture.store.clone());
    let id = statuses
        .record_transition(application_id, None, "Submitted", Some(seed.user_id), Some("import"))
        .unwrap();

    let by_actor = statuses.get_by_changed_by(seed.user_id).unwrap();
    assert_eq!(by_actor.len(), 1);
    assert_eq!(
        by_actor[0].navigation.as_ref().unwrap().changed_by_username.as_deref(),
        Some("ghopper")
    );

    assert!(SqliteUserRepository::new(fixture.store.clone())
        .delete(seed.user_id)
        .unwrap());

    let orphaned = statuses.get_by_id(id).unwrap().unwrap();
    assert_eq!(orphaned.changed_by, None);
    assert_eq!(orphaned.navigation.unwrap().changed_by_username, None);
    assert!(statuses.get_by_changed_by(seed.user_id).unwrap().is_empty());
}

#[test]
fn statistics_group_transitions_by_new_status() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let other = add_candidate(&fixture.store, "Alan Turing", "alan@example.com");
    let first = add_application(&fixture.store, seed.candidate_id, seed.job_posting_id, at(2026, 4, 1, 9, 0));
    let second = add_application(&fixture.store, other, seed.job_posting_id, at(2026, 4, 2, 9, 0));
    let statuses = SqliteApplicationStatusRepository::new(fixture.store.clone());

    for entry in [
        transition(first, None, "Submitted", at(2026, 4, 1, 9, 0)),
        transition(second, None, "Submitted", at(2026, 4, 2, 9, 0)),
        transition(first, Some("Submitted"), "Screening", at(2026, 4, 4, 9, 0)),
    ] {
        statuses.add(&entry).unwrap();
    }

    let counts = statuses.count_by_new_status().unwrap();
    assert_eq!(counts[0].status, "Submitted");
    assert_eq!(counts[0].count, 2);
    assert_eq!(counts[1].status, "Screening");
    assert_eq!(counts[1].count, 1);

    let stats = statuses.get_status_statistics().unwrap();
    let submitted = stats.iter().find(|s| s.status == "Submitted").unwrap();
    assert_eq!(submitted.transitions, 2);
    assert_eq!(submitted.applications, 2);
    assert_eq!(submitted.first_changed, at(2026, 4, 1, 9, 0));
    assert_eq!(submitted.last_changed, at(2026, 4, 2, 9, 0));

    let window = statuses
        .get_by_date_range(at(2026, 4, 2, 0, 0), at(2026, 4, 4, 9, 0))
        .unwrap();
    assert_eq!(window.len(), 2);
    assert!(window.iter().all(|entry| entry.navigation.is_none()));
}

#[test]
fn service_submit_writes_application_and_initial_audit_row() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let service = service(&fixture.store);

    let submitted = service
        .submit(
            &Application::new(seed.candidate_id, seed.job_posting_id, at(2026, 4, 2, 10, 0)),
            Some(seed.user_id),
        )
        .unwrap();
    assert!(submitted.id > 0);
    assert_eq!(submitted.current_status, application_status::SUBMITTED);

    let history = service.history(submitted.id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].old_status, None);
    assert_eq!(history[0].new_status, application_status::SUBMITTED);
    assert_eq!(history[0].changed_by, Some(seed.user_id));
}

#[test]
fn service_rejects_second_application_for_same_pair() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let service = service(&fixture.store);
    let application = Application::new(seed.candidate_id, seed.job_posting_id, at(2026, 4, 2, 10, 0));

    service.submit(&application, None).unwrap();
    let err = service.submit(&application, None).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::DuplicateApplication { candidate_id, job_posting_id }
            if candidate_id == seed.candidate_id && job_posting_id == seed.job_posting_id
    ));
    assert_eq!(service.applications().count().unwrap(), 1);
    assert_eq!(service.statuses().count().unwrap(), 1);
}

#[test]
fn service_status_change_updates_live_field_and_appends_transition() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let service = service(&fixture.store);
    let submitted = service
        .submit(
            &Application::new(seed.candidate_id, seed.job_posting_id, at(2026, 4, 2, 10, 0)),
            None,
        )
        .unwrap();

    let entry = service
        .change_status(
            submitted.id,
            application_status::SCREENING,
            Some(seed.user_id),
            Some("CV looks good"),
        )
        .unwrap();
    assert_eq!(entry.old_status.as_deref(), Some(application_status::SUBMITTED));
    assert_eq!(entry.new_status, application_status::SCREENING);
    assert_eq!(entry.comments.as_deref(), Some("CV looks good"));

    let live = service.applications().get_by_id(submitted.id).unwrap().unwrap();
    assert_eq!(live.current_status, application_status::SCREENING);

    let latest = service.latest_status(submitted.id).unwrap().unwrap();
    assert_eq!(latest.id, entry.id);
    assert_eq!(service.history(submitted.id).unwrap().len(), 2);
}

#[test]
fn service_status_change_for_missing_application_writes_nothing() {
    let fixture = test_store();
    seed(&fixture.store);
    let service = service(&fixture.store);

    let err = service
        .change_status(404, application_status::HIRED, None, None)
        .unwrap_err();
    assert!(matches!(err, ServiceError::ApplicationNotFound(404)));
    assert_eq!(service.statuses().count().unwrap(), 0);
}
