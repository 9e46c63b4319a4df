mod common;

use common::{add_application, add_campaign, add_employee, add_job_posting, at, seed, test_store};
use hrtrack_core::model::application::{EmailLog, Interview};
use hrtrack_core::model::recruitment::{CampaignJobPosting, JobPosting};
use hrtrack_core::model::{campaign_status, job_posting_status};
use hrtrack_core::repo::campaign_job_posting_repo::{
    CampaignJobPostingRepository, SqliteCampaignJobPostingRepository,
};
use hrtrack_core::repo::email_log_repo::{EmailLogRepository, SqliteEmailLogRepository};
use hrtrack_core::repo::interview_repo::{InterviewRepository, SqliteInterviewRepository};
use hrtrack_core::repo::job_posting_repo::{JobPostingRepository, SqliteJobPostingRepository};
use hrtrack_core::repo::recruitment_campaign_repo::{
    RecruitmentCampaignRepository, SqliteRecruitmentCampaignRepository,
};
use hrtrack_core::{RepoError, Repository};
use rust_decimal_macros::dec;

#[test]
fn active_campaigns_require_running_status_inside_window() {
    let fixture = test_store();
    let running = add_campaign(
        &fixture.store,
        "Spring",
        at(2026, 3, 1, 0, 0),
        at(2026, 5, 31, 0, 0),
        "running",
    );
    add_campaign(
        &fixture.store,
        "Planned",
        at(2026, 3, 1, 0, 0),
        at(2026, 5, 31, 0, 0),
        campaign_status::PLANNED,
    );
    add_campaign(
        &fixture.store,
        "Over",
        at(2025, 9, 1, 0, 0),
        at(2025, 11, 30, 0, 0),
        campaign_status::RUNNING,
    );
    let repo = SqliteRecruitmentCampaignRepository::new(fixture.store.clone());

    let active = repo.get_active_campaigns(at(2026, 4, 15, 12, 0)).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, running);
    assert!(active[0].is_active_at(at(2026, 4, 15, 12, 0)));

    assert!(repo.get_active_campaigns(at(2026, 6, 1, 0, 0)).unwrap().is_empty());
    assert_eq!(repo.get_by_status("RUNNING").unwrap().len(), 2);
}

#[test]
fn campaign_membership_rejects_duplicate_pairs() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let campaign_id = add_campaign(
        &fixture.store,
        "Spring",
        at(2026, 3, 1, 0, 0),
        at(2026, 5, 31, 0, 0),
        campaign_status::RUNNING,
    );
    let repo = SqliteCampaignJobPostingRepository::new(fixture.store.clone());
    let link = CampaignJobPosting::new(campaign_id, seed.job_posting_id, at(2026, 3, 2, 9, 0));

    assert!(!repo.is_in_campaign(campaign_id, seed.job_posting_id).unwrap());
    let id = repo.add(&link).unwrap();
    assert!(id > 0);
    assert!(repo.is_in_campaign(campaign_id, seed.job_posting_id).unwrap());

    let err = repo.add(&link).unwrap_err();
    assert!(matches!(err, RepoError::Duplicate { entity: "CampaignJobPosting", .. }));
    assert_eq!(repo.count_by_campaign(campaign_id).unwrap(), 1);
}

#[test]
fn campaign_membership_queries_cross_both_directions() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let second_posting = add_job_posting(
        &fixture.store,
        "Data Engineer",
        seed.department_id,
        seed.position_id,
    );
    let spring = add_campaign(
        &fixture.store,
        "Spring",
        at(2026, 3, 1, 0, 0),
        at(2026, 5, 31, 0, 0),
        campaign_status::RUNNING,
    );
    let autumn = add_campaign(
        &fixture.store,
        "Autumn",
        at(2026, 9, 1, 0, 0),
        at(2026, 11, 30, 0, 0),
        campaign_status::PLANNED,
    );
    let repo = SqliteCampaignJobPostingRepository::new(fixture.store.clone());
    repo.add(&CampaignJobPosting::new(spring, seed.job_posting_id, at(2026, 3, 2, 9, 0)))
        .unwrap();
    repo.add(&CampaignJobPosting::new(spring, second_posting, at(2026, 3, 3, 9, 0)))
        .unwrap();
    repo.add(&CampaignJobPosting::new(autumn, seed.job_posting_id, at(2026, 9, 2, 9, 0)))
        .unwrap();

    let links = repo.get_by_campaign(spring).unwrap();
    assert_eq!(links.len(), 2);
    let navigation = links[0].navigation.as_ref().unwrap();
    assert_eq!(navigation.campaign_name, "Spring");
    assert_eq!(navigation.job_title, "Backend Engineer");

    let titles: Vec<String> = repo
        .get_job_postings_by_campaign(spring)
        .unwrap()
        .into_iter()
        .map(|posting| posting.title)
        .collect();
    assert_eq!(titles, vec!["Backend Engineer", "Data Engineer"]);

    let campaigns: Vec<String> = repo
        .get_campaigns_by_job_posting(seed.job_posting_id)
        .unwrap()
        .into_iter()
        .map(|campaign| campaign.name)
        .collect();
    assert_eq!(campaigns, vec!["Autumn", "Spring"]);

    assert!(repo.remove_from_campaign(spring, second_posting).unwrap());
    assert!(!repo.remove_from_campaign(spring, second_posting).unwrap());
    assert_eq!(repo.count_by_campaign(spring).unwrap(), 1);
}

#[test]
fn open_postings_exclude_closed_and_expired() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let repo = SqliteJobPostingRepository::new(fixture.store.clone());

    let mut expired = JobPosting::new("Expired", seed.department_id, seed.position_id);
    expired.deadline = Some(at(2026, 1, 31, 23, 59));
    repo.add(&expired).unwrap();

    let mut closed = JobPosting::new("Closed", seed.department_id, seed.position_id);
    closed.status = job_posting_status::CLOSED.to_string();
    repo.add(&closed).unwrap();

    let mut current = JobPosting::new("Current", seed.department_id, seed.position_id);
    current.deadline = Some(at(2026, 6, 30, 0, 0));
    current.min_salary = Some(dec!(60000));
    current.max_salary = Some(dec!(85000.50));
    current.vacancy_count = 3;
    let current_id = repo.add(&current).unwrap();

    let open: Vec<String> = repo
        .get_open(at(2026, 4, 1, 0, 0))
        .unwrap()
        .into_iter()
        .map(|posting| posting.title)
        .collect();
    assert_eq!(open.len(), 2);
    assert!(open.contains(&"Current".to_string()));
    assert!(open.contains(&"Backend Engineer".to_string()));

    assert_eq!(repo.get_by_status("closed").unwrap().len(), 1);

    let loaded = repo.get_by_id(current_id).unwrap().unwrap();
    assert_eq!(loaded.max_salary, Some(dec!(85000.50)));
    assert_eq!(loaded.vacancy_count, 3);
    assert_eq!(loaded.deadline, current.deadline);
}

#[test]
fn postings_linked_directly_to_a_campaign() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let campaign_id = add_campaign(
        &fixture.store,
        "Spring",
        at(2026, 3, 1, 0, 0),
        at(2026, 5, 31, 0, 0),
        campaign_status::RUNNING,
    );
    let repo = SqliteJobPostingRepository::new(fixture.store.clone());
    let mut posting = JobPosting::new("Platform Engineer", seed.department_id, seed.position_id);
    posting.campaign_id = campaign_id;
    let id = repo.add(&posting).unwrap();

    let linked = repo.get_by_campaign(campaign_id).unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].id, id);

    // Removing the campaign detaches the posting instead of deleting it.
    assert!(SqliteRecruitmentCampaignRepository::new(fixture.store.clone())
        .delete(campaign_id)
        .unwrap());
    assert_eq!(repo.get_by_id(id).unwrap().unwrap().campaign(), None);
}

#[test]
fn interviews_are_found_by_application_interviewer_and_schedule() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let application_id = add_application(
        &fixture.store,
        seed.candidate_id,
        seed.job_posting_id,
        at(2026, 4, 1, 9, 0),
    );
    let second_interviewer = add_employee(
        &fixture.store,
        "E-002",
        "Barbara Liskov",
        seed.department_id,
        seed.position_id,
    );
    let repo = SqliteInterviewRepository::new(fixture.store.clone());

    let mut phone_screen = Interview::new(application_id, seed.employee_id, "Phone", at(2026, 4, 8, 10, 0));
    phone_screen.duration_minutes = Some(30);
    phone_screen.result = Some("Pass".to_string());
    phone_screen.score = Some(dec!(4.5));
    repo.add(&phone_screen).unwrap();

    let mut onsite = Interview::new(application_id, second_interviewer, "Onsite", at(2026, 4, 20, 13, 0));
    onsite.round = 2;
    onsite.location = Some("Room 4".to_string());
    let onsite_id = repo.add(&onsite).unwrap();

    let rounds: Vec<i64> = repo
        .get_by_application(application_id)
        .unwrap()
        .iter()
        .map(|interview| interview.round)
        .collect();
    assert_eq!(rounds, vec![1, 2]);

    assert_eq!(repo.get_by_interviewer(second_interviewer).unwrap().len(), 1);

    let by_name = repo.get_by_interviewer_name("lisk").unwrap();
    assert_eq!(by_name.len(), 1);
    let navigation = by_name[0].navigation.as_ref().unwrap();
    assert_eq!(navigation.interviewer_name, "Barbara Liskov");
    assert_eq!(navigation.candidate_name, "Ada Lovelace");
    assert_eq!(navigation.job_title, "Backend Engineer");

    let upcoming = repo.get_upcoming(at(2026, 4, 10, 0, 0)).unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].id, onsite_id);

    assert_eq!(
        repo.get_by_date_range(at(2026, 4, 1, 0, 0), at(2026, 4, 30, 0, 0))
            .unwrap()
            .len(),
        2
    );
    assert!(repo.get_by_interviewer_name("%").unwrap().is_empty());
}

#[test]
fn email_log_tracks_failures() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let application_id = add_application(
        &fixture.store,
        seed.candidate_id,
        seed.job_posting_id,
        at(2026, 4, 1, 9, 0),
    );
    let repo = SqliteEmailLogRepository::new(fixture.store.clone());

    let mut confirmation = EmailLog::sent(
        application_id,
        "ada@example.com",
        "Application received",
        at(2026, 4, 1, 9, 5),
    );
    confirmation.body = Some("Thanks for applying.".to_string());
    let sent_id = repo.add(&confirmation).unwrap();
    repo.add(&EmailLog::failed(
        application_id,
        "ada@example.com",
        "Interview invitation",
        at(2026, 4, 6, 9, 0),
        "SMTP 451 temporary failure",
    ))
    .unwrap();

    let loaded = repo.get_by_id(sent_id).unwrap().unwrap();
    assert!(loaded.is_success);
    assert_eq!(loaded.body.as_deref(), Some("Thanks for applying."));
    assert_eq!(loaded.error_message, None);

    let failed = repo.get_failed().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].error_message.as_deref(), Some("SMTP 451 temporary failure"));
    assert_eq!(repo.count_failed().unwrap(), 1);

    assert_eq!(repo.get_by_application(application_id).unwrap().len(), 2);
    assert_eq!(
        repo.get_by_date_range(at(2026, 4, 1, 0, 0), at(2026, 4, 2, 0, 0))
            .unwrap()
            .len(),
        1
    );
}
