mod common;

use common::{at, seed, test_store};
use hrtrack_core::db::Store;
use hrtrack_core::model::people::Candidate;
use hrtrack_core::model::recruitment::{JobPosting, RecruitmentCampaign};
use hrtrack_core::repo::candidate_repo::{CandidateRepository, SqliteCandidateRepository};
use hrtrack_core::repo::job_posting_repo::{JobPostingRepository, SqliteJobPostingRepository};
use hrtrack_core::repo::position_repo::SqlitePositionRepository;
use hrtrack_core::repo::recruitment_campaign_repo::SqliteRecruitmentCampaignRepository;
use hrtrack_core::{Entity, FailOpen, RepoError, Repository};
use proptest::prelude::*;
use rust_decimal_macros::dec;

fn full_candidate() -> Candidate {
    let mut candidate = Candidate::new("Ada Lovelace", "ada@example.com");
    candidate.phone = Some("+44 20 0000 0000".to_string());
    candidate.date_of_birth = chrono::NaiveDate::from_ymd_opt(1990, 12, 10);
    candidate.gender = Some("F".to_string());
    candidate.address = Some("12 St James's Square".to_string());
    candidate.resume_path = Some("resumes/ada.pdf".to_string());
    candidate.skills = Some("rust, sql".to_string());
    candidate.years_of_experience = Some(7);
    candidate.education = Some("Mathematics".to_string());
    candidate
}

#[test]
fn add_then_get_by_id_returns_written_fields() {
    let fixture = test_store();
    let repo = SqliteCandidateRepository::new(fixture.store.clone());

    let candidate = full_candidate();
    let id = repo.add(&candidate).unwrap();
    assert!(id > 0);

    let loaded = repo.get_by_id(id).unwrap().unwrap();
    assert!(loaded.created_date.is_some());
    assert_eq!(loaded.updated_date, None);
    assert_eq!(
        loaded,
        Candidate {
            id,
            created_date: loaded.created_date,
            ..candidate
        }
    );
}

#[test]
fn add_ignores_caller_supplied_id() {
    let fixture = test_store();
    let repo = SqliteCandidateRepository::new(fixture.store.clone());

    let mut candidate = Candidate::new("Ada", "ada@example.com");
    candidate.id = 4242;
    let id = repo.add(&candidate).unwrap();

    assert_ne!(id, 4242);
    assert!(!repo.exists(4242).unwrap());
}

#[test]
fn get_by_id_for_missing_row_is_none() {
    let fixture = test_store();
    let repo = SqliteCandidateRepository::new(fixture.store.clone());

    assert_eq!(repo.get_by_id(999).unwrap(), None);
}

#[test]
fn update_writes_fields_and_stamps_updated_date() {
    let fixture = test_store();
    let repo = SqliteCandidateRepository::new(fixture.store.clone());
    let id = repo.add(&full_candidate()).unwrap();

    let mut candidate = repo.get_by_id(id).unwrap().unwrap();
    let created_date = candidate.created_date;
    candidate.skills = Some("rust, sql, sqlite".to_string());
    candidate.phone = None;
    assert!(repo.update(&candidate).unwrap());

    let loaded = repo.get_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.skills.as_deref(), Some("rust, sql, sqlite"));
    assert_eq!(loaded.phone, None);
    assert_eq!(loaded.created_date, created_date);
    assert!(loaded.updated_date.is_some());
}

#[test]
fn update_of_missing_row_reports_false() {
    let fixture = test_store();
    let repo = SqliteCandidateRepository::new(fixture.store.clone());

    let mut ghost = Candidate::new("Ghost", "ghost@example.com");
    ghost.id = 77;
    assert!(!repo.update(&ghost).unwrap());
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn delete_missing_id_returns_false_and_leaves_table_unchanged() {
    let fixture = test_store();
    let repo = SqliteCandidateRepository::new(fixture.store.clone());
    repo.add(&Candidate::new("Ada", "ada@example.com")).unwrap();
    let before = repo.get_all().unwrap();

    assert!(!repo.delete(12345).unwrap());
    assert_eq!(repo.get_all().unwrap(), before);
}

#[test]
fn delete_existing_id_removes_the_row() {
    let fixture = test_store();
    let repo = SqliteCandidateRepository::new(fixture.store.clone());
    let id = repo.add(&Candidate::new("Ada", "ada@example.com")).unwrap();

    assert!(repo.exists(id).unwrap());
    assert!(repo.delete(id).unwrap());
    assert_eq!(repo.get_by_id(id).unwrap(), None);
    assert!(!repo.exists(id).unwrap());
}

#[test]
fn identities_are_never_reused_after_delete() {
    let fixture = test_store();
    let repo = SqliteCandidateRepository::new(fixture.store.clone());
    let first = repo.add(&Candidate::new("Ada", "ada@example.com")).unwrap();
    repo.delete(first).unwrap();

    let second = repo.add(&Candidate::new("Alan", "alan@example.com")).unwrap();
    assert!(second > first);
}

#[test]
fn count_tracks_inserts_and_deletes() {
    let fixture = test_store();
    let repo = SqliteCandidateRepository::new(fixture.store.clone());
    assert_eq!(repo.count().unwrap(), 0);

    let a = repo.add(&Candidate::new("Ada", "ada@example.com")).unwrap();
    repo.add(&Candidate::new("Alan", "alan@example.com")).unwrap();
    assert_eq!(repo.count().unwrap(), 2);

    repo.delete(a).unwrap();
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn campaign_uses_its_declared_primary_key() {
    assert_eq!(RecruitmentCampaign::TABLE.primary_key, "CampaignID");

    let fixture = test_store();
    let repo = SqliteRecruitmentCampaignRepository::new(fixture.store.clone());
    let mut campaign = RecruitmentCampaign::new("Spring", at(2026, 3, 1, 0, 0), at(2026, 5, 31, 0, 0));
    campaign.budget = Some(dec!(25000.00));
    let id = repo.add(&campaign).unwrap();

    assert!(repo.exists(id).unwrap());
    assert_eq!(repo.count().unwrap(), 1);
    assert!(repo.delete(id).unwrap());
    assert!(!repo.exists(id).unwrap());
}

#[test]
fn navigation_is_populated_by_joined_reads_only() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let repo = SqliteJobPostingRepository::new(fixture.store.clone());

    let joined = repo.get_by_id(seed.job_posting_id).unwrap().unwrap();
    let navigation = joined.navigation.unwrap();
    assert_eq!(navigation.department_name, "Engineering");
    assert_eq!(navigation.position_name, "Software Engineer");
    assert_eq!(navigation.campaign_name, None);

    let plain = repo.get_by_department(seed.department_id).unwrap();
    assert_eq!(plain.len(), 1);
    assert_eq!(plain[0].navigation, None);
    assert_eq!(plain[0].title, "Backend Engineer");
}

#[test]
fn zero_campaign_reference_round_trips_as_none() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let repo = SqliteJobPostingRepository::new(fixture.store.clone());

    let posting = repo.get_by_id(seed.job_posting_id).unwrap().unwrap();
    assert_eq!(posting.campaign_id, 0);
    assert_eq!(posting.campaign(), None);

    let stored: Option<i64> = rusqlite::Connection::open(fixture.store.path())
        .unwrap()
        .query_row(
            "SELECT CampaignID FROM JobPosting WHERE JobPostingID = ?1;",
            [seed.job_posting_id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, None);
}

#[test]
fn store_failures_are_errors_unless_caller_opts_into_sentinels() {
    let dir = tempfile::tempdir().unwrap();
    let unreachable = Store::new(dir.path().join("missing").join("hrtrack.sqlite3"));
    let repo = SqliteCandidateRepository::new(unreachable);

    assert!(matches!(repo.get_all(), Err(RepoError::Db(_))));
    assert!(matches!(repo.get_by_email("ada@example.com"), Err(RepoError::Db(_))));

    assert!(repo.get_all().or_sentinel().is_empty());
    assert_eq!(repo.get_by_id(1).or_sentinel(), None);
    assert_eq!(repo.count().or_sentinel(), 0);
    assert!(!repo.exists(1).or_sentinel());
    assert_eq!(repo.add(&Candidate::new("Ada", "ada@example.com")).or_sentinel(), 0);
}

#[test]
fn positions_default_to_name_order() {
    let fixture = test_store();
    let repo = SqlitePositionRepository::new(fixture.store.clone());
    common::add_position(&fixture.store, "Tester");
    common::add_position(&fixture.store, "analyst");
    common::add_position(&fixture.store, "Manager");

    let names: Vec<String> = repo.get_all().unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["analyst", "Manager", "Tester"]);
}

#[test]
fn job_posting_update_can_attach_and_detach_campaign() {
    let fixture = test_store();
    let seed = seed(&fixture.store);
    let campaign_id = common::add_campaign(
        &fixture.store,
        "Autumn",
        at(2026, 9, 1, 0, 0),
        at(2026, 11, 30, 0, 0),
        "Running",
    );
    let repo = SqliteJobPostingRepository::new(fixture.store.clone());

    let mut posting: JobPosting = repo.get_by_id(seed.job_posting_id).unwrap().unwrap();
    posting.campaign_id = campaign_id;
    assert!(repo.update(&posting).unwrap());
    let attached = repo.get_by_id(seed.job_posting_id).unwrap().unwrap();
    assert_eq!(attached.campaign(), Some(campaign_id));
    assert_eq!(
        attached.navigation.unwrap().campaign_name.as_deref(),
        Some("Autumn")
    );

    posting.campaign_id = 0;
    assert!(repo.update(&posting).unwrap());
    assert_eq!(repo.get_by_id(seed.job_posting_id).unwrap().unwrap().campaign(), None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn find_matches_get_all_filtered(
        rows in prop::collection::vec(("[a-d]{1,5}", 0i64..15), 0..8),
        needle in "[a-d]",
        min_years in 0i64..15,
    ) {
        let fixture = test_store();
        let repo = SqliteCandidateRepository::new(fixture.store.clone());
        for (index, (name, years)) in rows.iter().enumerate() {
            let mut candidate = Candidate::new(name.as_str(), format!("c{index}@example.com"));
            candidate.years_of_experience = Some(*years);
            repo.add(&candidate).unwrap();
        }

        let predicate = |candidate: &Candidate| {
            candidate.full_name.contains(needle.as_str())
                && candidate.years_of_experience.unwrap_or(0) >= min_years
        };
        let expected: Vec<Candidate> = repo.get_all().unwrap().into_iter().filter(predicate).collect();
        prop_assert_eq!(repo.find(predicate).unwrap(), expected);
    }
}
