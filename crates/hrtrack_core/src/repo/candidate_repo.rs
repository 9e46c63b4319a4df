//! Candidate persistence.
//!
//! # Invariants
//! - Email lookups are case-insensitive and trimmed. Uniqueness by email is a
//!   caller rule, checked with `email_exists` before `add`.

use super::base::{
    self, fmt_date, fmt_datetime, like_contains, now, opt_date, opt_datetime, opt_i64,
    opt_string, req_i64, req_string,
};
use super::{RepoResult, Repository};
use crate::db::Store;
use crate::model::people::Candidate;
use crate::model::{Entity, EntityId};
use rusqlite::{params, Row};

const CANDIDATE_SELECT_SQL: &str = "SELECT
    CandidateID,
    FullName,
    Email,
    Phone,
    DateOfBirth,
    Gender,
    Address,
    ResumePath,
    Skills,
    YearsOfExperience,
    Education,
    CreatedDate,
    UpdatedDate
FROM Candidate";

/// Candidate-specific lookups on top of the CRUD contract.
pub trait CandidateRepository: Repository<Entity = Candidate> {
    /// Case-insensitive exact email match.
    fn get_by_email(&self, email: &str) -> RepoResult<Option<Candidate>>;
    fn email_exists(&self, email: &str) -> RepoResult<bool>;
    /// Substring match over name, email and phone.
    fn search(&self, keyword: &str) -> RepoResult<Vec<Candidate>>;
}

pub struct SqliteCandidateRepository {
    store: Store,
}

impl SqliteCandidateRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Repository for SqliteCandidateRepository {
    type Entity = Candidate;

    fn store(&self) -> &Store {
        &self.store
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<Candidate>> {
        base::run(&self.store, Candidate::TABLE, "get_by_id", |conn| {
            base::query_first(
                conn,
                &format!("{CANDIDATE_SELECT_SQL} WHERE CandidateID = ?1;"),
                [id],
                map_candidate,
            )
        })
    }

    fn get_all(&self) -> RepoResult<Vec<Candidate>> {
        base::run(&self.store, Candidate::TABLE, "get_all", |conn| {
            base::query_all(
                conn,
                &format!("{CANDIDATE_SELECT_SQL} ORDER BY CreatedDate DESC, CandidateID DESC;"),
                [],
                map_candidate,
            )
        })
    }

    fn add(&self, candidate: &Candidate) -> RepoResult<EntityId> {
        base::run(&self.store, Candidate::TABLE, "add", |conn| {
            base::insert(
                conn,
                "INSERT INTO Candidate (
                    FullName,
                    Email,
                    Phone,
                    DateOfBirth,
                    Gender,
                    Address,
                    ResumePath,
                    Skills,
                    YearsOfExperience,
                    Education,
                    CreatedDate
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
                params![
                    candidate.full_name.as_str(),
                    candidate.email.trim(),
                    candidate.phone.as_deref(),
                    candidate.date_of_birth.map(fmt_date),
                    candidate.gender.as_deref(),
                    candidate.address.as_deref(),
                    candidate.resume_path.as_deref(),
                    candidate.skills.as_deref(),
                    candidate.years_of_experience,
                    candidate.education.as_deref(),
                    fmt_datetime(now()),
                ],
            )
        })
    }

    fn update(&self, candidate: &Candidate) -> RepoResult<bool> {
        base::run(&self.store, Candidate::TABLE, "update", |conn| {
            base::execute_affected(
                conn,
                "UPDATE Candidate
                 SET
                    FullName = ?2,
                    Email = ?3,
                    Phone = ?4,
                    DateOfBirth = ?5,
                    Gender = ?6,
                    Address = ?7,
                    ResumePath = ?8,
                    Skills = ?9,
                    YearsOfExperience = ?10,
                    Education = ?11,
                    UpdatedDate = ?12
                 WHERE CandidateID = ?1;",
                params![
                    candidate.id,
                    candidate.full_name.as_str(),
                    candidate.email.trim(),
                    candidate.phone.as_deref(),
                    candidate.date_of_birth.map(fmt_date),
                    candidate.gender.as_deref(),
                    candidate.address.as_deref(),
                    candidate.resume_path.as_deref(),
                    candidate.skills.as_deref(),
                    candidate.years_of_experience,
                    candidate.education.as_deref(),
                    fmt_datetime(now()),
                ],
            )
        })
    }
}

impl CandidateRepository for SqliteCandidateRepository {
    fn get_by_email(&self, email: &str) -> RepoResult<Option<Candidate>> {
        base::run(&self.store, Candidate::TABLE, "get_by_email", |conn| {
            base::query_first(
                conn,
                &format!(
                    "{CANDIDATE_SELECT_SQL}
                     WHERE Email = ?1 COLLATE NOCASE
                     ORDER BY CandidateID ASC
                     LIMIT 1;"
                ),
                [email.trim()],
                map_candidate,
            )
        })
    }

    fn email_exists(&self, email: &str) -> RepoResult<bool> {
        base::run(&self.store, Candidate::TABLE, "email_exists", |conn| {
            let found = base::query_scalar(
                conn,
                "SELECT EXISTS(SELECT 1 FROM Candidate WHERE Email = ?1 COLLATE NOCASE);",
                [email.trim()],
            )?;
            Ok(found == 1)
        })
    }

    fn search(&self, keyword: &str) -> RepoResult<Vec<Candidate>> {
        base::run(&self.store, Candidate::TABLE, "search", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{CANDIDATE_SELECT_SQL}
                     WHERE FullName LIKE ?1 ESCAPE '\\'
                        OR Email LIKE ?1 ESCAPE '\\'
                        OR Phone LIKE ?1 ESCAPE '\\'
                     ORDER BY FullName COLLATE NOCASE ASC, CandidateID ASC;"
                ),
                [like_contains(keyword)],
                map_candidate,
            )
        })
    }
}

fn map_candidate(row: &Row<'_>) -> RepoResult<Candidate> {
    Ok(Candidate {
        id: req_i64(row, "CandidateID")?,
        full_name: req_string(row, "FullName")?,
        email: req_string(row, "Email")?,
        phone: opt_string(row, "Phone")?,
        date_of_birth: opt_date(row, "DateOfBirth")?,
        gender: opt_string(row, "Gender")?,
        address: opt_string(row, "Address")?,
        resume_path: opt_string(row, "ResumePath")?,
        skills: opt_string(row, "Skills")?,
        years_of_experience: opt_i64(row, "YearsOfExperience")?,
        education: opt_string(row, "Education")?,
        created_date: opt_datetime(row, "CreatedDate")?,
        updated_date: opt_datetime(row, "UpdatedDate")?,
    })
}
