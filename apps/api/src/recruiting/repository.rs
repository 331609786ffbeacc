use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use super::models::{
    non_blank, ActivityLogEntry, Candidate, NewCandidate, NewRequisition, Requisition,
    RequisitionStatus,
};
use super::seed;

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for requisitions so handlers can be exercised in isolation
/// and a real store can replace the in-memory one.
pub trait RequisitionRepository: Send + Sync {
    /// Newest first, optionally restricted to one status.
    fn list(&self, status: Option<RequisitionStatus>) -> Result<Vec<Requisition>, RepositoryError>;
    fn get(&self, id: &str) -> Result<Requisition, RepositoryError>;
    fn create(&self, new: NewRequisition) -> Result<Requisition, RepositoryError>;
}

/// Storage abstraction for candidates.
pub trait CandidateRepository: Send + Sync {
    /// Newest first, optionally restricted to candidates carrying `tag`.
    fn list(&self, tag: Option<&str>) -> Result<Vec<Candidate>, RepositoryError>;
    fn get(&self, id: &str) -> Result<Candidate, RepositoryError>;
    fn create(&self, new: NewCandidate) -> Result<Candidate, RepositoryError>;
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("lock poisoned".to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory requisitions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryRequisitions {
    records: RwLock<Vec<Requisition>>,
}

impl InMemoryRequisitions {
    pub fn new(records: Vec<Requisition>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed::sample_requisitions())
    }
}

impl RequisitionRepository for InMemoryRequisitions {
    fn list(&self, status: Option<RequisitionStatus>) -> Result<Vec<Requisition>, RepositoryError> {
        let records = self.records.read().map_err(poisoned)?;
        let mut matching: Vec<Requisition> = records
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        Ok(matching)
    }

    fn get(&self, id: &str) -> Result<Requisition, RepositoryError> {
        self.records
            .read()
            .map_err(poisoned)?
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Requisition {id}")))
    }

    fn create(&self, new: NewRequisition) -> Result<Requisition, RepositoryError> {
        let job_title = non_blank(new.job_title).ok_or(RepositoryError::MissingField("jobTitle"))?;
        let job_description = non_blank(new.job_description)
            .ok_or(RepositoryError::MissingField("jobDescription"))?;

        let requisition = Requisition {
            id: format!("req-{}", Uuid::new_v4().simple()),
            job_title,
            status: new.status.unwrap_or(RequisitionStatus::Draft),
            hiring_manager: non_blank(new.hiring_manager),
            location: non_blank(new.location),
            date_created: Utc::now(),
            date_modified: None,
            candidate_count: 0,
            average_crs: None,
            job_description,
            must_have_skills: non_blank(new.must_have_skills),
            nice_to_have_skills: non_blank(new.nice_to_have_skills),
        };

        self.records
            .write()
            .map_err(poisoned)?
            .push(requisition.clone());
        Ok(requisition)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory candidates
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryCandidates {
    records: RwLock<Vec<Candidate>>,
}

impl InMemoryCandidates {
    pub fn new(records: Vec<Candidate>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed::sample_candidates())
    }
}

impl CandidateRepository for InMemoryCandidates {
    fn list(&self, tag: Option<&str>) -> Result<Vec<Candidate>, RepositoryError> {
        let records = self.records.read().map_err(poisoned)?;
        let mut matching: Vec<Candidate> = records
            .iter()
            .filter(|c| tag.map_or(true, |t| c.has_tag(t)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date_added.cmp(&a.date_added));
        Ok(matching)
    }

    fn get(&self, id: &str) -> Result<Candidate, RepositoryError> {
        self.records
            .read()
            .map_err(poisoned)?
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Candidate {id}")))
    }

    fn create(&self, new: NewCandidate) -> Result<Candidate, RepositoryError> {
        let first_name =
            non_blank(new.first_name).ok_or(RepositoryError::MissingField("firstName"))?;
        let last_name = non_blank(new.last_name).ok_or(RepositoryError::MissingField("lastName"))?;
        let email = non_blank(new.email).ok_or(RepositoryError::MissingField("email"))?;

        let now = Utc::now();
        let candidate = Candidate {
            id: format!("cand-{}", Uuid::new_v4().simple()),
            first_name,
            last_name,
            email,
            phone: non_blank(new.phone),
            location: non_blank(new.location),
            resume_text: non_blank(new.resume_text),
            tags: new
                .tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            source: non_blank(new.source),
            date_added: now,
            last_activity_date: Some(now),
            crs_history: Vec::new(),
            applications: Vec::new(),
            activity_log: vec![ActivityLogEntry {
                date: now,
                activity: "Candidate added manually".to_string(),
                user: None,
                details: None,
            }],
            notes: non_blank(new.notes),
        };

        self.records
            .write()
            .map_err(poisoned)?
            .push(candidate.clone());
        Ok(candidate)
    }
}
