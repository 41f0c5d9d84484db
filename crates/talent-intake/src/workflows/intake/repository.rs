use async_trait::async_trait;

use super::domain::{
    Candidate, CandidateId, CandidateWrite, Education, NewEducation, NewResume,
    NewWorkExperience, Resume, WorkExperience,
};

/// Storage abstraction for the candidate aggregate, one save per entity kind.
///
/// `save_candidate` returns the root row only; the intake service attaches children as it
/// persists them.
#[async_trait]
pub trait CandidateRepository: Send + Sync {
    async fn save_candidate(&self, write: CandidateWrite) -> Result<Candidate, StorageError>;
    async fn save_education(&self, education: NewEducation) -> Result<Education, StorageError>;
    async fn save_work_experience(
        &self,
        experience: NewWorkExperience,
    ) -> Result<WorkExperience, StorageError>;
    async fn save_resume(&self, resume: NewResume) -> Result<Resume, StorageError>;
    async fn fetch_candidate(&self, id: CandidateId) -> Result<Option<Candidate>, StorageError>;
}

/// Failure reported by a storage backend. Display is the backend's message as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("{message}")]
    UniqueViolation { field: String, message: String },
    #[error("record not found")]
    NotFound,
    #[error("{0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn unique_violation(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("Unique constraint failed on the fields: (`{field}`)");
        StorageError::UniqueViolation { field, message }
    }

    pub fn violates_unique(&self, column: &str) -> bool {
        matches!(self, StorageError::UniqueViolation { field, .. } if field == column)
    }
}
