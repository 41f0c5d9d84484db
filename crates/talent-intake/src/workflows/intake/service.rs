use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{
    Candidate, CandidateId, CandidateInput, CandidateWrite, NewEducation, NewResume,
    NewWorkExperience,
};
use super::repository::{CandidateRepository, StorageError};
use super::validation::{CandidateValidator, FieldRules, ValidationError};

/// Runs a submission through validation and persists the candidate with its children.
pub struct CandidateIntakeService<R, V = FieldRules> {
    repository: Arc<R>,
    validator: Arc<V>,
}

impl<R> CandidateIntakeService<R, FieldRules>
where
    R: CandidateRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_validator(repository, Arc::new(FieldRules))
    }
}

impl<R, V> CandidateIntakeService<R, V>
where
    R: CandidateRepository + 'static,
    V: CandidateValidator + 'static,
{
    pub fn with_validator(repository: Arc<R>, validator: Arc<V>) -> Self {
        Self {
            repository,
            validator,
        }
    }

    /// Validate, then save the candidate, its educations, work experiences and résumé in
    /// that order. Stops at the first failure; rows saved before it stay saved.
    pub async fn add_candidate(&self, input: CandidateInput) -> Result<Candidate, IntakeError> {
        let mode = input.mode();
        self.validator.validate(&input, mode)?;

        let mut candidate = self
            .repository
            .save_candidate(CandidateWrite::for_mode(mode, &input))
            .await
            .map_err(IntakeError::from_root_save)?;
        let candidate_id = candidate.id;
        debug!(%candidate_id, ?mode, "candidate persisted");

        for (index, entry) in input.educations.iter().enumerate() {
            let education = NewEducation::from_input(candidate_id, index, entry)?;
            let stored = self.repository.save_education(education).await?;
            debug!(%candidate_id, index, "education persisted");
            candidate.educations.push(stored);
        }

        for (index, entry) in input.work_experiences.iter().enumerate() {
            let experience = NewWorkExperience::from_input(candidate_id, index, entry)?;
            let stored = self.repository.save_work_experience(experience).await?;
            debug!(%candidate_id, index, "work experience persisted");
            candidate.work_experiences.push(stored);
        }

        if let Some(resume) = input
            .cv
            .as_ref()
            .and_then(|cv| NewResume::from_input(candidate_id, cv))
        {
            let stored = self.repository.save_resume(resume).await?;
            debug!(%candidate_id, "resume persisted");
            candidate.resumes.push(stored);
        }

        info!(
            %candidate_id,
            educations = candidate.educations.len(),
            work_experiences = candidate.work_experiences.len(),
            resumes = candidate.resumes.len(),
            "candidate intake completed"
        );
        Ok(candidate)
    }

    /// Fetch a stored candidate with its children.
    pub async fn get(&self, id: CandidateId) -> Result<Candidate, IntakeError> {
        let candidate = self
            .repository
            .fetch_candidate(id)
            .await?
            .ok_or(StorageError::NotFound)?;
        Ok(candidate)
    }
}

/// Error raised by the intake service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("The email already exists in the database")]
    DuplicateEmail,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IntakeError {
    fn from_root_save(error: StorageError) -> Self {
        if error.violates_unique("email") {
            IntakeError::DuplicateEmail
        } else {
            IntakeError::Storage(error)
        }
    }
}
