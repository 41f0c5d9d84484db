use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use talent_intake::workflows::intake::{
    Candidate, CandidateId, CandidateRepository, CandidateWrite, Education, EducationId,
    NewEducation, NewResume, NewWorkExperience, Resume, ResumeId, StorageError, WorkExperience,
    WorkExperienceId,
};

#[derive(Default)]
struct Tables {
    sequence: i64,
    candidates: HashMap<CandidateId, Candidate>,
    educations: Vec<Education>,
    work_experiences: Vec<WorkExperience>,
    resumes: Vec<Resume>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }

    fn email_taken(&self, email: &str, except: Option<CandidateId>) -> bool {
        self.candidates
            .values()
            .any(|candidate| candidate.email == email && Some(candidate.id) != except)
    }
}

/// Process-local candidate store. Ids come from one shared sequence across all tables and
/// email is unique across candidates. Root rows are kept without children; `fetch_candidate`
/// joins them back.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCandidateStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryCandidateStore {
    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StorageError> {
        self.tables
            .lock()
            .map_err(|_| StorageError::Unavailable("candidate store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl CandidateRepository for InMemoryCandidateStore {
    async fn save_candidate(&self, write: CandidateWrite) -> Result<Candidate, StorageError> {
        let mut tables = self.tables()?;
        match write {
            CandidateWrite::Create(candidate) => {
                if tables.email_taken(&candidate.email, None) {
                    return Err(StorageError::unique_violation("email"));
                }
                let id = CandidateId(tables.next_id());
                let stored = Candidate::from_new(id, candidate);
                tables.candidates.insert(id, stored.clone());
                Ok(stored)
            }
            CandidateWrite::Update { id, patch } => {
                if let Some(email) = patch.email.as_deref() {
                    if tables.email_taken(email, Some(id)) {
                        return Err(StorageError::unique_violation("email"));
                    }
                }
                let stored = tables
                    .candidates
                    .get_mut(&id)
                    .ok_or(StorageError::NotFound)?;
                stored.apply(patch);
                Ok(stored.clone())
            }
        }
    }

    async fn save_education(&self, education: NewEducation) -> Result<Education, StorageError> {
        let mut tables = self.tables()?;
        let stored = education.into_education(EducationId(tables.next_id()));
        tables.educations.push(stored.clone());
        Ok(stored)
    }

    async fn save_work_experience(
        &self,
        experience: NewWorkExperience,
    ) -> Result<WorkExperience, StorageError> {
        let mut tables = self.tables()?;
        let stored = experience.into_work_experience(WorkExperienceId(tables.next_id()));
        tables.work_experiences.push(stored.clone());
        Ok(stored)
    }

    async fn save_resume(&self, resume: NewResume) -> Result<Resume, StorageError> {
        let mut tables = self.tables()?;
        let stored = resume.into_resume(ResumeId(tables.next_id()));
        tables.resumes.push(stored.clone());
        Ok(stored)
    }

    async fn fetch_candidate(&self, id: CandidateId) -> Result<Option<Candidate>, StorageError> {
        let tables = self.tables()?;
        let Some(mut candidate) = tables.candidates.get(&id).cloned() else {
            return Ok(None);
        };

        candidate.educations = tables
            .educations
            .iter()
            .filter(|row| row.candidate_id == id)
            .cloned()
            .collect();
        candidate.work_experiences = tables
            .work_experiences
            .iter()
            .filter(|row| row.candidate_id == id)
            .cloned()
            .collect();
        candidate.resumes = tables
            .resumes
            .iter()
            .filter(|row| row.candidate_id == id)
            .cloned()
            .collect();
        Ok(Some(candidate))
    }
}
