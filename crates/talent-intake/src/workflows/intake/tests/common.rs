use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::workflows::intake::domain::{
    Candidate, CandidateId, CandidateInput, CandidateWrite, Education, EducationId,
    EducationInput, IntakeMode, NewCandidate, NewEducation, NewResume, NewWorkExperience,
    Resume, ResumeId, ResumeInput, WorkExperience, WorkExperienceId, WorkExperienceInput,
};
use crate::workflows::intake::repository::{CandidateRepository, StorageError};
use crate::workflows::intake::validation::{CandidateValidator, ValidationError};
use crate::workflows::intake::CandidateIntakeService;

pub(super) const CANDIDATE_ID: CandidateId = CandidateId(1);

pub(super) fn juan() -> CandidateInput {
    CandidateInput {
        first_name: Some("Juan".to_string()),
        last_name: Some("García".to_string()),
        email: Some("juan.garcia@email.com".to_string()),
        ..CandidateInput::default()
    }
}

pub(super) fn education(institution: &str, title: &str, start_date: &str) -> EducationInput {
    EducationInput {
        institution: Some(institution.to_string()),
        title: Some(title.to_string()),
        start_date: Some(start_date.to_string()),
        end_date: None,
    }
}

pub(super) fn complutense() -> EducationInput {
    education(
        "Universidad Complutense",
        "Ingeniería Informática",
        "2020-09-01",
    )
}

pub(super) fn work_experience(company: &str, position: &str, start_date: &str) -> WorkExperienceInput {
    WorkExperienceInput {
        company: Some(company.to_string()),
        position: Some(position.to_string()),
        description: None,
        start_date: Some(start_date.to_string()),
        end_date: None,
    }
}

pub(super) fn tech_corp() -> WorkExperienceInput {
    WorkExperienceInput {
        description: Some("Desarrollo web".to_string()),
        ..work_experience("Tech Corp", "Developer", "2022-01-01")
    }
}

pub(super) fn cv(file_path: Option<&str>, file_type: Option<&str>) -> ResumeInput {
    ResumeInput {
        file_path: file_path.map(str::to_string),
        file_type: file_type.map(str::to_string),
    }
}

pub(super) fn pdf_cv() -> ResumeInput {
    cv(Some("/uploads/cv.pdf"), Some("application/pdf"))
}

/// Every save the service attempted, in order, including the ones that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum RepositoryCall {
    Candidate(CandidateWrite),
    Education(NewEducation),
    WorkExperience(NewWorkExperience),
    Resume(NewResume),
}

#[derive(Default)]
pub(super) struct RecordingRepository {
    pub(super) candidate_failure: Option<StorageError>,
    pub(super) education_failure: Option<StorageError>,
    pub(super) work_experience_failure: Option<StorageError>,
    pub(super) resume_failure: Option<StorageError>,
    pub(super) calls: Mutex<Vec<RepositoryCall>>,
    pub(super) sequence: AtomicI64,
}

impl RecordingRepository {
    pub(super) fn calls(&self) -> Vec<RepositoryCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub(super) fn education_saves(&self) -> Vec<NewEducation> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RepositoryCall::Education(education) => Some(education),
                _ => None,
            })
            .collect()
    }

    pub(super) fn count_work_experience_saves(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, RepositoryCall::WorkExperience(_)))
            .count()
    }

    pub(super) fn count_resume_saves(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, RepositoryCall::Resume(_)))
            .count()
    }

    fn record(&self, call: RepositoryCall) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
    }

    fn next_id(&self) -> i64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl CandidateRepository for RecordingRepository {
    async fn save_candidate(&self, write: CandidateWrite) -> Result<Candidate, StorageError> {
        self.record(RepositoryCall::Candidate(write.clone()));
        if let Some(error) = self.candidate_failure.clone() {
            return Err(error);
        }

        Ok(match write {
            CandidateWrite::Create(candidate) => Candidate::from_new(CANDIDATE_ID, candidate),
            CandidateWrite::Update { id, patch } => {
                let mut candidate = Candidate::from_new(
                    id,
                    NewCandidate {
                        first_name: "Stored".to_string(),
                        last_name: "Candidate".to_string(),
                        email: "stored@email.com".to_string(),
                        phone: None,
                        address: None,
                    },
                );
                candidate.apply(patch);
                candidate
            }
        })
    }

    async fn save_education(&self, education: NewEducation) -> Result<Education, StorageError> {
        self.record(RepositoryCall::Education(education.clone()));
        if let Some(error) = self.education_failure.clone() {
            return Err(error);
        }
        Ok(education.into_education(EducationId(self.next_id())))
    }

    async fn save_work_experience(
        &self,
        experience: NewWorkExperience,
    ) -> Result<WorkExperience, StorageError> {
        self.record(RepositoryCall::WorkExperience(experience.clone()));
        if let Some(error) = self.work_experience_failure.clone() {
            return Err(error);
        }
        Ok(experience.into_work_experience(WorkExperienceId(self.next_id())))
    }

    async fn save_resume(&self, resume: NewResume) -> Result<Resume, StorageError> {
        self.record(RepositoryCall::Resume(resume.clone()));
        if let Some(error) = self.resume_failure.clone() {
            return Err(error);
        }
        Ok(resume.into_resume(ResumeId(self.next_id())))
    }

    async fn fetch_candidate(&self, _id: CandidateId) -> Result<Option<Candidate>, StorageError> {
        Ok(None)
    }
}

/// Validator double counting invocations; optionally rejects every submission.
#[derive(Default)]
pub(super) struct CountingValidator {
    rejection: Option<ValidationError>,
    calls: AtomicUsize,
    modes: Mutex<Vec<IntakeMode>>,
}

impl CountingValidator {
    pub(super) fn rejecting(error: ValidationError) -> Self {
        Self {
            rejection: Some(error),
            ..Self::default()
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn modes(&self) -> Vec<IntakeMode> {
        self.modes.lock().expect("modes mutex poisoned").clone()
    }
}

impl CandidateValidator for CountingValidator {
    fn validate(&self, _input: &CandidateInput, mode: IntakeMode) -> Result<(), ValidationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.modes.lock().expect("modes mutex poisoned").push(mode);
        match &self.rejection {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

pub(super) fn build_service(
    repository: RecordingRepository,
) -> (
    CandidateIntakeService<RecordingRepository>,
    Arc<RecordingRepository>,
) {
    let repository = Arc::new(repository);
    let service = CandidateIntakeService::new(repository.clone());
    (service, repository)
}

pub(super) fn build_counted_service(
    repository: RecordingRepository,
    validator: CountingValidator,
) -> (
    CandidateIntakeService<RecordingRepository, CountingValidator>,
    Arc<RecordingRepository>,
    Arc<CountingValidator>,
) {
    let repository = Arc::new(repository);
    let validator = Arc::new(validator);
    let service = CandidateIntakeService::with_validator(repository.clone(), validator.clone());
    (service, repository, validator)
}
