use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::validation::{calendar_date, EntryKind, ValidationError};

/// Identifier assigned to a candidate by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub i64);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EducationId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkExperienceId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeId(pub i64);

/// Candidate payload as submitted by a caller. Nothing here has been checked yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CandidateId>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub educations: Vec<EducationInput>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub work_experiences: Vec<WorkExperienceInput>,
    #[serde(default)]
    pub cv: Option<ResumeInput>,
}

impl CandidateInput {
    /// Whether this payload creates a new candidate or edits an existing one.
    pub fn mode(&self) -> IntakeMode {
        match self.id {
            Some(id) => IntakeMode::Edit(id),
            None => IntakeMode::Create,
        }
    }
}

/// Education entry as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationInput {
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Work experience entry as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperienceInput {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Reference to an already uploaded résumé file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeInput {
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
}

impl ResumeInput {
    /// `cv: {}` and a reference whose fields are all empty count as no résumé at all.
    pub fn is_blank(&self) -> bool {
        present(&self.file_path).is_none() && present(&self.file_type).is_none()
    }

    /// Path and MIME type, only when both were supplied.
    pub fn file_reference(&self) -> Option<(&str, &str)> {
        Some((present(&self.file_path)?, present(&self.file_type)?))
    }
}

/// Selected once per submission and handed to the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeMode {
    Create,
    Edit(CandidateId),
}

/// Root record for an insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCandidate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl NewCandidate {
    pub fn from_input(input: &CandidateInput) -> Self {
        Self {
            first_name: input.first_name.clone().unwrap_or_default(),
            last_name: input.last_name.clone().unwrap_or_default(),
            email: input.email.clone().unwrap_or_default(),
            phone: present(&input.phone).map(str::to_string),
            address: present(&input.address).map(str::to_string),
        }
    }
}

/// Fields to overwrite on an existing candidate; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl CandidatePatch {
    pub fn from_input(input: &CandidateInput) -> Self {
        Self {
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            phone: present(&input.phone).map(str::to_string),
            address: present(&input.address).map(str::to_string),
        }
    }
}

/// Root write handed to the persistence port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateWrite {
    Create(NewCandidate),
    Update { id: CandidateId, patch: CandidatePatch },
}

impl CandidateWrite {
    pub fn for_mode(mode: IntakeMode, input: &CandidateInput) -> Self {
        match mode {
            IntakeMode::Create => CandidateWrite::Create(NewCandidate::from_input(input)),
            IntakeMode::Edit(id) => CandidateWrite::Update {
                id,
                patch: CandidatePatch::from_input(input),
            },
        }
    }
}

/// Persisted candidate aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub educations: Vec<Education>,
    #[serde(default)]
    pub work_experiences: Vec<WorkExperience>,
    #[serde(default)]
    pub resumes: Vec<Resume>,
}

impl Candidate {
    /// Candidate as stored from an insert, before any child record exists.
    pub fn from_new(id: CandidateId, candidate: NewCandidate) -> Self {
        Self {
            id,
            first_name: candidate.first_name,
            last_name: candidate.last_name,
            email: candidate.email,
            phone: candidate.phone,
            address: candidate.address,
            educations: Vec::new(),
            work_experiences: Vec::new(),
            resumes: Vec::new(),
        }
    }

    pub fn apply(&mut self, patch: CandidatePatch) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if patch.phone.is_some() {
            self.phone = patch.phone;
        }
        if patch.address.is_some() {
            self.address = patch.address;
        }
    }
}

/// Education row waiting for its own identity. Only buildable once the owner has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEducation {
    pub candidate_id: CandidateId,
    pub institution: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl NewEducation {
    pub fn from_input(
        candidate_id: CandidateId,
        index: usize,
        entry: &EducationInput,
    ) -> Result<Self, ValidationError> {
        let (start_date, end_date) = entry_dates(
            EntryKind::Education,
            index,
            &entry.start_date,
            &entry.end_date,
        )?;

        Ok(Self {
            candidate_id,
            institution: entry.institution.clone().unwrap_or_default(),
            title: entry.title.clone().unwrap_or_default(),
            start_date,
            end_date,
        })
    }

    pub fn into_education(self, id: EducationId) -> Education {
        Education {
            id,
            candidate_id: self.candidate_id,
            institution: self.institution,
            title: self.title,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: EducationId,
    pub candidate_id: CandidateId,
    pub institution: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkExperience {
    pub candidate_id: CandidateId,
    pub company: String,
    pub position: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl NewWorkExperience {
    pub fn from_input(
        candidate_id: CandidateId,
        index: usize,
        entry: &WorkExperienceInput,
    ) -> Result<Self, ValidationError> {
        let (start_date, end_date) = entry_dates(
            EntryKind::WorkExperience,
            index,
            &entry.start_date,
            &entry.end_date,
        )?;

        Ok(Self {
            candidate_id,
            company: entry.company.clone().unwrap_or_default(),
            position: entry.position.clone().unwrap_or_default(),
            description: present(&entry.description).map(str::to_string),
            start_date,
            end_date,
        })
    }

    pub fn into_work_experience(self, id: WorkExperienceId) -> WorkExperience {
        WorkExperience {
            id,
            candidate_id: self.candidate_id,
            company: self.company,
            position: self.position,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: WorkExperienceId,
    pub candidate_id: CandidateId,
    pub company: String,
    pub position: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResume {
    pub candidate_id: CandidateId,
    pub file_path: String,
    pub file_type: String,
    pub upload_date: DateTime<Utc>,
}

impl NewResume {
    /// Returns `None` unless both the path and the type were supplied.
    pub fn from_input(candidate_id: CandidateId, cv: &ResumeInput) -> Option<Self> {
        let (file_path, file_type) = cv.file_reference()?;
        Some(Self {
            candidate_id,
            file_path: file_path.to_string(),
            file_type: file_type.to_string(),
            upload_date: Utc::now(),
        })
    }

    pub fn into_resume(self, id: ResumeId) -> Resume {
        Resume {
            id,
            candidate_id: self.candidate_id,
            file_path: self.file_path,
            file_type: self.file_type,
            upload_date: self.upload_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: ResumeId,
    pub candidate_id: CandidateId,
    pub file_path: String,
    pub file_type: String,
    pub upload_date: DateTime<Utc>,
}

/// A `null` list is the same as a missing one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

fn entry_dates(
    entry: EntryKind,
    index: usize,
    start: &Option<String>,
    end: &Option<String>,
) -> Result<(NaiveDate, Option<NaiveDate>), ValidationError> {
    let start_date = start
        .as_deref()
        .and_then(calendar_date)
        .ok_or(ValidationError::InvalidDate { entry, index })?;

    let end_date = match present(end) {
        Some(raw) => {
            Some(calendar_date(raw).ok_or(ValidationError::InvalidEndDate { entry, index })?)
        }
        None => None,
    };

    Ok((start_date, end_date))
}
