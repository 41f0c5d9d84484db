use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use super::domain::{
    CandidateInput, EducationInput, IntakeMode, ResumeInput, WorkExperienceInput,
};

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;
const ADDRESS_MAX_CHARS: usize = 100;
const DESCRIPTION_MAX_CHARS: usize = 200;

/// Which of the two name fields failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    FirstName,
    LastName,
}

/// Child list an entry-level failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Education,
    WorkExperience,
}

impl EntryKind {
    pub const fn list_key(self) -> &'static str {
        match self {
            EntryKind::Education => "educations",
            EntryKind::WorkExperience => "workExperiences",
        }
    }
}

/// First rule a submission broke. The message is fixed per rule; `field()` says where.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid name")]
    InvalidName(NameField),
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Invalid phone")]
    InvalidPhone,
    #[error("Invalid address")]
    InvalidAddress,
    #[error("Invalid institution")]
    InvalidInstitution { index: usize },
    #[error("Invalid title")]
    InvalidTitle { index: usize },
    #[error("Invalid date")]
    InvalidDate { entry: EntryKind, index: usize },
    #[error("Invalid end date")]
    InvalidEndDate { entry: EntryKind, index: usize },
    #[error("Invalid company")]
    InvalidCompany { index: usize },
    #[error("Invalid position")]
    InvalidPosition { index: usize },
    #[error("Invalid description")]
    InvalidDescription { index: usize },
    #[error("Invalid CV data")]
    InvalidCv,
}

impl ValidationError {
    /// Path of the offending field in the submitted payload, e.g. `educations[1].startDate`.
    pub fn field(&self) -> String {
        match self {
            ValidationError::InvalidName(NameField::FirstName) => "firstName".to_string(),
            ValidationError::InvalidName(NameField::LastName) => "lastName".to_string(),
            ValidationError::InvalidEmail => "email".to_string(),
            ValidationError::InvalidPhone => "phone".to_string(),
            ValidationError::InvalidAddress => "address".to_string(),
            ValidationError::InvalidInstitution { index } => {
                format!("educations[{index}].institution")
            }
            ValidationError::InvalidTitle { index } => format!("educations[{index}].title"),
            ValidationError::InvalidDate { entry, index } => {
                format!("{}[{index}].startDate", entry.list_key())
            }
            ValidationError::InvalidEndDate { entry, index } => {
                format!("{}[{index}].endDate", entry.list_key())
            }
            ValidationError::InvalidCompany { index } => {
                format!("workExperiences[{index}].company")
            }
            ValidationError::InvalidPosition { index } => {
                format!("workExperiences[{index}].position")
            }
            ValidationError::InvalidDescription { index } => {
                format!("workExperiences[{index}].description")
            }
            ValidationError::InvalidCv => "cv".to_string(),
        }
    }
}

/// Seam between the intake service and the field rules.
pub trait CandidateValidator: Send + Sync {
    fn validate(&self, input: &CandidateInput, mode: IntakeMode) -> Result<(), ValidationError>;
}

/// Creation-time field rules for candidate submissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldRules;

impl CandidateValidator for FieldRules {
    fn validate(&self, input: &CandidateInput, mode: IntakeMode) -> Result<(), ValidationError> {
        if let IntakeMode::Edit(_) = mode {
            return Ok(());
        }

        check_name(input.first_name.as_deref(), NameField::FirstName)?;
        check_name(input.last_name.as_deref(), NameField::LastName)?;
        check_email(input.email.as_deref())?;
        check_phone(input.phone.as_deref())?;
        check_address(input.address.as_deref())?;

        for (index, entry) in input.educations.iter().enumerate() {
            check_education(index, entry)?;
        }

        for (index, entry) in input.work_experiences.iter().enumerate() {
            check_work_experience(index, entry)?;
        }

        if let Some(cv) = input.cv.as_ref() {
            check_cv(cv)?;
        }

        Ok(())
    }
}

/// Validate a submission with the mode implied by its `id`.
pub fn validate_candidate(input: &CandidateInput) -> Result<(), ValidationError> {
    FieldRules.validate(input, input.mode())
}

/// Parse a strict `YYYY-MM-DD` string into a real calendar date.
pub(crate) fn calendar_date(raw: &str) -> Option<NaiveDate> {
    if !date_pattern().is_match(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn check_name(name: Option<&str>, field: NameField) -> Result<(), ValidationError> {
    let name = name.unwrap_or_default();
    let length = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&length) || !name_pattern().is_match(name) {
        return Err(ValidationError::InvalidName(field));
    }
    Ok(())
}

fn check_email(email: Option<&str>) -> Result<(), ValidationError> {
    match email {
        Some(email) if email_pattern().is_match(email) => Ok(()),
        _ => Err(ValidationError::InvalidEmail),
    }
}

fn check_phone(phone: Option<&str>) -> Result<(), ValidationError> {
    match optional(phone) {
        Some(phone) if !phone_pattern().is_match(phone) => Err(ValidationError::InvalidPhone),
        _ => Ok(()),
    }
}

fn check_address(address: Option<&str>) -> Result<(), ValidationError> {
    match optional(address) {
        Some(address) if address.chars().count() > ADDRESS_MAX_CHARS => {
            Err(ValidationError::InvalidAddress)
        }
        _ => Ok(()),
    }
}

fn check_education(index: usize, entry: &EducationInput) -> Result<(), ValidationError> {
    if optional(entry.institution.as_deref()).is_none() {
        return Err(ValidationError::InvalidInstitution { index });
    }
    if optional(entry.title.as_deref()).is_none() {
        return Err(ValidationError::InvalidTitle { index });
    }
    check_dates(
        EntryKind::Education,
        index,
        entry.start_date.as_deref(),
        entry.end_date.as_deref(),
    )
}

fn check_work_experience(index: usize, entry: &WorkExperienceInput) -> Result<(), ValidationError> {
    if optional(entry.company.as_deref()).is_none() {
        return Err(ValidationError::InvalidCompany { index });
    }
    if optional(entry.position.as_deref()).is_none() {
        return Err(ValidationError::InvalidPosition { index });
    }
    check_dates(
        EntryKind::WorkExperience,
        index,
        entry.start_date.as_deref(),
        entry.end_date.as_deref(),
    )?;
    if let Some(description) = optional(entry.description.as_deref()) {
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(ValidationError::InvalidDescription { index });
        }
    }
    Ok(())
}

fn check_dates(
    entry: EntryKind,
    index: usize,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(), ValidationError> {
    if start.and_then(calendar_date).is_none() {
        return Err(ValidationError::InvalidDate { entry, index });
    }
    if let Some(end) = optional(end) {
        if calendar_date(end).is_none() {
            return Err(ValidationError::InvalidEndDate { entry, index });
        }
    }
    Ok(())
}

fn check_cv(cv: &ResumeInput) -> Result<(), ValidationError> {
    if cv.is_blank() || cv.file_reference().is_some() {
        return Ok(());
    }
    Err(ValidationError::InvalidCv)
}

fn optional(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Basic Latin, Latin-1 and Latin Extended-A letters, each optionally followed by
    // combining marks so decomposed accents match too.
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[a-zA-ZÀ-ÖØ-öø-ÿ\x{0100}-\x{017F}]\p{M}*| )+$")
            .expect("name pattern compiles")
    })
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern compiles")
    })
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[679][0-9]{8}$").expect("phone pattern compiles"))
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern compiles")
    })
}
