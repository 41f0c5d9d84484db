//! Candidate intake: field validation and ordered persistence of a candidate with its
//! education, work experience and résumé records.
//!
//! Nothing is wrapped in a transaction. A failure after the candidate row has been saved
//! leaves that row in place without the children that were not reached.

pub mod domain;
pub mod repository;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Candidate, CandidateId, CandidateInput, CandidatePatch, CandidateWrite, Education,
    EducationId, EducationInput, IntakeMode, NewCandidate, NewEducation, NewResume,
    NewWorkExperience, Resume, ResumeId, ResumeInput, WorkExperience, WorkExperienceId,
    WorkExperienceInput,
};
pub use repository::{CandidateRepository, StorageError};
pub use service::{CandidateIntakeService, IntakeError};
pub use validation::{
    validate_candidate, CandidateValidator, EntryKind, FieldRules, NameField, ValidationError,
};
