//! Fixed category encodings shared by training and inference.
//!
//! Codes are assigned alphabetically over the known category universe and
//! never change at runtime, so a vector encoded at serve time lines up with
//! the encodings the model was trained on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::StudentRecord;

/// Number of values produced by [`feature_vector`].
pub const FEATURE_WIDTH: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl Gender {
    pub fn code(self) -> f64 {
        match self {
            Gender::Female => 0.0,
            Gender::Male => 1.0,
            Gender::Other => 2.0,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Female => write!(f, "Female"),
            Gender::Male => write!(f, "Male"),
            Gender::Other => write!(f, "Other"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationLevel {
    #[serde(rename = "High School")]
    HighSchool,
    Postgraduate,
    Undergraduate,
}

impl EducationLevel {
    pub fn code(self) -> f64 {
        match self {
            EducationLevel::HighSchool => 0.0,
            EducationLevel::Postgraduate => 1.0,
            EducationLevel::Undergraduate => 2.0,
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EducationLevel::HighSchool => write!(f, "High School"),
            EducationLevel::Postgraduate => write!(f, "Postgraduate"),
            EducationLevel::Undergraduate => write!(f, "Undergraduate"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementLevel {
    High,
    Low,
    Medium,
}

impl EngagementLevel {
    pub fn code(self) -> f64 {
        match self {
            EngagementLevel::High => 0.0,
            EngagementLevel::Low => 1.0,
            EngagementLevel::Medium => 2.0,
        }
    }
}

impl fmt::Display for EngagementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngagementLevel::High => write!(f, "High"),
            EngagementLevel::Low => write!(f, "Low"),
            EngagementLevel::Medium => write!(f, "Medium"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearningStyle {
    Auditory,
    Kinesthetic,
    #[serde(rename = "Reading/Writing")]
    ReadingWriting,
    Visual,
}

impl LearningStyle {
    pub fn code(self) -> f64 {
        match self {
            LearningStyle::Auditory => 0.0,
            LearningStyle::Kinesthetic => 1.0,
            LearningStyle::ReadingWriting => 2.0,
            LearningStyle::Visual => 3.0,
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LearningStyle::Auditory => write!(f, "Auditory"),
            LearningStyle::Kinesthetic => write!(f, "Kinesthetic"),
            LearningStyle::ReadingWriting => write!(f, "Reading/Writing"),
            LearningStyle::Visual => write!(f, "Visual"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropoutLikelihood {
    No,
    Yes,
}

impl DropoutLikelihood {
    pub fn code(self) -> f64 {
        match self {
            DropoutLikelihood::No => 0.0,
            DropoutLikelihood::Yes => 1.0,
        }
    }
}

impl fmt::Display for DropoutLikelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropoutLikelihood::No => write!(f, "No"),
            DropoutLikelihood::Yes => write!(f, "Yes"),
        }
    }
}

/// Encodes a record into classifier input, dataset column order, with the
/// identifier and course name dropped.
pub fn feature_vector(student: &StudentRecord) -> Vec<f64> {
    vec![
        student.age as f64,
        student.gender.code(),
        student.education_level.code(),
        student.time_spent_on_videos,
        student.quiz_attempts as f64,
        student.quiz_scores,
        student.forum_participation as f64,
        student.assignment_completion_rate,
        student.engagement_level.code(),
        student.final_exam_score,
        student.learning_style.code(),
        student.feedback_score,
        student.dropout_likelihood.code(),
    ]
}
