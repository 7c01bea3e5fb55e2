//! Dataset store: the read-only student table loaded once at startup.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encoding::{DropoutLikelihood, EducationLevel, EngagementLevel, Gender, LearningStyle};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset contains no student records")]
    Empty,
    #[error("duplicate student id {0}")]
    DuplicateId(String),
}

/// One row of the learning dataset. Field names mirror the CSV headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(rename = "Student_ID")]
    pub student_id: String,
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Education_Level")]
    pub education_level: EducationLevel,
    #[serde(rename = "Course_Name")]
    pub course_name: String,
    #[serde(rename = "Time_Spent_on_Videos")]
    pub time_spent_on_videos: f64,
    #[serde(rename = "Quiz_Attempts")]
    pub quiz_attempts: u32,
    #[serde(rename = "Quiz_Scores")]
    pub quiz_scores: f64,
    #[serde(rename = "Forum_Participation")]
    pub forum_participation: u32,
    #[serde(rename = "Assignment_Completion_Rate")]
    pub assignment_completion_rate: f64,
    #[serde(rename = "Engagement_Level")]
    pub engagement_level: EngagementLevel,
    #[serde(rename = "Final_Exam_Score")]
    pub final_exam_score: f64,
    #[serde(rename = "Learning_Style")]
    pub learning_style: LearningStyle,
    #[serde(rename = "Feedback_Score")]
    pub feedback_score: f64,
    #[serde(rename = "Dropout_Likelihood")]
    pub dropout_likelihood: DropoutLikelihood,
}

/// Immutable collection of student records with keyed lookup.
pub struct DatasetStore {
    records: Vec<StudentRecord>,
    index: HashMap<String, usize>,
}

impl DatasetStore {
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: StudentRecord = row?;
            records.push(record);
        }
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<StudentRecord>) -> Result<Self, DataError> {
        if records.is_empty() {
            return Err(DataError::Empty);
        }
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if index.insert(record.student_id.clone(), pos).is_some() {
                return Err(DataError::DuplicateId(record.student_id.clone()));
            }
        }
        Ok(Self { records, index })
    }

    pub fn get(&self, student_id: &str) -> Option<&StudentRecord> {
        self.index.get(student_id).map(|&pos| &self.records[pos])
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
