//! Conversational responder: keyword intents over the recommendation engine.

use crate::engine::{AdvisorContext, STUDENT_NOT_FOUND};

pub const MISSING_ID_PROMPT: &str = "Please provide a Student ID.";

const FALLBACK_HINT: &str = "Ask about tips, performance, or dropout risk for specific advice.";

/// Query category, matched case-insensitively. Priority is the variant order
/// here: a query mentioning both "recommend" and "performance" is Tips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Tips,
    Performance,
    Dropout,
    Fallback,
}

impl Intent {
    pub fn classify(query: &str) -> Self {
        let query = query.to_lowercase();
        if query.contains("tips") || query.contains("recommend") {
            Intent::Tips
        } else if query.contains("performance") {
            Intent::Performance
        } else if query.contains("dropout") {
            Intent::Dropout
        } else {
            Intent::Fallback
        }
    }
}

impl AdvisorContext {
    /// Answers a free-text query about one student. Pure function of the
    /// inputs and the loaded dataset; always returns text.
    /// Only a missing or empty id is terminal; anything else, whitespace
    /// included, goes to lookup.
    pub fn respond(&self, student_id: Option<&str>, query: &str) -> String {
        let student_id = match student_id {
            Some(id) if !id.is_empty() => id,
            _ => return MISSING_ID_PROMPT.to_string(),
        };
        let Some(student) = self.store().get(student_id) else {
            return STUDENT_NOT_FOUND.to_string();
        };

        match Intent::classify(query) {
            Intent::Tips => {
                format!("Recommendation: {}", self.recommend(student_id, false))
            }
            Intent::Performance => format!(
                "Performance for {}: Feedback Score: {}, Final Exam Score: {}, \
                 Quiz Scores: {}, Assignment Completion: {}%",
                student_id,
                student.feedback_score,
                student.final_exam_score,
                student.quiz_scores,
                student.assignment_completion_rate,
            ),
            Intent::Dropout => format!(
                "Dropout Likelihood for {}: {}",
                student_id, student.dropout_likelihood
            ),
            Intent::Fallback => format!(
                "Recommendation: {}\n{}",
                self.recommend(student_id, false),
                FALLBACK_HINT
            ),
        }
    }
}
