//! Recommendation engine: classifier label to base text, plus threshold tips
//! and the optional performance narrative.

use crate::data::{DatasetStore, StudentRecord};
use crate::encoding::feature_vector;
use crate::model::{Classifier, ModelError, RecommendationMap};

pub const STUDENT_NOT_FOUND: &str = "Student not found.";

/// Tip thresholds. Guards read raw record fields, never encoded ones, and the
/// exact values are observable behavior.
const VIDEO_MINUTES_THRESHOLD: f64 = 250.0;
const FORUM_POSTS_THRESHOLD: u32 = 5;
const ASSIGNMENT_RATE_THRESHOLD: f64 = 70.0;

/// Everything a request needs, built once at startup and shared read-only.
pub struct AdvisorContext {
    store: DatasetStore,
    classifier: Box<dyn Classifier>,
    recommendations: RecommendationMap,
}

impl AdvisorContext {
    pub fn new(
        store: DatasetStore,
        classifier: Box<dyn Classifier>,
        recommendations: RecommendationMap,
    ) -> Self {
        Self {
            store,
            classifier,
            recommendations,
        }
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Produces the recommendation text for one student. Unknown ids and
    /// classifier failures both come back as normal text, never as errors.
    pub fn recommend(&self, student_id: &str, verbose: bool) -> String {
        let Some(student) = self.store.get(student_id) else {
            return STUDENT_NOT_FOUND.to_string();
        };

        match self.classify(student) {
            Ok(label) => {
                let mut text = self.recommendations.base_text(label).to_string();
                append_tips(&mut text, student);
                if verbose {
                    text.push_str("\n\n");
                    text.push_str(&performance_narrative(student));
                }
                text
            }
            Err(e) => format!("Error generating recommendation: {e}"),
        }
    }

    fn classify(&self, student: &StudentRecord) -> Result<usize, ModelError> {
        self.classifier.predict(&feature_vector(student))
    }
}

/// Appends the tip section. Rule order is fixed: videos, forum, assignments.
fn append_tips(text: &mut String, student: &StudentRecord) {
    let mut tips = Vec::new();
    if student.time_spent_on_videos < VIDEO_MINUTES_THRESHOLD {
        tips.push("Watch more videos online to reinforce learning concepts.");
    }
    if student.forum_participation < FORUM_POSTS_THRESHOLD {
        tips.push("Link up with peers in forums or study groups to boost engagement.");
    }
    if student.assignment_completion_rate < ASSIGNMENT_RATE_THRESHOLD {
        tips.push("Prioritize completing assignments to improve understanding.");
    }
    if !tips.is_empty() {
        text.push_str(" Additional tips: ");
        text.push_str(&tips.join(" "));
    }
}

fn performance_narrative(student: &StudentRecord) -> String {
    format!(
        "Your performance summary: Feedback Score ({}/5) reflects course satisfaction, \
         Final Exam Score ({}/100) shows mastery, \
         Quiz Scores ({}/100) indicate short-term retention, \
         Assignment Completion ({}%) shows effort, \
         and Forum Participation ({}) reflects engagement.",
        student.feedback_score,
        student.final_exam_score,
        student.quiz_scores,
        student.assignment_completion_rate,
        student.forum_participation,
    )
}
