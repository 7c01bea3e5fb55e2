//! Cohort aggregations backing the dashboard charts. These read the same
//! immutable dataset the engine serves from; output ordering is sorted so
//! repeated calls render identically.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::StudentRecord;
use crate::encoding::DropoutLikelihood;

#[derive(Debug, Serialize, Clone)]
pub struct CohortAnalytics {
    pub total_students: usize,
    pub course_feedback: Vec<CourseFeedback>,
    pub learning_styles: Vec<LearningStyleSlice>,
    pub dropout_breakdown: Vec<DropoutBreakdown>,
    pub demographics: Vec<DemographicsSlice>,
    pub performance: PerformanceSummary,
}

/// Average feedback score per course (bar chart data).
#[derive(Debug, Serialize, Clone)]
pub struct CourseFeedback {
    pub course: String,
    pub students: usize,
    pub avg_feedback_score: f64,
}

/// Learning style counts (pie chart data).
#[derive(Debug, Serialize, Clone)]
pub struct LearningStyleSlice {
    pub learning_style: String,
    pub count: usize,
}

/// Dropout rate per course and education level (faceted bar data).
#[derive(Debug, Serialize, Clone)]
pub struct DropoutBreakdown {
    pub course: String,
    pub education_level: String,
    pub students: usize,
    pub dropout_rate: f64,
}

/// Student counts per course, gender, and age (grouped histogram data).
#[derive(Debug, Serialize, Clone)]
pub struct DemographicsSlice {
    pub course: String,
    pub gender: String,
    pub age: u32,
    pub count: usize,
}

/// The five radar-chart metrics, for one student or averaged over a cohort.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PerformanceSummary {
    pub feedback_score: f64,
    pub final_exam_score: f64,
    pub quiz_scores: f64,
    pub assignment_completion_rate: f64,
    pub forum_participation: f64,
}

pub fn cohort_analytics(records: &[StudentRecord]) -> CohortAnalytics {
    CohortAnalytics {
        total_students: records.len(),
        course_feedback: course_feedback(records),
        learning_styles: learning_style_distribution(records),
        dropout_breakdown: dropout_breakdown(records),
        demographics: demographics(records),
        performance: match records {
            [student] => student_performance(student),
            _ => mean_performance(records),
        },
    }
}

pub fn student_performance(student: &StudentRecord) -> PerformanceSummary {
    PerformanceSummary {
        feedback_score: student.feedback_score,
        final_exam_score: student.final_exam_score,
        quiz_scores: student.quiz_scores,
        assignment_completion_rate: student.assignment_completion_rate,
        forum_participation: student.forum_participation as f64,
    }
}

fn course_feedback(records: &[StudentRecord]) -> Vec<CourseFeedback> {
    let mut by_course: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for record in records {
        let entry = by_course.entry(record.course_name.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += record.feedback_score;
    }
    by_course
        .into_iter()
        .map(|(course, (students, total))| CourseFeedback {
            course: course.to_string(),
            students,
            avg_feedback_score: total / students as f64,
        })
        .collect()
}

fn learning_style_distribution(records: &[StudentRecord]) -> Vec<LearningStyleSlice> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.learning_style.to_string()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(learning_style, count)| LearningStyleSlice {
            learning_style,
            count,
        })
        .collect()
}

fn dropout_breakdown(records: &[StudentRecord]) -> Vec<DropoutBreakdown> {
    let mut groups: BTreeMap<(String, String), (usize, usize)> = BTreeMap::new();
    for record in records {
        let key = (record.course_name.clone(), record.education_level.to_string());
        let entry = groups.entry(key).or_insert((0, 0));
        entry.0 += 1;
        if record.dropout_likelihood == DropoutLikelihood::Yes {
            entry.1 += 1;
        }
    }
    groups
        .into_iter()
        .map(|((course, education_level), (students, at_risk))| DropoutBreakdown {
            course,
            education_level,
            students,
            dropout_rate: at_risk as f64 / students as f64,
        })
        .collect()
}

fn demographics(records: &[StudentRecord]) -> Vec<DemographicsSlice> {
    let mut groups: BTreeMap<(String, String, u32), usize> = BTreeMap::new();
    for record in records {
        let key = (
            record.course_name.clone(),
            record.gender.to_string(),
            record.age,
        );
        *groups.entry(key).or_insert(0) += 1;
    }
    groups
        .into_iter()
        .map(|((course, gender, age), count)| DemographicsSlice {
            course,
            gender,
            age,
            count,
        })
        .collect()
}

fn mean_performance(records: &[StudentRecord]) -> PerformanceSummary {
    let n = records.len() as f64;
    if records.is_empty() {
        return PerformanceSummary {
            feedback_score: 0.0,
            final_exam_score: 0.0,
            quiz_scores: 0.0,
            assignment_completion_rate: 0.0,
            forum_participation: 0.0,
        };
    }
    PerformanceSummary {
        feedback_score: records.iter().map(|r| r.feedback_score).sum::<f64>() / n,
        final_exam_score: records.iter().map(|r| r.final_exam_score).sum::<f64>() / n,
        quiz_scores: records.iter().map(|r| r.quiz_scores).sum::<f64>() / n,
        assignment_completion_rate: records
            .iter()
            .map(|r| r.assignment_completion_rate)
            .sum::<f64>()
            / n,
        forum_participation: records
            .iter()
            .map(|r| r.forum_participation as f64)
            .sum::<f64>()
            / n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::sample_student;
    use crate::encoding::{EducationLevel, Gender, LearningStyle};

    fn fixture() -> Vec<StudentRecord> {
        let mut a = sample_student("S001");
        a.course_name = "Python Basics".to_string();
        a.feedback_score = 5.0;
        a.learning_style = LearningStyle::Visual;
        a.gender = Gender::Male;
        a.age = 20;

        let mut b = sample_student("S002");
        b.course_name = "Python Basics".to_string();
        b.feedback_score = 3.0;
        b.learning_style = LearningStyle::Kinesthetic;
        b.dropout_likelihood = DropoutLikelihood::Yes;
        b.age = 20;

        let mut c = sample_student("S003");
        c.course_name = "Data Science".to_string();
        c.feedback_score = 4.0;
        c.learning_style = LearningStyle::Visual;
        c.education_level = EducationLevel::Postgraduate;

        vec![a, b, c]
    }

    #[test]
    fn course_feedback_averages_per_course() {
        let analytics = cohort_analytics(&fixture());
        assert_eq!(analytics.total_students, 3);
        assert_eq!(analytics.course_feedback.len(), 2);

        // BTreeMap keys come out sorted.
        let data_science = &analytics.course_feedback[0];
        assert_eq!(data_science.course, "Data Science");
        assert_eq!(data_science.students, 1);

        let python = &analytics.course_feedback[1];
        assert_eq!(python.course, "Python Basics");
        assert_eq!(python.students, 2);
        assert!((python.avg_feedback_score - 4.0).abs() < 1e-9);
    }

    #[test]
    fn learning_styles_are_counted() {
        let analytics = cohort_analytics(&fixture());
        let visual = analytics
            .learning_styles
            .iter()
            .find(|s| s.learning_style == "Visual")
            .unwrap();
        assert_eq!(visual.count, 2);
    }

    #[test]
    fn dropout_rate_is_per_course_and_level() {
        let analytics = cohort_analytics(&fixture());
        let python_undergrad = analytics
            .dropout_breakdown
            .iter()
            .find(|d| d.course == "Python Basics" && d.education_level == "Undergraduate")
            .unwrap();
        assert_eq!(python_undergrad.students, 2);
        assert!((python_undergrad.dropout_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn demographics_count_per_course_gender_and_age() {
        let analytics = cohort_analytics(&fixture());
        // Two Python Basics students, same age, different gender.
        let python_slices: Vec<_> = analytics
            .demographics
            .iter()
            .filter(|d| d.course == "Python Basics")
            .collect();
        assert_eq!(python_slices.len(), 2);
        assert!(python_slices
            .iter()
            .all(|d| d.age == 20 && d.count == 1));
        // BTreeMap ordering puts Female before Male within the course.
        assert_eq!(python_slices[0].gender, "Female");
        assert_eq!(python_slices[1].gender, "Male");

        let data_science = analytics
            .demographics
            .iter()
            .find(|d| d.course == "Data Science")
            .unwrap();
        assert_eq!(data_science.count, 1);
        assert_eq!(data_science.age, 22);
    }

    #[test]
    fn single_record_slice_serves_student_metrics() {
        let student = sample_student("S001");
        let analytics = cohort_analytics(std::slice::from_ref(&student));
        assert_eq!(analytics.total_students, 1);
        assert_eq!(analytics.performance, student_performance(&student));
    }

    #[test]
    fn single_student_summary_reads_raw_fields() {
        let student = sample_student("S001");
        let summary = student_performance(&student);
        assert_eq!(summary.feedback_score, 4.0);
        assert_eq!(summary.forum_participation, 12.0);
    }

    #[test]
    fn cohort_performance_averages_metrics() {
        let records = fixture();
        let summary = cohort_analytics(&records).performance;
        assert!((summary.feedback_score - 4.0).abs() < 1e-9);
    }
}
