//! Records returned by the portal API.
//!
//! The backend is loose about optional fields, so everything beyond an ID and
//! a name/title defaults when absent. Each record implements `Display` as the
//! one-line summary shown in lists.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{AssignmentId, CbtId, ClassId, NoteId, ReportId, SubjectId};

/// A school class (form/grade group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: ClassId,
    pub name: String,
}

impl SchoolClass {
    #[must_use]
    pub fn new(id: impl Into<ClassId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A taught subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
}

impl Subject {
    #[must_use]
    pub fn new(id: impl Into<SubjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One period in a class timetable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableEntry {
    pub day: String,
    #[serde(alias = "time")]
    pub period: Option<String>,
    #[serde(alias = "subject_name")]
    pub subject: Option<String>,
    #[serde(alias = "teacher_name")]
    pub teacher: Option<String>,
}

impl fmt::Display for TimetableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.day)?;
        if let Some(period) = &self.period {
            write!(f, " {period}")?;
        }
        write!(f, ": {}", self.subject.as_deref().unwrap_or("Free period"))?;
        if let Some(teacher) = &self.teacher {
            write!(f, " ({teacher})")?;
        }
        Ok(())
    }
}

/// A piece of set work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default, alias = "subject")]
    pub subject_name: Option<String>,
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(subject) = &self.subject_name {
            write!(f, "[{subject}] ")?;
        }
        f.write_str(&self.title)?;
        if let Some(due) = &self.due_date {
            write!(f, " - due {due}")?;
        }
        Ok(())
    }
}

/// Lesson notes published by a teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonNote {
    pub id: NoteId,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, alias = "subject")]
    pub subject_name: Option<String>,
}

impl fmt::Display for LessonNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)?;
        if let Some(content) = &self.content {
            write!(f, ": {content}")?;
        }
        Ok(())
    }
}

/// A computer-based test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbtExam {
    pub id: CbtId,
    pub title: String,
    #[serde(default, alias = "subject")]
    pub subject_name: Option<String>,
    #[serde(default, alias = "duration")]
    pub duration_minutes: Option<u32>,
}

impl fmt::Display for CbtExam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)?;
        if let Some(subject) = &self.subject_name {
            write!(f, " ({subject})")?;
        }
        if let Some(minutes) = self.duration_minutes {
            write!(f, " - {minutes} min")?;
        }
        Ok(())
    }
}

/// A term report card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportCard {
    pub id: ReportId,
    #[serde(default, alias = "student")]
    pub student_name: Option<String>,
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub average: Option<f64>,
    #[serde(default)]
    pub remark: Option<String>,
}

impl fmt::Display for ReportCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.student_name.as_deref().unwrap_or("Student"))?;
        if let Some(term) = &self.term {
            write!(f, ", {term}")?;
        }
        if let Some(average) = self.average {
            write!(f, ": {average:.1}%")?;
        }
        if let Some(remark) = &self.remark {
            write!(f, " ({remark})")?;
        }
        Ok(())
    }
}

/// Result of starting a fee payment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentReceipt {
    pub reference: Option<String>,
    #[serde(alias = "authorizationUrl")]
    pub authorization_url: Option<String>,
    pub message: Option<String>,
    pub amount: Option<Decimal>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_class_decodes_numeric_id() {
        let class: SchoolClass = serde_json::from_str(r#"{"id": 1, "name": "JSS 1"}"#).unwrap();
        assert_eq!(class, SchoolClass::new("1", "JSS 1"));
    }

    #[test]
    fn test_timetable_entry_aliases_and_display() {
        let entry: TimetableEntry = serde_json::from_str(
            r#"{"day": "Monday", "time": "08:00", "subject_name": "Mathematics", "teacher_name": "Mrs. Okafor"}"#,
        )
        .unwrap();
        assert_eq!(entry.to_string(), "Monday 08:00: Mathematics (Mrs. Okafor)");

        let free: TimetableEntry = serde_json::from_str(r#"{"day": "Friday"}"#).unwrap();
        assert_eq!(free.to_string(), "Friday: Free period");
    }

    #[test]
    fn test_assignment_display() {
        let assignment: Assignment = serde_json::from_str(
            r#"{"id": "a1", "title": "Fractions worksheet", "due_date": "2026-10-30", "subject": "Mathematics"}"#,
        )
        .unwrap();
        assert_eq!(
            assignment.to_string(),
            "[Mathematics] Fractions worksheet - due 2026-10-30"
        );
    }

    #[test]
    fn test_report_card_display() {
        let report: ReportCard = serde_json::from_str(
            r#"{"id": 9, "student": "Ada", "term": "First Term", "average": 71.4, "remark": "Good"}"#,
        )
        .unwrap();
        assert_eq!(report.to_string(), "Ada, First Term: 71.4% (Good)");
    }

    #[test]
    fn test_payment_receipt_defaults() {
        let receipt: PaymentReceipt =
            serde_json::from_str(r#"{"authorizationUrl": "https://pay.example/x"}"#).unwrap();
        assert_eq!(
            receipt.authorization_url.as_deref(),
            Some("https://pay.example/x")
        );
        assert!(receipt.reference.is_none());
    }
}
