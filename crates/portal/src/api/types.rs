//! Request and response bodies for the account and payment endpoints.
//!
//! Passwords are held as [`SecretString`] and only exposed while the body is
//! serialized. `Debug` output redacts them.

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use school_portal_core::{ClassId, Email, SubjectId};

/// Body of `POST /create-teacher`.
#[derive(Clone)]
pub struct NewTeacher {
    pub name: String,
    pub username: String,
    pub password: SecretString,
    pub class_id: Option<ClassId>,
    pub subject_ids: Vec<SubjectId>,
}

impl std::fmt::Debug for NewTeacher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewTeacher")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("class_id", &self.class_id)
            .field("subject_ids", &self.subject_ids)
            .finish()
    }
}

impl Serialize for NewTeacher {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut body = serializer.serialize_struct("NewTeacher", 5)?;
        body.serialize_field("name", &self.name)?;
        body.serialize_field("username", &self.username)?;
        body.serialize_field("password", self.password.expose_secret())?;
        body.serialize_field("class_id", &self.class_id)?;
        body.serialize_field("subject_ids", &self.subject_ids)?;
        body.end()
    }
}

/// Body of `POST /create-student`.
#[derive(Clone)]
pub struct NewStudent {
    pub name: String,
    pub username: String,
    pub password: SecretString,
    pub class_id: Option<ClassId>,
}

impl std::fmt::Debug for NewStudent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewStudent")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("class_id", &self.class_id)
            .finish()
    }
}

impl Serialize for NewStudent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut body = serializer.serialize_struct("NewStudent", 4)?;
        body.serialize_field("name", &self.name)?;
        body.serialize_field("username", &self.username)?;
        body.serialize_field("password", self.password.expose_secret())?;
        body.serialize_field("class_id", &self.class_id)?;
        body.end()
    }
}

/// Body of `POST /initiate-payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    /// Student the fee is paid for (name or admission number).
    pub student: String,
    pub amount: Decimal,
    /// Where the receipt is sent.
    pub email: Email,
}

/// Generic response of the account endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ActionResponse {
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_new_teacher_body_exposes_password_only_on_the_wire() {
        let teacher = NewTeacher {
            name: "Grace Bello".to_string(),
            username: "gbello".to_string(),
            password: SecretString::from("s3cret-pass"),
            class_id: Some(ClassId::from(2)),
            subject_ids: vec![SubjectId::from(1), SubjectId::from(4)],
        };

        let body = serde_json::to_value(&teacher).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "Grace Bello",
                "username": "gbello",
                "password": "s3cret-pass",
                "class_id": "2",
                "subject_ids": ["1", "4"],
            })
        );

        let debug_output = format!("{teacher:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("s3cret-pass"));
    }

    #[test]
    fn test_new_student_debug_redacts_password() {
        let student = NewStudent {
            name: "Ada Obi".to_string(),
            username: "aobi".to_string(),
            password: SecretString::from("hunter2-hunter2"),
            class_id: None,
        };
        assert!(!format!("{student:?}").contains("hunter2"));
        let body = serde_json::to_value(&student).unwrap();
        assert_eq!(body["class_id"], json!(null));
    }

    #[test]
    fn test_payment_request_body() {
        let request = PaymentRequest {
            student: "Ada Obi".to_string(),
            amount: Decimal::new(2_500_000, 2),
            email: Email::parse("parent@example.com").unwrap(),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["amount"], json!("25000.00"));
        assert_eq!(body["email"], json!("parent@example.com"));
    }
}
