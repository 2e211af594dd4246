//! Remote data gateway for the school portal REST API.
//!
//! This module provides:
//! - [`ApiClient`] with one method per endpoint
//! - Request bodies for the account and payment endpoints
//! - [`ApiError`], which separates transport failures from application
//!   errors reported in an `{"error": "..."}` body
//!
//! # Endpoints
//!
//! | Method | Path | Returns |
//! |---|---|---|
//! | GET | `/classes` | `Vec<SchoolClass>` |
//! | GET | `/subjects` | `Vec<Subject>` |
//! | GET | `/timetable?class_id=` | `Vec<TimetableEntry>` |
//! | GET | `/assignments` | `Vec<Assignment>` |
//! | GET | `/notes?class_id=&subject_id=` | `Vec<LessonNote>` |
//! | GET | `/cbts` | `Vec<CbtExam>` |
//! | GET | `/reports` | `Vec<ReportCard>` |
//! | POST | `/login` | raw JSON |
//! | POST | `/create-teacher` | [`ActionResponse`] |
//! | POST | `/create-student` | [`ActionResponse`] |
//! | POST | `/initiate-payment` | `PaymentReceipt` |

mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{ActionResponse, NewStudent, NewTeacher, PaymentRequest};
