//! Account and payment commands.
//!
//! # Usage
//!
//! ```bash
//! school-portal create-teacher --name "Grace Bello" --username gbello --password s3cret \
//!     --class 2 --subject 1 --subject 4
//! school-portal pay --student "Ada Obi" --amount 25000 --email parent@example.com
//! ```

use rust_decimal::Decimal;
use secrecy::SecretString;

use school_portal::PortalError;
use school_portal::api::{NewStudent, NewTeacher, PaymentRequest};
use school_portal_core::{ClassId, Email, SubjectId, View};

use super::{CommandError, Context, render};

/// Create a teacher account.
///
/// # Errors
///
/// Returns error if the signed-in user may not open the admin view or the
/// API call fails.
pub async fn create_teacher(
    ctx: &Context,
    name: String,
    username: String,
    password: String,
    class_id: Option<ClassId>,
    subject_ids: Vec<SubjectId>,
) -> Result<(), CommandError> {
    ctx.enter(View::Admin)?;
    let teacher = NewTeacher {
        name,
        username,
        password: SecretString::from(password),
        class_id,
        subject_ids,
    };
    let result = ctx.portal.loaders().create_teacher(&teacher).await;
    render(&ctx.snapshot());
    result.map_err(PortalError::from)?;
    Ok(())
}

/// Create a student account.
///
/// # Errors
///
/// Returns error if the signed-in user may not open the admin view or the
/// API call fails.
pub async fn create_student(
    ctx: &Context,
    name: String,
    username: String,
    password: String,
    class_id: Option<ClassId>,
) -> Result<(), CommandError> {
    ctx.enter(View::Admin)?;
    let student = NewStudent {
        name,
        username,
        password: SecretString::from(password),
        class_id,
    };
    let result = ctx.portal.loaders().create_student(&student).await;
    render(&ctx.snapshot());
    result.map_err(PortalError::from)?;
    Ok(())
}

/// Start a fee payment.
///
/// # Errors
///
/// Returns error if the signed-in user may not open the payments view or the
/// API call fails.
pub async fn pay(
    ctx: &Context,
    student: String,
    amount: Decimal,
    email: Email,
) -> Result<(), CommandError> {
    ctx.enter(View::Payments)?;
    let payment = PaymentRequest {
        student,
        amount,
        email,
    };
    let result = ctx.portal.loaders().initiate_payment(&payment).await;
    render(&ctx.snapshot());
    result.map_err(PortalError::from)?;
    Ok(())
}
