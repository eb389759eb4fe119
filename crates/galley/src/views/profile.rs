//! Crew profile.

use tracing::{info, warn};

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::model::{NewUser, User};

/// Load a crew member.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown id, or the backend error.
pub async fn show<B: Backend + ?Sized>(backend: &B, user_id: i64) -> Result<User> {
    backend
        .fetch_user(user_id)
        .await?
        .ok_or_else(|| Error::not_found("user", user_id))
}

/// Name of the configured crew member, for signing issue reports.
///
/// Lookup failures are logged and yield no name.
pub async fn reporter_name<B: Backend + ?Sized>(
    backend: &B,
    user_id: Option<i64>,
) -> Option<String> {
    let user_id = user_id?;
    match show(backend, user_id).await {
        Ok(user) => Some(user.name),
        Err(e) => {
            warn!("Reporting without a reporter, user {} unavailable: {}", user_id, e);
            None
        }
    }
}

/// All crew members, ordered by name.
///
/// # Errors
///
/// Returns the backend error.
pub async fn list<B: Backend + ?Sized>(backend: &B) -> Result<Vec<User>> {
    backend.fetch_users().await
}

/// Validate and register a crew member, returning the stored profile.
///
/// # Errors
///
/// Returns a validation error for missing fields or a malformed email, or
/// the backend error.
pub async fn register<B: Backend + ?Sized>(backend: &B, user: NewUser) -> Result<User> {
    let user = validate(user)?;
    let id = backend.insert_user(&user).await?;
    info!("Registered crew member {} ({})", user.name, user.employee_number);
    show(backend, id).await
}

fn validate(user: NewUser) -> Result<NewUser> {
    let required = |field: &'static str, value: String| -> Result<String> {
        let value = value.trim().to_string();
        if value.is_empty() {
            Err(Error::validation(field, "is required"))
        } else {
            Ok(value)
        }
    };

    let name = required("name", user.name)?;
    let email = required("email", user.email)?;
    let role = required("role", user.role)?;
    let employee_number = required("employee number", user.employee_number)?;

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => return Err(Error::validation("email", format!("{email:?} is not an address"))),
    }

    Ok(NewUser {
        name,
        email,
        role,
        employee_number,
        base: user
            .base
            .map(|b| b.trim().to_ascii_uppercase())
            .filter(|b| !b.is_empty()),
    })
}
