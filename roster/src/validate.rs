//! Form validation applied before any request is sent.

use crate::error::{RosterError, Result};
use crate::types::Role;

/// Minimum password length accepted by the forms.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Equivalent of `^[^\s@]+@[^\s@]+\.[^\s@]+$`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    // Some dot must have non-empty text on both sides.
    domain
        .match_indices('.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}

pub fn require_filled(fields: &[&str]) -> Result<()> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(RosterError::validation("Please fill in all fields"));
    }
    Ok(())
}

pub fn email(email: &str) -> Result<()> {
    if !is_valid_email(email) {
        return Err(RosterError::validation("Please enter a valid email address"));
    }
    Ok(())
}

pub fn password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(RosterError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

pub fn roles_selected<S>(roles: &[S]) -> Result<()> {
    if roles.is_empty() {
        return Err(RosterError::validation("Please select at least one role"));
    }
    Ok(())
}

/// Name, email, password and role checks shared by user creation forms.
pub fn new_user(name: &str, email_addr: &str, pwd: &str, roles: &[String]) -> Result<()> {
    require_filled(&[name, email_addr, pwd])?;
    roles_selected(roles)?;
    email(email_addr)?;
    password(pwd)
}

pub fn role_fields(id: &str, name: &str) -> Result<()> {
    if id.trim().is_empty() || name.trim().is_empty() {
        return Err(RosterError::validation("Please enter role name and ID"));
    }
    Ok(())
}

pub fn role_id_unique(id: &str, catalog: &[Role]) -> Result<()> {
    if catalog.iter().any(|r| r.id == id) {
        return Err(RosterError::validation("Role ID must be unique"));
    }
    Ok(())
}

pub fn property_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(RosterError::validation("Please enter a property title"));
    }
    Ok(())
}
