//! Login and self-registration against the user store.

use tracing::{info, warn};

use crate::error::{RosterError, Result};
use crate::rest::RosterHttpClient;
use crate::types::{NewUser, Role, User, SUPERADMIN_ROLE};
use crate::utils::now_iso8601;
use crate::validate;

/// Role given to self-registered users unless another is picked.
pub const DEFAULT_ROLE: &str = "user";

/// Find the user whose email and password both match exactly.
///
/// The backend stores plaintext passwords, so this is a direct comparison.
pub async fn login(client: &RosterHttpClient, email: &str, password: &str) -> Result<User> {
    if email.is_empty() || password.is_empty() {
        return Err(RosterError::validation("Please fill in all fields"));
    }

    let users = client.list_users().await?;
    info!(count = users.len(), "fetched users");

    match users
        .into_iter()
        .find(|u| u.email == email && u.password == password)
    {
        Some(user) => {
            info!(email = %user.email, "login successful");
            Ok(user)
        }
        None => {
            warn!(email, "invalid credentials");
            Err(RosterError::InvalidCredentials)
        }
    }
}

/// Self-registration form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl Registration {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: DEFAULT_ROLE.into(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate::require_filled(&[self.name.as_str(), self.email.as_str(), self.password.as_str()])?;
        validate::email(&self.email)?;
        validate::password(&self.password)?;
        if self.role == SUPERADMIN_ROLE {
            return Err(RosterError::Forbidden(
                "the superadmin role cannot be self-assigned".into(),
            ));
        }
        Ok(())
    }
}

/// Roles offered at registration: everything except `superadmin`.
pub fn registrable_roles(catalog: &[Role]) -> Vec<&Role> {
    catalog.iter().filter(|r| !r.is_superadmin()).collect()
}

/// Validate and submit a registration.
pub async fn register(client: &RosterHttpClient, form: &Registration) -> Result<()> {
    form.validate()?;

    let user = NewUser {
        name: form.name.clone(),
        email: form.email.clone(),
        password: form.password.clone(),
        roles: vec![form.role.clone()],
        created_at: now_iso8601(),
    };
    client.create_user(&user).await?;
    info!(email = %form.email, role = %form.role, "registration successful");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Permissions;

    #[test]
    fn test_registration_defaults_to_user_role() {
        let form = Registration::new("Jane", "jane@example.com", "jane123");
        assert_eq!(form.role, "user");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_registration_rejects_superadmin() {
        let form = Registration::new("Jane", "jane@example.com", "jane123").with_role("superadmin");
        assert!(matches!(form.validate(), Err(RosterError::Forbidden(_))));
    }

    #[test]
    fn test_registrable_roles_hides_superadmin() {
        let catalog = vec![
            Role::new("superadmin", "Super Admin", Permissions::ALL),
            Role::new("user", "User", Permissions::NONE),
        ];
        let ids: Vec<_> = registrable_roles(&catalog).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["user"]);
    }
}
