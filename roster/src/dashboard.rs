//! Role-gated administration controller.
//!
//! A [`Dashboard`] owns everything one session works with: the logged-in
//! user, the role catalog, and the user and property lists. Superadmins manage
//! users and roles; everyone else works on properties within the permissions
//! their roles grant.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{RosterError, Result};
use crate::import;
use crate::permissions::{self, AccessTier, PropertyAction};
use crate::rest::RosterHttpClient;
use crate::types::*;
use crate::utils::{contains_ignore_case, now_iso8601};
use crate::validate;

/// Result of a destructive action that asks for confirmation first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Cancelled,
}

/// Fields of the add/edit user form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub roles: Vec<String>,
}

/// Fields of the add/edit property form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyForm {
    pub title: String,
    pub description: String,
}

#[derive(Debug)]
pub struct Dashboard {
    client: RosterHttpClient,
    session: User,
    roles: Vec<Role>,
    users: Vec<User>,
    properties: Vec<Property>,
}

impl Dashboard {
    /// Empty dashboard for `session`; call [`Dashboard::load`] to populate.
    pub fn new(client: RosterHttpClient, session: User) -> Self {
        Self {
            client,
            session,
            roles: Vec::new(),
            users: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Fetch what the session's tier needs: users and roles for a superadmin,
    /// properties and roles otherwise.
    ///
    /// Every fetch is attempted; the first failure is returned.
    pub async fn load(&mut self) -> Result<()> {
        let first = if self.is_super_admin() {
            self.refresh_users().await
        } else {
            self.refresh_properties().await
        };
        let roles = self.refresh_roles().await;
        first.and(roles)
    }

    // --- Accessors ---

    pub fn client(&self) -> &RosterHttpClient {
        &self.client
    }

    pub fn session(&self) -> &User {
        &self.session
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn is_super_admin(&self) -> bool {
        permissions::is_super_admin(&self.session)
    }

    pub fn access_tier(&self) -> AccessTier {
        permissions::access_tier(&self.session, &self.roles)
    }

    pub fn permissions(&self) -> EffectivePermissions {
        permissions::resolve_permissions(&self.session, &self.roles)
    }

    pub fn role_display_name<'a>(&'a self, role_id: &'a str) -> &'a str {
        permissions::display_name(role_id, &self.roles)
    }

    /// Users whose name contains `query`, ignoring case.
    pub fn filter_users(&self, query: &str) -> Vec<&User> {
        self.users
            .iter()
            .filter(|u| contains_ignore_case(&u.name, query))
            .collect()
    }

    /// Properties whose title contains `query`, ignoring case.
    pub fn filter_properties(&self, query: &str) -> Vec<&Property> {
        self.properties
            .iter()
            .filter(|p| contains_ignore_case(&p.title, query))
            .collect()
    }

    // --- Refresh ---
    //
    // On failure the previous list is kept.

    pub async fn refresh_roles(&mut self) -> Result<()> {
        match self.client.list_roles().await {
            Ok(roles) => {
                self.roles = roles;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch roles");
                Err(e)
            }
        }
    }

    /// Reload users, leaving out root accounts stored with the legacy
    /// `role: "superadmin"` shape. Users granted superadmin through `roles`
    /// stay listed so they can be edited back.
    pub async fn refresh_users(&mut self) -> Result<()> {
        match self.client.list_users().await {
            Ok(users) => {
                self.users = users
                    .into_iter()
                    .filter(|u| !u.is_legacy_superadmin())
                    .collect();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch users");
                Err(e)
            }
        }
    }

    pub async fn refresh_properties(&mut self) -> Result<()> {
        match self.client.list_properties().await {
            Ok(properties) => {
                self.properties = properties;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch properties");
                Err(e)
            }
        }
    }

    // --- Guards ---

    fn require_super_admin(&self, what: &str) -> Result<()> {
        if self.is_super_admin() {
            Ok(())
        } else {
            Err(RosterError::Forbidden(format!("{what} requires the superadmin role")))
        }
    }

    fn require(&self, action: PropertyAction) -> Result<()> {
        if self.access_tier().allows(action) {
            Ok(())
        } else {
            Err(RosterError::Forbidden(format!("your roles do not allow: {action}")))
        }
    }

    // --- Users ---

    pub async fn add_user(&mut self, form: UserForm) -> Result<()> {
        self.require_super_admin("user management")?;
        validate::new_user(&form.name, &form.email, &form.password, &form.roles)?;

        let user = NewUser {
            name: form.name,
            email: form.email,
            password: form.password,
            roles: form.roles,
            created_at: now_iso8601(),
        };
        self.client.create_user(&user).await?;
        info!(email = %user.email, "user created");
        self.refresh_users().await
    }

    /// Replace a listed user's form fields, keeping every other field as fetched.
    pub async fn update_user(&mut self, id: &str, form: UserForm) -> Result<()> {
        self.require_super_admin("user management")?;
        validate::require_filled(&[form.name.as_str(), form.email.as_str(), form.password.as_str()])?;
        validate::roles_selected(&form.roles)?;

        let mut user = self
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| RosterError::NotFound { kind: "user", id: id.into() })?;
        user.name = form.name;
        user.email = form.email;
        user.password = form.password;
        user.roles = form.roles;
        user.updated_at = Some(now_iso8601());

        self.client.update_user(&user).await?;
        info!(id, "user updated");
        self.refresh_users().await
    }

    pub async fn delete_user<C>(&mut self, id: &str, confirm: C) -> Result<Outcome>
    where
        C: FnOnce(&str) -> bool,
    {
        self.require_super_admin("user management")?;
        if !confirm("Are you sure you want to delete this user?") {
            return Ok(Outcome::Cancelled);
        }
        self.client.delete_user(id).await?;
        info!(id, "user deleted");
        self.refresh_users().await?;
        Ok(Outcome::Done)
    }

    /// Import pasted CSV (header row required), then reload the user list.
    pub async fn import_pasted(&mut self, text: &str) -> Result<ImportResult> {
        self.require_super_admin("user import")?;
        let result = import::import_pasted_with_progress(&self.client, text, |phase| {
            debug!(?phase, "import phase");
        })
        .await?;
        self.refresh_after_import().await;
        Ok(result)
    }

    /// Import a header-less CSV file, then reload the user list.
    pub async fn import_file(&mut self, path: impl AsRef<Path>) -> Result<ImportResult> {
        self.require_super_admin("user import")?;
        let result = import::import_file(&self.client, path).await?;
        self.refresh_after_import().await;
        Ok(result)
    }

    async fn refresh_after_import(&mut self) {
        // The tally is already final; a stale list is not worth failing over.
        if let Err(e) = self.refresh_users().await {
            warn!(error = %e, "user list not refreshed after import");
        }
    }

    // --- Roles ---

    pub async fn add_role(&mut self, role: Role) -> Result<()> {
        self.require_super_admin("role management")?;
        validate::role_fields(&role.id, &role.name)?;
        if role.is_superadmin() {
            return Err(RosterError::Forbidden("the superadmin role is reserved".into()));
        }
        validate::role_id_unique(&role.id, &self.roles)?;

        self.client.create_role(&role).await?;
        info!(id = %role.id, "role created");
        self.refresh_roles().await
    }

    /// Replace the role currently stored under `current_id` with `role`.
    /// Fields of the stored role this crate does not model are carried over.
    pub async fn update_role(&mut self, current_id: &str, mut role: Role) -> Result<()> {
        self.require_super_admin("role management")?;
        validate::role_fields(&role.id, &role.name)?;

        let existing = permissions::find_role(&self.roles, current_id)
            .ok_or_else(|| RosterError::NotFound { kind: "role", id: current_id.into() })?;
        if existing.is_superadmin() && (role.id != existing.id || role.name != existing.name) {
            return Err(RosterError::Forbidden("the superadmin role cannot be renamed".into()));
        }
        if role.id != current_id {
            if role.is_superadmin() {
                return Err(RosterError::Forbidden("the superadmin role is reserved".into()));
            }
            validate::role_id_unique(&role.id, &self.roles)?;
        }
        for (key, value) in &existing.extra {
            role.extra.entry(key.clone()).or_insert_with(|| value.clone());
        }

        self.client.update_role(current_id, &role).await?;
        info!(id = current_id, "role updated");
        self.refresh_roles().await
    }

    /// Delete a role nobody holds.
    ///
    /// The user list is fetched fresh first. If any user holds the role this
    /// returns [`RosterError::RoleInUse`] naming them, without asking for
    /// confirmation and without sending the delete.
    pub async fn delete_role<C>(&mut self, role_id: &str, confirm: C) -> Result<Outcome>
    where
        C: FnOnce(&str) -> bool,
    {
        self.require_super_admin("role management")?;
        if role_id == SUPERADMIN_ROLE {
            return Err(RosterError::Forbidden("the superadmin role cannot be deleted".into()));
        }

        let all_users = self.client.list_users().await?;
        let holders: Vec<String> = all_users
            .iter()
            .filter(|u| u.has_role(role_id))
            .map(|u| u.name.clone())
            .collect();
        if !holders.is_empty() {
            warn!(role_id, users = holders.len(), "role still assigned");
            return Err(RosterError::RoleInUse {
                role_id: role_id.into(),
                users: holders,
            });
        }

        if !confirm("Are you sure you want to delete this role?") {
            return Ok(Outcome::Cancelled);
        }
        self.client.delete_role(role_id).await?;
        info!(role_id, "role deleted");
        self.refresh_roles().await?;
        Ok(Outcome::Done)
    }

    // --- Properties ---

    pub async fn add_property(&mut self, form: PropertyForm) -> Result<()> {
        self.require(PropertyAction::Add)?;
        validate::property_title(&form.title)?;

        let property = NewProperty {
            title: form.title,
            description: form.description,
            created_by: self.session.id.clone(),
            created_by_name: self.session.name.clone(),
            created_at: now_iso8601(),
        };
        self.client.create_property(&property).await?;
        info!(title = %property.title, "property added");
        self.refresh_properties().await
    }

    pub async fn update_property(&mut self, id: &str, form: PropertyForm) -> Result<()> {
        self.require(PropertyAction::Update)?;
        validate::property_title(&form.title)?;

        let mut property = self
            .properties
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| RosterError::NotFound { kind: "property", id: id.into() })?;
        property.title = form.title;
        property.description = form.description;
        property.updated_at = Some(now_iso8601());
        property.updated_by = Some(self.session.id.clone());

        self.client.update_property(&property).await?;
        info!(id, "property updated");
        self.refresh_properties().await
    }

    pub async fn delete_property<C>(&mut self, id: &str, confirm: C) -> Result<Outcome>
    where
        C: FnOnce(&str) -> bool,
    {
        self.require(PropertyAction::Delete)?;
        if !confirm("Are you sure you want to delete this property?") {
            return Ok(Outcome::Cancelled);
        }
        self.client.delete_property(id).await?;
        info!(id, "property deleted");
        self.refresh_properties().await?;
        Ok(Outcome::Done)
    }
}
