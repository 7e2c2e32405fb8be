use crate::error::Result;
use crate::rest::{RosterHttpClient, CREATED, UPDATED};
use crate::types::*;

impl RosterHttpClient {
    // --- Users ---

    /// GET /users - All user records, legacy `role` folded into `roles`.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.get("/users").await
    }

    /// POST /users - Create a user. Success is 200 or 201.
    pub async fn create_user(&self, user: &NewUser) -> Result<()> {
        self.post("/users", user, CREATED).await
    }

    /// PUT /users/{id} - Replace a user. Success is 200 or 204.
    pub async fn update_user(&self, user: &User) -> Result<()> {
        self.put(&format!("/users/{}", user.id), user, UPDATED).await
    }

    /// DELETE /users/{id}
    pub async fn delete_user(&self, id: &str) -> Result<()> {
        self.delete(&format!("/users/{id}"), UPDATED).await
    }

    // --- Roles ---

    /// GET /roles - The role catalog.
    pub async fn list_roles(&self) -> Result<Vec<Role>> {
        self.get("/roles").await
    }

    /// POST /roles
    pub async fn create_role(&self, role: &Role) -> Result<()> {
        self.post("/roles", role, CREATED).await
    }

    /// PUT /roles/{id} - `id` is the current id; `role.id` may differ.
    pub async fn update_role(&self, id: &str, role: &Role) -> Result<()> {
        self.put(&format!("/roles/{id}"), role, UPDATED).await
    }

    /// DELETE /roles/{id}
    pub async fn delete_role(&self, id: &str) -> Result<()> {
        self.delete(&format!("/roles/{id}"), UPDATED).await
    }

    // --- Properties ---

    /// GET /properties
    pub async fn list_properties(&self) -> Result<Vec<Property>> {
        self.get("/properties").await
    }

    /// POST /properties
    pub async fn create_property(&self, property: &NewProperty) -> Result<()> {
        self.post("/properties", property, CREATED).await
    }

    /// PUT /properties/{id}
    pub async fn update_property(&self, property: &Property) -> Result<()> {
        self.put(&format!("/properties/{}", property.id), property, UPDATED)
            .await
    }

    /// DELETE /properties/{id}
    pub async fn delete_property(&self, id: &str) -> Result<()> {
        self.delete(&format!("/properties/{id}"), UPDATED).await
    }
}
