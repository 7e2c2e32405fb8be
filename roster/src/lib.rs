pub mod auth;
pub mod config;
pub mod csv;
pub mod dashboard;
pub mod error;
pub mod import;
pub mod permissions;
pub mod rest;
pub mod types;
pub mod utils;
pub mod validate;

// ---- Top-level re-exports for ergonomic usage ----

// Client + config + errors
pub use config::RosterConfig;
pub use error::{Result, RosterError};
pub use rest::RosterHttpClient;

// Records
pub use types::{
    EffectivePermissions, ImportRecord, ImportResult, NewProperty, NewUser, Permissions,
    Property, Role, User, SUPERADMIN_ROLE,
};

// Permission resolution
pub use permissions::{
    access_tier, display_name, is_super_admin, resolve_permissions, AccessTier, PropertyAction,
};

// CSV + import
pub use csv::{parse_raw, parse_with_header, ParsedBatch};
pub use import::{import_file, import_pasted, ImportPhase};

// Session flows
pub use auth::{login, register, Registration};
pub use dashboard::{Dashboard, Outcome, PropertyForm, UserForm};
