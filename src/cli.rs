use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// rosterctl — user, role and property administration against a roster backend.
#[derive(Parser, Debug)]
#[command(name = "rosterctl", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Backend base URL (overrides ROSTER_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Login email (overrides ROSTER_EMAIL)
    #[arg(long, global = true)]
    pub email: Option<String>,

    /// Login password (overrides ROSTER_PASSWORD)
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Output as JSON instead of TSV
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and show the session's access tier
    Login,

    /// Register a new account
    Register(RegisterArgs),

    /// Show the effective permissions of the logged-in user
    Permissions,

    /// Manage users (superadmin only)
    #[command(subcommand)]
    Users(UsersCommand),

    /// Manage roles (superadmin only)
    #[command(subcommand)]
    Roles(RolesCommand),

    /// Manage properties
    #[command(subcommand)]
    Properties(PropertiesCommand),

    /// Bulk-create users from CSV (superadmin only)
    #[command(subcommand)]
    Import(ImportCommand),
}

/// Arguments for the `register` subcommand.
#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,

    /// Account email (separate from the global login email)
    #[arg(long = "new-email")]
    pub new_email: String,

    #[arg(long = "new-password")]
    pub new_password: String,

    /// Role to request; superadmin is not allowed
    #[arg(long, default_value = "user")]
    pub role: String,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List users, optionally filtered by name
    List {
        #[arg(long)]
        search: Option<String>,
    },

    /// Create a user
    Add(UserFields),

    /// Edit a user; omitted fields keep their current value
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "user-email")]
        user_email: Option<String>,
        #[arg(long = "user-password")]
        user_password: Option<String>,
        /// Comma-separated role ids
        #[arg(long, value_delimiter = ',')]
        roles: Option<Vec<String>>,
    },

    /// Delete a user
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Print users as pasteable CSV (passwords included)
    Export,
}

#[derive(Args, Debug)]
pub struct UserFields {
    #[arg(long)]
    pub name: String,

    #[arg(long = "user-email")]
    pub user_email: String,

    #[arg(long = "user-password")]
    pub user_password: String,

    /// Comma-separated role ids
    #[arg(long, value_delimiter = ',', default_value = "user")]
    pub roles: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum RolesCommand {
    /// List the role catalog
    List,

    /// Create a role
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        add_property: bool,
        #[arg(long)]
        update_property: bool,
        #[arg(long)]
        delete_property: bool,
    },

    /// Edit a role; omitted fields keep their current value
    Update {
        id: String,
        #[arg(long)]
        new_id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        add_property: Option<bool>,
        #[arg(long)]
        update_property: Option<bool>,
        #[arg(long)]
        delete_property: Option<bool>,
    },

    /// Delete a role no user holds
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum PropertiesCommand {
    /// List properties, optionally filtered by title
    List {
        #[arg(long)]
        search: Option<String>,
    },

    /// Add a property
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Edit a property; omitted fields keep their current value
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a property
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ImportCommand {
    /// Import CSV with a `Name,Email,Password,Roles` header, read from a file or stdin
    Paste {
        /// Read from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Import a header-less CSV file
    File { path: PathBuf },
}
