//! Subcommand dispatch.

use std::io::{self, BufRead, Read, Write};

use roster::{
    csv, login, register, Dashboard, Outcome, Permissions, PropertyForm,
    Registration, Role, RosterConfig, RosterHttpClient, UserForm,
};
use tracing::{debug, info};

use crate::cli::{Cli, Command, ImportCommand, PropertiesCommand, RolesCommand, UsersCommand};
use crate::error::CliError;
use crate::output;

/// Connection and credential settings after merging env and flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: RosterConfig,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Settings {
    /// Flags win over `ROSTER_API_URL`, `ROSTER_EMAIL`, `ROSTER_PASSWORD`.
    pub fn resolve(cli: &Cli) -> Self {
        let api_url = cli
            .api_url
            .clone()
            .or_else(|| std::env::var("ROSTER_API_URL").ok());
        let config = match api_url {
            Some(url) => RosterConfig::with_api_url(url),
            None => RosterConfig::default(),
        };
        Self {
            config,
            email: cli.email.clone().or_else(|| std::env::var("ROSTER_EMAIL").ok()),
            password: cli
                .password
                .clone()
                .or_else(|| std::env::var("ROSTER_PASSWORD").ok()),
        }
    }
}

/// Ask a yes/no question on stderr, reading the answer from stdin.
fn prompt(skip: bool) -> impl FnOnce(&str) -> bool {
    move |question: &str| {
        if skip {
            return true;
        }
        eprint!("{question} [y/N] ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

fn report(outcome: Outcome, what: &str) {
    match outcome {
        Outcome::Done => info!("{what} deleted"),
        Outcome::Cancelled => info!("{what} deletion cancelled"),
    }
}

async fn open_dashboard(client: RosterHttpClient, settings: &Settings) -> Result<Dashboard, CliError> {
    let (Some(email), Some(password)) = (&settings.email, &settings.password) else {
        return Err(CliError::MissingCredentials);
    };
    let session = login(&client, email, password).await?;
    let mut dashboard = Dashboard::new(client, session);
    dashboard.load().await?;
    Ok(dashboard)
}

pub async fn run(cli: Cli, settings: Settings) -> Result<(), CliError> {
    let client = RosterHttpClient::new(&settings.config)?;
    debug!(api_url = client.base_url(), "client ready");
    let json = cli.json;
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Register(args) => {
            let form = Registration::new(args.name, args.new_email, args.new_password).with_role(args.role);
            register(&client, &form).await?;
            info!("registration successful");
        }

        Command::Login => {
            let dashboard = open_dashboard(client, &settings).await?;
            output::write_session(dashboard.session(), &dashboard.access_tier(), json, &mut out)?;
        }

        Command::Permissions => {
            let dashboard = open_dashboard(client, &settings).await?;
            output::write_permissions(&dashboard.access_tier(), json, &mut out)?;
        }

        Command::Users(cmd) => {
            let mut dashboard = open_dashboard(client, &settings).await?;
            run_users(&mut dashboard, cmd, json, &mut out).await?;
        }

        Command::Roles(cmd) => {
            let mut dashboard = open_dashboard(client, &settings).await?;
            run_roles(&mut dashboard, cmd, json, &mut out).await?;
        }

        Command::Properties(cmd) => {
            let mut dashboard = open_dashboard(client, &settings).await?;
            run_properties(&mut dashboard, cmd, json, &mut out).await?;
        }

        Command::Import(cmd) => {
            let mut dashboard = open_dashboard(client, &settings).await?;
            let result = match cmd {
                ImportCommand::Paste { input } => {
                    let text = match input {
                        Some(path) => tokio::fs::read_to_string(path).await?,
                        None => {
                            let mut text = String::new();
                            io::stdin().read_to_string(&mut text)?;
                            text
                        }
                    };
                    dashboard.import_pasted(&text).await?
                }
                ImportCommand::File { path } => dashboard.import_file(path).await?,
            };
            output::write_import_result(&result, json, &mut out)?;
        }
    }

    Ok(())
}

async fn run_users<W: Write>(
    dashboard: &mut Dashboard,
    cmd: UsersCommand,
    json: bool,
    out: &mut W,
) -> Result<(), CliError> {
    match cmd {
        UsersCommand::List { search } => {
            // Listing is a superadmin view; members get an empty list from `load`.
            if !dashboard.is_super_admin() {
                return Err(roster::RosterError::Forbidden(
                    "user management requires the superadmin role".into(),
                )
                .into());
            }
            let users = dashboard.filter_users(search.as_deref().unwrap_or(""));
            output::write_users(&users, dashboard.roles(), json, out)?;
        }

        UsersCommand::Add(fields) => {
            let form = UserForm {
                name: fields.name,
                email: fields.user_email,
                password: fields.user_password,
                roles: fields.roles,
            };
            dashboard.add_user(form).await?;
            info!("user created");
        }

        UsersCommand::Update {
            id,
            name,
            user_email,
            user_password,
            roles,
        } => {
            let current = dashboard
                .users()
                .iter()
                .find(|u| u.id == id)
                .ok_or_else(|| roster::RosterError::NotFound {
                    kind: "user",
                    id: id.clone(),
                })?;
            let form = UserForm {
                name: name.unwrap_or_else(|| current.name.clone()),
                email: user_email.unwrap_or_else(|| current.email.clone()),
                password: user_password.unwrap_or_else(|| current.password.clone()),
                roles: roles.unwrap_or_else(|| current.roles.clone()),
            };
            dashboard.update_user(&id, form).await?;
            info!(id = %id, "user updated");
        }

        UsersCommand::Delete { id, yes } => {
            let outcome = dashboard.delete_user(&id, prompt(yes)).await?;
            report(outcome, "user");
        }

        UsersCommand::Export => {
            if !dashboard.is_super_admin() {
                return Err(roster::RosterError::Forbidden(
                    "user export requires the superadmin role".into(),
                )
                .into());
            }
            let records: Vec<roster::ImportRecord> = dashboard
                .users()
                .iter()
                .map(|u| roster::ImportRecord {
                    name: u.name.clone(),
                    email: u.email.clone(),
                    password: u.password.clone(),
                    roles: u.roles.clone(),
                    created_at: u.created_at.clone().unwrap_or_default(),
                })
                .collect();
            writeln!(out, "{}", csv::encode_with_header(&records)?)?;
        }
    }
    Ok(())
}

async fn run_roles<W: Write>(
    dashboard: &mut Dashboard,
    cmd: RolesCommand,
    json: bool,
    out: &mut W,
) -> Result<(), CliError> {
    match cmd {
        RolesCommand::List => output::write_roles(dashboard.roles(), json, out)?,

        RolesCommand::Add {
            id,
            name,
            add_property,
            update_property,
            delete_property,
        } => {
            let permissions = Permissions {
                add_property,
                update_property,
                delete_property,
            };
            dashboard.add_role(Role::new(id, name, permissions)).await?;
            info!("role created");
        }

        RolesCommand::Update {
            id,
            new_id,
            name,
            add_property,
            update_property,
            delete_property,
        } => {
            let current = roster::permissions::find_role(dashboard.roles(), &id)
                .cloned()
                .ok_or_else(|| roster::RosterError::NotFound {
                    kind: "role",
                    id: id.clone(),
                })?;
            let permissions = Permissions {
                add_property: add_property.unwrap_or(current.permissions.add_property),
                update_property: update_property.unwrap_or(current.permissions.update_property),
                delete_property: delete_property.unwrap_or(current.permissions.delete_property),
            };
            let role = Role::new(
                new_id.unwrap_or(current.id),
                name.unwrap_or(current.name),
                permissions,
            );
            dashboard.update_role(&id, role).await?;
            info!(id = %id, "role updated");
        }

        RolesCommand::Delete { id, yes } => {
            let outcome = dashboard.delete_role(&id, prompt(yes)).await?;
            report(outcome, "role");
        }
    }
    Ok(())
}

async fn run_properties<W: Write>(
    dashboard: &mut Dashboard,
    cmd: PropertiesCommand,
    json: bool,
    out: &mut W,
) -> Result<(), CliError> {
    match cmd {
        PropertiesCommand::List { search } => {
            // Superadmin sessions skip properties on load.
            if dashboard.is_super_admin() {
                dashboard.refresh_properties().await?;
            }
            let properties = dashboard.filter_properties(search.as_deref().unwrap_or(""));
            output::write_properties(&properties, json, out)?;
        }

        PropertiesCommand::Add { title, description } => {
            dashboard.add_property(PropertyForm { title, description }).await?;
            info!("property added");
        }

        PropertiesCommand::Update {
            id,
            title,
            description,
        } => {
            if dashboard.is_super_admin() {
                dashboard.refresh_properties().await?;
            }
            let current = dashboard
                .properties()
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| roster::RosterError::NotFound {
                    kind: "property",
                    id: id.clone(),
                })?;
            let form = PropertyForm {
                title: title.unwrap_or_else(|| current.title.clone()),
                description: description.unwrap_or_else(|| current.description.clone()),
            };
            dashboard.update_property(&id, form).await?;
            info!(id = %id, "property updated");
        }

        PropertiesCommand::Delete { id, yes } => {
            let outcome = dashboard.delete_property(&id, prompt(yes)).await?;
            report(outcome, "property");
        }
    }
    Ok(())
}
