use std::io::Write;

use roster::{display_name, AccessTier, ImportResult, Property, Role, User};
use serde::Serialize;
use serde_json::json;

use crate::error::CliError;

/// Write one JSON document followed by a newline.
fn write_json<W: Write, T: Serialize + ?Sized>(value: &T, writer: &mut W) -> Result<(), CliError> {
    serde_json::to_writer(&mut *writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write tab-separated rows.
fn write_tsv<W: Write>(rows: &[Vec<&str>], writer: &mut W) -> Result<(), CliError> {
    let mut buf = String::new();
    for row in rows {
        buf.clear();
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                buf.push('\t');
            }
            buf.push_str(cell);
        }
        buf.push('\n');
        writer.write_all(buf.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// TSV: id \t name \t email \t role names (comma-joined)
pub fn write_users<W: Write>(
    users: &[&User],
    roles: &[Role],
    json_mode: bool,
    writer: &mut W,
) -> Result<(), CliError> {
    if json_mode {
        return write_json(users, writer);
    }
    let role_names: Vec<String> = users
        .iter()
        .map(|u| {
            u.roles
                .iter()
                .map(|r| display_name(r, roles))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();
    let rows: Vec<Vec<&str>> = users
        .iter()
        .zip(&role_names)
        .map(|(u, names)| vec![u.id.as_str(), u.name.as_str(), u.email.as_str(), names.as_str()])
        .collect();
    write_tsv(&rows, writer)
}

fn flag(on: bool) -> &'static str {
    if on {
        "yes"
    } else {
        "no"
    }
}

/// TSV: id \t name \t add \t update \t delete
pub fn write_roles<W: Write>(roles: &[Role], json_mode: bool, writer: &mut W) -> Result<(), CliError> {
    if json_mode {
        return write_json(roles, writer);
    }
    let rows: Vec<Vec<&str>> = roles
        .iter()
        .map(|r| {
            vec![
                r.id.as_str(),
                r.name.as_str(),
                flag(r.permissions.add_property),
                flag(r.permissions.update_property),
                flag(r.permissions.delete_property),
            ]
        })
        .collect();
    write_tsv(&rows, writer)
}

/// TSV: id \t title \t description \t created by
pub fn write_properties<W: Write>(
    properties: &[&Property],
    json_mode: bool,
    writer: &mut W,
) -> Result<(), CliError> {
    if json_mode {
        return write_json(properties, writer);
    }
    let rows: Vec<Vec<&str>> = properties
        .iter()
        .map(|p| {
            vec![
                p.id.as_str(),
                p.title.as_str(),
                p.description.as_str(),
                p.created_by_name.as_deref().unwrap_or(""),
            ]
        })
        .collect();
    write_tsv(&rows, writer)
}

pub fn write_session<W: Write>(
    user: &User,
    tier: &AccessTier,
    json_mode: bool,
    writer: &mut W,
) -> Result<(), CliError> {
    if json_mode {
        let doc = json!({
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "roles": user.roles,
            "access": tier,
        });
        return write_json(&doc, writer);
    }
    let tier_name = match tier {
        AccessTier::SuperAdmin => "superadmin",
        AccessTier::Member { .. } => "member",
    };
    let roles = user.roles.join(",");
    write_tsv(
        &[vec![user.id.as_str(), user.name.as_str(), user.email.as_str(), roles.as_str(), tier_name]],
        writer,
    )
}

/// TSV: one `permission \t yes|no` line per flag.
pub fn write_permissions<W: Write>(tier: &AccessTier, json_mode: bool, writer: &mut W) -> Result<(), CliError> {
    if json_mode {
        return write_json(tier, writer);
    }
    let perms = match tier {
        AccessTier::SuperAdmin => roster::Permissions::ALL,
        AccessTier::Member { permissions } => *permissions,
    };
    write_tsv(
        &[
            vec!["addProperty", flag(perms.add_property)],
            vec!["updateProperty", flag(perms.update_property)],
            vec!["deleteProperty", flag(perms.delete_property)],
        ],
        writer,
    )
}

pub fn write_import_result<W: Write>(
    result: &ImportResult,
    json_mode: bool,
    writer: &mut W,
) -> Result<(), CliError> {
    if json_mode {
        return write_json(result, writer);
    }
    writeln!(writer, "Successfully imported: {}", result.success_count)?;
    writeln!(writer, "Failed: {}", result.error_count)?;
    if result.skipped_rows > 0 {
        writeln!(writer, "Skipped rows: {}", result.skipped_rows)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster::Permissions;

    fn user() -> User {
        serde_json::from_value(json!({
            "id": "2",
            "name": "John Doe",
            "email": "john@example.com",
            "password": "john123",
            "roles": ["admin", "ghost"]
        }))
        .unwrap()
    }

    #[test]
    fn test_users_tsv_uses_role_names() {
        let roles = vec![Role::new("admin", "Administrator", Permissions::NONE)];
        let u = user();
        let mut out = Vec::new();
        write_users(&[&u], &roles, false, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2\tJohn Doe\tjohn@example.com\tAdministrator,ghost\n"
        );
    }

    #[test]
    fn test_users_json_is_array() {
        let u = user();
        let mut out = Vec::new();
        write_users(&[&u], &[], true, &mut out).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v[0]["email"], "john@example.com");
    }

    #[test]
    fn test_import_summary_text() {
        let result = ImportResult {
            success_count: 3,
            error_count: 1,
            skipped_rows: 0,
        };
        let mut out = Vec::new();
        write_import_result(&result, false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Successfully imported: 3\nFailed: 1\n");
    }

    #[test]
    fn test_superadmin_permissions_all_yes() {
        let mut out = Vec::new();
        write_permissions(&AccessTier::SuperAdmin, false, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "addProperty\tyes\nupdateProperty\tyes\ndeleteProperty\tyes\n"
        );
    }
}
