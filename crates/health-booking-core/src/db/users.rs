//! User account database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Role, UserAccount};

impl Database {
    /// Insert a new account record at sign-up. Fails if the uid exists;
    /// accounts are never re-created and role is immutable.
    pub fn insert_user(&self, account: &UserAccount) -> DbResult<()> {
        if !account.role.is_known() {
            return Err(DbError::Constraint(
                "account role must be patient or doctor".into(),
            ));
        }

        self.conn
            .execute(
                r#"
                INSERT INTO users (uid, email, full_name, role, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    account.uid,
                    account.email,
                    account.full_name,
                    account.role.as_str(),
                    account.created_at,
                ],
            )
            .map_err(constraint_on_duplicate)?;
        Ok(())
    }

    /// Get an account by uid.
    pub fn get_user(&self, uid: &str) -> DbResult<Option<UserAccount>> {
        self.conn
            .query_row(
                r#"
                SELECT uid, email, full_name, role, created_at
                FROM users
                WHERE uid = ?
                "#,
                [uid],
                |row| {
                    Ok(UserAccount {
                        uid: row.get(0)?,
                        email: row.get(1)?,
                        full_name: row.get(2)?,
                        role: Role::parse(&row.get::<_, String>(3)?),
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Look up just the role for a uid. Missing account is `None`, which
    /// the role gate treats as `Unknown`.
    pub fn get_role(&self, uid: &str) -> DbResult<Option<Role>> {
        self.conn
            .query_row("SELECT role FROM users WHERE uid = ?", [uid], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .map(|role| role.map(|r| Role::parse(&r)))
            .map_err(Into::into)
    }
}

fn constraint_on_duplicate(e: rusqlite::Error) -> DbError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DbError::Constraint("account already exists".into())
        }
        _ => DbError::Sqlite(e),
    }
}
