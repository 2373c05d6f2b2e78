/// Postgres directory adapter
///
/// One row per member; `roles` is a TEXT[] column and `refresh_token` holds
/// the single live token. Rotation is a conditional UPDATE keyed on the
/// expected old value, so the row-level lock serializes concurrent
/// exchanges for the same member.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::directory::{Identity, IdentityDirectory, Role};
use crate::error::DirectoryError;

pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

type MemberRow = (String, String, String, Vec<String>, Option<String>);

fn into_identity(row: MemberRow) -> Result<Identity, DirectoryError> {
    let (username, name, password_hash, roles, refresh_token) = row;

    let roles = roles
        .iter()
        .map(|r| {
            Role::parse(r).ok_or_else(|| DirectoryError::Backend(format!("unknown role: {}", r)))
        })
        .collect::<Result<Vec<Role>, DirectoryError>>()?;

    Ok(Identity {
        username,
        name,
        password_hash,
        roles,
        refresh_token,
    })
}

#[async_trait]
impl IdentityDirectory for PgDirectory {
    async fn create(&self, identity: Identity) -> Result<(), DirectoryError> {
        let roles: Vec<String> = identity
            .roles
            .iter()
            .map(|r| r.as_str().to_string())
            .collect();

        sqlx::query(
            r#"
            INSERT INTO members (username, name, password_hash, roles, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&identity.username)
        .bind(&identity.name)
        .bind(&identity.password_hash)
        .bind(&roles)
        .bind(Utc::now())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, DirectoryError> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT username, name, password_hash, roles, refresh_token
            FROM members
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_identity).transpose()
    }

    async fn find_by_username_and_refresh_token(
        &self,
        username: &str,
        refresh_token: &str,
    ) -> Result<Option<Identity>, DirectoryError> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT username, name, password_hash, roles, refresh_token
            FROM members
            WHERE username = $1 AND refresh_token = $2
            "#,
        )
        .bind(username)
        .bind(refresh_token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_identity).transpose()
    }

    async fn save_refresh_token(
        &self,
        username: &str,
        refresh_token: &str,
    ) -> Result<(), DirectoryError> {
        let result = sqlx::query(
            r#"
            UPDATE members
            SET refresh_token = $2, updated_at = $3
            WHERE username = $1
            "#,
        )
        .bind(username)
        .bind(refresh_token)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DirectoryError::Backend(format!(
                "no such member: {}",
                username
            )));
        }

        Ok(())
    }

    async fn swap_refresh_token(
        &self,
        username: &str,
        current: &str,
        new_token: &str,
    ) -> Result<bool, DirectoryError> {
        // Conditional update: zero rows affected means the stored token is
        // no longer `current` and this rotation lost the race.
        let result = sqlx::query(
            r#"
            UPDATE members
            SET refresh_token = $3, updated_at = $4
            WHERE username = $1 AND refresh_token = $2
            "#,
        )
        .bind(username)
        .bind(current)
        .bind(new_token)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
