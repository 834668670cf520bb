//! User repository for SQLite operations

use sqlx::{SqliteExecutor, SqlitePool};

use crate::data::sqlite::SqliteError;
use crate::data::types::{NewUser, Role, UserRow, UserUpdate};

const USER_COLUMNS: &str = "id, name, email, role, created_at, updated_at";

type UserTuple = (String, String, Option<String>, String, i64, i64);

fn row_to_user(row: UserTuple) -> Result<UserRow, SqliteError> {
    let (id, name, email, role, created_at, updated_at) = row;

    let role = Role::parse(&role)
        .ok_or_else(|| SqliteError::Decode(format!("unknown user role: {}", role)))?;

    Ok(UserRow {
        id,
        name,
        email,
        role,
        created_at,
        updated_at,
    })
}

async fn fetch_user<'e, E>(executor: E, id: &str) -> Result<Option<UserRow>, SqliteError>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
    let row = sqlx::query_as::<_, UserTuple>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    row.map(row_to_user).transpose()
}

/// Insert a user, or refresh name and role when the ID is already known
pub async fn upsert_user(pool: &SqlitePool, input: &NewUser) -> Result<UserRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, role, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            email = COALESCE(excluded.email, users.email),
            role = excluded.role,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&input.id)
    .bind(&input.name)
    .bind(input.email.as_deref())
    .bind(input.role.as_str())
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let user = fetch_user(&mut *tx, &input.id)
        .await?
        .ok_or_else(|| SqliteError::Decode(format!("user {} vanished after upsert", input.id)))?;

    tx.commit().await?;
    Ok(user)
}

/// Get a user by ID
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<Option<UserRow>, SqliteError> {
    fetch_user(pool, id).await
}

/// List every user, newest first
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<UserRow>, SqliteError> {
    let sql = format!(
        "SELECT {} FROM users ORDER BY created_at DESC, id",
        USER_COLUMNS
    );
    sqlx::query_as::<_, UserTuple>(&sql)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(row_to_user)
        .collect()
}

/// Apply a partial update. Returns the updated user if found.
pub async fn update_user(
    pool: &SqlitePool,
    id: &str,
    update: &UserUpdate,
) -> Result<Option<UserRow>, SqliteError> {
    let mut tx = pool.begin().await?;

    let Some(mut user) = fetch_user(&mut *tx, id).await? else {
        return Ok(None);
    };

    if let Some(name) = &update.name {
        user.name = name.clone();
    }
    if let Some(email) = &update.email {
        user.email = Some(email.clone());
    }
    if let Some(role) = update.role {
        user.role = role;
    }
    user.updated_at = chrono::Utc::now().timestamp();

    sqlx::query("UPDATE users SET name = ?, email = ?, role = ?, updated_at = ? WHERE id = ?")
        .bind(&user.name)
        .bind(user.email.as_deref())
        .bind(user.role.as_str())
        .bind(user.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Some(user))
}

/// Delete a user. Their reviews and orders are kept. Returns true if deleted.
pub async fn delete_user(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
