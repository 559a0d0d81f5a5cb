use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewUser, ResourceId, User, UserCredentials},
    query_objects::UserQueryFilter,
    traits::AuthApiError,
};

/// Inserts a new user. Usernames are unique; a duplicate maps to [`AuthApiError::UsernameTaken`].
pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, AuthApiError> {
    let result = sqlx::query_as::<_, User>(
        r#"
            INSERT INTO users (
                username,
                password_hash,
                role,
                full_name,
                address,
                purok,
                meter_number,
                phone,
                email
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *;
        "#,
    )
    .bind(user.username)
    .bind(user.password_hash)
    .bind(user.role)
    .bind(user.full_name)
    .bind(user.address)
    .bind(user.purok)
    .bind(user.meter_number)
    .bind(user.phone)
    .bind(user.email)
    .fetch_one(conn)
    .await;
    match result {
        Ok(user) => {
            debug!("🗃️ User {} inserted with id {}", user.username, user.id);
            Ok(user)
        },
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AuthApiError::UsernameTaken),
        Err(e) => Err(e.into()),
    }
}

pub async fn user_by_id(id: ResourceId, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn user_by_username(username: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE username = $1").bind(username).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn credentials_by_username(
    username: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<UserCredentials>, sqlx::Error> {
    let creds = sqlx::query_as("SELECT id, username, password_hash, role FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(conn)
        .await?;
    Ok(creds)
}

pub async fn search_users(query: UserQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<User>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        r#"
    SELECT * FROM users
    "#,
    );
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(role) = query.role {
        where_clause.push("role = ");
        where_clause.push_bind_unseparated(role.to_string());
    }
    if let Some(purok) = query.purok {
        where_clause.push("purok = ");
        where_clause.push_bind_unseparated(purok);
    }
    if let Some(name) = query.name {
        where_clause.push("full_name LIKE ");
        where_clause.push_bind_unseparated(format!("%{name}%"));
    }
    builder.push(" ORDER BY purok, full_name ASC");

    trace!("🗃️ Executing query: {}", builder.sql());
    let query = builder.build_query_as::<User>();
    let users = query.fetch_all(conn).await?;
    trace!("🗃️ Result of search_users: {:?}", users.len());
    Ok(users)
}

/// Replaces the push device token for a user. Returns false if the user does not exist.
pub async fn update_device_token(
    user_id: ResourceId,
    token: &str,
    conn: &mut SqliteConnection,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET device_token = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2")
        .bind(token)
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn device_token(user_id: ResourceId, conn: &mut SqliteConnection) -> Result<Option<String>, sqlx::Error> {
    let token: Option<Option<String>> = sqlx::query_scalar("SELECT device_token FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(token.flatten())
}
