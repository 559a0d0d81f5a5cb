use thiserror::Error;

use crate::db_types::{NewUser, User, UserCredentials};

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Username is already taken")]
    UsernameTaken,
    #[error("User not found")]
    UserNotFound,
}

impl From<sqlx::Error> for AuthApiError {
    fn from(e: sqlx::Error) -> Self {
        AuthApiError::DatabaseError(e.to_string())
    }
}

/// Defines behaviour for creating accounts and looking up their credentials.
///
/// The engine only ever stores and returns password *hashes*. Verifying a password against its hash is the
/// server's job.
#[allow(async_fn_in_trait)]
pub trait AuthManagement {
    /// Creates a new user. Usernames are unique; a duplicate returns [`AuthApiError::UsernameTaken`].
    async fn create_user(&self, user: NewUser) -> Result<User, AuthApiError>;

    /// Fetches the stored credentials for a username.
    async fn fetch_credentials(&self, username: &str) -> Result<UserCredentials, AuthApiError>;
}
