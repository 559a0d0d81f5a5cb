use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewUser, User, UserCredentials},
    traits::{AuthApiError, AuthManagement},
};

/// The `AuthApi` creates accounts and serves stored credentials to the server's login handler.
pub struct AuthApi<B> {
    db: B,
}

impl<B: Debug> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.db)
    }
}

impl<B> AuthApi<B>
where B: AuthManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Registers a new account. The password must already be hashed.
    pub async fn register(&self, user: NewUser) -> Result<User, AuthApiError> {
        let user = self.db.create_user(user).await?;
        info!("🔑️ New {} account created for {}", user.role, user.username);
        Ok(user)
    }

    /// Fetches the stored credentials for a username. Used by the login handler to verify a password attempt.
    pub async fn credentials(&self, username: &str) -> Result<UserCredentials, AuthApiError> {
        self.db.fetch_credentials(username).await
    }
}
