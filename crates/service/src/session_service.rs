use storyfeed_api::Client;
use storyfeed_core::AuthSession;
use storyfeed_store::Store;

use crate::error::ServiceError;

/// Login, registration and session persistence.
pub struct SessionService {
    store: Store,
    client: Client,
}

impl SessionService {
    /// `client` is unauthenticated; login and registration are the two
    /// endpoints that work without a token.
    #[must_use]
    pub const fn new(store: Store, client: Client) -> Self {
        Self { store, client }
    }

    /// Authenticate against the remote service and persist the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ServiceError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ServiceError::InvalidInput("email and password are required".to_owned()));
        }
        let result = self.client.login(email, password).await?;
        let session =
            AuthSession::new(result.user_id, result.name, email.to_owned(), result.token);
        self.store.save_auth(session.clone()).await?;
        tracing::info!(user = %session.name, "logged in");
        Ok(session)
    }

    /// Create a new account. The caller still has to log in afterwards.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ServiceError> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(ServiceError::InvalidInput(
                "name, email and password are required".to_owned(),
            ));
        }
        self.client.register(name, email, password).await?;
        tracing::info!(email, "account registered");
        Ok(())
    }

    /// The persisted session, if any.
    pub async fn session(&self) -> Result<Option<AuthSession>, ServiceError> {
        Ok(self.store.auth().await?)
    }

    /// The persisted session, or `NotLoggedIn`.
    pub async fn require_session(&self) -> Result<AuthSession, ServiceError> {
        self.session().await?.ok_or(ServiceError::NotLoggedIn)
    }

    /// Drop the auth session and tear down the story cache with it; the
    /// next login starts from an empty cache and an initial refresh.
    pub async fn logout(&self) -> Result<(), ServiceError> {
        self.store.clear_auth().await?;
        self.store.clear_stories().await?;
        tracing::info!("logged out, local cache cleared");
        Ok(())
    }
}
