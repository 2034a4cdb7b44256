//! Sign-in flows.
//!
//! A sign-in is two steps: authenticate against the identity provider, then
//! trade the verified identity for a backend session cookie via `POST /jwt`.
//! [`LoginForm`] holds the credential fields the way the login page does,
//! and clears the password field when the provider rejects the credentials
//! so a retyped attempt starts clean. The federated flow has no password to
//! clear.

use tracing::{debug, info};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::identity::{IdentityClient, IdentityError, ProviderSession};

/// Credential fields of the login page.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Creates a filled-in login form.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Runs the email/password sign-in flow.
    ///
    /// On success the backend session cookie is installed in `api`'s cookie
    /// store. On a credential rejection the password field is cleared and
    /// the error is surfaced for the caller to display.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Identity`] - provider rejection or outage
    /// - [`ClientError::Api`] - the backend refused to issue a session
    pub async fn sign_in(
        &mut self,
        idp: &IdentityClient,
        api: &ApiClient,
    ) -> Result<ProviderSession, ClientError> {
        let session = match idp.sign_in(&self.email, &self.password).await {
            Ok(session) => session,
            Err(IdentityError::InvalidCredentials) => {
                debug!(email = %self.email, "Credentials rejected, clearing password field");
                self.password.clear();
                return Err(IdentityError::InvalidCredentials.into());
            }
            Err(err) => return Err(err.into()),
        };

        let email = session.user.email.as_deref().unwrap_or(&self.email);
        api.request_token(email).await?;

        info!(email = %email, "Signed in");
        Ok(session)
    }
}

/// Runs the federated sign-in flow with a provider-issued ID token.
///
/// # Errors
///
/// Same taxonomy as [`LoginForm::sign_in`]; there is no password state to
/// clear on rejection.
pub async fn sign_in_with_provider(
    idp: &IdentityClient,
    api: &ApiClient,
    provider: &str,
    id_token: &str,
) -> Result<ProviderSession, ClientError> {
    let session = idp.sign_in_with_provider(provider, id_token).await?;

    let email = session.user.email.as_deref().unwrap_or_default();
    api.request_token(email).await?;

    info!(provider = %provider, email = %email, "Signed in via provider");
    Ok(session)
}
