//! Authentication endpoints: sign-in, token verification, password reset.
//!
//! Successful calls feed the shared [`AuthSession`] store; everything that
//! needs the credential afterwards reads it from there.

use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use freshcart_core::{BearerToken, Email};

use crate::api::ApiClient;
use crate::api::envelope::EnvelopeHead;
use crate::error::ApiError;
use crate::session::AuthSession;

/// Marker the verification endpoint uses instead of `success`.
const VERIFIED_MARKER: &str = "verified";
/// Sign-in failures rarely carry a usable server message.
const SIGN_IN_FAILURE: &str = "Email or password incorrect";

/// The signed-in user's profile as returned by the sign-in endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignedInUser {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Account role (e.g. `user`).
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SignInEnvelope {
    #[serde(flatten)]
    head: EnvelopeHead,
    token: Option<String>,
    user: Option<SignedInUser>,
}

#[derive(Debug, Deserialize)]
struct VerifyEnvelope {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResetEnvelope {
    #[serde(flatten)]
    head: EnvelopeHead,
    token: Option<String>,
}

/// Client for the authentication endpoints.
#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
    session: AuthSession,
}

impl AuthClient {
    /// Create a client feeding the given session store.
    #[must_use]
    pub const fn new(api: ApiClient, session: AuthSession) -> Self {
        Self { api, session }
    }

    /// The session store this client feeds.
    #[must_use]
    pub const fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Sign in and store the returned bearer token in the session.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or when the server rejects the
    /// credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &Email, password: &str) -> Result<SignedInUser, ApiError> {
        let body = json!({ "email": email, "password": password });
        let envelope: SignInEnvelope = self
            .api
            .request(Method::POST, "auth/signin", None, Some(&body))
            .await?;
        self.apply_sign_in(envelope)
    }

    /// Verify the stored token against the server.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotSignedIn`] with no stored token, or the
    /// server's rejection when the token is invalid or expired.
    #[instrument(skip(self))]
    pub async fn verify(&self) -> Result<(), ApiError> {
        let Some(token) = self.session.token() else {
            return Err(ApiError::NotSignedIn);
        };

        let envelope: VerifyEnvelope = self
            .api
            .request(Method::GET, "auth/verifyToken", Some(&token), None)
            .await?;

        if envelope.message.as_deref() == Some(VERIFIED_MARKER) {
            Ok(())
        } else {
            Err(ApiError::Rejected {
                message: envelope.message,
            })
        }
    }

    /// Reset the account password and store the freshly issued token.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or when the server does not
    /// issue a new token.
    #[instrument(skip(self, new_password), fields(email = %email))]
    pub async fn reset_password(&self, email: &Email, new_password: &str) -> Result<(), ApiError> {
        let body = json!({ "email": email, "newPassword": new_password });
        let envelope: ResetEnvelope = self
            .api
            .request(Method::PUT, "auth/resetPassword", None, Some(&body))
            .await?;

        match envelope.token {
            Some(token) => {
                self.session.set(BearerToken::new(token));
                Ok(())
            }
            None => Err(ApiError::Rejected {
                message: envelope.head.failure_message(),
            }),
        }
    }

    /// Drop the session credential.
    pub fn sign_out(&self) {
        self.session.clear();
    }

    /// Interpret a sign-in envelope: store the token and return the user on
    /// success.
    fn apply_sign_in(&self, envelope: SignInEnvelope) -> Result<SignedInUser, ApiError> {
        match (envelope.head.is_success(), envelope.token) {
            (true, Some(token)) => {
                self.session.set(BearerToken::new(token));
                envelope.user.ok_or(ApiError::Rejected {
                    message: Some(SIGN_IN_FAILURE.to_owned()),
                })
            }
            _ => Err(ApiError::Rejected {
                message: Some(
                    envelope
                        .head
                        .failure_message()
                        .unwrap_or_else(|| SIGN_IN_FAILURE.to_owned()),
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_config;

    use super::*;

    fn client() -> AuthClient {
        AuthClient::new(ApiClient::new(test_config()), AuthSession::new())
    }

    #[test]
    fn successful_sign_in_stores_the_token() {
        let client = client();
        let envelope: SignInEnvelope = serde_json::from_str(
            r#"{
                "message": "success",
                "user": { "name": "Nora", "email": "nora@example.com", "role": "user" },
                "token": "eyJhbGciOiJIUzI1NiJ9.tok"
            }"#,
        )
        .expect("decode");

        let user = client.apply_sign_in(envelope).expect("signed in");
        assert_eq!(user.name, "Nora");
        assert!(client.session().is_authenticated());
    }

    #[test]
    fn rejected_sign_in_leaves_session_unauthenticated() {
        let client = client();
        let envelope: SignInEnvelope = serde_json::from_str(
            r#"{ "message": "Incorrect email or password", "statusMsg": "fail" }"#,
        )
        .expect("decode");

        let err = client.apply_sign_in(envelope).expect_err("rejected");
        assert_eq!(err.server_message(), Some("Incorrect email or password"));
        assert!(!client.session().is_authenticated());
    }

    #[test]
    fn sign_out_clears_the_session() {
        let client = client();
        client.session().set(BearerToken::new("tok"));
        client.sign_out();
        assert!(!client.session().is_authenticated());
    }
}
