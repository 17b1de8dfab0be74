//! Dashboard sign-in.
//!
//! Credentials are checked by the platform API. The token it returns is kept
//! in the session and sent with every later call made for that user.

use secrecy::SecretString;
use tracing::instrument;
use yumbox_core::{Actor, Role};

use crate::api::inputs::{DataArgs, SignInInput};
use crate::api::operations::SignIn;
use crate::api::{ApiClient, ApiError, GraphQLError, SignedInUser};
use crate::models::CurrentUser;

use super::ServiceError;

/// A successful sign-in.
pub struct SignedIn {
    pub user: CurrentUser,
    pub token: SecretString,
}

pub struct AuthService<'a> {
    api: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Sign in with a login and password.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidCredentials` if the API refuses the
    /// credentials, `ServiceError::NoRestaurant` for a moderator without a
    /// restaurant, or `ServiceError::Api` for any other failure.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, login: &str, password: &str) -> Result<SignedIn, ServiceError> {
        let login = login.trim();
        if login.is_empty() {
            return Err(ServiceError::required("login"));
        }
        if password.is_empty() {
            return Err(ServiceError::required("password"));
        }

        let payload = self
            .api
            .execute::<SignIn>(
                DataArgs {
                    data: SignInInput {
                        login: login.to_string(),
                        password: password.to_string(),
                    },
                },
                None,
            )
            .await
            .map_err(|e| {
                if is_refusal(&e) {
                    tracing::warn!(error = %e, "Sign-in refused");
                    ServiceError::InvalidCredentials
                } else {
                    ServiceError::Api(e)
                }
            })?
            .into_inner();

        let user = current_user(payload.user)?;
        tracing::info!(user_id = %user.id, role = %user.role(), "Signed in");

        Ok(SignedIn {
            user,
            token: SecretString::from(payload.token),
        })
    }
}

/// Session identity of a signed-in user.
fn current_user(user: SignedInUser) -> Result<CurrentUser, ServiceError> {
    let actor = match user.role {
        Role::Admin => Actor::Admin,
        Role::Moderator => Actor::Moderator {
            restaurant_id: user
                .restaurant
                .as_ref()
                .map(|r| r.id)
                .ok_or(ServiceError::NoRestaurant)?,
        },
    };

    Ok(CurrentUser {
        id: user.id,
        name: user.name,
        actor,
    })
}

/// Whether the API refused the credentials, as opposed to failing.
fn is_refusal(error: &ApiError) -> bool {
    match error {
        ApiError::Unauthorized(_) => true,
        ApiError::GraphQL(errors) => errors.iter().any(GraphQLError::is_auth_failure),
        _ => false,
    }
}
