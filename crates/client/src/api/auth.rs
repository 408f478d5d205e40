//! Authentication and account management against `/auth`.
//!
//! Login, registration, and OTP verification all end the same way: when the
//! gateway hands back a token, the facade persists the session (token,
//! effective role, user id) through the session repository and reports the
//! role-based landing path. Logout is purely local - the gateway keeps no
//! server-side session to destroy.

use std::sync::Arc;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use medicart_core::{Email, Role, UserId};

use crate::error::GatewayError;
use crate::gateway::GatewayClient;
use crate::session::{Session, SessionStore};

/// Credential exchange request.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Account creation request (pre-OTP).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Display name.
    pub full_name: String,
    /// Contact phone, digits only.
    pub phone: String,
}

/// Token response from login / registration / OTP verification.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Numeric user id.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Account email.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Bearer token, absent on verification-only responses.
    #[serde(default)]
    pub token: Option<String>,
    /// Token scheme, normally `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Granted roles.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Established session summary handed back to the caller after a successful
/// authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Effective role.
    pub role: Role,
    /// Numeric user id, when the gateway reported one.
    pub user_id: Option<UserId>,
    /// Role-based landing path (`/admin/dashboard` for admins, `/` otherwise).
    pub redirect_target: &'static str,
}

/// Response from `/auth/otp/send`.
///
/// The email service is mocked outside production, so the gateway returns the
/// OTP in the response for demo purposes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpSendResponse {
    /// Status message.
    #[serde(default)]
    pub message: Option<String>,
    /// Email the OTP was issued for.
    #[serde(default)]
    pub email: Option<String>,
    /// Demo OTP value (non-production only).
    #[serde(default)]
    pub demo_otp: Option<String>,
    /// Minutes until the OTP expires.
    #[serde(default)]
    pub expiry_minutes: Option<i64>,
    /// Gateway note about the mocked email service.
    #[serde(default)]
    pub note: Option<String>,
}

/// Request for `/auth/otp/verify`.
///
/// With the registration fields set, a verified OTP completes registration
/// and returns a token. Without them the gateway only confirms the email.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    /// Email the OTP was issued for.
    pub email: String,
    /// The OTP value entered by the user.
    pub otp: String,
    /// Registration: display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Registration: contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Registration: password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OtpVerifyResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    user_id: Option<i64>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Outcome of an OTP verification.
#[derive(Debug, Clone)]
pub enum OtpVerifyOutcome {
    /// The gateway returned a token; a session was persisted.
    Authenticated(AuthSession),
    /// The email was verified but no token was issued.
    Verified {
        /// Verified email, when echoed back.
        email: Option<String>,
        /// Gateway status message.
        message: Option<String>,
    },
}

/// A user account as managed under `/auth/users`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Numeric user id.
    #[serde(default)]
    pub id: Option<i64>,
    /// Account email.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Granted roles.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Profile update request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// New contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Plain status-message response.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    /// Status message.
    #[serde(default)]
    pub message: Option<String>,
}

impl GatewayClient {
    /// Exchange credentials for a token and persist the session.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Unauthorized` on bad credentials,
    /// `GatewayError::UnexpectedResponse` if the gateway omits the token, or
    /// any pipeline error.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<AuthSession, GatewayError> {
        let response: LoginResponse = self
            .post_json(
                "/auth/login",
                &LoginRequest {
                    email: email.as_str(),
                    password,
                },
            )
            .await?;

        let token = response
            .token
            .as_deref()
            .ok_or(GatewayError::UnexpectedResponse("login response missing token"))?;

        let session = persist_session(
            self.session_store(),
            token,
            &response.roles,
            response.user_id,
        )?;
        self.request_log().info(
            "Login succeeded",
            Some(serde_json::json!({ "role": session.role.as_str() })),
        );
        Ok(session)
    }

    /// Create an account (pre-OTP). When the gateway issues a token right
    /// away, the session is persisted exactly as for login.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<Option<AuthSession>, GatewayError> {
        let response: LoginResponse = self.post_json("/auth/register", request).await?;

        match response.token.as_deref() {
            Some(token) => Ok(Some(persist_session(
                self.session_store(),
                token,
                &response.roles,
                response.user_id,
            )?)),
            None => Ok(None),
        }
    }

    /// Trigger OTP issuance for an email.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn send_otp(&self, email: &Email) -> Result<OtpSendResponse, GatewayError> {
        self.post_json(
            "/auth/otp/send",
            &serde_json::json!({ "email": email.as_str() }),
        )
        .await
    }

    /// Verify an OTP, completing registration when the registration fields
    /// are present. Persists the session when a token comes back.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails or the OTP is rejected.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn verify_otp(
        &self,
        request: &VerifyOtpRequest,
    ) -> Result<OtpVerifyOutcome, GatewayError> {
        let response: OtpVerifyResponse = self.post_json("/auth/otp/verify", request).await?;

        match response.token.as_deref() {
            Some(token) => {
                let session = persist_session(
                    self.session_store(),
                    token,
                    &response.roles,
                    response.user_id,
                )?;
                Ok(OtpVerifyOutcome::Authenticated(session))
            }
            None => Ok(OtpVerifyOutcome::Verified {
                email: response.email,
                message: response.message,
            }),
        }
    }

    /// Fetch the current user's profile.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn current_user(&self) -> Result<UserDto, GatewayError> {
        self.get_json("/auth/me").await
    }

    /// List all users (admin only).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn list_users(&self) -> Result<Vec<UserDto>, GatewayError> {
        self.get_json("/auth/users").await
    }

    /// Update a user's profile.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        request: &UpdateProfileRequest,
    ) -> Result<UserDto, GatewayError> {
        self.put_json(&format!("/auth/users/{user_id}"), request)
            .await
    }

    /// Delete a user (admin only).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn delete_user(&self, user_id: UserId) -> Result<(), GatewayError> {
        self.delete(&format!("/auth/users/{user_id}")).await
    }

    /// Change the current user's password.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<MessageResponse, GatewayError> {
        self.post_json(
            "/auth/change-password",
            &serde_json::json!({
                "oldPassword": old_password,
                "newPassword": new_password,
            }),
        )
        .await
    }

    /// Start a password reset for an email.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn forgot_password(&self, email: &Email) -> Result<MessageResponse, GatewayError> {
        self.post_json(
            "/auth/forgot-password",
            &serde_json::json!({ "email": email.as_str() }),
        )
        .await
    }

    /// Complete a password reset with the emailed token.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        reset_token: &str,
        new_password: &str,
    ) -> Result<MessageResponse, GatewayError> {
        self.post_json(
            "/auth/reset-password",
            &serde_json::json!({
                "token": reset_token,
                "newPassword": new_password,
            }),
        )
        .await
    }

    /// Destroy the local session. Auth headers disappear from subsequent
    /// requests because the pipeline recomputes them per request.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Session` if the session store cannot be
    /// cleared.
    pub fn logout(&self) -> Result<(), GatewayError> {
        self.session_store().clear()?;
        self.request_log().info("User logged out", None);
        Ok(())
    }
}

/// Persist a freshly issued token and derive the session summary.
///
/// The effective role is `Admin` iff any granted role is `"ADMIN"`; the user
/// id is kept as the identity fallback for tokens that do not encode one.
fn persist_session(
    store: &Arc<dyn SessionStore>,
    token: &str,
    roles: &[String],
    user_id: Option<i64>,
) -> Result<AuthSession, GatewayError> {
    let role = Role::from_granted(roles);
    let user_id = user_id.map(UserId::new);

    store.store(&Session {
        access_token: Some(SecretString::from(token)),
        role: Some(role),
        user_id,
    })?;

    Ok(AuthSession {
        role,
        user_id,
        redirect_target: role.redirect_target(),
    })
}
