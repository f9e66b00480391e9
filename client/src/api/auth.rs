//! Authentication Endpoints

use serde::Serialize;
use tracing::{debug, info};

use nw_common::CurrentUser;

use super::ApiClient;
use crate::error::ApiResult;

/// Login request body.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Sign-up request body.
#[derive(Debug, Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    username: &'a str,
    password: &'a str,
}

/// Password reset body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResetRequest<'a> {
    email: &'a str,
    token: &'a str,
    new_password: &'a str,
}

impl ApiClient {
    /// Exchange credentials for a bearer token.
    ///
    /// The token is returned, not stored; the caller decides where it
    /// lives.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<String> {
        info!("Attempting login for user: {}", email);
        let env = self
            .post(
                "/user/login",
                &[],
                &LoginRequest { email, password },
                "log in",
            )
            .await?;
        env.field("token")
    }

    /// Administrator login against the dashboard-only endpoint.
    pub async fn admin_login(&self, email: &str, password: &str) -> ApiResult<String> {
        info!("Attempting admin login for user: {}", email);
        let env = self
            .post(
                "/user/admin-login",
                &[],
                &LoginRequest { email, password },
                "log in as admin",
            )
            .await?;
        env.field("token")
    }

    /// Register a new account. Verification is required before login.
    pub async fn sign_up(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> ApiResult<Option<String>> {
        let env = self
            .post(
                "/user/sign-up",
                &[],
                &SignUpRequest {
                    email,
                    username,
                    password,
                },
                "sign up",
            )
            .await?;
        Ok(env.into_message())
    }

    /// Submit the emailed verification code.
    pub async fn verify_account(&self, email: &str, code: &str) -> ApiResult<Option<String>> {
        let env = self
            .post(
                "/user/verification",
                &[],
                &serde_json::json!({ "email": email, "code": code }),
                "verify account",
            )
            .await?;
        Ok(env.into_message())
    }

    /// Ask the server to send a new verification code.
    pub async fn resend_verification(&self, email: &str) -> ApiResult<Option<String>> {
        let env = self
            .post(
                "/user/resend-verification",
                &[],
                &serde_json::json!({ "email": email }),
                "resend verification",
            )
            .await?;
        Ok(env.into_message())
    }

    /// Start the password reset flow.
    pub async fn request_password_reset(&self, email: &str) -> ApiResult<Option<String>> {
        let env = self
            .post(
                "/user/request-password-reset",
                &[],
                &serde_json::json!({ "email": email }),
                "request password reset",
            )
            .await?;
        Ok(env.into_message())
    }

    /// Complete the password reset flow with the emailed token.
    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> ApiResult<Option<String>> {
        let env = self
            .post(
                "/user/password-reset",
                &[],
                &PasswordResetRequest {
                    email,
                    token,
                    new_password,
                },
                "reset password",
            )
            .await?;
        Ok(env.into_message())
    }

    /// Fetch the user behind the held token.
    pub async fn current_user(&self) -> ApiResult<CurrentUser> {
        self.require_token().await?;
        let env = self.get("/user/user-info", &[], "fetch user info").await?;
        let user: CurrentUser = env.field("user")?;
        debug!("Fetched user info for {} (role {})", user.id, user.role_id);
        Ok(user)
    }

    /// Fetch the administrator behind the held token.
    pub async fn current_admin(&self) -> ApiResult<CurrentUser> {
        self.require_token().await?;
        let env = self.get("/user/admin-info", &[], "fetch admin info").await?;
        env.field("user")
    }
}
