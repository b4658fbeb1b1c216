use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, Debug, ToSchema)]
pub struct SignupRequest {
    pub last_name: String,
    pub first_name: Option<String>,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    /// Defaults to `user`. Only `user` and `agent` may be self-assigned.
    pub role: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoginKind {
    Email,
    Phone,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    /// Email address or phone number, depending on `type`.
    pub identifier: String,
    #[serde(rename = "type")]
    pub kind: LoginKind,
    pub password: Option<String>,
    pub otp: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Present once the caller is authenticated.
    pub token: Option<String>,
    /// True when a one-time code was just issued and must be sent back.
    pub otp_sent: bool,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ForgotPasswordRequest {
    pub identifier: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub roles: Vec<String>,
    pub exp: usize,
}
