use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::{OsRng, RngCore};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{
        ChangePasswordRequest, Claims, ForgotPasswordRequest, LoginKind, LoginRequest,
        LoginResponse, ResetPasswordRequest, SignupRequest, VerifyOtpRequest,
    },
    entity::{
        Roles,
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Meta, empty_data},
    services::user_service::user_from_entity,
    state::AppState,
};

pub const OTP_LEN: usize = 6;
pub const SELF_ASSIGNABLE_ROLES: [&str; 2] = ["user", "agent"];
pub const KNOWN_ROLES: [&str; 3] = ["user", "agent", "admin"];
const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// At least 8 characters with one lowercase letter, one uppercase letter and one digit.
pub fn validate_password(password: &str) -> AppResult<()> {
    let long_enough = password.chars().count() >= 8;
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if long_enough && has_lower && has_upper && has_digit {
        return Ok(());
    }
    Err(AppError::BadRequest(
        "password must be at least 8 characters with a lowercase letter, an uppercase letter and a digit"
            .into(),
    ))
}

pub fn normalize_email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(AppError::BadRequest("Invalid email address".into()));
    }
    Ok(email)
}

/// Normalises a phone number to E.164. National French numbers (`0X...`)
/// are given the `+33` prefix.
pub fn normalize_phone(raw: &str) -> AppResult<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-' | '(' | ')'))
        .collect();
    let e164 = if let Some(rest) = compact.strip_prefix("00") {
        format!("+{rest}")
    } else if compact.starts_with('+') {
        compact
    } else if compact.len() == 10 && compact.starts_with('0') {
        format!("+33{}", &compact[1..])
    } else {
        return Err(AppError::BadRequest("Invalid phone number format".into()));
    };

    let digits = &e164[1..];
    if !(8..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::BadRequest("Invalid phone number format".into()));
    }
    Ok(e164)
}

/// Six digit one-time code drawn from the OS RNG.
pub fn generate_otp() -> String {
    let code = 100_000 + OsRng.next_u32() % 900_000;
    code.to_string()
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn issue_token(
    secret: &str,
    ttl_hours: i64,
    user_id: Uuid,
    email: &str,
    role: &str,
    roles: Vec<String>,
) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        roles,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn decode_token(secret: &str, token: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))
}

fn otp_is_valid(user: &UserModel, otp: &str) -> bool {
    let now = Utc::now();
    user.otp.as_deref() == Some(otp)
        && user
            .otp_expires_at
            .is_some_and(|exp| exp.with_timezone(&Utc) > now)
}

async fn find_by_identifier(state: &AppState, identifier: &str) -> AppResult<Option<UserModel>> {
    let email = identifier.trim().to_lowercase();
    let phone = normalize_phone(identifier).unwrap_or_else(|_| identifier.trim().to_string());
    Ok(Users::find()
        .filter(
            Condition::any()
                .add(UserCol::Email.eq(email))
                .add(UserCol::PhoneNumber.eq(phone)),
        )
        .one(state.db())
        .await?)
}

pub async fn signup(state: &AppState, payload: SignupRequest) -> AppResult<ApiResponse<User>> {
    let SignupRequest {
        last_name,
        first_name,
        email,
        phone_number,
        password,
        role,
    } = payload;

    if last_name.trim().is_empty() {
        return Err(AppError::BadRequest("last_name is required".into()));
    }
    let email = normalize_email(&email)?;
    let phone_number = normalize_phone(&phone_number)?;
    validate_password(&password)?;
    let role = role.unwrap_or_else(|| "user".to_string());
    if !SELF_ASSIGNABLE_ROLES.contains(&role.as_str()) {
        return Err(AppError::BadRequest(format!("role '{role}' cannot be requested")));
    }

    let existing = Users::find()
        .filter(
            Condition::any()
                .add(UserCol::Email.eq(email.as_str()))
                .add(UserCol::PhoneNumber.eq(phone_number.as_str())),
        )
        .one(state.db())
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "Email or phone number already exists".into(),
        ));
    }

    let otp = generate_otp();
    let otp_expires_at = Utc::now() + Duration::minutes(state.config.otp_ttl_minutes);
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        last_name: Set(last_name),
        first_name: Set(first_name),
        email: Set(email),
        phone_number: Set(phone_number),
        password_hash: Set(hash_password(&password)?),
        role: Set(role),
        verified: Set(false),
        otp: Set(Some(otp.clone())),
        otp_expires_at: Set(Some(otp_expires_at.fixed_offset())),
        reset_token: Set(None),
        reset_token_expires_at: Set(None),
        registered_at: Set(Utc::now().fixed_offset()),
    }
    .insert(state.db())
    .await?;

    let user = user_from_entity(user);
    state
        .notifier
        .send_otp(&user.email, user.greeting_name(), &otp)
        .await?;

    audit::record(
        state.db(),
        Some(user.id),
        "user_signup",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success("User created", user, None))
}

pub async fn verify_email_otp(
    state: &AppState,
    payload: VerifyOtpRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let email = payload.email.trim().to_lowercase();
    let user = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(state.db())
        .await?
        .filter(|u| otp_is_valid(u, &payload.otp))
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired OTP".into()))?;

    let mut active: UserActive = user.into();
    active.verified = Set(true);
    active.otp = Set(None);
    active.otp_expires_at = Set(None);
    let user = user_from_entity(active.update(state.db()).await?);

    state
        .notifier
        .send_welcome(&user.email, user.greeting_name())
        .await?;

    Ok(ApiResponse::success(
        "Email verified",
        empty_data(),
        Some(Meta::empty()),
    ))
}

pub async fn login(state: &AppState, payload: LoginRequest) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest {
        identifier,
        kind,
        password,
        otp,
    } = payload;

    let user = match kind {
        LoginKind::Email => {
            Users::find()
                .filter(UserCol::Email.eq(identifier.trim().to_lowercase()))
                .one(state.db())
                .await?
        }
        LoginKind::Phone => {
            let phone = normalize_phone(&identifier)?;
            Users::find()
                .filter(UserCol::PhoneNumber.eq(phone))
                .one(state.db())
                .await?
        }
    };
    let user = user.ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;
    if !user.verified {
        return Err(AppError::Unauthorized("Email not verified".into()));
    }

    let user = match kind {
        LoginKind::Email => {
            let password = password
                .ok_or_else(|| AppError::BadRequest("Password required for email login".into()))?;
            if !verify_password(&password, &user.password_hash)? {
                return Err(AppError::Unauthorized("Invalid credentials".into()));
            }
            user
        }
        LoginKind::Phone => {
            let Some(otp) = otp else {
                let code = generate_otp();
                let expires = Utc::now() + Duration::minutes(state.config.otp_ttl_minutes);
                let mut active: UserActive = user.into();
                active.otp = Set(Some(code.clone()));
                active.otp_expires_at = Set(Some(expires.fixed_offset()));
                let user = active.update(state.db()).await?;
                let name = user.first_name.as_deref().unwrap_or(&user.last_name);
                state.notifier.send_otp(&user.email, name, &code).await?;

                return Ok(ApiResponse::success(
                    "OTP sent",
                    LoginResponse {
                        token: None,
                        otp_sent: true,
                    },
                    Some(Meta::empty()),
                ));
            };
            if !otp_is_valid(&user, &otp) {
                return Err(AppError::Unauthorized("Invalid or expired OTP".into()));
            }
            let mut active: UserActive = user.into();
            active.otp = Set(None);
            active.otp_expires_at = Set(None);
            active.update(state.db()).await?
        }
    };

    let mut roles: Vec<String> = user
        .find_related(Roles)
        .all(state.db())
        .await?
        .into_iter()
        .map(|r| r.name)
        .collect();
    if roles.is_empty() {
        roles.push(user.role.clone());
    }

    let token = issue_token(
        &state.config.jwt_secret,
        state.config.jwt_ttl_hours,
        user.id,
        &user.email,
        &user.role,
        roles,
    )?;

    audit::record(
        state.db(),
        Some(user.id),
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id, "method": format!("{kind:?}").to_lowercase() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: Some(format!("Bearer {}", token)),
            otp_sent: false,
        },
        Some(Meta::empty()),
    ))
}

pub async fn change_password(
    state: &AppState,
    auth: &AuthUser,
    payload: ChangePasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let user = Users::find_by_id(auth.user_id)
        .one(state.db())
        .await?
        .ok_or(AppError::NotFound)?;
    if !verify_password(&payload.old_password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Old password is incorrect".into()));
    }
    validate_password(&payload.new_password)?;

    let mut active: UserActive = user.into();
    active.password_hash = Set(hash_password(&payload.new_password)?);
    let user = user_from_entity(active.update(state.db()).await?);

    state
        .notifier
        .send_password_changed(&user.email, user.greeting_name())
        .await?;
    audit::record(
        state.db(),
        Some(user.id),
        "password_change",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Password changed",
        empty_data(),
        Some(Meta::empty()),
    ))
}

pub async fn forgot_password(
    state: &AppState,
    payload: ForgotPasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let user = find_by_identifier(state, &payload.identifier)
        .await?
        .ok_or(AppError::NotFound)?;

    let token = Uuid::new_v4().to_string();
    let expires = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
    let mut active: UserActive = user.into();
    active.reset_token = Set(Some(token.clone()));
    active.reset_token_expires_at = Set(Some(expires.fixed_offset()));
    let user = user_from_entity(active.update(state.db()).await?);

    state
        .notifier
        .send_password_reset(&user.email, user.greeting_name(), &token)
        .await?;

    Ok(ApiResponse::success(
        "Password reset initiated",
        empty_data(),
        Some(Meta::empty()),
    ))
}

pub async fn reset_password(
    state: &AppState,
    payload: ResetPasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let now = Utc::now().fixed_offset();
    let user = Users::find()
        .filter(UserCol::ResetToken.eq(payload.token.as_str()))
        .filter(UserCol::ResetTokenExpiresAt.gt(now))
        .one(state.db())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired reset token".into()))?;
    validate_password(&payload.new_password)?;

    let mut active: UserActive = user.into();
    active.password_hash = Set(hash_password(&payload.new_password)?);
    active.reset_token = Set(None);
    active.reset_token_expires_at = Set(None);
    let user = user_from_entity(active.update(state.db()).await?);

    state
        .notifier
        .send_password_changed(&user.email, user.greeting_name())
        .await?;
    audit::record(
        state.db(),
        Some(user.id),
        "password_reset",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Password reset",
        empty_data(),
        Some(Meta::empty()),
    ))
}

/// Tokens are stateless; logging out only leaves a trace.
pub async fn logout(state: &AppState, auth: &AuthUser) -> AppResult<ApiResponse<serde_json::Value>> {
    tracing::info!(user_id = %auth.user_id, "user logged out");
    audit::record(
        state.db(),
        Some(auth.user_id),
        "user_logout",
        "users",
        serde_json::json!({ "user_id": auth.user_id }),
    )
    .await;
    Ok(ApiResponse::success("Logged out", empty_data(), Some(Meta::empty())))
}
