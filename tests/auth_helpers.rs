use immo_api::{
    error::AppError,
    services::auth_service::{
        OTP_LEN, decode_token, generate_otp, hash_password, issue_token, normalize_email,
        normalize_phone, validate_password, verify_password,
    },
};
use uuid::Uuid;

#[test]
fn password_policy() {
    assert!(validate_password("Secret123").is_ok());
    for weak in ["short1A", "alllowercase1", "ALLUPPERCASE1", "NoDigitsHere"] {
        assert!(
            matches!(validate_password(weak), Err(AppError::BadRequest(_))),
            "{weak} should be rejected"
        );
    }
}

#[test]
fn otp_is_six_digits() {
    for _ in 0..50 {
        let otp = generate_otp();
        assert_eq!(otp.len(), OTP_LEN);
        assert!(otp.chars().all(|c| c.is_ascii_digit()));
    }
}

#[test]
fn phone_numbers_normalise_to_e164() {
    assert_eq!(normalize_phone("06 12 34 56 78").unwrap(), "+33612345678");
    assert_eq!(normalize_phone("06.12.34.56.78").unwrap(), "+33612345678");
    assert_eq!(normalize_phone("0033612345678").unwrap(), "+33612345678");
    assert_eq!(normalize_phone("+1 (415) 555-0100").unwrap(), "+14155550100");
    assert!(normalize_phone("12345").is_err());
    assert!(normalize_phone("+33 6 12 ab 56 78").is_err());
}

#[test]
fn emails_are_trimmed_and_lowercased() {
    assert_eq!(normalize_email("  Jane.Doe@Example.COM ").unwrap(), "jane.doe@example.com");
    assert!(normalize_email("no-at-sign.example.com").is_err());
    assert!(normalize_email("jane@localhost").is_err());
}

#[test]
fn password_hash_round_trip() {
    let hash = hash_password("Secret123").unwrap();
    assert!(verify_password("Secret123", &hash).unwrap());
    assert!(!verify_password("Secret124", &hash).unwrap());
}

#[test]
fn tokens_carry_identity_and_require_the_same_secret() {
    let user_id = Uuid::new_v4();
    let token = issue_token(
        "secret",
        1,
        user_id,
        "jane@example.com",
        "agent",
        vec!["agent".into()],
    )
    .unwrap();

    let claims = decode_token("secret", &token).unwrap();
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.role, "agent");
    assert_eq!(claims.roles, vec!["agent".to_string()]);

    assert!(matches!(
        decode_token("other-secret", &token),
        Err(AppError::Unauthorized(_))
    ));
}

#[test]
fn expired_tokens_are_rejected() {
    let token = issue_token("secret", -2, Uuid::new_v4(), "jane@example.com", "user", vec![]).unwrap();
    assert!(decode_token("secret", &token).is_err());
}
