//! Tests for the domain user model.

use super::*;
use rstest::rstest;
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn sample_user(role: Role) -> User {
    User::new(
        UserId::new(VALID_ID).expect("valid id"),
        Email::new("ada@example.com").expect("valid email"),
        Username::new("ada").expect("valid username"),
        role,
    )
}

#[rstest]
#[case("", UserValidationError::InvalidId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("   ", UserValidationError::EmptyEmail)]
#[case("not-an-email", UserValidationError::InvalidEmail)]
#[case("a@b", UserValidationError::InvalidEmail)]
#[case("a b@example.com", UserValidationError::InvalidEmail)]
fn email_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Email::new(raw).expect_err("invalid email"), expected);
}

#[rstest]
fn email_trims_whitespace() {
    let email = Email::new("  ada@example.com ").expect("valid email");
    assert_eq!(email.as_ref(), "ada@example.com");
}

#[rstest]
#[case("", UserValidationError::EmptyUsername)]
#[case("two words", UserValidationError::UsernameContainsWhitespace)]
fn username_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(raw).expect_err("invalid username"), expected);
}

#[rstest]
fn username_rejects_overlong_input() {
    let raw = "a".repeat(USERNAME_MAX + 1);
    assert_eq!(
        Username::new(raw).expect_err("too long"),
        UserValidationError::UsernameTooLong { max: USERNAME_MAX }
    );
}

#[rstest]
#[case("user", Role::User)]
#[case("ADMIN", Role::Admin)]
#[case(" admin ", Role::Admin)]
fn role_parses_known_values(#[case] raw: &str, #[case] expected: Role) {
    assert_eq!(raw.parse::<Role>().expect("known role"), expected);
}

#[rstest]
fn role_rejects_unknown_values() {
    let err = "owner".parse::<Role>().expect_err("unknown role");
    assert_eq!(err, UserValidationError::UnknownRole("owner".to_owned()));
}

#[rstest]
fn new_user_defaults_role() {
    let new_user = NewUser::try_from_parts("ada@example.com", "ada", "secret", None)
        .expect("valid sign-up");
    assert_eq!(new_user.role(), Role::User);
    assert_eq!(new_user.password(), "secret");
}

#[rstest]
fn new_user_accepts_explicit_role() {
    let new_user = NewUser::try_from_parts("ada@example.com", "ada", "secret", Some("admin"))
        .expect("valid sign-up");
    assert!(new_user.role().is_admin());
}

#[rstest]
fn new_user_requires_password() {
    let err = NewUser::try_from_parts("ada@example.com", "ada", "", None)
        .expect_err("empty password");
    assert_eq!(err, UserValidationError::EmptyPassword);
}

#[rstest]
fn user_serialises_without_credentials() {
    let value = serde_json::to_value(sample_user(Role::Admin)).expect("serialise");
    assert_eq!(
        value,
        json!({
            "id": VALID_ID,
            "email": "ada@example.com",
            "username": "ada",
            "role": "admin"
        })
    );
}

#[rstest]
fn password_hash_debug_is_redacted() {
    let hash = PasswordHash::new("$argon2id$v=19$secret");
    assert_eq!(format!("{hash:?}"), "PasswordHash(<redacted>)");
}

#[rstest]
fn user_record_projects_public_user() {
    let new_user = NewUser::try_from_parts("ada@example.com", "ada", "secret", None)
        .expect("valid sign-up");
    let id = UserId::new(VALID_ID).expect("valid id");
    let record = UserRecord::from_new_user(&new_user, id, PasswordHash::new("hash"));
    assert_eq!(record.to_user(), sample_user(Role::User));
}
