//! Integration tests for `DieselUserRepository` against PostgreSQL.

use storefront::domain::ports::{UserRepository, UserRepositoryError};
use storefront::domain::{Email, PasswordHash, Role, UserId, UserRecord, Username};
use storefront::outbound::persistence::DieselUserRepository;

mod support;

fn record(name: &str, role: Role) -> UserRecord {
    UserRecord {
        id: UserId::random(),
        email: Email::new(format!("{name}@example.com")).expect("email"),
        username: Username::new(name).expect("username"),
        password_hash: PasswordHash::new("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"),
        role,
    }
}

#[tokio::test]
async fn insert_then_find_by_id() {
    let Some(pool) = support::test_pool().await else {
        return;
    };
    let repo = DieselUserRepository::new(pool);
    let record = record(&support::unique("ada"), Role::Admin);

    let inserted = repo.insert(&record).await.expect("insert");
    assert_eq!(inserted, record.to_user());

    let found = repo.find_by_id(&record.id).await.expect("query");
    assert_eq!(found, Some(record.to_user()));
}

#[tokio::test]
async fn find_by_identifier_matches_email_or_username() {
    let Some(pool) = support::test_pool().await else {
        return;
    };
    let repo = DieselUserRepository::new(pool);
    let record = record(&support::unique("grace"), Role::User);
    repo.insert(&record).await.expect("insert");

    let by_username = repo
        .find_by_identifier(record.username.as_ref())
        .await
        .expect("query")
        .expect("found by username");
    let by_email = repo
        .find_by_identifier(record.email.as_ref())
        .await
        .expect("query")
        .expect("found by email");

    assert_eq!(by_username.user.id(), &record.id);
    assert_eq!(by_email.user.id(), &record.id);
    assert_eq!(by_email.password_hash, record.password_hash);
    assert_eq!(by_email.user.role(), Role::User);
}

#[tokio::test]
async fn unknown_users_are_absent() {
    let Some(pool) = support::test_pool().await else {
        return;
    };
    let repo = DieselUserRepository::new(pool);

    assert!(repo.find_by_id(&UserId::random()).await.expect("query").is_none());
    assert!(
        repo.find_by_identifier(&support::unique("nobody"))
            .await
            .expect("query")
            .is_none()
    );
}

#[tokio::test]
async fn duplicate_username_reports_database_detail() {
    let Some(pool) = support::test_pool().await else {
        return;
    };
    let repo = DieselUserRepository::new(pool);
    let name = support::unique("dup");
    repo.insert(&record(&name, Role::User)).await.expect("first insert");

    let mut clash = record(&name, Role::User);
    clash.email = Email::new(format!("other-{name}@example.com")).expect("email");
    let err = repo.insert(&clash).await.expect_err("duplicate username");

    match err {
        UserRepositoryError::UniqueViolation { detail } => {
            assert!(detail.contains(&name), "detail should name the value: {detail}");
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}
