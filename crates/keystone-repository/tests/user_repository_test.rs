//! Integration tests for PostgresUserRepository.
//!
//! These tests run against a real PostgreSQL database using testcontainers.
//! Requires Docker to be available on the system.

mod common;

use chrono::NaiveDate;
use common::TestDatabase;
use keystone_core::{Email, NewUser, PhoneNumber, StoreError, UserId};
use keystone_repository::{DatabasePoolInterface, PostgresUserRepository, UserRepository};

fn new_user(email: &str, phone: Option<&str>) -> NewUser {
    NewUser {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        middle_name: Some("King".to_string()),
        birthday: NaiveDate::from_ymd_opt(1815, 12, 10),
        email: Email::new(email).unwrap(),
        phone_number: phone.map(|p| PhoneNumber::new(p).unwrap()),
        password_hash: "$argon2id$v=19$m=1024,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
    }
}

#[tokio::test]
async fn test_create_and_get_by_id() {
    let db = TestDatabase::new().await;
    let repo = PostgresUserRepository::new(db.pool());

    let input = new_user("ada@example.com", Some("+442079460000"));
    let created = repo.create(&input).await.expect("Failed to create user");

    assert!(created.id.get() > 0);
    assert_eq!(created.email, input.email);
    assert_eq!(created.password_hash, input.password_hash);

    let found = repo
        .get_by_id(created.id)
        .await
        .expect("Query failed")
        .expect("User not found");

    assert_eq!(found, created);
    assert_eq!(found.birthday, NaiveDate::from_ymd_opt(1815, 12, 10));
    assert_eq!(found.middle_name.as_deref(), Some("King"));
}

#[tokio::test]
async fn test_get_by_id_not_found() {
    let db = TestDatabase::new().await;
    let repo = PostgresUserRepository::new(db.pool());

    let result = repo
        .get_by_id(UserId::new(424_242).unwrap())
        .await
        .expect("Query failed");

    assert!(result.is_none());
}

#[tokio::test]
async fn test_get_by_email() {
    let db = TestDatabase::new().await;
    let repo = PostgresUserRepository::new(db.pool());

    let created = repo.create(&new_user("findme@example.com", None)).await.unwrap();

    let found = repo
        .get_by_email("FindMe@Example.com")
        .await
        .expect("Query failed")
        .expect("User not found");
    assert_eq!(found.id, created.id);

    assert!(repo.get_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_classified_by_constraint() {
    let db = TestDatabase::new().await;
    let repo = PostgresUserRepository::new(db.pool());

    repo.create(&new_user("dup@example.com", None)).await.unwrap();
    let err = repo.create(&new_user("dup@example.com", None)).await.unwrap_err();

    assert_eq!(err, StoreError::DuplicateEmail);
}

#[tokio::test]
async fn test_duplicate_phone_classified_by_constraint() {
    let db = TestDatabase::new().await;
    let repo = PostgresUserRepository::new(db.pool());

    repo.create(&new_user("one@example.com", Some("+14155552671"))).await.unwrap();
    let err = repo
        .create(&new_user("two@example.com", Some("+14155552671")))
        .await
        .unwrap_err();

    assert_eq!(err, StoreError::DuplicatePhoneNumber);
}

#[tokio::test]
async fn test_null_phone_numbers_do_not_collide() {
    let db = TestDatabase::new().await;
    let repo = PostgresUserRepository::new(db.pool());

    let a = repo.create(&new_user("a@example.com", None)).await.unwrap();
    let b = repo.create(&new_user("b@example.com", None)).await.unwrap();
    assert_ne!(a.id, b.id);
    assert!(a.phone_number.is_none());
}

#[tokio::test]
async fn test_health_check() {
    let db = TestDatabase::new().await;
    db.pool().health_check().await.expect("Health check failed");
}
