//! Postgres store integration tests
//!
//! Require a database reachable at TEST_DATABASE_URL (or DATABASE_URL):
//! `cargo test -p roster-integration-tests --test postgres_store_test -- --ignored`

#![allow(dead_code)]

mod common;

use roster_common::RepositoryError;
use roster_teams::{
    Contact, Invitation, InvitationRepository, InvitationStore, TeamMember, UserDirectory,
    UserRepository,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::TestConfig;

async fn pool() -> PgPool {
    let config = TestConfig::from_env();
    let pool = PgPool::connect(&config.database_url).await.unwrap();
    sqlx::migrate!("../../migrations").run(&pool).await.unwrap();
    pool
}

fn unique_email(tag: &str) -> String {
    format!("{}_{}@roster.test", tag, Uuid::new_v4().simple())
}

fn email_invitation(inviter: Uuid, email: &str) -> Invitation {
    Invitation::new(
        inviter,
        Contact::Email(email.to_string()),
        Uuid::new_v4().simple().to_string(),
        None,
    )
}

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_duplicate_email_maps_to_already_exists() {
    let repo = InvitationRepository::new(pool().await);
    let inviter = Uuid::new_v4();
    let email = unique_email("dup");

    repo.create(&email_invitation(inviter, &email)).await.unwrap();
    let result = repo.create(&email_invitation(inviter, &email)).await;

    assert!(matches!(result, Err(RepositoryError::AlreadyExists)));
}

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_lookup_by_email_phone_and_hash() {
    let repo = InvitationRepository::new(pool().await);
    let inviter = Uuid::new_v4();
    let email = unique_email("lookup");
    let phone = format!("+4470{}", &Uuid::new_v4().as_u128().to_string()[..9]);

    let by_email = repo.create(&email_invitation(inviter, &email)).await.unwrap();
    let by_phone = repo
        .create(&Invitation::new(
            inviter,
            Contact::Phone(phone.clone()),
            Uuid::new_v4().simple().to_string(),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(repo.find_by_email(&email).await.unwrap().map(|i| i.id), Some(by_email.id));
    assert_eq!(repo.find_by_phone(&phone).await.unwrap().map(|i| i.id), Some(by_phone.id));
    assert_eq!(
        repo.find_by_hash(&by_email.hash).await.unwrap().map(|i| i.id),
        Some(by_email.id)
    );

    let listed = repo.list_by_inviter(inviter).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, by_email.id);
}

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_accept_is_transactional() {
    let pool = pool().await;
    let repo = InvitationRepository::new(pool.clone());
    let inviter = Uuid::new_v4();
    let email = unique_email("accept");
    repo.create(&email_invitation(inviter, &email)).await.unwrap();

    let member = TeamMember::new(Uuid::new_v4(), inviter);
    let contact = Contact::Email(email.clone());
    let removed = repo.accept(&contact, &member).await.unwrap();
    assert_eq!(removed, 1);
    assert!(repo.find_by_email(&email).await.unwrap().is_none());

    // Same membership id again violates the primary key; the delete must roll back.
    repo.create(&email_invitation(inviter, &email)).await.unwrap();
    let result = repo.accept(&contact, &member).await;
    assert!(result.is_err());
    assert!(repo.find_by_email(&email).await.unwrap().is_some());
}

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_emails_match_case_insensitively() {
    let pool = pool().await;
    let repo = InvitationRepository::new(pool.clone());
    let users = UserRepository::new(pool.clone());
    let inviter = Uuid::new_v4();
    let email = unique_email("case");
    let shouted = email.to_uppercase();

    repo.create(&email_invitation(inviter, &email)).await.unwrap();
    let duplicate = repo.create(&email_invitation(inviter, &shouted)).await;
    assert!(matches!(duplicate, Err(RepositoryError::AlreadyExists)));
    assert!(repo.find_by_email(&shouted).await.unwrap().is_some());

    let removed = repo
        .accept(
            &Contact::Email(shouted.clone()),
            &TeamMember::new(Uuid::new_v4(), inviter),
        )
        .await
        .unwrap();
    assert_eq!(removed, 1);

    sqlx::query("INSERT INTO users (id, email) VALUES ($1, $2)")
        .bind(Uuid::new_v4())
        .bind(&email)
        .execute(&pool)
        .await
        .unwrap();
    assert!(users.email_exists(&shouted).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_user_directory_reads_users_table() {
    let pool = pool().await;
    let users = UserRepository::new(pool.clone());
    let email = unique_email("registered");

    sqlx::query("INSERT INTO users (id, email) VALUES ($1, $2)")
        .bind(Uuid::new_v4())
        .bind(&email)
        .execute(&pool)
        .await
        .unwrap();

    assert!(users.email_exists(&email).await.unwrap());
    assert!(!users.email_exists(&unique_email("stranger")).await.unwrap());
}
