//! Invitation API integration tests
//!
//! Drives the full router over in-memory stores and mock transports:
//! - POST /v1/invitations - Invite by email, spouse email or phone
//! - GET /v1/invitations - List own invitations
//! - POST /v1/invitations/accept - Accept an invitation
//! - GET /v1/invitations/invited-user/{hash} - Resolve a link token

#![allow(dead_code)]

mod common;

use axum::http::{Method, StatusCode};
use roster_sms::mock::MockSmsOutcome;
use serde_json::json;

use crate::common::{TestApp, APP_BASE_URL};

mod test_invite {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_invite_by_email_sends_link_with_stored_token() {
        let app = TestApp::new();
        let inviter = app.user();

        let (status, body) = app
            .send(
                Method::POST,
                "/v1/invitations",
                Some(&inviter.jwt_token),
                Some(json!({ "email": "newcomer@example.com" })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "We have sent an invitation to the user");
        assert!(body.get("phone").is_none());
        assert_eq!(body["invited_invitation"]["email"], "newcomer@example.com");
        assert_eq!(
            body["invited_invitation"]["user_id"],
            inviter.id.to_string()
        );

        let hash = body["invited_invitation"]["hash"].as_str().unwrap();
        let captured = app
            .email
            .latest_invitation("newcomer@example.com")
            .unwrap();
        assert_eq!(captured.extract_invitation_token().as_deref(), Some(hash));
        assert!(captured
            .message
            .body_text
            .contains(&format!("{}/invitations/invited-user/{}", APP_BASE_URL, hash)));
        assert_eq!(app.store.invitation_count(), 1);
    }

    #[tokio::test]
    async fn test_invite_registered_user_is_unprocessable() {
        let app = TestApp::new();
        let inviter = app.user();
        app.users.register("member@example.com");

        let (status, body) = app
            .send(
                Method::POST,
                "/v1/invitations",
                Some(&inviter.jwt_token),
                Some(json!({ "email": "member@example.com" })),
            )
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert_eq!(
            body["message"]["email"][0],
            "The email has already been taken."
        );
        assert_eq!(app.store.invitation_count(), 0);
        assert_eq!(app.email.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_invite_conflicts() {
        let app = TestApp::new();
        let inviter = app.user();
        let payload = json!({ "email": "twice@example.com" });

        let (first, _) = app
            .send(
                Method::POST,
                "/v1/invitations",
                Some(&inviter.jwt_token),
                Some(payload.clone()),
            )
            .await;
        let (second, body) = app
            .send(
                Method::POST,
                "/v1/invitations",
                Some(&inviter.jwt_token),
                Some(payload),
            )
            .await;

        assert_eq!(first, StatusCode::CREATED);
        assert_eq!(second, StatusCode::CONFLICT);
        assert_eq!(body["message"][0], "This user was already invited");
        assert_eq!(app.store.invitation_count(), 1);
        assert_eq!(app.email.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_spouse_invite_records_type() {
        let app = TestApp::new();
        let inviter = app.user();

        let (status, body) = app
            .send(
                Method::POST,
                "/v1/invitations",
                Some(&inviter.jwt_token),
                Some(json!({ "spouse_email": "spouse@example.com", "type": "spouse" })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["invited_invitation"]["email"], "spouse@example.com");
        assert_eq!(body["invited_invitation"]["type"], "spouse");
    }

    #[tokio::test]
    async fn test_invite_by_phone_returns_normalized_number() {
        let app = TestApp::new();
        let inviter = app.user();

        let (status, body) = app
            .send(
                Method::POST,
                "/v1/invitations",
                Some(&inviter.jwt_token),
                Some(json!({ "phone": "07123456789" })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["phone"], "+447123456789");
        assert_eq!(
            body["message"],
            "Invitation on +447123456789 successfully sent"
        );

        let hash = body["invited_invitation"]["hash"].as_str().unwrap();
        let sent = app.sms.messages_to("+447123456789");
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].body,
            format!(
                "Please, go by this link {}/invitations/invited-user/{} and get registered.",
                APP_BASE_URL, hash
            )
        );
    }

    #[tokio::test]
    async fn test_short_phone_is_unprocessable() {
        let app = TestApp::new();
        let inviter = app.user();

        let (status, body) = app
            .send(
                Method::POST,
                "/v1/invitations",
                Some(&inviter.jwt_token),
                Some(json!({ "phone": "071234" })),
            )
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["message"]["phone"][0],
            "The phone number must contain at least 11 characters"
        );
        assert_eq!(app.sms.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_rejected_number_asks_for_national_format() {
        let app = TestApp::new();
        let inviter = app.user();
        app.sms.set_outcome(MockSmsOutcome::RejectDestination);

        let (status, body) = app
            .send(
                Method::POST,
                "/v1/invitations",
                Some(&inviter.jwt_token),
                Some(json!({ "phone": "09999999999" })),
            )
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["message"][0],
            "The \"09999999999\" number is incorrect. Please enter in the normal UK format. XXXXX XXXXXX"
        );
        assert_eq!(app.store.invitation_count(), 0);
    }

    #[tokio::test]
    async fn test_email_outage_is_bad_gateway() {
        let app = TestApp::new();
        let inviter = app.user();
        app.email.fail_with("ses unavailable");

        let (status, body) = app
            .send(
                Method::POST,
                "/v1/invitations",
                Some(&inviter.jwt_token),
                Some(json!({ "email": "newcomer@example.com" })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["success"], false);
        assert_eq!(app.store.invitation_count(), 0);
    }

    #[tokio::test]
    async fn test_invite_without_contact_is_unprocessable() {
        let app = TestApp::new();
        let inviter = app.user();

        let (status, body) = app
            .send(
                Method::POST,
                "/v1/invitations",
                Some(&inviter.jwt_token),
                Some(json!({ "type": "spouse" })),
            )
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_invite_requires_authentication() {
        let app = TestApp::new();

        let (status, _) = app
            .send(
                Method::POST,
                "/v1/invitations",
                None,
                Some(json!({ "email": "newcomer@example.com" })),
            )
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(app.email.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_registered_email_in_other_case_is_unprocessable() {
        let app = TestApp::new();
        let inviter = app.user();
        app.users.register("member@example.com");

        let (status, body) = app
            .send(
                Method::POST,
                "/v1/invitations",
                Some(&inviter.jwt_token),
                Some(json!({ "email": "Member@Example.com" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"]["email"][0], "The email has already been taken.");

        let (first, _) = app
            .send(
                Method::POST,
                "/v1/invitations",
                Some(&inviter.jwt_token),
                Some(json!({ "email": "Newcomer@Example.com" })),
            )
            .await;
        let (second, _) = app
            .send(
                Method::POST,
                "/v1/invitations",
                Some(&inviter.jwt_token),
                Some(json!({ "email": "newcomer@EXAMPLE.com" })),
            )
            .await;

        assert_eq!(first, StatusCode::CREATED);
        assert_eq!(second, StatusCode::CONFLICT);
        assert_eq!(app.store.invitation_count(), 1);
        assert_eq!(app.email.sent_to("newcomer@example.com").len(), 1);
    }

    #[tokio::test]
    async fn test_spaced_short_phone_is_unprocessable() {
        let app = TestApp::new();
        let inviter = app.user();

        let (status, body) = app
            .send(
                Method::POST,
                "/v1/invitations",
                Some(&inviter.jwt_token),
                Some(json!({ "phone": "0712 345 67" })),
            )
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["message"]["phone"][0],
            "The phone number must contain at least 11 characters"
        );
        assert_eq!(app.sms.sent_count(), 0);
        assert_eq!(app.store.invitation_count(), 0);
    }
}

mod test_list {
    use super::*;

    #[tokio::test]
    async fn test_list_shows_only_callers_invitations() {
        let app = TestApp::new();
        let alice = app.user();
        let bob = app.user();

        for (user, payload) in [
            (&alice, json!({ "email": "a1@example.com" })),
            (&bob, json!({ "email": "b1@example.com" })),
            (&alice, json!({ "phone": "07000000001" })),
        ] {
            let (status, _) = app
                .send(
                    Method::POST,
                    "/v1/invitations",
                    Some(&user.jwt_token),
                    Some(payload),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = app
            .send(Method::GET, "/v1/invitations", Some(&alice.jwt_token), None)
            .await;

        assert_eq!(status, StatusCode::OK);
        let invitations = body.as_array().unwrap();
        assert_eq!(invitations.len(), 2);
        assert!(invitations
            .iter()
            .all(|i| i["user_id"] == alice.id.to_string()));
    }
}

mod test_accept {
    use super::*;

    async fn invite(app: &TestApp, token: &str, payload: serde_json::Value) -> String {
        let (status, body) = app
            .send(Method::POST, "/v1/invitations", Some(token), Some(payload))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["invited_invitation"]["hash"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_accept_removes_invitation_and_creates_membership() {
        let app = TestApp::new();
        let inviter = app.user();
        let hash = invite(&app, &inviter.jwt_token, json!({ "email": "joiner@example.com" })).await;

        let joiner_id = uuid::Uuid::new_v4();
        let joiner_token = app.token_for(joiner_id, "joiner@example.com");

        let (status, body) = app
            .send(
                Method::POST,
                "/v1/invitations/accept",
                Some(&joiner_token),
                Some(json!({ "hash": hash })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["removed_invitations"], 1);
        assert_eq!(body["membership"]["user_id"], joiner_id.to_string());
        assert_eq!(body["membership"]["invited_id"], inviter.id.to_string());
        assert_eq!(app.store.invitation_count(), 0);
        assert_eq!(app.store.members().len(), 1);
    }

    #[tokio::test]
    async fn test_other_user_cannot_accept_invitation() {
        let app = TestApp::new();
        let alice = app.user();
        let mallory = app.user();
        let hash = invite(&app, &alice.jwt_token, json!({ "email": "victim@example.com" })).await;

        let (status, body) = app
            .send(
                Method::POST,
                "/v1/invitations/accept",
                Some(&mallory.jwt_token),
                Some(json!({ "hash": hash })),
            )
            .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["success"], false);
        assert_eq!(app.store.invitation_count(), 1);
        assert!(app.store.members().is_empty());
    }

    #[tokio::test]
    async fn test_accept_without_token_is_rejected() {
        let app = TestApp::new();
        let alice = app.user();
        let mallory = app.user();
        invite(&app, &alice.jwt_token, json!({ "email": "victim@example.com" })).await;

        let (unknown, _) = app
            .send(
                Method::POST,
                "/v1/invitations/accept",
                Some(&mallory.jwt_token),
                Some(json!({ "hash": "guessed-token" })),
            )
            .await;
        let (empty, body) = app
            .send(
                Method::POST,
                "/v1/invitations/accept",
                Some(&mallory.jwt_token),
                Some(json!({ "hash": "" })),
            )
            .await;
        let (legacy, _) = app
            .send(
                Method::POST,
                "/v1/invitations/accept",
                Some(&mallory.jwt_token),
                Some(json!({ "email": "victim@example.com", "invited_id": alice.id })),
            )
            .await;

        assert_eq!(unknown, StatusCode::NOT_FOUND);
        assert_eq!(empty, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"]["hash"][0], "The hash field is required.");
        assert!(legacy.is_client_error());
        assert_eq!(app.store.invitation_count(), 1);
        assert!(app.store.members().is_empty());
    }

    #[tokio::test]
    async fn test_phone_invitation_accepted_with_link_token() {
        let app = TestApp::new();
        let inviter = app.user();
        let joiner = app.user();
        let hash = invite(&app, &inviter.jwt_token, json!({ "phone": "07123456789" })).await;

        let (status, body) = app
            .send(
                Method::POST,
                "/v1/invitations/accept",
                Some(&joiner.jwt_token),
                Some(json!({ "hash": hash })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["membership"]["invited_id"], inviter.id.to_string());
        assert_eq!(app.store.invitation_count(), 0);
    }
}

mod test_invited_user {
    use super::*;

    #[tokio::test]
    async fn test_link_token_resolves_invitation() {
        let app = TestApp::new();
        let inviter = app.user();

        let (_, body) = app
            .send(
                Method::POST,
                "/v1/invitations",
                Some(&inviter.jwt_token),
                Some(json!({ "email": "linked@example.com" })),
            )
            .await;
        let hash = body["invited_invitation"]["hash"].as_str().unwrap().to_string();

        let (status, body) = app
            .send(
                Method::GET,
                &format!("/v1/invitations/invited-user/{}", hash),
                None,
                None,
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "linked@example.com");
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_found() {
        let app = TestApp::new();

        let (status, body) = app
            .send(
                Method::GET,
                "/v1/invitations/invited-user/unknown-token",
                None,
                None,
            )
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"][0], "Invitation not found");
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let (status, _) = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
}
