use serde_json::json;

use crate::common::{PASSWORD, TestApp, register_body, routes};

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_can_register_with_valid_credentials() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REGISTER, &register_body("alice"))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["email"], "alice@example.com");
        assert_eq!(res.body["role"], "user");
        assert!(res.body.get("password").is_none());
    }

    #[tokio::test]
    async fn taken_username_is_a_duplicate() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice").await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "alice", "email": "other@example.com", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "DUPLICATE");
    }

    #[tokio::test]
    async fn taken_email_is_a_duplicate() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice").await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "bob", "email": "ALICE@example.com", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "DUPLICATE");
    }

    #[tokio::test]
    async fn malformed_fields_are_rejected() {
        let app = TestApp::spawn().await;

        for body in [
            json!({"username": "bad name", "email": "a@example.com", "password": PASSWORD}),
            json!({"username": "alice", "email": "not-an-email", "password": PASSWORD}),
            json!({"username": "alice", "email": "a@example.com", "password": "short"}),
            json!({"username": "u".repeat(41), "email": "a@example.com", "password": PASSWORD}),
        ] {
            let res = app.post_without_token(routes::REGISTER, &body).await;
            assert_eq!(res.status, 400, "{body}");
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn missing_fields_are_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REGISTER, &json!({"username": "alice"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn login_returns_token_and_permissions() {
        let app = TestApp::spawn().await;
        app.post_without_token(routes::REGISTER, &register_body("alice"))
            .await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(res.body["role"], "user");
        assert_eq!(res.body["permissions"], json!(["mod:create"]));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice").await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": "wrongpassword"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_user_is_rejected_the_same_way() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "ghost", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod me {
    use super::*;

    #[tokio::test]
    async fn returns_the_current_user() {
        let app = TestApp::spawn().await;
        let token = app.create_user_with_role("mod_squad", "moderator").await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["username"], "mod_squad");
        assert_eq!(res.body["role"], "moderator");
        let perms = res.body["permissions"].as_array().unwrap();
        assert!(perms.contains(&json!("mod:approve")));
        assert!(!perms.contains(&json!("catalog:manage")));
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not.a.jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}
