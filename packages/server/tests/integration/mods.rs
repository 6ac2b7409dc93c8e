use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{Value, json};

use modhub::entity::{comment, game_mod, mod_compatibility, mod_image, mod_tag};

use crate::common::{TestApp, mod_body, routes};

/// Admin token, plain user token, moderator token and a plain category id.
async fn setup(app: &TestApp) -> (String, String, String, i32) {
    let admin = app.create_user_with_role("admin", "admin").await;
    let user = app.create_authenticated_user("alice").await;
    let moderator = app.create_user_with_role("mod_squad", "moderator").await;
    let category = app.create_category(&admin, "Misc", false, false).await;
    (admin, user, moderator, category)
}

fn with(mut body: Value, key: &str, value: Value) -> Value {
    body[key] = value;
    body
}

mod create {
    use super::*;

    #[tokio::test]
    async fn file_size_boundaries() {
        let app = TestApp::spawn().await;
        let (_, user, _, category) = setup(&app).await;

        for size in [1_i64, 536_870_912, 1_073_741_824] {
            let body = with(mod_body("Sized", category), "file_size", json!(size));
            let res = app.post_with_token(routes::MODS, &body, &user).await;
            assert_eq!(res.status, 201, "size {size}: {}", res.text);
            assert_eq!(res.body["file_size"], size);
        }

        for size in [0_i64, -5, 1_073_741_825] {
            let body = with(mod_body("Sized", category), "file_size", json!(size));
            let res = app.post_with_token(routes::MODS, &body, &user).await;
            assert_eq!(res.status, 400, "size {size}");
            assert_eq!(res.body["code"], "INVALID_FILE_SIZE");
        }
    }

    #[tokio::test]
    async fn sizes_beyond_i64_are_invalid_file_sizes() {
        let app = TestApp::spawn().await;
        let (_, user, _, category) = setup(&app).await;
        let template = serde_json::to_string(&mod_body("Huge", category)).unwrap();

        for size in [
            "9223372036854775808",
            "-9223372036854775809",
            "18446744073709551616",
        ] {
            let body = template.replace("12288", size);
            let res = app.post_raw_with_token(routes::MODS, &body, &user).await;
            assert_eq!(res.status, 400, "size {size}: {}", res.text);
            assert_eq!(res.body["code"], "INVALID_FILE_SIZE", "size {size}");
        }

        let body = template.replace("12288", "1.5");
        let res = app.post_raw_with_token(routes::MODS, &body, &user).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let count = game_mod::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn description_is_stored_trimmed() {
        let app = TestApp::spawn().await;
        let (_, user, _, category) = setup(&app).await;
        let padded = format!("  {}\n\n", "d".repeat(1000));

        let body = with(mod_body("Padded", category), "description", json!(padded));
        let res = app.post_with_token(routes::MODS, &body, &user).await;
        assert_eq!(res.status, 201, "{}", res.text);

        let stored = game_mod::Entity::find().one(&app.db).await.unwrap().unwrap();
        assert_eq!(stored.description, "d".repeat(1000));
    }

    #[tokio::test]
    async fn new_mod_is_unapproved_with_defaults() {
        let app = TestApp::spawn().await;
        let (_, user, _, category) = setup(&app).await;

        let res = app
            .post_with_token(routes::MODS, &mod_body("Fresh", category), &user)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["approved"], false);
        assert_eq!(res.body["version"], "1.0.0");
        assert_eq!(res.body["downloads"], 0);
        assert!(res.body["thumbnail"].is_null());
        assert_eq!(res.body["category"]["name"], "Misc");
        assert!(res.body["rating"]["average"].is_null());
        assert_eq!(res.body["rating"]["count"], 0);
    }

    #[tokio::test]
    async fn category_is_required() {
        let app = TestApp::spawn().await;
        let (_, user, _, category) = setup(&app).await;

        let mut body = mod_body("Homeless", category);
        body.as_object_mut().unwrap().remove("category_id");
        let res = app.post_with_token(routes::MODS, &body, &user).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "MISSING_CATEGORY");

        let body = mod_body("Homeless", 9999);
        let res = app.post_with_token(routes::MODS, &body, &user).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "MISSING_CATEGORY");
    }

    #[tokio::test]
    async fn race_requirement_is_enforced() {
        let app = TestApp::spawn().await;
        let (admin, user, _, _) = setup(&app).await;
        let category = app.create_category(&admin, "Body", true, false).await;
        let race = app.create_lookup(routes::RACES, &admin, "Nord").await;

        let res = app
            .post_with_token(routes::MODS, &mod_body("Body mod", category), &user)
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "MISSING_RACE_COMPATIBILITY");

        let body = with(
            mod_body("Body mod", category),
            "compatibility",
            json!([{ "race_id": race }]),
        );
        let res = app.post_with_token(routes::MODS, &body, &user).await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["compatibility"][0]["race"]["name"], "Nord");
        assert!(res.body["compatibility"][0]["gender"].is_null());
    }

    #[tokio::test]
    async fn gender_requirement_needs_a_non_null_gender() {
        let app = TestApp::spawn().await;
        let (admin, user, _, _) = setup(&app).await;
        let category = app.create_category(&admin, "Outfits", false, true).await;
        let race = app.create_lookup(routes::RACES, &admin, "Nord").await;
        let gender = app.create_lookup(routes::GENDERS, &admin, "Female").await;

        let body = with(
            mod_body("Dress", category),
            "compatibility",
            json!([{ "race_id": race, "gender_id": null }]),
        );
        let res = app.post_with_token(routes::MODS, &body, &user).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "MISSING_GENDER_COMPATIBILITY");

        let body = with(
            mod_body("Dress", category),
            "compatibility",
            json!([{ "race_id": race, "gender_id": gender }]),
        );
        let res = app.post_with_token(routes::MODS, &body, &user).await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["compatibility"][0]["gender"]["name"], "Female");
    }

    #[tokio::test]
    async fn field_lengths_are_enforced() {
        let app = TestApp::spawn().await;
        let (_, user, _, category) = setup(&app).await;

        let cases = [
            ("title", json!("t".repeat(121))),
            ("title", json!("   ")),
            ("short_desc", json!("s".repeat(201))),
            ("description", json!("d".repeat(1001))),
            ("version", json!("v".repeat(21))),
        ];
        for (field, value) in cases {
            let body = with(mod_body("Lengthy", category), field, value);
            let res = app.post_with_token(routes::MODS, &body, &user).await;
            assert_eq!(res.status, 400, "{field}: {}", res.text);
            assert_eq!(res.body["code"], "INVALID_FIELD_LENGTH", "{field}");
        }

        let body = with(mod_body(&"t".repeat(120), category), "version", json!("2.0"));
        let res = app.post_with_token(routes::MODS, &body, &user).await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["version"], "2.0");
    }

    #[tokio::test]
    async fn failed_create_writes_nothing() {
        let app = TestApp::spawn().await;
        let (admin, user, _, _) = setup(&app).await;
        let category = app.create_category(&admin, "Body", true, false).await;
        let tag = app.create_lookup(routes::TAGS, &admin, "textures").await;

        let body = with(mod_body("Broken", category), "tag_ids", json!([tag]));
        let res = app.post_with_token(routes::MODS, &body, &user).await;
        assert_eq!(res.status, 400);

        assert_eq!(game_mod::Entity::find().count(&app.db).await.unwrap(), 0);
        assert_eq!(mod_tag::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_tag_is_rejected() {
        let app = TestApp::spawn().await;
        let (_, user, _, category) = setup(&app).await;

        let body = with(mod_body("Tagged", category), "tag_ids", json!([404]));
        let res = app.post_with_token(routes::MODS, &body, &user).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(game_mod::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn anonymous_upload_is_rejected() {
        let app = TestApp::spawn().await;
        let (_, _, _, category) = setup(&app).await;

        let res = app
            .post_without_token(routes::MODS, &mod_body("Anon", category))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}

mod moderation {
    use super::*;

    #[tokio::test]
    async fn unapproved_mod_is_hidden_until_approved() {
        let app = TestApp::spawn().await;
        let (_, user, moderator, category) = setup(&app).await;
        let uuid = app.create_mod(&user, &mod_body("Hidden", category)).await;

        let res = app.get_without_token(&routes::game_mod(&uuid)).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");

        let res = app
            .post_with_token(&routes::approve(&uuid), &json!({}), &moderator)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["approved"], true);

        let res = app.get_without_token(&routes::game_mod(&uuid)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "Hidden");
    }

    #[tokio::test]
    async fn plain_user_cannot_approve() {
        let app = TestApp::spawn().await;
        let (_, user, _, category) = setup(&app).await;
        let uuid = app.create_mod(&user, &mod_body("Self-approved", category)).await;

        let res = app
            .post_with_token(&routes::approve(&uuid), &json!({}), &user)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn pending_queue_lists_only_unapproved_mods() {
        let app = TestApp::spawn().await;
        let (_, user, moderator, category) = setup(&app).await;
        let approved = app
            .create_approved_mod(&user, &moderator, &mod_body("Live", category))
            .await;
        let pending = app.create_mod(&user, &mod_body("Waiting", category)).await;

        let res = app.get_with_token(routes::PENDING_MODS, &moderator).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.mod_uuids(), vec![pending]);
        assert!(!res.mod_uuids().contains(&approved));

        let res = app.get_with_token(routes::PENDING_MODS, &user).await;
        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn owner_sees_own_mods_in_every_state() {
        let app = TestApp::spawn().await;
        let (_, user, moderator, category) = setup(&app).await;
        let other = app.create_authenticated_user("bob").await;
        let live = app
            .create_approved_mod(&user, &moderator, &mod_body("Live", category))
            .await;
        let waiting = app.create_mod(&user, &mod_body("Waiting", category)).await;
        app.create_mod(&other, &mod_body("Not mine", category)).await;

        let res = app.get_with_token(routes::MY_MODS, &user).await;

        assert_eq!(res.status, 200);
        let uuids = res.mod_uuids();
        assert_eq!(uuids.len(), 2);
        assert!(uuids.contains(&live));
        assert!(uuids.contains(&waiting));
    }

    #[tokio::test]
    async fn reject_unapproves_and_drops_images() {
        let app = TestApp::spawn().await;
        let (_, user, moderator, category) = setup(&app).await;
        let uuid = app
            .create_approved_mod(&user, &moderator, &mod_body("Doomed", category))
            .await;
        app.add_image(&user, &uuid, "https://cdn.example.com/a.jpg", true)
            .await;

        let res = app
            .post_with_token(&routes::reject(&uuid), &json!({}), &moderator)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["approved"], false);
        assert!(res.body["thumbnail"].is_null());
        assert_eq!(mod_image::Entity::find().count(&app.db).await.unwrap(), 0);
        let res = app.get_without_token(&routes::game_mod(&uuid)).await;
        assert_eq!(res.status, 404);
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn owner_can_patch_selected_fields() {
        let app = TestApp::spawn().await;
        let (_, user, moderator, category) = setup(&app).await;
        let uuid = app
            .create_approved_mod(&user, &moderator, &mod_body("Before", category))
            .await;

        let res = app
            .patch_with_token(
                &routes::game_mod(&uuid),
                &json!({"title": "After", "version": "1.1.0"}),
                &user,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "After");
        assert_eq!(res.body["version"], "1.1.0");
        assert_eq!(res.body["short_desc"], "A short description");
    }

    #[tokio::test]
    async fn empty_patch_returns_mod_unchanged() {
        let app = TestApp::spawn().await;
        let (_, user, _, category) = setup(&app).await;
        let uuid = app.create_mod(&user, &mod_body("Same", category)).await;

        let res = app
            .patch_with_token(&routes::game_mod(&uuid), &json!({}), &user)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "Same");
    }

    #[tokio::test]
    async fn other_users_cannot_patch_but_moderators_can() {
        let app = TestApp::spawn().await;
        let (_, user, moderator, category) = setup(&app).await;
        let other = app.create_authenticated_user("bob").await;
        let uuid = app.create_mod(&user, &mod_body("Mine", category)).await;

        let res = app
            .patch_with_token(&routes::game_mod(&uuid), &json!({"title": "Stolen"}), &other)
            .await;
        assert_eq!(res.status, 403);

        let res = app
            .patch_with_token(
                &routes::game_mod(&uuid),
                &json!({"title": "Moderated"}),
                &moderator,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "Moderated");
    }

    #[tokio::test]
    async fn invalid_patch_leaves_mod_untouched() {
        let app = TestApp::spawn().await;
        let (_, user, _, category) = setup(&app).await;
        let uuid = app.create_mod(&user, &mod_body("Stable", category)).await;

        let res = app
            .patch_with_token(
                &routes::game_mod(&uuid),
                &json!({"title": "Changed", "file_size": 0}),
                &user,
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "INVALID_FILE_SIZE");

        let stored = game_mod::Entity::find().one(&app.db).await.unwrap().unwrap();
        assert_eq!(stored.title, "Stable");
        assert_eq!(stored.file_size, 12288);
    }

    #[tokio::test]
    async fn patch_with_size_beyond_i64_is_an_invalid_file_size() {
        let app = TestApp::spawn().await;
        let (_, user, _, category) = setup(&app).await;
        let uuid = app.create_mod(&user, &mod_body("Stable", category)).await;

        let res = app
            .patch_raw_with_token(
                &routes::game_mod(&uuid),
                r#"{"file_size": 9223372036854775808}"#,
                &user,
            )
            .await;
        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "INVALID_FILE_SIZE");

        let stored = game_mod::Entity::find().one(&app.db).await.unwrap().unwrap();
        assert_eq!(stored.file_size, 12288);
    }

    #[tokio::test]
    async fn patched_description_is_stored_trimmed() {
        let app = TestApp::spawn().await;
        let (_, user, _, category) = setup(&app).await;
        let uuid = app.create_mod(&user, &mod_body("Stable", category)).await;
        let padded = format!("\t{}   ", "e".repeat(1000));

        let res = app
            .patch_with_token(
                &routes::game_mod(&uuid),
                &json!({ "description": padded }),
                &user,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["description"], "e".repeat(1000));
    }

    #[tokio::test]
    async fn moving_to_a_stricter_category_is_revalidated() {
        let app = TestApp::spawn().await;
        let (admin, user, _, category) = setup(&app).await;
        let strict = app.create_category(&admin, "Body", true, false).await;
        let race = app.create_lookup(routes::RACES, &admin, "Nord").await;
        let uuid = app.create_mod(&user, &mod_body("Mover", category)).await;

        let res = app
            .patch_with_token(&routes::game_mod(&uuid), &json!({"category_id": strict}), &user)
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "MISSING_RACE_COMPATIBILITY");

        let res = app
            .patch_with_token(
                &routes::game_mod(&uuid),
                &json!({"category_id": strict, "compatibility": [{"race_id": race}]}),
                &user,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["category"]["id"], strict);
    }

    #[tokio::test]
    async fn clearing_required_compatibility_is_rejected() {
        let app = TestApp::spawn().await;
        let (admin, user, _, _) = setup(&app).await;
        let strict = app.create_category(&admin, "Body", true, false).await;
        let race = app.create_lookup(routes::RACES, &admin, "Nord").await;
        let body = with(
            mod_body("Keeper", strict),
            "compatibility",
            json!([{ "race_id": race }]),
        );
        let uuid = app.create_mod(&user, &body).await;

        let res = app
            .patch_with_token(&routes::game_mod(&uuid), &json!({"compatibility": []}), &user)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "MISSING_RACE_COMPATIBILITY");
        assert_eq!(mod_compatibility::Entity::find().count(&app.db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn tags_are_replaced_as_a_set() {
        let app = TestApp::spawn().await;
        let (admin, user, _, category) = setup(&app).await;
        let a = app.create_lookup(routes::TAGS, &admin, "alpha").await;
        let b = app.create_lookup(routes::TAGS, &admin, "beta").await;
        let uuid = app
            .create_mod(&user, &with(mod_body("Tagged", category), "tag_ids", json!([a])))
            .await;

        let res = app
            .patch_with_token(&routes::game_mod(&uuid), &json!({"tag_ids": [b]}), &user)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["tags"], json!([{"id": b, "name": "beta"}]));
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn delete_cascades_to_children() {
        let app = TestApp::spawn().await;
        let (admin, user, moderator, category) = setup(&app).await;
        let tag = app.create_lookup(routes::TAGS, &admin, "alpha").await;
        let uuid = app
            .create_approved_mod(
                &user,
                &moderator,
                &with(mod_body("Gone", category), "tag_ids", json!([tag])),
            )
            .await;
        app.add_image(&user, &uuid, "https://cdn.example.com/a.jpg", false)
            .await;
        let res = app
            .post_with_token(&routes::comments(&uuid), &json!({"text": "Nice"}), &user)
            .await;
        assert_eq!(res.status, 201);
        let res = app
            .post_with_token(&routes::ratings(&uuid), &json!({"score": 4}), &user)
            .await;
        assert_eq!(res.status, 200);
        let res = app
            .post_with_token(&routes::downloads(&uuid), &json!({}), &user)
            .await;
        assert_eq!(res.status, 200);

        let res = app.delete_with_token(&routes::game_mod(&uuid), &user).await;
        assert_eq!(res.status, 204, "{}", res.text);

        assert_eq!(game_mod::Entity::find().count(&app.db).await.unwrap(), 0);
        assert_eq!(mod_image::Entity::find().count(&app.db).await.unwrap(), 0);
        assert_eq!(mod_tag::Entity::find().count(&app.db).await.unwrap(), 0);
        assert_eq!(comment::Entity::find().count(&app.db).await.unwrap(), 0);
        let res = app.get_without_token(&routes::game_mod(&uuid)).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn strangers_cannot_delete() {
        let app = TestApp::spawn().await;
        let (_, user, _, category) = setup(&app).await;
        let other = app.create_authenticated_user("bob").await;
        let uuid = app.create_mod(&user, &mod_body("Mine", category)).await;

        let res = app.delete_with_token(&routes::game_mod(&uuid), &other).await;

        assert_eq!(res.status, 403);
        assert_eq!(game_mod::Entity::find().count(&app.db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_mod_is_not_found() {
        let app = TestApp::spawn().await;
        let (_, user, _, _) = setup(&app).await;

        let res = app
            .delete_with_token(
                &routes::game_mod("00000000-0000-0000-0000-000000000000"),
                &user,
            )
            .await;

        assert_eq!(res.status, 404);
    }
}
