use axum::http::StatusCode;
use officedesk_backend::models::user::UserRole;
use serde_json::{json, Value};

mod support;
use support::TestApp;

#[tokio::test]
async fn users_read_themselves_and_admins_read_members() {
    let app = TestApp::new();
    let acme = app.seed_company("Acme").await;
    let globex = app.seed_company("Globex").await;
    let admin = app.seed_user(&acme, UserRole::Admin, Some("IT")).await;
    let alice = app.seed_user(&acme, UserRole::User, None).await;
    let bob = app.seed_user(&acme, UserRole::User, None).await;
    let outsider_admin = app.seed_user(&globex, UserRole::Admin, Some("IT")).await;

    let (status, body) = app
        .get(&format!("/api/users/{}", alice.id), Some(&app.token_for(&alice)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], alice.id.as_str());

    let (status, body) = app
        .get(&format!("/api/users/{}", bob.id), Some(&app.token_for(&alice)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Unauthorized");

    let (status, _) = app
        .get(&format!("/api/users/{}", bob.id), Some(&app.token_for(&admin)))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .get(
            &format!("/api/users/{}", bob.id),
            Some(&app.token_for(&outsider_admin)),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn role_changes_follow_department_rules() {
    let app = TestApp::new();
    let company = app.seed_company("Acme").await;
    let owner = app.seed_user(&company, UserRole::SuperAdmin, None).await;
    let user = app.seed_user(&company, UserRole::User, None).await;
    let token = app.token_for(&owner);
    let uri = format!("/api/users/{}/role", user.id);

    let (status, body) = app.put(&uri, Some(&token), json!({ "role": "overlord" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid role. Must be user, admin, or superadmin"
    );

    let (status, body) = app.put(&uri, Some(&token), json!({ "role": "admin" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Department is required for admin role");

    let (status, body) = app
        .put(&uri, Some(&token), json!({ "role": "admin", "department": "IT" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User role updated successfully");
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["user"]["department"], "IT");
    assert_eq!(body["user"]["jobTitle"], "Head of IT");

    let (status, body) = app.put(&uri, Some(&token), json!({ "role": "user" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"]["department"].is_null());
    assert!(body["user"]["jobTitle"].is_null());
}

#[tokio::test]
async fn only_super_admin_changes_roles() {
    let app = TestApp::new();
    let company = app.seed_company("Acme").await;
    let admin = app.seed_user(&company, UserRole::Admin, Some("HR")).await;
    let user = app.seed_user(&company, UserRole::User, None).await;

    let (status, _) = app
        .put(
            &format!("/api/users/{}/role", user.id),
            Some(&app.token_for(&admin)),
            json!({ "role": "admin", "department": "HR" }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn profile_updates_by_self_or_super_admin() {
    let app = TestApp::new();
    let company = app.seed_company("Acme").await;
    let owner = app.seed_user(&company, UserRole::SuperAdmin, None).await;
    let alice = app.seed_user(&company, UserRole::User, Some("IT")).await;
    let bob = app.seed_user(&company, UserRole::User, None).await;
    let uri = format!("/api/users/{}/profile", alice.id);

    let (status, body) = app
        .put(&uri, Some(&app.token_for(&alice)), json!({ "jobTitle": "Engineer" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["user"]["jobTitle"], "Engineer");
    assert_eq!(body["user"]["department"], "IT");

    let (status, body) = app
        .put(&uri, Some(&app.token_for(&owner)), json!({ "department": "HR" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["department"], "HR");

    let (status, _) = app
        .put(&uri, Some(&app.token_for(&bob)), json!({ "department": "Sales" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn notifications_track_decisions_since_last_login() {
    let app = TestApp::new();
    let company = app.seed_company("Acme").await;
    let owner = app.seed_user(&company, UserRole::SuperAdmin, None).await;
    let user = app.seed_user(&company, UserRole::User, None).await;
    let token = app.token_for(&user);
    let feed_uri = format!("/api/users/{}/notifications", user.id);

    let (status, body) = app.get(&feed_uri, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["message"], "Welcome! This is your first login.");

    let mut ids = Vec::new();
    for title in ["Printer jammed", "New chair"] {
        let (_, created) = app
            .post(
                "/api/requests",
                Some(&token),
                json!({ "title": title, "description": "Please", "category": "IT" }),
            )
            .await;
        ids.push(created["request"]["id"].as_str().expect("id").to_string());
    }

    let (status, body) = app
        .post(&format!("/api/users/{}/login", user.id), Some(&token), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login time updated");

    let admin_token = app.token_for(&owner);
    for (id, decision) in ids.iter().zip(["Completed", "Rejected"]) {
        let (status, _) = app
            .put(
                &format!("/api/requests/{}/status", id),
                Some(&admin_token),
                json!({ "status": decision }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = app.get(&feed_uri, Some(&token)).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["message"], "You have 2 new notifications");
    let feed: &Vec<Value> = body["notifications"].as_array().expect("notifications");
    assert_eq!(feed[0]["id"], ids[1].as_str());
    assert_eq!(feed[0]["type"], "warning");
    assert_eq!(
        feed[0]["message"],
        "Your IT request \"New chair\" has been rejected."
    );
    assert_eq!(feed[1]["type"], "success");
    assert_eq!(
        feed[1]["message"],
        "Your IT request \"Printer jammed\" has been approved!"
    );
}

#[tokio::test]
async fn login_and_notifications_are_self_only() {
    let app = TestApp::new();
    let company = app.seed_company("Acme").await;
    let owner = app.seed_user(&company, UserRole::SuperAdmin, None).await;
    let user = app.seed_user(&company, UserRole::User, None).await;
    let owner_token = app.token_for(&owner);

    let (status, _) = app
        .post(&format!("/api/users/{}/login", user.id), Some(&owner_token), json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .get(
            &format!("/api/users/{}/notifications", user.id),
            Some(&owner_token),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn super_admin_deletes_users_but_not_super_admins() {
    let app = TestApp::new();
    let company = app.seed_company("Acme").await;
    let owner = app.seed_user(&company, UserRole::SuperAdmin, None).await;
    let co_owner = app.seed_user(&company, UserRole::SuperAdmin, None).await;
    let user = app.seed_user(&company, UserRole::User, None).await;
    let user_token = app.token_for(&user);
    let token = app.token_for(&owner);

    let (status, body) = app
        .delete(&format!("/api/users/{}", co_owner.id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Cannot delete super admin");

    let (status, body) = app
        .delete(&format!("/api/users/{}", user.id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let (status, body) = app.get("/api/auth/user-data", Some(&user_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "User not found in database");
}

#[tokio::test]
async fn promote_to_admin_only_from_plain_user() {
    let app = TestApp::new();
    let company = app.seed_company("Acme").await;
    let owner = app.seed_user(&company, UserRole::SuperAdmin, None).await;
    let user = app.seed_user(&company, UserRole::User, None).await;
    let admin = app.seed_user(&company, UserRole::Admin, Some("HR")).await;
    let token = app.token_for(&owner);

    let (status, body) = app
        .post("/api/promote-to-admin", Some(&token), json!({ "userId": user.id }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields");

    let (status, body) = app
        .post(
            "/api/promote-to-admin",
            Some(&token),
            json!({ "userId": user.id, "department": "IT" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Test user has been promoted to Admin (Head of IT)"
    );
    assert_eq!(body["user"]["role"], "admin");

    let (status, body) = app
        .post(
            "/api/promote-to-admin",
            Some(&token),
            json!({ "userId": admin.id, "department": "IT" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "User is already an admin or super admin"
    );
}
