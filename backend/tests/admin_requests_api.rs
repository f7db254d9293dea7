use axum::http::StatusCode;
use officedesk_backend::models::user::UserRole;
use serde_json::{json, Value};

mod support;
use support::TestApp;

fn admin_request_id(body: &Value) -> String {
    body.pointer("/request/id")
        .and_then(Value::as_str)
        .expect("admin request id")
        .to_string()
}

#[tokio::test]
async fn user_may_hold_one_pending_admin_request() {
    let app = TestApp::new();
    let company = app.seed_company("Acme").await;
    let user = app.seed_user(&company, UserRole::User, None).await;
    let token = app.token_for(&user);

    let (status, body) = app.post("/api/request-admin", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Admin request submitted successfully");
    assert_eq!(body["request"]["status"], "pending");
    assert_eq!(body["request"]["userId"], user.id.as_str());

    let (status, body) = app.post("/api/request-admin", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You already have a pending request");
}

#[tokio::test]
async fn admins_cannot_request_admin() {
    let app = TestApp::new();
    let company = app.seed_company("Acme").await;
    let admin = app.seed_user(&company, UserRole::Admin, Some("IT")).await;

    let (status, body) = app
        .post("/api/request-admin", Some(&app.token_for(&admin)), json!({}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User is already an admin");
}

#[tokio::test]
async fn approval_promotes_to_head_of_first_department() {
    let app = TestApp::new();
    let company = app.seed_company("Acme").await;
    let owner = app.seed_user(&company, UserRole::SuperAdmin, None).await;
    let user = app.seed_user(&company, UserRole::User, None).await;
    let owner_token = app.token_for(&owner);

    let (_, submitted) = app
        .post("/api/request-admin", Some(&app.token_for(&user)), json!({}))
        .await;
    let id = admin_request_id(&submitted);

    let (status, listed) = app.get("/api/admin-requests", Some(&owner_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["requests"].as_array().map(Vec::len), Some(1));
    assert_eq!(listed["requests"][0]["id"], id.as_str());

    let (status, body) = app
        .post(
            &format!("/api/admin-requests/{}/approve", id),
            Some(&owner_token),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Admin request approved");
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["user"]["department"], "HR");
    assert_eq!(body["user"]["jobTitle"], "Head of HR");

    let promoted = app.user(&user.id).await;
    assert_eq!(promoted.role, UserRole::Admin);

    let (status, body) = app
        .post(
            &format!("/api/admin-requests/{}/reject", id),
            Some(&owner_token),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NOT_PENDING");

    let (_, listed) = app.get("/api/admin-requests", Some(&owner_token)).await;
    assert_eq!(listed["requests"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn rejection_leaves_the_role_alone() {
    let app = TestApp::new();
    let company = app.seed_company("Acme").await;
    let owner = app.seed_user(&company, UserRole::SuperAdmin, None).await;
    let user = app.seed_user(&company, UserRole::User, None).await;

    let (_, submitted) = app
        .post("/api/request-admin", Some(&app.token_for(&user)), json!({}))
        .await;
    let (status, body) = app
        .post(
            &format!("/api/admin-requests/{}/reject", admin_request_id(&submitted)),
            Some(&app.token_for(&owner)),
            json!({}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Admin request rejected");
    assert_eq!(body["request"]["status"], "rejected");
    assert!(body["request"]["rejectedAt"].is_string());
    assert_eq!(app.user(&user.id).await.role, UserRole::User);

    // A decided request frees the user to ask again.
    let (status, _) = app
        .post("/api/request-admin", Some(&app.token_for(&user)), json!({}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn other_companies_cannot_decide() {
    let app = TestApp::new();
    let acme = app.seed_company("Acme").await;
    let globex = app.seed_company("Globex").await;
    let intruder = app.seed_user(&globex, UserRole::SuperAdmin, None).await;
    let user = app.seed_user(&acme, UserRole::User, None).await;

    let (_, submitted) = app
        .post("/api/request-admin", Some(&app.token_for(&user)), json!({}))
        .await;
    let (status, _) = app
        .post(
            &format!("/api/admin-requests/{}/approve", admin_request_id(&submitted)),
            Some(&app.token_for(&intruder)),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, listed) = app
        .get("/api/admin-requests", Some(&app.token_for(&intruder)))
        .await;
    assert_eq!(listed["requests"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn unknown_admin_request_is_not_found() {
    let app = TestApp::new();
    let company = app.seed_company("Acme").await;
    let owner = app.seed_user(&company, UserRole::SuperAdmin, None).await;

    let (status, _) = app
        .post(
            "/api/admin-requests/does-not-exist/approve",
            Some(&app.token_for(&owner)),
            json!({}),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_admin_requests_needs_super_admin() {
    let app = TestApp::new();
    let company = app.seed_company("Acme").await;
    let user = app.seed_user(&company, UserRole::User, None).await;

    let (status, body) = app
        .get("/api/admin-requests", Some(&app.token_for(&user)))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Super admin access required");
}
