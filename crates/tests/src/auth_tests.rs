use crate::fixtures::{seed::PASSWORD, test_app::TestApp};
use serde_json::Value;

#[tokio::test]
async fn signup_creates_patient() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json(
            "/api/auth/signup",
            &serde_json::json!({
                "name": "Alice Patient",
                "email": "Alice@Test.com",
                "password": PASSWORD,
                "phone": "+1 555 0100",
            }),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 201);

    let json: Value = resp.json().await.unwrap();
    assert!(json["user"]["id"].is_string());
    assert_eq!(json["user"]["name"], "Alice Patient");
    assert_eq!(json["user"]["email"], "alice@test.com");
    assert_eq!(json["user"]["role"], "patient");
    assert_eq!(json["user"]["phone"], "+1 555 0100");
    assert!(json["user"].get("doctor").is_none());
    assert!(json["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn signup_doctor_creates_profile() {
    let app = TestApp::spawn().await;

    let doctor = app
        .signup_doctor("Dr. Gregory House", "house@test.com", "Diagnostics")
        .await;

    let resp = app
        .client
        .get(app.url(&format!("/api/doctor/{}", doctor.doctor_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["user_id"], doctor.user.id.as_str());
    assert_eq!(json["specialization"], "Diagnostics");
    assert_eq!(json["years_of_experience"], 10);
    assert_eq!(json["is_available"], true);
}

#[tokio::test]
async fn signup_doctor_without_specialization_fails() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json(
            "/api/auth/signup",
            &serde_json::json!({
                "name": "Dr. Nobody",
                "email": "nobody@test.com",
                "password": PASSWORD,
                "role": "doctor",
                "specialization": "   ",
            }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 422);

    // No account is left behind
    let resp = app
        .post_json(
            "/api/auth/login",
            &serde_json::json!({ "email": "nobody@test.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn signup_duplicate_email_fails() {
    let app = TestApp::spawn().await;
    app.signup_patient("First", "dup@test.com").await;

    let resp = app
        .post_json(
            "/api/auth/signup",
            &serde_json::json!({
                "name": "Second",
                "email": "  DUP@test.com ",
                "password": PASSWORD,
            }),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 409);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "conflict");
}

#[tokio::test]
async fn signup_validates_fields() {
    let app = TestApp::spawn().await;

    let cases = [
        serde_json::json!({ "name": "", "email": "a@test.com", "password": PASSWORD }),
        serde_json::json!({ "name": "A", "email": "not-an-email", "password": PASSWORD }),
        serde_json::json!({ "name": "A", "email": "a@test.com", "password": "short" }),
    ];

    for body in cases {
        let resp = app.post_json("/api/auth/signup", &body).await;
        assert_eq!(resp.status().as_u16(), 422, "accepted {}", body);
    }
}

#[tokio::test]
async fn login_returns_user() {
    let app = TestApp::spawn().await;
    let patient = app.signup_patient("Login User", "login@test.com").await;

    let resp = app
        .post_json(
            "/api/auth/login",
            &serde_json::json!({ "email": "LOGIN@test.com", "password": PASSWORD }),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Login successful");
    assert_eq!(json["user"]["id"], patient.id.as_str());
    assert_eq!(json["user"]["email"], patient.email.as_str());
}

#[tokio::test]
async fn login_includes_doctor_profile() {
    let app = TestApp::spawn().await;
    let doctor = app
        .signup_doctor("Dr. Lisa Cuddy", "cuddy@test.com", "Endocrinology")
        .await;

    let resp = app
        .post_json(
            "/api/auth/login",
            &serde_json::json!({ "email": "cuddy@test.com", "password": PASSWORD }),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["user"]["role"], "doctor");
    assert_eq!(json["user"]["doctor"]["id"], doctor.doctor_id.as_str());
    assert_eq!(json["user"]["doctor"]["specialization"], "Endocrinology");
}

#[tokio::test]
async fn login_wrong_password_fails() {
    let app = TestApp::spawn().await;
    app.signup_patient("Wrong Pass", "wrong@test.com").await;

    let resp = app
        .post_json(
            "/api/auth/login",
            &serde_json::json!({ "email": "wrong@test.com", "password": "WrongPass1!" }),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 401);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Invalid credentials");
}

#[tokio::test]
async fn login_unknown_email_fails() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json(
            "/api/auth/login",
            &serde_json::json!({ "email": "ghost@test.com", "password": PASSWORD }),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 401);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Invalid credentials");
}
