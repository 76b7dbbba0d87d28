use crate::fixtures::test_app::TestApp;
use serde_json::Value;

async fn seed_doctors(app: &TestApp) {
    app.signup_doctor("Dr. Zoe Zhang", "zhang@test.com", "Cardiology")
        .await;
    app.signup_doctor("Dr. Adam Abbott", "abbott@test.com", "Cardiology")
        .await;
    app.signup_doctor("Dr. Mia Moreno", "moreno@test.com", "Dermatology")
        .await;
    app.signup_patient("Not A Doctor", "patient@test.com").await;
}

#[tokio::test]
async fn list_doctors_sorted_by_name() {
    let app = TestApp::spawn().await;
    seed_doctors(&app).await;

    let resp = app.client.get(app.url("/api/doctor")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    let names: Vec<&str> = json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["Dr. Adam Abbott", "Dr. Mia Moreno", "Dr. Zoe Zhang"]
    );
}

#[tokio::test]
async fn list_doctors_filters_by_specialization() {
    let app = TestApp::spawn().await;
    seed_doctors(&app).await;

    let resp = app
        .client
        .get(app.url("/api/doctor?specialization=cardiology"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|d| d["specialization"] == "Cardiology"));

    // Partial names do not match
    let resp = app
        .client
        .get(app.url("/api/doctor?specialization=cardio"))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert!(json["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn get_doctor_invalid_id_is_bad_request() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/api/doctor/not-an-object-id"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn get_doctor_missing_is_not_found() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/api/doctor/65f0c0ffee0000000000abcd"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}
