use crate::fixtures::{
    mock_upstream::{MockReply, TRANSLATE},
    test_app::TestApp,
};
use serde_json::Value;

fn translated(text: &str, detected: Option<&str>) -> MockReply {
    let mut translation = serde_json::json!({ "translatedText": text });
    if let Some(lang) = detected {
        translation["detectedSourceLanguage"] = lang.into();
    }
    MockReply::ok(serde_json::json!({ "data": { "translations": [translation] } }))
}

#[tokio::test]
async fn translate_detects_source_language() {
    let app = TestApp::spawn().await;
    app.upstream
        .enqueue(TRANSLATE, translated("I have a headache", Some("es")));

    let resp = app
        .post_json(
            "/api/translate",
            &serde_json::json!({ "text": " Tengo dolor de cabeza ", "target_language": "en" }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["translated_text"], "I have a headache");
    assert_eq!(json["source_language"], "es");
    assert_eq!(json["target_language"], "en");

    let sent = app.upstream.last_request(TRANSLATE).unwrap().body;
    assert_eq!(sent["q"], "Tengo dolor de cabeza");
    assert_eq!(sent["target"], "en");
    assert!(sent.get("source").is_none());
}

#[tokio::test]
async fn translate_echoes_given_source_language() {
    let app = TestApp::spawn().await;
    app.upstream
        .enqueue(TRANSLATE, translated("Ich habe Fieber", None));

    let resp = app
        .post_json(
            "/api/translate",
            &serde_json::json!({
                "text": "I have a fever",
                "target_language": "de",
                "source_language": "en",
            }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["translated_text"], "Ich habe Fieber");
    assert_eq!(json["source_language"], "en");
    assert_eq!(app.upstream.last_request(TRANSLATE).unwrap().body["source"], "en");
}

#[tokio::test]
async fn translate_blank_text_is_rejected() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json(
            "/api/translate",
            &serde_json::json!({ "text": "   ", "target_language": "en" }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 422);
    assert_eq!(app.upstream.hits(TRANSLATE), 0);
}

#[tokio::test]
async fn translate_retries_after_rate_limit() {
    let app = TestApp::spawn().await;
    app.upstream.enqueue(TRANSLATE, MockReply::throttled(Some(0)));
    app.upstream.enqueue(
        TRANSLATE,
        MockReply::status(503, serde_json::json!({ "error": "overloaded" })),
    );
    app.upstream
        .enqueue(TRANSLATE, translated("Bonjour", Some("en")));

    let resp = app
        .post_json(
            "/api/translate",
            &serde_json::json!({ "text": "Hello", "target_language": "fr" }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["translated_text"], "Bonjour");
    assert_eq!(app.upstream.hits(TRANSLATE), 3);
}

#[tokio::test]
async fn translate_persistent_rate_limit_is_unavailable() {
    let app = TestApp::spawn().await;
    for _ in 0..3 {
        app.upstream.enqueue(TRANSLATE, MockReply::throttled(None));
    }

    let resp = app
        .post_json(
            "/api/translate",
            &serde_json::json!({ "text": "Hello", "target_language": "fr" }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 503);
    // One attempt plus two retries
    assert_eq!(app.upstream.hits(TRANSLATE), 3);
}
