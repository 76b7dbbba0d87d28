use crate::fixtures::{
    mock_upstream::{MockReply, SPEECH},
    test_app::TestApp,
};
use base64::Engine;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

const AUDIO: &[u8] = b"\x1aE\xdf\xa3fake-webm-audio";

fn audio_form() -> Form {
    Form::new().part(
        "audio",
        Part::bytes(AUDIO.to_vec())
            .file_name("consultation.webm")
            .mime_str("audio/webm")
            .unwrap(),
    )
}

async fn transcribe(app: &TestApp, form: Form) -> reqwest::Response {
    app.client
        .post(app.url("/api/speech/transcribe"))
        .multipart(form)
        .send()
        .await
        .unwrap()
}

fn word(text: &str, tag: Value) -> Value {
    serde_json::json!({ "word": text, "speakerTag": tag, "startTime": "0s", "endTime": "0.5s" })
}

#[tokio::test]
async fn transcribe_returns_diarized_utterances() {
    let app = TestApp::spawn().await;
    app.upstream.enqueue(
        SPEECH,
        MockReply::ok(serde_json::json!({
            "results": [
                { "alternatives": [{ "transcript": "Hi doctor how are you" }] },
                { "alternatives": [{ "words": [
                    word("Hi", 1.into()),
                    word("doctor", 1.into()),
                    word("how", 1.into()),
                    word("are", 1.into()),
                    word("you", 1.into()),
                    word("Not", 2.into()),
                    word("great", "2".into()),
                    word("Tell", 1.into()),
                    word("me", Value::Null),
                    word("more", 1.into()),
                ]}]}
            ]
        })),
    );

    let resp = transcribe(&app, audio_form().text("language", "en-GB")).await;
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "transcript": [
            { "speaker": "Speaker 1", "transcript": "Hi doctor how are you" },
            { "speaker": "Speaker 2", "transcript": "Not great" },
            { "speaker": "Speaker 1", "transcript": "Tell me more" },
        ]})
    );

    let sent = app.upstream.last_request(SPEECH).unwrap().body;
    assert_eq!(sent["config"]["languageCode"], "en-GB");
    assert_eq!(sent["config"]["encoding"], app.settings.speech.encoding.as_str());
    assert_eq!(
        sent["config"]["diarizationConfig"]["enableSpeakerDiarization"],
        true
    );
    assert_eq!(
        sent["audio"]["content"],
        base64::engine::general_purpose::STANDARD.encode(AUDIO)
    );
}

#[tokio::test]
async fn transcribe_merges_short_utterances_forward() {
    let app = TestApp::spawn().await;
    app.upstream.enqueue(
        SPEECH,
        MockReply::ok(serde_json::json!({
            "results": [{ "alternatives": [{ "words": [
                word("Okay", 2.into()),
                word("so", 1.into()),
                word("the", 1.into()),
                word("pain", 1.into()),
                word("Yes", 2.into()),
                word("it", 2.into()),
                word("started", 2.into()),
                word("yesterday", 2.into()),
            ]}]}]
        })),
    );

    let resp = transcribe(&app, audio_form()).await;
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(
        json["transcript"],
        serde_json::json!([
            { "speaker": "Speaker 2", "transcript": "Okay" },
            { "speaker": "Speaker 1", "transcript": "so the pain" },
            { "speaker": "Speaker 2", "transcript": "Yes it started yesterday" },
        ])
    );
}

#[tokio::test]
async fn transcribe_without_audio_is_bad_request() {
    let app = TestApp::spawn().await;

    let resp = transcribe(&app, Form::new().text("language", "en-US")).await;
    assert_eq!(resp.status().as_u16(), 400);
    assert_eq!(app.upstream.hits(SPEECH), 0);
}

#[tokio::test]
async fn transcribe_rejects_non_numeric_options() {
    let app = TestApp::spawn().await;

    let resp = transcribe(&app, audio_form().text("sample_rate", "fast")).await;
    assert_eq!(resp.status().as_u16(), 400);
    assert_eq!(app.upstream.hits(SPEECH), 0);
}

#[tokio::test]
async fn transcribe_with_no_results_is_unprocessable() {
    let app = TestApp::spawn().await;
    app.upstream
        .enqueue(SPEECH, MockReply::ok(serde_json::json!({})));

    let resp = transcribe(&app, audio_form()).await;
    assert_eq!(resp.status().as_u16(), 422);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "No speech could be recognized");
}

#[tokio::test]
async fn transcribe_with_no_words_is_empty() {
    let app = TestApp::spawn().await;
    app.upstream.enqueue(
        SPEECH,
        MockReply::ok(serde_json::json!({
            "results": [{ "alternatives": [{ "transcript": "" }] }]
        })),
    );

    let resp = transcribe(&app, audio_form()).await;
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json, serde_json::json!({ "transcript": [] }));
}

#[tokio::test]
async fn transcribe_upstream_failure_is_bad_gateway() {
    let app = TestApp::spawn().await;
    app.upstream.enqueue(
        SPEECH,
        MockReply::status(400, serde_json::json!({ "error": { "message": "bad audio" } })),
    );

    let resp = transcribe(&app, audio_form()).await;
    assert_eq!(resp.status().as_u16(), 502);
    assert_eq!(app.upstream.hits(SPEECH), 1);
}

#[tokio::test]
async fn transcribe_unconfigured_is_unavailable() {
    let app = TestApp::spawn_with_settings(|s| s.google.api_key = None).await;

    let resp = transcribe(&app, audio_form()).await;
    assert_eq!(resp.status().as_u16(), 503);
    assert_eq!(app.upstream.hits(SPEECH), 0);
}
