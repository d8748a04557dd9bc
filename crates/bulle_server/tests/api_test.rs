//! Integration tests for the generation routes.

mod common;

use axum::http::StatusCode;
use bulle_error::GenerationErrorKind;
use common::{ScriptedDriver, body_json, build_offline_app, build_test_app, get, post_json};
use serde_json::json;

const OUTLINE: &str = "TITRE GLOBAL : Le Phare
CHAPITRE 1 : L'Arrivée
RÉSUMÉ CHAPITRE 1 : Léa arrive sur l'île.";

fn story() -> serde_json::Value {
    json!({
        "keywords": "phare, tempête",
        "genre": "aventure",
        "style": "ligne claire",
        "tone": "épique"
    })
}

#[tokio::test]
async fn test_generate_story_returns_outline() {
    let driver = ScriptedDriver::text(OUTLINE);
    let response = post_json(build_test_app(driver.clone()), "/api/generate-story", story()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["outline"]["title"], "Le Phare");
    assert_eq!(json["outline"]["chapters"][0]["chapter"], 1);
    assert_eq!(json["outline"]["chapters"][0]["summary"], "Léa arrive sur l'île.");
    assert_eq!(driver.calls(), 1);
}

#[tokio::test]
async fn test_unparsed_answer_is_still_ok() {
    let answer = "Désolé, je ne peux pas.";
    let response = post_json(
        build_test_app(ScriptedDriver::text(answer)),
        "/api/generate-story",
        story(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["outline"]["rawText"], answer);
    assert!(json["outline"]["parsingError"].is_string());
}

#[tokio::test]
async fn test_missing_field_is_rejected_before_generation() {
    let driver = ScriptedDriver::text(OUTLINE);
    let mut body = story();
    body["tone"] = json!("");

    let response = post_json(build_test_app(driver.clone()), "/api/generate-story", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["details"], "tone");
    assert_eq!(driver.calls(), 0);
}

#[tokio::test]
async fn test_backend_failures_map_to_status_and_message() {
    let cases = [
        (
            GenerationErrorKind::Blocked("SAFETY".to_string()),
            StatusCode::BAD_REQUEST,
            "Blocage Google : SAFETY",
        ),
        (
            GenerationErrorKind::InvalidCredential,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Clé API invalide.",
        ),
        (
            GenerationErrorKind::ModelNotFound("gemini-0".to_string()),
            StatusCode::NOT_FOUND,
            "Modèle non trouvé: gemini-0",
        ),
        (
            GenerationErrorKind::RateLimited,
            StatusCode::TOO_MANY_REQUESTS,
            "Quota de requêtes atteint, réessayez plus tard.",
        ),
    ];

    for (kind, status, details) in cases {
        let response = post_json(
            build_test_app(ScriptedDriver::error(kind)),
            "/api/generate-story",
            story(),
        )
        .await;
        assert_eq!(response.status(), status);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Échec génération ossature.");
        assert_eq!(json["details"], details);
    }
}

#[tokio::test]
async fn test_chapter_detail_returns_scenario_text() {
    let mut body = story();
    body["globalTitle"] = json!("Le Phare");
    body["chapterNumber"] = json!(2);
    body["chapterTitle"] = json!("La Tempête");

    let response = post_json(
        build_test_app(ScriptedDriver::text("\nPAGE 1\nCase 1: La houle.\n")),
        "/api/generate-chapter-detail",
        body,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["scenarioText"], "PAGE 1\nCase 1: La houle.");
}

#[tokio::test]
async fn test_storyboard_failure_names_chapter() {
    let body = json!({
        "style": "ligne claire",
        "chapterNumber": 4,
        "detailedScenarioText": "PAGE 1\nCase 1: La houle."
    });

    let response = post_json(
        build_test_app(ScriptedDriver::error(GenerationErrorKind::Transport(
            "connection reset".to_string(),
        ))),
        "/api/generate-storyboard-chapter",
        body,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Échec génération storyboard chap. 4.");
    assert_eq!(json["code"], "TRANSPORT_ERROR");
}

#[tokio::test]
async fn test_prompts_route_accepts_original_field_name() {
    let body = json!({
        "style": "ink",
        "chapterNumber": 1,
        "storyboardDataForChapter": [
            { "page": 1, "panel": 1, "description": "A lighthouse." }
        ]
    });

    let response = post_json(
        build_test_app(ScriptedDriver::text(
            "PAGE 1 - CASE 1 PROMPT: A lighthouse at dusk",
        )),
        "/api/generate-prompts-chapter",
        body,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["prompts"][0]["prompt"], "A lighthouse at dusk");
    assert_eq!(json["dialect"], "page-panel");
}

#[tokio::test]
async fn test_missing_backend_reports_api_key() {
    let response = post_json(build_offline_app(), "/api/generate-story", story()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "API Key not configured.");
    assert_eq!(json["code"], "MISSING_API_KEY");
}

#[tokio::test]
async fn test_get_on_generation_route_is_405() {
    let response = get(build_offline_app(), "/api/generate-story").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let driver = ScriptedDriver::text(OUTLINE);
    let response = post_json(
        build_test_app(driver.clone()),
        "/api/generate-story",
        json!(42),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    assert_eq!(driver.calls(), 0);
}

#[tokio::test]
async fn test_health_names_backend() {
    let response = get(build_test_app(ScriptedDriver::text("")), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["backend"]["provider"], "scripted");

    let json = body_json(get(build_offline_app(), "/health").await).await;
    assert!(json["backend"].is_null());
}
