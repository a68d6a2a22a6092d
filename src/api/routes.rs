use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::api::handlers::{
    AppState,
    brackets::{get_bracket, record_bracket_result, reset_bracket_node, seed_bracket},
    fixtures::generate_fixture,
    groups::{list_groups, record_group_result, register_group, schedule_group},
    promotion::resolve_promotion,
    standings::get_standings,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/fixtures/generate", post(generate_fixture))
        .route("/api/groups", get(list_groups).post(register_group))
        .route("/api/groups/:id/schedule", post(schedule_group))
        .route("/api/groups/:id/results", post(record_group_result))
        .route("/api/standings", get(get_standings))
        .route("/api/promotion/resolve", post(resolve_promotion))
        .route("/api/brackets/seed", post(seed_bracket))
        .route("/api/brackets/results", post(record_bracket_result))
        .route("/api/brackets/reset", post(reset_bracket_node))
        .route("/api/brackets/:tier", get(get_bracket))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::config::settings::AppConfig;
    use crate::database::SqliteStore;
    use crate::services::ProgressionService;

    fn app() -> Router {
        let store = SqliteStore::in_memory().unwrap();
        let state = Arc::new(AppState {
            service: ProgressionService::new(AppConfig::default(), store),
        });
        create_router(state)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn result(home: &str, away: &str, round: u32, score: (u32, u32)) -> Value {
        json!({
            "fixture": {"home": home, "away": away, "round": round},
            "status": {"type": "completed", "score": {"home": score.0, "away": score.1}}
        })
    }

    #[tokio::test]
    async fn test_generate_fixture() {
        let app = app();
        let teams = json!({"teams": [
            {"id": "A", "name": "Alpha"}, {"id": "B", "name": "Beta"},
            {"id": "C", "name": "Gamma"}, {"id": "D", "name": "Delta"}
        ]});

        let (status, body) = send(&app, "POST", "/api/fixtures/generate", Some(teams)).await;
        assert_eq!(status, StatusCode::OK);
        let rounds = body["rounds"].as_array().unwrap();
        assert_eq!(rounds.len(), 3);
        assert!(rounds.iter().all(|r| r["fixtures"].as_array().unwrap().len() == 2));
        assert_eq!(rounds[0]["kind"]["type"], "groupStage");

        let (status, body) = send(&app, "POST", "/api/fixtures/generate", Some(json!({"teams": [{"id": "A", "name": "Alpha"}]}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "InvalidRosterError");
    }

    #[tokio::test]
    async fn test_group_results_update_standings() {
        let app = app();
        let group = json!({
            "id": "G1",
            "name": "Group 1",
            "teams": [{"id": "A", "name": "Alpha"}, {"id": "B", "name": "Beta"}, {"id": "C", "name": "Gamma"}],
            "rule": {"bands": [{"count": 1, "tier": "gold"}, {"count": 2, "tier": "silver"}]}
        });
        let (status, _) = send(&app, "POST", "/api/groups", Some(group)).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, "POST", "/api/groups/G1/results", Some(result("B", "A", 1, (2, 0)))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "InconsistentDataError");

        let (status, body) = send(&app, "POST", "/api/groups/G1/schedule", Some(json!({"timesMet": 1}))).await;
        assert_eq!(status, StatusCode::CREATED);
        let rounds = body["rounds"].as_array().unwrap();
        assert_eq!(rounds.len(), 3);
        let (status, _) = send(&app, "POST", "/api/groups/G1/schedule", Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        // B beats A, posted with B as home whichever way the schedule lists them
        let fixture = rounds
            .iter()
            .flat_map(|r| r["fixtures"].as_array().unwrap())
            .find(|f| f["home"] != "C" && f["away"] != "C")
            .unwrap();
        let round = fixture["round"].as_u64().unwrap() as u32;
        let (status, body) = send(&app, "POST", "/api/groups/G1/results", Some(result("B", "A", round, (2, 0)))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rows"][0]["team"], "B");
        assert_eq!(body["rows"][0]["points"], 3);
        assert_eq!(body["pending"], 2);

        let (status, body) = send(&app, "POST", "/api/groups/G1/results", Some(result("B", "A", round + 1, (2, 0)))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "InconsistentDataError");

        let (status, body) = send(&app, "GET", "/api/standings?group=G1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["group"], "G1");
        assert_eq!(body["rows"].as_array().unwrap().len(), 3);

        let (status, body) = send(&app, "POST", "/api/groups/G1/results", Some(result("A", "Z", 1, (1, 0)))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "InconsistentDataError");

        let (status, body) = send(&app, "GET", "/api/standings?group=G7", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NotFound");

        let (_, body) = send(&app, "GET", "/api/groups", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_promotion_reports_pending_groups() {
        let app = app();
        let group = json!({
            "id": "G1",
            "name": "Group 1",
            "teams": [{"id": "A", "name": "Alpha"}, {"id": "B", "name": "Beta"}],
            "rule": {"bands": [{"count": 1, "tier": "gold"}, {"count": 1, "tier": "bronze"}]}
        });
        send(&app, "POST", "/api/groups", Some(group)).await;
        send(&app, "POST", "/api/groups/G1/schedule", Some(json!({"timesMet": 1}))).await;

        let (status, body) = send(&app, "POST", "/api/promotion/resolve", Some(json!({"groups": ["G1"]}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "RuleMismatchError");

        send(&app, "POST", "/api/groups/G1/results", Some(result("A", "B", 1, (0, 1)))).await;
        let (status, body) = send(&app, "POST", "/api/promotion/resolve", Some(json!({"groups": ["G1"]}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tiers"]["gold"], json!(["B"]));
        assert_eq!(body["tiers"]["silver"], json!([]));
        assert_eq!(body["tiers"]["bronze"], json!(["A"]));
    }

    #[tokio::test]
    async fn test_bracket_errors_map_to_status_codes() {
        let app = app();

        let (status, body) = send(&app, "POST", "/api/brackets/seed", Some(json!({"tier": "gold", "teams": ["A"]}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "InvalidRosterError");

        let (status, body) = send(&app, "GET", "/api/brackets/gold", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NotFound");

        let (status, body) = send(&app, "POST", "/api/brackets/seed", Some(json!({"tier": "gold", "teams": ["A", "B", "C", "D"]}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["bracket"]["state"], "seeded");

        let level = json!({"tier": "gold", "node": 1, "result": result("A", "D", 1, (2, 2))});
        let (status, body) = send(&app, "POST", "/api/brackets/results", Some(level)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "MissingTiebreakError");

        let early = json!({"tier": "gold", "node": 0, "result": result("A", "B", 2, (1, 0))});
        let (status, body) = send(&app, "POST", "/api/brackets/results", Some(early)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "NodeNotReadyError");

        let missing = json!({"tier": "gold", "node": 12, "result": result("A", "D", 1, (1, 0))});
        let (status, body) = send(&app, "POST", "/api/brackets/results", Some(missing)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "UnknownNodeError");

        let (status, body) = send(&app, "GET", "/api/brackets/platinum", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "UnknownTier");
    }

    #[tokio::test]
    async fn test_bracket_record_is_idempotent_and_resettable() {
        let app = app();
        send(&app, "POST", "/api/brackets/seed", Some(json!({"tier": "silver", "teams": ["A", "B", "C", "D"]}))).await;

        let mut penalties = result("A", "D", 1, (2, 2));
        penalties["status"]["penalties"] = json!({"home": 4, "away": 3});
        let request = json!({"tier": "silver", "node": 1, "result": penalties});

        let (status, first) = send(&app, "POST", "/api/brackets/results", Some(request.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["bracket"]["nodes"][1]["winner"], "A");
        assert_eq!(first["bracket"]["nodes"][0]["slots"][0], json!({"team": "A"}));

        let (status, again) = send(&app, "POST", "/api/brackets/results", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(again, first);

        let changed = json!({"tier": "silver", "node": 1, "result": result("A", "D", 1, (0, 1))});
        let (status, body) = send(&app, "POST", "/api/brackets/results", Some(changed)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "ResultAlreadyRecordedError");

        let (status, body) = send(&app, "POST", "/api/brackets/reset", Some(json!({"tier": "silver", "node": 1}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["invalidated"], json!([1]));
        assert_eq!(body["bracket"]["nodes"][0]["slots"][0], json!({"winnerOf": 1}));

        let (_, body) = send(&app, "GET", "/api/brackets/plata", None).await;
        assert_eq!(body["bracket"]["state"], "seeded");
    }
}
