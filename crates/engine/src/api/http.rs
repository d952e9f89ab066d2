//! HTTP routes.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use emberfall_domain::{ZoneCategory, ZoneId};

use crate::app::App;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/zones", get(list_zones))
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Serialize)]
struct ZoneSummary {
    id: ZoneId,
    name: String,
    category: ZoneCategory,
    players: usize,
    max_players: usize,
}

async fn list_zones(State(app): State<Arc<App>>) -> Json<Vec<ZoneSummary>> {
    Json(zone_summaries(app.content.zones(), &app.rooms.player_counts()))
}

fn zone_summaries(
    zones: &[emberfall_domain::Zone],
    counts: &BTreeMap<ZoneId, usize>,
) -> Vec<ZoneSummary> {
    zones
        .iter()
        .map(|zone| ZoneSummary {
            id: zone.id.clone(),
            name: zone.name.clone(),
            category: zone.category,
            players: counts.get(&zone.id).copied().unwrap_or(0),
            max_players: zone.max_players,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::{
        content::ContentCatalog, memory_store::InMemoryPlayerStore, settings::EngineSettings,
    };

    fn test_app() -> Router {
        let settings = EngineSettings::default();
        let app = App::new(
            settings,
            ContentCatalog::builtin(),
            Arc::new(InMemoryPlayerStore::new()),
        );
        routes().with_state(Arc::new(app))
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let response = test_app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn zones_lists_every_zone() {
        let response = test_app()
            .oneshot(Request::get("/api/zones").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        let zones: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        let ids: Vec<&str> = zones.iter().filter_map(|z| z["id"].as_str()).collect();
        assert_eq!(ids, vec!["town", "wilds", "crypt"]);
        assert!(zones.iter().all(|z| z["players"] == 0));
    }

    #[test]
    fn zone_summaries_fill_in_counts() {
        let catalog = ContentCatalog::builtin();
        let counts = BTreeMap::from([(ZoneId::new("wilds"), 2)]);
        let summaries = zone_summaries(catalog.zones(), &counts);

        assert_eq!(summaries.len(), 3);
        let wilds = summaries.iter().find(|z| z.id.as_str() == "wilds").unwrap();
        assert_eq!(wilds.players, 2);
        assert_eq!(wilds.max_players, 30);
        assert!(summaries
            .iter()
            .filter(|z| z.id.as_str() != "wilds")
            .all(|z| z.players == 0));
    }
}
