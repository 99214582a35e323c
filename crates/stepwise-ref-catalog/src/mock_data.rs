//! Simulated game-catalog API for the reference runtime.
//!
//! All data in this module is hardcoded and fictional. It stands in for a
//! real catalog service: a reduced API specification the agents plan
//! against, and the responses the mock HTTP client serves.

use serde_json::{json, Map, Value};

use stepwise_contracts::{
    endpoint::{ApiPlugin, ReducedApiSpec},
    error::StepwiseResult,
};
use stepwise_openapi::{http::HttpResponse, spec};

pub const CATALOG_BASE_URL: &str = "https://catalog.example.com";

// ── Reduced API specification ────────────────────────────────────────────────

const CATALOG_SPEC: &str = r#"{
  "servers": [{ "url": "https://catalog.example.com" }],
  "description": "Searchable catalog of indie games with details and a wishlist",
  "endpoints": [
    {
      "name": "GET /games/search",
      "description": "Search games by keyword",
      "docs": {
        "parameters": [
          { "name": "q", "in": "query", "required": true, "schema": { "type": "string" } },
          { "name": "limit", "in": "query", "schema": { "type": "integer", "default": 5 } }
        ],
        "responses": { "200": { "description": "List of {id, title, genre, rating}" } }
      }
    },
    {
      "name": "GET /games/genre/{genre}",
      "description": "List the top games of one genre",
      "docs": {
        "parameters": [
          { "name": "genre", "in": "path", "required": true,
            "schema": { "type": "string", "enum": ["puzzle", "rpg", "strategy"] } }
        ]
      }
    },
    {
      "name": "GET /games/{id}",
      "description": "Fetch the full record of one game",
      "docs": {
        "parameters": [
          { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }
        ]
      }
    },
    {
      "name": "POST /wishlist",
      "description": "Add a game to the user's wishlist",
      "docs": {
        "requestBody": { "game_id": "integer" }
      }
    }
  ]
}"#;

/// The catalog's reduced specification.
pub fn catalog_spec() -> StepwiseResult<ReducedApiSpec> {
    spec::from_json_str(CATALOG_SPEC)
}

pub fn catalog_plugin() -> ApiPlugin {
    ApiPlugin {
        name: "Catalog".to_string(),
        description: "searching indie games and describing them".to_string(),
    }
}

// ── Game records ─────────────────────────────────────────────────────────────

fn games() -> Vec<Value> {
    vec![
        json!({ "id": 7, "title": "Portal Pals", "genre": "puzzle", "rating": 4.8,
                "summary": "Co-op portal puzzles for two players", "price": 14.99 }),
        json!({ "id": 12, "title": "Gear Grinder", "genre": "puzzle", "rating": 4.1,
                "summary": "Clockwork contraption puzzles", "price": 9.99 }),
        json!({ "id": 21, "title": "Ashen Crown", "genre": "rpg", "rating": 4.6,
                "summary": "Turn-based dark fantasy RPG", "price": 24.99 }),
        json!({ "id": 33, "title": "Hex Dominion", "genre": "strategy", "rating": 4.3,
                "summary": "4X strategy on a shrinking map", "price": 19.99 }),
    ]
}

fn brief(game: &Value) -> Value {
    json!({ "id": game["id"], "title": game["title"], "genre": game["genre"], "rating": game["rating"] })
}

fn not_found() -> HttpResponse {
    HttpResponse {
        status: 404,
        content_type: Some("text/html; charset=utf-8".to_string()),
        body: "<html><body><h1>404 Not Found</h1></body></html>".to_string(),
    }
}

// ── Request routing ──────────────────────────────────────────────────────────

/// Serve a GET request against the mock catalog.
///
/// Unknown routes answer with an HTML 404 page, like a real web server.
pub fn serve_get(url: &str, params: &Map<String, Value>) -> HttpResponse {
    let Some(path) = url.strip_prefix(CATALOG_BASE_URL) else {
        return not_found();
    };
    let path = path.split('?').next().unwrap_or_default();
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match segments.as_slice() {
        ["games", "search"] => {
            let query = params.get("q").and_then(Value::as_str).unwrap_or_default().to_lowercase();
            let hits: Vec<Value> = games()
                .iter()
                .filter(|g| {
                    let haystack = format!("{} {} {}", g["title"], g["genre"], g["summary"]).to_lowercase();
                    query.split_whitespace().all(|word| haystack.contains(word))
                })
                .map(brief)
                .collect();
            HttpResponse::json(Value::Array(hits).to_string())
        }
        ["games", "genre", genre] => {
            let hits: Vec<Value> = games().iter().filter(|g| g["genre"] == *genre).map(brief).collect();
            HttpResponse::json(Value::Array(hits).to_string())
        }
        ["games", id] => match games().into_iter().find(|g| g["id"].to_string() == *id) {
            Some(game) => HttpResponse::json(game.to_string()),
            None => HttpResponse {
                status: 404,
                content_type: Some("application/json".to_string()),
                body: json!({ "error": format!("game {id} not found") }).to_string(),
            },
        },
        _ => not_found(),
    }
}

/// Serve a POST request against the mock catalog.
pub fn serve_post(url: &str, data: &Value) -> HttpResponse {
    if url.strip_prefix(CATALOG_BASE_URL).map(|p| p.trim_end_matches('/')) != Some("/wishlist") {
        return not_found();
    }
    match data.get("game_id").and_then(Value::as_i64) {
        Some(id) => HttpResponse::json(json!({ "status": "added", "game_id": id }).to_string()),
        None => HttpResponse {
            status: 422,
            content_type: Some("application/json".to_string()),
            body: json!({ "error": "game_id is required" }).to_string(),
        },
    }
}
