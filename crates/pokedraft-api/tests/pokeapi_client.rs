// Integration tests for the PokeAPI client against an in-process fixture
// server.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use pokedraft_api::PokeApiClient;
use pokedraft_core::family::FamilyId;
use pokedraft_core::lookup::{FamilyLookup, LookupError};

// ===========================================================================
// Fixture server
// ===========================================================================

async fn evolution_chain(Path(id): Path<u32>) -> Response {
    match id {
        1 => Json(json!({
            "baby_trigger_item": null,
            "id": 1,
            "chain": {
                "is_baby": false,
                "species": { "name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon-species/1/" },
                "evolution_details": [],
                "evolves_to": [{
                    "is_baby": false,
                    "species": { "name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon-species/2/" },
                    "evolution_details": [],
                    "evolves_to": [{
                        "is_baby": false,
                        "species": { "name": "venusaur", "url": "https://pokeapi.co/api/v2/pokemon-species/3/" },
                        "evolution_details": [],
                        "evolves_to": []
                    }]
                }]
            }
        }))
        .into_response(),
        2 => Json(json!({ "id": 2 })).into_response(),
        3 => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            StatusCode::OK.into_response()
        }
        500 => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn spawn_fixture() -> SocketAddr {
    let app = Router::new().route("/api/v2/evolution-chain/{id}/", get(evolution_chain));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn client() -> PokeApiClient {
    let addr = spawn_fixture().await;
    PokeApiClient::new(&format!("http://{addr}/api/v2"), Duration::from_millis(500)).unwrap()
}

// ===========================================================================
// Tests
// ===========================================================================

#[tokio::test]
async fn fetches_and_decodes_family() {
    let client = client().await;
    let family = client.lookup(FamilyId(1)).await.unwrap();

    assert_eq!(family.id, FamilyId(1));
    assert_eq!(family.root_name(), "bulbasaur");
    assert_eq!(family.final_display_name(), "Venusaur");
    assert_eq!(family.stage_names(), vec!["bulbasaur", "ivysaur", "venusaur"]);
}

#[tokio::test]
async fn missing_chain_is_transient_status_error() {
    let client = client().await;
    let err = client.lookup(FamilyId(210)).await.unwrap_err();

    match &err {
        LookupError::Status { id, status } => {
            assert_eq!(*id, FamilyId(210));
            assert_eq!(*status, 404);
        }
        other => panic!("expected Status, got: {other}"),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn server_error_is_transient() {
    let client = client().await;
    let err = client.lookup(FamilyId(500)).await.unwrap_err();
    assert!(matches!(err, LookupError::Status { status: 500, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn malformed_payload_is_decode_error() {
    let client = client().await;
    let err = client.lookup(FamilyId(2)).await.unwrap_err();
    assert!(matches!(err, LookupError::Decode { id: FamilyId(2), .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn slow_response_times_out_as_transport_error() {
    let client = client().await;
    let err = client.lookup(FamilyId(3)).await.unwrap_err();
    assert!(matches!(err, LookupError::Transport(_)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        PokeApiClient::new(&format!("http://{addr}/api/v2"), Duration::from_millis(500)).unwrap();
    let err = client.lookup(FamilyId(1)).await.unwrap_err();
    assert!(matches!(err, LookupError::Transport(_)));
}
