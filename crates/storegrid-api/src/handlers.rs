//! REST API handlers.
//!
//! Wire shapes and status strings are a client contract: a create that
//! times out polling is still a 200 with status `"Provisioning
//! (timeout)"`, while a guardrail refusal is a hard 400. Install
//! failures return 500 with the installer diagnostic verbatim.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::error;

use store_core::{StoreRecord, StoreStatus};
use storegrid_provision::{CreateOutcome, ProvisionError};

use crate::ApiState;

/// One store on the wire.
#[derive(serde::Serialize)]
pub struct StoreResponse {
    pub store_id: String,
    pub status: String,
    pub url: String,
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ErrorBody {
            error: msg.to_string(),
        }),
    )
}

fn store_response(record: &StoreRecord, status: &str) -> StoreResponse {
    StoreResponse {
        store_id: record.id.clone(),
        status: status.to_string(),
        url: record.url(),
    }
}

/// GET /
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Store Provisioning Platform Running"
    }))
}

/// POST /stores
pub async fn create_store(State(state): State<ApiState>) -> impl IntoResponse {
    match state.orchestrator.create_store().await {
        Ok(outcome) => {
            let label = match &outcome {
                CreateOutcome::Ready(_) => "Ready",
                CreateOutcome::AlreadyExists(_) => "Already Exists",
                CreateOutcome::ProvisioningTimeout(_) => "Provisioning (timeout)",
            };
            Json(store_response(outcome.record(), label)).into_response()
        }
        Err(e @ ProvisionError::QuotaExceeded { .. }) => {
            error_response(&e.to_string(), StatusCode::BAD_REQUEST).into_response()
        }
        Err(e) => {
            error!(error = %e, "store creation failed");
            error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
    }
}

/// GET /stores
pub async fn list_stores(State(state): State<ApiState>) -> impl IntoResponse {
    match state.orchestrator.list_stores().await {
        Ok(stores) => {
            let stores: Vec<StoreResponse> = stores
                .iter()
                .map(|record| {
                    let label = match record.status {
                        StoreStatus::Ready => "Ready",
                        _ => "Provisioning",
                    };
                    store_response(record, label)
                })
                .collect();
            Json(serde_json::json!({ "stores": stores })).into_response()
        }
        Err(e) => {
            error!(error = %e, "store listing failed");
            error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
    }
}

/// DELETE /stores/{store_id}
pub async fn delete_store(
    State(state): State<ApiState>,
    Path(store_id): Path<String>,
) -> impl IntoResponse {
    state.orchestrator.delete_store(&store_id).await;
    Json(serde_json::json!({ "deleted": store_id }))
}

/// GET /audit
pub async fn get_audit(State(state): State<ApiState>) -> impl IntoResponse {
    let events: Vec<String> = state
        .orchestrator
        .audit()
        .events()
        .iter()
        .map(|event| event.render())
        .collect();
    Json(serde_json::json!({ "events": events }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::to_bytes;
    use store_core::ProvisionConfig;
    use storegrid_audit::AuditLog;
    use storegrid_cluster::FakeCluster;
    use storegrid_provision::{Orchestrator, SequentialIdentity};
    use storegrid_release::FakeReleases;

    fn test_state(max_stores: usize) -> (FakeCluster, FakeReleases, ApiState) {
        let cluster = FakeCluster::new();
        let releases = FakeReleases::new(cluster.clone());
        let config = ProvisionConfig {
            max_stores,
            ..ProvisionConfig::default()
        };
        let orchestrator = Orchestrator::new(
            config,
            Arc::new(cluster.clone()),
            Arc::new(releases.clone()),
            AuditLog::new(),
        )
        .with_identity(Arc::new(SequentialIdentity::new("store-", "localhost")));
        (
            cluster,
            releases,
            ApiState {
                orchestrator: Arc::new(orchestrator),
            },
        )
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_returns_banner() {
        let resp = root().await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["message"], "Store Provisioning Platform Running");
    }

    #[tokio::test(start_paused = true)]
    async fn create_returns_store_shape() {
        let (_cluster, _releases, state) = test_state(5);
        let resp = create_store(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["store_id"], "store-000001");
        assert_eq!(json["status"], "Ready");
        assert_eq!(json["url"], "http://store-000001.localhost");
    }

    #[tokio::test(start_paused = true)]
    async fn create_over_quota_is_bad_request() {
        let (_cluster, _releases, state) = test_state(1);
        create_store(State(state.clone())).await.into_response();

        let resp = create_store(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Max store limit reached");
    }

    #[tokio::test(start_paused = true)]
    async fn create_install_failure_is_internal_error_with_diagnostic() {
        let (_cluster, releases, state) = test_state(5);
        releases.fail_installs_with("Error: chart pull failed");

        let resp = create_store(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Error: chart pull failed");
    }

    #[tokio::test(start_paused = true)]
    async fn create_timeout_is_soft_success() {
        let (_cluster, releases, state) = test_state(5);
        releases.set_ready_after_polls(100);

        let resp = create_store(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "Provisioning (timeout)");
    }

    #[tokio::test(start_paused = true)]
    async fn list_reports_ready_and_provisioning() {
        let (cluster, _releases, state) = test_state(5);
        cluster.add_namespace("store-a");
        cluster.add_namespace_ready_after("store-b", 10);

        let resp = list_stores(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let stores = json["stores"].as_array().unwrap();
        assert_eq!(stores.len(), 2);
        assert_eq!(stores[0]["store_id"], "store-a");
        assert_eq!(stores[0]["status"], "Ready");
        assert_eq!(stores[1]["status"], "Provisioning");
    }

    #[tokio::test]
    async fn delete_always_reports_deleted() {
        let (_cluster, _releases, state) = test_state(5);
        let resp = delete_store(State(state), Path("store-ghost".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["deleted"], "store-ghost");
    }

    #[tokio::test(start_paused = true)]
    async fn audit_renders_events_in_order() {
        let (_cluster, _releases, state) = test_state(5);
        create_store(State(state.clone())).await.into_response();
        delete_store(State(state.clone()), Path("store-000001".to_string()))
            .await
            .into_response();

        let resp = get_audit(State(state)).await.into_response();
        let json = body_json(resp).await;
        let events = json["events"].as_array().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], "Created store-000001");
        assert_eq!(events[1], "Deleted store-000001");
    }
}
