//! Ownership-change webhook.
//!
//! A trusted caller POSTs `{ "uuid": "<zone id>", "newOwner": "<owner id>"? }` to
//! `/change-owner`. The change itself runs on tokio's blocking pool so the connection
//! task is not held by the registry lock or the snapshot write; the handler waits for
//! it up to a fixed bound.
//!
//! ## Known limitation
//! When the wait elapses the caller gets a `500`, but the dispatched change is **not**
//! cancelled. It may still commit and persist afterwards, and nobody is told. A caller
//! seeing a timeout should re-read the zone before retrying.
//!
//! | Outcome | Status |
//! |---|---|
//! | owner changed | 200 |
//! | missing/empty `uuid`, unreadable body | 400 |
//! | no zone with that id | 404 |
//! | method other than POST | 405 |
//! | timeout, failed task | 500 |
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use crate::errors::RegistryError;
use crate::net::response::ApiResponse;
use crate::zone::{Zone, ZoneId, ZoneRegistry};

pub const CHANGE_OWNER_PATH: &str = "/change-owner";

/// Owner assigned when the request names none: the zone is waiting for a new owner.
pub const UNASSIGNED_OWNER_ID: &str = "00000000-0000-0000-0000-000000000000";
const UNASSIGNED_OWNER_NAME: &str = "Pending Player";
const ASSIGNED_OWNER_NAME: &str = "New Owner";

const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    BadRequest(String),

    #[error("Zone not found")]
    NotFound,

    #[error("Ownership change did not finish within {0:?}")]
    Timeout(Duration),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            WebhookError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebhookError::NotFound => StatusCode::NOT_FOUND,
            WebhookError::Timeout(_) | WebhookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipChangeRequest {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub new_owner: Option<String>,
}

/// Validates one `/change-owner` request and applies it, waiting at most `wait`.
pub async fn handle_change_owner(
    registry: &Arc<ZoneRegistry>,
    method: &Method,
    body: &[u8],
    wait: Duration,
) -> Result<Zone, WebhookError> {
    if method != Method::POST {
        return Err(WebhookError::MethodNotAllowed);
    }

    let request: OwnershipChangeRequest = serde_json::from_slice(body)
        .map_err(|e| WebhookError::BadRequest(format!("Invalid request body: {e}")))?;

    let raw_id = non_blank(request.uuid.as_deref())
        .ok_or_else(|| WebhookError::BadRequest("Zone UUID is required".to_string()))?;
    // Not a UUID means no zone can carry it.
    let zone_id = ZoneId::parse(raw_id).ok_or(WebhookError::NotFound)?;

    let owner_id = match non_blank(request.new_owner.as_deref()) {
        Some(owner) => owner.to_string(),
        None => {
            log::info!("No new owner specified for zone {}, using {}", zone_id, UNASSIGNED_OWNER_ID);
            UNASSIGNED_OWNER_ID.to_string()
        }
    };
    // A blank but present `newOwner` still counts as an assignment for the display name.
    let owner_name = if request.new_owner.is_some() { ASSIGNED_OWNER_NAME } else { UNASSIGNED_OWNER_NAME };

    let registry = registry.clone();
    let task = tokio::task::spawn_blocking(move || registry.change_owner(&zone_id, &owner_id, owner_name));

    // Dropping the JoinHandle on timeout detaches the task; it keeps running.
    match tokio::time::timeout(wait, task).await {
        Ok(Ok(Ok(zone))) => Ok(zone),
        Ok(Ok(Err(RegistryError::NotFound))) => Err(WebhookError::NotFound),
        Ok(Ok(Err(e))) => Err(WebhookError::Internal(e.to_string())),
        Ok(Err(join_error)) => {
            log::error!("Ownership change task for zone {} failed: {}", zone_id, join_error);
            Err(WebhookError::Internal(join_error.to_string()))
        }
        Err(_elapsed) => {
            log::warn!("Ownership change for zone {} still running after {:?}; it may complete later", zone_id, wait);
            Err(WebhookError::Timeout(wait))
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

async fn route(registry: Arc<ZoneRegistry>, wait: Duration, req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    if req.uri().path() != CHANGE_OWNER_PATH {
        return Ok(ApiResponse::failure("Not found").into_http(StatusCode::NOT_FOUND));
    }

    let (parts, body) = req.into_parts();
    let body = match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            let err = WebhookError::BadRequest(format!("Cannot read request body: {e}"));
            return Ok(ApiResponse::failure(err.to_string()).into_http(err.status()));
        }
    };

    log::info!("Received ownership change request: {} {}", parts.method, String::from_utf8_lossy(&body));

    let res = match handle_change_owner(&registry, &parts.method, &body, wait).await {
        Ok(_zone) => ApiResponse::ok("Zone ownership changed successfully").into_http(StatusCode::OK),
        Err(e) => {
            log::info!("Ownership change rejected with {}: {}", e.status(), e);
            ApiResponse::failure(e.to_string()).into_http(e.status())
        }
    };
    Ok(res)
}

/// HTTP/1 listener for the ownership-change endpoint.
pub struct WebhookServer {
    listener: TcpListener,
    registry: Arc<ZoneRegistry>,
    wait: Duration,
}

impl WebhookServer {
    pub async fn bind(addr: SocketAddr, registry: Arc<ZoneRegistry>, wait: Duration) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, registry, wait })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until `shutdown` is cancelled. Each connection gets its own task.
    pub async fn run(self, shutdown: CancellationToken) {
        match self.local_addr() {
            Ok(addr) => log::info!("Listening for ownership change requests at http://{}{}", addr, CHANGE_OWNER_PATH),
            Err(e) => log::warn!("Webhook server started on an unknown address: {}", e),
        }

        loop {
            let (stream, peer) = tokio::select! {
                _ = shutdown.cancelled() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        log::warn!("Failed to accept webhook connection: {}", e);
                        continue;
                    }
                },
            };

            let registry = self.registry.clone();
            let wait = self.wait;
            tokio::spawn(async move {
                let service = service_fn(move |req| route(registry.clone(), wait, req));
                if let Err(e) = http1::Builder::new().serve_connection(TokioIo::new(stream), service).await {
                    log::debug!("Webhook connection from {} ended with error: {}", peer, e);
                }
            });
        }

        log::info!("Webhook server stopped");
    }
}
