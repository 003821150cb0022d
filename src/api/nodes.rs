use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use log::info;

use super::models::{AppState, Envelope, NodesData, RegisterData, RegisterRequest};
use crate::error::NodeError;
use crate::network::normalize_endpoint;

/// Add a peer. Without an `endpoint` in the body the caller's own address
/// is registered (`X-Forwarded-For` first, then the socket peer).
#[post("/register")]
pub async fn register_node(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: Option<web::Json<RegisterRequest>>,
) -> Result<HttpResponse, NodeError> {
    let raw = match body.and_then(|b| b.into_inner().endpoint) {
        Some(endpoint) => endpoint,
        None => req
            .connection_info()
            .realip_remote_addr()
            .map(str::to_string)
            .ok_or_else(|| NodeError::InvalidEndpoint(String::new()))?,
    };
    let endpoint = normalize_endpoint(&raw)?;

    let total_nodes = {
        let mut ledger = state.node.ledger().lock();
        if ledger.registry_mut().add(endpoint.clone()) {
            info!("POST /register - added {}", endpoint);
        }
        ledger.registry().list()
    };

    Ok(HttpResponse::Ok().json(Envelope::new(
        "New node has been added",
        RegisterData { total_nodes },
    )))
}

#[get("/nodes")]
pub async fn get_nodes(state: web::Data<AppState>) -> impl Responder {
    let nodes = state.node.ledger().lock().registry().list();
    HttpResponse::Ok().json(Envelope::new("Get nodes successfully", NodesData { nodes }))
}
