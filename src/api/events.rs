use actix_web::{HttpResponse, post, web};
use log::debug;

use super::models::AppState;
use crate::error::NodeError;
use crate::network::Event;

/// Inbound gossip from peers: `{"type": "new_transaction" | "new_block", "data": ...}`.
#[post("/subscribe")]
pub async fn subscribe(
    state: web::Data<AppState>,
    body: web::Json<Event>,
) -> Result<HttpResponse, NodeError> {
    let event = body.into_inner();
    if let Event::NewTransaction(tx) = &event {
        tx.validate()?;
    }
    debug!("POST /subscribe - queued {}", event.kind());
    state.publish(event)?;
    Ok(HttpResponse::Accepted().body("receive success"))
}
