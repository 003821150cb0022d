use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{AppState, Envelope, PendingData};
use crate::error::NodeError;
use crate::network::Event;
use crate::transaction::Transaction;

/// Submit a transaction on this node. It takes the same path as one relayed
/// by a peer: pooled, broadcast, and mined once the threshold is reached.
#[post("/transactions")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<Transaction>,
) -> Result<HttpResponse, NodeError> {
    let tx = body.into_inner();
    if let Err(err) = tx.validate() {
        warn!("POST /transactions - rejected: {}", err);
        return Err(err);
    }
    info!("POST /transactions - {} -> {} ({})", tx.input, tx.output, tx.amount);
    state.publish(Event::NewTransaction(tx.clone()))?;
    Ok(HttpResponse::Accepted().json(Envelope::new("Transaction queued", tx)))
}

/// Transactions waiting for the next block.
#[get("/transactions/pending")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let transactions: Vec<_> = state.node.ledger().lock().pool().iter().cloned().collect();
    HttpResponse::Ok().json(Envelope::new(
        "Get pending transactions successfully",
        PendingData {
            size: transactions.len(),
            transactions,
        },
    ))
}
