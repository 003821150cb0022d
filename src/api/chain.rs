use actix_web::{HttpResponse, Responder, get, post, web};
use log::info;

use super::models::{AppState, Envelope, FullChainData, ValidateResponse};
use crate::error::NodeError;

/// Full chain, genesis first. Peers fetch this during consensus.
#[get("/fullchains")]
pub async fn get_full_chain(state: web::Data<AppState>) -> impl Responder {
    let fullchains = state.node.ledger().lock().snapshot();
    HttpResponse::Ok().json(Envelope::new(
        "Get full chains successfully",
        FullChainData { fullchains },
    ))
}

/// Validate the local chain from genesis.
#[get("/validate")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let resp = {
        let ledger = state.node.ledger().lock();
        ValidateResponse {
            valid: ledger.is_valid(),
            length: ledger.len(),
            difficulty: ledger.difficulty().to_string(),
        }
    };
    HttpResponse::Ok().json(resp)
}

/// Mine one block from whatever is pending, without waiting for the threshold.
#[post("/mine")]
pub async fn mine_block(state: web::Data<AppState>) -> Result<HttpResponse, NodeError> {
    let block = state.node.mine_block().await?;
    Ok(HttpResponse::Ok().json(Envelope::new("New Block Forged", block)))
}

/// Run longest-chain resolution against every registered peer now.
#[post("/consensus")]
pub async fn resolve_conflicts(state: web::Data<AppState>) -> impl Responder {
    let outcome = state.node.resolve_conflicts().await;
    info!("POST /consensus - replaced={}", outcome.replaced);
    let message = if outcome.replaced {
        "Chain was replaced"
    } else {
        "Local chain is authoritative"
    };
    HttpResponse::Ok().json(Envelope::new(message, outcome))
}
