use actix_web::{HttpResponse, Responder, get, web};

use super::models::AppState;

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().body(format!("node {} is up and running 🦀", state.node.name()))
}
