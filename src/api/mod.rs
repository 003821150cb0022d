mod chain;
mod events;
mod health;
pub mod models;
mod nodes;
mod tx;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .service(chain::get_full_chain)
            .service(chain::validate_chain)
            .service(chain::mine_block)
            .service(chain::resolve_conflicts)
            .service(nodes::register_node)
            .service(nodes::get_nodes)
            .service(events::subscribe)
            .service(tx::post_transaction)
            .service(tx::get_pending),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};

    use super::{AppState, init_routes};
    use crate::network::testing::{FakeTransport, test_ledger};
    use crate::network::{ConsensusResolver, Event, EventReceiver, Node, event};
    use crate::transaction::Transaction;

    fn state_with(transport: FakeTransport) -> (web::Data<AppState>, EventReceiver) {
        let node = Node::new(
            "api-test",
            test_ledger(),
            Arc::new(transport),
            ConsensusResolver::default(),
            0,
        );
        let (tx, rx) = event::channel();
        (web::Data::new(AppState::new(Arc::new(node), tx)), rx)
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).configure(init_routes)).await
        };
    }

    #[actix_web::test]
    async fn full_chain_has_genesis() {
        let (state, _rx) = state_with(FakeTransport::default());
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/fullchains").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Get full chains successfully");
        assert_eq!(body["data"]["fullchains"].as_array().unwrap().len(), 1);
        assert!(body["data"]["fullchains"][0]["header"]["previousBlockHash"].is_string());
    }

    #[actix_web::test]
    async fn register_dedups_and_lists() {
        let (state, _rx) = state_with(FakeTransport::default());
        let app = app!(state);

        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri("/api/register")
                .set_json(json!({ "endpoint": "127.0.0.1:3001/" }))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["data"]["totalNodes"], json!(["http://127.0.0.1:3001"]));
        }

        let req = test::TestRequest::get().uri("/api/nodes").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["nodes"], json!(["http://127.0.0.1:3001"]));
    }

    #[actix_web::test]
    async fn register_without_body_uses_caller_address() {
        let (state, _rx) = state_with(FakeTransport::default());
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/register")
            .insert_header(("x-forwarded-for", "10.0.0.7"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(state.node.ledger().lock().registry().contains("http://10.0.0.7"));
    }

    #[actix_web::test]
    async fn subscribe_routes_events_to_the_bus() {
        let (state, mut rx) = state_with(FakeTransport::default());
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/subscribe")
            .set_json(json!({
                "type": "new_transaction",
                "data": { "input": "alice", "output": "bob", "amount": 4 }
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert_eq!(
            rx.try_recv().unwrap(),
            Event::NewTransaction(Transaction::new("alice", "bob", 4))
        );
    }

    #[actix_web::test]
    async fn malformed_transactions_are_rejected() {
        let (state, mut rx) = state_with(FakeTransport::default());
        let app = app!(state);

        let missing_field = test::TestRequest::post()
            .uri("/api/transactions")
            .set_json(json!({ "input": "alice", "output": "bob" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, missing_field).await.status(),
            StatusCode::BAD_REQUEST
        );

        let zero = test::TestRequest::post()
            .uri("/api/subscribe")
            .set_json(json!({
                "type": "new_transaction",
                "data": { "input": "alice", "output": "bob", "amount": 0 }
            }))
            .to_request();
        assert_eq!(test::call_service(&app, zero).await.status(), StatusCode::BAD_REQUEST);

        let no_input = test::TestRequest::post()
            .uri("/api/transactions")
            .set_json(json!({ "input": "", "output": "bob", "amount": 5 }))
            .to_request();
        assert_eq!(test::call_service(&app, no_input).await.status(), StatusCode::BAD_REQUEST);

        let relayed_no_input = test::TestRequest::post()
            .uri("/api/subscribe")
            .set_json(json!({
                "type": "new_transaction",
                "data": { "input": "", "output": "bob", "amount": 5 }
            }))
            .to_request();
        assert_eq!(
            test::call_service(&app, relayed_no_input).await.status(),
            StatusCode::BAD_REQUEST
        );

        let unknown = test::TestRequest::post()
            .uri("/api/subscribe")
            .set_json(json!({ "type": "new_wallet", "data": {} }))
            .to_request();
        assert_eq!(test::call_service(&app, unknown).await.status(), StatusCode::BAD_REQUEST);

        assert!(rx.try_recv().is_err());
    }

    #[actix_web::test]
    async fn local_transaction_is_queued() {
        let (state, mut rx) = state_with(FakeTransport::default());
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/transactions")
            .set_json(json!({ "input": "alice", "output": "bob", "amount": 2 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert!(matches!(rx.try_recv(), Ok(Event::NewTransaction(_))));
    }

    #[actix_web::test]
    async fn mine_then_validate() {
        let (state, _rx) = state_with(FakeTransport::default());
        let app = app!(state);

        let req = test::TestRequest::post().uri("/api/mine").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "New Block Forged");
        assert_eq!(body["data"]["transactions"][0]["input"], "");

        let req = test::TestRequest::get().uri("/api/validate").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["valid"], true);
        assert_eq!(body["length"], 2);
        assert_eq!(body["difficulty"], "0");
    }

    #[actix_web::test]
    async fn consensus_adopts_peer_chain() {
        let mut peer = test_ledger();
        peer.mine();
        let (state, _rx) =
            state_with(FakeTransport::default().with_chain("http://peer", peer.snapshot()));
        state.node.ledger().lock().registry_mut().add("http://peer");
        let app = app!(state);

        let req = test::TestRequest::post().uri("/api/consensus").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["replaced"], true);
        assert_eq!(body["data"]["length"], 2);
        assert_eq!(state.node.ledger().lock().chain(), peer.chain());
    }

    #[actix_web::test]
    async fn pending_lists_pool() {
        let (state, _rx) = state_with(FakeTransport::default());
        state
            .node
            .ledger()
            .lock()
            .accept_transaction(Transaction::new("a", "b", 1));
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/api/transactions/pending")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["size"], 1);
    }
}
