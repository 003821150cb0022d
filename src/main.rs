use std::io::Write;
use std::sync::Arc;

use actix_web::{App, HttpServer, rt, web};
use clap::Parser;
use dotenvy::dotenv;
use env_logger::Env;
use log::info;

use powledger_node::api::{self, AppState};
use powledger_node::blockchain::Ledger;
use powledger_node::config::NodeConfig;
use powledger_node::error;
use powledger_node::network::{self, ConsensusResolver, HttpTransport, Node, event, normalize_endpoint};
use powledger_node::wallet::MinerIdentity;

fn init_logging(node_name: &str) {
    let node_name = node_name.to_string();
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(move |buf, record| {
            writeln!(
                buf,
                "[{}] {} {}: {}",
                node_name,
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[actix_web::main]
async fn main() -> error::Result<()> {
    let _ = dotenv();
    let config = NodeConfig::parse();
    init_logging(&config.name);

    let port = config.resolve_port();
    let miner = MinerIdentity::generate();
    info!("miner address {}", miner.address());

    let mut ledger = Ledger::new(config.ledger_params(miner.address()));
    let mut bootstrap = Vec::new();
    for raw in &config.peers {
        let endpoint = normalize_endpoint(raw)?;
        ledger.registry_mut().add(endpoint.clone());
        bootstrap.push(endpoint);
    }

    let transport = Arc::new(HttpTransport::new(config.peer_timeout())?);
    let node = Arc::new(Node::new(
        config.name.clone(),
        ledger,
        transport,
        ConsensusResolver::new(config.fetch_policy()),
        config.relay_memory(),
    ));

    let (events, receiver) = event::channel();
    network::spawn_dispatcher(Arc::clone(&node), receiver);
    if let Some(every) = config.consensus_interval() {
        network::spawn_consensus_loop(Arc::clone(&node), every);
    }
    if let Some(advertise) = &config.advertise {
        let own = normalize_endpoint(advertise)?;
        let node = Arc::clone(&node);
        rt::spawn(async move { node.announce(&bootstrap, &own).await });
    }

    println!("⛓️ Node {} starting at http://{}:{port}", config.name, config.host);

    let state = web::Data::new(AppState::new(node, events));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), port))?
    .run()
    .await?;
    Ok(())
}
