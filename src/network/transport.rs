use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::Serialize;

use super::Event;
use crate::api::models::{Envelope, FullChainData};
use crate::blockchain::Block;
use crate::error::{NodeError, Result};

/// Outbound calls a node makes to its peers.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// The peer's full chain, genesis first.
    async fn fetch_chain(&self, endpoint: &str) -> Result<Vec<Block>>;

    /// Deliver a gossip event to the peer.
    async fn send_event(&self, endpoint: &str, event: &Event) -> Result<()>;

    /// Ask the peer to add `own_endpoint` to its registry.
    async fn register_with(&self, endpoint: &str, own_endpoint: &str) -> Result<()>;
}

/// JSON over HTTP against the `/api` routes of another node.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    endpoint: &'a str,
}

impl HttpTransport {
    /// Every request is bounded by `timeout` so one silent peer cannot stall the node.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NodeError::Client)?;
        Ok(Self { client })
    }

    fn check(endpoint: &str, resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(NodeError::PeerStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

fn peer_error(endpoint: &str) -> impl FnOnce(reqwest::Error) -> NodeError + '_ {
    move |source| NodeError::Peer {
        endpoint: endpoint.to_string(),
        source,
    }
}

#[async_trait]
impl PeerTransport for HttpTransport {
    async fn fetch_chain(&self, endpoint: &str) -> Result<Vec<Block>> {
        let url = format!("{endpoint}/api/fullchains");
        debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(peer_error(endpoint))?;
        let body: Envelope<FullChainData> = Self::check(endpoint, resp)?
            .json()
            .await
            .map_err(peer_error(endpoint))?;
        Ok(body.data.fullchains)
    }

    async fn send_event(&self, endpoint: &str, event: &Event) -> Result<()> {
        let url = format!("{endpoint}/api/subscribe");
        debug!("POST {url} ({})", event.kind());
        let resp = self
            .client
            .post(&url)
            .json(event)
            .send()
            .await
            .map_err(peer_error(endpoint))?;
        Self::check(endpoint, resp).map(|_| ())
    }

    async fn register_with(&self, endpoint: &str, own_endpoint: &str) -> Result<()> {
        let url = format!("{endpoint}/api/register");
        debug!("POST {url} as {own_endpoint}");
        let resp = self
            .client
            .post(&url)
            .json(&RegisterBody {
                endpoint: own_endpoint,
            })
            .send()
            .await
            .map_err(peer_error(endpoint))?;
        Self::check(endpoint, resp).map(|_| ())
    }
}
