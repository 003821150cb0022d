pub mod consensus;
pub mod event;
pub mod node;
pub mod registry;
pub mod transport;

#[cfg(test)]
pub mod testing;

pub use consensus::{ConsensusResolver, FetchPolicy, Resolution};
pub use event::{Event, EventReceiver, EventSender, RelayFilter};
pub use node::{Node, spawn_consensus_loop, spawn_dispatcher};
pub use registry::{NodeRegistry, normalize_endpoint};
pub use transport::{HttpTransport, PeerTransport};

/// Recent transactions remembered when relay loop suppression is on.
pub const RELAY_MEMORY: usize = 4096;
