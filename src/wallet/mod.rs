use rand::rngs::OsRng;
use secp256k1::{PublicKey, Secp256k1};

/// The public key a node mines under. Its address is the hex of the
/// compressed key and is what coinbase transactions pay to. Nothing is ever
/// signed, so the secret half is not kept.
#[derive(Debug, Clone)]
pub struct MinerIdentity {
    public: PublicKey,
}

impl MinerIdentity {
    /// Fresh random identity; a restarted node mines under a new address.
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (_secret, public) = secp.generate_keypair(&mut OsRng);
        Self { public }
    }

    pub fn address(&self) -> String {
        hex::encode(self.public.serialize())
    }
}
