use soroban_sdk::{contracttype, xdr::ToXdr, Address, Bytes, BytesN, Env};

/// An identity that can hold permissions in the registry.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Controller {
    /// A Soroban account or contract, authenticated with `require_auth`
    Account(Address),
    /// A secp256k1 relay key, identified by its 20-byte Ethereum-style address
    Key(BytesN<20>),
}

impl Controller {
    /// The 20-byte id the registry keys this controller under.
    ///
    /// Keys are used as-is. Addresses are reduced to the trailing 20 bytes of
    /// keccak256 over their XDR encoding, which is fixed-length for both
    /// account and contract addresses.
    pub fn key_id(&self, env: &Env) -> BytesN<20> {
        match self {
            Controller::Key(id) => id.clone(),
            Controller::Account(address) => {
                let digest = env.crypto().keccak256(&address.clone().to_xdr(env));
                trailing_20(env, &digest.to_array())
            }
        }
    }

    /// Builds the relay controller for an uncompressed secp256k1 public key
    /// (`0x04 ‖ x ‖ y`): keccak256 over `x ‖ y`, trailing 20 bytes.
    pub fn from_public_key(env: &Env, public_key: &BytesN<65>) -> Self {
        let raw = public_key.to_array();
        let digest = env.crypto().keccak256(&Bytes::from_slice(env, &raw[1..]));
        Controller::Key(trailing_20(env, &digest.to_array()))
    }
}

fn trailing_20(env: &Env, digest: &[u8; 32]) -> BytesN<20> {
    let mut id = [0u8; 20];
    id.copy_from_slice(&digest[12..]);
    BytesN::from_array(env, &id)
}
