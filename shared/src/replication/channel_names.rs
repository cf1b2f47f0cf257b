use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};

use crate::replication::state::State;

const CLIENT_REQUEST_TAG: &str = "Rq";
const MASTER_SET_STATE_TAG: &str = "Rb";
const MASTER_SET_RECALL_STATE_TAG: &str = "Rr";

/// Which of a State type's channels a message arrived on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelRole {
    /// Client -> master: a proposed change
    ClientRequest,
    /// Master -> all: an accepted live change
    MasterSetState,
    /// Master -> all (or one joiner): a rewind or drop-in change
    MasterSetRecallState,
    /// Joiner -> master: ask for drop-in state
    Handshake,
}

/// The generated channel names of one State type. Derived purely from the
/// type's identity, so no manual registration of names exists and two
/// similarly named types cannot collide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelNames {
    digest: String,
    client_request: String,
    master_set_state: String,
    master_set_recall_state: String,
    handshake: String,
}

impl ChannelNames {
    pub fn of<S: State>() -> Self {
        Self::new(S::short_name(), S::full_name())
    }

    pub fn new(short_name: &str, full_name: &str) -> Self {
        let digest = type_digest(full_name);
        Self {
            client_request: format!("{CLIENT_REQUEST_TAG}{short_name}-{digest}"),
            master_set_state: format!("{MASTER_SET_STATE_TAG}{short_name}-{digest}"),
            master_set_recall_state: format!("{MASTER_SET_RECALL_STATE_TAG}{short_name}-{digest}"),
            handshake: format!("{short_name}-{digest}"),
            digest,
        }
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn client_request(&self) -> &str {
        &self.client_request
    }

    pub fn master_set_state(&self) -> &str {
        &self.master_set_state
    }

    pub fn master_set_recall_state(&self) -> &str {
        &self.master_set_recall_state
    }

    pub fn handshake(&self) -> &str {
        &self.handshake
    }

    pub fn get(&self, role: ChannelRole) -> &str {
        match role {
            ChannelRole::ClientRequest => self.client_request(),
            ChannelRole::MasterSetState => self.master_set_state(),
            ChannelRole::MasterSetRecallState => self.master_set_recall_state(),
            ChannelRole::Handshake => self.handshake(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChannelRole, &str)> {
        [
            ChannelRole::ClientRequest,
            ChannelRole::MasterSetState,
            ChannelRole::MasterSetRecallState,
            ChannelRole::Handshake,
        ]
        .into_iter()
        .map(move |role| (role, self.get(role)))
    }
}

/// SHA-256 of the type identity, URL-safe base64 without padding
fn type_digest(full_name: &str) -> String {
    let hash = Sha256::digest(full_name.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}
