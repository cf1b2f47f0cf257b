use stateline_serde::{BitReader, BitWrite, BitWriter, Serde};

use crate::{
    replication::{
        error::{PayloadError, ReceiveError},
        state::State,
    },
    types::ReplicatorId,
};

/// Bytes taken by the replicator id at the front of every payload
pub const REPLICATOR_ID_BYTES: usize = 4;

/// Fixed wire sizes a State may be padded to. Chosen once per type at
/// bootstrap from the type's byte size alone, so every peer agrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PayloadSize {
    Bytes4,
    Bytes8,
    Bytes16,
    Bytes32,
    Bytes48,
    Bytes64,
    Bytes80,
    Bytes96,
    Bytes128,
    Bytes192,
    Bytes256,
}

impl PayloadSize {
    pub const ALL: [PayloadSize; 11] = [
        PayloadSize::Bytes4,
        PayloadSize::Bytes8,
        PayloadSize::Bytes16,
        PayloadSize::Bytes32,
        PayloadSize::Bytes48,
        PayloadSize::Bytes64,
        PayloadSize::Bytes80,
        PayloadSize::Bytes96,
        PayloadSize::Bytes128,
        PayloadSize::Bytes192,
        PayloadSize::Bytes256,
    ];

    pub const MAX_BYTES: usize = 256;

    pub fn bytes(self) -> usize {
        match self {
            PayloadSize::Bytes4 => 4,
            PayloadSize::Bytes8 => 8,
            PayloadSize::Bytes16 => 16,
            PayloadSize::Bytes32 => 32,
            PayloadSize::Bytes48 => 48,
            PayloadSize::Bytes64 => 64,
            PayloadSize::Bytes80 => 80,
            PayloadSize::Bytes96 => 96,
            PayloadSize::Bytes128 => 128,
            PayloadSize::Bytes192 => 192,
            PayloadSize::Bytes256 => 256,
        }
    }

    /// Smallest bucket that fits `byte_size`, or `None` if nothing does
    pub fn for_byte_size(byte_size: usize) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.bytes() >= byte_size)
    }

    pub fn for_state<S: State>() -> Result<Self, PayloadError> {
        let byte_size = S::byte_size();
        Self::for_byte_size(byte_size).ok_or(PayloadError::StateTooLarge {
            state_name: S::full_name(),
            byte_size,
            max: Self::MAX_BYTES,
        })
    }

    /// Total length of an encoded `(replicator id, state)` payload
    pub fn wire_len(self) -> usize {
        REPLICATOR_ID_BYTES + self.bytes()
    }

    pub fn encode<S: State>(self, id: ReplicatorId, state: &S) -> Vec<u8> {
        let mut writer = BitWriter::with_capacity(self.wire_len());
        writer.write_bytes(&id.to_le_bytes());
        state.ser(&mut writer);
        writer.to_padded_bytes(self.wire_len())
    }

    pub fn decode<S: State>(
        self,
        channel: &str,
        payload: &[u8],
    ) -> Result<(ReplicatorId, S), ReceiveError> {
        if payload.len() != self.wire_len() {
            return Err(ReceiveError::MalformedPayload {
                channel: channel.to_string(),
                expected: self.wire_len(),
                actual: payload.len(),
            });
        }

        let mut reader = BitReader::new(payload);
        let decode_err = |_| ReceiveError::Decode {
            channel: channel.to_string(),
        };
        let id = ReplicatorId::de(&mut reader).map_err(decode_err)?;
        let state = S::de(&mut reader).map_err(decode_err)?;

        Ok((id, state))
    }
}
