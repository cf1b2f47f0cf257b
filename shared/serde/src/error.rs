use thiserror::Error;

/// Errors that can occur while reading a bit stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// Attempted to read past the end of the buffer
    #[error("Bit stream exhausted: tried to read bit {bit_index} of a {bit_capacity}-bit buffer")]
    Exhausted { bit_index: u32, bit_capacity: u32 },

    /// The bits read do not form a valid value of the requested type
    #[error("Invalid value read for type `{type_name}`")]
    InvalidValue { type_name: &'static str },
}
