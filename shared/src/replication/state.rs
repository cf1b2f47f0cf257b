use std::{any::TypeId, fmt::Debug};

use stateline_serde::{ConstBitLength, Serde};

/// A fixed-size, plain-data value that can be replicated. Every peer must
/// compile the same definition of the type, since its identity and its
/// encoded size decide the wire channels and payload bucket.
pub trait State: Serde + ConstBitLength + Debug + Send + Sync + 'static {
    /// Encoded size in whole bytes
    fn byte_size() -> usize {
        ((Self::const_bit_length() + 7) / 8) as usize
    }

    /// Fully qualified type identity, the input of the channel digest
    fn full_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Last path segment of the type identity, generic arguments removed.
    /// Array, slice, tuple and reference identities are kept whole.
    fn short_name() -> &'static str {
        short_type_name(Self::full_name())
    }
}

fn short_type_name(full_name: &str) -> &str {
    if !full_name.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        return full_name;
    }
    let base = match full_name.find('<') {
        Some(index) => &full_name[..index],
        None => full_name,
    };
    match base.rfind("::") {
        Some(index) => &base[index + 2..],
        None => base,
    }
}

/// Runtime identity of a registered State type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKind {
    type_id: TypeId,
}

impl StateKind {
    pub fn of<S: State>() -> Self {
        Self::from(TypeId::of::<S>())
    }
}

impl From<TypeId> for StateKind {
    fn from(type_id: TypeId) -> Self {
        Self { type_id }
    }
}

macro_rules! impl_state_for_primitive {
    ($($ty:ty),*) => {$(
        impl State for $ty {}
    )*};
}

impl_state_for_primitive!(bool, u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
