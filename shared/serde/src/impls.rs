use crate::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr};

// Unit

impl Serde for () {
    fn ser(&self, _: &mut dyn BitWrite) {}

    fn de(_: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(())
    }

    fn bit_length(&self) -> u32 {
        0
    }
}

impl ConstBitLength for () {
    fn const_bit_length() -> u32 {
        0
    }
}

// Bool

impl Serde for bool {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_bit(*self);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        reader.read_bit()
    }

    fn bit_length(&self) -> u32 {
        1
    }
}

impl ConstBitLength for bool {
    fn const_bit_length() -> u32 {
        1
    }
}

// Integers

macro_rules! impl_serde_integer {
    ($($int:ty),*) => {$(
        impl Serde for $int {
            fn ser(&self, writer: &mut dyn BitWrite) {
                writer.write_bytes(&self.to_le_bytes());
            }

            fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                let mut bytes = [0u8; std::mem::size_of::<$int>()];
                for byte in bytes.iter_mut() {
                    *byte = reader.read_byte()?;
                }
                Ok(<$int>::from_le_bytes(bytes))
            }

            fn bit_length(&self) -> u32 {
                <Self as ConstBitLength>::const_bit_length()
            }
        }

        impl ConstBitLength for $int {
            fn const_bit_length() -> u32 {
                (std::mem::size_of::<$int>() as u32) * 8
            }
        }
    )*};
}

impl_serde_integer!(u8, u16, u32, u64, i8, i16, i32, i64);

// Floats

macro_rules! impl_serde_float {
    ($($float:ty => $bits:ty),*) => {$(
        impl Serde for $float {
            fn ser(&self, writer: &mut dyn BitWrite) {
                self.to_bits().ser(writer);
            }

            fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                Ok(<$float>::from_bits(<$bits>::de(reader)?))
            }

            fn bit_length(&self) -> u32 {
                <$bits as ConstBitLength>::const_bit_length()
            }
        }

        impl ConstBitLength for $float {
            fn const_bit_length() -> u32 {
                <$bits as ConstBitLength>::const_bit_length()
            }
        }
    )*};
}

impl_serde_float!(f32 => u32, f64 => u64);

// Arrays

impl<T: Serde + Copy + Default, const N: usize> Serde for [T; N] {
    fn ser(&self, writer: &mut dyn BitWrite) {
        for item in self {
            item.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let mut output = [T::default(); N];
        for item in output.iter_mut() {
            *item = T::de(reader)?;
        }
        Ok(output)
    }

    fn bit_length(&self) -> u32 {
        self.iter().map(Serde::bit_length).sum()
    }
}

impl<T: ConstBitLength, const N: usize> ConstBitLength for [T; N] {
    fn const_bit_length() -> u32 {
        T::const_bit_length() * (N as u32)
    }
}
