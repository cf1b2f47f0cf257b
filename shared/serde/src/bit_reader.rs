use crate::error::SerdeErr;

/// Reads bits, least significant first, from a borrowed byte buffer.
pub struct BitReader<'b> {
    buffer: &'b [u8],
    bit_index: u32,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            bit_index: 0,
        }
    }

    pub fn bits_read(&self) -> u32 {
        self.bit_index
    }

    pub fn bits_remaining(&self) -> u32 {
        self.bit_capacity() - self.bit_index
    }

    fn bit_capacity(&self) -> u32 {
        (self.buffer.len() as u32) * 8
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        if self.bit_index >= self.bit_capacity() {
            return Err(SerdeErr::Exhausted {
                bit_index: self.bit_index,
                bit_capacity: self.bit_capacity(),
            });
        }

        let byte = self.buffer[(self.bit_index / 8) as usize];
        let bit = (byte >> (self.bit_index % 8)) & 1 != 0;
        self.bit_index += 1;

        Ok(bit)
    }

    pub fn read_bits(&mut self, bits: u8) -> Result<u64, SerdeErr> {
        let mut output: u64 = 0;
        for index in 0..bits {
            if self.read_bit()? {
                output |= 1 << index;
            }
        }
        Ok(output)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        Ok(self.read_bits(8)? as u8)
    }
}
