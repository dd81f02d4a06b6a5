/* MultiversX wire codec
 *
 * Two encodings share the same primitives:
 *   - top-level: a value owns a whole return slot, so its length is implicit.
 *     Unsigned integers may drop leading zero bytes and big integers are raw
 *     big-endian bytes.
 *   - nested: a value sits inside a record at a byte offset. Fixed-width
 *     integers use their full width, variable-length values (big integers,
 *     bytes, strings, lists) carry a 4-byte big-endian length or count prefix.
 *
 * Arguments travel the other way as hex strings (see `WireArg`).
 */

use crate::errors::WireError;
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

pub const ADDRESS_LEN: usize = 32;

/* ---------- top-level decoding ---------- */

fn top_decode_unsigned(slot: &[u8], width: usize, type_name: &'static str) -> Result<u64, WireError> {
    let significant = slot.iter().position(|byte| *byte != 0).map_or(&[][..], |start| &slot[start..]);
    if significant.len() > width {
        return Err(WireError::Overflow { type_name, bytes: slot.len() });
    }
    Ok(significant.iter().fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte)))
}

pub fn top_decode_u8(slot: &[u8]) -> Result<u8, WireError> {
    top_decode_unsigned(slot, 1, "u8").map(|v| v as u8)
}

pub fn top_decode_u16(slot: &[u8]) -> Result<u16, WireError> {
    top_decode_unsigned(slot, 2, "u16").map(|v| v as u16)
}

pub fn top_decode_u32(slot: &[u8]) -> Result<u32, WireError> {
    top_decode_unsigned(slot, 4, "u32").map(|v| v as u32)
}

pub fn top_decode_u64(slot: &[u8]) -> Result<u64, WireError> {
    top_decode_unsigned(slot, 8, "u64")
}

/* true only when the slot holds the value 1; false is usually an empty slot */
pub fn top_decode_bool(slot: &[u8]) -> Result<bool, WireError> {
    Ok(BigUint::from_bytes_be(slot) == BigUint::from(1u8))
}

pub fn top_decode_big_uint(slot: &[u8]) -> Result<BigUint, WireError> {
    Ok(BigUint::from_bytes_be(slot))
}

pub fn top_decode_big_int(slot: &[u8]) -> Result<BigInt, WireError> {
    Ok(BigInt::from_signed_bytes_be(slot))
}

pub fn top_decode_address(slot: &[u8]) -> Result<[u8; ADDRESS_LEN], WireError> {
    slot.try_into().map_err(|_| WireError::InvalidAddressLength { length: slot.len() })
}

pub fn top_decode_string(slot: &[u8]) -> Result<String, WireError> {
    String::from_utf8(slot.to_vec()).map_err(|_| WireError::InvalidUtf8)
}

pub fn top_decode_bytes(slot: &[u8]) -> Result<Vec<u8>, WireError> {
    Ok(slot.to_vec())
}

/* A record that owns a whole slot: its fields are read with nested encoding */
pub fn decode_record<T, F>(slot: &[u8], decode: F) -> Result<T, WireError>
where
    F: FnOnce(&mut NestedDecoder<'_>) -> Result<T, WireError>,
{
    let mut decoder = NestedDecoder::new(slot);
    decode(&mut decoder)
}

/* Records packed back to back with no count. The first position that does not
 * hold a complete record ends the list; everything before it is returned. A
 * parse that consumes nothing also ends it so the loop always terminates. */
pub fn decode_self_terminating<T, F>(slot: &[u8], mut decode: F) -> Vec<T>
where
    F: FnMut(&mut NestedDecoder<'_>) -> Result<T, WireError>,
{
    let mut decoder = NestedDecoder::new(slot);
    let mut items = Vec::new();

    while !decoder.is_empty() {
        let before = decoder.offset();
        match decoder.read_with(&mut decode) {
            Ok(item) if decoder.offset() > before => items.push(item),
            Ok(_) => break,
            Err(err) => {
                tracing::trace!(offset = before, %err, "self-terminating list ended");
                break;
            }
        }
    }

    items
}

/* ---------- nested decoding ---------- */

/* Cursor over one slot. Every read is atomic: on failure the offset is left
 * where it was. */
#[derive(Debug, Clone)]
pub struct NestedDecoder<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> NestedDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], WireError> {
        let available = self.remaining();
        if needed > available {
            return Err(WireError::InsufficientData { needed, available });
        }
        let bytes = &self.data[self.offset..self.offset + needed];
        self.offset += needed;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /* Runs a multi-step read, rolling the offset back if any step fails */
    pub fn read_with<T, F>(&mut self, read: F) -> Result<T, WireError>
    where
        F: FnOnce(&mut Self) -> Result<T, WireError>,
    {
        let start = self.offset;
        let result = read(self);
        if result.is_err() {
            self.offset = start;
        }
        result
    }

    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, WireError> {
        Ok(u16::from_be_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, WireError> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, WireError> {
        Ok(u64::from_be_bytes(self.take_array()?))
    }

    pub fn read_bool(&mut self) -> Result<bool, WireError> {
        self.read_with(|d| match d.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(WireError::InvalidBool { value }),
        })
    }

    fn read_len(&mut self) -> Result<usize, WireError> {
        Ok(self.read_u32()? as usize)
    }

    /* Length-prefixed raw bytes */
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, WireError> {
        self.read_with(|d| {
            let len = d.read_len()?;
            Ok(d.take(len)?.to_vec())
        })
    }

    pub fn read_string(&mut self) -> Result<String, WireError> {
        self.read_with(|d| {
            let bytes = d.read_bytes()?;
            String::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8)
        })
    }

    pub fn read_big_uint(&mut self) -> Result<BigUint, WireError> {
        self.read_with(|d| {
            let len = d.read_len()?;
            Ok(BigUint::from_bytes_be(d.take(len)?))
        })
    }

    pub fn read_big_int(&mut self) -> Result<BigInt, WireError> {
        self.read_with(|d| {
            let len = d.read_len()?;
            Ok(BigInt::from_signed_bytes_be(d.take(len)?))
        })
    }

    pub fn read_address(&mut self) -> Result<[u8; ADDRESS_LEN], WireError> {
        self.take_array()
    }

    /* Count-prefixed list of nested values */
    pub fn read_list<T, F>(&mut self, mut read_item: F) -> Result<Vec<T>, WireError>
    where
        F: FnMut(&mut Self) -> Result<T, WireError>,
    {
        self.read_with(|d| {
            let count = d.read_len()?;
            /* the count is untrusted input */
            let mut items = Vec::with_capacity(count.min(d.remaining()));
            for _ in 0..count {
                items.push(read_item(d)?);
            }
            Ok(items)
        })
    }
}

/* ---------- argument encoding ---------- */

/// Renders a value as one hex-encoded call argument.
pub trait WireArg {
    fn to_wire_arg(&self) -> String;
}

impl WireArg for u8 {
    fn to_wire_arg(&self) -> String {
        format!("{:02x}", self)
    }
}

impl WireArg for u16 {
    fn to_wire_arg(&self) -> String {
        format!("{:04x}", self)
    }
}

impl WireArg for u32 {
    fn to_wire_arg(&self) -> String {
        format!("{:08x}", self)
    }
}

impl WireArg for u64 {
    fn to_wire_arg(&self) -> String {
        format!("{:016x}", self)
    }
}

impl WireArg for bool {
    fn to_wire_arg(&self) -> String {
        let byte = if *self { "01" } else { "00" };
        byte.to_string()
    }
}

/* zero is the empty argument */
impl WireArg for BigUint {
    fn to_wire_arg(&self) -> String {
        if self.is_zero() {
            String::new()
        } else {
            hex::encode(self.to_bytes_be())
        }
    }
}

impl WireArg for BigInt {
    fn to_wire_arg(&self) -> String {
        if self.is_zero() {
            String::new()
        } else {
            hex::encode(self.to_signed_bytes_be())
        }
    }
}

impl WireArg for str {
    fn to_wire_arg(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl WireArg for String {
    fn to_wire_arg(&self) -> String {
        self.as_str().to_wire_arg()
    }
}

impl WireArg for [u8] {
    fn to_wire_arg(&self) -> String {
        hex::encode(self)
    }
}

impl WireArg for Vec<u8> {
    fn to_wire_arg(&self) -> String {
        self.as_slice().to_wire_arg()
    }
}

impl WireArg for [u8; ADDRESS_LEN] {
    fn to_wire_arg(&self) -> String {
        hex::encode(self)
    }
}
