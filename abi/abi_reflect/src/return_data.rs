/* Decode strategies over the slot array returned by a contract query
 *
 * Each strategy carries its own failure policy:
 *   scalar / group     abort: the whole call fails with InvalidWireResponse
 *   self_terminating   stop:  keep what was parsed before the first failure
 *   each_slot / groups skip:  drop the failing element, keep going
 */

use crate::errors::{BindingError, WireError};
use crate::wire::{self, NestedDecoder};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct ReturnData<'a> {
    endpoint: &'a str,
    slots: &'a [Vec<u8>],
}

impl<'a> ReturnData<'a> {
    pub fn new(endpoint: &'a str, slots: &'a [Vec<u8>]) -> Self {
        Self { endpoint, slots }
    }

    pub fn endpoint(&self) -> &'a str {
        self.endpoint
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Raw slot at `index`, or `InvalidWireResponse` when the contract returned
    /// fewer slots.
    pub fn slot(&self, index: usize) -> Result<&'a [u8], BindingError> {
        self.slots.get(index).map(Vec::as_slice).ok_or_else(|| {
            BindingError::invalid_response(
                self.endpoint,
                index,
                WireError::MissingSlot { index, available: self.slots.len() },
            )
        })
    }

    /// One value from one slot.
    pub fn scalar<T, F>(&self, index: usize, decode: F) -> Result<T, BindingError>
    where
        F: FnOnce(&[u8]) -> Result<T, WireError>,
    {
        let slot = self.slot(index)?;
        decode(slot).map_err(|err| BindingError::invalid_response(self.endpoint, index, err))
    }

    /// Records packed into one slot without a count. A missing slot is an
    /// empty list.
    pub fn self_terminating<T, F>(&self, index: usize, decode: F) -> Vec<T>
    where
        F: FnMut(&mut NestedDecoder<'_>) -> Result<T, WireError>,
    {
        match self.slots.get(index) {
            Some(slot) => wire::decode_self_terminating(slot, decode),
            None => Vec::new(),
        }
    }

    /// One value per slot from `from` to the end.
    pub fn each_slot<T, F>(&self, from: usize, mut decode: F) -> Vec<T>
    where
        F: FnMut(&[u8]) -> Result<T, WireError>,
    {
        let mut values = Vec::new();
        for (offset, slot) in self.slots.iter().skip(from).enumerate() {
            match decode(slot) {
                Ok(value) => values.push(value),
                Err(err) => {
                    debug!(endpoint = self.endpoint, slot = from + offset, %err, "skipping undecodable slot");
                }
            }
        }
        values
    }

    /// Strides of `width` slots from `from` to the end.
    pub fn groups<T, F>(&self, from: usize, width: usize, mut decode: F) -> Vec<T>
    where
        F: FnMut(&[Vec<u8>]) -> Result<T, WireError>,
    {
        let mut values = Vec::new();
        if width == 0 || from >= self.slots.len() {
            return values;
        }

        let tail = &self.slots[from..];
        for (index, group) in tail.chunks(width).enumerate() {
            if group.len() < width {
                debug!(endpoint = self.endpoint, slots = group.len(), width, "dropping incomplete trailing group");
                break;
            }
            match decode(group) {
                Ok(value) => values.push(value),
                Err(err) => {
                    debug!(endpoint = self.endpoint, slot = from + index * width, %err, "skipping undecodable group");
                }
            }
        }
        values
    }

    /// Exactly one stride of `width` slots.
    pub fn group<T, F>(&self, from: usize, width: usize, decode: F) -> Result<T, BindingError>
    where
        F: FnOnce(&[Vec<u8>]) -> Result<T, WireError>,
    {
        let end = from + width;
        if end > self.slots.len() {
            let missing = self.slots.len().max(from);
            return Err(BindingError::invalid_response(
                self.endpoint,
                missing,
                WireError::MissingSlot { index: missing, available: self.slots.len() },
            ));
        }
        decode(&self.slots[from..end])
            .map_err(|err| BindingError::invalid_response(self.endpoint, from, err))
    }
}
