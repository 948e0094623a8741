//! Object handle table
//!
//! Maps small integer handles to the index of the record that created the
//! object (pen, brush, font, palette, region). Slots are handed out first-fit.
//! A table sized from a loaded header is fixed; a builder document's table
//! grows by one slot whenever every slot is taken.

use crate::error::{WmfError, WmfResult};
use log::warn;

#[derive(Debug, Clone, Default)]
pub struct HandleTable {
    slots: Vec<Option<usize>>,
    fixed: bool,
}

impl HandleTable {
    /// Fixed table of `capacity` empty slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            fixed: true,
        }
    }

    /// Empty table that grows on demand
    pub fn growable() -> Self {
        Self {
            slots: Vec::new(),
            fixed: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Record index stored in `handle`, if the slot is live
    pub fn get(&self, handle: u16) -> Option<usize> {
        self.slots.get(handle as usize).copied().flatten()
    }

    /// Store `record` in the first free slot and return its handle
    pub fn allocate(&mut self, record: usize) -> WmfResult<u16> {
        let slot = match self.slots.iter().position(Option::is_none) {
            Some(slot) => slot,
            None if !self.fixed && self.slots.len() <= u16::MAX as usize => {
                self.slots.push(None);
                self.slots.len() - 1
            }
            None => {
                return Err(WmfError::HandleExhausted {
                    capacity: self.slots.len(),
                })
            }
        };
        self.slots[slot] = Some(record);
        Ok(slot as u16)
    }

    /// Empty `handle`; returns the record index it held
    pub fn free(&mut self, handle: u16) -> WmfResult<Option<usize>> {
        let slot = self
            .slots
            .get_mut(handle as usize)
            .ok_or(WmfError::InvalidHandle(handle))?;
        let previous = slot.take();
        if previous.is_none() {
            warn!("Delete of free handle {}", handle);
        }
        Ok(previous)
    }

    /// Bind `handle` to `record` if the slot is empty. Used for references
    /// decoded before (or without) the record that created the object.
    pub fn register(&mut self, handle: u16, record: usize) {
        let index = handle as usize;
        if index >= self.slots.len() {
            if self.fixed {
                warn!(
                    "Reference to handle {} outside table of {}",
                    handle,
                    self.slots.len()
                );
                return;
            }
            self.slots.resize(index + 1, None);
        }
        if self.slots[index].is_none() {
            warn!("Reference to empty handle {}", handle);
            self.slots[index] = Some(record);
        }
    }

    /// Adjust for the removal of record `index` from the document
    pub fn forget_record(&mut self, index: usize) {
        for slot in self.slots.iter_mut() {
            match *slot {
                Some(i) if i == index => *slot = None,
                Some(i) if i > index => *slot = Some(i - 1),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_allocation() {
        let mut table = HandleTable::growable();
        for (i, record) in [10, 11, 12, 13].into_iter().enumerate() {
            assert_eq!(table.allocate(record).unwrap(), i as u16);
        }
        assert_eq!(table.capacity(), 4);
        assert_eq!(table.live_count(), 4);
        assert_eq!(table.get(2), Some(12));
    }

    #[test]
    fn test_first_fit_reuse() {
        let mut table = HandleTable::with_capacity(3);
        table.allocate(0).unwrap();
        table.allocate(1).unwrap();
        table.allocate(2).unwrap();
        assert_eq!(table.free(1).unwrap(), Some(1));
        assert_eq!(table.get(1), None);
        assert_eq!(table.allocate(7).unwrap(), 1);
        assert_eq!(table.get(1), Some(7));
    }

    #[test]
    fn test_fixed_table_exhausted() {
        let mut table = HandleTable::with_capacity(1);
        table.allocate(0).unwrap();
        let err = table.allocate(1).unwrap_err();
        assert!(matches!(err, WmfError::HandleExhausted { capacity: 1 }));
    }

    #[test]
    fn test_free_out_of_range() {
        let mut table = HandleTable::with_capacity(2);
        assert!(matches!(table.free(5), Err(WmfError::InvalidHandle(5))));
        assert_eq!(table.free(0).unwrap(), None);
    }

    #[test]
    fn test_register_reference() {
        let mut table = HandleTable::with_capacity(2);
        table.register(1, 4);
        assert_eq!(table.get(1), Some(4));
        table.register(9, 5);
        assert_eq!(table.capacity(), 2);

        let mut growable = HandleTable::growable();
        growable.register(3, 8);
        assert_eq!(growable.capacity(), 4);
        assert_eq!(growable.get(3), Some(8));
    }

    #[test]
    fn test_forget_record_shifts_indices() {
        let mut table = HandleTable::growable();
        table.allocate(2).unwrap();
        table.allocate(5).unwrap();
        table.allocate(7).unwrap();
        table.forget_record(5);
        assert_eq!(table.get(0), Some(2));
        assert_eq!(table.get(1), None);
        assert_eq!(table.get(2), Some(6));
    }
}
