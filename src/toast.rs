//! Toast-round slot scheduling.
//!
//! A toast round is a fixed row of toaster slots. Selecting a product with
//! `toaster_space = s` at slot i occupies slots i..i+s-1; those slots are
//! disabled until cleared. A product that would run past the last slot is
//! rejected and the selection reverted.

use serde::Serialize;
use ts_rs::TS;

use crate::error::BridgeError;

/// Rejection message shown when a product does not fit. Part of the UI
/// contract — tests and the frontend match on it verbatim.
pub const NO_SPACE_MESSAGE: &str = "Not enough space for this product in the remaining slots.";

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SlotAssignment {
    pub product_id: i64,
    pub display_name: String,
    /// First slot occupied (0-indexed).
    pub start: usize,
    /// Number of contiguous slots occupied.
    pub space: usize,
}

impl SlotAssignment {
    fn covers(&self, slot: usize) -> bool {
        slot >= self.start && slot < self.start + self.space
    }
}

pub struct ToastBoard {
    slot_count: usize,
    assignments: Vec<SlotAssignment>,
}

impl ToastBoard {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slot_count,
            assignments: Vec::new(),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn is_occupied(&self, slot: usize) -> bool {
        self.assignments.iter().any(|a| a.covers(slot))
    }

    /// Place a product at `start`, occupying `space` contiguous slots.
    /// Rejects placements that overflow the board or collide with an
    /// existing assignment; the board is left unchanged on rejection.
    pub fn assign(
        &mut self,
        product_id: i64,
        display_name: &str,
        space: usize,
        start: usize,
    ) -> Result<(), BridgeError> {
        if space < 1 {
            return Err(BridgeError::ValidationError {
                message: format!("Invalid toaster space: {space}"),
            });
        }
        let end = start.checked_add(space).ok_or_else(no_space)?;
        if end > self.slot_count {
            return Err(no_space());
        }
        if (start..end).any(|slot| self.is_occupied(slot)) {
            return Err(no_space());
        }
        self.assignments.push(SlotAssignment {
            product_id,
            display_name: display_name.to_string(),
            start,
            space,
        });
        Ok(())
    }

    /// Release the whole assignment covering `slot`, if any.
    pub fn clear_slot(&mut self, slot: usize) -> Option<SlotAssignment> {
        let index = self.assignments.iter().position(|a| a.covers(slot))?;
        Some(self.assignments.remove(index))
    }

    pub fn clear(&mut self) {
        self.assignments.clear();
    }

    pub fn assignments(&self) -> &[SlotAssignment] {
        &self.assignments
    }

    /// Product id occupying each slot, in slot order. `None` = free.
    pub fn occupancy(&self) -> Vec<Option<i64>> {
        (0..self.slot_count)
            .map(|slot| {
                self.assignments
                    .iter()
                    .find(|a| a.covers(slot))
                    .map(|a| a.product_id)
            })
            .collect()
    }
}

fn no_space() -> BridgeError {
    BridgeError::ValidationError {
        message: NO_SPACE_MESSAGE.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn assignment_marks_contiguous_slots_occupied() {
        let mut board = ToastBoard::new(6);
        board.assign(10, "Double toast", 2, 1).unwrap();
        assert!(!board.is_occupied(0));
        assert!(board.is_occupied(1));
        assert!(board.is_occupied(2));
        assert!(!board.is_occupied(3));
        assert_eq!(board.occupancy(), vec![None, Some(10), Some(10), None, None, None]);
    }

    #[test]
    fn overflow_past_last_slot_is_rejected() {
        // space=3 at slot 4 of 6 would occupy slots 4, 5, 6 — slot 6 does
        // not exist.
        let mut board = ToastBoard::new(6);
        let err = board.assign(10, "Triple toast", 3, 4).unwrap_err();
        assert_eq!(err.to_string(), NO_SPACE_MESSAGE);
        assert!(board.assignments().is_empty());
    }

    #[test]
    fn collision_with_occupied_slot_is_rejected() {
        let mut board = ToastBoard::new(6);
        board.assign(10, "Double toast", 2, 2).unwrap();
        let err = board.assign(11, "Single toast", 1, 3).unwrap_err();
        assert_eq!(err.to_string(), NO_SPACE_MESSAGE);
        assert_eq!(board.assignments().len(), 1);
    }

    #[test]
    fn clear_slot_releases_whole_assignment() {
        let mut board = ToastBoard::new(6);
        board.assign(10, "Triple toast", 3, 0).unwrap();
        let released = board.clear_slot(1).unwrap();
        assert_eq!(released.product_id, 10);
        assert!(!board.is_occupied(0));
        assert!(!board.is_occupied(2));
    }

    #[test]
    fn exact_fit_at_end_is_accepted() {
        let mut board = ToastBoard::new(6);
        board.assign(10, "Triple toast", 3, 3).unwrap();
        assert!(board.is_occupied(5));
    }
}
