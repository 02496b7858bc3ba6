use super::{Grade, Marking};
use crate::quiz::{error::ValidationError, question::RankedItem, shuffler::shuffled};
use rand::Rng;

/// Ordering question. Items are displayed shuffled and each keeps its true rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderView {
    pub items: Vec<RankedItem>,
}

/// The learner's current ordering: slot `i` shows `items[arrangement[i]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement(Vec<usize>);

impl Arrangement {
    pub fn identity(len: usize) -> Self {
        Self::from_indices((0..len).collect())
    }

    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Swap two slots. Returns false when either slot is out of range.
    pub fn swap(&mut self, first: usize, second: usize) -> bool {
        if first >= self.0.len() || second >= self.0.len() {
            return false;
        }
        self.0.swap(first, second);
        true
    }

    pub fn move_up(&mut self, slot: usize) -> bool {
        slot > 0 && self.swap(slot, slot - 1)
    }

    pub fn move_down(&mut self, slot: usize) -> bool {
        self.swap(slot, slot + 1)
    }

    fn is_permutation_of(&self, len: usize) -> bool {
        if self.0.len() != len {
            return false;
        }
        let mut seen = vec![false; len];
        for &index in &self.0 {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }
}

impl ReorderView {
    pub fn present<R: Rng + ?Sized>(items: &[RankedItem], rng: &mut R) -> Self {
        Self {
            items: shuffled(items, rng),
        }
    }

    /// Arrangement matching the shuffled display order, before the learner moves anything.
    pub fn initial_arrangement(&self) -> Arrangement {
        Arrangement::identity(self.items.len())
    }

    /// Items in the order the arrangement displays them. Out-of-range indices are skipped.
    pub fn arranged<'a>(&'a self, arrangement: &Arrangement) -> Vec<&'a RankedItem> {
        arrangement
            .indices()
            .iter()
            .filter_map(|&index| self.items.get(index))
            .collect()
    }

    pub fn grade(&self, arrangement: &Arrangement) -> Result<Grade, ValidationError> {
        if !arrangement.is_permutation_of(self.items.len()) {
            return Err(ValidationError::InvalidArrangement);
        }

        let slots: Vec<bool> = self
            .arranged(arrangement)
            .iter()
            .enumerate()
            .map(|(slot, item)| item.order == slot + 1)
            .collect();
        let is_correct = slots.iter().all(|in_place| *in_place);

        Ok(Grade {
            is_correct,
            marking: Marking::Reorder(slots),
        })
    }
}
