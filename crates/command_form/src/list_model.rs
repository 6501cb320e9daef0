//! Ordered, mutable slot collection backing variadic and tuple editors.
//!
//! Slots keep stable identities as rows are inserted and removed, and the length ≥ 1
//! invariant is enforced here rather than at call sites. Mutations that would violate an
//! invariant are silently refused and reported through the boolean return value only.

/// Stable identity of one slot, unchanged by surrounding insertions and removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(u64);

/// Explicit edit state of one slot. An edited slot stays edited even when cleared back to
/// empty text; only [`ValueListModel::reset_slot`] returns it to the unset state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    /// Never touched; renders muted with ghost text.
    Unset,
    /// Committed by the user at least once; renders normally.
    Edited(String),
}

impl SlotState {
    /// Current text, empty for unset slots.
    pub fn text(&self) -> &str {
        match self {
            Self::Unset => "",
            Self::Edited(text) => text,
        }
    }

    /// Whether the slot has never been touched.
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    id: SlotId,
    state: SlotState,
}

/// Ordered slot collection with stable identities and a minimum length of one.
#[derive(Debug, Clone)]
pub struct ValueListModel {
    slots: Vec<Slot>,
    next_id: u64,
    fixed_len: Option<usize>,
}

impl ValueListModel {
    /// Creates a growable model with one unset slot.
    pub fn variadic() -> Self {
        let mut model = Self {
            slots: Vec::new(),
            next_id: 0,
            fixed_len: None,
        };
        model.push_unset();
        model
    }

    /// Creates a fixed-length model with `len` unset slots; `len` is raised to 1 if needed.
    pub fn fixed(len: usize) -> Self {
        let len = len.max(1);
        let mut model = Self {
            slots: Vec::new(),
            next_id: 0,
            fixed_len: Some(len),
        };
        for _ in 0..len {
            model.push_unset();
        }
        model
    }

    /// Marks leading slots as edited with the given default texts, growing a variadic model
    /// as needed. Extra defaults beyond a fixed length are dropped.
    pub fn prefill(&mut self, values: &[String]) {
        if self.fixed_len.is_none() {
            while self.slots.len() < values.len() {
                self.push_unset();
            }
        }
        for (index, value) in values.iter().enumerate() {
            if let Some(slot) = self.slots.get_mut(index) {
                slot.state = SlotState::Edited(value.clone());
            }
        }
    }

    /// Number of slots; always ≥ 1.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false; the model never drops below one slot.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether the row set is user-mutable.
    pub fn mutable_rows(&self) -> bool {
        self.fixed_len.is_none()
    }

    /// Stable identity of the slot at `index`.
    pub fn slot_id(&self, index: usize) -> Option<SlotId> {
        self.slots.get(index).map(|slot| slot.id)
    }

    /// Edit state of the slot at `index`.
    pub fn state(&self, index: usize) -> Option<&SlotState> {
        self.slots.get(index).map(|slot| &slot.state)
    }

    /// Inserts one unset slot immediately after `index`. Refused for fixed-length models
    /// and out-of-bounds indices.
    pub fn insert_after(&mut self, index: usize) -> bool {
        if self.fixed_len.is_some() || index >= self.slots.len() {
            return false;
        }
        let id = self.allocate_id();
        self.slots.insert(
            index + 1,
            Slot {
                id,
                state: SlotState::Unset,
            },
        );
        true
    }

    /// Removes the slot at `index`. Refused for fixed-length models, out-of-bounds indices,
    /// and whenever removal would drop the model below one slot.
    pub fn remove_at(&mut self, index: usize) -> bool {
        if self.fixed_len.is_some() || index >= self.slots.len() || self.slots.len() <= 1 {
            return false;
        }
        self.slots.remove(index);
        true
    }

    /// Inserts one unset slot after every selected row. Indices are processed from the
    /// highest down so earlier insertions do not shift later targets.
    pub fn insert_after_each(&mut self, selection: &[usize]) {
        let mut selection = selection.to_vec();
        selection.sort_unstable();
        selection.dedup();
        for index in selection.into_iter().rev() {
            let _ = self.insert_after(index);
        }
    }

    /// Removes every selected row, stopping once only one slot remains.
    pub fn remove_each(&mut self, selection: &[usize]) {
        let mut selection = selection.to_vec();
        selection.sort_unstable();
        selection.dedup();
        for index in selection.into_iter().rev() {
            let _ = self.remove_at(index);
        }
    }

    /// Commits text to the slot at `index`, flipping it to the edited state.
    pub fn commit_text(&mut self, index: usize, text: &str) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                slot.state = SlotState::Edited(text.to_string());
                true
            }
            None => false,
        }
    }

    /// Explicitly returns the slot at `index` to the unset state.
    pub fn reset_slot(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                slot.state = SlotState::Unset;
                true
            }
            None => false,
        }
    }

    /// Current texts in model order, one entry per slot, empty string for unset slots.
    pub fn read_all(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|slot| slot.state.text().to_string())
            .collect()
    }

    fn allocate_id(&mut self) -> SlotId {
        self.next_id = self.next_id.saturating_add(1);
        SlotId(self.next_id)
    }

    fn push_unset(&mut self) {
        let id = self.allocate_id();
        self.slots.push(Slot {
            id,
            state: SlotState::Unset,
        });
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn committed(model: &mut ValueListModel, texts: &[&str]) {
        for (index, text) in texts.iter().enumerate() {
            assert!(model.commit_text(index, text));
        }
    }

    #[test]
    fn variadic_model_starts_with_one_unset_slot() {
        let model = ValueListModel::variadic();
        assert_eq!(model.len(), 1);
        assert!(model.state(0).expect("slot").is_unset());
    }

    #[test]
    fn removal_never_drops_below_one_slot() {
        let mut model = ValueListModel::variadic();
        assert!(model.insert_after(0));
        assert!(model.insert_after(0));
        assert_eq!(model.len(), 3);

        for _ in 0..10 {
            let _ = model.remove_at(0);
        }
        assert_eq!(model.len(), 1);

        model.remove_each(&[0, 0, 0]);
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn insert_after_selected_row_lands_between_rows() {
        let mut model = ValueListModel::variadic();
        assert!(model.insert_after(0));
        assert!(model.insert_after(1));
        committed(&mut model, &["A", "B", "C"]);

        model.insert_after_each(&[0]);

        assert_eq!(model.read_all(), vec!["A", "", "B", "C"]);
        assert!(model.state(1).expect("slot").is_unset());
    }

    #[test]
    fn selection_insert_handles_multiple_rows_without_shifting() {
        let mut model = ValueListModel::variadic();
        assert!(model.insert_after(0));
        assert!(model.insert_after(1));
        committed(&mut model, &["A", "B", "C"]);

        model.insert_after_each(&[0, 2]);

        assert_eq!(model.read_all(), vec!["A", "", "B", "C", ""]);
    }

    #[test]
    fn slot_identities_survive_surrounding_mutation() {
        let mut model = ValueListModel::variadic();
        assert!(model.insert_after(0));
        committed(&mut model, &["A", "B"]);
        let b_id = model.slot_id(1).expect("slot id");

        model.insert_after_each(&[0]);
        assert_eq!(model.slot_id(2), Some(b_id));

        assert!(model.remove_at(1));
        assert_eq!(model.slot_id(1), Some(b_id));
    }

    #[test]
    fn fixed_models_refuse_row_mutation() {
        let mut model = ValueListModel::fixed(3);
        assert_eq!(model.len(), 3);
        assert!(!model.insert_after(0));
        assert!(!model.remove_at(0));
        model.remove_each(&[0, 1, 2]);
        assert_eq!(model.len(), 3);
        assert!(!model.mutable_rows());
    }

    #[test]
    fn edited_then_cleared_slot_stays_edited() {
        let mut model = ValueListModel::variadic();
        assert!(model.commit_text(0, "draft"));
        assert!(model.commit_text(0, ""));
        assert!(!model.state(0).expect("slot").is_unset());
        assert_eq!(model.read_all(), vec![""]);

        assert!(model.reset_slot(0));
        assert!(model.state(0).expect("slot").is_unset());
    }

    #[test]
    fn prefill_marks_leading_slots_edited() {
        let mut model = ValueListModel::variadic();
        model.prefill(&["x".to_string(), "y".to_string()]);
        assert_eq!(model.len(), 2);
        assert_eq!(model.read_all(), vec!["x", "y"]);
        assert!(!model.state(1).expect("slot").is_unset());

        let mut fixed = ValueListModel::fixed(2);
        fixed.prefill(&["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(fixed.read_all(), vec!["a", "b"]);
    }

    #[test]
    fn out_of_bounds_mutations_are_refused() {
        let mut model = ValueListModel::variadic();
        assert!(!model.insert_after(5));
        assert!(!model.commit_text(5, "x"));
        assert!(!model.reset_slot(5));
        assert_eq!(model.len(), 1);
    }
}
