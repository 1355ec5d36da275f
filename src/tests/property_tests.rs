//! Property-based tests using proptest.
//!
//! These tests verify store invariants that must hold for *any* sequence of
//! edits, and envelope preview bounds for any text.

use std::collections::HashSet;

use proptest::prelude::*;

use crate::core::block::BlockType;
use crate::core::envelope::truncate;
use crate::core::store::BlockStore;
use crate::core::BlockId;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Edit {
    Add(usize),
    /// Remove the block at `index % len`
    Remove(usize),
    /// Move the block at `from % len` to `to`
    Move(usize, usize),
    /// Remove an id that was never added
    RemoveUnknown,
    Clear,
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        6 => (0..BlockType::ALL.len()).prop_map(Edit::Add),
        3 => any::<usize>().prop_map(Edit::Remove),
        2 => (any::<usize>(), 0..12usize).prop_map(|(from, to)| Edit::Move(from, to)),
        1 => Just(Edit::RemoveUnknown),
        1 => Just(Edit::Clear),
    ]
}

/// Apply an edit to the store and to a plain model of expected ids.
fn apply(store: &mut BlockStore, model: &mut Vec<BlockId>, edit: &Edit) {
    match edit {
        Edit::Add(type_index) => {
            let name = BlockType::ALL[*type_index].as_str();
            model.push(store.add_block(name).unwrap());
        }
        Edit::Remove(index) if !model.is_empty() => {
            let id = model.remove(index % model.len());
            store.remove_block(id).unwrap();
        }
        Edit::Move(from, to) if !model.is_empty() => {
            let id = model.remove(from % model.len());
            model.insert((*to).min(model.len()), id);
            store.move_block(id, *to).unwrap();
        }
        Edit::RemoveUnknown => {
            assert!(store.remove_block(BlockId::new()).is_err());
        }
        Edit::Clear => {
            store.clear();
            model.clear();
        }
        Edit::Remove(_) | Edit::Move(..) => {}
    }
}

// ---------------------------------------------------------------------------
// Store Properties
// ---------------------------------------------------------------------------

proptest! {
    /// Ids stay unique and the order always matches the model.
    #[test]
    fn store_ids_unique_and_ordered(edits in prop::collection::vec(edit_strategy(), 0..60)) {
        let mut store = BlockStore::new();
        let mut model = Vec::new();

        for edit in &edits {
            apply(&mut store, &mut model, edit);

            let ids: Vec<BlockId> = store.iter().map(|b| b.id).collect();
            let unique: HashSet<BlockId> = ids.iter().copied().collect();
            prop_assert_eq!(unique.len(), ids.len());
            prop_assert_eq!(&ids, &model);

            for (index, id) in ids.iter().enumerate() {
                prop_assert_eq!(store.position(*id), Some(index));
            }
        }
    }

    /// Clearing always leaves an empty store.
    #[test]
    fn store_clear_always_empties(edits in prop::collection::vec(edit_strategy(), 0..30)) {
        let mut store = BlockStore::new();
        let mut model = Vec::new();
        for edit in &edits {
            apply(&mut store, &mut model, edit);
        }

        store.clear();
        prop_assert!(store.is_empty());
        prop_assert_eq!(store.len(), 0);
    }
}

// ---------------------------------------------------------------------------
// Preview Properties
// ---------------------------------------------------------------------------

proptest! {
    /// Previews never exceed the limit plus the ellipsis and keep a prefix.
    #[test]
    fn truncate_is_bounded_prefix(text in ".{0,120}", max in 0..80usize) {
        let preview = truncate(&text, max);
        let chars = text.chars().count();

        if chars <= max {
            prop_assert_eq!(&preview, &text);
        } else {
            prop_assert!(preview.ends_with("..."));
            prop_assert_eq!(preview.chars().count(), max + 3);
            let kept: String = text.chars().take(max).collect();
            prop_assert!(preview.starts_with(&kept));
        }
    }
}
