//! Natural-key reconciliation of a recipe's child collections.
//!
//! An update payload carries the complete desired state of a child collection
//! (ingredients, instructions or nutrition facts) as plain drafts. Rather than
//! dropping every row and re-inserting the payload, the planner matches
//! incoming drafts to persisted rows by natural key so that rows describing
//! the same item keep their ID:
//!
//! 1. Persisted rows are indexed by natural key.
//! 2. Incoming drafts are walked in payload order. A draft whose key matches
//!    an unclaimed row claims it, becoming an update (or `unchanged` when the
//!    content is identical). Any other draft becomes an insert.
//! 3. Rows left unclaimed are deleted.
//!
//! Only the first draft with a given key can claim a row. Later drafts with
//! the same key are planned as inserts; the store's uniqueness index on the
//! natural key then rejects them, so a payload with duplicate keys fails as a
//! whole instead of silently picking a winner.
//!
//! The planner is pure. Applying a plan, and deciding whether a collection
//! is touched at all (an omitted payload field means "leave it alone"), is
//! the caller's job.

use std::collections::HashMap;
use std::hash::Hash;

/// A record that can be identified across payloads by one of its fields.
pub trait NaturalKey {
    /// Type of the identifying field.
    type Key: Eq + Hash;

    /// Extract the natural key.
    fn natural_key(&self) -> Self::Key;
}

/// The writes needed to turn a persisted collection into an incoming one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan<Id, T> {
    /// Persisted rows with no counterpart in the payload.
    pub deletes: Vec<Id>,
    /// Claimed rows whose mutable fields change, with their new content.
    pub updates: Vec<(Id, T)>,
    /// Claimed rows whose content already matches the payload.
    pub unchanged: Vec<Id>,
    /// Payload items with no persisted row to claim, in payload order.
    pub inserts: Vec<T>,
}

impl<Id, T> ReconcilePlan<Id, T> {
    /// Returns `true` if applying the plan would write nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.deletes.is_empty() && self.updates.is_empty() && self.inserts.is_empty()
    }
}

impl<Id, T> Default for ReconcilePlan<Id, T> {
    fn default() -> Self {
        Self {
            deletes: Vec::new(),
            updates: Vec::new(),
            unchanged: Vec::new(),
            inserts: Vec::new(),
        }
    }
}

/// Plan the reconciliation of `existing` rows against an `incoming` payload.
///
/// `existing` pairs each persisted row's ID with its current content; the
/// order of `deletes` follows it. An empty `incoming` list deletes every row.
///
/// Persisted rows should already have unique keys. If they don't, the first
/// row per key is eligible for claiming and the rest are deleted.
#[must_use]
pub fn plan_reconciliation<Id, T>(existing: Vec<(Id, T)>, incoming: Vec<T>) -> ReconcilePlan<Id, T>
where
    T: NaturalKey + PartialEq,
{
    let mut plan = ReconcilePlan::default();

    // Slots keep persisted order so leftover rows are deleted deterministically.
    let mut slots: Vec<Option<(Id, T)>> = Vec::with_capacity(existing.len());
    let mut by_key: HashMap<T::Key, usize> = HashMap::with_capacity(existing.len());

    for (id, row) in existing {
        let key = row.natural_key();
        if by_key.contains_key(&key) {
            plan.deletes.push(id);
        } else {
            by_key.insert(key, slots.len());
            slots.push(Some((id, row)));
        }
    }

    for item in incoming {
        let claimed = by_key
            .remove(&item.natural_key())
            .and_then(|slot| slots.get_mut(slot).and_then(Option::take));

        match claimed {
            Some((id, current)) if current == item => plan.unchanged.push(id),
            Some((id, _)) => plan.updates.push((id, item)),
            None => plan.inserts.push(item),
        }
    }

    plan.deletes.extend(slots.into_iter().flatten().map(|(id, _)| id));

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IngredientDraft, InstructionDraft};

    fn ingredient(name: &str, quantity: &str) -> IngredientDraft {
        IngredientDraft {
            name: name.to_owned(),
            quantity: quantity.to_owned(),
        }
    }

    fn step(step_number: i32, description: &str) -> InstructionDraft {
        InstructionDraft {
            step_number,
            description: description.to_owned(),
        }
    }

    #[test]
    fn test_matching_key_updates_in_place_and_new_key_inserts() {
        let existing = vec![("salt-id", ingredient("salt", "1 tsp"))];
        let incoming = vec![ingredient("salt", "2 tsp"), ingredient("pepper", "1 tsp")];

        let plan = plan_reconciliation(existing, incoming);

        assert_eq!(plan.updates, vec![("salt-id", ingredient("salt", "2 tsp"))]);
        assert_eq!(plan.inserts, vec![ingredient("pepper", "1 tsp")]);
        assert!(plan.deletes.is_empty());
        assert!(plan.unchanged.is_empty());
    }

    #[test]
    fn test_unclaimed_rows_are_deleted() {
        let existing = vec![(1, step(1, "Boil")), (2, step(2, "Drain"))];
        let incoming = vec![step(1, "Boil")];

        let plan = plan_reconciliation(existing, incoming);

        assert_eq!(plan.unchanged, vec![1]);
        assert_eq!(plan.deletes, vec![2]);
        assert!(plan.updates.is_empty());
        assert!(plan.inserts.is_empty());
    }

    #[test]
    fn test_empty_payload_deletes_everything() {
        let existing = vec![
            ("a", ingredient("salt", "1 tsp")),
            ("b", ingredient("rice", "1 cup")),
        ];

        let plan = plan_reconciliation(existing, Vec::new());

        assert_eq!(plan.deletes, vec!["a", "b"]);
        assert!(plan.updates.is_empty());
        assert!(plan.inserts.is_empty());
    }

    #[test]
    fn test_identical_payload_is_a_noop() {
        let existing = vec![
            ("a", ingredient("salt", "1 tsp")),
            ("b", ingredient("rice", "1 cup")),
        ];
        let incoming = vec![ingredient("rice", "1 cup"), ingredient("salt", "1 tsp")];

        let plan = plan_reconciliation(existing, incoming);

        assert!(plan.is_noop());
        assert_eq!(plan.unchanged, vec!["b", "a"]);
    }

    #[test]
    fn test_first_duplicate_claims_and_later_duplicates_insert() {
        let existing = vec![("salt-id", ingredient("salt", "1 tsp"))];
        let incoming = vec![ingredient("salt", "2 tsp"), ingredient("salt", "3 tsp")];

        let plan = plan_reconciliation(existing, incoming);

        assert_eq!(plan.updates, vec![("salt-id", ingredient("salt", "2 tsp"))]);
        assert_eq!(plan.inserts, vec![ingredient("salt", "3 tsp")]);
    }

    #[test]
    fn test_duplicate_persisted_keys_keep_first_row() {
        let existing = vec![
            ("first", ingredient("salt", "1 tsp")),
            ("second", ingredient("salt", "1 pinch")),
        ];
        let incoming = vec![ingredient("salt", "1 tsp")];

        let plan = plan_reconciliation(existing, incoming);

        assert_eq!(plan.unchanged, vec!["first"]);
        assert_eq!(plan.deletes, vec!["second"]);
    }

    #[test]
    fn test_no_existing_rows_inserts_in_payload_order() {
        let incoming = vec![step(2, "Fry"), step(1, "Chop")];

        let plan: ReconcilePlan<u32, _> = plan_reconciliation(Vec::new(), incoming.clone());

        assert_eq!(plan.inserts, incoming);
        assert!(plan.deletes.is_empty());
    }
}
