use std::{collections::HashMap, hash::Hash};

use itertools::Itertools;

use crate::types::{Inventory, ItemId, ReverseLookup, SupportCount, Transaction};

/// Occurrences of each item across `transactions`. An item repeated inside
/// one transaction counts every time it appears.
pub fn count_items<I: Eq + Hash>(transactions: &[Vec<I>]) -> HashMap<&I, SupportCount> {
    let mut item_counts = HashMap::new();

    for transaction in transactions {
        for item in transaction {
            *item_counts.entry(item).or_insert(0) += 1;
        }
    }

    item_counts
}

/// Global filtering pass.
///
/// Keeps the items occurring at least `min_support_count` times, interns
/// them into ids assigned in item order and rewrites every transaction as
/// its sorted surviving ids. Transactions left empty are
/// dropped. Returns the per-id counts, the id -> item inventory and the
/// rewritten transactions.
pub fn generate_frequent_1_itemset_counts<I: Ord + Hash + Clone>(
    raw_transactions: &[Vec<I>],
    min_support_count: SupportCount,
) -> (Vec<SupportCount>, Inventory<I>, Vec<Transaction>) {
    let mut item_counts = count_items(raw_transactions);

    // Prune
    item_counts.retain(|_, &mut support_count| support_count >= min_support_count);

    let inventory: Inventory<I> = item_counts.keys().sorted().map(|&item| item.clone()).collect();
    let reverse_lookup: ReverseLookup<I> = inventory
        .iter()
        .enumerate()
        .map(|(item_id, item)| (item, item_id))
        .collect();
    let counts = inventory.iter().map(|item| item_counts[item]).collect();

    let transactions = raw_transactions
        .iter()
        .filter_map(|raw_transaction| {
            let mut items: Transaction = raw_transaction
                .iter()
                .filter_map(|item| reverse_lookup.get(item).copied())
                .collect();
            if items.is_empty() {
                return None;
            }
            items.sort_unstable();
            Some(items)
        })
        .collect();

    (counts, inventory, transactions)
}

/// Per-id occurrence counts over a subset whose ids are all below `bound`.
pub fn count_item_ids(transactions: &[Transaction], bound: ItemId) -> Vec<SupportCount> {
    let mut counts = vec![0; bound];

    for transaction in transactions {
        for &item_id in transaction {
            counts[item_id] += 1;
        }
    }

    counts
}
