use std::{collections::HashMap, hash::Hash};

use itertools::Itertools;
use tracing::debug;

use crate::{
    error::{MineError, Result},
    itemsets::count::{count_item_ids, generate_frequent_1_itemset_counts},
    types::{ItemId, Pattern, PatternCounts, SupportCount, Transaction},
};

type Itemset = Vec<ItemId>;
type ItemsetCounts = HashMap<Itemset, SupportCount>;

/// A pending level of the prefix search: the conditional transactions of
/// `prefix` and the exclusive upper bound of the ids they can contain.
struct Frame {
    transactions: Vec<Transaction>,
    prefix: Itemset,
    bound: ItemId,
}

/// Mine every frequent itemset of `transactions`.
///
/// Items are first filtered by global support and each transaction is
/// sorted by item order. Each frequent item then extends the current prefix
/// and the search continues in its conditional base: the part of every
/// transaction that comes before the item. Patterns are keyed in the order
/// they were grown, so the last item of a key is the smallest one.
///
/// Counts are occurrences: an item repeated inside one transaction counts
/// each time, while its conditional base still starts at the first
/// occurrence.
pub fn mine<I>(transactions: &[Vec<I>], min_support: SupportCount) -> Result<PatternCounts<I>>
where
    I: Ord + Hash + Clone,
{
    if min_support == 0 {
        return Err(MineError::InvalidMinSupport(
            "count must be at least 1".to_string(),
        ));
    }

    let (item_counts, inventory, transactions) =
        generate_frequent_1_itemset_counts(transactions, min_support);
    debug!(
        "{} frequent items in {} transactions after global filter",
        item_counts.len(),
        transactions.len()
    );

    if inventory.is_empty() {
        return Ok(HashMap::new());
    }

    let itemset_counts = grow_itemsets(transactions, inventory.len(), min_support);

    Ok(itemset_counts
        .into_iter()
        .map(|(itemset, count)| {
            let pattern = itemset.iter().map(|&id| inventory[id].clone()).collect();
            (pattern, count)
        })
        .collect())
}

/// Patterns by decreasing count, then shorter first, then by their items.
pub fn rank_patterns<I: Ord>(patterns: PatternCounts<I>) -> Vec<(Pattern<I>, SupportCount)> {
    patterns
        .into_iter()
        .sorted_by(|(a, a_count), (b, b_count)| {
            b_count
                .cmp(a_count)
                .then_with(|| a.len().cmp(&b.len()))
                .then_with(|| a.cmp(b))
        })
        .collect()
}

/// Prefix search over id transactions, driven by an explicit frontier
/// instead of recursion.
fn grow_itemsets(
    transactions: Vec<Transaction>,
    num_items: usize,
    min_support_count: SupportCount,
) -> ItemsetCounts {
    let mut itemset_counts = ItemsetCounts::new();
    let mut frontier = vec![Frame {
        transactions,
        prefix: vec![],
        bound: num_items,
    }];

    while let Some(frame) = frontier.pop() {
        let counts = count_item_ids(&frame.transactions, frame.bound);

        for (item_id, &count) in counts.iter().enumerate() {
            if count < min_support_count {
                continue;
            }

            let mut itemset = Vec::with_capacity(frame.prefix.len() + 1);
            itemset.extend_from_slice(&frame.prefix);
            itemset.push(item_id);
            itemset_counts.insert(itemset.clone(), count);

            let conditional = conditional_base(&frame.transactions, item_id);
            if !conditional.is_empty() {
                frontier.push(Frame {
                    transactions: conditional,
                    prefix: itemset,
                    bound: item_id,
                });
            }
        }
    }

    debug!("grew {} frequent itemsets", itemset_counts.len());
    itemset_counts
}

/// Items before the first occurrence of `item_id` in each transaction that
/// contains it. Empty prefixes carry no items and are skipped.
fn conditional_base(transactions: &[Transaction], item_id: ItemId) -> Vec<Transaction> {
    transactions
        .iter()
        .filter_map(|transaction| {
            let first = transaction.partition_point(|&id| id < item_id);
            match transaction.get(first) {
                Some(&id) if id == item_id && first > 0 => Some(transaction[..first].to_vec()),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;
    use pretty_assertions::assert_eq;

    fn pattern(items: &[&'static str]) -> Vec<&'static str> {
        items.to_vec()
    }

    fn worked_example() -> Vec<Vec<&'static str>> {
        vec![
            vec!["a", "b", "c"],
            vec!["a", "b"],
            vec!["a", "c"],
            vec!["b", "c"],
        ]
    }

    #[test]
    fn empty_input_mines_nothing() {
        let transactions: Vec<Vec<&str>> = vec![];
        assert!(mine(&transactions, 1).unwrap().is_empty());
    }

    #[test]
    fn single_transaction_cannot_reach_support_2() {
        let transactions = vec![vec!["a"]];
        assert!(mine(&transactions, 2).unwrap().is_empty());
    }

    #[test]
    fn zero_support_is_rejected() {
        let result = mine(&worked_example(), 0);
        assert!(matches!(result, Err(MineError::InvalidMinSupport(_))));
    }

    #[test]
    fn worked_example_pairs() {
        let patterns = mine(&worked_example(), 2).unwrap();

        let expected = hashmap! {
            pattern(&["a"]) => 3,
            pattern(&["b"]) => 3,
            pattern(&["c"]) => 3,
            pattern(&["b", "a"]) => 2,
            pattern(&["c", "a"]) => 2,
            pattern(&["c", "b"]) => 2,
        };
        assert_eq!(patterns, expected);
    }

    #[test]
    fn three_itemset_found_through_nested_bases() {
        let transactions = vec![
            vec!["c", "b", "a"],
            vec!["a", "b", "c"],
            vec!["a", "b"],
            vec!["c"],
        ];
        let patterns = mine(&transactions, 2).unwrap();

        let expected = hashmap! {
            pattern(&["a"]) => 3,
            pattern(&["b"]) => 3,
            pattern(&["c"]) => 3,
            pattern(&["b", "a"]) => 3,
            pattern(&["c", "a"]) => 2,
            pattern(&["c", "b"]) => 2,
            pattern(&["c", "b", "a"]) => 2,
        };
        assert_eq!(patterns, expected);
    }

    #[test]
    fn infrequent_items_never_appear() {
        let transactions = vec![vec!["a", "x"], vec!["a", "y"], vec!["a", "z"]];
        let patterns = mine(&transactions, 2).unwrap();

        assert_eq!(patterns, hashmap! { pattern(&["a"]) => 3 });
    }

    #[test]
    fn repeated_items_count_every_occurrence() {
        let transactions = vec![vec!["a", "a", "b"], vec!["a", "b"]];
        let patterns = mine(&transactions, 2).unwrap();

        let expected = hashmap! {
            pattern(&["a"]) => 3,
            pattern(&["b"]) => 2,
            pattern(&["b", "a"]) => 3,
        };
        assert_eq!(patterns, expected);
    }

    #[test]
    fn repeats_in_one_transaction_reach_min_support() {
        let transactions = vec![vec!["a", "a"]];
        let patterns = mine(&transactions, 2).unwrap();

        assert_eq!(patterns, hashmap! { pattern(&["a"]) => 2 });
    }

    #[test]
    fn integer_items() {
        let transactions = vec![vec![10, 11], vec![10, 12], vec![10, 11, 12], vec![11, 13]];
        let patterns = mine(&transactions, 2).unwrap();

        let expected = hashmap! {
            vec![10] => 3,
            vec![11] => 3,
            vec![12] => 2,
            vec![11, 10] => 2,
            vec![12, 10] => 2,
        };
        assert_eq!(patterns, expected);
    }

    #[test]
    fn input_is_left_untouched() {
        let transactions = vec![vec!["c", "a"], vec!["b", "a", "x"]];
        let before = transactions.clone();
        mine(&transactions, 1).unwrap();

        assert_eq!(transactions, before);
    }

    #[test]
    fn mining_is_idempotent() {
        let transactions = market_baskets();
        assert_eq!(mine(&transactions, 2).unwrap(), mine(&transactions, 2).unwrap());
    }

    #[test]
    fn lower_threshold_returns_superset() {
        let transactions = market_baskets();
        let loose = mine(&transactions, 2).unwrap();
        let strict = mine(&transactions, 3).unwrap();

        assert!(strict.len() <= loose.len());
        for (pattern, count) in &strict {
            assert_eq!(loose.get(pattern), Some(count), "{:?}", pattern);
        }
    }

    #[test]
    fn every_prefix_is_frequent() {
        let patterns = mine(&market_baskets(), 2).unwrap();

        for pattern in patterns.keys().filter(|pattern| pattern.len() > 1) {
            let prefix = pattern[..pattern.len() - 1].to_vec();
            assert!(patterns.contains_key(&prefix), "{:?}", pattern);
        }
    }

    #[test]
    fn no_itemset_is_keyed_twice() {
        let patterns = mine(&market_baskets(), 1).unwrap();
        let distinct = patterns
            .keys()
            .map(|pattern| pattern.iter().sorted().collect::<Vec<_>>())
            .unique()
            .count();

        assert_eq!(distinct, patterns.len());
    }

    #[test]
    fn counts_match_full_containment_without_repeats() {
        let transactions = market_baskets();
        let patterns = mine(&transactions, 2).unwrap();

        for (pattern, &count) in &patterns {
            let contained = transactions
                .iter()
                .filter(|transaction| pattern.iter().all(|item| transaction.contains(item)))
                .count();
            assert_eq!(count, contained, "{:?}", pattern);
        }
    }

    #[test]
    fn support_everything_at_one() {
        let transactions = vec![vec!["a", "b", "c"]];
        let patterns = mine(&transactions, 1).unwrap();

        // every non-empty subset of {a, b, c}
        assert_eq!(patterns.len(), 7);
        assert_eq!(patterns[&pattern(&["c", "b", "a"])], 1);
    }

    #[test]
    fn long_shared_transaction_is_fully_enumerated() {
        let transaction: Vec<usize> = (0..16).collect();
        let transactions = vec![transaction.clone(), transaction];
        let patterns = mine(&transactions, 2).unwrap();

        assert_eq!(patterns.len(), (1 << 16) - 1);
        let longest: Vec<usize> = (0..16).rev().collect();
        assert_eq!(patterns[&longest], 2);
    }

    #[test]
    fn conditional_base_takes_items_before_first_occurrence() {
        let transactions = vec![vec![0, 1, 2], vec![0, 2, 2], vec![1], vec![2]];
        assert_eq!(conditional_base(&transactions, 2), vec![vec![0, 1], vec![0]]);
        assert_eq!(conditional_base(&transactions, 1), vec![vec![0]]);
        assert!(conditional_base(&transactions, 0).is_empty());
    }

    fn market_baskets() -> Vec<Vec<&'static str>> {
        vec![
            vec!["bread", "milk"],
            vec!["bread", "diapers", "beer", "eggs"],
            vec!["milk", "diapers", "beer", "cola"],
            vec!["bread", "milk", "diapers", "beer"],
            vec!["bread", "milk", "diapers", "cola"],
            vec!["milk", "yogurt"],
        ]
    }

    #[test]
    fn rank_by_count_then_length_then_items() {
        let patterns = hashmap! {
            pattern(&["b"]) => 3,
            pattern(&["c", "a"]) => 3,
            pattern(&["a"]) => 3,
            pattern(&["c"]) => 5,
            pattern(&["c", "b", "a"]) => 1,
            pattern(&["b", "a"]) => 3,
        };

        assert_eq!(
            rank_patterns(patterns),
            vec![
                (pattern(&["c"]), 5),
                (pattern(&["a"]), 3),
                (pattern(&["b"]), 3),
                (pattern(&["b", "a"]), 3),
                (pattern(&["c", "a"]), 3),
                (pattern(&["c", "b", "a"]), 1),
            ]
        );
    }

    #[test]
    fn rank_nothing() {
        assert!(rank_patterns(PatternCounts::<&str>::new()).is_empty());
    }
}
