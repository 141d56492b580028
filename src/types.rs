use std::collections::HashMap;

pub type ItemId = usize;
pub type ItemName = String;

/// One line of the input: the items in the order they were read.
pub type RawTransaction = Vec<ItemName>;
/// A transaction after global filtering, as sorted item ids.
pub type Transaction = Vec<ItemId>;

/// Item ids ordered the same way as the labels they stand for.
pub type Inventory<I> = Vec<I>;
pub type ReverseLookup<'l, I> = HashMap<&'l I, ItemId>;

pub type Pattern<I> = Vec<I>;
pub type PatternCounts<I> = HashMap<Pattern<I>, usize>;

pub type ItemCounts = HashMap<ItemName, usize>;
pub type SupportCount = usize;
