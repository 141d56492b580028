use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use itertools::Itertools;
use once_cell::sync::OnceCell;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    error::{MineError, Result},
    itemsets::{count::count_items, mine, ItemIndex},
    support::MinSupport,
    types::{ItemCounts, ItemName, Pattern, PatternCounts, RawTransaction, SupportCount},
};

/// Transactions loaded once and queried many times.
#[derive(Debug, Clone, Default)]
pub struct TransactionalDatabase {
    source: Option<PathBuf>,
    transactions: Vec<RawTransaction>,
    item_frequency: ItemCounts,
    // built on the first support query, reset whenever transactions change
    index: OnceCell<ItemIndex>,
}

impl TransactionalDatabase {
    pub fn from_transactions(transactions: Vec<RawTransaction>) -> Self {
        let mut database = TransactionalDatabase {
            transactions,
            ..Default::default()
        };
        database.reindex();
        database
    }

    /// Read one transaction per line; items are separated by any whitespace
    /// and blank lines are skipped.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| MineError::io(Some(path.to_path_buf()), e))?;
        let transactions = read_transactions(BufReader::new(file))
            .map_err(|e| MineError::io(Some(path.to_path_buf()), e))?;

        info!(
            "loaded {} transactions from {}",
            transactions.len(),
            path.display()
        );
        let mut database = Self::from_transactions(transactions);
        database.source = Some(path.to_path_buf());
        Ok(database)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let transactions = read_transactions(reader).map_err(|e| MineError::io(None, e))?;
        Ok(Self::from_transactions(transactions))
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn transactions(&self) -> &[RawTransaction] {
        &self.transactions
    }

    pub fn num_transactions(&self) -> usize {
        self.transactions.len()
    }

    /// Occurrences of each item, repeats inside a transaction included.
    pub fn item_frequency(&self) -> &ItemCounts {
        &self.item_frequency
    }

    pub fn unique_items(&self) -> usize {
        self.item_frequency.len()
    }

    /// The `n` most frequent items, ties broken by label.
    pub fn most_common(&self, n: usize) -> Vec<(ItemName, SupportCount)> {
        self.item_frequency
            .iter()
            .sorted_by(|(a, a_count), (b, b_count)| b_count.cmp(a_count).then_with(|| a.cmp(b)))
            .take(n)
            .map(|(item, &count)| (item.clone(), count))
            .collect()
    }

    pub fn stats(&self, top: usize) -> DatabaseStats {
        DatabaseStats {
            num_transactions: self.num_transactions(),
            unique_items: self.unique_items(),
            top_items: self.most_common(top),
        }
    }

    /// Keep only transactions with `min_length..=max_length` items. Returns
    /// how many were removed.
    pub fn filter_transactions(
        &mut self,
        min_length: usize,
        max_length: Option<usize>,
    ) -> Result<usize> {
        if let Some(max) = max_length {
            if min_length > max {
                return Err(MineError::InvalidLengthBounds {
                    min: min_length,
                    max,
                });
            }
        }

        let before = self.transactions.len();
        self.transactions.retain(|transaction| {
            transaction.len() >= min_length && max_length.map_or(true, |max| transaction.len() <= max)
        });
        let removed = before - self.transactions.len();

        if removed > 0 {
            debug!("length filter removed {} of {} transactions", removed, before);
            self.reindex();
        }
        Ok(removed)
    }

    /// Number of transactions containing every item of `pattern`, in any
    /// order.
    pub fn support<S: AsRef<str>>(&self, pattern: &[S]) -> SupportCount {
        self.index().support(pattern)
    }

    /// `support` for many patterns at once, in input order.
    pub fn supports(&self, patterns: &[Pattern<ItemName>]) -> Vec<SupportCount> {
        let index = self.index();
        patterns
            .par_iter()
            .map(|pattern| index.support(pattern))
            .collect()
    }

    pub fn find_frequent_patterns<S: Into<MinSupport>>(
        &self,
        min_support: S,
    ) -> Result<PatternCounts<ItemName>> {
        let min_support_count = min_support.into().resolve(self.num_transactions())?;
        if self.transactions.is_empty() {
            warn!("mining an empty database");
        }

        let patterns = mine(&self.transactions, min_support_count)?;
        info!(
            "mined {} frequent patterns at min support {}",
            patterns.len(),
            min_support_count
        );
        Ok(patterns)
    }

    fn reindex(&mut self) {
        self.item_frequency = count_items(&self.transactions)
            .into_iter()
            .map(|(item, count)| (item.clone(), count))
            .collect();
        self.index = OnceCell::new();
    }

    fn index(&self) -> &ItemIndex {
        self.index.get_or_init(|| {
            debug!("indexing {} transactions", self.transactions.len());
            ItemIndex::build(&self.transactions)
        })
    }
}

fn read_transactions<R: BufRead>(reader: R) -> std::io::Result<Vec<RawTransaction>> {
    let mut transactions = Vec::new();
    for line in reader.lines() {
        let transaction: RawTransaction = line?.split_whitespace().map(String::from).collect();
        if !transaction.is_empty() {
            transactions.push(transaction);
        }
    }
    Ok(transactions)
}

/// Summary of a database, rendered as a banner by `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    pub num_transactions: usize,
    pub unique_items: usize,
    pub top_items: Vec<(ItemName, SupportCount)>,
}

const RULE: &str = "=======================================";

impl fmt::Display for DatabaseStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "Total transactions: {}", self.num_transactions)?;
        writeln!(f, "Unique items: {}", self.unique_items)?;
        writeln!(f, "Top {} frequent items:", self.top_items.len())?;
        for (item, count) in &self.top_items {
            writeln!(f, "  {}: {}", item, count)?;
        }
        write!(f, "{}", RULE)
    }
}
