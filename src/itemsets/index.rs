use std::collections::HashMap;

use bitvec::prelude::*;

use crate::types::{ItemName, RawTransaction, SupportCount};

type TransactionId = usize;

/// Transactions containing one item.
///
/// A sorted id list costs one word per hit and a bitmap one bit per
/// transaction, so a column switches to a bitmap once the item is in at
/// least one transaction out of `usize::BITS`. Either way a column never
/// costs more than its id list, keeping the index linear in the input.
#[derive(Debug, Clone)]
enum Column {
    Sparse(Vec<TransactionId>),
    Dense {
        bits: BitVec<usize, Lsb0>,
        hits: usize,
    },
}

impl Column {
    fn from_hits(hits: Vec<TransactionId>, num_transactions: usize) -> Self {
        if hits.len() * (usize::BITS as usize) < num_transactions {
            return Column::Sparse(hits);
        }

        let mut bits = bitvec![usize, Lsb0; 0; num_transactions];
        for &transaction_id in &hits {
            bits.set(transaction_id, true);
        }
        Column::Dense {
            bits,
            hits: hits.len(),
        }
    }

    fn len(&self) -> usize {
        match self {
            Column::Sparse(hits) => hits.len(),
            Column::Dense { hits, .. } => *hits,
        }
    }

    fn contains(&self, transaction_id: TransactionId) -> bool {
        match self {
            Column::Sparse(hits) => hits.binary_search(&transaction_id).is_ok(),
            Column::Dense { bits, .. } => bits[transaction_id],
        }
    }
}

/// Vertical layout of a transaction list: for every item, the transactions
/// that contain it.
#[derive(Debug, Clone, Default)]
pub struct ItemIndex {
    num_transactions: usize,
    columns: HashMap<ItemName, Column>,
}

impl ItemIndex {
    pub fn build(transactions: &[RawTransaction]) -> Self {
        let num_transactions = transactions.len();
        let mut hits: HashMap<&ItemName, Vec<TransactionId>> = HashMap::new();

        for (transaction_id, transaction) in transactions.iter().enumerate() {
            for item in transaction {
                let item_hits = hits.entry(item).or_default();
                // repeats inside a transaction are one hit
                if item_hits.last() != Some(&transaction_id) {
                    item_hits.push(transaction_id);
                }
            }
        }

        let columns = hits
            .into_iter()
            .map(|(item, item_hits)| (item.clone(), Column::from_hits(item_hits, num_transactions)))
            .collect();

        ItemIndex {
            num_transactions,
            columns,
        }
    }

    /// Number of transactions containing every item of `pattern`.
    pub fn support<S: AsRef<str>>(&self, pattern: &[S]) -> SupportCount {
        if pattern.is_empty() {
            return self.num_transactions;
        }

        let mut columns = Vec::with_capacity(pattern.len());
        for item in pattern {
            match self.columns.get(item.as_ref()) {
                Some(column) => columns.push(column),
                None => return 0,
            }
        }
        columns.sort_by_key(|column| column.len());

        match columns.split_first() {
            Some((Column::Dense { bits, .. }, rest)) => {
                // every column is dense: the narrowest one drives the AND
                let mut hits = bits.clone();
                for column in rest {
                    if let Column::Dense { bits, .. } = column {
                        hits &= bits.as_bitslice();
                    }
                }
                hits.count_ones()
            }
            Some((Column::Sparse(candidates), rest)) => candidates
                .iter()
                .filter(|&&transaction_id| rest.iter().all(|column| column.contains(transaction_id)))
                .count(),
            None => self.num_transactions,
        }
    }

    #[cfg(test)]
    fn is_dense(&self, item: &str) -> bool {
        matches!(self.columns.get(item), Some(Column::Dense { .. }))
    }
}
