use pyo3::exceptions::{PyOSError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyTuple};

use crate::database::TransactionalDatabase;
use crate::error::MineError;
use crate::itemsets::mine;
use crate::types::{ItemName, RawTransaction};

impl From<MineError> for PyErr {
    fn from(err: MineError) -> PyErr {
        match err {
            MineError::Io { .. } => PyOSError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Frequent itemsets of `transactions` as `{tuple: count}`.
#[pyfunction]
#[pyo3(name = "mine", text_signature = "(transactions, min_support)")]
fn mine_py<'py>(
    py: Python<'py>,
    transactions: Vec<RawTransaction>,
    min_support: usize,
) -> PyResult<Bound<'py, PyDict>> {
    let patterns = py.allow_threads(|| mine(&transactions, min_support))?;

    let dict = PyDict::new_bound(py);
    for (pattern, count) in patterns {
        dict.set_item(PyTuple::new_bound(py, pattern), count)?;
    }
    Ok(dict)
}

/// Number of transactions containing every item of `pattern`.
#[pyfunction]
#[pyo3(name = "support", text_signature = "(transactions, pattern)")]
fn support_py(transactions: Vec<RawTransaction>, pattern: Vec<ItemName>) -> usize {
    TransactionalDatabase::from_transactions(transactions).support(&pattern)
}

#[pyfunction]
#[pyo3(name = "load_transactions", text_signature = "(path)")]
fn load_transactions_py(path: &str) -> PyResult<Vec<RawTransaction>> {
    let database = TransactionalDatabase::from_path(path)?;
    Ok(database.transactions().to_vec())
}

#[pymodule]
fn txmine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(mine_py, m)?)?;
    m.add_function(wrap_pyfunction!(support_py, m)?)?;
    m.add_function(wrap_pyfunction!(load_transactions_py, m)?)?;
    Ok(())
}
