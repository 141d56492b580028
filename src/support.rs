use std::{fmt, str::FromStr};

use crate::error::{MineError, Result};
use crate::types::SupportCount;

/// Minimum support, either as a transaction count or as a fraction of the
/// database.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MinSupport {
    Count(usize),
    Ratio(f64),
}

impl MinSupport {
    /// Resolve to an absolute count against a database of `num_transactions`.
    ///
    /// Ratios round up, and never resolve below 1 so an empty database still
    /// mines nothing instead of everything.
    pub fn resolve(self, num_transactions: usize) -> Result<SupportCount> {
        match self {
            MinSupport::Count(0) => Err(MineError::InvalidMinSupport(
                "count must be at least 1".to_string(),
            )),
            MinSupport::Count(count) => Ok(count),
            MinSupport::Ratio(ratio) if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 => Err(
                MineError::InvalidMinSupport(format!("ratio {} is outside (0, 1]", ratio)),
            ),
            MinSupport::Ratio(ratio) => {
                let count = (ratio * num_transactions as f64).ceil() as usize;
                Ok(count.max(1))
            }
        }
    }
}

impl From<usize> for MinSupport {
    fn from(count: usize) -> Self {
        MinSupport::Count(count)
    }
}

impl FromStr for MinSupport {
    type Err = MineError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(count) = s.parse::<usize>() {
            return match count {
                0 => Err(MineError::InvalidMinSupport(
                    "count must be at least 1".to_string(),
                )),
                _ => Ok(MinSupport::Count(count)),
            };
        }

        let ratio = s
            .parse::<f64>()
            .map_err(|_| MineError::InvalidMinSupport(format!("cannot parse '{}'", s)))?;
        let support = MinSupport::Ratio(ratio);
        // validate the range eagerly; the count itself depends on the database
        support.resolve(0)?;
        Ok(support)
    }
}

impl fmt::Display for MinSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinSupport::Count(count) => write!(f, "{}", count),
            MinSupport::Ratio(ratio) => write!(f, "{}", ratio),
        }
    }
}
