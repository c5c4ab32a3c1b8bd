//! A single history entry

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use dashu::float::DBig;
use serde::{Deserialize, Serialize};

use super::operations::Operation;
use crate::error::{CalcError, Result};

/// One completed calculation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    operation: Operation,
    operand1: DBig,
    operand2: DBig,
    result: DBig,
    timestamp: DateTime<Utc>,
}

/// Flat on-disk form of a [`Calculation`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub operation: String,
    pub operand1: String,
    pub operand2: String,
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

impl Calculation {
    pub fn new(operation: Operation, operand1: DBig, operand2: DBig, result: DBig) -> Self {
        Self {
            operation,
            operand1,
            operand2,
            result,
            timestamp: Utc::now(),
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn operand1(&self) -> &DBig {
        &self.operand1
    }

    pub fn operand2(&self) -> &DBig {
        &self.operand2
    }

    pub fn result(&self) -> &DBig {
        &self.result
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn to_record(&self) -> CalculationRecord {
        CalculationRecord {
            operation: self.operation.command().to_string(),
            operand1: self.operand1.to_string(),
            operand2: self.operand2.to_string(),
            result: self.result.to_string(),
            timestamp: self.timestamp,
        }
    }

    /// Rebuild a calculation from storage. `index` is only used in messages.
    pub fn from_record(record: &CalculationRecord, index: usize) -> Result<Self> {
        let operation = Operation::from_command(&record.operation).ok_or_else(|| {
            CalcError::Storage(format!(
                "Invalid history record {}: unknown operation '{}'",
                index + 1,
                record.operation
            ))
        })?;

        let number = |field: &str, raw: &str| {
            DBig::from_str(raw.trim()).map_err(|_| {
                CalcError::Storage(format!(
                    "Invalid history record {}: {} is not a number: '{}'",
                    index + 1,
                    field,
                    raw
                ))
            })
        };

        Ok(Self {
            operation,
            operand1: number("operand1", &record.operand1)?,
            operand2: number("operand2", &record.operand2)?,
            result: number("result", &record.result)?,
            timestamp: record.timestamp,
        })
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {}) = {}",
            self.operation.display_name(),
            self.operand1,
            self.operand2,
            self.result
        )
    }
}
