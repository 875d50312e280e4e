//! Positional parameter extraction with shape checks.

use bridgepack::Value;
use bridgerpc::Operation;

use crate::remote::Error;
use crate::remote::Result;
use crate::statement::PreparedStatement;

/// The decoded parameter list of one operation.
///
/// Each accessor moves the value out; a position past the end reads as `undefined`.
pub struct Params {
    operation: Operation,
    values: Vec<Value>,
}

impl Params {
    pub fn new(operation: Operation, values: Vec<Value>) -> Self {
        Self { operation, values }
    }

    pub fn take(&mut self, index: usize) -> Value {
        self.values.get_mut(index).map(std::mem::take).unwrap_or_default()
    }

    pub fn string(&mut self, index: usize) -> Result<String> {
        match self.take(index) {
            Value::String(s) => Ok(s),
            other => Err(self.mismatch(index, "a string", &other)),
        }
    }

    /// `null` and `undefined` read as `None`.
    pub fn optional_string(&mut self, index: usize) -> Result<Option<String>> {
        match self.take(index) {
            Value::String(s) => Ok(Some(s)),
            Value::Null | Value::Undefined => Ok(None),
            other => Err(self.mismatch(index, "a string or nothing", &other)),
        }
    }

    pub fn list(&mut self, index: usize) -> Result<Vec<Value>> {
        match self.take(index) {
            Value::List(items) => Ok(items),
            other => Err(self.mismatch(index, "a list", &other)),
        }
    }

    /// Reads `[query, params]` spread over `index` and `index + 1`.
    /// Missing params bind nothing.
    pub fn statement(&mut self, index: usize) -> Result<PreparedStatement> {
        let query = self.string(index)?;
        let params = match self.take(index + 1) {
            Value::List(items) => items,
            Value::Null | Value::Undefined => Vec::new(),
            other => return Err(self.mismatch(index + 1, "a list", &other)),
        };
        Ok(PreparedStatement::from_parts(query, params))
    }

    /// Reads every parameter as a `[query, params]` pair, keeping their order.
    pub fn statements(&mut self) -> Result<Vec<PreparedStatement>> {
        let operation = self.operation;
        std::mem::take(&mut self.values)
            .into_iter()
            .enumerate()
            .map(|(index, pair)| match pair {
                Value::List(pair) => Params::new(operation, pair).statement(0),
                other => Err(self.mismatch(index, "a [query, params] pair", &other)),
            })
            .collect()
    }

    fn mismatch(&self, index: usize, expected: &'static str, found: &Value) -> Error {
        Error::BadParameter {
            operation: self.operation,
            index,
            expected,
            found: found.kind_name(),
        }
    }
}
