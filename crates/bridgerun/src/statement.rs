use std::sync::Arc;

use bridgepack::Value;

/// An immutable query and its bound parameters.
///
/// `bind` returns a new statement and leaves the original untouched. The query
/// text is shared between a statement and everything bound from it.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedStatement {
    query: Arc<str>,
    params: Vec<Value>,
}

impl PreparedStatement {
    pub fn new(query: impl Into<Arc<str>>) -> Self {
        Self {
            query: query.into(),
            params: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Returns a copy of this statement with `params` replacing any previous binding.
    pub fn bind<I, V>(&self, params: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            query: self.query.clone(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// `[query, params]`, the shape one statement takes inside a batch.
    pub(crate) fn to_wire(&self) -> Value {
        Value::List(vec![
            Value::String(self.query.to_string()),
            Value::List(self.params.clone()),
        ])
    }

    pub(crate) fn from_parts(query: String, params: Vec<Value>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }
}
