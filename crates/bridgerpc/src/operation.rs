//! # Operation Table
//!
//! The closed set of operation identifiers understood by the remote handler,
//! and the binding kinds they are namespaced under.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The kind of a live binding. Carried explicitly rather than inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// A relational database handle.
    Database,
    /// A message queue producer handle.
    Queue,
}

impl BindingKind {
    /// The value sent in the module header.
    pub fn header_value(self) -> &'static str {
        match self {
            Self::Database => "D1",
            Self::Queue => "QUEUE",
        }
    }

    /// Parses a module header value.
    pub fn from_header(value: &str) -> Option<Self> {
        match value {
            "D1" => Some(Self::Database),
            "QUEUE" => Some(Self::Queue),
            _ => None,
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => write!(f, "database"),
            Self::Queue => write!(f, "queue"),
        }
    }
}

/// A remote-side action, `"<Kind>.<method>"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `[]` → raw database file bytes.
    DatabaseDump,
    /// `[query]` → exec summary.
    DatabaseExec,
    /// `[[query, params], ...]` → one result per statement.
    DatabaseBatch,
    /// `[query, params, column?]` → first row, or one column of it.
    DatabaseFirst,
    /// `[query, params]` → all rows with metadata.
    DatabaseAll,
    /// `[query, params]` → metadata only.
    DatabaseRun,
    /// `[query, params]` → rows as positional arrays.
    DatabaseRaw,
    /// `[body, options?]`
    QueueSend,
    /// `[[message, ...]]`
    QueueSendBatch,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Self::DatabaseDump,
        Self::DatabaseExec,
        Self::DatabaseBatch,
        Self::DatabaseFirst,
        Self::DatabaseAll,
        Self::DatabaseRun,
        Self::DatabaseRaw,
        Self::QueueSend,
        Self::QueueSendBatch,
    ];

    /// The wire identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DatabaseDump => "Database.dump",
            Self::DatabaseExec => "Database.exec",
            Self::DatabaseBatch => "Database.batch",
            Self::DatabaseFirst => "Database.first",
            Self::DatabaseAll => "Database.all",
            Self::DatabaseRun => "Database.run",
            Self::DatabaseRaw => "Database.raw",
            Self::QueueSend => "Queue.send",
            Self::QueueSendBatch => "Queue.sendBatch",
        }
    }

    /// The binding kind this operation must be executed against.
    pub fn kind(self) -> BindingKind {
        match self {
            Self::DatabaseDump
            | Self::DatabaseExec
            | Self::DatabaseBatch
            | Self::DatabaseFirst
            | Self::DatabaseAll
            | Self::DatabaseRun
            | Self::DatabaseRaw => BindingKind::Database,
            Self::QueueSend | Self::QueueSendBatch => BindingKind::Queue,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| Error::UnknownOperation(s.to_string()))
    }
}
