//! # Database Facade
//!
//! Caller-side handle for a database binding. Each method is one dispatch.
//!
//! Body interpretation is fixed per method: `dump` returns the raw bytes, every
//! other method decodes one bridgepack value.

use std::sync::Arc;

use bridgepack::Value;
use bridgerpc::Operation;

use crate::channel::Channel;
use crate::config;
use crate::config::BindingConfig;
use crate::error::Result;
use crate::statement::PreparedStatement;
use crate::transport::Fetch;

#[derive(Clone)]
pub struct Database {
    channel: Channel,
}

impl Database {
    /// Binds a facade to the database named `name` behind `origin`.
    pub fn new(origin: &str, name: impl Into<String>, fetch: Arc<dyn Fetch>) -> config::Result<Self> {
        let config = BindingConfig::database(origin, name)?;
        Ok(Self {
            channel: Channel::new(config, fetch),
        })
    }

    pub fn name(&self) -> &str {
        self.channel.config().name()
    }

    /// Creates a statement with no parameters. Nothing is sent.
    pub fn prepare(&self, query: impl Into<Arc<str>>) -> PreparedStatement {
        PreparedStatement::new(query)
    }

    /// Returns the database file as bytes.
    pub async fn dump(&self) -> Result<Vec<u8>> {
        let res = self.channel.dispatch(Operation::DatabaseDump, vec![]).await?;
        Ok(res.into_bytes())
    }

    /// Executes one or more raw queries without binding.
    pub async fn exec(&self, query: &str) -> Result<Value> {
        let res = self.channel.dispatch(Operation::DatabaseExec, vec![query.into()]).await?;
        res.value()
    }

    /// Executes `statements` remotely in the given order. Each statement is
    /// one `[query, params]` parameter.
    ///
    /// The batch succeeds or fails as a whole.
    pub async fn batch(&self, statements: &[PreparedStatement]) -> Result<Value> {
        let parameters = statements.iter().map(PreparedStatement::to_wire).collect();
        let res = self.channel.dispatch(Operation::DatabaseBatch, parameters).await?;
        res.value()
    }

    /// Returns the first row, or only `column` of it when given.
    pub async fn first(&self, statement: &PreparedStatement, column: Option<&str>) -> Result<Value> {
        let mut parameters = statement_parameters(statement);
        if let Some(column) = column {
            parameters.push(column.into());
        }
        let res = self.channel.dispatch(Operation::DatabaseFirst, parameters).await?;
        res.value()
    }

    /// Returns every row along with execution metadata.
    pub async fn all(&self, statement: &PreparedStatement) -> Result<Value> {
        self.execute(Operation::DatabaseAll, statement).await
    }

    /// Runs the statement for its side effects, returning metadata only.
    pub async fn run(&self, statement: &PreparedStatement) -> Result<Value> {
        self.execute(Operation::DatabaseRun, statement).await
    }

    /// Returns rows as positional arrays.
    pub async fn raw(&self, statement: &PreparedStatement) -> Result<Value> {
        self.execute(Operation::DatabaseRaw, statement).await
    }

    async fn execute(&self, operation: Operation, statement: &PreparedStatement) -> Result<Value> {
        let res = self.channel.dispatch(operation, statement_parameters(statement)).await?;
        res.value()
    }
}

fn statement_parameters(statement: &PreparedStatement) -> Vec<Value> {
    vec![statement.query().into(), Value::List(statement.params().to_vec())]
}
