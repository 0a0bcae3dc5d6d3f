//! The Executor: frames compiled commands, sends them, decodes replies.
//!
//! The executor is stateless apart from its configuration. It owns no
//! connection; every round trip goes through the [`Transport`].

use ftkit_core::{Error, Reply, Token};
use ftkit_reply::{decode_aggregate, decode_cursor};
use tracing::{debug, info, warn};

use crate::{Command, CommandFrame, ExecutorConfig, Output, Result, Transport};

/// Single entry point for running commands against an engine.
///
/// # Example
///
/// ```ignore
/// use ftkit_executor::{AggregationBuilder, Executor, GroupBy, Reducer};
///
/// let executor = Executor::new(transport);
/// let command = AggregationBuilder::new("idx")
///     .group_by(GroupBy::new(["documentType"]).reduce(Reducer::sum("score").alias("total")))
///     .build()?;
/// let result = executor.aggregate(&command)?;
/// ```
pub struct Executor<T: Transport> {
    transport: T,
    config: ExecutorConfig,
}

impl<T: Transport> Executor<T> {
    /// Create an executor with the default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ExecutorConfig::default())
    }

    /// Create an executor with an explicit configuration.
    pub fn with_config(transport: T, config: ExecutorConfig) -> Self {
        Self { transport, config }
    }

    /// Active configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the wire frame for a command without sending it.
    ///
    /// The index name is prepended to the compiled body. Aggregations that
    /// carry no dialect get the configured default appended.
    pub fn frame(&self, cmd: &Command) -> Result<CommandFrame> {
        match cmd {
            Command::CreateIndex { index, definition } => {
                require_index(index)?;
                let mut args = Vec::with_capacity(definition.len() + 1);
                args.push(Token::from(index));
                args.extend_from_slice(definition.tokens());
                Ok(CommandFrame::new(&self.config.create_command, args))
            }
            Command::Aggregate(aggregation) => {
                require_index(aggregation.index())?;
                let mut args = Vec::with_capacity(aggregation.len() + 3);
                args.push(Token::from(aggregation.index()));
                args.extend_from_slice(aggregation.tokens());
                if let (None, Some(dialect)) = (aggregation.dialect(), self.config.default_dialect)
                {
                    args.push("DIALECT".into());
                    args.push(dialect.into());
                }
                Ok(CommandFrame::new(&self.config.aggregate_command, args))
            }
            Command::CursorRead {
                index,
                cursor,
                count,
            } => {
                require_index(index)?;
                if *cursor == 0 {
                    return Err(Error::invalid("cursor 0 is exhausted and cannot be read"));
                }
                let out_of_range = i64::try_from(*cursor).is_err()
                    || count.is_some_and(|c| i64::try_from(c).is_err());
                if out_of_range {
                    return Err(Error::invalid("cursor id and COUNT must fit an integer argument"));
                }
                let mut args = vec![Token::from("READ"), Token::from(index), (*cursor).into()];
                if let Some(count) = count {
                    args.push("COUNT".into());
                    args.push((*count).into());
                }
                Ok(CommandFrame::new(&self.config.cursor_command, args))
            }
        }
    }

    /// Execute a single command.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        let frame = self.frame(&cmd)?;
        debug!(command = cmd.name(), index = cmd.index(), args = frame.args.len(), "dispatching");
        if self.config.log_commands {
            info!(command = %frame, "sending");
        }

        let result = match &cmd {
            Command::CreateIndex { .. } => {
                let reply = self.transport.send_index_create(&frame)?;
                decode_status(reply).map(Output::Status)
            }
            Command::Aggregate(aggregation) if aggregation.uses_cursor() => {
                let reply = self.transport.send_aggregate(&frame)?;
                decode_cursor(reply).map(Output::Page)
            }
            Command::Aggregate(_) => {
                let reply = self.transport.send_aggregate(&frame)?;
                decode_aggregate(reply).map(Output::Records)
            }
            Command::CursorRead { .. } => {
                let reply = self.transport.send_aggregate(&frame)?;
                decode_cursor(reply).map(Output::Page)
            }
        };

        if let Err(Error::Server { message }) = &result {
            warn!(command = cmd.name(), index = cmd.index(), %message, "engine rejected command");
        }
        result
    }

    /// Execute commands in order, one result per command.
    ///
    /// A failing command does not stop the batch.
    pub fn execute_many(&self, cmds: Vec<Command>) -> Vec<Result<Output>> {
        cmds.into_iter().map(|cmd| self.execute(cmd)).collect()
    }

    /// Create an index, returning the engine's status line.
    pub fn create_index(
        &self,
        index: &str,
        definition: &ftkit_command::IndexDefinition,
    ) -> Result<String> {
        match self.execute(Command::CreateIndex {
            index: index.to_string(),
            definition: definition.clone(),
        })? {
            Output::Status(status) => Ok(status),
            other => Err(unexpected("Status", &other)),
        }
    }

    /// Run an aggregation built without a cursor.
    pub fn aggregate(
        &self,
        aggregation: &ftkit_command::AggregationCommand,
    ) -> Result<ftkit_reply::AggregateResult> {
        match self.execute(Command::Aggregate(aggregation.clone()))? {
            Output::Records(result) => Ok(result),
            other => Err(unexpected("Records", &other)),
        }
    }

    /// Run an aggregation built with `WITHCURSOR`, returning the first page.
    pub fn aggregate_cursor(
        &self,
        aggregation: &ftkit_command::AggregationCommand,
    ) -> Result<ftkit_reply::CursorPage> {
        match self.execute(Command::Aggregate(aggregation.clone()))? {
            Output::Page(page) => Ok(page),
            other => Err(unexpected("Page", &other)),
        }
    }

    /// Read the next page of a cursor.
    pub fn cursor_read(
        &self,
        index: &str,
        cursor: u64,
        count: Option<u64>,
    ) -> Result<ftkit_reply::CursorPage> {
        match self.execute(Command::CursorRead {
            index: index.to_string(),
            cursor,
            count,
        })? {
            Output::Page(page) => Ok(page),
            other => Err(unexpected("Page", &other)),
        }
    }
}

fn require_index(index: &str) -> Result<()> {
    if index.is_empty() {
        return Err(Error::invalid("index name must not be empty"));
    }
    Ok(())
}

fn decode_status(reply: Reply) -> Result<String> {
    match reply {
        Reply::Error(message) => Err(Error::Server { message }),
        other => match other.as_text() {
            Some(text) => Ok(text.to_string()),
            None => Err(Error::reply_format(format!(
                "expected a status reply, got {}",
                other.describe()
            ))),
        },
    }
}

fn unexpected(expected: &str, output: &Output) -> Error {
    let actual = match output {
        Output::Status(_) => "Status",
        Output::Records(_) => "Records",
        Output::Page(_) => "Page",
    };
    Error::reply_format(format!("expected {} output, got {}", expected, actual))
}
