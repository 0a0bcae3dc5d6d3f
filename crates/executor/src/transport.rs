//! Transport seam.
//!
//! The executor never talks to the network. It hands a fully assembled
//! [`CommandFrame`] to a [`Transport`] and gets a protocol-neutral
//! [`Reply`] back. Connection handling, authentication and retries all live
//! behind this trait.

use ftkit_core::{Reply, Result, Token};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Command name plus positional arguments, ready to send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandFrame {
    /// Command name (e.g. `FT.CREATE`, `FT.AGGREGATE`).
    pub name: String,
    /// Arguments after the command name.
    pub args: Vec<Token>,
}

impl CommandFrame {
    /// Creates a frame from a command name and argument list.
    pub fn new(name: impl Into<String>, args: Vec<Token>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Encodes the frame as a RESP array of bulk strings.
    pub fn to_resp_bytes(&self) -> Vec<u8> {
        let mut output = format!("*{}\r\n", self.args.len() + 1).into_bytes();
        append_resp_bulk(&mut output, self.name.as_bytes());
        for arg in &self.args {
            append_resp_bulk(&mut output, &arg.to_bytes());
        }
        output
    }
}

fn append_resp_bulk(output: &mut Vec<u8>, payload: &[u8]) {
    output.extend_from_slice(format!("${}\r\n", payload.len()).as_bytes());
    output.extend_from_slice(payload);
    output.extend_from_slice(b"\r\n");
}

impl fmt::Display for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Sends compiled commands to the engine.
///
/// Implementations must preserve reply nesting: each aggregation record
/// arrives as its own nested array.
pub trait Transport {
    /// Send an index creation command; the engine answers with a status.
    fn send_index_create(&self, frame: &CommandFrame) -> Result<Reply>;

    /// Send an aggregation or cursor read; the engine answers with rows.
    fn send_aggregate(&self, frame: &CommandFrame) -> Result<Reply>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send_index_create(&self, frame: &CommandFrame) -> Result<Reply> {
        (**self).send_index_create(frame)
    }

    fn send_aggregate(&self, frame: &CommandFrame) -> Result<Reply> {
        (**self).send_aggregate(frame)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send_index_create(&self, frame: &CommandFrame) -> Result<Reply> {
        (**self).send_index_create(frame)
    }

    fn send_aggregate(&self, frame: &CommandFrame) -> Result<Reply> {
        (**self).send_aggregate(frame)
    }
}
