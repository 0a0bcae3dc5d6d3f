//! Test modules for the executor crate.

use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::{CommandFrame, Reply, Result, Transport};


/// Transport that records every frame and answers from a queue of canned
/// replies, in order.
#[derive(Default)]
pub struct MockTransport {
    sent: Mutex<Vec<(&'static str, CommandFrame)>>,
    replies: Mutex<VecDeque<Result<Reply>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: Vec<Reply>) -> Self {
        let mock = Self::new();
        for reply in replies {
            mock.push(Ok(reply));
        }
        mock
    }

    pub fn push(&self, reply: Result<Reply>) {
        self.replies.lock().push_back(reply);
    }

    /// Frames sent so far, tagged with the channel used
    pub fn sent(&self) -> Vec<(&'static str, CommandFrame)> {
        self.sent.lock().clone()
    }

    fn answer(&self, channel: &'static str, frame: &CommandFrame) -> Result<Reply> {
        self.sent.lock().push((channel, frame.clone()));
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| panic!("no canned reply left for {}", frame))
    }
}

impl Transport for MockTransport {
    fn send_index_create(&self, frame: &CommandFrame) -> Result<Reply> {
        self.answer("create", frame)
    }

    fn send_aggregate(&self, frame: &CommandFrame) -> Result<Reply> {
        self.answer("aggregate", frame)
    }
}

/// `[name, value, ...]` record built from bulk strings
pub fn row(pairs: &[(&str, &str)]) -> Reply {
    Reply::Array(
        pairs
            .iter()
            .flat_map(|(k, v)| [Reply::bulk(k), Reply::bulk(v)])
            .collect(),
    )
}
