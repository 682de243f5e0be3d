use crate::domain::notification::NotificationEvent;
use crate::domain::transaction::{PollState, TransactionHandle};
use crate::domain::validation::ValidationErrors;
use std::io::{self, Write};

/// Renders form feedback as plain text lines.
pub struct FormWriter<W: Write> {
    writer: W,
}

impl<W: Write> FormWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// One `field: message` line per inline error.
    pub fn write_errors(&mut self, errors: &ValidationErrors) -> io::Result<()> {
        for (field, error) in errors.iter() {
            writeln!(self.writer, "{field}: {error}")?;
        }
        self.writer.flush()
    }

    pub fn write_notification(&mut self, event: &NotificationEvent) -> io::Result<()> {
        writeln!(self.writer, "{event}")?;
        self.writer.flush()
    }

    pub fn write_submitted(&mut self, handle: &TransactionHandle) -> io::Result<()> {
        writeln!(self.writer, "transaction {handle} submitted")?;
        self.writer.flush()
    }

    pub fn write_outcome(&mut self, state: PollState) -> io::Result<()> {
        let label = match state {
            PollState::Authorized => "authorized",
            PollState::Rejected => "rejected",
            PollState::TimedOut => "timed out",
            PollState::Cancelled => "cancelled",
            PollState::Idle | PollState::Polling => "pending",
        };
        writeln!(self.writer, "outcome: {label}")?;
        self.writer.flush()
    }
}
