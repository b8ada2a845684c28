//! Command loop: read lines, apply them to a memory, write replies.
//!
//! Stores and deletes are silent. Recalls and `random` print an SDR as
//! 1-indexed, space-separated positions; `version` prints the protocol
//! version. Malformed lines are reported on the output and the loop goes on.

use std::io::{BufRead, Write};

use anyhow::Context;

use crate::config::version_string;
use crate::error::Result;
use crate::memory::triadic::TriadicMemory;
use crate::protocol::parser::{parse_command, Command};
use crate::sdr::sampler::SdrSampler;

/// What a command produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Nothing to print.
    Silent,
    /// One line of output.
    Line(String),
    /// End of session.
    Quit,
}

/// Counters for one run of the loop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub lines: u64,
    pub stores: u64,
    pub deletes: u64,
    pub recalls: u64,
    pub errors: u64,
}

/// A memory plus the sampler used by `random`.
pub struct Session {
    memory: TriadicMemory,
    sampler: SdrSampler,
    summary: SessionSummary,
}

impl Session {
    pub fn new(memory: TriadicMemory, sampler: SdrSampler) -> Self {
        Self {
            memory,
            sampler,
            summary: SessionSummary::default(),
        }
    }

    pub fn memory(&self) -> &TriadicMemory {
        &self.memory
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    /// Parse and apply one line.
    pub fn execute_line(&mut self, line: &str) -> Result<Reply> {
        let command = parse_command(line, self.memory.n())?;
        self.execute(command)
    }

    /// Apply one parsed command.
    pub fn execute(&mut self, command: Command) -> Result<Reply> {
        tracing::debug!("command: {:?}", command);
        match command {
            Command::Quit => Ok(Reply::Quit),
            Command::Version => Ok(Reply::Line(version_string())),
            Command::Random => {
                let sdr = self.sampler.random(self.memory.p());
                Ok(Reply::Line(sdr.to_wire()))
            }
            Command::Store(triple) => {
                self.memory.store(&triple)?;
                self.summary.stores += 1;
                Ok(Reply::Silent)
            }
            Command::Delete(triple) => {
                self.memory.remove(&triple)?;
                self.summary.deletes += 1;
                Ok(Reply::Silent)
            }
            Command::Recall(triple) => {
                let (_, sdr) = self.memory.recall(&triple)?;
                self.summary.recalls += 1;
                Ok(Reply::Line(sdr.to_wire()))
            }
        }
    }

    /// Run until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> anyhow::Result<SessionSummary> {
        tracing::info!(
            "Session started: n={}, p={}",
            self.memory.n(),
            self.memory.p()
        );

        for line in input.lines() {
            let line = line.context("failed to read command line")?;
            if line.trim().is_empty() {
                continue;
            }
            self.summary.lines += 1;

            match self.execute_line(&line) {
                Ok(Reply::Silent) => {}
                Ok(Reply::Line(text)) => {
                    writeln!(output, "{}", text).context("failed to write reply")?;
                    output.flush().context("failed to flush reply")?;
                }
                Ok(Reply::Quit) => break,
                Err(e) => {
                    self.summary.errors += 1;
                    tracing::warn!("rejected input {:?}: {}", line, e);
                    writeln!(output, "invalid input: {}", e).context("failed to write error")?;
                    output.flush().context("failed to flush error")?;
                }
            }
        }

        tracing::info!(
            "Session ended: {} lines, {} stores, {} deletes, {} recalls, {} errors",
            self.summary.lines,
            self.summary.stores,
            self.summary.deletes,
            self.summary.recalls,
            self.summary.errors,
        );
        Ok(self.summary.clone())
    }
}
