//! Counter policies for ID assignment.
//!
//! The counter is a plain value threaded through the renumber pass: every
//! step takes the current [`Counter`] and hands back the next one, so no
//! state outlives a single run.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_BASE: u64 = 10_000;
pub const DEFAULT_BLOCK_SIZE: u64 = 10_000;
pub const DEFAULT_STEP: u64 = 10;

/// How IDs are handed out across the ordered file list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CounterPolicy {
    /// One counter for the whole run, +1 per matching line, never reset.
    #[serde(rename_all = "camelCase")]
    Sequential {
        #[serde(default = "default_base")]
        base: u64,
    },
    /// Each file gets its own block starting at `base + index * block_size`,
    /// advancing by `step` per matching line.
    #[serde(rename_all = "camelCase")]
    Block {
        #[serde(default = "default_base")]
        base: u64,
        #[serde(default = "default_block_size")]
        block_size: u64,
        #[serde(default = "default_step")]
        step: u64,
    },
}

fn default_base() -> u64 {
    DEFAULT_BASE
}

fn default_block_size() -> u64 {
    DEFAULT_BLOCK_SIZE
}

fn default_step() -> u64 {
    DEFAULT_STEP
}

impl Default for CounterPolicy {
    fn default() -> Self {
        CounterPolicy::Sequential { base: DEFAULT_BASE }
    }
}

impl CounterPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            CounterPolicy::Sequential { .. } => "sequential",
            CounterPolicy::Block { .. } => "block",
        }
    }

    /// Counter before the first file is processed.
    pub fn initial(&self) -> Counter {
        match *self {
            CounterPolicy::Sequential { base } => Counter::new(base),
            CounterPolicy::Block { base, .. } => Counter::new(base),
        }
    }

    /// Counter to use for the file at `file_index`, given the counter left
    /// behind by the previous file. A block start past `u64::MAX` yields an
    /// exhausted counter; it only fails if the file has an ID to assign.
    pub fn enter_file(&self, file_index: usize, carried: Counter) -> Counter {
        match *self {
            CounterPolicy::Sequential { .. } => carried,
            CounterPolicy::Block { .. } => Counter {
                next: self.block_start(file_index).ok(),
            },
        }
    }

    /// First ID of the block for `file_index`. Sequential policies have no
    /// fixed blocks and report their base.
    pub fn block_start(&self, file_index: usize) -> Result<u64> {
        match *self {
            CounterPolicy::Sequential { base } => Ok(base),
            CounterPolicy::Block {
                base, block_size, ..
            } => (file_index as u64)
                .checked_mul(block_size)
                .and_then(|offset| base.checked_add(offset))
                .ok_or_else(|| overflow("policy.blockSize", block_size)),
        }
    }

    /// Amount the counter moves per matching line.
    pub fn step(&self) -> u64 {
        match *self {
            CounterPolicy::Sequential { .. } => 1,
            CounterPolicy::Block { step, .. } => step,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let CounterPolicy::Block {
            block_size, step, ..
        } = *self
        {
            if block_size == 0 {
                return Err(Error::config_invalid_value(
                    "policy.blockSize",
                    Some(block_size.to_string()),
                    "blockSize must be greater than 0",
                ));
            }
            if step == 0 {
                return Err(Error::config_invalid_value(
                    "policy.step",
                    Some(step.to_string()),
                    "step must be greater than 0",
                ));
            }
        }
        Ok(())
    }
}

/// The next ID to hand out. `None` once the counter has stepped past
/// `u64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub next: Option<u64>,
}

impl Counter {
    pub fn new(next: u64) -> Self {
        Self { next: Some(next) }
    }

    /// The ID to assign now, or an overflow error if none is left.
    pub fn current(&self, policy: &CounterPolicy) -> Result<u64> {
        self.next.ok_or_else(|| match *policy {
            CounterPolicy::Sequential { base } => overflow("policy.base", base),
            CounterPolicy::Block { step, .. } => overflow("policy.step", step),
        })
    }

    /// Counter after one assignment under `policy`.
    pub fn advance(self, policy: &CounterPolicy) -> Counter {
        Counter {
            next: self.next.and_then(|next| next.checked_add(policy.step())),
        }
    }
}

fn overflow(key: &str, value: u64) -> Error {
    Error::config_invalid_value(
        key,
        Some(value.to_string()),
        "ID counter overflowed a 64-bit integer",
    )
}
