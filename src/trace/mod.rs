//! JSONL pointer-trace replay.
//!
//! A trace is one JSON record per line:
//!
//! ```text
//! {"type":"layout","rows":[{"id":"a","rect":{"top":0,"left":0,"width":320,"height":56}}]}
//! {"type":"pointer","at_ms":0,"input":{"kind":"down","position":{"x":10,"y":20}}}
//! {"type":"tick","at_ms":500}
//! ```
//!
//! Records are fed to a [`ListInteraction`] in order. Before each pointer
//! record the clock is advanced to its timestamp so timers due earlier fire
//! first. Every effect is written to the output as one JSON line stamped with
//! the time it was emitted. Blank lines are skipped. A trace that ends while
//! a row is still exiting is flushed once the exit transition has run, so
//! its complete or delete effect is not lost.

use crate::gesture::{GestureConfig, ListInteraction, PointerEvent, PointerInput, RowEffect, RowSlot};
use crate::model::TraceError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// One line of a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceRecord {
    /// Replace the list's rows and geometry.
    Layout {
        /// Rows in display order.
        rows: Vec<RowSlot>,
    },
    /// A pointer event.
    Pointer {
        /// Milliseconds since the trace origin.
        at_ms: u64,
        /// The event.
        input: PointerInput,
    },
    /// Advance the clock without input.
    Tick {
        /// Milliseconds since the trace origin.
        at_ms: u64,
    },
}

/// An emitted effect, as written to the output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectLine<'a> {
    /// Time the effect was emitted.
    pub at_ms: u64,
    /// The effect.
    #[serde(flatten)]
    pub effect: &'a RowEffect,
}

/// Counters of a finished replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    /// Records processed.
    pub records: usize,
    /// Effects written.
    pub effects: usize,
    /// Pointer moves that suppressed the default scroll.
    pub suppressed_moves: usize,
}

/// Parse one trace line. `line` is the 1-based line number for errors.
pub fn parse_record(text: &str, line: usize) -> Result<TraceRecord, TraceError> {
    serde_json::from_str(text).map_err(|err| TraceError::InvalidRecord {
        line,
        message: err.to_string(),
    })
}

/// Replays traces against a fresh [`ListInteraction`].
#[derive(Debug)]
pub struct Replayer {
    list: ListInteraction,
    has_layout: bool,
    clock_ms: u64,
    summary: ReplaySummary,
}

impl Replayer {
    /// New replayer with `config`.
    pub fn new(config: GestureConfig) -> Self {
        Self {
            list: ListInteraction::new(config),
            has_layout: false,
            clock_ms: 0,
            summary: ReplaySummary::default(),
        }
    }

    /// The list being driven.
    pub fn list(&self) -> &ListInteraction {
        &self.list
    }

    /// Apply one record, returning the effects it produced.
    pub fn apply(
        &mut self,
        record: TraceRecord,
        line: usize,
    ) -> Result<Vec<(u64, RowEffect)>, TraceError> {
        self.summary.records += 1;
        let mut emitted = Vec::new();
        match record {
            TraceRecord::Layout { rows } => {
                debug!(line, rows = rows.len(), "layout");
                self.list.set_rows(rows);
                self.has_layout = true;
            }
            TraceRecord::Tick { at_ms } => {
                self.advance(at_ms, line)?;
                emitted.extend(self.tick());
            }
            TraceRecord::Pointer { at_ms, input } => {
                self.advance(at_ms, line)?;
                emitted.extend(self.tick());
                let outcome = self
                    .list
                    .handle(PointerEvent::new(Duration::from_millis(at_ms), input));
                if outcome.suppress_default {
                    self.summary.suppressed_moves += 1;
                }
                emitted.extend(outcome.effects.into_iter().map(|effect| (at_ms, effect)));
            }
        }
        self.summary.effects += emitted.len();
        Ok(emitted)
    }

    fn advance(&mut self, at_ms: u64, line: usize) -> Result<(), TraceError> {
        if !self.has_layout {
            return Err(TraceError::MissingLayout { line });
        }
        if at_ms < self.clock_ms {
            return Err(TraceError::NonMonotonicTime {
                line,
                at_ms,
                previous_ms: self.clock_ms,
            });
        }
        self.clock_ms = at_ms;
        Ok(())
    }

    fn tick(&mut self) -> Vec<(u64, RowEffect)> {
        let at_ms = self.clock_ms;
        self.list
            .tick(Duration::from_millis(at_ms))
            .into_iter()
            .map(|effect| (at_ms, effect))
            .collect()
    }

    /// End of input: let pending exit transitions finish.
    ///
    /// Nothing happens while a pointer is still held, since its long-press
    /// or drag timers would fire on a gesture the trace never finished.
    pub fn finish(&mut self) -> Vec<(u64, RowEffect)> {
        let idle = self.has_layout && self.list.active_row().is_none();
        if !idle || !self.list.has_pending_exit() {
            return Vec::new();
        }
        let exit_ms =
            u64::try_from(self.list.config().exit_duration.as_millis()).unwrap_or(u64::MAX);
        self.clock_ms = self.clock_ms.saturating_add(exit_ms);
        debug!(at_ms = self.clock_ms, "flushing exit transitions at end of trace");
        let emitted = self.tick();
        self.summary.effects += emitted.len();
        emitted
    }

    /// Replay every line of `input`, writing effects to `output`.
    pub fn run<R: BufRead, W: Write>(
        mut self,
        input: R,
        mut output: W,
    ) -> Result<ReplaySummary, TraceError> {
        let mut last_line = 0;
        for (index, text) in input.lines().enumerate() {
            let text = text?;
            let line = index + 1;
            if text.trim().is_empty() {
                continue;
            }
            let record = parse_record(&text, line)?;
            let emitted = self.apply(record, line)?;
            write_effects(&mut output, &emitted, line)?;
            last_line = line;
        }
        let flushed = self.finish();
        write_effects(&mut output, &flushed, last_line)?;
        output.flush()?;
        info!(
            records = self.summary.records,
            effects = self.summary.effects,
            "trace replayed"
        );
        Ok(self.summary)
    }
}

fn write_effects<W: Write>(
    output: &mut W,
    effects: &[(u64, RowEffect)],
    line: usize,
) -> Result<(), TraceError> {
    for (at_ms, effect) in effects {
        let json = serde_json::to_string(&EffectLine {
            at_ms: *at_ms,
            effect,
        })
        .map_err(|err| TraceError::InvalidRecord {
            line,
            message: err.to_string(),
        })?;
        writeln!(output, "{json}")?;
    }
    Ok(())
}

/// Replay the trace file at `path`.
pub fn replay_file<W: Write>(
    path: &Path,
    config: GestureConfig,
    output: W,
) -> Result<ReplaySummary, TraceError> {
    if !path.exists() {
        return Err(TraceError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path)?;
    Replayer::new(config).run(BufReader::new(file), output)
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;
