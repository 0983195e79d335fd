use crate::batch::gate::GateGuard;
use crate::batch::naming::unique_output_path;
use crate::batch::outcome::{BatchEvent, BatchSummary, ItemOutcome};
use crate::error::{RezipError, Result, UserFriendlyError};
use crate::pipeline::Converter;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::{self, JoinHandle};
use tracing::{info, warn};

/// Runs a list of inputs through the converter, one after another.
#[derive(Clone)]
pub struct BatchRunner {
    converter: Arc<Converter>,
    suffix: String,
}

impl BatchRunner {
    pub fn new(converter: Arc<Converter>, suffix: impl Into<String>) -> Self {
        Self {
            converter,
            suffix: suffix.into(),
        }
    }

    /// Processes every path in order and always returns a summary covering
    /// all of them. `emit` sees each item outcome, then the summary.
    pub fn run<F>(&self, paths: &[PathBuf], mut emit: F) -> BatchSummary
    where
        F: FnMut(BatchEvent),
    {
        let batch_start = Instant::now();
        let mut summary = BatchSummary::new(Utc::now());
        info!(inputs = paths.len(), "starting batch");

        for (index, input) in paths.iter().enumerate() {
            let outcome = self.process_item(index, input);

            if outcome.is_success() {
                info!(input = %outcome.input.display(), "item converted");
            } else {
                warn!(message = %outcome.message(), "item failed");
            }

            emit(BatchEvent::ItemFinished(outcome.clone()));
            summary.record(outcome);
        }

        summary.duration_ms = batch_start.elapsed().as_millis() as u64;
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "batch finished"
        );

        emit(BatchEvent::Finished(summary.clone()));
        summary
    }

    fn process_item(&self, index: usize, input: &Path) -> ItemOutcome {
        let started = Instant::now();
        let input = input.to_path_buf();

        if !input.exists() {
            let error = RezipError::MissingInput {
                path: input.display().to_string(),
            };
            return ItemOutcome::failed(index, input, None, error.user_message(), 0);
        }

        let output = unique_output_path(&input, &self.suffix);
        let result = self.converter.convert(&input, &output);
        let elapsed = started.elapsed().as_millis() as u64;

        match result {
            Ok(pack) => ItemOutcome::converted(index, input, output, pack, elapsed),
            Err(error) => {
                let output = output.exists().then_some(output);
                ItemOutcome::failed(index, input, output, error.user_message(), elapsed)
            }
        }
    }

    /// Runs the batch on a dedicated blocking worker. `guard` is held by the
    /// worker and released when it ends.
    pub fn spawn(&self, paths: Vec<PathBuf>, guard: GateGuard) -> BatchHandle {
        let (sender, events) = mpsc::unbounded_channel();
        let runner = self.clone();

        let worker = task::spawn_blocking(move || {
            let _guard = guard;
            // The receiver may be gone; the batch still runs to completion
            runner.run(&paths, |event| {
                let _ = sender.send(event);
            })
        });

        BatchHandle { events, worker }
    }
}

pub struct BatchHandle {
    events: UnboundedReceiver<BatchEvent>,
    worker: JoinHandle<BatchSummary>,
}

impl BatchHandle {
    /// Next event from the worker; `None` once the worker is done and every
    /// event has been drained.
    pub async fn next_event(&mut self) -> Option<BatchEvent> {
        self.events.recv().await
    }

    pub async fn join(self) -> Result<BatchSummary> {
        self.worker.await.map_err(|e| RezipError::Worker {
            message: e.to_string(),
        })
    }
}
