//! Destinations for mapped measurement requests
//!
//! The import pipeline only produces requests. Where they go is decided once,
//! when the caller picks a [`MeasurementSink`]: a JSON Lines file for handing
//! off to the measurement API client, or memory for tests and dry runs.

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};

use crate::app::models::MeasurementCreateRequest;
use crate::app::services::mapper::chunk_measurements;
use crate::constants::MAX_BATCH_SIZE;
use crate::{Error, Result};

/// Receives measurement requests in batches of at most [`MAX_BATCH_SIZE`]
#[async_trait]
pub trait MeasurementSink: Send {
    /// Short description for logs
    fn describe(&self) -> String;

    /// Submit one batch, returning the number of accepted requests
    async fn submit_batch(&mut self, batch: &[MeasurementCreateRequest]) -> Result<usize>;
}

fn check_batch_size(batch: &[MeasurementCreateRequest]) -> Result<()> {
    if batch.len() > MAX_BATCH_SIZE {
        return Err(Error::submission(format!(
            "Batch of {} exceeds the maximum of {} measurements",
            batch.len(),
            MAX_BATCH_SIZE
        )));
    }
    Ok(())
}

// =============================================================================
// JSON Lines Sink
// =============================================================================

/// Writes one JSON request object per line
pub struct JsonLinesSink {
    path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl JsonLinesSink {
    /// Create (or truncate) the output file
    pub async fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .await
            .map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))?;
        Ok(Self::from_file(path, file))
    }

    /// Append to an existing file, creating it when absent
    pub async fn append(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;
        Ok(Self::from_file(path, file))
    }

    fn from_file(path: &Path, file: File) -> Self {
        Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            written: 0,
        }
    }

    /// Number of requests written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered output and return the number of requests written
    pub async fn finish(mut self) -> Result<usize> {
        self.writer
            .flush()
            .await
            .map_err(|e| Error::io(format!("Failed to flush {}", self.path.display()), e))?;
        Ok(self.written)
    }
}

#[async_trait]
impl MeasurementSink for JsonLinesSink {
    fn describe(&self) -> String {
        format!("JSON Lines file {}", self.path.display())
    }

    async fn submit_batch(&mut self, batch: &[MeasurementCreateRequest]) -> Result<usize> {
        check_batch_size(batch)?;

        for request in batch {
            let mut line = serde_json::to_string(request)
                .map_err(|e| Error::json("Failed to serialize measurement request", e))?;
            line.push('\n');
            self.writer
                .write_all(line.as_bytes())
                .await
                .map_err(|e| Error::io(format!("Failed to write {}", self.path.display()), e))?;
        }
        self.writer
            .flush()
            .await
            .map_err(|e| Error::io(format!("Failed to flush {}", self.path.display()), e))?;

        self.written += batch.len();
        Ok(batch.len())
    }
}

// =============================================================================
// Memory Sink
// =============================================================================

/// Keeps submitted batches in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    batches: Vec<Vec<MeasurementCreateRequest>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> &[Vec<MeasurementCreateRequest>] {
        &self.batches
    }

    /// All submitted requests in submission order
    pub fn measurements(&self) -> impl Iterator<Item = &MeasurementCreateRequest> {
        self.batches.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MeasurementSink for MemorySink {
    fn describe(&self) -> String {
        "in-memory sink".to_string()
    }

    async fn submit_batch(&mut self, batch: &[MeasurementCreateRequest]) -> Result<usize> {
        check_batch_size(batch)?;
        self.batches.push(batch.to_vec());
        Ok(batch.len())
    }
}

// =============================================================================
// Chunked Submission
// =============================================================================

/// Totals of a chunked submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionSummary {
    pub batches: usize,
    pub submitted: usize,
}

/// Submit requests sequentially in chunks of `batch_size`
///
/// Stops at the first failing batch; earlier batches stay submitted.
pub async fn submit_in_chunks<S: MeasurementSink + ?Sized>(
    sink: &mut S,
    measurements: &[MeasurementCreateRequest],
    batch_size: usize,
    show_progress: bool,
) -> Result<SubmissionSummary> {
    let chunks = chunk_measurements(measurements, batch_size.min(MAX_BATCH_SIZE));
    info!(
        "Submitting {} measurements in {} batches to {}",
        measurements.len(),
        chunks.len(),
        sink.describe()
    );

    let progress = show_progress.then(|| create_submission_progress_bar(measurements.len() as u64));
    let mut summary = SubmissionSummary::default();

    for (index, chunk) in chunks.iter().enumerate() {
        let accepted = sink.submit_batch(chunk).await.map_err(|e| {
            if let Some(pb) = &progress {
                pb.abandon_with_message("submission failed");
            }
            e
        })?;
        debug!("Batch {} accepted {} measurements", index + 1, accepted);

        summary.batches += 1;
        summary.submitted += accepted;
        if let Some(pb) = &progress {
            pb.inc(chunk.len() as u64);
        }
    }

    if let Some(pb) = progress {
        pb.finish_with_message("submitted");
    }
    Ok(summary)
}

fn create_submission_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message("submitting");
    pb
}
