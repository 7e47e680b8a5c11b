//! End-to-end orchestration of one daily report run.
//!
//! One invocation per date: load → segment → group → chunk → generate →
//! merge → render → atomic write. Each run owns its whole working set; no
//! state is shared across dates.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::chunking;
use crate::config::Config;
use crate::llm::{ChunkPayload, LlmClient};
use crate::models::{GenerationResult, Report};
use crate::report;
use crate::segmentation::{self, Session};
use crate::storage;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Generate, render and atomically persist the report for one date.
///
/// Fatal only for configuration problems, run-level I/O failures and
/// cancellation; a chunk whose generation fails is annotated in the
/// document instead of aborting the run, and a day without records renders
/// a placeholder report.
pub async fn generate_report_for_date(
    date: NaiveDate,
    config: &Config,
    cancel: CancellationToken,
) -> Result<Report> {
    config.validate()?;

    let base_dir = Path::new(&config.storage.base_dir);
    let log_dir = base_dir.join(&config.storage.log_subdir);
    let report_dir = base_dir.join(&config.storage.report_subdir);

    let timestamp = config
        .report
        .add_timestamp
        .then(|| chrono::Local::now().format(&config.report.timestamp_format).to_string());

    let records = storage::load_records_for_date(&log_dir, date)?;

    if records.is_empty() {
        log::warn!("no records for {date}, writing placeholder report");
        let document = report::render_empty_report(date);
        let path = report::save_report(&document, &report_dir, date, timestamp.as_deref())?;
        return Ok(Report {
            date,
            body: String::new(),
            document,
            path,
        });
    }

    let sessions: Vec<Session> =
        segmentation::split_into_sessions(&records, config.report.group_gap_minutes).collect();
    log_info!(
        "split {} records into {} sessions (gap {} min)",
        records.len(),
        sessions.len(),
        config.report.group_gap_minutes
    );

    let groups = segmentation::group_sessions(&sessions);
    let chunks = chunking::build_chunks(&groups, sessions.len(), config.report.chunk_chars);
    let payloads: Vec<ChunkPayload> = chunks.iter().map(ChunkPayload::from_chunk).collect();

    let client = LlmClient::new(config);
    let results = generate_all(client, payloads, date, config.llm.parallelism, &cancel).await?;

    let body = report::merge_results(&results);
    let document = report::render_report(date, &body);

    if cancel.is_cancelled() {
        bail!("run cancelled before the report was written");
    }

    let path = report::save_report(&document, &report_dir, date, timestamp.as_deref())?;
    let failed = results.iter().filter(|result| !result.is_success()).count();
    if failed > 0 {
        log::warn!(
            "report for {date} written with {failed}/{} failed chunks",
            results.len()
        );
    }

    Ok(Report {
        date,
        body,
        document,
        path,
    })
}

/// Run generation for every chunk, sequentially by default or on a bounded
/// worker pool. Completions may arrive out of order in the parallel case;
/// results are buffered by chunk index so the merge never depends on
/// timing. Exactly one result per chunk, or an error when the run was
/// cancelled mid-flight.
async fn generate_all(
    client: LlmClient,
    payloads: Vec<ChunkPayload>,
    date: NaiveDate,
    parallelism: usize,
    cancel: &CancellationToken,
) -> Result<Vec<GenerationResult>> {
    let total = payloads.len();

    if parallelism <= 1 {
        let mut results = Vec::with_capacity(total);
        for payload in &payloads {
            tokio::select! {
                result = client.generate_chunk(payload, date, total) => results.push(result),
                _ = cancel.cancelled() => bail!("run cancelled during generation"),
            }
        }
        return Ok(results);
    }

    log_info!("generating {total} chunks with {parallelism} workers");

    let client = Arc::new(client);
    let semaphore = Arc::new(Semaphore::new(parallelism));
    let mut tasks = JoinSet::new();

    for payload in payloads {
        let client = Arc::clone(&client);
        let semaphore = Arc::clone(&semaphore);
        let cancel = cancel.clone();

        tasks.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return None,
            };
            tokio::select! {
                result = client.generate_chunk(&payload, date, total) => Some(result),
                _ = cancel.cancelled() => None,
            }
        });
    }

    let mut slots: Vec<Option<GenerationResult>> = (0..total).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined.context("generation worker panicked")? {
            Some(result) => {
                let index = result.chunk_index;
                slots[index] = Some(result);
            }
            None => bail!("run cancelled during generation"),
        }
    }

    let mut results = Vec::with_capacity(total);
    for (index, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(result) => results.push(result),
            None => bail!("chunk {index} produced no result"),
        }
    }
    Ok(results)
}
