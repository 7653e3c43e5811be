use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::args::TesterArgs;
use crate::error::{AppResult, MetricsError};
use crate::metrics::{LatencySample, LatencyStats, RunReport, Summary, ThroughputSample};

pub(crate) async fn write_exports(
    args: &TesterArgs,
    report: &RunReport,
    started_at: DateTime<Utc>,
) -> AppResult<()> {
    if let Some(path) = args.export_csv.as_deref() {
        export_csv(Path::new(path), &report.samples).await?;
    }
    if let Some(path) = args.export_throughput_csv.as_deref() {
        export_throughput_csv(Path::new(path), &report.summary.timeline).await?;
    }
    if let Some(path) = args.export_json.as_deref() {
        export_json(Path::new(path), &report.summary, &report.samples, started_at).await?;
    }
    Ok(())
}

pub(crate) async fn export_csv(path: &Path, samples: &[LatencySample]) -> Result<(), MetricsError> {
    let export_err = export_error(path, "csv export");
    let file = tokio::fs::File::create(path).await.map_err(export_err)?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(b"elapsed_ms,latency_ms,success,attempts\n")
        .await
        .map_err(export_err)?;
    for sample in samples {
        let line = format!(
            "{},{},{},{}\n",
            sample.completed_at.as_millis(),
            sample.latency.as_millis(),
            u8::from(sample.success),
            sample.attempts
        );
        writer.write_all(line.as_bytes()).await.map_err(export_err)?;
    }
    writer.flush().await.map_err(export_err)?;
    Ok(())
}

/// One row per second of the run, in the `time,throughput` layout.
pub(crate) async fn export_throughput_csv(
    path: &Path,
    timeline: &[ThroughputSample],
) -> Result<(), MetricsError> {
    let export_err = export_error(path, "throughput export");
    let file = tokio::fs::File::create(path).await.map_err(export_err)?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(b"time,throughput\n")
        .await
        .map_err(export_err)?;
    for sample in timeline {
        let line = format!("{},{:.2}\n", sample.second, sample.requests as f64);
        writer.write_all(line.as_bytes()).await.map_err(export_err)?;
    }
    writer.flush().await.map_err(export_err)?;
    Ok(())
}

pub(crate) async fn export_json(
    path: &Path,
    summary: &Summary,
    samples: &[LatencySample],
    started_at: DateTime<Utc>,
) -> Result<(), MetricsError> {
    let samples_json: Vec<serde_json::Value> = samples
        .iter()
        .map(|sample| {
            serde_json::json!({
                "elapsed_ms": sample.completed_at.as_millis(),
                "latency_ms": sample.latency.as_millis(),
                "success": sample.success,
                "attempts": sample.attempts
            })
        })
        .collect();
    let timeline_json: Vec<serde_json::Value> = summary
        .timeline
        .iter()
        .map(|sample| serde_json::json!({ "time": sample.second, "throughput": sample.requests }))
        .collect();

    let summary_json = serde_json::json!({
        "started_at": started_at.to_rfc3339(),
        "duration_ms": summary.duration.as_millis(),
        "total_requests": summary.total_requests,
        "success_count": summary.success_count,
        "error_count": summary.error_count,
        "attempts": summary.attempts,
        "throughput_rps": summary.throughput_rps,
        "latency": stats_json(summary.latency.as_ref()),
        "success_latency": stats_json(summary.success_latency.as_ref()),
        "timeline": timeline_json
    });

    let payload = serde_json::json!({
        "summary": summary_json,
        "samples": samples_json
    });
    let json = serde_json::to_vec_pretty(&payload)
        .map_err(|err| MetricsError::EncodeJson { source: err })?;
    write_file(path, &json, "json export").await
}

fn stats_json(stats: Option<&LatencyStats>) -> serde_json::Value {
    stats.map_or(serde_json::Value::Null, |stats| {
        serde_json::json!({
            "count": stats.count,
            "mean_ms": stats.mean_ms,
            "median_ms": stats.median_ms,
            "p99_ms": stats.p99_ms,
            "min_ms": stats.min_ms,
            "max_ms": stats.max_ms
        })
    })
}

async fn write_file(path: &Path, bytes: &[u8], context: &'static str) -> Result<(), MetricsError> {
    let export_err = export_error(path, context);
    let file = tokio::fs::File::create(path).await.map_err(export_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes).await.map_err(export_err)?;
    writer.flush().await.map_err(export_err)?;
    Ok(())
}

fn export_error<'path>(
    path: &'path Path,
    context: &'static str,
) -> impl Fn(std::io::Error) -> MetricsError + Copy + 'path {
    move |err| MetricsError::Export {
        context,
        path: PathBuf::from(path),
        source: err,
    }
}
