use std::{
    fs::File,
    io::{BufRead, BufReader},
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use ppe_compliance::{
    AlertTrigger, ComplianceConfig, ComplianceContext, MediaSource, Notification, Notifier,
    SqliteTallyStore, TallyCommit, TallyStore, TrackedDetection, init_tracing,
};
use tracing::{info, warn};

const USAGE: &str = "usage: ppe-compliance <frames.jsonl> [config.toml]

The first line of frames.jsonl describes the upload, e.g.
  {\"filename\": \"gate.mp4\", \"size_bytes\": 1048576}
every following line is one frame's tracker output, e.g.
  [{\"track_id\": 1, \"label\": \"helmet\", \"confidence\": 0.91}]";

/// Prints alerts to stderr in place of a mail client.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn send(&self, notification: &Notification) -> ppe_compliance::Result<()> {
        eprintln!(
            "To: {}\nSubject: {}\n",
            notification.recipients.join(", "),
            notification.subject
        );
        eprintln!("{}", notification.render_html());
        for attachment in &notification.attachments {
            eprintln!("Attachment: {}", attachment.display());
        }
        Ok(())
    }
}

fn open_store(config: &ComplianceConfig) -> ppe_compliance::Result<SqliteTallyStore> {
    match &config.storage.database_path {
        Some(path) => SqliteTallyStore::open(path),
        None => SqliteTallyStore::open_in_memory(),
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();
    let Some(frames_path) = args.get(1) else {
        bail!(USAGE);
    };

    let config = match args.get(2) {
        Some(path) => ComplianceConfig::from_path(path)
            .with_context(|| format!("loading config from {path}"))?,
        None => ComplianceConfig::default(),
    };
    let context = Arc::new(ComplianceContext::from_config(&config)?);

    let reader = BufReader::new(
        File::open(frames_path).with_context(|| format!("opening {frames_path}"))?,
    );
    let mut lines = reader.lines();
    let header = lines.next().context("frames file is empty")??;
    let source: MediaSource =
        serde_json::from_str(&header).context("first line must describe the upload")?;

    let mut session = context.start_session(&source)?;
    for (index, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let detections: Vec<TrackedDetection> = match serde_json::from_str(&line) {
            Ok(detections) => detections,
            Err(e) => {
                session.abort("unreadable frame");
                bail!("frame {} is not valid tracker output: {e}", index + 1);
            }
        };
        session.observe_frame(detections);
    }

    let report = match open_store(&config) {
        Ok(store) => session.finish(Some(&store as &dyn TallyStore), &source.filename),
        Err(e) => {
            warn!(error = %e, "tally store unavailable");
            let mut report = session.finish(None, &source.filename);
            report.tally = TallyCommit::Failed {
                message: e.to_string(),
            };
            report
        }
    };
    if let Some(alert) = &report.alert {
        AlertTrigger::dispatch(&StderrNotifier, alert);
    }
    info!(tally = ?report.tally, "replay complete");
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
