use anyhow::Context;
use depth_cloud_rs::cli::{self, CliAction};
use depth_cloud_rs::depth_pipeline::pipelines::LoopSummary;
use depth_cloud_rs::depth_pipeline::{
    CancellationToken, CaptureLoop, DeviceSession, FrameAcquirer, PipelineConfig, PreviewStage, SnapshotSink,
    SyntheticDeviceConfig, SyntheticDriver,
};
use depth_cloud_rs::logger;

use tracing::{error, info, warn};

const SNAPSHOT_DIR: &str = "snapshots/depth-viewer";

fn main() {
    logger::init();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "depth-viewer".to_string());
    println!("{}", cli::version());
    println!("{}", cli::usage(&program));

    let parsed = cli::parse_args(args);
    for arg in &parsed.unknown {
        warn!("Unknown argument: {}", arg);
    }

    let serial = match parsed.action {
        CliAction::Help | CliAction::Version => std::process::exit(0),
        CliAction::Run { serial } => serial,
    };

    let code = match run(serial.as_deref()) {
        Ok(summary) => {
            info!(frames = summary.frames, reason = ?summary.reason, "Goodbye");
            0
        }
        Err(e) => {
            error!("{:#}", e);
            -1
        }
    };
    std::process::exit(code);
}

fn run(serial: Option<&str>) -> anyhow::Result<LoopSummary> {
    let config = PipelineConfig::viewer();

    let cancel = CancellationToken::new();
    cancel
        .cancel_on_interrupt()
        .context("failed to install interrupt handler")?;

    let mut driver = SyntheticDriver::single(SyntheticDeviceConfig::default());
    let session = DeviceSession::open(&mut driver, serial, &config.frame_kinds)?;
    let acquirer = FrameAcquirer::new(session, &config.frame_kinds);

    let sink = SnapshotSink::new(SNAPSHOT_DIR, config.snapshot_every, config.snapshot_compression)?;
    info!(dir = SNAPSHOT_DIR, "Esc or Ctrl-C to quit");
    let stage = PreviewStage::new(sink, config.clone());

    let mut capture = CaptureLoop::new(acquirer, stage, config);
    let summary = capture.run(&cancel)?;
    capture.shutdown();

    Ok(summary)
}
