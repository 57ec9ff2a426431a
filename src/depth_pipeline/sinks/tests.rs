use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::depth_pipeline::common::types::{Point3D, PointCloud};
use crate::depth_pipeline::sinks::{
    CameraPose, DisplayImage, DisplaySink, Key, PointCloudViewer, SnapshotCompression, SnapshotSink, TerminalKeys,
    TracingViewer, encode_tiff,
};
use crate::depth_pipeline::sinks::terminal_keys::key_from_event;

fn is_tiff(bytes: &[u8]) -> bool {
    bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*")
}

fn quiet_sink(dir: &std::path::Path, every: u64) -> SnapshotSink {
    SnapshotSink::new(dir, every, SnapshotCompression::None)
        .unwrap()
        .with_keys(TerminalKeys::disabled())
}

#[test]
fn test_encode_gray_and_rgb_tiff() {
    let gray = DisplayImage::Gray(GrayImage::from_pixel(4, 3, Luma([200])));
    let rgb = DisplayImage::Rgb(RgbImage::from_pixel(4, 3, Rgb([1, 2, 3])));

    for compression in [SnapshotCompression::None, SnapshotCompression::Lzw, SnapshotCompression::Deflate] {
        let mut gray_out = Vec::new();
        encode_tiff(&gray, &mut gray_out, compression).unwrap();
        assert!(is_tiff(&gray_out));

        let mut rgb_out = Vec::new();
        encode_tiff(&rgb, &mut rgb_out, compression).unwrap();
        assert!(is_tiff(&rgb_out));
    }
}

#[test]
fn test_uncompressed_tiff_holds_pixels() {
    let image = DisplayImage::Gray(GrayImage::from_pixel(16, 16, Luma([7])));
    let mut output = Vec::new();
    encode_tiff(&image, &mut output, SnapshotCompression::None).unwrap();
    assert!(output.len() >= 16 * 16);
}

#[test]
fn test_snapshot_path_naming() {
    let dir = tempfile::tempdir().unwrap();
    let sink = quiet_sink(dir.path(), 1);

    assert_eq!(sink.path_for("Filtered RGB"), dir.path().join("filtered-rgb.tiff"));
    assert_eq!(sink.path_for("IR"), dir.path().join("ir.tiff"));
}

#[test]
fn test_snapshot_sink_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");

    let sink = quiet_sink(&nested, 1);

    assert!(nested.is_dir());
    assert_eq!(sink.dir(), nested.as_path());
}

#[test]
fn test_snapshot_sink_writes_every_nth_frame() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = quiet_sink(dir.path(), 2);
    let image = DisplayImage::Gray(GrayImage::from_pixel(2, 2, Luma([0])));

    // frame 0 is written
    sink.show("Depth", &image).unwrap();
    let path = sink.path_for("Depth");
    assert!(is_tiff(&std::fs::read(&path).unwrap()));
    std::fs::remove_file(&path).unwrap();
    assert_eq!(sink.wait_key(0).unwrap(), None);

    // frame 1 is skipped
    sink.show("Depth", &image).unwrap();
    assert!(!path.exists());
    sink.wait_key(0).unwrap();

    // frame 2 is written again
    sink.show("Depth", &image).unwrap();
    assert!(path.exists());
}

#[test]
fn test_key_codes() {
    assert_eq!(Key::Escape.code(), 27);
    assert_eq!(Key::Char('p').code(), 'p' as i32);
}

#[test]
fn test_default_pose_looks_down_negative_y() {
    let pose = CameraPose::default();
    assert_eq!(pose.eye, [0.0, 0.0, 0.0]);
    assert_eq!(pose.target, [0.0, -1.0, 0.0]);
    assert_eq!(pose.up, [0.0, 0.0, 1.0]);
}

#[test]
fn test_tracing_viewer_counts_frames() {
    let mut viewer = TracingViewer::new();
    let cloud = PointCloud {
        width: 1,
        height: 1,
        points: vec![Point3D::new(0.0, -1.0, 0.0)],
    };

    viewer.render(&cloud, &CameraPose::default()).unwrap();
    viewer.render(&PointCloud::default(), &CameraPose::default()).unwrap();

    assert_eq!(viewer.rendered(), 2);
}

#[test]
fn test_terminal_key_mapping() {
    let press = |code, modifiers| KeyEvent::new(code, modifiers);

    assert_eq!(key_from_event(press(KeyCode::Esc, KeyModifiers::NONE)), Some(Key::Escape));
    assert_eq!(key_from_event(press(KeyCode::Char('p'), KeyModifiers::NONE)), Some(Key::Char('p')));
    // raw mode delivers Ctrl-C as a key instead of a signal
    assert_eq!(key_from_event(press(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(Key::Escape));
    assert_eq!(key_from_event(press(KeyCode::Enter, KeyModifiers::NONE)), None);

    let mut release = press(KeyCode::Esc, KeyModifiers::NONE);
    release.kind = KeyEventKind::Release;
    assert_eq!(key_from_event(release), None);
}

#[test]
fn test_disabled_terminal_keys_never_report() {
    let mut keys = TerminalKeys::disabled();
    assert_eq!(keys.poll(std::time::Duration::ZERO), None);
}
