//! End-to-end runs of the whole sequence against scratch files.

use fdshare::{run_demo, DemoConfig, ErrorKind, Stage};
use serial_test::serial;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer().with_timer(fmt::time::uptime()))
        .try_init();
}

fn scratch() -> (tempfile::TempDir, DemoConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = DemoConfig::with_path(dir.path().join("file.txt"));
    (dir, config)
}

#[test]
#[serial]
fn fresh_file_end_to_end() {
    init_tracing();
    let (_dir, config) = scratch();

    let mut out = Vec::new();
    let summary = run_demo(&config, &mut out).unwrap();
    info!(offsets = ?summary.offsets, "checkpoints");

    // aaaaa | bbbbb\0\0 | ccc
    let file = summary.file.as_ref().unwrap();
    assert_eq!(file.size, 15);
    assert_eq!(file.contents, b"aaaaabbbbb\0\0ccc");

    assert_eq!(summary.bytes_read, 15);
    assert_eq!(summary.string_len, 10);
    assert!(summary.buffer[15..].iter().all(|&b| b == 0));

    let text = String::from_utf8(out).unwrap();
    let expected_prefix = format!(
        "\nnewfd1 = {}\nnewfd2, which points to same open file description as newfd1: {}\n\
         \nOpen file access flags for fd1 and fd2 are the same.\n\
         \noffset1: 0, offset2: 0\nFile offsets for fd1 and fd2 are the same\n\
         \nChecking offsets after writing 5 characters to newfd1\n\
         \noffset1: 5, offset2: 5\nFile offsets for fd1 and fd2 are the same\n\
         \nChecking offsets after writing 7 characters to newfd2\n\
         File holes shouldn't matter for the offsets.\n\
         \noffset1: 12, offset2: 12\nFile offsets for fd1 and fd2 are the same\n\
         \nChecking offsets after writing 3 characters to newfd2\n\
         \noffset1: 15, offset2: 15\nFile offsets for fd1 and fd2 are the same\n",
        summary.primary_fd, summary.duplicate_fd
    );
    assert!(text.starts_with(&expected_prefix), "unexpected output:\n{}", text);

    // string view stops at the first zero byte
    assert!(text.contains("###############\n\naaaaabbbbb\n\n##############\n\n"));
    assert!(text.contains("sizeof(filebuf) = 50. strlen(filebuf) = 10\n"));
    assert!(text.contains("stopped at the file hole, but the read() function didn't."));

    // buffer dump: one character per byte, 50 in total
    let buffer_dump = format!("aaaaabbbbb  ccc{}", " ".repeat(35));
    assert!(text.contains(&format!("##############\n\n{}\n\n##############", buffer_dump)));

    // file dump: only the 15 bytes on disk
    assert!(text.contains("File contains 15 bytes.\n"));
    assert!(text.contains("Printing all characters in file:\n\n##############\n\naaaaabbbbb  ccc\n\n##############\n\n"));
    assert!(text.ends_with("We're golden.\n"));
}

#[test]
#[serial]
fn rerun_overwrites_without_truncating() {
    init_tracing();
    let (_dir, config) = scratch();
    std::fs::write(&config.path, b"xxxxxxxxxxxxxxxxxxxx").unwrap();

    let mut out = Vec::new();
    let summary = run_demo(&config, &mut out).unwrap();

    let file = summary.file.as_ref().unwrap();
    assert_eq!(file.size, 20);
    assert_eq!(file.contents, b"aaaaabbbbb\0\0cccxxxxx");
    assert_eq!(summary.bytes_read, 20);
    assert_eq!(summary.string_len, 10);

    // a second run lands on exactly the same bytes
    let mut out = Vec::new();
    let again = run_demo(&config, &mut out).unwrap();
    assert_eq!(again.file.unwrap().contents, file.contents);
}

#[test]
#[serial]
fn offsets_stay_equal_at_every_checkpoint() {
    init_tracing();
    let (_dir, config) = scratch();

    let mut out = Vec::new();
    let summary = run_demo(&config, &mut out).unwrap();
    assert_eq!(summary.offsets.len(), 5);
    for report in &summary.offsets {
        assert_eq!(report.first, report.second);
    }
    // offsets only move forward until the rewind
    let before_rewind: Vec<u64> = summary.offsets[..4].iter().map(|r| r.first).collect();
    assert!(before_rewind.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
#[serial]
fn unopenable_path_reports_open_error() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config = DemoConfig::with_path(dir.path().join("absent").join("file.txt"));

    let mut out = Vec::new();
    let failure = run_demo(&config, &mut out).unwrap_err();
    assert_eq!(failure.stage, Stage::Start);
    assert_eq!(failure.error.kind, ErrorKind::Open);
    assert_eq!(failure.error.syscall, "open");
    assert!(failure.error.to_string().starts_with("open: No such file or directory"));
}

#[test]
#[serial]
fn small_buffer_bounds_the_read() {
    init_tracing();
    let (_dir, mut config) = scratch();
    config.read_buf_size = 8;

    let mut out = Vec::new();
    let summary = run_demo(&config, &mut out).unwrap();
    // capacity, not file size, bounds the read
    assert_eq!(summary.bytes_read, 8);
    assert_eq!(summary.buffer, b"aaaaabbb");
    assert_eq!(summary.string_len, 8);
    assert_eq!(summary.offsets[4].first, 8);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("No zero byte among the 8 bytes read"));
}
