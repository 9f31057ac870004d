//! Coordinator tests: fake scanners write output files and post events directly, so no
//! external scanner or filesystem notifications are involved.

use crossbeam_channel::{Sender, unbounded};
use recursive_scan::engine::{ScanProcess, Spawner, normalize};
use recursive_scan::pipeline::{Coordinator, ScanEvent};
use recursive_scan::utils::ScratchDir;
use recursive_scan::{ScanConfig, ScanError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// What one fake scan does when launched.
#[derive(Clone, Default)]
struct FakeScan {
    lines: Vec<&'static str>,
    /// Post `Closed` right away (scan finishes immediately).
    close: bool,
    /// Skip the `Appended` event (only the close is observed).
    silent: bool,
    /// Leave the last line without its newline.
    unterminated: bool,
    /// Exit without ever creating the output file.
    no_file: bool,
    /// Fail to start.
    fail: bool,
}

impl FakeScan {
    fn finished(lines: &[&'static str]) -> Self {
        Self {
            lines: lines.to_vec(),
            close: true,
            ..Self::default()
        }
    }

    fn running(lines: &[&'static str]) -> Self {
        Self {
            lines: lines.to_vec(),
            ..Self::default()
        }
    }
}

struct FakeProcess {
    exited: bool,
    terminated: Arc<AtomicUsize>,
}

impl ScanProcess for FakeProcess {
    fn try_finished(&mut self) -> bool {
        self.exited
    }

    fn terminate(&mut self) {
        self.terminated.fetch_add(1, Ordering::SeqCst);
    }
}

struct FakeSpawner {
    scans: HashMap<&'static str, FakeScan>,
    tx: Sender<ScanEvent>,
    launched: Arc<Mutex<Vec<String>>>,
    terminated: Arc<AtomicUsize>,
}

impl Spawner for FakeSpawner {
    fn spawn(&self, target: &str, output: &Path) -> Result<Box<dyn ScanProcess>, ScanError> {
        let scan = self.scans.get(target).cloned().unwrap_or_else(|| FakeScan::finished(&[]));
        if scan.fail {
            return Err(ScanError::Launch {
                command: format!("fake -u {target}"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such binary"),
            });
        }
        self.launched.lock().unwrap().push(target.to_string());
        if !scan.no_file {
            let mut body = scan.lines.join("\n");
            if !body.is_empty() && !scan.unterminated {
                body.push('\n');
            }
            std::fs::write(output, body)?;
            if !scan.silent {
                let _ = self.tx.send(ScanEvent::Appended(output.to_path_buf()));
            }
            if scan.close {
                let _ = self.tx.send(ScanEvent::Closed(output.to_path_buf()));
            }
        }
        Ok(Box::new(FakeProcess {
            exited: scan.no_file,
            terminated: Arc::clone(&self.terminated),
        }))
    }
}

struct Harness {
    _tmp: tempfile::TempDir,
    report_dir: PathBuf,
    scratch_path: PathBuf,
    tx: Sender<ScanEvent>,
    launched: Arc<Mutex<Vec<String>>>,
    terminated: Arc<AtomicUsize>,
    coordinator: Coordinator<FakeSpawner>,
}

fn harness(
    root: &str,
    extensions: &[&str],
    scans: Vec<(&'static str, FakeScan)>,
    tweak: impl FnOnce(&mut ScanConfig),
) -> Harness {
    let tmp = tempfile::tempdir().unwrap();
    let report_dir = tmp.path().join("reports");
    std::fs::create_dir(&report_dir).unwrap();

    let mut config = ScanConfig::new(root);
    config.extensions = extensions.iter().map(|s| s.to_string()).collect();
    config.debounce = Duration::from_millis(100);
    config.report_dir = report_dir.clone();
    tweak(&mut config);

    let scratch = ScratchDir::create_in(tmp.path()).unwrap();
    let scratch_path = scratch.path().to_path_buf();
    let (tx, rx) = unbounded();
    let launched = Arc::new(Mutex::new(Vec::new()));
    let terminated = Arc::new(AtomicUsize::new(0));
    let spawner = FakeSpawner {
        scans: scans.into_iter().collect(),
        tx: tx.clone(),
        launched: Arc::clone(&launched),
        terminated: Arc::clone(&terminated),
    };
    let coordinator = Coordinator::new(Arc::new(config), spawner, scratch, rx)
        .with_tick(Duration::from_millis(10));
    Harness {
        _tmp: tmp,
        report_dir,
        scratch_path,
        tx,
        launched,
        terminated,
        coordinator,
    }
}

fn report_file(h: &Harness, root: &str) -> PathBuf {
    h.report_dir.join(format!("recursive-scan_{}.log", normalize(root)))
}

// --- end to end ---

#[test]
fn test_recursion_one_child_and_sorted_report() {
    let h = harness(
        "http://x/",
        &["php"],
        vec![
            ("http://x/", FakeScan::finished(&["http://x/b.php", "http://x/a"])),
            ("http://x/a/", FakeScan::finished(&[])),
        ],
        |_| {},
    );
    let expected_report = report_file(&h, "http://x/");
    let summary = h.coordinator.run().unwrap();

    assert_eq!(*h.launched.lock().unwrap(), vec!["http://x/", "http://x/a/"]);
    assert_eq!(summary.report.as_deref(), Some(expected_report.as_path()));
    assert_eq!(summary.lines, 2);
    assert_eq!(summary.scans_completed, 2);
    assert!(!summary.interrupted);
    assert_eq!(
        std::fs::read_to_string(&expected_report).unwrap(),
        "http://x/a\nhttp://x/b.php\n"
    );
    assert!(!h.scratch_path.exists());
}

#[test]
fn test_multi_level_recursion_merges_all_files() {
    let h = harness(
        "http://x/",
        &["txt"],
        vec![
            ("http://x/", FakeScan::finished(&["http://x/z", "http://x/m"])),
            ("http://x/z/", FakeScan::finished(&["http://x/z/deep", "http://x/z/r.txt"])),
            ("http://x/m/", FakeScan::finished(&[])),
            ("http://x/z/deep/", FakeScan::finished(&["http://x/z/deep/k.txt"])),
        ],
        |_| {},
    );
    let report = report_file(&h, "http://x/");
    let launched_ref = Arc::clone(&h.launched);
    let summary = h.coordinator.run().unwrap();

    let mut got = launched_ref.lock().unwrap().clone();
    got.sort();
    assert_eq!(
        got,
        vec!["http://x/", "http://x/m/", "http://x/z/", "http://x/z/deep/"]
    );
    assert_eq!(summary.scans_completed, 4);
    assert_eq!(
        std::fs::read_to_string(report).unwrap(),
        "http://x/m\nhttp://x/z\nhttp://x/z/deep\nhttp://x/z/deep/k.txt\nhttp://x/z/r.txt\n"
    );
}

#[test]
fn test_duplicate_and_known_targets_launch_once() {
    let h = harness(
        "http://x/",
        &[],
        vec![
            (
                "http://x/",
                FakeScan::finished(&["http://x/a", "http://x/a", "http://x/a/"]),
            ),
            // points back at the root and at itself: both already known
            ("http://x/a/", FakeScan::finished(&["http://x/", "http://x/a"])),
        ],
        |_| {},
    );
    let launched_ref = Arc::clone(&h.launched);
    let summary = h.coordinator.run().unwrap();
    assert_eq!(*launched_ref.lock().unwrap(), vec!["http://x/", "http://x/a/"]);
    assert_eq!(summary.lines, 5);
}

#[test]
fn test_empty_output_writes_empty_report() {
    let h = harness("http://x/", &[], vec![], |_| {});
    let report = report_file(&h, "http://x/");
    let summary = h.coordinator.run().unwrap();
    // root file exists but is empty
    assert_eq!(summary.lines, 0);
    assert_eq!(std::fs::read_to_string(report).unwrap(), "");
}

#[test]
fn test_closed_without_appended_still_discovers() {
    let h = harness(
        "http://x/",
        &[],
        vec![(
            "http://x/",
            FakeScan {
                lines: vec!["http://x/a"],
                close: true,
                silent: true,
                ..FakeScan::default()
            },
        )],
        |_| {},
    );
    let summary = h.coordinator.run().unwrap();
    assert_eq!(*h.launched.lock().unwrap(), vec!["http://x/", "http://x/a/"]);
    assert_eq!(summary.scans_completed, 2);
}

// --- quiescence ---

#[test]
fn test_last_line_without_newline_is_scanned() {
    let h = harness(
        "http://x/",
        &[],
        vec![(
            "http://x/",
            FakeScan {
                lines: vec!["http://x/a", "http://x/b"],
                close: true,
                unterminated: true,
                ..FakeScan::default()
            },
        )],
        |_| {},
    );
    let report = report_file(&h, "http://x/");
    let summary = h.coordinator.run().unwrap();

    let mut launched = h.launched.lock().unwrap().clone();
    launched.sort();
    assert_eq!(launched, vec!["http://x/", "http://x/a/", "http://x/b/"]);
    assert_eq!(summary.scans_completed, 3);
    assert_eq!(
        std::fs::read_to_string(report).unwrap(),
        "http://x/a\nhttp://x/b\n"
    );
}

#[test]
fn test_line_after_quiet_period_starts_keeps_run_alive() {
    let h = harness(
        "http://x/",
        &[],
        vec![("http://x/late/", FakeScan::finished(&["http://x/late/f.txt"]))],
        |c| c.debounce = Duration::from_millis(400),
    );
    let root_out = h.scratch_path.join(normalize("http://x/"));
    let tx = h.tx.clone();
    let writer = thread::spawn(move || {
        // root has closed by now and the run is quiescing
        thread::sleep(Duration::from_millis(100));
        std::fs::write(&root_out, "http://x/late\n").unwrap();
        tx.send(ScanEvent::Appended(root_out)).unwrap();
    });
    let launched_ref = Arc::clone(&h.launched);
    let summary = h.coordinator.run().unwrap();
    writer.join().unwrap();

    assert_eq!(
        *launched_ref.lock().unwrap(),
        vec!["http://x/", "http://x/late/"]
    );
    assert_eq!(summary.lines, 2);
}

#[test]
fn test_scanner_exiting_without_file_completes() {
    let h = harness(
        "http://x/",
        &[],
        vec![(
            "http://x/",
            FakeScan {
                no_file: true,
                ..FakeScan::default()
            },
        )],
        |_| {},
    );
    let summary = h.coordinator.run().unwrap();
    assert_eq!(summary.scans_completed, 1);
    assert!(summary.report.is_none());
    assert!(!h.scratch_path.exists());
}

// --- interrupt ---

#[test]
fn test_interrupt_reports_partial_results() {
    let h = harness(
        "http://x/",
        &["php"],
        vec![
            ("http://x/", FakeScan::running(&["http://x/a", "http://x/i.php"])),
            ("http://x/a/", FakeScan::running(&["http://x/a/b.php"])),
        ],
        |c| c.debounce = Duration::from_secs(30),
    );
    let report = report_file(&h, "http://x/");
    let tx = h.tx.clone();
    let interrupter = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        tx.send(ScanEvent::Interrupt).unwrap();
    });
    let summary = h.coordinator.run().unwrap();
    interrupter.join().unwrap();

    assert!(summary.interrupted);
    assert_eq!(summary.scans_completed, 0);
    assert_eq!(h.terminated.load(Ordering::SeqCst), 0);
    assert_eq!(
        std::fs::read_to_string(report).unwrap(),
        "http://x/a\nhttp://x/a/b.php\nhttp://x/i.php\n"
    );
    assert!(!h.scratch_path.exists());
}

#[test]
fn test_interrupt_kills_scanners_when_asked() {
    let h = harness(
        "http://x/",
        &[],
        vec![
            ("http://x/", FakeScan::running(&["http://x/a"])),
            ("http://x/a/", FakeScan::running(&[])),
        ],
        |c| {
            c.debounce = Duration::from_secs(30);
            c.kill_on_interrupt = true;
        },
    );
    let tx = h.tx.clone();
    let terminated = Arc::clone(&h.terminated);
    let interrupter = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        tx.send(ScanEvent::Interrupt).unwrap();
    });
    let summary = h.coordinator.run().unwrap();
    interrupter.join().unwrap();
    assert!(summary.interrupted);
    assert_eq!(terminated.load(Ordering::SeqCst), 2);
}

// --- fatal errors ---

#[test]
fn test_root_launch_failure_is_fatal_and_cleans_up() {
    let h = harness(
        "http://x/",
        &[],
        vec![(
            "http://x/",
            FakeScan {
                fail: true,
                ..FakeScan::default()
            },
        )],
        |_| {},
    );
    let report = report_file(&h, "http://x/");
    let err = h.coordinator.run().unwrap_err();
    let scan_err = err.downcast_ref::<ScanError>().unwrap();
    assert!(scan_err.is_launch_error());
    assert!(!report.exists());
    assert!(!h.scratch_path.exists());
}

#[test]
fn test_child_launch_failure_still_reports_root_results() {
    let h = harness(
        "http://x/",
        &[],
        vec![
            ("http://x/", FakeScan::running(&["http://x/a"])),
            (
                "http://x/a/",
                FakeScan {
                    fail: true,
                    ..FakeScan::default()
                },
            ),
        ],
        |_| {},
    );
    let report = report_file(&h, "http://x/");
    let err = h.coordinator.run().unwrap_err();
    assert!(err.downcast_ref::<ScanError>().unwrap().is_launch_error());
    assert_eq!(std::fs::read_to_string(report).unwrap(), "http://x/a\n");
    assert!(!h.scratch_path.exists());
}

#[test]
fn test_close_for_unknown_target_is_fatal() {
    let h = harness(
        "http://x/",
        &[],
        vec![("http://x/", FakeScan::running(&[]))],
        |_| {},
    );
    h.tx
        .send(ScanEvent::Closed(h.scratch_path.join("bogus")))
        .unwrap();
    let err = h.coordinator.run().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScanError>(),
        Some(ScanError::RegistryConsistency { id }) if id == "bogus"
    ));
    assert!(!h.scratch_path.exists());
}
