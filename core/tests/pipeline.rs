//! End-to-end: log file -> follower -> parser -> tracker -> notifier

use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dropwatch_core::{
    ClearReason, DropEvents, DropTimings, DropTracker, LogFollower, LogParser, Messages, Notifier,
    NotifyError, SectorMap,
};
use dropwatch_types::Language;
use tempfile::NamedTempFile;

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

fn append(path: &Path, text: &str) {
    let mut file = std::fs::OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(text.as_bytes()).unwrap();
}

async fn wait_for_messages(notifier: &RecordingNotifier, count: usize) -> Vec<String> {
    for _ in 0..500 {
        let sent = notifier.sent();
        if sent.len() >= count {
            return sent;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("expected {count} messages, got {:?}", notifier.sent());
}

fn tracker(notifier: &Arc<RecordingNotifier>) -> Arc<DropTracker<RecordingNotifier>> {
    Arc::new(DropTracker::new(
        DropTimings::from_secs(5.0, 10.0, 20.0),
        Arc::new(SectorMap::scum()),
        Messages::new(Language::En),
        Arc::clone(notifier),
    ))
}

#[tokio::test]
async fn spawn_then_restart_notifies_both() {
    let log = NamedTempFile::new().unwrap();
    append(log.path(), "[2025.09.24-11.59.00:000] Cargo drop spawned at: 1.0, 1.0, 1.0\n");

    let notifier = Arc::new(RecordingNotifier::default());
    let tracker = tracker(&notifier);
    let follower = LogFollower::open(log.path(), Duration::from_millis(10)).await.unwrap();
    let parser = LogParser::new(Arc::clone(&tracker));
    let task = tokio::spawn(parser.follow(follower));

    append(
        log.path(),
        "[2025.09.24-12.00.54:722] Cargo drop spawned at: 100.0, 200.0, 0.0\n\
         [2025.09.24-12.05.00:000] LogSCUM: Server is restarting\n",
    );

    let sent = wait_for_messages(&notifier, 2).await;
    task.abort();

    // History before startup is not replayed
    assert_eq!(sent.len(), 2);
    assert!(sent[0].starts_with("🗺️ Drop **B2** with coordinates 📍 100.000, 200.000, 0.000\n"));
    assert_eq!(
        sent[1],
        "🗺️ Drop **B2** at coordinates 📍 100.000, 200.000, 0.000 🛑 disappeared due to server restart."
    );
    assert_eq!(tracker.active_count().await, 0);
}

#[tokio::test]
async fn watchdog_clear_and_log_clear_do_not_double_notify() {
    let log = NamedTempFile::new().unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    let tracker = tracker(&notifier);
    let follower = LogFollower::open(log.path(), Duration::from_millis(10)).await.unwrap();
    let task = tokio::spawn(LogParser::new(Arc::clone(&tracker)).follow(follower));

    append(
        log.path(),
        "[2025.09.24-12.00.54:722] Cargo drop spawned at: -400000.0, -400000.0, 0.0\n",
    );
    wait_for_messages(&notifier, 1).await;

    // Process death observed first, then the shutdown line arrives
    tracker.clear(ClearReason::ProcessExited).await;
    append(log.path(), "[2025.09.24-12.10.00:000] Server shutdown\n");
    tokio::time::sleep(Duration::from_millis(200)).await;
    task.abort();

    let sent = notifier.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[1].contains("**A1**"));
    assert_eq!(tracker.active_count().await, 0);
}
