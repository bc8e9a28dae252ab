//! Server process liveness probe
//!
//! Looks up the configured server process by its exact name through the
//! platform's own listing tool (`pgrep -x` on Unix-likes, `tasklist` CSV on
//! Windows). An answer is `Some(running)`; `None` means the tool itself
//! could not be run or gave an unexpected exit, which the watchdog treats
//! as "no new information".

use std::future::Future;

use tracing::warn;

/// Source of process liveness observations
pub trait ProcessProbe: Send + Sync {
    fn is_running(&self, process_name: &str) -> impl Future<Output = Option<bool>> + Send;
}

/// Probe backed by the operating system's process table
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl ProcessProbe for SystemProbe {
    async fn is_running(&self, process_name: &str) -> Option<bool> {
        is_process_running(process_name).await
    }
}

/// Check if a process with exactly this name is currently running.
pub async fn is_process_running(process_name: &str) -> Option<bool> {
    #[cfg(target_os = "windows")]
    {
        is_process_running_windows(process_name).await
    }
    #[cfg(not(target_os = "windows"))]
    {
        is_process_running_unix(process_name).await
    }
}

/// Windows: use `tasklist` filtered by image name, CSV output
#[cfg(target_os = "windows")]
async fn is_process_running_windows(process_name: &str) -> Option<bool> {
    use std::os::windows::process::CommandExt;

    let filter = format!("IMAGENAME eq {}", process_name);
    let output = tokio::process::Command::new("tasklist")
        .args(["/FI", filter.as_str(), "/NH", "/FO", "CSV"])
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::null())
        .creation_flags(0x08000000) // CREATE_NO_WINDOW — prevent console flash
        .output()
        .await;

    match output {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            Some(tasklist_contains(&stdout, process_name))
        }
        Ok(output) => {
            warn!(exit_code = ?output.status.code(), "tasklist command failed");
            None
        }
        Err(e) => {
            warn!(error = %e, "Failed to spawn tasklist for process monitoring");
            None
        }
    }
}

/// First CSV column of each `tasklist /FO CSV` row is the image name
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn tasklist_contains(stdout: &str, process_name: &str) -> bool {
    stdout.lines().any(|row| {
        row.split(',')
            .next()
            .map(|image| image.trim().trim_matches('"'))
            .is_some_and(|image| image.eq_ignore_ascii_case(process_name))
    })
}

/// Linux/macOS: use `pgrep -x` for an exact process name match.
/// Linux truncates process names to 15 characters.
#[cfg(not(target_os = "windows"))]
async fn is_process_running_unix(process_name: &str) -> Option<bool> {
    let output = tokio::process::Command::new("pgrep")
        .args(["-x", process_name])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .output()
        .await;

    match output {
        Ok(output) => match output.status.code() {
            Some(0) => Some(true),  // Process found
            Some(1) => Some(false), // No matching process (normal pgrep "not found" exit)
            other => {
                warn!(exit_code = ?other, "pgrep returned unexpected exit code");
                None
            }
        },
        Err(e) => {
            warn!(error = %e, "Failed to spawn pgrep for process monitoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasklist_csv_match() {
        let stdout = "\"SCUMServer.exe\",\"4242\",\"Services\",\"0\",\"8,123,456 K\"\r\n";
        assert!(tasklist_contains(stdout, "SCUMServer.exe"));
        assert!(tasklist_contains(stdout, "scumserver.exe"));
        assert!(!tasklist_contains(stdout, "SCUM.exe"));
    }

    #[test]
    fn test_tasklist_no_match() {
        let stdout = "INFO: No tasks are running which match the specified criteria.\r\n";
        assert!(!tasklist_contains(stdout, "SCUMServer.exe"));
    }
}
