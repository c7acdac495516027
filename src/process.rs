//! Subprocess execution with combined output capture and cancellation.
//!
//! The Generator is always launched through [`run_captured`]: stdout and
//! stderr are pumped by two reader threads into a single channel so the
//! captured buffer interleaves the way a terminal would show it, and the
//! wait loop polls the cancellation token so a signal terminates the child
//! promptly instead of orphaning it.

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Poll interval for the child wait loop.
const TICK: Duration = Duration::from_millis(10);

/// How long to keep draining pump threads after the child exits.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Outcome of a captured subprocess run.
#[derive(Debug)]
pub struct CaptureResult {
    /// Exit code, if the process exited normally.
    pub exit_code: Option<i32>,
    /// Interleaved stdout + stderr.
    pub output: String,
    /// Wall-clock time between spawn and exit.
    pub duration: Duration,
    /// Whether the child was terminated by the cancellation token.
    pub cancelled: bool,
}

impl CaptureResult {
    /// Whether the process ran to completion with exit code 0.
    #[must_use]
    pub fn success(&self) -> bool {
        !self.cancelled && self.exit_code == Some(0)
    }
}

/// Run `program args…` in `cwd` with inherited environment, capturing
/// combined output until the process exits or `cancel` fires.
pub fn run_captured(
    program: &Path,
    args: &[&str],
    cwd: &Path,
    cancel: &CancelToken,
) -> Result<CaptureResult> {
    let program_name = program.display().to_string();
    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::subprocess(&program_name, format!("failed to spawn: {e}")))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| Error::subprocess(&program_name, "missing stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| Error::subprocess(&program_name, "missing stderr"))?;

    let mut guard = ProcessGuard::new(child);

    let (tx, rx) = mpsc::sync_channel::<Vec<u8>>(128);
    let tx_stdout = tx.clone();
    thread::spawn(move || pump_stream(stdout, &tx_stdout));
    thread::spawn(move || pump_stream(stderr, &tx));

    let mut captured: Vec<u8> = Vec::new();
    let mut exit_code: Option<i32> = None;
    let mut cancelled = false;
    let start = Instant::now();

    loop {
        while let Ok(chunk) = rx.try_recv() {
            captured.extend_from_slice(&chunk);
        }

        match guard.try_wait() {
            Ok(Some(status)) => {
                exit_code = status.code();
                break;
            }
            Ok(None) => {}
            Err(err) => return Err(Error::subprocess(&program_name, err.to_string())),
        }

        if cancel.is_cancelled() {
            cancelled = true;
            if let Some(status) = guard
                .kill()
                .map_err(|err| Error::subprocess(&program_name, format!("failed to kill: {err}")))?
            {
                exit_code = status.code();
            }
            break;
        }

        thread::sleep(TICK);
    }

    let duration = start.elapsed();

    // Pump threads may still hold buffered output; drain until both hang up.
    let drain_deadline = Instant::now() + DRAIN_GRACE;
    loop {
        match rx.try_recv() {
            Ok(chunk) => captured.extend_from_slice(&chunk),
            Err(mpsc::TryRecvError::Empty) => {
                if Instant::now() >= drain_deadline {
                    break;
                }
                thread::sleep(TICK);
            }
            Err(mpsc::TryRecvError::Disconnected) => break,
        }
    }

    Ok(CaptureResult {
        exit_code,
        output: String::from_utf8_lossy(&captured).to_string(),
        duration,
        cancelled,
    })
}

fn pump_stream<R: Read + Send + 'static>(mut reader: R, tx: &mpsc::SyncSender<Vec<u8>>) {
    let mut buf = vec![0u8; 8192];
    loop {
        match reader.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
        }
    }
}

/// Owns a child process and guarantees it does not outlive the guard.
struct ProcessGuard {
    child: Option<Child>,
}

impl ProcessGuard {
    const fn new(child: Child) -> Self {
        Self { child: Some(child) }
    }

    fn try_wait(&mut self) -> std::io::Result<Option<ExitStatus>> {
        match self.child.as_mut() {
            Some(child) => child.try_wait(),
            None => Err(std::io::Error::other("already waited")),
        }
    }

    fn kill(&mut self) -> std::io::Result<Option<ExitStatus>> {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let status = child.wait()?;
            return Ok(Some(status));
        }
        Ok(None)
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            match child.try_wait() {
                Ok(None) => {}
                Ok(Some(_)) | Err(_) => return,
            }
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
