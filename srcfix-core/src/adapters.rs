//! Default subprocess and filesystem port implementations.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use camino::Utf8Path;
use srcfix_types::run::{Verification, VerifierResult};
use tracing::debug;

use crate::ports::{VerifierPort, WritePort};

/// Interval between child liveness checks while waiting for the verifier.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the verify command through `sh -c` with a deadline.
///
/// Exit 0 means `passed`, any other exit means `failed`. A command that
/// cannot be spawned or that outlives the deadline is killed and reported as
/// `unknown`; the pipeline treats all three verdicts as informational only.
#[derive(Debug, Clone, Default)]
pub struct ShellVerifier;

impl VerifierPort for ShellVerifier {
    fn verify(&self, root: &Utf8Path, command: &str, timeout: Duration) -> VerifierResult {
        let mut child = match Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                return VerifierResult::unavailable(format!(
                    "failed to start verifier `{command}`: {err}"
                ));
            }
        };

        // Drain pipes on threads so a chatty verifier cannot block itself
        // on a full pipe buffer while we poll for exit.
        let stdout = child.stdout.take().map(|s| thread::spawn(|| drain(s)));
        let stderr = child.stderr.take().map(|s| thread::spawn(|| drain(s)));

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break Some(status),
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        break None;
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(err) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return VerifierResult::unavailable(format!(
                        "failed to poll verifier: {err}"
                    ));
                }
            }
        };

        let mut output = join_drained(stdout);
        let err_text = join_drained(stderr);
        if !err_text.is_empty() {
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
            output.push_str(&err_text);
        }

        match status {
            Some(status) => {
                let verification = if status.success() {
                    Verification::Passed
                } else {
                    Verification::Failed
                };
                debug!(?verification, code = ?status.code(), "verifier finished");
                VerifierResult {
                    verification,
                    exit_code: status.code(),
                    output,
                    detail: None,
                }
            }
            None => VerifierResult {
                verification: Verification::Unknown,
                exit_code: None,
                output,
                detail: Some(format!(
                    "verifier timed out after {}s and was killed",
                    timeout.as_secs()
                )),
            },
        }
    }
}

fn drain(mut reader: impl Read) -> String {
    let mut buf = String::new();
    let _ = reader.read_to_string(&mut buf);
    buf
}

fn join_drained(handle: Option<thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs_err::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs_err::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn utf8_root(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8")
    }

    #[cfg(unix)]
    #[test]
    fn shell_verifier_passes_on_exit_zero() {
        let temp = TempDir::new().expect("temp dir");
        let result = ShellVerifier.verify(&utf8_root(&temp), "true", Duration::from_secs(5));
        assert_eq!(result.verification, Verification::Passed);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.detail.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn shell_verifier_fails_on_nonzero_exit() {
        let temp = TempDir::new().expect("temp dir");
        let result = ShellVerifier.verify(&utf8_root(&temp), "exit 3", Duration::from_secs(5));
        assert_eq!(result.verification, Verification::Failed);
        assert_eq!(result.exit_code, Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn shell_verifier_captures_both_streams() {
        let temp = TempDir::new().expect("temp dir");
        let result = ShellVerifier.verify(
            &utf8_root(&temp),
            "echo out; echo err >&2; exit 1",
            Duration::from_secs(5),
        );
        assert_eq!(result.verification, Verification::Failed);
        assert!(result.output.contains("out"));
        assert!(result.output.contains("err"));
    }

    #[cfg(unix)]
    #[test]
    fn shell_verifier_runs_in_the_given_root() {
        let temp = TempDir::new().expect("temp dir");
        let root = utf8_root(&temp);
        fs_err::write(root.join("marker"), "x").expect("write marker");
        let result = ShellVerifier.verify(&root, "test -f marker", Duration::from_secs(5));
        assert_eq!(result.verification, Verification::Passed);
    }

    #[cfg(unix)]
    #[test]
    fn shell_verifier_kills_on_timeout() {
        let temp = TempDir::new().expect("temp dir");
        let result =
            ShellVerifier.verify(&utf8_root(&temp), "sleep 30", Duration::from_millis(200));
        assert_eq!(result.verification, Verification::Unknown);
        assert!(result.exit_code.is_none());
        assert!(result.detail.as_deref().unwrap_or("").contains("timed out"));
    }

    #[test]
    fn unspawnable_verifier_is_unknown_not_error() {
        let temp = TempDir::new().expect("temp dir");
        let missing_root = utf8_root(&temp).join("does-not-exist");
        let result = ShellVerifier.verify(&missing_root, "true", Duration::from_secs(5));
        assert_eq!(result.verification, Verification::Unknown);
        assert!(result.detail.is_some());
    }

    #[test]
    fn fs_write_port_writes_and_creates_dirs() {
        let temp = TempDir::new().expect("temp dir");
        let root = utf8_root(&temp);
        let target = root.join("nested").join("run.json");

        let port = FsWritePort;
        port.write_file(&target, b"{}").expect("write");
        assert_eq!(fs_err::read_to_string(&target).expect("read"), "{}");

        let extra_dir = root.join("extra");
        port.create_dir_all(&extra_dir).expect("mkdir");
        assert!(extra_dir.exists());
    }
}
