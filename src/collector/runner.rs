//! Child-process plumbing shared by the property store and the root shell.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::ShellResult;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Runs `program` to completion, capturing both streams in full.
///
/// The child is killed once `timeout` elapses. Output is drained on helper
/// threads so a chatty child cannot stall on a full pipe.
pub fn run_command_with_timeout(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<ShellResult> {
    debug!(program, ?args, "spawning");
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| Error::Spawn {
            program: program.to_string(),
            source,
        })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let start = Instant::now();
    let exit_code = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status.code(),
            Ok(None) if start.elapsed() > timeout => {
                warn!(program, ?timeout, "command timed out, killing");
                let _ = child.kill();
                let _ = child.wait();
                // Grandchildren may still hold the pipes; leave the drain
                // threads detached rather than wait on them.
                drop((stdout, stderr));
                return Err(Error::Timeout {
                    program: program.to_string(),
                    timeout,
                });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(err) => {
                let _ = child.kill();
                drop((stdout, stderr));
                return Err(Error::Io(err));
            }
        }
    };

    Ok(ShellResult {
        exit_code,
        stdout: String::from_utf8_lossy(&stdout.join().unwrap_or_default()).into_owned(),
        stderr: String::from_utf8_lossy(&stderr.join().unwrap_or_default()).into_owned(),
    })
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut reader) = pipe {
            let _ = reader.read_to_end(&mut buffer);
        }
        buffer
    })
}
