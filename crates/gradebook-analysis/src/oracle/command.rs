//! Oracle backed by an external command: prompt on stdin, answer on stdout.

use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use gradebook_core::errors::OracleError;

use super::ReasoningOracle;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs a shell command line per prompt.
///
/// The command is run through the platform shell so that configured values
/// like `llm -m haiku` work unchanged.
#[derive(Debug, Clone)]
pub struct CommandOracle {
    command_line: String,
}

impl CommandOracle {
    pub fn new(command_line: impl Into<String>) -> Self {
        Self {
            command_line: command_line.into(),
        }
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    fn shell(&self) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&self.command_line);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(&self.command_line);
            cmd
        }
    }

    /// Run the command once, killing it if `deadline` passes first.
    fn run(&self, prompt: &str, deadline: Option<Duration>) -> Result<String, OracleError> {
        let mut child = self
            .shell()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| transport(format!("failed to start `{}`: {e}", self.command_line)))?;

        // Feed stdin and drain both pipes off this thread so a chatty command
        // cannot deadlock on a full pipe while we poll for exit.
        let writer = child.stdin.take().map(|mut stdin| {
            let prompt = prompt.to_string();
            thread::spawn(move || stdin.write_all(prompt.as_bytes()))
        });
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let started = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if let Some(limit) = deadline.filter(|limit| started.elapsed() >= *limit) {
                        let _ = child.kill();
                        let _ = child.wait();
                        tracing::debug!(command = %self.command_line, "oracle command killed at deadline");
                        return Err(OracleError::Timeout {
                            timeout_ms: limit.as_millis() as u64,
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    let _ = child.kill();
                    return Err(transport(format!("failed to wait for oracle: {e}")));
                }
            }
        };

        if let Some(handle) = writer {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::debug!(error = %e, "oracle closed stdin early"),
                Err(_) => return Err(transport("stdin writer panicked".to_string())),
            }
        }
        let stdout = collect(stdout)?;
        let stderr = collect(stderr)?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(transport(format!(
                "oracle exited with {}: {}",
                status,
                stderr.trim()
            )));
        }

        let answer = String::from_utf8_lossy(&stdout).into_owned();
        if answer.trim().is_empty() {
            return Err(OracleError::EmptyResponse);
        }
        Ok(answer)
    }
}

fn transport(message: String) -> OracleError {
    OracleError::Transport { message }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf).map(|_| buf)
    })
}

fn collect(reader: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> Result<Vec<u8>, OracleError> {
    match reader {
        None => Ok(Vec::new()),
        Some(handle) => match handle.join() {
            Ok(Ok(buf)) => Ok(buf),
            Ok(Err(e)) => Err(transport(format!("failed to read oracle output: {e}"))),
            Err(_) => Err(transport("output reader panicked".to_string())),
        },
    }
}

impl ReasoningOracle for CommandOracle {
    fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        self.run(prompt, None)
    }

    fn complete_within(&self, prompt: &str, timeout: Duration) -> Result<String, OracleError> {
        self.run(prompt, Some(timeout))
    }
}
