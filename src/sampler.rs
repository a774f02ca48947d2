use crate::error::SampleError;

use std::{
    io::{self, Read},
    process::{Child, Command, Stdio},
    sync::mpsc::{self, RecvTimeoutError, Sender},
    thread,
    time::{Duration, Instant},
};

const WAIT_STEP: Duration = Duration::from_millis(20);

/// Source of raw listening-socket text.
///
/// Implementations may shell out or call platform APIs; the parser only ever
/// sees the returned text.
pub trait SocketSampler {
    fn sample(&self) -> Result<String, SampleError>;
}

impl<S: SocketSampler + ?Sized> SocketSampler for Box<S> {
    fn sample(&self) -> Result<String, SampleError> {
        (**self).sample()
    }
}

/// Runs an external command and returns its stdout, bounded by a timeout.
#[derive(Debug, Clone)]
pub struct CommandSampler {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandSampler {
    pub fn new<I, S>(program: impl Into<String>, args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn spawn(&self) -> Result<Child, SampleError> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SampleError::Spawn {
                program: self.program.clone(),
                source,
            })
    }

    fn io_error(&self, source: io::Error) -> SampleError {
        SampleError::Io {
            program: self.program.clone(),
            source,
        }
    }

    fn timed_out(&self) -> SampleError {
        SampleError::Timeout {
            program: self.program.clone(),
            after: self.timeout,
        }
    }
}

impl SocketSampler for CommandSampler {
    fn sample(&self) -> Result<String, SampleError> {
        let mut child = self.spawn()?;

        // Drain both pipes off-thread so a chatty child cannot stall on a full pipe.
        let (tx, pipes) = mpsc::channel();
        let mut pending = 0;
        if let Some(out) = child.stdout.take() {
            drain(Pipe::Stdout, out, tx.clone());
            pending += 1;
        }
        if let Some(err) = child.stderr.take() {
            drain(Pipe::Stderr, err, tx.clone());
            pending += 1;
        }
        drop(tx);

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    tracing::debug!(program = %self.program, "killed sampler after timeout");
                    return Err(self.timed_out());
                }
                Ok(None) => thread::sleep(WAIT_STEP),
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(self.io_error(e));
                }
            }
        };

        // A grandchild may inherit the pipes and keep them open after the
        // child exits; reading them is bounded by the same deadline.
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        for _ in 0..pending {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match pipes.recv_timeout(remaining) {
                Ok((Pipe::Stdout, read)) => stdout = read.map_err(|e| self.io_error(e))?,
                Ok((Pipe::Stderr, read)) => stderr = read.map_err(|e| self.io_error(e))?,
                Err(RecvTimeoutError::Timeout) => {
                    tracing::debug!(program = %self.program, "output still open after timeout");
                    return Err(self.timed_out());
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(self.io_error(io::Error::other("pipe reader panicked")));
                }
            }
        }

        if status.success() {
            return Ok(String::from_utf8_lossy(&stdout).into_owned());
        }

        // lsof (like grep) exits non-zero when nothing matched; that is an empty sample.
        if stdout.is_empty() && stderr.iter().all(u8::is_ascii_whitespace) {
            return Ok(String::new());
        }

        Err(SampleError::Failed {
            program: self.program.clone(),
            status: status.to_string(),
            stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Pipe {
    Stdout,
    Stderr,
}

fn drain<R: Read + Send + 'static>(pipe: Pipe, mut reader: R, tx: Sender<(Pipe, io::Result<Vec<u8>>)>) {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let read = reader.read_to_end(&mut buf).map(|_| buf);
        let _ = tx.send((pipe, read));
    });
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn returns_stdout_of_successful_command() {
        let sampler = CommandSampler::new("sh", ["-c", "printf 'a\\nb\\n'"], Duration::from_secs(5));
        assert_eq!(sampler.sample().unwrap(), "a\nb\n");
    }

    #[test]
    fn slow_command_times_out() {
        let sampler = CommandSampler::new("sleep", ["5"], Duration::from_millis(100));
        let started = Instant::now();
        let err = sampler.sample().unwrap_err();
        assert!(matches!(err, SampleError::Timeout { .. }), "{err:?}");
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn background_process_holding_output_open_times_out() {
        let sampler = CommandSampler::new("sh", ["-c", "sleep 4 & echo hi"], Duration::from_millis(300));
        let started = Instant::now();
        let err = sampler.sample().unwrap_err();
        assert!(matches!(err, SampleError::Timeout { .. }), "{err:?}");
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let sampler =
            CommandSampler::new("harboor-no-such-binary", Vec::<String>::new(), Duration::from_secs(1));
        assert!(matches!(sampler.sample(), Err(SampleError::Spawn { .. })));
    }

    #[test]
    fn silent_non_zero_exit_is_empty_sample() {
        let sampler = CommandSampler::new("sh", ["-c", "exit 1"], Duration::from_secs(5));
        assert_eq!(sampler.sample().unwrap(), "");
    }

    #[test]
    fn non_zero_exit_with_stderr_is_failure() {
        let sampler = CommandSampler::new("sh", ["-c", "echo boom >&2; exit 2"], Duration::from_secs(5));
        match sampler.sample() {
            Err(SampleError::Failed { stderr, .. }) => assert_eq!(stderr, "boom"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
