use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

use super::Speaker;

/// Speaks by launching an external program (`espeak`, `say`, ...) with the
/// text as its last argument.
#[derive(Clone, Debug)]
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn command(&self, text: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }

    /// Start the program in its own session. A waiter thread reaps it once
    /// the read-out finishes.
    fn launch_detached(&self, text: &str) -> std::io::Result<JoinHandle<()>> {
        let mut command = self.command(text);

        // SAFETY: setsid() is async-signal-safe and creates a new session,
        // detaching the speech process so it keeps talking after we exit.
        unsafe {
            command.pre_exec(|| {
                libc::setsid();
                Ok(())
            });
        }

        let mut child = command.spawn()?;
        let program = self.program.clone();
        let waiter = thread::spawn(move || match child.wait() {
            Ok(status) => tracing::debug!(program = %program, %status, "Speech program exited"),
            Err(e) => tracing::warn!(program = %program, error = %e, "Failed to wait for speech program"),
        });
        Ok(waiter)
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Err(e) = self.launch_detached(text) {
            tracing::warn!(program = %self.program, error = %e, "Failed to start speech program");
        }
    }
}
