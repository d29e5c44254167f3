//! Running resolved commands.
//!
//! Attached commands take over the terminal until they exit. Detached commands run
//! in the background; their stdout and stderr are forwarded line by line through a
//! channel that the event loop drains with [`OutputSource::poll`].

use std::io::{self, BufRead, BufReader, Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{debug, warn};

use crate::error::ExecError;
use crate::templates::ResolvedCommand;

const SHELL: &str = "sh";

/// Exit code of a finished command; `None` when it was killed by a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandExit(pub Option<i32>);

impl CommandExit {
    pub fn success(&self) -> bool {
        self.0 == Some(0)
    }
}

/// Lines read since the last poll, and the exit code once the command has finished
/// and its output is fully drained. The exit is reported once.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct OutputPoll {
    pub lines: Vec<String>,
    pub exit: Option<CommandExit>,
}

/// Output of a detached command.
pub trait OutputSource {
    fn poll(&mut self, max_lines: usize) -> OutputPoll;
    fn kill(&mut self);
}

pub enum Execution {
    Attached(CommandExit),
    Detached(Box<dyn OutputSource>),
}

pub trait Executor {
    fn execute(&mut self, command: &ResolvedCommand) -> Result<Execution, ExecError>;
}

/// Runs commands through `sh -c`.
pub struct ShellExecutor {
    return_immediately: bool,
    terminal_handoff: bool,
}

impl ShellExecutor {
    pub fn new(return_immediately: bool) -> Self {
        Self {
            return_immediately,
            terminal_handoff: true,
        }
    }

    /// No raw-mode/alternate-screen juggling and no "press enter" prompt.
    pub fn headless() -> Self {
        Self {
            return_immediately: true,
            terminal_handoff: false,
        }
    }

    fn run_attached(&self, command: &str) -> Result<CommandExit, ExecError> {
        if self.terminal_handoff {
            suspend_terminal()?;
        }

        let status = Command::new(SHELL).arg("-c").arg(command).status();
        if status.is_ok() && !self.return_immediately {
            wait_for_enter();
        }

        if self.terminal_handoff {
            resume_terminal()?;
        }

        let status = status.map_err(|source| ExecError::Spawn {
            command: command.to_string(),
            source,
        })?;
        Ok(CommandExit(status.code()))
    }
}

impl Executor for ShellExecutor {
    fn execute(&mut self, command: &ResolvedCommand) -> Result<Execution, ExecError> {
        debug!(name = %command.name, command = %command.command, attach = command.attach, "executing");
        if command.attach {
            self.run_attached(&command.command).map(Execution::Attached)
        } else {
            let output = ChildOutput::spawn(&command.command)?;
            Ok(Execution::Detached(Box::new(output)))
        }
    }
}

fn suspend_terminal() -> io::Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()
}

fn resume_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, Clear(ClearType::All))
}

fn wait_for_enter() {
    let mut out = io::stdout();
    let _ = write!(out, "\n[press enter to return to docap]");
    let _ = out.flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

/// A detached child process and the receiving end of its output.
pub struct ChildOutput {
    child: Child,
    receiver: mpsc::Receiver<String>,
    exit: Option<CommandExit>,
}

impl ChildOutput {
    pub fn spawn(command: &str) -> Result<Self, ExecError> {
        let mut cmd = Command::new(SHELL);
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let mut child = cmd.spawn().map_err(|source| ExecError::Spawn {
            command: command.to_string(),
            source,
        })?;

        let (tx, rx) = mpsc::channel();
        if let Some(stdout) = child.stdout.take() {
            forward_lines(stdout, tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            forward_lines(stderr, tx);
        }

        Ok(Self {
            child,
            receiver: rx,
            exit: None,
        })
    }
}

fn forward_lines(reader: impl Read + Send + 'static, tx: mpsc::Sender<String>) {
    thread::spawn(move || {
        for line in BufReader::new(reader).lines() {
            match line {
                Ok(l) => {
                    if tx.send(l).is_err() {
                        break; // receiver dropped
                    }
                }
                Err(_) => break,
            }
        }
    });
}

impl OutputSource for ChildOutput {
    fn poll(&mut self, max_lines: usize) -> OutputPoll {
        let mut poll = OutputPoll::default();
        let mut drained = false;

        while poll.lines.len() < max_lines {
            match self.receiver.try_recv() {
                Ok(line) => poll.lines.push(line),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    drained = true;
                    break;
                }
            }
        }

        if drained && self.exit.is_none() {
            if let Ok(Some(status)) = self.child.try_wait() {
                let exit = CommandExit(status.code());
                self.exit = Some(exit);
                poll.exit = Some(exit);
            }
        }
        poll
    }

    fn kill(&mut self) {
        if self.exit.is_some() {
            return;
        }
        #[cfg(unix)]
        {
            // The shell's children share its process group; take them down too.
            let group = format!("-{}", self.child.id());
            let _ = Command::new("kill")
                .args(["-TERM", "--", &group])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
        }
        if let Err(e) = self.child.kill() {
            debug!(error = %e, "child already gone");
        }
        match self.child.wait() {
            Ok(status) => self.exit = Some(CommandExit(status.code())),
            Err(e) => warn!(error = %e, "failed to reap child"),
        }
    }
}

impl Drop for ChildOutput {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn detached(command: &str) -> ResolvedCommand {
        ResolvedCommand {
            name: "test".into(),
            command: command.into(),
            attach: false,
        }
    }

    fn drain(source: &mut dyn OutputSource) -> (Vec<String>, Option<CommandExit>) {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut lines = Vec::new();
        while Instant::now() < deadline {
            let poll = source.poll(100);
            lines.extend(poll.lines);
            if poll.exit.is_some() {
                return (lines, poll.exit);
            }
            thread::sleep(Duration::from_millis(10));
        }
        (lines, None)
    }

    #[test]
    fn detached_output_and_exit_code() {
        let mut exec = ShellExecutor::headless();
        let Execution::Detached(mut source) = exec
            .execute(&detached("echo hello; echo oops 1>&2; exit 3"))
            .unwrap()
        else {
            panic!("expected detached execution");
        };

        let (lines, exit) = drain(source.as_mut());
        assert!(lines.contains(&"hello".to_string()));
        assert!(lines.contains(&"oops".to_string()));
        assert_eq!(exit, Some(CommandExit(Some(3))));

        // reported once
        assert_eq!(source.poll(10), OutputPoll::default());
    }

    #[test]
    fn successful_detached_command() {
        let mut exec = ShellExecutor::headless();
        let Execution::Detached(mut source) = exec.execute(&detached("printf 'a\\nb\\n'")).unwrap() else {
            panic!("expected detached execution");
        };
        let (lines, exit) = drain(source.as_mut());
        assert_eq!(lines, vec!["a".to_string(), "b".to_string()]);
        assert!(exit.unwrap().success());
    }

    #[test]
    fn kill_stops_long_running_command() {
        let mut output = ChildOutput::spawn("sleep 30").unwrap();
        let started = Instant::now();
        output.kill();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(output.poll(10).exit.is_none());
    }

    #[test]
    fn attached_headless_reports_exit_code() {
        let mut exec = ShellExecutor::headless();
        let cmd = ResolvedCommand {
            name: "t".into(),
            command: "exit 4".into(),
            attach: true,
        };
        match exec.execute(&cmd).unwrap() {
            Execution::Attached(exit) => assert_eq!(exit, CommandExit(Some(4))),
            Execution::Detached(_) => panic!("expected attached execution"),
        }
    }
}
