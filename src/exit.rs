/// Decoding of the raw wait status a pane reports when its shell exits.

use nix::sys::signal::Signal;
use nix::sys::wait::WaitStatus;
use nix::unistd::Pid;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellExit {
    Exited(i32),
    Signaled(Signal),
    /// A status that is neither a normal exit nor a kill.
    Other(i32),
}

impl ShellExit {
    pub fn from_status(pid: Option<i32>, status: i32) -> Self {
        let pid = Pid::from_raw(pid.unwrap_or(0));
        match WaitStatus::from_raw(pid, status) {
            Ok(WaitStatus::Exited(_, code)) => ShellExit::Exited(code),
            Ok(WaitStatus::Signaled(_, signal, _)) => ShellExit::Signaled(signal),
            _ => ShellExit::Other(status),
        }
    }
}

impl fmt::Display for ShellExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellExit::Exited(code) => write!(f, "exited with code {code}"),
            ShellExit::Signaled(signal) => write!(f, "killed by {signal}"),
            ShellExit::Other(status) => write!(f, "ended with wait status {status:#x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_exit() {
        assert_eq!(ShellExit::from_status(Some(100), 0), ShellExit::Exited(0));
        assert_eq!(ShellExit::from_status(Some(100), 1 << 8), ShellExit::Exited(1));
        assert_eq!(ShellExit::from_status(None, 127 << 8), ShellExit::Exited(127));
    }

    #[test]
    fn test_killed() {
        assert_eq!(ShellExit::from_status(Some(100), 9), ShellExit::Signaled(Signal::SIGKILL));
        assert_eq!(ShellExit::from_status(Some(100), 15), ShellExit::Signaled(Signal::SIGTERM));
    }

    #[test]
    fn test_display() {
        assert_eq!(ShellExit::Exited(2).to_string(), "exited with code 2");
        assert_eq!(ShellExit::Signaled(Signal::SIGHUP).to_string(), "killed by SIGHUP");
    }
}
