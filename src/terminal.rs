/// Terminal factory: one VTE widget per pane, each running the user's shell.

use crate::config::ShellConfig;
use crate::error::Error;
use crate::pane::PaneView;
use crate::session::EventHandler;
use gtk4::prelude::*;
use gtk4::{gio, glib};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::{Rc, Weak};
use vte4::prelude::*;
use vte4::{PtyFlags, Terminal};

impl PaneView for Terminal {
    fn set_font_scale(&self, scale: f64) {
        TerminalExt::set_font_scale(self, scale);
    }

    fn grab_focus(&self) {
        WidgetExt::grab_focus(self);
    }
}

pub struct TerminalFactory {
    shell: String,
    working_dir: PathBuf,
}

impl TerminalFactory {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            shell: config.program.clone(),
            working_dir: config.working_dir.clone(),
        }
    }

    /// A fresh widget at `font_scale`, with no process attached yet.
    pub fn create(&self, font_scale: f64) -> Terminal {
        let terminal = Terminal::new();
        TerminalExt::set_font_scale(&terminal, font_scale);
        terminal.set_hexpand(true);
        terminal.set_vexpand(true);
        terminal
    }

    /// Start the shell in `terminal` on its own pty. Spawn results and the
    /// shell's exit are reported to `handler` as events for `pane`.
    pub fn spawn<H>(&self, terminal: &Terminal, pane: usize, handler: &Rc<RefCell<H>>)
    where
        H: EventHandler + 'static,
    {
        let on_exit = Rc::downgrade(handler);
        terminal.connect_child_exited(move |_, status| {
            dispatch(&on_exit, |h| h.on_child_exited(pane, status));
        });

        let on_spawn = Rc::downgrade(handler);
        let shell = self.shell.clone();
        terminal.spawn_async(
            PtyFlags::DEFAULT,
            Some(self.working_dir()),
            &[self.shell.as_str()],
            &[],
            glib::SpawnFlags::DEFAULT,
            || {},
            -1,
            None::<&gio::Cancellable>,
            move |result| match result {
                Ok(pid) => dispatch(&on_spawn, |h| h.on_spawned(pane, pid.0)),
                Err(err) => {
                    let err = Error::Spawn { shell, message: err.message().to_string() };
                    dispatch(&on_spawn, |h| h.on_spawn_failed(pane, &err));
                }
            },
        );
    }

    /// VTE takes the directory as UTF-8; anything else starts the shell in `/`.
    fn working_dir(&self) -> &str {
        self.working_dir.to_str().unwrap_or_else(|| {
            log::warn!(
                "working directory {} is not valid UTF-8; starting in /",
                self.working_dir.display()
            );
            "/"
        })
    }
}

/// Deliver an event unless the handler is gone or already busy.
pub(crate) fn dispatch<H, F>(handler: &Weak<RefCell<H>>, f: F)
where
    F: FnOnce(&mut H),
{
    let Some(handler) = handler.upgrade() else { return };
    match handler.try_borrow_mut() {
        Ok(mut h) => f(&mut *h),
        Err(_) => log::warn!("event dropped: session busy"),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_takes_shell_config() {
        let factory = TerminalFactory::new(&ShellConfig {
            program: "/bin/zsh".into(),
            working_dir: PathBuf::from("/home/ada"),
        });
        assert_eq!(factory.shell, "/bin/zsh");
        assert_eq!(factory.working_dir, PathBuf::from("/home/ada"));
    }

    #[test]
    fn test_working_dir_utf8() {
        let factory = TerminalFactory::new(&ShellConfig {
            program: "/bin/sh".into(),
            working_dir: PathBuf::from("/home/ada"),
        });
        assert_eq!(factory.working_dir(), "/home/ada");
    }

    #[test]
    fn test_working_dir_non_utf8_falls_back_to_root() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let factory = TerminalFactory::new(&ShellConfig {
            program: "/bin/sh".into(),
            working_dir: PathBuf::from(OsStr::from_bytes(b"/home/\xff\xfe")),
        });
        assert_eq!(factory.working_dir(), "/");
    }

    #[test]
    fn test_dispatch_skips_dropped_handler() {
        let handler = Rc::new(RefCell::new(0u32));
        let weak = Rc::downgrade(&handler);
        dispatch(&weak, |n| *n += 1);
        assert_eq!(*handler.borrow(), 1);

        drop(handler);
        dispatch(&weak, |n: &mut u32| *n += 1);
    }

    #[test]
    fn test_dispatch_skips_busy_handler() {
        let handler = Rc::new(RefCell::new(0u32));
        let weak = Rc::downgrade(&handler);
        let _held = handler.borrow_mut();
        dispatch(&weak, |n| *n += 1);
        drop(_held);
        assert_eq!(*handler.borrow(), 0);
    }
}
