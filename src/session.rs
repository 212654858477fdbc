/// Session: the single owner of all runtime state (panes, focus, font scale).
/// Toolkit callbacks reach it only through `EventHandler`.

use crate::config::Config;
use crate::error::Error;
use crate::exit::ShellExit;
use crate::keybinding::{Action, Dispatch, KeyPress, KeybindingManager};
use crate::pane::{PaneManager, PaneView, PANE_COUNT};
use crate::zoom::FontScale;
use log::{debug, error, info};

pub trait EventHandler {
    fn on_spawned(&mut self, pane: usize, pid: i32);
    fn on_spawn_failed(&mut self, pane: usize, err: &Error);
    fn on_child_exited(&mut self, pane: usize, status: i32);
    fn on_key_chord(&mut self, press: &KeyPress) -> Dispatch;
    fn on_destroy(&mut self);
}

pub struct Session<W: PaneView> {
    panes: PaneManager<W>,
    font: FontScale,
    keys: KeybindingManager,
    quit: Box<dyn Fn()>,
    quitting: bool,
}

impl<W: PaneView> Session<W> {
    /// `quit` ends the event loop; it is called at most once.
    pub fn new(views: [W; PANE_COUNT], config: &Config, quit: impl Fn() + 'static) -> Self {
        let keys = KeybindingManager::new(config.layout);
        for (binding, action) in keys.bindings() {
            debug!("bind {} -> {:?}", KeybindingManager::display(binding), action);
        }
        Self {
            panes: PaneManager::new(views),
            font: FontScale::new(&config.font),
            keys,
            quit: Box::new(quit),
            quitting: false,
        }
    }

    /// Push the current scale to every pane and focus pane 0.
    pub fn start(&self) {
        self.panes.apply_font_scale(self.font.value());
        self.panes.focus_current();
    }

    pub fn font_scale(&self) -> f64 {
        self.font.value()
    }

    #[cfg(test)]
    pub(crate) fn panes(&self) -> &PaneManager<W> {
        &self.panes
    }

    #[cfg(test)]
    pub(crate) fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn perform(&mut self, action: Action) {
        match action {
            Action::IncreaseFontSize => self.set_scale(FontScale::zoom_in),
            Action::DecreaseFontSize => self.set_scale(FontScale::zoom_out),
            Action::ResetFontSize => self.set_scale(FontScale::reset),
            Action::NextPane => {
                let index = self.panes.focus_next();
                debug!("focus pane {index}");
            }
            Action::PrevPane => {
                let index = self.panes.focus_previous();
                debug!("focus pane {index}");
            }
        }
    }

    fn set_scale(&mut self, step: fn(&mut FontScale) -> f64) {
        let scale = step(&mut self.font);
        debug!("font scale {scale:.1}");
        self.panes.apply_font_scale(scale);
    }

    fn quit(&mut self) {
        if !self.quitting {
            self.quitting = true;
            (self.quit)();
        }
    }
}

impl<W: PaneView> EventHandler for Session<W> {
    fn on_spawned(&mut self, pane: usize, pid: i32) {
        info!("Spawned pid: {pid} (pane {pane})");
        if let Some(slot) = self.panes.get_mut(pane) {
            slot.pid = Some(pid);
        }
    }

    fn on_spawn_failed(&mut self, pane: usize, err: &Error) {
        error!("Spawn failed in pane {pane}: {err}");
        self.quit();
    }

    fn on_child_exited(&mut self, pane: usize, status: i32) {
        let pid = self.panes.get(pane).and_then(|p| p.pid);
        let exit = ShellExit::from_status(pid, status);
        match pid {
            Some(pid) => info!("shell {pid} in pane {pane} {exit}; closing"),
            None => info!("shell in pane {pane} {exit}; closing"),
        }
        self.quit();
    }

    fn on_key_chord(&mut self, press: &KeyPress) -> Dispatch {
        match self.keys.resolve(press) {
            Some(action) => {
                self.perform(action);
                Dispatch::Consumed
            }
            None => Dispatch::NotConsumed,
        }
    }

    fn on_destroy(&mut self) {
        debug!("window destroyed");
        self.quit();
    }
}
