/// Pane set: exactly two terminal views and which one has keyboard focus.

pub const PANE_COUNT: usize = 2;

/// What the pane manager needs from a terminal widget.
pub trait PaneView {
    fn set_font_scale(&self, scale: f64);
    fn grab_focus(&self);
}

#[derive(Debug)]
pub struct Pane<W> {
    pub view: W,
    /// Shell pid, once the spawn has completed.
    pub pid: Option<i32>,
}

pub struct PaneManager<W: PaneView> {
    panes: [Pane<W>; PANE_COUNT],
    active: usize,
}

impl<W: PaneView> PaneManager<W> {
    pub fn new(views: [W; PANE_COUNT]) -> Self {
        Self {
            panes: views.map(|view| Pane { view, pid: None }),
            active: 0,
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn focus_next(&mut self) -> usize {
        self.focus((self.active + 1) % PANE_COUNT)
    }

    pub fn focus_previous(&mut self) -> usize {
        self.focus((self.active + PANE_COUNT - 1) % PANE_COUNT)
    }

    /// Re-grant focus to the active pane without moving.
    pub fn focus_current(&self) {
        self.panes[self.active].view.grab_focus();
    }

    fn focus(&mut self, index: usize) -> usize {
        self.active = index;
        self.focus_current();
        index
    }

    /// Broadcast `scale` to every pane. Range checking is the caller's job.
    pub fn apply_font_scale(&self, scale: f64) {
        for pane in &self.panes {
            pane.view.set_font_scale(scale);
        }
    }

    pub fn get(&self, index: usize) -> Option<&Pane<W>> {
        self.panes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Pane<W>> {
        self.panes.get_mut(index)
    }
}
