/// Keyboard chords: a fixed table from modifier+key to an action.
/// The stacked layout adds one extra chord for switching panes.

use crate::config::Layout;
use bitflags::bitflags;
use std::collections::HashMap;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const CTRL  = 0b0001;
        const SHIFT = 0b0010;
        const ALT   = 0b0100;
        const SUPER = 0b1000;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub modifiers: Modifiers,
    pub key: String,
}

impl KeyBinding {
    /// Single-character keys are stored lowercase so `W` and `w` match.
    pub fn new(modifiers: Modifiers, key: &str) -> Self {
        let mut chars = key.chars();
        let key = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_lowercase().collect(),
            _ => key.to_string(),
        };
        Self { modifiers, key }
    }
}

/// A key press as delivered by the toolkit: the chord with every held
/// modifier, plus the modifiers the keymap used up to produce the key
/// (e.g. Shift for `=` on a German layout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub chord: KeyBinding,
    pub consumed: Modifiers,
}

impl KeyPress {
    pub fn new(modifiers: Modifiers, key: &str) -> Self {
        Self { chord: KeyBinding::new(modifiers, key), consumed: Modifiers::empty() }
    }

    pub fn with_consumed(mut self, consumed: Modifiers) -> Self {
        self.consumed = consumed;
        self
    }

    /// The chord with consumed modifiers removed.
    pub fn effective(&self) -> KeyBinding {
        KeyBinding {
            modifiers: self.chord.modifiers - self.consumed,
            key: self.chord.key.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    IncreaseFontSize,
    DecreaseFontSize,
    ResetFontSize,
    PrevPane,
    NextPane,
}

/// Whether the toolkit should keep processing a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Consumed,
    NotConsumed,
}

pub struct KeybindingManager {
    bindings: HashMap<KeyBinding, Action>,
}

impl KeybindingManager {
    pub fn new(layout: Layout) -> Self {
        let mut mgr = Self { bindings: HashMap::new() };
        mgr.load_defaults(layout);
        mgr
    }

    fn load_defaults(&mut self, layout: Layout) {
        let ctrl = Modifiers::CTRL;
        let ctrl_shift = Modifiers::CTRL | Modifiers::SHIFT;

        let mut defaults = vec![
            (ctrl, "=", Action::IncreaseFontSize),
            (ctrl, "+", Action::IncreaseFontSize),
            (ctrl, "-", Action::DecreaseFontSize),
            (ctrl, "0", Action::ResetFontSize),
            (ctrl_shift, "Left", Action::PrevPane),
            (ctrl_shift, "Right", Action::NextPane),
        ];
        if layout == Layout::Stacked {
            defaults.push((ctrl_shift, "w", Action::NextPane));
        }

        for (mods, key, action) in defaults {
            self.bind(KeyBinding::new(mods, key), action);
        }
    }

    fn bind(&mut self, binding: KeyBinding, action: Action) {
        self.bindings.insert(binding, action);
    }

    /// Look up action for a key event.
    pub fn lookup(&self, binding: &KeyBinding) -> Option<Action> {
        self.bindings.get(binding).copied()
    }

    /// Match a key press: the full chord first, so Ctrl+Shift+W still hits
    /// even though Shift produced the `W`; then the chord without the
    /// modifiers the keymap consumed.
    pub fn resolve(&self, press: &KeyPress) -> Option<Action> {
        self.lookup(&press.chord).or_else(|| {
            if press.consumed.is_empty() {
                None
            } else {
                self.lookup(&press.effective())
            }
        })
    }

    /// All bindings, ordered by their display form.
    pub fn bindings(&self) -> Vec<(&KeyBinding, Action)> {
        let mut all: Vec<_> = self.bindings.iter().map(|(k, a)| (k, *a)).collect();
        all.sort_by_key(|(k, _)| Self::display(k));
        all
    }

    /// Human form of a chord, e.g. `Ctrl+Shift+Left`.
    pub fn display(binding: &KeyBinding) -> String {
        let names = [
            (Modifiers::CTRL, "Ctrl"),
            (Modifiers::SHIFT, "Shift"),
            (Modifiers::ALT, "Alt"),
            (Modifiers::SUPER, "Super"),
        ];
        let mut parts: Vec<String> = names
            .iter()
            .filter(|(m, _)| binding.modifiers.contains(*m))
            .map(|(_, name)| name.to_string())
            .collect();
        parts.push(if binding.key.chars().count() == 1 {
            binding.key.to_uppercase()
        } else {
            binding.key.clone()
        });
        parts.join("+")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(mods: Modifiers, key: &str) -> KeyBinding {
        KeyBinding::new(mods, key)
    }

    #[test]
    fn test_zoom_bindings() {
        let mgr = KeybindingManager::new(Layout::SideBySide);
        assert_eq!(mgr.lookup(&chord(Modifiers::CTRL, "=")), Some(Action::IncreaseFontSize));
        assert_eq!(mgr.lookup(&chord(Modifiers::CTRL, "+")), Some(Action::IncreaseFontSize));
        assert_eq!(mgr.lookup(&chord(Modifiers::CTRL, "-")), Some(Action::DecreaseFontSize));
        assert_eq!(mgr.lookup(&chord(Modifiers::CTRL, "0")), Some(Action::ResetFontSize));
    }

    #[test]
    fn test_shifted_zoom_keys_resolve() {
        let mgr = KeybindingManager::new(Layout::SideBySide);
        let cs = Modifiers::CTRL | Modifiers::SHIFT;

        // `=` and `0` are Shift+key on German and AZERTY layouts
        let equal = KeyPress::new(cs, "=").with_consumed(Modifiers::SHIFT);
        assert_eq!(mgr.resolve(&equal), Some(Action::IncreaseFontSize));
        let zero = KeyPress::new(cs, "0").with_consumed(Modifiers::SHIFT);
        assert_eq!(mgr.resolve(&zero), Some(Action::ResetFontSize));
        // `+` is Shift+`=` on US layouts
        let plus = KeyPress::new(cs, "+").with_consumed(Modifiers::SHIFT);
        assert_eq!(mgr.resolve(&plus), Some(Action::IncreaseFontSize));
    }

    #[test]
    fn test_unconsumed_shift_still_required_exactly() {
        let mgr = KeybindingManager::new(Layout::SideBySide);
        let cs = Modifiers::CTRL | Modifiers::SHIFT;
        assert_eq!(mgr.resolve(&KeyPress::new(cs, "=")), None);
        assert_eq!(mgr.resolve(&KeyPress::new(Modifiers::CTRL, "Left")), None);
        assert_eq!(
            mgr.resolve(&KeyPress::new(cs, "Left")),
            Some(Action::PrevPane)
        );
    }

    #[test]
    fn test_consumed_shift_keeps_switch_chord() {
        let mgr = KeybindingManager::new(Layout::Stacked);
        let press = KeyPress::new(Modifiers::CTRL | Modifiers::SHIFT, "W")
            .with_consumed(Modifiers::SHIFT);
        assert_eq!(mgr.resolve(&press), Some(Action::NextPane));
    }

    #[test]
    fn test_pane_bindings() {
        let mgr = KeybindingManager::new(Layout::SideBySide);
        let cs = Modifiers::CTRL | Modifiers::SHIFT;
        assert_eq!(mgr.lookup(&chord(cs, "Left")), Some(Action::PrevPane));
        assert_eq!(mgr.lookup(&chord(cs, "Right")), Some(Action::NextPane));
    }

    #[test]
    fn test_switch_chord_only_when_stacked() {
        let cs = Modifiers::CTRL | Modifiers::SHIFT;
        let side = KeybindingManager::new(Layout::SideBySide);
        assert_eq!(side.lookup(&chord(cs, "w")), None);

        let stacked = KeybindingManager::new(Layout::Stacked);
        assert_eq!(stacked.lookup(&chord(cs, "w")), Some(Action::NextPane));
        assert_eq!(stacked.lookup(&chord(cs, "W")), Some(Action::NextPane));
    }

    #[test]
    fn test_unbound_chords() {
        let mgr = KeybindingManager::new(Layout::SideBySide);
        assert_eq!(mgr.lookup(&chord(Modifiers::empty(), "=")), None);
        assert_eq!(mgr.lookup(&chord(Modifiers::CTRL, "c")), None);
        assert_eq!(mgr.lookup(&chord(Modifiers::CTRL, "Left")), None);
        assert_eq!(mgr.lookup(&chord(Modifiers::CTRL | Modifiers::ALT, "0")), None);
    }

    #[test]
    fn test_key_normalization() {
        assert_eq!(chord(Modifiers::CTRL, "W").key, "w");
        assert_eq!(chord(Modifiers::CTRL, "Left").key, "Left");
    }

    #[test]
    fn test_display() {
        let cs = Modifiers::CTRL | Modifiers::SHIFT;
        assert_eq!(KeybindingManager::display(&chord(cs, "Left")), "Ctrl+Shift+Left");
        assert_eq!(KeybindingManager::display(&chord(cs, "w")), "Ctrl+Shift+W");
        assert_eq!(KeybindingManager::display(&chord(Modifiers::CTRL, "=")), "Ctrl+=");
    }

    #[test]
    fn test_binding_counts() {
        assert_eq!(KeybindingManager::new(Layout::SideBySide).bindings().len(), 6);
        assert_eq!(KeybindingManager::new(Layout::Stacked).bindings().len(), 7);
    }
}
