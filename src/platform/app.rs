/// Window application: connects the GTK window, the two VTE panes, the key
/// controller and the session.

use crate::config::{Config, Layout};
use crate::keybinding::{Dispatch, KeyPress, Modifiers};
use crate::pane::PANE_COUNT;
use crate::session::{EventHandler, Session};
use crate::terminal::{dispatch, TerminalFactory};

use gtk4::prelude::*;
use gtk4::{gdk, gio, glib};
use gtk4::{Application, ApplicationWindow, EventControllerKey, Orientation, PropagationPhase};
use log::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;
use vte4::Terminal;

pub const APP_ID: &str = "io.github.xtermng";

pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Blocks until the window closes or a shell exits.
    pub fn run(self) -> glib::ExitCode {
        let app = Application::builder()
            .application_id(APP_ID)
            .flags(gio::ApplicationFlags::NON_UNIQUE)
            .build();

        let config = Rc::new(self.config);
        app.connect_activate(move |app| build_window(app, &config));
        app.run()
    }
}

fn build_window(app: &Application, config: &Config) {
    let factory = TerminalFactory::new(&config.shell);
    let scale = config.font.default_scale;
    let views = [factory.create(scale), factory.create(scale)];

    let window = ApplicationWindow::builder()
        .application(app)
        .title(config.window.title.as_str())
        .default_width(config.window.width)
        .default_height(config.window.height)
        .child(&pane_layout(config.layout, &views))
        .build();
    apply_icon(&window, config);

    let quit_app = app.downgrade();
    let session = Rc::new(RefCell::new(Session::new(views.clone(), config, move || {
        if let Some(app) = quit_app.upgrade() {
            app.quit();
        }
    })));

    for (index, view) in views.iter().enumerate() {
        factory.spawn(view, index, &session);
    }

    let on_destroy = Rc::downgrade(&session);
    window.connect_destroy(move |_| dispatch(&on_destroy, |s| s.on_destroy()));

    // The controller keeps the session alive for as long as the window.
    window.add_controller(key_controller(session.clone()));

    info!("{:?} layout, shell {}", config.layout, config.shell.program);
    window.present();
    session.borrow().start();
}

fn pane_layout(layout: Layout, views: &[Terminal; PANE_COUNT]) -> gtk4::Box {
    let orientation = match layout {
        Layout::SideBySide => Orientation::Horizontal,
        Layout::Stacked => Orientation::Vertical,
    };
    let outer = gtk4::Box::new(orientation, 0);
    outer.set_homogeneous(true);

    for view in views {
        let pane = gtk4::Box::new(Orientation::Vertical, 0);
        pane.set_hexpand(true);
        pane.set_vexpand(true);
        pane.append(view);
        outer.append(&pane);
    }
    outer
}

/// Set the window icon from `~/.xtermng/icon/`, if the file is there.
fn apply_icon(window: &ApplicationWindow, config: &Config) {
    let Some(path) = config.icon() else {
        debug!("no icon at {}", config.icon_path().display());
        return;
    };
    let (Some(dir), Some(name)) = (path.parent(), path.file_stem().and_then(|s| s.to_str())) else {
        return;
    };
    let Some(display) = gdk::Display::default() else { return };

    gtk4::IconTheme::for_display(&display).add_search_path(dir);
    window.set_icon_name(Some(name));
}

fn key_controller<H>(session: Rc<RefCell<H>>) -> EventControllerKey
where
    H: EventHandler + 'static,
{
    let controller = EventControllerKey::new();
    // Capture phase: see chords before the focused terminal does.
    controller.set_propagation_phase(PropagationPhase::Capture);
    controller.connect_key_pressed(move |controller, key, _, state| {
        // Modifiers the keymap spent producing `key`, e.g. Shift for `=` on de_DE.
        let consumed = controller
            .current_event()
            .and_then(|event| event.downcast::<gdk::KeyEvent>().ok())
            .map(|event| event.consumed_modifiers())
            .unwrap_or_else(gdk::ModifierType::empty);
        let Some(press) = key_press(key, state, consumed) else {
            return glib::Propagation::Proceed;
        };
        let Ok(mut session) = session.try_borrow_mut() else {
            return glib::Propagation::Proceed;
        };
        match session.on_key_chord(&press) {
            Dispatch::Consumed => glib::Propagation::Stop,
            Dispatch::NotConsumed => glib::Propagation::Proceed,
        }
    });
    controller
}

/// Translate a GDK key press. Lock modifiers are dropped.
pub fn key_press(
    key: gdk::Key,
    state: gdk::ModifierType,
    consumed: gdk::ModifierType,
) -> Option<KeyPress> {
    let name = key_name(key)?;
    Some(KeyPress::new(modifiers(state), &name).with_consumed(modifiers(consumed)))
}

pub fn modifiers(state: gdk::ModifierType) -> Modifiers {
    let table = [
        (gdk::ModifierType::CONTROL_MASK, Modifiers::CTRL),
        (gdk::ModifierType::SHIFT_MASK, Modifiers::SHIFT),
        (gdk::ModifierType::ALT_MASK, Modifiers::ALT),
        (gdk::ModifierType::SUPER_MASK, Modifiers::SUPER),
    ];
    table
        .iter()
        .filter(|(mask, _)| state.contains(*mask))
        .fold(Modifiers::empty(), |acc, (_, m)| acc | *m)
}

pub fn key_name(key: gdk::Key) -> Option<String> {
    match key {
        gdk::Key::Left | gdk::Key::KP_Left => Some("Left".into()),
        gdk::Key::Right | gdk::Key::KP_Right => Some("Right".into()),
        gdk::Key::KP_Add => Some("+".into()),
        gdk::Key::KP_Subtract => Some("-".into()),
        gdk::Key::KP_0 => Some("0".into()),
        _ => key.to_unicode().filter(|c| !c.is_control()).map(String::from),
    }
}
