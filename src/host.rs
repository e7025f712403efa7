use std::collections::HashSet;
use std::io::{self, Write};

use crossterm::{execute, terminal::SetTitle};

use crate::chrome::ChromeButton;

/// The window surface the controller draws onto: a title and the CSS-like
/// classes of the chrome controls.
pub trait WindowHost {
    fn set_title(&mut self, title: &str);
    fn set_control_class(&mut self, button: ChromeButton, class: &str, present: bool);
}

/// Control classes currently applied, keyed by button.
#[derive(Debug, Default)]
pub struct ControlClasses {
    applied: HashSet<(ChromeButton, String)>,
}

impl ControlClasses {
    /// Returns whether the set changed.
    pub fn set(&mut self, button: ChromeButton, class: &str, present: bool) -> bool {
        if present {
            self.applied.insert((button, class.to_string()))
        } else {
            self.applied.remove(&(button, class.to_string()))
        }
    }

    pub fn contains(&self, button: ChromeButton, class: &str) -> bool {
        self.applied.contains(&(button, class.to_string()))
    }
}

/// Host backed by the controlling terminal: the title goes out as an OSC
/// sequence on stdout.
#[derive(Debug, Default)]
pub struct TerminalHost {
    classes: ControlClasses,
}

impl TerminalHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WindowHost for TerminalHost {
    fn set_title(&mut self, title: &str) {
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, SetTitle(title)) {
            tracing::warn!("failed to set terminal title: {}", e);
        }
        let _ = stdout.flush();
    }

    fn set_control_class(&mut self, button: ChromeButton, class: &str, present: bool) {
        if self.classes.set(button, class, present) {
            tracing::debug!(?button, class, present, "control class changed");
        }
    }
}

/// Host that prints every change as a line. Used by replay.
pub struct PrintHost<W: Write> {
    out: W,
    classes: ControlClasses,
}

impl<W: Write> PrintHost<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            classes: ControlClasses::default(),
        }
    }

    /// Print a free-form line alongside the host output.
    pub fn note(&mut self, line: &str) {
        let _ = writeln!(self.out, "{}", line);
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> WindowHost for PrintHost<W> {
    fn set_title(&mut self, title: &str) {
        let _ = writeln!(self.out, "title: {}", title);
    }

    fn set_control_class(&mut self, button: ChromeButton, class: &str, present: bool) {
        if self.classes.set(button, class, present) {
            let sign = if present { '+' } else { '-' };
            let _ = writeln!(self.out, "class: {} {}{}", button.name(), sign, class);
        }
    }
}
