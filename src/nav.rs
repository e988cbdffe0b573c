use crate::session::{Host, ImpactStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Onboarding,
    Hello,
    Menu,
    Games,
    Admin,
}

/// Screen navigation stack.
///
/// The host back button is shown exactly while there is somewhere to go back
/// to; transitions fire selection haptics.
pub struct NavStack {
    current: Screen,
    history: Vec<Screen>,
}

impl NavStack {
    pub fn new(root: Screen, host: &dyn Host) -> Self {
        host.set_back_button(false);
        Self {
            current: root,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    pub fn push(&mut self, screen: Screen, host: &dyn Host) {
        if screen == self.current {
            return;
        }
        self.history.push(self.current);
        self.current = screen;
        host.haptic_select();
        host.set_back_button(true);
    }

    pub fn back(&mut self, host: &dyn Host) -> Option<Screen> {
        let previous = self.history.pop()?;
        self.current = previous;
        host.haptic_impact(ImpactStyle::Light);
        host.set_back_button(!self.history.is_empty());
        Some(self.current)
    }

    /// Collapses the stack onto a new root, e.g. once registration completes.
    pub fn reset_to(&mut self, root: Screen, host: &dyn Host) {
        self.history.clear();
        self.current = root;
        host.set_back_button(false);
    }
}
