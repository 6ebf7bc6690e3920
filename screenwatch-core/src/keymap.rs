use std::collections::BTreeMap;

use crate::config::KeyConfig;

/// Semantic actions reachable from single-key bindings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Re-run the fetch and replace the snapshot
    Refresh,
    /// Open the keybind help panel
    Help,
    /// Step out of the current overlay
    Back,
    /// Open the calendar overview
    Calendar,
    Quit,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Refresh => "refresh",
            Action::Help => "help",
            Action::Back => "back",
            Action::Calendar => "calendar",
            Action::Quit => "quit",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Action::Refresh => "Refresh the screen data",
            Action::Help => "Show this keybind list",
            Action::Back => "Back to the previous panel",
            Action::Calendar => "Open the calendar overview",
            Action::Quit => "Quit",
        }
    }
}

/// Case-insensitive lookup from key to action
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: BTreeMap<char, Action>,
    order: Vec<(char, Action)>,
}

impl Keymap {
    pub fn from_config(keys: &KeyConfig) -> Self {
        let order: Vec<(char, Action)> = keys.bindings().to_vec();
        let bindings = order
            .iter()
            .map(|(key, action)| (key.to_ascii_lowercase(), *action))
            .collect();
        Self { bindings, order }
    }

    pub fn action_for(&self, key: char) -> Option<Action> {
        self.bindings.get(&key.to_ascii_lowercase()).copied()
    }

    /// Bindings in display order, for the help panel
    pub fn entries(&self) -> &[(char, Action)] {
        &self.order
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings_are_case_insensitive() {
        let keymap = Keymap::default();
        assert_eq!(keymap.action_for('r'), Some(Action::Refresh));
        assert_eq!(keymap.action_for('R'), Some(Action::Refresh));
        assert_eq!(keymap.action_for('K'), Some(Action::Help));
        assert_eq!(keymap.action_for('b'), Some(Action::Back));
        assert_eq!(keymap.action_for('x'), None);
    }

    #[test]
    fn test_custom_bindings() {
        let keys = KeyConfig {
            back: 'h',
            ..KeyConfig::default()
        };
        let keymap = Keymap::from_config(&keys);
        assert_eq!(keymap.action_for('h'), Some(Action::Back));
        assert_eq!(keymap.action_for('b'), None);
        assert_eq!(keymap.entries().len(), 5);
    }
}
