//! Keyboard Module - key bindings for the inspector.
//!
//! Maps crossterm key events to [`Action`]s. Release events are ignored;
//! repeats act like presses so held arrows keep scrolling.
//!
//! | key                 | action                              |
//! |---------------------|-------------------------------------|
//! | ← / →               | scroll one step                     |
//! | Shift+← / Shift+→   | scroll one page                     |
//! | Home / End          | scroll to start / end               |
//! | ↑ / ↓               | move focus                          |
//! | Enter / Space       | expand or collapse focused node     |
//! | `[` / `]`           | skip to start / end of focused node |
//! | `l`                 | log focused node's element          |
//! | PgUp / PgDn         | scroll rows by one page             |
//! | Tab                 | next bundled example                |
//! | `q` / Esc / Ctrl+C  | quit                                |

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::engine::NodeId;

// =============================================================================
// TYPES
// =============================================================================

/// Something the user can do to one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeAction {
    Toggle,
    SkipBackward,
    SkipForward,
    LogElement,
}

/// Which node a [`NodeAction`] applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Focused,
    Node(NodeId),
}

/// Inspector command produced by keyboard or mouse input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Horizontal scroll by this many steps.
    ScrollSteps(i32),
    /// Horizontal scroll by this many viewport widths.
    ScrollPages(i32),
    ScrollHome,
    ScrollEnd,
    /// Vertical scroll by this many rows.
    ScrollRows(i32),
    /// Vertical scroll by this many viewport heights.
    ScrollRowPages(i32),
    FocusPrev,
    FocusNext,
    Node(NodeAction, Target),
    NextExample,
}

// =============================================================================
// BINDINGS
// =============================================================================

/// Translate a key event into an action.
pub fn action_for_key(event: &KeyEvent) -> Option<Action> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let shift = event.modifiers.contains(KeyModifiers::SHIFT);
    let focused = |action| Some(Action::Node(action, Target::Focused));

    match event.code {
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),

        KeyCode::Left if shift => Some(Action::ScrollPages(-1)),
        KeyCode::Right if shift => Some(Action::ScrollPages(1)),
        KeyCode::Left => Some(Action::ScrollSteps(-1)),
        KeyCode::Right => Some(Action::ScrollSteps(1)),
        KeyCode::Home => Some(Action::ScrollHome),
        KeyCode::End => Some(Action::ScrollEnd),

        KeyCode::Up => Some(Action::FocusPrev),
        KeyCode::Down => Some(Action::FocusNext),
        KeyCode::PageUp => Some(Action::ScrollRowPages(-1)),
        KeyCode::PageDown => Some(Action::ScrollRowPages(1)),

        KeyCode::Enter | KeyCode::Char(' ') => focused(NodeAction::Toggle),
        KeyCode::Char('[') => focused(NodeAction::SkipBackward),
        KeyCode::Char(']') => focused(NodeAction::SkipForward),
        KeyCode::Char('l') => focused(NodeAction::LogElement),

        KeyCode::Tab => Some(Action::NextExample),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(action_for_key(&key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(action_for_key(&key(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(
            action_for_key(&key_with(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(action_for_key(&key(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_scroll_keys() {
        assert_eq!(action_for_key(&key(KeyCode::Left)), Some(Action::ScrollSteps(-1)));
        assert_eq!(action_for_key(&key(KeyCode::Right)), Some(Action::ScrollSteps(1)));
        assert_eq!(
            action_for_key(&key_with(KeyCode::Right, KeyModifiers::SHIFT)),
            Some(Action::ScrollPages(1))
        );
        assert_eq!(action_for_key(&key(KeyCode::PageDown)), Some(Action::ScrollRowPages(1)));
    }

    #[test]
    fn test_node_keys_target_focus() {
        assert_eq!(
            action_for_key(&key(KeyCode::Enter)),
            Some(Action::Node(NodeAction::Toggle, Target::Focused))
        );
        assert_eq!(
            action_for_key(&key(KeyCode::Char('['))),
            Some(Action::Node(NodeAction::SkipBackward, Target::Focused))
        );
        assert_eq!(
            action_for_key(&key(KeyCode::Char(']'))),
            Some(Action::Node(NodeAction::SkipForward, Target::Focused))
        );
        assert_eq!(
            action_for_key(&key(KeyCode::Char('l'))),
            Some(Action::Node(NodeAction::LogElement, Target::Focused))
        );
    }

    #[test]
    fn test_release_ignored_repeat_kept() {
        let mut release = key(KeyCode::Right);
        release.kind = KeyEventKind::Release;
        assert_eq!(action_for_key(&release), None);

        let repeat = KeyEvent {
            code: KeyCode::Right,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Repeat,
            state: KeyEventState::NONE,
        };
        assert_eq!(action_for_key(&repeat), Some(Action::ScrollSteps(1)));
    }
}
