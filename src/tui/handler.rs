use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    MoveToTop,
    MoveToBottom,
    NextPage,
    PrevPage,
    // Keyword input actions
    StartInput,
    InputChar(char),
    InputBackspace,
    InputConfirm,
    InputCancel,
    // Pipeline modes
    CycleJoinMode,
    ToggleScope,
    ToggleScoring,
    // Source picker actions
    OpenSourcePicker,
    PickerUp,
    PickerDown,
    PickerToggle,
    PickerSelectAll,
    PickerConfirm,
    PickerCancel,
    Export,
    OpenInBrowser,
    ShowHelp,
    HideHelp,
}

pub fn handle_key_event(
    key: KeyEvent,
    input_active: bool,
    picker_active: bool,
    show_help: bool,
) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return Some(AppAction::Quit);
    }

    // Keyword input mode
    if input_active {
        return match key.code {
            KeyCode::Enter => Some(AppAction::InputConfirm),
            KeyCode::Esc => Some(AppAction::InputCancel),
            KeyCode::Backspace => Some(AppAction::InputBackspace),
            KeyCode::Char(c) => Some(AppAction::InputChar(c)),
            _ => None,
        };
    }

    // Source picker popup
    if picker_active {
        return match key.code {
            KeyCode::Enter => Some(AppAction::PickerConfirm),
            KeyCode::Esc => Some(AppAction::PickerCancel),
            KeyCode::Char(' ') => Some(AppAction::PickerToggle),
            KeyCode::Char('a') => Some(AppAction::PickerSelectAll),
            KeyCode::Char('j') | KeyCode::Down => Some(AppAction::PickerDown),
            KeyCode::Char('k') | KeyCode::Up => Some(AppAction::PickerUp),
            _ => None,
        };
    }

    // Normal mode
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),
        (KeyCode::Char('<'), _) => Some(AppAction::MoveToTop),
        (KeyCode::Char('>'), _) => Some(AppAction::MoveToBottom),
        (KeyCode::Char('n'), _) | (KeyCode::Right, _) | (KeyCode::PageDown, _) => {
            Some(AppAction::NextPage)
        }
        (KeyCode::Char('p'), _) | (KeyCode::Left, _) | (KeyCode::PageUp, _) => {
            Some(AppAction::PrevPage)
        }

        (KeyCode::Char('/'), _) | (KeyCode::Char('i'), _) => Some(AppAction::StartInput),

        (KeyCode::Char('m'), _) => Some(AppAction::CycleJoinMode),
        (KeyCode::Char('t'), _) => Some(AppAction::ToggleScope),
        (KeyCode::Char('c'), _) => Some(AppAction::ToggleScoring),
        (KeyCode::Char('s'), _) => Some(AppAction::OpenSourcePicker),
        (KeyCode::Char('x'), _) => Some(AppAction::Export),
        (KeyCode::Char('o'), _) | (KeyCode::Enter, _) => Some(AppAction::OpenInBrowser),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_input_mode_captures_letters() {
        assert!(matches!(
            handle_key_event(key(KeyCode::Char('q')), true, false, false),
            Some(AppAction::InputChar('q'))
        ));
        assert!(matches!(
            handle_key_event(key(KeyCode::Enter), true, false, false),
            Some(AppAction::InputConfirm)
        ));
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(handle_key_event(ctrl_c, true, false, false), Some(AppAction::Quit)));
        assert!(matches!(handle_key_event(ctrl_c, false, true, false), Some(AppAction::Quit)));
        assert!(matches!(handle_key_event(ctrl_c, false, false, false), Some(AppAction::Quit)));
    }

    #[test]
    fn test_help_swallows_any_key() {
        assert!(matches!(
            handle_key_event(key(KeyCode::Char('x')), false, false, true),
            Some(AppAction::HideHelp)
        ));
    }

    #[test]
    fn test_picker_keys() {
        assert!(matches!(
            handle_key_event(key(KeyCode::Char(' ')), false, true, false),
            Some(AppAction::PickerToggle)
        ));
        assert!(matches!(
            handle_key_event(key(KeyCode::Char('q')), false, true, false),
            None
        ));
    }

    #[test]
    fn test_normal_mode_keys() {
        assert!(matches!(handle_key_event(key(KeyCode::Char('x')), false, false, false), Some(AppAction::Export)));
        assert!(matches!(handle_key_event(key(KeyCode::Char('n')), false, false, false), Some(AppAction::NextPage)));
        assert!(matches!(handle_key_event(key(KeyCode::Char('m')), false, false, false), Some(AppAction::CycleJoinMode)));
        assert!(matches!(handle_key_event(key(KeyCode::Char('c')), false, false, false), Some(AppAction::ToggleScoring)));
    }
}
