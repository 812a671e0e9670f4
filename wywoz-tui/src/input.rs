use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run the lookup for the typed street and house number
    LoadSchedule,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, BackTab, Char, Down, Enter, Esc, Left, Tab, Up};

    // Global quit shortcut
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    let mut action = Action::None;

    match app.screen {
        Screen::AddressInput => match key.code {
            Char(character) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    app.focused_input().push(character);
                }
            }
            Backspace => {
                app.focused_input().pop();
            }
            Tab | BackTab | Up | Down => app.toggle_focus(),
            Enter => {
                action = Action::LoadSchedule;
            }
            Esc => {
                action = Action::Quit;
            }
            _ => {}
        },

        Screen::ScheduleView => match key.code {
            Left | Esc | Char('b') => {
                app.screen = Screen::AddressInput;
            }
            Char('r') => {
                action = Action::LoadSchedule;
            }
            Char('q') => {
                action = Action::Quit;
            }
            _ => {}
        },
    }
    action
}
