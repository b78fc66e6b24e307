//! Screens, navigation buttons and player input

/// Full-screen views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Menu,
    Game,
    GameOver,
    Instructions,
    HighScores,
}

impl Screen {
    pub const ALL: [Screen; 5] = [
        Screen::Menu,
        Screen::Game,
        Screen::GameOver,
        Screen::Instructions,
        Screen::HighScores,
    ];

    /// DOM id of the screen container
    pub fn element_id(&self) -> &'static str {
        match self {
            Screen::Menu => "menu-screen",
            Screen::Game => "game-screen",
            Screen::GameOver => "game-over-screen",
            Screen::Instructions => "instructions-screen",
            Screen::HighScores => "high-scores-screen",
        }
    }
}

/// Navigation buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Start,
    Instructions,
    HighScores,
    PlayAgain,
    Menu,
    /// Back from instructions
    Back,
    BackFromScores,
}

impl Button {
    pub const ALL: [Button; 7] = [
        Button::Start,
        Button::Instructions,
        Button::HighScores,
        Button::PlayAgain,
        Button::Menu,
        Button::Back,
        Button::BackFromScores,
    ];

    pub fn element_id(&self) -> &'static str {
        match self {
            Button::Start => "start-button",
            Button::Instructions => "instructions-button",
            Button::HighScores => "high-scores-button",
            Button::PlayAgain => "play-again-button",
            Button::Menu => "menu-button",
            Button::Back => "back-button",
            Button::BackFromScores => "back-from-scores-button",
        }
    }
}

/// Raw player input; all three shift orbit while a game is running
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Key press, by `KeyboardEvent.code`
    Key(String),
    PointerDown,
    TouchStart,
}

impl InputEvent {
    /// Whether this input asks for an orbit change
    pub fn is_orbit_shift(&self, action_key: &str) -> bool {
        match self {
            InputEvent::Key(code) => code == action_key,
            InputEvent::PointerDown | InputEvent::TouchStart => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_shift_inputs() {
        assert!(InputEvent::Key("Space".into()).is_orbit_shift("Space"));
        assert!(!InputEvent::Key("KeyA".into()).is_orbit_shift("Space"));
        assert!(InputEvent::PointerDown.is_orbit_shift("Space"));
        assert!(InputEvent::TouchStart.is_orbit_shift("Space"));
    }
}
