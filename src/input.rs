use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::entities::GameState;
use crate::world::InputState;

/// Frames a movement key stays held after a press when the terminal
/// cannot report key releases. Key repeat refreshes it.
pub const AUTO_RELEASE_FRAMES: u8 = 8;

/// Represents semantic one-shot actions triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Fire,
    Pause,
    Resume,
    Restart,
    Quit,
}

#[derive(Debug, Default, Clone, Copy)]
struct HeldKey {
    pressed: bool,
    frames_left: u8,
}

impl HeldKey {
    fn press(&mut self) {
        self.pressed = true;
        self.frames_left = AUTO_RELEASE_FRAMES;
    }

    fn release(&mut self) {
        self.pressed = false;
        self.frames_left = 0;
    }

    fn decay(&mut self) {
        self.frames_left = self.frames_left.saturating_sub(1);
        if self.frames_left == 0 {
            self.pressed = false;
        }
    }
}

/// Tracks the state of keys that can be held down for continuous input
#[derive(Debug, Default)]
struct KeyState {
    left: HeldKey,
    right: HeldKey,
}

/// Manages input polling and translates raw key events into game actions
pub struct InputManager {
    key_state: KeyState,
    oneshot_actions: Vec<InputAction>,
    /// False when the terminal only reports presses
    reports_release: bool,
}

impl InputManager {
    pub fn new(reports_release: bool) -> Self {
        Self {
            key_state: KeyState::default(),
            oneshot_actions: Vec::new(),
            reports_release,
        }
    }

    /// Polls for all input events and stores one-shot actions
    /// Should be called once per frame before reading actions
    pub fn poll_events(&mut self, game_state: &GameState) -> color_eyre::Result<()> {
        self.begin_frame();

        // Poll for all available events without blocking
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event, game_state);
            }
        }

        Ok(())
    }

    /// Drops last frame's one-shot actions and ages auto-released keys
    pub fn begin_frame(&mut self) {
        self.oneshot_actions.clear();
        if !self.reports_release {
            self.key_state.left.decay();
            self.key_state.right.decay();
        }
    }

    /// Processes a key event and updates key state and one-shot actions
    pub fn handle_key_event(&mut self, key_event: KeyEvent, game_state: &GameState) {
        match key_event.kind {
            KeyEventKind::Press => self.handle_key_press(key_event, game_state, false),
            KeyEventKind::Repeat => self.handle_key_press(key_event, game_state, true),
            KeyEventKind::Release => self.handle_key_release(key_event.code),
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, game_state: &GameState, repeat: bool) {
        // Check for quit keys first (works in any state)
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        // State-specific one-shot actions
        let is_pause_key = matches!(key_event.code, KeyCode::Char('p') | KeyCode::Char('P'));
        match game_state {
            GameState::Running if is_pause_key => {
                self.oneshot_actions.push(InputAction::Pause);
                return;
            }
            GameState::Paused if is_pause_key => {
                self.oneshot_actions.push(InputAction::Resume);
                return;
            }
            GameState::PlayerDefeated
                if matches!(key_event.code, KeyCode::Char('r') | KeyCode::Char('R')) =>
            {
                self.oneshot_actions.push(InputAction::Restart);
                return;
            }
            _ => {}
        }

        // Gameplay keys only count while running
        if *game_state != GameState::Running {
            return;
        }

        match key_event.code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.key_state.left.press();
                self.key_state.right.release();
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.key_state.right.press();
                self.key_state.left.release();
            }
            // Fire is edge-triggered: auto-repeat does not fire again
            KeyCode::Char(' ') if !repeat => {
                self.oneshot_actions.push(InputAction::Fire);
            }
            _ => {}
        }
    }

    fn handle_key_release(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.key_state.left.release();
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.key_state.right.release();
            }
            _ => {}
        }
    }

    /// One-shot actions gathered this frame, in arrival order
    pub fn actions(&self) -> &[InputAction] {
        &self.oneshot_actions
    }

    /// Movement keys currently held
    pub fn input_state(&self) -> InputState {
        InputState {
            left: self.key_state.left.pressed,
            right: self.key_state.right.pressed,
        }
    }

    /// Forget held keys, e.g. after a pause or restart
    pub fn reset_held(&mut self) {
        self.key_state = KeyState::default();
    }
}
