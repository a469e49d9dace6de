#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// The simulation advances every frame
    Running,
    /// Frozen until resumed
    Paused,
    /// Hit by an enemy projectile; only a restart leaves this state
    PlayerDefeated,
}

impl GameState {
    pub fn is_running(&self) -> bool {
        *self == GameState::Running
    }

    pub fn is_terminal(&self) -> bool {
        *self == GameState::PlayerDefeated
    }

    /// Running and Paused swap; the terminal state is left alone
    pub fn toggled_pause(self) -> Self {
        match self {
            GameState::Running => GameState::Paused,
            GameState::Paused => GameState::Running,
            GameState::PlayerDefeated => GameState::PlayerDefeated,
        }
    }
}
