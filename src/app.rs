use color_eyre::Result;
use ratatui::{Terminal, backend::Backend};
use std::time::{Duration, Instant};

use crate::assets::Assets;
use crate::audio::AudioManager;
use crate::entities::GameState;
use crate::input::{InputAction, InputManager};
use crate::renderer::{GameRenderer, RenderView};
use crate::settings::Settings;
use crate::world::{InputState, World, WorldEvent};

/// The main application which holds the state and logic of the application.
pub struct App {
    running: bool,
    world: World,
    assets: Assets,
    settings: Settings,
    /// Frames info
    last_frame_time: Instant,
    fps: u32,
    /// Time spent running, frozen while paused or defeated
    play_time: Duration,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
    audio_manager: Option<AudioManager>,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(
        world: World,
        assets: Assets,
        settings: Settings,
        audio_manager: Option<AudioManager>,
        reports_key_release: bool,
    ) -> Self {
        Self {
            running: true,
            world,
            assets,
            settings,
            last_frame_time: Instant::now(),
            fps: 0,
            play_time: Duration::ZERO,
            input_manager: InputManager::new(reports_key_release),
            renderer: GameRenderer::new(),
            audio_manager,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn play_time(&self) -> Duration {
        self.play_time
    }

    /// Run the application's main loop.
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let frame_budget = self.settings.frame_budget();

        while self.running {
            let frame_start = Instant::now();

            // Calculate FPS
            let frame_time = frame_start.duration_since(self.last_frame_time);
            self.last_frame_time = frame_start;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }

            // Render the frame
            terminal.draw(|frame| {
                let view = RenderView {
                    world: &self.world,
                    assets: &self.assets,
                    cell: self.settings.cell_size(),
                    fps: self.fps,
                    elapsed_time_secs: self.play_time.as_secs(),
                };
                self.renderer.render(frame, &view);
            })?;

            // Poll input events and get actions
            self.input_manager.poll_events(&self.world.state)?;
            let actions = self.input_manager.actions().to_vec();
            let held = self.input_manager.input_state();

            self.step(&actions, held, frame_budget);

            // Sleep off the rest of the frame budget
            if let Some(rest) = frame_budget.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }

        log::info!(
            "exiting after {:.1}s of play with score {}",
            self.play_time.as_secs_f32(),
            self.world.score
        );
        Ok(())
    }

    /// One frame of game logic: actions, tick, then event fan-out
    pub fn step(&mut self, actions: &[InputAction], held: InputState, frame_time: Duration) {
        self.process_actions(actions);

        if self.world.state == GameState::Running {
            self.play_time += frame_time;
        }
        self.world.tick(&held);

        self.handle_world_events();
    }

    /// Process input actions and update game state accordingly
    fn process_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::Pause | InputAction::Resume => {
                    self.world.toggle_pause();
                    self.input_manager.reset_held();
                    log::debug!("game state now {:?}", self.world.state);
                }
                InputAction::Restart => {
                    self.world.restart();
                    self.input_manager.reset_held();
                    self.play_time = Duration::ZERO;
                    log::info!("restarted");
                }
                InputAction::Fire => {
                    self.world.fire();
                }
            }
        }
    }

    fn handle_world_events(&mut self) {
        for event in self.world.drain_events() {
            if let Some(audio) = &self.audio_manager {
                audio.play_event(&event);
            }

            match event {
                WorldEvent::FormationSpawned { id, enemies } => {
                    log::info!("formation {id} arrived with {enemies} fires");
                }
                WorldEvent::FormationCleared { id } => {
                    log::info!("formation {id} extinguished, score {}", self.world.score);
                }
                WorldEvent::PlayerDefeated => {
                    log::info!(
                        "defeated after {:.1}s with score {}",
                        self.play_time.as_secs_f32(),
                        self.world.score
                    );
                }
                WorldEvent::PlayerFired
                | WorldEvent::EnemyFired
                | WorldEvent::EnemyDestroyed { .. } => {
                    log::trace!("{event:?}");
                }
            }
        }
    }
}
