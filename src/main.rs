use std::io::stdout;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::{
    Result,
    eyre::{WrapErr, bail},
};
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};

use extinguish::app::App;
use extinguish::assets::{Assets, bundled_dir};
use extinguish::audio::AudioManager;
use extinguish::consts::{FORMATION_COLUMNS, GRID_PITCH_X};
use extinguish::renderer::playfield_for;
use extinguish::settings::Settings;
use extinguish::{Playfield, SpriteSizes, World, logging};

/// Put out descending formations of fire before they reach you
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON settings file; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding img/ and sounds/
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Disable sound effects
    #[arg(long)]
    mute: bool,

    /// Where log output goes
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(dir) = &self.assets {
            settings.assets_dir = dir.clone();
        } else if settings.assets_dir == Settings::default().assets_dir
            && !settings.assets_dir.exists()
        {
            // Running outside the crate root: use the bundled copy
            settings.assets_dir = bundled_dir();
        }
        if self.mute {
            settings.muted = true;
        }
        if let Some(path) = &self.log_file {
            settings.log_file = path.clone();
        }

        Ok(settings)
    }
}

/// Room for the player and for the widest formation to sweep sideways
fn check_playfield(playfield: Playfield, sprites: SpriteSizes) -> Result<()> {
    let widest_formation =
        (FORMATION_COLUMNS.end - 2) as f32 * GRID_PITCH_X + sprites.enemy.x;
    let min_width = sprites.player.x.max(widest_formation);
    let min_height = sprites.player.y * 2.0;

    if playfield.width <= min_width || playfield.height < min_height {
        bail!(
            "terminal too small: playfield is {}x{} pixels, need more than {}x{}",
            playfield.width,
            playfield.height,
            min_width,
            min_height
        );
    }
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let settings = cli.settings()?;
    logging::init(&settings)?;
    log::info!("starting with {settings:?}");

    // Sprites are required, so load them before touching the terminal
    let assets = Assets::load(&settings.assets_dir, settings.cell_size())?;

    let (columns, rows) = crossterm::terminal::size().wrap_err("failed to read terminal size")?;
    let playfield = playfield_for(Rect::new(0, 0, columns, rows), settings.cell_size());
    check_playfield(playfield, assets.sizes())?;

    let seed = cli.seed.unwrap_or_else(rand::random);
    log::info!(
        "playfield {}x{} pixels, seed {seed}",
        playfield.width,
        playfield.height
    );
    let world = World::new(playfield, assets.sizes(), seed);

    let audio = AudioManager::try_new(&settings.assets_dir, settings.effective_volume());

    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    log::info!("keyboard enhancement supported: {supports_keyboard_enhancement}");

    // Setup terminal manually for full control
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Enable keyboard enhancement AFTER entering alternate screen
    if supports_keyboard_enhancement {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = App::new(
        world,
        assets,
        settings,
        audio,
        supports_keyboard_enhancement,
    )
    .run(&mut terminal);

    // Cleanup
    if supports_keyboard_enhancement {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
