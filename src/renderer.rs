use glam::Vec2;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::assets::{Assets, CellSize, Sprite};
use crate::entities::GameState;
use crate::world::{Playfield, World};

/// Rows reserved for the HUD (top) and the controls hint (bottom)
const HUD_ROWS: u16 = 1;
const CONTROLS_ROWS: u16 = 1;

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub world: &'a World,
    pub assets: &'a Assets,
    pub cell: CellSize,
    pub fps: u32,
    pub elapsed_time_secs: u64,
}

/// The part of the terminal the playfield is drawn into
pub fn game_area(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + HUD_ROWS.min(area.height),
        width: area.width,
        height: area.height.saturating_sub(HUD_ROWS + CONTROLS_ROWS),
    }
}

/// Pixel size of the playfield that fits a terminal of `area`
pub fn playfield_for(area: Rect, cell: CellSize) -> Playfield {
    let game = game_area(area);
    Playfield {
        width: game.width as f32 * cell.width,
        height: game.height as f32 * cell.height,
    }
}

/// Terminal cell holding a playfield point, if it is on screen
pub fn to_cell(position: Vec2, cell: CellSize, game_area: Rect) -> Option<(u16, u16)> {
    let x = (position.x / cell.width).floor();
    let y = (position.y / cell.height).floor();
    if x < 0.0 || y < 0.0 || x >= game_area.width as f32 || y >= game_area.height as f32 {
        return None;
    }
    Some((game_area.x + x as u16, game_area.y + y as u16))
}

/// Sparse, stable star field: a cheap hash of the cell decides
fn is_star(x: u16, y: u16) -> bool {
    let h = (x as u32).wrapping_mul(73_856_093) ^ (y as u32).wrapping_mul(19_349_663);
    h % 47 == 0
}

/// Nozzle glyph for the player's tilt
fn nozzle_glyph(rotation: f32) -> &'static str {
    if rotation < 0.0 {
        "╲"
    } else if rotation > 0.0 {
        "╱"
    } else {
        "│"
    }
}

fn particle_color(lifetime: u8) -> Color {
    if lifetime > 8 {
        Color::Yellow
    } else if lifetime > 4 {
        Color::LightRed
    } else {
        Color::Red
    }
}

/// Handles all rendering responsibilities for the game
#[derive(Debug, Default)]
pub struct GameRenderer;

impl GameRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Main render method that dispatches to state-specific renderers
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        self.render_game(frame, view);

        match view.world.state {
            GameState::Running => {}
            GameState::Paused => self.render_paused(frame),
            GameState::PlayerDefeated => self.render_defeated(frame, view),
        }
    }

    /// Renders the active gameplay screen
    fn render_game(&self, frame: &mut Frame, view: &RenderView) {
        let area = frame.area();
        let game = game_area(area);
        let world = view.world;
        let cell = view.cell;

        // Render entities with direct buffer access
        let buffer = frame.buffer_mut();
        draw_stars(buffer, game);

        for formation in &world.formations {
            for enemy in &formation.enemies {
                draw_sprite(buffer, &view.assets.enemy, enemy.position, cell, game);
            }
        }

        if world.state != GameState::PlayerDefeated {
            let player = &world.player;
            draw_sprite(buffer, &view.assets.player, player.position, cell, game);

            let nozzle = Vec2::new(player.center().x, player.position.y - cell.height / 2.0);
            if let Some((x, y)) = to_cell(nozzle, cell, game) {
                buffer.set_string(
                    x,
                    y,
                    nozzle_glyph(player.rotation),
                    Style::default().fg(Color::White),
                );
            }
        }

        for projectile in &world.projectiles {
            if let Some((x, y)) = to_cell(projectile.position, cell, game) {
                buffer.set_string(
                    x,
                    y,
                    "•",
                    Style::default()
                        .fg(Color::LightCyan)
                        .add_modifier(Modifier::BOLD),
                );
            }
        }

        for projectile in &world.enemy_projectiles {
            if let Some((x, y)) = to_cell(projectile.bounds().center(), cell, game) {
                buffer.set_string(x, y, "!", Style::default().fg(Color::LightRed));
            }
        }

        for particle in &world.particles {
            if let Some((x, y)) = to_cell(particle.position, cell, game) {
                buffer.set_string(
                    x,
                    y,
                    particle.char.to_string(),
                    Style::default()
                        .fg(particle_color(particle.lifetime))
                        .add_modifier(Modifier::BOLD),
                );
            }
        }

        self.render_hud(frame, view, area);
    }

    fn render_hud(&self, frame: &mut Frame, view: &RenderView, area: Rect) {
        let label = Style::default().fg(Color::DarkGray);
        let value = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);

        // Stats overlay at the top - left side
        let stats_left = Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(format!("{}", view.world.score), value(Color::Yellow)),
            Span::styled("  Formations: ", label),
            Span::styled(
                format!("{}", view.world.formations.len()),
                value(Color::Magenta),
            ),
            Span::styled("  Enemies: ", label),
            Span::styled(format!("{}", view.world.enemy_count()), value(Color::Cyan)),
            Span::styled("  FPS: ", label),
            Span::styled(format!("{}", view.fps), value(Color::White)),
        ]);

        let stats_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: area.height.min(1),
        };
        frame.render_widget(Paragraph::new(stats_left), stats_area);

        // Timer on the right of the header
        let timer_text = Line::from(vec![
            Span::styled("Time: ", label),
            Span::styled(format_time(view.elapsed_time_secs), value(Color::White)),
        ]);
        frame.render_widget(Paragraph::new(timer_text).right_aligned(), stats_area);

        // Controls hint at bottom
        let controls = Line::from(vec![Span::styled(
            "[A/D/Arrows: Move] [Space: Fire] [P: Pause] [R: Restart] [Q: Quit]",
            label,
        )]);

        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: area.height.min(1),
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    /// Renders the pause overlay on top of the frozen game
    fn render_paused(&self, frame: &mut Frame) {
        let pause_text = vec![
            Line::from(""),
            Line::from("PAUSED").centered().bold().yellow(),
            Line::from(""),
            Line::from("Press P to resume").centered().white(),
        ];

        let pause_area = centered_rect(frame.area(), 30, 6);
        frame.render_widget(Clear, pause_area);
        frame.render_widget(
            Paragraph::new(pause_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                )
                .alignment(Alignment::Center),
            pause_area,
        );
    }

    /// Renders the defeat box; the last frame of play stays visible around it
    fn render_defeated(&self, frame: &mut Frame, view: &RenderView) {
        let defeated_text = vec![
            Line::from(""),
            Line::from("THE FIRE GOT YOU").centered().red().bold(),
            Line::from(""),
            Line::from(format!("Final Score: {}", view.world.score))
                .centered()
                .yellow()
                .bold(),
            Line::from(format!(
                "Time Survived: {}",
                format_time(view.elapsed_time_secs)
            ))
            .centered()
            .cyan()
            .bold(),
            Line::from(""),
            Line::from("Press R to restart").centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ];

        let defeated_area = centered_rect(frame.area(), 34, 10);
        frame.render_widget(Clear, defeated_area);
        frame.render_widget(
            Paragraph::new(defeated_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                )
                .alignment(Alignment::Center),
            defeated_area,
        );
    }
}

fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_stars(buffer: &mut Buffer, game: Rect) {
    let style = Style::default().fg(Color::DarkGray);
    for y in game.top()..game.bottom() {
        for x in game.left()..game.right() {
            if is_star(x, y) {
                buffer.set_string(x, y, ".", style);
            }
        }
    }
}

/// Copies pre-rasterised sprite cells, clipping at the game area's edges
fn draw_sprite(buffer: &mut Buffer, sprite: &Sprite, position: Vec2, cell: CellSize, game: Rect) {
    let origin_x = (position.x / cell.width).round() as i32;
    let origin_y = (position.y / cell.height).round() as i32;

    for sprite_cell in &sprite.cells {
        let x = origin_x + sprite_cell.dx as i32;
        let y = origin_y + sprite_cell.dy as i32;
        if x < 0 || y < 0 || x >= game.width as i32 || y >= game.height as i32 {
            continue;
        }

        if let Some(target) = buffer.cell_mut((game.x + x as u16, game.y + y as u16)) {
            target.set_symbol(sprite_cell.symbol).set_fg(sprite_cell.fg);
            if let Some(bg) = sprite_cell.bg {
                target.set_bg(bg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::bundled_dir;
    use crate::entities::{EnemyProjectile, Formation};
    use ratatui::{Terminal, backend::TestBackend};

    const CELL: CellSize = CellSize {
        width: 8.0,
        height: 16.0,
    };

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn draw(world: &World, assets: &Assets) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|frame| {
                let view = RenderView {
                    world,
                    assets,
                    cell: CELL,
                    fps: 60,
                    elapsed_time_secs: 75,
                };
                GameRenderer::new().render(frame, &view);
            })
            .unwrap();
        terminal
    }

    fn world_and_assets() -> (World, Assets) {
        let assets = Assets::load(&bundled_dir(), CELL).unwrap();
        let area = Rect::new(0, 0, 100, 40);
        let world = World::new(playfield_for(area, CELL), assets.sizes(), 5);
        (world, assets)
    }

    #[test]
    fn test_game_area_excludes_hud_and_controls() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(game_area(area), Rect::new(0, 1, 100, 38));
        assert_eq!(game_area(Rect::new(0, 0, 10, 1)).height, 0);
    }

    #[test]
    fn test_playfield_for_terminal() {
        let playfield = playfield_for(Rect::new(0, 0, 100, 40), CELL);
        assert_eq!(playfield.width, 800.0);
        assert_eq!(playfield.height, 608.0);
    }

    #[test]
    fn test_to_cell() {
        let game = Rect::new(0, 1, 100, 38);
        assert_eq!(to_cell(Vec2::new(0.0, 0.0), CELL, game), Some((0, 1)));
        assert_eq!(to_cell(Vec2::new(17.0, 33.0), CELL, game), Some((2, 3)));
        assert_eq!(to_cell(Vec2::new(-1.0, 10.0), CELL, game), None);
        assert_eq!(to_cell(Vec2::new(800.0, 10.0), CELL, game), None);
        assert_eq!(to_cell(Vec2::new(10.0, 608.0), CELL, game), None);
    }

    #[test]
    fn test_nozzle_follows_tilt() {
        assert_eq!(nozzle_glyph(-0.25), "╲");
        assert_eq!(nozzle_glyph(0.25), "╱");
        assert_eq!(nozzle_glyph(0.0), "│");
    }

    #[test]
    fn test_hud_shows_stats_and_controls() {
        let (mut world, assets) = world_and_assets();
        world.score = 300;
        world.formations.push(Formation::new(0, 5, 2, world.sprites().enemy));

        let text = screen_text(&draw(&world, &assets));
        assert!(text.contains("Score: 300"));
        assert!(text.contains("Formations: 1"));
        assert!(text.contains("Enemies: 10"));
        assert!(text.contains("Time: 01:15"));
        assert!(text.contains("[Space: Fire]"));
        assert!(text.contains("[R: Restart]"));
        assert!(!text.contains("PAUSED"));
    }

    #[test]
    fn test_paused_overlay() {
        let (mut world, assets) = world_and_assets();
        world.toggle_pause();
        let text = screen_text(&draw(&world, &assets));
        assert!(text.contains("PAUSED"));
        assert!(text.contains("Press P to resume"));
    }

    #[test]
    fn test_defeat_overlay_hides_player() {
        let (mut world, assets) = world_and_assets();
        world.state = GameState::PlayerDefeated;
        world.score = 1200;
        let terminal = draw(&world, &assets);
        let text = screen_text(&terminal);
        assert!(text.contains("Final Score: 1200"));
        assert!(text.contains("Press R to restart"));
        // Nozzle sits half a cell above the player at (375, 548)
        assert_ne!(terminal.backend().buffer()[(50, 34)].symbol(), "│");
    }

    #[test]
    fn test_running_player_has_nozzle() {
        let (world, assets) = world_and_assets();
        let terminal = draw(&world, &assets);
        assert_eq!(terminal.backend().buffer()[(50, 34)].symbol(), "│");
    }

    #[test]
    fn test_entities_land_in_their_cells() {
        let (mut world, assets) = world_and_assets();
        world
            .enemy_projectiles
            .push(EnemyProjectile::new(Vec2::new(79.0, 160.0)));

        let terminal = draw(&world, &assets);
        let buffer = terminal.backend().buffer();
        // Center (80.5, 165) maps to cell (10, 10), shifted one row by the HUD
        assert_eq!(buffer[(10, 11)].symbol(), "!");
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let (world, assets) = world_and_assets();
        let mut terminal = Terminal::new(TestBackend::new(4, 2)).unwrap();
        terminal
            .draw(|frame| {
                let view = RenderView {
                    world: &world,
                    assets: &assets,
                    cell: CELL,
                    fps: 0,
                    elapsed_time_secs: 0,
                };
                GameRenderer::new().render(frame, &view);
            })
            .unwrap();
    }
}
