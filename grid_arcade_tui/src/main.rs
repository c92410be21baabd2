use grid_arcade_core::{
    Direction, Item, Phase, Position,
    layouts::{Layout as MapLayout, PACMAN_LAYOUT, RPG_LAYOUT, parse_layout},
    pacman::{Difficulty, PacmanGame},
    rpg::{Command, QUEST_GOAL, RpgEvent, RpgGame},
    step::TileEffect,
    world::{Collectible, Special, Tile},
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use rand::{SeedableRng, rngs::StdRng};
use ratatui::{
    crossterm::{
        self,
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    widgets::*,
};
use std::{
    fs::File,
    io::{self, Stdout},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum GameKind {
    /// Medieval RPG: explore, loot, fight goblins
    Rpg,
    /// Pac-Man: eat every pellet, avoid the ghosts
    Pacman,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Which game to play
    #[arg(value_enum)]
    game: GameKind,

    /// Pac-Man difficulty (easy, medium or hard)
    #[arg(short, long, default_value = "easy")]
    difficulty: Difficulty,

    /// Custom layout file to play instead of the built-in map
    #[arg(short, long, value_name = "MAP_FILE")]
    map: Option<PathBuf>,

    /// Where the RPG saves and loads its progress
    #[arg(long, value_name = "FILE", default_value = grid_arcade_core::save::DEFAULT_SAVE_FILE)]
    save_file: PathBuf,

    /// Seed for combat rolls and ghost movement
    #[arg(long)]
    seed: Option<u64>,

    /// Log output file
    #[arg(long, value_name = "FILE", default_value = "grid_arcade.log")]
    log_file: PathBuf,
}

enum Session {
    Rpg(RpgGame),
    Pacman(PacmanGame),
}

impl Session {
    fn phase(&self) -> Phase {
        match self {
            Session::Rpg(game) => game.phase(),
            Session::Pacman(game) => game.phase(),
        }
    }
}

struct App {
    session: Session,
    rng: StdRng,
    save_file: PathBuf,
    /// Time between simulation ticks.
    tick_rate: Duration,
    /// Last notable thing that happened, shown in the status panel.
    message: Option<String>,
    /// Flag to control the main loop.
    should_quit: bool,
}

impl App {
    fn new(args: &Args) -> Result<Self> {
        let layout = match &args.map {
            Some(path) => Some(load_layout(path)?),
            None => None,
        };
        let rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let (session, tick_rate) = match args.game {
            GameKind::Rpg => {
                let layout = match layout {
                    Some(layout) => layout,
                    None => parse_layout(RPG_LAYOUT)?,
                };
                let mut game = RpgGame::from_layout(layout);
                if let Err(err) = game.load(&args.save_file) {
                    warn!("Load error: {err}");
                }
                (Session::Rpg(game), Duration::from_millis(250))
            }
            GameKind::Pacman => {
                let layout = match layout {
                    Some(layout) => layout,
                    None => parse_layout(PACMAN_LAYOUT)?,
                };
                let game = PacmanGame::from_layout(layout, args.difficulty);
                info!("Pac-Man on {} with {} ghosts", args.difficulty, game.ghosts.len());
                (Session::Pacman(game), args.difficulty.tick_interval())
            }
        };

        Ok(App {
            session,
            rng,
            save_file: args.save_file.clone(),
            tick_rate,
            message: None,
            should_quit: false,
        })
    }

    /// Handles one step of the simulation.
    fn tick(&mut self) {
        if let Session::Pacman(game) = &mut self.session {
            if let Some(report) = game.tick(&mut self.rng) {
                if report.lives_lost > 0 {
                    self.message = Some("Caught by a ghost!".to_string());
                } else if report.ghosts_eaten > 0 {
                    self.message = Some("Ghost eaten!".to_string());
                } else if report.power_expired {
                    self.message = Some("Power-up wore off.".to_string());
                }
            }
        }
    }

    fn on_key(&mut self, code: KeyCode) {
        if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
            self.quit();
            return;
        }
        let direction = match code {
            KeyCode::Up | KeyCode::Char('k') => Some(Direction::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(Direction::Down),
            KeyCode::Left | KeyCode::Char('h') => Some(Direction::Left),
            KeyCode::Right | KeyCode::Char('l') if matches!(self.session, Session::Pacman(_)) => {
                Some(Direction::Right)
            }
            KeyCode::Right => Some(Direction::Right),
            _ => None,
        };

        match &mut self.session {
            Session::Pacman(game) => {
                if let Some(direction) = direction {
                    game.handle_move(direction);
                }
            }
            Session::Rpg(game) => {
                let command = match (code, direction) {
                    (_, Some(direction)) => Command::Move(direction),
                    (KeyCode::Char('e'), _) => Command::Interact,
                    (KeyCode::Char(' '), _) => Command::Attack,
                    (KeyCode::Char('.'), _) => Command::Stay,
                    (KeyCode::Char('s'), _) => {
                        self.message = Some(match game.save(&self.save_file) {
                            Ok(()) => "Game Saved.".to_string(),
                            Err(err) => {
                                warn!("Save error: {err}");
                                format!("Save failed: {err}")
                            }
                        });
                        return;
                    }
                    (KeyCode::Char('l'), _) => {
                        self.message = Some(match game.load(&self.save_file) {
                            Ok(()) => "Game Loaded.".to_string(),
                            Err(err) => {
                                warn!("Load error: {err}");
                                format!("Load failed: {err}")
                            }
                        });
                        return;
                    }
                    _ => return,
                };
                let event = game.handle(command, &mut self.rng);
                if let Some(message) = describe(&event) {
                    self.message = Some(message);
                }
            }
        }
    }

    /// Sets the quit flag.
    fn quit(&mut self) {
        self.should_quit = true;
    }

    fn finished(&self) -> bool {
        self.should_quit || self.session.phase().is_terminal()
    }

    fn farewell(&self) -> Option<&'static str> {
        match (&self.session, self.session.phase()) {
            (_, Phase::Playing) => None,
            (Session::Rpg(_), Phase::Lost) => Some("You died! Game Over."),
            (Session::Pacman(_), Phase::Lost) => Some("Game Over!"),
            (_, Phase::Won) => Some("You Win!"),
        }
    }
}

/// Text for the status panel after an RPG command.
fn describe(event: &RpgEvent) -> Option<String> {
    let text = match event {
        RpgEvent::Moved(TileEffect::Collected(Collectible::Chest)) => {
            "You found a chest with a Healing Potion!".to_string()
        }
        RpgEvent::Moved(TileEffect::Rested) => {
            "You visit a village and rest. Health restored.".to_string()
        }
        RpgEvent::Moved(TileEffect::EnterCombat) => {
            "Fighting Goblin! Press SPACE to attack.".to_string()
        }
        RpgEvent::Moved(TileEffect::Dialogue) => "Press E to talk to the Villager.".to_string(),
        RpgEvent::Talked(dialogue) => dialogue.line().to_string(),
        RpgEvent::Attacked(report) if report.adversary_defeated => format!(
            "You strike for {} and slay the goblin! (took {})",
            report.rolls.player, report.rolls.adversary
        ),
        RpgEvent::Attacked(report) => format!(
            "You hit for {}, the goblin hits back for {}.",
            report.rolls.player, report.rolls.adversary
        ),
        RpgEvent::Moved(_) | RpgEvent::Blocked | RpgEvent::Ignored => return None,
    };
    Some(text)
}

fn load_layout(path: &Path) -> Result<MapLayout> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read map file {}", path.display()))?;
    parse_layout(&text).with_context(|| format!("Failed to parse map file {}", path.display()))
}

/// Routes `log` output to a file so it does not draw over the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    init_logging(&args.log_file)?;

    // Create the application state before touching the terminal so errors print cleanly
    let mut app = App::new(&args)?;

    // Set up the terminal
    let mut terminal = setup_terminal()?;

    // Run the main application loop
    let result = run_app(&mut terminal, &mut app);

    // Restore the terminal state
    restore_terminal(&mut terminal)?;
    result?;

    if let Some(farewell) = app.farewell() {
        info!("{farewell}");
        println!("{farewell}");
    }

    Ok(())
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?; // Put terminal in raw mode
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?; // Use alternate screen and enable mouse capture
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into) // Map io::Error to anyhow::Error
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop of the TUI application.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = app.tick_rate;
    let mut last_tick = Instant::now();

    loop {
        // Draw the UI
        terminal.draw(|f| ui(f, app))?;

        // Calculate timeout for event polling
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        // Poll for key presses; releases and repeats are ignored
        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key.code);
                }
            }
        }

        // Update application state if enough time has passed
        if last_tick.elapsed() >= tick_rate {
            app.tick(); // Perform simulation step
            last_tick = Instant::now();
        }

        // Exit loop on quit or once the game has ended
        if app.finished() {
            break;
        }
    }
    Ok(())
}

/// Renders the user interface.
fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Area for the map
            Constraint::Length(6), // Area for status
            Constraint::Length(2), // Area for help
        ])
        .split(frame.area());

    let help = match &app.session {
        Session::Rpg(_) => "Arrows/hjk move | . wait | e talk | space attack | s save | l load | q quit",
        Session::Pacman(_) => "Arrows/hjkl move | q quit",
    };

    match &app.session {
        Session::Rpg(game) => {
            render_rpg_map(frame, main_layout[0], game);
            render_rpg_status(frame, main_layout[1], game, app.message.as_deref());
        }
        Session::Pacman(game) => {
            render_pacman_map(frame, main_layout[0], game);
            render_pacman_status(frame, main_layout[1], game, app.message.as_deref());
        }
    }

    let help_text = Paragraph::new(help)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help_text, main_layout[2]);
}

fn rpg_tile_span(tile: Tile) -> Span<'static> {
    match tile {
        Tile::Empty => Span::styled(".", Style::default().fg(Color::Rgb(34, 139, 34))),
        Tile::Wall => Span::styled("♣", Style::default().fg(Color::Rgb(0, 100, 0))),
        Tile::Special(Special::HostileSpawn) => {
            Span::styled("g", Style::default().fg(Color::Red).bold())
        }
        Tile::Special(Special::Rest) => Span::styled("V", Style::default().fg(Color::Rgb(255, 165, 0))),
        Tile::Collectible(Collectible::Chest) => Span::styled("C", Style::default().fg(Color::Yellow)),
        Tile::Special(Special::Dialogue) => Span::styled("N", Style::default().fg(Color::Cyan)),
        Tile::Collectible(_) => Span::styled("o", Style::default().fg(Color::White)),
    }
}

fn pacman_tile_span(tile: Tile) -> Span<'static> {
    match tile {
        Tile::Wall => Span::styled("#", Style::default().fg(Color::Blue)),
        Tile::Collectible(Collectible::Dot) => Span::styled("·", Style::default().fg(Color::White)),
        Tile::Collectible(Collectible::PowerPellet) => {
            Span::styled("O", Style::default().fg(Color::LightMagenta))
        }
        Tile::Collectible(Collectible::Chest) => {
            Span::styled("C", Style::default().fg(Color::Yellow))
        }
        _ => Span::raw(" "),
    }
}

/// Builds the map lines, letting `overlay` replace a cell's span.
fn map_lines<F, O>(rows: usize, cols: usize, tile_at: F, overlay: O) -> Vec<Line<'static>>
where
    F: Fn(Position) -> Span<'static>,
    O: Fn(Position) -> Option<Span<'static>>,
{
    (0..rows)
        .map(|row| {
            let spans: Vec<Span> = (0..cols)
                .map(|col| {
                    let position = Position::new(row, col);
                    overlay(position).unwrap_or_else(|| tile_at(position))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn render_rpg_map(frame: &mut Frame, area: Rect, game: &RpgGame) {
    let world = &game.world;
    let lines = map_lines(
        world.rows(),
        world.cols(),
        |p| rpg_tile_span(world.tile_at(p).unwrap_or_default()),
        |p| {
            (p == game.player.position)
                .then(|| Span::styled("@", Style::default().fg(Color::LightBlue).bold()))
        },
    );
    let map_paragraph = Paragraph::new(lines)
        .block(Block::default().title("Medieval RPG").borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(map_paragraph, area);
}

fn render_pacman_map(frame: &mut Frame, area: Rect, game: &PacmanGame) {
    let world = &game.world;
    let ghost_color = if game.powered_up() {
        Color::Gray
    } else {
        Color::Red
    };
    let lines = map_lines(
        world.rows(),
        world.cols(),
        |p| pacman_tile_span(world.tile_at(p).unwrap_or_default()),
        |p| {
            if p == game.player.position {
                Some(Span::styled("@", Style::default().fg(Color::Yellow).bold()))
            } else if game.ghosts.iter().any(|g| g.position == p) {
                Some(Span::styled("M", Style::default().fg(ghost_color).bold()))
            } else {
                None
            }
        },
    );
    let map_paragraph = Paragraph::new(lines)
        .block(Block::default().title("Pac-Man").borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(map_paragraph, area);
}

fn inventory_text(inventory: &[Item]) -> String {
    let names: Vec<&str> = inventory.iter().map(Item::name).collect();
    format!("[{}]", names.join(", "))
}

fn rpg_summary(game: &RpgGame) -> String {
    format!(
        "HP: {}/{} | Inventory: {}",
        game.player.health(),
        game.player.max_health(),
        inventory_text(&game.player.inventory)
    )
}

fn render_rpg_status(frame: &mut Frame, area: Rect, game: &RpgGame, message: Option<&str>) {
    let mut lines = vec![Line::from(rpg_summary(game))];
    if game.quest.accepted {
        lines.push(Line::from(format!(
            "Quest: Defeat {} Goblins ({}/{})",
            QUEST_GOAL, game.quest.goblins_defeated, QUEST_GOAL
        )));
    }
    if let Some(goblin_health) = game.combat.adversary_health() {
        lines.push(Line::styled(
            format!(
                "Your HP: {} | Goblin HP: {}",
                game.player.health(),
                goblin_health
            ),
            Style::default().fg(Color::Red),
        ));
    }
    if let Some(message) = message {
        lines.push(Line::styled(message.to_string(), Style::default().italic()));
    }
    let status = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, area);
}

fn render_pacman_status(frame: &mut Frame, area: Rect, game: &PacmanGame, message: Option<&str>) {
    let mut lines = vec![Line::from(format!(
        "Lives: {} | Pellets left: {}",
        game.lives(),
        game.pellets_left()
    ))];
    if game.powered_up() {
        lines.push(Line::styled(
            format!("Power-Up Active! ({})", game.power_timer()),
            Style::default().fg(Color::LightMagenta),
        ));
    }
    if let Some(message) = message {
        lines.push(Line::styled(message.to_string(), Style::default().italic()));
    }
    let status = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, area);
}
