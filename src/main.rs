use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use log::{error, info};
use prim_maze::config::{check_seed, read_speed_settings, Difficulty, GameConfig};
use prim_maze::grid::Grid;
use prim_maze::input::{command_for, Command, IntentQueue};
use prim_maze::maze::Maze;
use prim_maze::render::{render_screen, Board, Renderer};
use prim_maze::settings::SettingsStore;
use prim_maze::traversal::{Outcome, Tick, TraversalEngine};
use prim_maze::MazeError;
use rand::Rng;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

const WIN_DELAY: Duration = Duration::from_secs(2);
const LOSE_DELAY: Duration = Duration::from_secs(1);

/// Walk from start to finish without ever stepping on your own path.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Skip the menu and play at this difficulty.
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,
    /// Replay the maze generated from this seed.
    #[arg(long)]
    seed: Option<u32>,
    /// Grid side length, overriding the difficulty table.
    #[arg(long)]
    size: Option<usize>,
    /// Where seed and difficulty are remembered between runs.
    #[arg(long, default_value = "maze-settings.json")]
    settings: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Screen {
    Menu,
    Game,
    Lose,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GameEnd {
    Solved,
    Crossed,
    Menu,
    Quit,
}

/// Command-line choices carried from one game to the next.
#[derive(Debug)]
struct Session {
    /// `--size`, dropped once a difficulty is picked from the menu.
    size: Option<usize>,
}

impl Session {
    fn game_config(&self, store: &SettingsStore, rng: &mut impl Rng) -> prim_maze::Result<GameConfig> {
        GameConfig::new(store.difficulty(), self.size, store.seed(), rng)
    }

    fn difficulty_chosen(&mut self) {
        self.size = None;
    }
}

fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut store = SettingsStore::open(&cli.settings).map_err(to_io)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &cli, &mut store);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut Stdout, cli: &Cli, store: &mut SettingsStore) -> io::Result<()> {
    let mut rng = rand::thread_rng();
    let mut session = Session { size: cli.size };
    let mut screen = apply_cli(cli, store).map_err(to_io)?;

    loop {
        screen = match screen {
            Screen::Menu => {
                let next = run_menu(stdout, store)?;
                if next == Screen::Game {
                    session.difficulty_chosen();
                }
                next
            }
            Screen::Game => {
                let difficulty = store.difficulty();
                let config = session.game_config(store, &mut rng).map_err(to_io)?;
                store.set_seed(config.seed).map_err(to_io)?;
                match play(stdout, difficulty, config)? {
                    GameEnd::Solved => {
                        store.clear_seed().map_err(to_io)?;
                        Screen::Game
                    }
                    GameEnd::Crossed => Screen::Lose,
                    GameEnd::Menu => Screen::Menu,
                    GameEnd::Quit => Screen::Quit,
                }
            }
            Screen::Lose => run_lose(stdout, store)?,
            Screen::Quit => return Ok(()),
        }
    }
}

/// Saves the command-line difficulty and seed and picks the first screen.
/// Nothing is written unless every supplied value is valid.
fn apply_cli(cli: &Cli, store: &mut SettingsStore) -> prim_maze::Result<Screen> {
    if cli.difficulty.is_none() && cli.size.is_none() && cli.seed.is_none() {
        return Ok(Screen::Menu);
    }
    let seed = cli.seed.map(check_seed).transpose()?;
    if let Some(size) = cli.size {
        Grid::new(size)?;
    }
    if let Some(difficulty) = cli.difficulty {
        store.set_difficulty(difficulty)?;
    }
    match seed {
        Some(seed) => store.set_seed(seed)?,
        None => store.clear_seed()?,
    }
    Ok(Screen::Game)
}

/// Runs one game tick. Nothing moves while the board is off screen, and
/// moves queued before it disappeared are dropped.
fn tick(engine: &mut TraversalEngine, queue: &mut IntentQueue, visible: bool) -> Option<Tick> {
    if !visible {
        queue.clear();
        return None;
    }
    Some(engine.step(queue.next_intent()))
}

fn play(stdout: &mut Stdout, difficulty: Difficulty, config: GameConfig) -> io::Result<GameEnd> {
    let maze = Maze::generate(config.size, config.seed).map_err(to_io)?;
    info!(
        "playing {}x{} maze, seed {}, path {} cells",
        config.size,
        config.size,
        config.seed,
        maze.path_length()
    );
    let mut engine = TraversalEngine::new(&maze);
    let mut board = Board::new(&maze);
    board.apply_all(engine.initial_events());
    let mut renderer = Renderer::new(board.side());
    let mut queue = IntentQueue::default();
    let (tick_ms, render_fps) = read_speed_settings();
    let frame_time = Duration::from_micros(1_000_000 / render_fps.max(1));
    let mut last_tick = Instant::now();
    let mut finished_at: Option<Instant> = None;
    let mut visible = false;

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) => match command_for(key) {
                    Some(Command::Quit) => return Ok(GameEnd::Quit),
                    Some(Command::Menu) => return Ok(GameEnd::Menu),
                    Some(Command::Move(dir)) if visible && finished_at.is_none() => {
                        queue.push(dir)
                    }
                    _ => {}
                },
                Event::Resize(_, _) => renderer.invalidate(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= Duration::from_millis(tick_ms) {
            last_tick = Instant::now();
            if let Some(step) = tick(&mut engine, &mut queue, visible) {
                board.apply_all(step.events);
                if step.outcome.is_terminal() && finished_at.is_none() {
                    finished_at = Some(Instant::now());
                    queue.clear();
                }
            }
        }

        let hud = format!(
            "{} {}x{}  Seed: {}  Path: {}  Steps: {}  (q quit, m menu)",
            difficulty.label(),
            config.size,
            config.size,
            config.seed,
            maze.path_length(),
            engine.player().visited().len().saturating_sub(1),
        );
        visible = renderer.render(stdout, &board, &hud)?;

        if let Some(at) = finished_at {
            match engine.outcome() {
                Outcome::Won => {
                    if visible {
                        renderer.render_footer(stdout, &board, "Solved! Next maze coming up...")?;
                    }
                    if at.elapsed() >= WIN_DELAY {
                        return Ok(GameEnd::Solved);
                    }
                }
                Outcome::Violated => {
                    if visible {
                        renderer.render_footer(stdout, &board, "You crossed your own path.")?;
                    }
                    if at.elapsed() >= LOSE_DELAY {
                        return Ok(GameEnd::Crossed);
                    }
                }
                Outcome::Playing => {}
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn run_menu(stdout: &mut Stdout, store: &mut SettingsStore) -> io::Result<Screen> {
    let mut selected = Difficulty::ALL
        .iter()
        .position(|d| *d == store.difficulty())
        .unwrap_or(0);

    loop {
        let mut lines = vec![
            "N O   W A Y   B A C K".to_string(),
            String::new(),
            "Reach the flag without stepping on your own path.".to_string(),
            String::new(),
        ];
        for (idx, difficulty) in Difficulty::ALL.iter().enumerate() {
            let marker = if idx == selected { ">" } else { " " };
            lines.push(format!(
                "{marker} {:<10} {:>2}x{:<2}",
                difficulty.label(),
                difficulty.grid_size(),
                difficulty.grid_size()
            ));
        }
        lines.push(String::new());
        lines.push("up/down choose   enter play   q quit".to_string());
        render_screen(stdout, &lines)?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => {
                selected = selected.checked_sub(1).unwrap_or(Difficulty::ALL.len() - 1);
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => {
                selected = (selected + 1) % Difficulty::ALL.len();
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                store.set_difficulty(Difficulty::ALL[selected]).map_err(to_io)?;
                store.clear_seed().map_err(to_io)?;
                return Ok(Screen::Game);
            }
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Screen::Quit),
            _ => {}
        }
    }
}

fn run_lose(stdout: &mut Stdout, store: &mut SettingsStore) -> io::Result<Screen> {
    let seed = store
        .seed()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "?".to_string());
    let lines = vec![
        "You stepped on your own path.".to_string(),
        String::new(),
        format!("r  restart this maze (seed {seed})"),
        "n  new maze".to_string(),
        "m  main menu".to_string(),
        "q  quit".to_string(),
    ];
    render_screen(stdout, &lines)?;

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('r') | KeyCode::Enter => return Ok(Screen::Game),
            KeyCode::Char('n') => {
                store.clear_seed().map_err(to_io)?;
                return Ok(Screen::Game);
            }
            KeyCode::Char('m') => return Ok(Screen::Menu),
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Screen::Quit),
            _ => {}
        }
    }
}

fn to_io(err: MazeError) -> io::Error {
    match err {
        MazeError::Io(err) => err,
        other => {
            error!("{other}");
            io::Error::new(io::ErrorKind::InvalidInput, other)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prim_maze::grid::Dir;
    use prim_maze::rng::MazeRng;
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_settings(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir()
            .join(format!("maze-cli-{}-{nanos}", std::process::id()))
            .join(name)
    }

    fn cli(args: &[&str], settings: &Path) -> Cli {
        let settings = settings.to_str().unwrap();
        let mut argv = vec!["maze"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["--settings", settings]);
        Cli::parse_from(argv)
    }

    #[test]
    fn no_flags_opens_the_menu() {
        let path = temp_settings("menu.json");
        let mut store = SettingsStore::open(&path).unwrap();
        assert_eq!(apply_cli(&cli(&[], &path), &mut store).unwrap(), Screen::Menu);
        assert!(!path.exists());
    }

    #[test]
    fn seed_flag_is_stored_and_skips_the_menu() {
        let path = temp_settings("seed.json");
        let mut store = SettingsStore::open(&path).unwrap();
        let args = cli(&["--seed", "42", "--difficulty", "hard"], &path);
        assert_eq!(apply_cli(&args, &mut store).unwrap(), Screen::Game);
        let reopened = SettingsStore::open(&path).unwrap();
        assert_eq!(reopened.seed(), Some(42));
        assert_eq!(reopened.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn out_of_range_seed_is_rejected_before_saving() {
        let path = temp_settings("big-seed.json");
        let mut store = SettingsStore::open(&path).unwrap();
        let args = cli(&["--seed", "1500000000", "--difficulty", "medium"], &path);
        assert!(matches!(
            apply_cli(&args, &mut store),
            Err(MazeError::InvalidConfiguration(_))
        ));
        assert!(!path.exists());
        assert_eq!(store.seed(), None);
        assert_eq!(store.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn zero_size_is_rejected_before_saving() {
        let path = temp_settings("zero.json");
        let mut store = SettingsStore::open(&path).unwrap();
        assert!(apply_cli(&cli(&["--size", "0"], &path), &mut store).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn size_flag_lasts_until_a_difficulty_is_chosen() {
        let path = temp_settings("size.json");
        let mut store = SettingsStore::open(&path).unwrap();
        store.set_difficulty(Difficulty::VeryHard).unwrap();
        let mut rng = MazeRng::new(1);
        let mut session = Session { size: Some(5) };

        assert_eq!(session.game_config(&store, &mut rng).unwrap().size, 5);
        assert_eq!(session.game_config(&store, &mut rng).unwrap().size, 5);
        session.difficulty_chosen();
        assert_eq!(session.game_config(&store, &mut rng).unwrap().size, 60);
    }

    #[test]
    fn hidden_board_does_not_advance_the_game() {
        let maze = Maze::generate(4, 42).unwrap();
        let mut engine = TraversalEngine::new(&maze);
        let start = engine.player().position();
        let mut queue = IntentQueue::default();
        for dir in Dir::ALL {
            queue.push(dir);
        }

        for _ in 0..4 {
            assert!(tick(&mut engine, &mut queue, false).is_none());
        }
        assert!(queue.is_empty());
        assert_eq!(engine.player().position(), start);
        assert_eq!(engine.outcome(), Outcome::Playing);

        let open = Dir::ALL
            .into_iter()
            .find(|&dir| maze.passages().is_open(start, dir))
            .unwrap();
        queue.push(open);
        let step = tick(&mut engine, &mut queue, true).unwrap();
        assert_ne!(step.position, start);
    }
}
