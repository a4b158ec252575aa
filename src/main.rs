pub mod combat;
pub mod config;
pub mod corpus;
pub mod input;
pub mod motion;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod ui;

use crate::config::{Config, ConfigStore, FileConfigStore};
use crate::corpus::ANTHEM_LINES;
use crate::runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner};
use crate::session::{Session, SessionConfig};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs,
    io::{self, stdin},
    time::Duration,
};

/// Fast animation cadence; projectile flights advance one step per tick.
const TICK_RATE_MS: u64 = 20;

/// terminal typing battle
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Defeat the boss by typing the anthem one character at a time. Every correct character fires a missile; every mistake costs you health."
)]
pub struct Cli {
    /// text file with one battle line per row (defaults to the built-in anthem)
    #[clap(short = 'c', long)]
    corpus: Option<String>,

    /// disable the player health pool; the battle can then only be won
    #[clap(long)]
    no_player_health: bool,

    /// fixed seed for projectile and jitter animation
    #[clap(long)]
    seed: Option<u64>,
}

impl Cli {
    fn apply_to(&self, cfg: &mut Config) {
        if self.no_player_health {
            cfg.player_health_enabled = false;
        }
        if self.seed.is_some() {
            cfg.motion_seed = self.seed;
        }
        if self.corpus.is_some() {
            cfg.corpus_path = self.corpus.clone();
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
}

impl App {
    pub fn new(lines: &[String], session_config: SessionConfig) -> Result<Self, Box<dyn Error>> {
        let session = Session::new(lines, session_config)?;
        Ok(Self { session })
    }
}

fn load_corpus(cfg: &Config) -> Result<Vec<String>, Box<dyn Error>> {
    match &cfg.corpus_path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            Ok(text.lines().map(str::to_owned).collect())
        }
        None => Ok(ANTHEM_LINES.iter().map(|&l| l.to_owned()).collect()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    cli.apply_to(&mut config);

    let lines = load_corpus(&config)?;
    let mut app = App::new(&lines, config.to_session_config())?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn ui(f: &mut Frame, app: &App) {
    f.render_widget(app, f.area());
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| ui(f, app))?;

        match runner.step() {
            GameEvent::Quit => break,
            // Reset is accepted in every phase, including mid-run.
            GameEvent::Restart => app.session.reset(),
            GameEvent::Type(c) => app.session.handle_char(c),
            GameEvent::Advance { dt_secs } => {
                app.session.tick(dt_secs);
            }
            GameEvent::Redraw => {}
        }
    }

    Ok(())
}
