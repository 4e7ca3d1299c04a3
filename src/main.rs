pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange, KeyCode, KeyModifiers},
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
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use wrdl::app_dirs::AppDirs;
use wrdl::config::{Config, ConfigStore, FileConfigStore};
use wrdl::game::Game;
use wrdl::history::HistoryDb;
use wrdl::runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner};
use wrdl::session::Session;
use wrdl::snapshot::{FileKvStore, PersistenceBridge};
use wrdl::stats::{FileStatsStore, StatsLedger};
use wrdl::words::{ListValidator, WordList, WordValidator};
use wrdl::{MAX_ATTEMPTS, TICK_RATE_MS, WORD_LENGTH};

/// terminal word-guessing game with resumable sessions and streak tracking
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Guess the hidden five-letter word in six tries. Sessions survive quitting mid-game, and wins, losses, and streaks are tracked across runs."
)]
pub struct Cli {
    /// practice against a fixed target word instead of a random one
    #[clap(short = 't', long)]
    target: Option<String>,

    /// accept any well-formed guess without a dictionary lookup
    #[clap(long)]
    no_dictionary: bool,

    /// word list to draw targets and legal guesses from
    #[clap(short = 'l', long, value_enum, default_value_t = SupportedWordList::English)]
    word_list: SupportedWordList,

    /// discard any saved session and start fresh
    #[clap(long)]
    discard_session: bool,

    /// print cumulative stats and recent games, then exit
    #[clap(long)]
    stats: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum SupportedWordList {
    English,
}

impl SupportedWordList {
    fn file_name(&self) -> String {
        self.to_string().to_lowercase()
    }
}

pub struct App {
    pub cli: Option<Cli>,
    pub game: Game<FileKvStore>,
    pub words: WordList,
}

impl App {
    pub fn new(cli: Cli) -> Self {
        Self::with_stores(
            cli,
            FileConfigStore::new(),
            FileStatsStore::new(
                AppDirs::stats_path().unwrap_or_else(|| PathBuf::from("wrdl_stats.json")),
            ),
            FileKvStore::new(
                AppDirs::snapshot_dir().unwrap_or_else(|| PathBuf::from(".wrdl_session")),
            ),
            HistoryDb::new().ok(),
        )
    }

    /// Everything durable is injected, so tests can point the app at scratch
    /// directories instead of the real state dir.
    fn with_stores(
        cli: Cli,
        config_store: FileConfigStore,
        stats_store: FileStatsStore,
        kv: FileKvStore,
        history: Option<HistoryDb>,
    ) -> Self {
        let words = WordList::new(&cli.word_list.file_name());

        let config = Config {
            word_list: cli.word_list.file_name(),
            dictionary_check: !cli.no_dictionary && config_store.load().dictionary_check,
        };
        let _ = config_store.save(&config);

        let validator: Option<Box<dyn WordValidator>> = if config.dictionary_check {
            Some(Box::new(ListValidator::new(words.clone())))
        } else {
            None
        };

        let stats = StatsLedger::load(stats_store, None);

        let bridge = PersistenceBridge::new(kv);
        if cli.discard_session {
            bridge.clear();
        }

        // A practice target always starts a fresh session
        let restored = if cli.target.is_none() && !cli.discard_session {
            bridge.restore()
        } else {
            None
        };
        let was_restored = restored.is_some();
        let session = restored
            .unwrap_or_else(|| Session::new(&Self::pick_target(&cli, &words)));

        let mut game = Game::new(session, was_restored, validator, stats, bridge, history);
        if cli.target.is_some() {
            game.mark_practice();
        }

        Self {
            cli: Some(cli),
            game,
            words,
        }
    }

    fn pick_target(cli: &Cli, words: &WordList) -> String {
        match &cli.target {
            Some(word) => word.to_uppercase(),
            None => words.pick_target(),
        }
    }

    pub fn reset(&mut self) {
        let cli = self.cli.clone().unwrap();
        let target = Self::pick_target(&cli, &self.words);
        self.game.reset(&target);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(target) = &cli.target {
        if target.len() != WORD_LENGTH || !target.chars().all(|c| c.is_ascii_alphabetic()) {
            let mut cmd = Cli::command();
            cmd.error(
                ErrorKind::InvalidValue,
                format!("target must be exactly {WORD_LENGTH} letters"),
            )
            .exit();
        }
    }

    if cli.stats {
        print_stats();
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(cli);
    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn print_stats() {
    let ledger = StatsLedger::load(
        FileStatsStore::new(
            AppDirs::stats_path().unwrap_or_else(|| PathBuf::from("wrdl_stats.json")),
        ),
        None,
    );
    let stats = ledger.stats();
    println!(
        "played {} · won {} · win rate {}% · streak {} · best streak {}",
        stats.games_played,
        stats.games_won,
        stats.win_rate(),
        stats.current_streak,
        stats.max_streak
    );

    if let Ok(db) = HistoryDb::new() {
        if let Ok(games) = db.recent_games(10) {
            for record in games {
                let result = if record.won {
                    format!("{}/{}", record.attempts_used, MAX_ATTEMPTS)
                } else {
                    "X".to_string()
                };
                println!(
                    "{}  {}  {}",
                    record.finished_at.format("%Y-%m-%d %H:%M"),
                    record.target,
                    result
                );
            }
        }
    }
}

#[derive(Debug)]
enum ExitType {
    New,
    Quit,
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        let mut exit_type = ExitType::Quit;
        terminal.draw(|f| ui(app, f))?;

        loop {
            match runner.step() {
                GameEvent::Tick => {
                    if app.game.on_tick() {
                        terminal.draw(|f| ui(app, f))?;
                    }
                }
                GameEvent::Resize => {
                    terminal.draw(|f| ui(app, f))?;
                }
                GameEvent::FocusLost => {
                    app.game.snapshot();
                }
                GameEvent::Key(key) => {
                    match key.code {
                        KeyCode::Esc => {
                            app.game.snapshot();
                            break;
                        }
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            app.game.snapshot();
                            break;
                        }
                        KeyCode::Char('n') if app.game.session().is_terminal() => {
                            exit_type = ExitType::New;
                            break;
                        }
                        KeyCode::Enter | KeyCode::Backspace | KeyCode::Char(_) => {
                            app.game.handle_key(key.code);
                        }
                        _ => {}
                    }
                    terminal.draw(|f| ui(app, f))?;
                }
            }
        }

        match exit_type {
            ExitType::New => {
                app.reset();
            }
            ExitType::Quit => {
                break;
            }
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}
