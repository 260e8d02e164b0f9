use std::{fs::File, io::stdout, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::EnableMouseCapture,
    execute,
    terminal::{EnterAlternateScreen, enable_raw_mode},
};
use folio::event_source::TerminalEventSource;
use folio::panic_handler::{initialize_panic_handler, restore_terminal};
use folio::settings::{get_settings, load_settings};
use folio::{App, run_app_with_event_source};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, LevelFilter, WriteLogger};

/// Terminal portfolio with a draggable ruler for page navigation
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Settings file (defaults to the config directory's folio/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where log output goes
    #[arg(long, default_value = "folio.log")]
    log_file: PathBuf,

    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,

    /// Jump straight to the end state of every transition
    #[arg(long)]
    no_animations: bool,

    /// Frame rate for the ruler easing loop
    #[arg(long)]
    fps: Option<u32>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    WriteLogger::init(args.log_level, Config::default(), File::create(&args.log_file)?)?;
    initialize_panic_handler();

    info!("Starting folio");

    load_settings(args.config.as_deref());
    let mut settings = get_settings();
    if args.no_animations {
        settings.animations = false;
    }
    if let Some(fps) = args.fps {
        settings.fps = fps.max(1);
    }

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(settings);
    let mut event_source = TerminalEventSource;
    let res = run_app_with_event_source(&mut terminal, &mut app, &mut event_source);

    restore_terminal();

    if let Err(err) = res {
        error!("Application error: {err:?}");
        println!("{err:?}");
    }

    info!("Shutting down folio");
    Ok(())
}
