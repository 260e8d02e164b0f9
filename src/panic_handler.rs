use std::io::{self, Write};
use std::panic;

use crossterm::{
    cursor::Show,
    event::DisableMouseCapture,
    execute,
    terminal::{LeaveAlternateScreen, disable_raw_mode},
};
use log::error;

/// Print panics with better-panic, but only after the terminal is handed back
/// to the shell; a report drawn into the alternate screen is lost.
pub fn initialize_panic_handler() {
    better_panic::Settings::debug()
        .most_recent_first(false)
        .lineno_suffix(true)
        .install();

    let report = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore_terminal();
        error!("folio panicked: {info}");
        report(info);
        std::process::exit(1);
    }));
}

/// Leave raw mode and the alternate screen, release the mouse and show the
/// cursor. Errors are ignored: this also runs while panicking.
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen, Show);
    let _ = stdout.flush();
}
