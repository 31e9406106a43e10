use anyhow::{bail, Context, Result};
use clap::Parser;
use ratatui::{backend::TermionBackend, Terminal};
use std::io::{self, IsTerminal, Read, Write};
use std::process::ExitCode;
use std::time::Duration;
use termion::raw::IntoRawMode;
use termion::screen::IntoAlternateScreen;

use jsonprobe::config::Config;
use jsonprobe::document::Value;
use jsonprobe::file::{load_file, load_stdin, Format};
use jsonprobe::input::InputHandler;
use jsonprobe::query;
use jsonprobe::render;
use jsonprobe::session::QuerySession;
use jsonprobe::ui::UI;

/// jsonprobe - interactively query JSON, JSONL, and YAML documents
#[derive(Parser)]
#[command(name = "jsonprobe")]
#[command(version)]
#[command(about = "Interactively query JSON, JSONL, and YAML documents", long_about = None)]
struct Cli {
    /// Document to query (omit to read from stdin)
    file: Option<String>,

    /// Evaluate a single query and print the result instead of starting
    /// the interactive session
    #[arg(short, long)]
    query: Option<String>,

    /// Input format: json, jsonl, or yaml (required for stdin, otherwise
    /// inferred from the file extension)
    #[arg(short = 't', long)]
    format: Option<String>,

    /// Maximum number of completion suggestions to show
    #[arg(long)]
    max_suggestions: Option<usize>,
}

/// Set up a panic hook that restores the terminal before displaying panic
/// information.
///
/// Without this, panic messages would be hidden or garbled by raw mode and
/// the alternate screen.
fn setup_panic_hook() {
    use std::panic;

    let default_panic = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = write!(io::stderr(), "{}", termion::screen::ToMainScreen);
        let _ = write!(io::stderr(), "{}", termion::cursor::Show);
        let _ = io::stderr().flush();

        default_panic(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_hook();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let format = match &cli.format {
        Some(name) => Some(
            Format::from_name(name)
                .with_context(|| format!("Unknown format '{}' (expected json, jsonl, or yaml)", name))?,
        ),
        None => None,
    };

    // Load the document BEFORE terminal setup: stdin may carry the data.
    let (document, source_name, stdin_was_piped) = if let Some(file_path) = &cli.file {
        let document = load_file(file_path, format)?;
        (document, file_path.clone(), false)
    } else {
        if io::stdin().is_terminal() {
            bail!("No input file given and stdin is a terminal (pipe a document or pass a path)");
        }
        let format =
            format.context("Reading from stdin requires an explicit format (-t json|jsonl|yaml)")?;
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read stdin")?;
        let document = load_stdin(&bytes, format)?;
        (document, "stdin".to_string(), true)
    };

    if let Some(query_text) = &cli.query {
        return run_one_shot(query_text, &document);
    }

    let mut config = Config::load();
    if let Some(max) = cli.max_suggestions {
        config.max_suggestions = max;
    }

    run_interactive(document, source_name, stdin_was_piped, config)?;
    Ok(ExitCode::SUCCESS)
}

/// Evaluates one query and prints the result, for scripting.
///
/// A query failure prints the classified message to stderr and exits
/// non-zero; the document must still load cleanly.
fn run_one_shot(query_text: &str, document: &Value) -> Result<ExitCode> {
    match query::evaluate(query_text, document) {
        Ok(value) => {
            println!("{}", render::format_value(&value));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", err);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_interactive(
    document: Value,
    source_name: String,
    stdin_was_piped: bool,
    config: Config,
) -> Result<()> {
    let stdout = io::stdout()
        .into_raw_mode()
        .context("Failed to enable raw mode")?;
    let stdout = stdout
        .into_alternate_screen()
        .context("Failed to enter alternate screen")?;

    let backend = TermionBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let ui = UI::new(source_name);
    let mut input_handler = if stdin_was_piped {
        InputHandler::new_with_tty()
            .context("Failed to open /dev/tty for keyboard input when stdin was piped")?
    } else {
        InputHandler::new()
    };

    let mut session = QuerySession::new(document, config);

    let result = run_event_loop(&mut terminal, &ui, &mut input_handler, &mut session);

    // Termion restores the screen through Drop guards; just re-show the cursor.
    write!(terminal.backend_mut(), "{}", termion::cursor::Show)?;
    terminal.backend_mut().flush()?;

    result
}

fn run_event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    ui: &UI,
    input_handler: &mut InputHandler,
    session: &mut QuerySession,
) -> Result<()> {
    loop {
        ui.render(terminal, session)?;

        if let Some(event) = input_handler.poll_event(Duration::from_millis(100))? {
            let should_quit = input_handler.handle_event(event, session)?;
            if should_quit {
                break;
            }
        }
    }

    Ok(())
}
