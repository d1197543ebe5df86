//! splitreview: review proposed document splits by dragging page-boundary markers.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use splitreview::app_state::{AppState, DragOutcome};
use splitreview::drag::DragGesture;
use splitreview::geometry::UniformStrip;
use splitreview::proposal::ProposalStore;
use splitreview::{config, ui};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "splitreview")]
#[command(about = "Review proposed document splits by dragging page-boundary markers", long_about = None)]
struct Args {
    /// Number of pages in the document
    #[arg(long, short = 'n', value_name = "N")]
    pages: usize,

    /// Proposal JSON returned by the analysis service
    #[arg(long, short = 'p', value_name = "FILE")]
    proposals: Option<PathBuf>,

    /// Document being split, recorded in the commit plan
    #[arg(long, short = 'd', default_value = "document.pdf")]
    document: String,

    /// Write the commit plan here instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the proposed sections as JSON and exit without the TUI
    #[arg(long)]
    print: bool,

    /// Columns per page cell in the strip
    #[arg(long, value_name = "COLS")]
    page_width: Option<u16>,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref(), args.print)?;

    let mut cfg = config::Config::load();

    // Override config with command line args
    if let Some(width) = args.page_width {
        cfg.page_width = width;
        cfg = cfg.sanitized();
    }

    let store = match &args.proposals {
        Some(path) => {
            ProposalStore::load(path, &cfg.boilerplate_tokens).map_err(io::Error::other)?
        }
        None => ProposalStore::default(),
    };

    let mut state = AppState::new(cfg.overlap_tolerance);
    let geometry = UniformStrip::new(args.pages, f64::from(cfg.page_width));
    state
        .load_geometry(args.pages, &geometry)
        .map_err(io::Error::other)?;
    state.receive_proposals(store);

    if args.print {
        let json = serde_json::to_string_pretty(state.sections()).map_err(io::Error::other)?;
        println!("{json}");
        return Ok(());
    }

    run_tui(state, &args)
}

fn init_tracing(log_file: Option<&Path>, print_mode: bool) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Some(path) = log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if print_mode {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    // The TUI owns the terminal, so without a log file logs are discarded.
    Ok(())
}

fn run_tui(mut app: AppState, args: &Args) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut view = ui::StripView::default();
    let result = run_app(&mut terminal, &mut app, &mut view);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    } else {
        let plan = app.commit_plan(&args.document);
        match &args.output {
            Some(path) => plan.write_to(path).map_err(io::Error::other)?,
            None => println!("{}", plan.to_json().map_err(io::Error::other)?),
        }
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    view: &mut ui::StripView,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app, view))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key(app, view, key) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => handle_mouse(app, view, mouse),
            _ => {}
        }
    }
}

/// Distance between neighbouring boundaries in the strip.
fn pitch(app: &AppState) -> f64 {
    app.snaps()
        .and_then(|s| Some(s.position(1)? - s.position(0)?))
        .unwrap_or(1.0)
}

fn selected_marker_position(app: &AppState) -> Option<f64> {
    app.markers()?.get(app.selected_marker).map(|m| m.position)
}

/// Returns true when the user asked to quit.
fn handle_key(app: &mut AppState, view: &mut ui::StripView, key: KeyEvent) -> bool {
    app.message = None;
    let shift = key.modifiers.contains(event::KeyModifiers::SHIFT);

    if app.drag().is_some() {
        let step = if shift { pitch(app) } else { 1.0 };
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => app.nudge_drag(-step),
            KeyCode::Right | KeyCode::Char('l') => app.nudge_drag(step),
            KeyCode::Up | KeyCode::Char('k') => app.set_drag_in_track(false),
            KeyCode::Down | KeyCode::Char('j') => app.set_drag_in_track(true),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let outcome = app.drop_at_cursor();
                report(app, &outcome);
                view.focus = selected_marker_position(app);
                return false;
            }
            KeyCode::Esc => {
                app.cancel_drag();
                app.message = Some("Drag cancelled".to_string());
                view.focus = selected_marker_position(app);
                return false;
            }
            _ => {}
        }
        view.focus = app.drag().map(|d| d.cursor);
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Left | KeyCode::Char('h') => {
            app.select_marker(false);
            view.focus = selected_marker_position(app);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.select_marker(true);
            view.focus = selected_marker_position(app);
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Err(e) = app.begin_drag(app.selected_marker) {
                app.message = Some(e.to_string());
            }
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
            app.select_section(true);
            view.focus = app.section_anchor(app.selected_section);
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
            app.select_section(false);
            view.focus = app.section_anchor(app.selected_section);
        }
        KeyCode::Char('+' | '=') => shift_section_start(app, true),
        KeyCode::Char('-') => shift_section_start(app, false),
        _ => {}
    }
    false
}

fn shift_section_start(app: &mut AppState, later: bool) {
    let index = app.selected_section;
    let Some(start) = app.sections().get(index).map(|s| s.start_page) else {
        return;
    };
    let page = if later {
        start + 1
    } else {
        start.saturating_sub(1)
    };
    if !app.set_section_start(index, page) {
        app.message = Some(format!("Page {page} is outside the document"));
    }
}

fn handle_mouse(app: &mut AppState, view: &mut ui::StripView, mouse: MouseEvent) {
    let viewport = view.viewport;
    let (col, row) = (f64::from(mouse.column), f64::from(mouse.row));
    let x = viewport.to_content_x(col);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if app.drag().is_none() => {
            if !viewport.in_track(row) {
                return;
            }
            let half_pitch = pitch(app) / 2.0;
            let hit = app.markers().and_then(|m| {
                let index = m.nearest(x)?;
                let position = m.get(index)?.position;
                ((position - x).abs() <= half_pitch).then_some(index)
            });
            if let Some(index) = hit {
                app.message = None;
                if app.begin_drag(index).is_ok() {
                    app.move_drag(x, true);
                }
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.move_drag(x, viewport.in_track(row));
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(drag) = app.drag().copied() {
                let gesture = DragGesture::from_screen(drag.marker, col, row, &viewport);
                let outcome = app.end_drag(gesture);
                report(app, &outcome);
            }
        }
        MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => view.scroll_by(pitch(app)),
        MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => view.scroll_by(-pitch(app)),
        _ => {}
    }
}

fn report(app: &mut AppState, outcome: &DragOutcome) {
    app.message = Some(match outcome {
        DragOutcome::Applied(target) => format!("Marker dropped on boundary {}", target.index),
        DragOutcome::Rejected(e) => format!("Snapped back: {e}"),
    });
}
