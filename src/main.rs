mod app;
mod config;
mod countries;
mod selection;
mod state;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{Action, App};
use config::AppConfig;
use countries::{graphql, GroupKey};
use state::{reduce, BrowserOptions, BrowserState, Row};

#[derive(Parser, Debug)]
#[command(name = "ulkeler")]
#[command(version)]
#[command(about = "Search, group and highlight countries from the countries GraphQL API")]
struct Args {
    /// GraphQL endpoint to load countries from
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Print the countries once and exit instead of starting the TUI
    #[arg(short, long)]
    list: bool,

    /// Search term applied with --list
    #[arg(short, long, default_value = "")]
    search: String,

    /// Group the --list output by none, code or name
    #[arg(short, long, default_value = "none")]
    group: GroupKey,

    /// Print --list output as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, silent unless RUST_LOG is set)
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load().unwrap_or_default();
    if let Some(endpoint) = args.endpoint.clone() {
        config.endpoint = endpoint;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }

    if args.list {
        return print_list(&config, &args).await;
    }

    run_tui(&config).await
}

/// One-shot mode: load, filter, group, pick the default selection and print
async fn print_list(config: &AppConfig, args: &Args) -> Result<()> {
    let client = graphql::build_client(config.timeout())?;
    let countries = graphql::fetch_countries(&client, &config.endpoint)
        .await
        .with_context(|| format!("Failed to load countries from {}", config.endpoint))?;

    let options = BrowserOptions {
        filter_mode: config.filter_mode,
        default_selection_limit: config.default_selection_limit,
    };
    let state = [
        state::Event::Loaded(countries),
        state::Event::SetGroup(args.group),
        state::Event::SetSearch(args.search.clone()),
    ]
    .into_iter()
    .fold(BrowserState::new(options), reduce);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&list_json(&state))?);
    } else {
        print!("{}", list_text(&state));
    }
    Ok(())
}

fn list_json(state: &BrowserState) -> serde_json::Value {
    let selected = state.selection().code();
    let color = state.selection().color_index();
    match state.grouped() {
        None => serde_json::json!({
            "search": state.search(),
            "group": state.group_key(),
            "selected": selected,
            "color": color,
            "countries": state.filtered(),
        }),
        Some(groups) => {
            let groups: Vec<_> = groups
                .into_iter()
                .map(|g| serde_json::json!({ "key": g.key, "countries": g.countries }))
                .collect();
            serde_json::json!({
                "search": state.search(),
                "group": state.group_key(),
                "selected": selected,
                "color": color,
                "groups": groups,
            })
        }
    }
}

fn list_text(state: &BrowserState) -> String {
    let grouped = state.group_key() != GroupKey::None;
    let mut out = String::new();
    for row in state.rows() {
        match row {
            Row::Header(key) => out.push_str(&format!("{}\n", key)),
            Row::Country(c) => {
                let marker = if state.selection().is_selected(&c.code) { "*" } else { " " };
                let indent = if grouped { "  " } else { "" };
                out.push_str(&format!("{}{} {} ({})\n", indent, marker, c.name, c.code));
            }
        }
    }
    out
}

async fn run_tui(config: &AppConfig) -> Result<()> {
    // Create app state before touching the terminal so setup errors print cleanly
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Initial load on mount
    app.start_load();

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        let size = terminal.size()?;
        app.set_viewport(ui::list_viewport(Rect::new(0, 0, size.width, size.height)));
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key) == Action::Quit {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        // Let the load task make progress and pick up its result
        tokio::task::yield_now().await;
        app.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countries::sample;

    fn state_for(search: &str, group: GroupKey) -> BrowserState {
        let countries = sample(&[("CA", "Canada"), ("CU", "Cuba"), ("TR", "Turkey")]);
        [
            state::Event::Loaded(countries),
            state::Event::SetGroup(group),
            state::Event::SetSearch(search.to_string()),
        ]
        .into_iter()
        .fold(BrowserState::new(BrowserOptions::default()), reduce)
    }

    #[test]
    fn test_list_text_marks_default_selection() {
        let text = list_text(&state_for("c", GroupKey::None));
        assert_eq!(text, "  Canada (CA)\n* Cuba (CU)\n");
    }

    #[test]
    fn test_list_text_grouped() {
        let text = list_text(&state_for("", GroupKey::Code));
        assert_eq!(text, "CA\n    Canada (CA)\nCU\n    Cuba (CU)\nTR\n  * Turkey (TR)\n");
    }

    #[test]
    fn test_list_json_shape() {
        let value = list_json(&state_for("tur", GroupKey::None));
        assert_eq!(value["group"], "none");
        assert_eq!(value["selected"], "TR");
        assert_eq!(value["color"], 0);
        assert_eq!(value["countries"][0]["name"], "Turkey");

        let value = list_json(&state_for("", GroupKey::Name));
        assert_eq!(value["groups"].as_array().unwrap().len(), 3);
        assert_eq!(value["groups"][1]["key"], "Cuba");
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["ulkeler", "--list", "--group", "code", "-s", "an"]);
        assert!(args.list);
        assert_eq!(args.group, GroupKey::Code);
        assert_eq!(args.search, "an");
    }
}
