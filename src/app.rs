use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::time::Instant;
use tokio::sync::mpsc;

use crate::config::{AppConfig, HighlightStyle};
use crate::countries::graphql::{self, LoadError};
use crate::countries::Country;
use crate::state::{reduce, BrowserOptions, BrowserState, Event, Row};
use crate::theme::Theme;

/// How long a status message stays in the info line
const STATUS_SECONDS: u64 = 3;

type LoadResult = Result<Vec<Country>, LoadError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

/// What the event loop should do after a key or mouse event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
}

pub struct App {
    pub state: BrowserState,
    pub popup: Popup,

    // Cursor over country rows (headers are skipped)
    pub cursor: usize,
    pub list_offset: usize,
    pub list_viewport: Rect,

    pub highlight: HighlightStyle,
    pub theme: Theme,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    endpoint: String,
    client: reqwest::Client,
    load_tx: mpsc::UnboundedSender<LoadResult>,
    load_rx: mpsc::UnboundedReceiver<LoadResult>,
    load_in_flight: bool,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = graphql::build_client(config.timeout())?;
        let (load_tx, load_rx) = mpsc::unbounded_channel();
        let options = BrowserOptions {
            filter_mode: config.filter_mode,
            default_selection_limit: config.default_selection_limit,
        };

        Ok(Self {
            state: BrowserState::new(options),
            popup: Popup::None,

            cursor: 0,
            list_offset: 0,
            list_viewport: Rect::default(),

            highlight: config.highlight,
            theme: Theme::from_config(&config.theme),

            status_message: None,
            status_message_time: None,

            endpoint: config.endpoint.clone(),
            client,
            load_tx,
            load_rx,
            load_in_flight: false,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run an event through the reducer and keep the cursor consistent:
    /// it jumps to a new default selection, otherwise stays on its country
    pub fn dispatch(&mut self, event: Event) {
        let follow_selection = !matches!(event, Event::Select(_));
        let before = self.state.selection().code().map(str::to_string);
        let cursor_code = self.cursor_code();

        let state = std::mem::replace(&mut self.state, BrowserState::new(BrowserOptions::default()));
        self.state = reduce(state, event);

        let after = self.state.selection().code().map(str::to_string);
        match after {
            Some(code) if follow_selection && before.as_deref() != Some(code.as_str()) => {
                self.move_cursor_to(&code)
            }
            _ => {
                if let Some(code) = cursor_code {
                    self.move_cursor_to(&code);
                }
            }
        }
        self.clamp_cursor();
    }

    /// Fetch the country list in the background. A load already in flight
    /// is not duplicated.
    pub fn start_load(&mut self) {
        if self.load_in_flight {
            self.set_status("Already loading...");
            return;
        }
        self.load_in_flight = true;
        self.dispatch(Event::LoadStarted);

        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let tx = self.load_tx.clone();
        tracing::info!("Loading countries from {}", endpoint);

        tokio::spawn(async move {
            let result = graphql::fetch_countries(&client, &endpoint).await;
            // Receiver only goes away on shutdown
            let _ = tx.send(result);
        });
    }

    /// Apply finished loads and expire old status messages
    pub fn tick(&mut self) {
        while let Ok(result) = self.load_rx.try_recv() {
            self.finish_load(result);
        }

        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_SECONDS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    fn finish_load(&mut self, result: LoadResult) {
        self.load_in_flight = false;
        match result {
            Ok(countries) => self.dispatch(Event::Loaded(countries)),
            Err(e) => {
                tracing::warn!("Country load failed: {}", e);
                self.dispatch(Event::LoadFailed(e.to_string()));
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if self.popup != Popup::None {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Enter) {
                self.popup = Popup::None;
            }
            return Action::None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return Action::Quit,
            KeyCode::Char('r') if ctrl => self.start_load(),
            KeyCode::Char('u') if ctrl => self.dispatch(Event::SearchClear),
            KeyCode::F(5) => self.start_load(),
            KeyCode::F(1) => self.popup = Popup::Help,
            KeyCode::Char('?') if self.state.search().is_empty() => self.popup = Popup::Help,

            KeyCode::Esc => {
                if self.state.search().is_empty() {
                    return Action::Quit;
                }
                self.dispatch(Event::SearchClear);
            }

            // Group-by selector
            KeyCode::Tab => self.dispatch(Event::CycleGroup),
            KeyCode::BackTab => self.dispatch(Event::CycleGroupBack),

            // Navigation
            KeyCode::Down => self.move_by(1),
            KeyCode::Up => self.move_by(-1),
            KeyCode::PageDown => self.move_by(self.page_size() as isize),
            KeyCode::PageUp => self.move_by(-(self.page_size() as isize)),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.country_count().saturating_sub(1),

            KeyCode::Enter => self.select_cursor(),

            // Search input
            KeyCode::Backspace => self.dispatch(Event::SearchBackspace),
            KeyCode::Char(c) if !ctrl => self.dispatch(Event::SearchInput(c)),

            _ => {}
        }
        Action::None
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.popup != Popup::None {
            return;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(row) = self.row_at(mouse.column, mouse.row) {
                    self.click_row(row);
                }
            }
            MouseEventKind::ScrollDown => self.move_by(1),
            MouseEventKind::ScrollUp => self.move_by(-1),
            _ => {}
        }
    }

    /// Record the list area from the last layout and scroll the cursor into view
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.list_viewport = viewport;
        let rows = self.state.rows();
        let height = viewport.height as usize;
        if height == 0 {
            return;
        }

        if let Some(row) = self.cursor_row(&rows) {
            // Keep a group header visible above its first country
            let top = match row.checked_sub(1).map(|i| &rows[i]) {
                Some(Row::Header(_)) => row - 1,
                _ => row,
            };
            if top < self.list_offset {
                self.list_offset = top;
            } else if row >= self.list_offset + height {
                self.list_offset = row + 1 - height;
            }
        }
        self.list_offset = self.list_offset.min(rows.len().saturating_sub(height));
    }

    /// Index into `rows` of the row under the cursor
    pub fn cursor_row(&self, rows: &[Row]) -> Option<usize> {
        rows.iter()
            .enumerate()
            .filter(|(_, r)| matches!(r, Row::Country(_)))
            .nth(self.cursor)
            .map(|(i, _)| i)
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.list_viewport;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        inside.then(|| self.list_offset + (row - area.y) as usize)
    }

    fn click_row(&mut self, index: usize) {
        let rows = self.state.rows();
        if let Some(Row::Country(country)) = rows.get(index) {
            self.cursor = rows[..index]
                .iter()
                .filter(|r| matches!(r, Row::Country(_)))
                .count();
            self.dispatch(Event::Select(country.code.clone()));
        }
    }

    fn select_cursor(&mut self) {
        let rows = self.state.rows();
        if let Some(Row::Country(country)) = self.cursor_row(&rows).map(|i| &rows[i]) {
            let code = country.code.clone();
            self.dispatch(Event::Select(code));
        }
    }

    fn cursor_code(&self) -> Option<String> {
        let rows = self.state.rows();
        match self.cursor_row(&rows).map(|i| &rows[i]) {
            Some(Row::Country(country)) => Some(country.code.clone()),
            _ => None,
        }
    }

    fn move_cursor_to(&mut self, code: &str) {
        let position = self
            .state
            .rows()
            .iter()
            .filter_map(|r| match r {
                Row::Country(c) => Some(c),
                Row::Header(_) => None,
            })
            .position(|c| c.code == code);
        if let Some(position) = position {
            self.cursor = position;
        }
    }

    fn move_by(&mut self, delta: isize) {
        let count = self.country_count();
        if count == 0 {
            self.cursor = 0;
            return;
        }
        let target = self.cursor as isize + delta;
        self.cursor = target.clamp(0, count as isize - 1) as usize;
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.country_count().saturating_sub(1));
    }

    fn country_count(&self) -> usize {
        self.state.filtered().len()
    }

    fn page_size(&self) -> usize {
        (self.list_viewport.height as usize).max(1)
    }
}
