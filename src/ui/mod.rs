use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Popup};
use crate::config::HighlightStyle;
use crate::countries::{Country, GroupKey};
use crate::state::{LoadState, Row};

struct Areas {
    info: Rect,
    search: Rect,
    group: Rect,
    list: Rect,
    footer: Rect,
}

fn layout(area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1), // Info line
            Constraint::Length(3), // Search + group-by
            Constraint::Min(3),    // Country list
            Constraint::Length(1), // Footer
        ])
        .split(area);

    let controls = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(28)])
        .split(chunks[1]);

    Areas {
        info: chunks[0],
        search: controls[0],
        group: controls[1],
        list: chunks[2],
        footer: chunks[3],
    }
}

/// Inner area of the list box for a terminal of the given size
pub fn list_viewport(area: Rect) -> Rect {
    layout(area).list.inner(Margin::new(1, 1))
}

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout(f.area());

    draw_info_line(f, app, areas.info);
    draw_search_box(f, app, areas.search);
    draw_group_box(f, app, areas.group);
    draw_country_list(f, app, areas.list);
    draw_footer(f, app, areas.footer);

    if app.popup == Popup::Help {
        draw_help_popup(f, app);
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    // Priority: status message > load state
    let status = if let Some(ref status) = app.status_message {
        Span::styled(status.as_str(), Style::default().fg(theme.accent))
    } else {
        match app.state.load() {
            LoadState::Loading => Span::styled(
                format!("Loading countries from {}", app.endpoint()),
                Style::default().fg(theme.text_dim),
            ),
            LoadState::Loaded => Span::styled(
                format!(
                    "{} of {} countries",
                    app.state.filtered().len(),
                    app.state.countries().len()
                ),
                Style::default().fg(theme.text_dim),
            ),
            LoadState::Failed(msg) => Span::styled(
                format!("Load failed: {}", msg),
                Style::default().fg(theme.danger),
            ),
        }
    };

    let line = Line::from(vec![
        Span::styled(
            "Ülkeler",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" │ ", Style::default().fg(theme.inactive)),
        status,
    ]);

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_search_box(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .title(Span::styled(
            " Search ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));

    let search = app.state.search();
    let line = if search.is_empty() {
        Line::from(vec![
            Span::styled("█", Style::default().fg(theme.accent)),
            Span::styled(" Search...", Style::default().fg(theme.text_dim)),
        ])
    } else {
        Line::from(vec![
            Span::styled(search, Style::default().fg(theme.text)),
            Span::styled("█", Style::default().fg(theme.accent)),
        ])
    };

    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_group_box(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .title(Span::styled(" Group by (Tab) ", Style::default().fg(theme.inactive)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.inactive));

    let current = app.state.group_key();
    let mut spans = Vec::new();
    for key in GroupKey::ALL {
        let style = if key == current {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_dim)
        };
        if !spans.is_empty() {
            spans.push(Span::styled(" · ", Style::default().fg(theme.inactive)));
        }
        spans.push(Span::styled(key.label(), style));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn draw_country_list(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let rows = app.state.rows();

    let block = Block::default()
        .title(Span::styled(
            format!(" Countries ({}) ", app.state.filtered().len()),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));

    if rows.is_empty() {
        let (text, color) = match app.state.load() {
            LoadState::Loading => ("  Loading countries...".to_string(), theme.text_dim),
            LoadState::Failed(msg) => (
                format!("  Could not load countries: {}\n  Press Ctrl+R to retry", msg),
                theme.danger,
            ),
            LoadState::Loaded if app.state.countries().is_empty() => {
                ("  The endpoint returned no countries".to_string(), theme.text_dim)
            }
            LoadState::Loaded => (
                format!("  No countries match '{}'", app.state.search()),
                theme.text_dim,
            ),
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: false })
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let grouped = app.state.group_key() != GroupKey::None;
    let cursor_row = app.cursor_row(&rows);
    let height = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(app.list_offset)
        .take(height)
        .map(|(i, row)| match row {
            Row::Header(key) => Line::from(Span::styled(
                key.as_str(),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            )),
            Row::Country(country) => country_line(app, country, grouped, cursor_row == Some(i)),
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn country_line<'a>(app: &App, country: &'a Country, indent: bool, is_cursor: bool) -> Line<'a> {
    let theme = &app.theme;
    let selection = app.state.selection();
    let is_selected = selection.is_selected(&country.code);

    let pointer = if is_cursor { "› " } else { "  " };
    let indent = if indent { "  " } else { "" };

    let mut spans = vec![
        Span::styled(pointer, Style::default().fg(theme.accent)),
        Span::raw(indent),
    ];

    let mut name_style = Style::default().fg(theme.text);
    let mut code_style = Style::default().fg(theme.text_dim);
    if is_selected {
        match app.highlight {
            HighlightStyle::Palette => {
                let bg = theme.highlight(selection.color());
                name_style = Style::default().fg(theme.selected_fg).bg(bg).add_modifier(Modifier::BOLD);
                code_style = Style::default().fg(theme.selected_fg).bg(bg);
            }
            HighlightStyle::Marker => {
                spans.push(Span::styled("● ", Style::default().fg(theme.accent)));
                name_style = name_style.add_modifier(Modifier::BOLD);
            }
        }
    }

    spans.push(Span::styled(country.name.as_str(), name_style));
    spans.push(Span::styled(format!(" ({})", country.code), code_style));

    let line = Line::from(spans);
    if is_cursor && !is_selected {
        line.style(Style::default().bg(theme.bg_cursor))
    } else {
        line
    }
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let hints: Vec<(&str, &str)> = vec![
        ("type", "Search"),
        ("↑↓", "Nav"),
        ("Enter", "Select"),
        ("Tab", "Group"),
        ("^R", "Reload"),
        ("F1", "Help"),
        ("Esc", "Clear/Quit"),
    ];

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 4 } else if area.width < 80 { 5 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(theme.accent)),
                Span::styled(format!(" {} │ ", action), Style::default().fg(theme.text_dim)),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_help_popup(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 95 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ))
    };
    let entry = |keys: &'static str, text: &'static str| {
        Line::from(vec![
            Span::styled(keys, Style::default().fg(theme.accent)),
            Span::styled(text, Style::default().fg(theme.text)),
        ])
    };

    let help_text = vec![
        section("═══ Search ═══"),
        entry("  any key   ", "Type to filter (case-insensitive)"),
        entry("  Backspace ", "Delete last character"),
        entry("  Ctrl+U    ", "Clear search"),
        entry("  Esc       ", "Clear search, quit when already empty"),
        Line::from(""),
        section("═══ List ═══"),
        entry("  ↑/↓       ", "Move cursor"),
        entry("  PgUp/PgDn ", "Move a page"),
        entry("  Enter     ", "Select / deselect country (or click it)"),
        entry("  Tab       ", "Group by: none → code → name"),
        Line::from(""),
        section("═══ Data ═══"),
        entry("  Ctrl+R/F5 ", "Reload countries from the endpoint"),
        Line::from(Span::styled(
            format!("  {}", app.endpoint()),
            Style::default().fg(theme.text_dim),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(theme.text_dim)),
            Span::styled("F1", Style::default().fg(theme.accent)),
            Span::styled("/", Style::default().fg(theme.text_dim)),
            Span::styled("Esc", Style::default().fg(theme.accent)),
            Span::styled(" to close", Style::default().fg(theme.text_dim)),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" Help ", Style::default().fg(theme.accent)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
