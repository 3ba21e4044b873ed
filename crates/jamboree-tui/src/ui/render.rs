use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, Tab};

use super::form;
use super::styles;
use super::tabs::{items, leaders, scouts, summary};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    let full = frame.area();
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::Form => form::render(frame, app, full),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        AppState::Unlocking => render_unlock_overlay(frame, app),
        AppState::ImportingCsv => render_import_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Normal | AppState::Searching | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = "  Jamboree Gear";
    let help_hint = "[?] Help";
    let title_len = title.len();

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title_len as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let main_tabs = [
        ("[1] Items", app.current_tab == Tab::Items),
        ("[2] Leaders", app.current_tab == Tab::Leaders),
        ("[3] Scouts", app.current_tab == Tab::Scouts),
        ("[4] Summary", app.current_tab == Tab::Summary),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, (label, selected)) in main_tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        if *selected {
            spans.push(Span::styled(*label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(*label, styles::tab_style(false)));
        }
    }

    // Search line sits on the right while typing or while a search is active
    let search = app.search_text();
    if app.state == AppState::Searching || !search.is_empty() {
        let cursor = if app.state == AppState::Searching { "▌" } else { "" };
        let text = format!("/{}{}", search, cursor);
        let main_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let padding = (area.width as usize).saturating_sub(main_width + text.chars().count() + 2);
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled(text, styles::search_style()));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Items => items::render(frame, app, area),
        Tab::Leaders => leaders::render(frame, app, area),
        Tab::Scouts => scouts::render(frame, app, area),
        Tab::Summary => summary::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.current_tab {
        Tab::Items => "[n]ew [e]dit [d]elete [s]tatus | [u]pdate [q]uit",
        Tab::Leaders => "[n]ew [e]dit [g]roup | [u]pdate [q]uit",
        Tab::Scouts if app.gate.is_open() => "[n]ew [e]dit [g]roup [i]mport | [u]pdate [q]uit",
        Tab::Scouts | Tab::Summary => "[u]pdate [q]uit",
    };

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        let age = match app.current_tab {
            Tab::Items | Tab::Summary => app.items.store.age_display(),
            Tab::Leaders => app.leaders.store.age_display(),
            Tab::Scouts => app.scouts.store.age_display(),
        };
        format!(" Updated {} ", age)
    };

    let center_text = match app.gate.data.as_ref() {
        Some(data) if app.current_tab == Tab::Scouts && app.gate.requires_password() => {
            format!("Unlocked, {}h left [L]ock", data.hours_remaining())
        }
        _ => app.base_url.clone(),
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let center_start = (width.saturating_sub(center_text.chars().count())) / 2;
    let left_pad = center_start.saturating_sub(left_text.chars().count());
    let right_start = center_start + center_text.chars().count();
    let right_pad = width.saturating_sub(right_start).saturating_sub(right_text.chars().count());

    let left_style = if app.status_message.as_deref().is_some_and(|m| m.contains("failed")) {
        styles::error_style()
    } else {
        styles::muted_style()
    };

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(left_pad)),
        Span::styled(center_text, styles::muted_style()),
        Span::raw(" ".repeat(right_pad)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 27, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("   Jamboree Gear", styles::title_style())),
        Line::from(Span::styled(format!("   version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-4", "Switch tabs"),
        help_line("←/→", "Prev/next tab"),
        help_line("↑/↓ j/k", "Navigate list"),
        help_line("PgUp/PgDn", "Scroll a page"),
        help_line("Home/End", "First/last row"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("/", "Search"),
        help_line("u", "Update from the server"),
        help_line("n", "New row"),
        help_line("e / Enter", "Edit selected row"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(" Pages", styles::highlight_style())),
        help_line("s", "Items: cycle status filter"),
        help_line("d", "Items: delete selected"),
        help_line("g", "Rosters: cycle group filter"),
        help_line("i", "Scouts: import CSV"),
        help_line("L", "Scouts: lock the page"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(46, 8, frame.area());
    frame.render_widget(Clear, area);

    let name = app
        .items
        .pending_delete()
        .and_then(|id| app.items.find(id))
        .map(|item| item.name.clone())
        .unwrap_or_else(|| "this item".to_string());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("   Delete \"{}\"?", name), styles::highlight_style())),
        Line::from(Span::styled("   This cannot be undone.", styles::muted_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Delete item ")
        .title_style(styles::error_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_unlock_overlay(frame: &mut Frame, app: &App) {
    let height = if app.unlock_error.is_some() { 9 } else { 7 };
    let area = centered_rect_fixed(46, height, frame.area());
    frame.render_widget(Clear, area);

    let masked: String = "*".repeat(app.unlock_input.chars().count().min(24));
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("   Scout roster password", styles::highlight_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   [", styles::muted_style()),
            Span::styled(format!("{:<24}▌", masked), styles::selected_style()),
            Span::styled("]", styles::muted_style()),
        ]),
    ];

    if let Some(ref error) = app.unlock_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("   {}", error), styles::error_style())));
    }

    let block = Block::default()
        .title(" Unlock ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_import_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(64, 8, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("   Path to a scout CSV file", styles::highlight_style())),
        Line::from(""),
        Line::from(vec![
            Span::raw("   "),
            Span::styled(format!("{}▌", app.import_path), styles::selected_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled("   Enter to upload, Esc to cancel", styles::muted_style())),
    ];

    let block = Block::default()
        .title(" Import scouts ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}
