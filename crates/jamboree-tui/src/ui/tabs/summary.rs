use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use jamboree_core::sync::{leaders_by_group, scouts_by_grade, Breakdown, ItemStats, StatusFilter};

use crate::app::App;
use crate::ui::styles;

/// Render the Summary tab - counts for each page
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    render_items(frame, app, chunks[0]);

    let leaders = leaders_by_group(app.leaders.store.rows(), app.groups.rows());
    render_breakdown(frame, " Leaders by group ", Some(&leaders), chunks[1]);

    let scouts = app.gate.is_open().then(|| scouts_by_grade(app.scouts.store.rows()));
    render_breakdown(frame, " Scouts by grade ", scouts.as_ref(), chunks[2]);
}

fn render_items(frame: &mut Frame, app: &App, area: Rect) {
    let stats = ItemStats::from_items(app.items.store.rows());
    let count_line = |label: &'static str, count: usize, style| {
        Line::from(vec![
            Span::styled(label, styles::muted_style()),
            Span::styled(format!("{:>5}", count), style),
        ])
    };

    let mut lines = vec![
        count_line("Total:             ", stats.total, styles::title_style()),
        Line::from(""),
        count_line("Stored:            ", stats.stored, styles::success_style()),
        count_line("Borrowed:          ", stats.borrowed, styles::highlight_style()),
        count_line("Needs maintenance: ", stats.needs_maintenance, styles::error_style()),
    ];

    // Items are filtered on the server, so the counts follow the filter
    let query = &app.items.query;
    if !query.search.is_empty() || query.status != StatusFilter::All {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("(counts reflect the current filter)", styles::muted_style())));
    }

    let block = Block::default()
        .title(" Items ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_breakdown(frame: &mut Frame, title: &str, breakdown: Option<&Breakdown>, area: Rect) {
    let lines = match breakdown {
        Some(breakdown) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Total: ", styles::muted_style()),
                    Span::styled(breakdown.total.to_string(), styles::title_style()),
                ]),
                Line::from(""),
            ];
            for (bucket, count) in &breakdown.buckets {
                lines.push(Line::from(vec![
                    Span::styled(format!("{:<20}", bucket), styles::list_item_style()),
                    Span::styled(format!("{:>5}", count), styles::highlight_style()),
                ]));
            }
            lines
        }
        None => vec![Line::from(Span::styled("Locked", styles::muted_style()))],
    };

    let block = Block::default()
        .title(title.to_string())
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
