use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use jamboree_core::sync::group_name;
use jamboree_core::utils::PLACEHOLDER;

use crate::app::App;
use crate::ui::styles;

/// Render the Scouts tab, or the locked panel while the gate is closed
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if !app.gate.is_open() {
        render_locked(frame, area);
        return;
    }

    let visible = app.scouts.visible();
    let groups = app.groups.rows();

    let header = Row::new([
        Cell::from("Name"),
        Cell::from("Reading"),
        Cell::from("Group"),
        Cell::from("Gr"),
        Cell::from("Rank"),
        Cell::from("Patrol"),
        Cell::from("G"),
    ])
    .style(styles::title_style())
    .height(1);

    let or_placeholder = |s: &str| if s.is_empty() { PLACEHOLDER.to_string() } else { s.to_string() };

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .map(|(i, scout)| {
            let style = if i == app.scout_selection {
                styles::selected_style()
            } else if scout.is_deleted {
                styles::deleted_style()
            } else if app.scouts.edit.is_editing(scout.id) {
                styles::editing_style()
            } else {
                styles::list_item_style()
            };

            let name = if scout.is_deleted {
                format!("{} (deleted)", scout.name)
            } else {
                scout.name.clone()
            };

            Row::new(vec![
                Cell::from(name),
                Cell::from(or_placeholder(&scout.name_kana)),
                Cell::from(group_name(groups, scout.group_id).to_string()),
                Cell::from(format!("{:>2}", or_placeholder(&scout.grade))),
                Cell::from(or_placeholder(&scout.rank)),
                Cell::from(or_placeholder(&scout.patrol)),
                Cell::from(or_placeholder(&scout.gender)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(24), // Name
        Constraint::Percentage(24), // Reading
        Constraint::Fill(2),        // Group
        Constraint::Length(3),      // Grade
        Constraint::Fill(2),        // Rank
        Constraint::Fill(2),        // Patrol
        Constraint::Length(2),      // Gender
    ];

    let query = &app.scouts.query;
    let mut title = format!(" Scouts ({}) - {} ", visible.len(), query.group.label(groups));
    if !query.query.is_empty() {
        title.push_str(&format!("- \"{}\" ", query.query));
    }
    if app.scouts.store.is_loading() {
        title.push_str("- loading... ");
    }

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.scout_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_locked(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  The scout roster is locked.", styles::highlight_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("Enter", styles::help_key_style()),
            Span::styled(" to enter the password.", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Scouts ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
