use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use jamboree_core::sync::group_name;
use jamboree_core::utils::{format_optional, format_phone};

use crate::app::App;
use crate::ui::styles;

/// Render the Leaders tab - roster table plus contact details
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_leader_table(frame, app, chunks[0]);
    render_leader_detail(frame, app, chunks[1]);
}

fn render_leader_table(frame: &mut Frame, app: &App, area: Rect) {
    let visible = app.leaders.visible();
    let groups = app.groups.rows();

    let header = Row::new([Cell::from("Name"), Cell::from("Group"), Cell::from("Role")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .map(|(i, leader)| {
            let style = if i == app.leader_selection {
                styles::selected_style()
            } else if leader.is_deleted {
                styles::deleted_style()
            } else if app.leaders.edit.is_editing(leader.id) {
                styles::editing_style()
            } else {
                styles::list_item_style()
            };

            let name = if leader.is_deleted {
                format!("{} (deleted)", leader.name)
            } else {
                leader.name.clone()
            };

            Row::new(vec![
                Cell::from(name),
                Cell::from(group_name(groups, leader.group_id).to_string()),
                Cell::from(format_optional(&leader.role).to_string()),
            ])
            .style(style)
        })
        .collect();

    let widths = [Constraint::Percentage(40), Constraint::Fill(2), Constraint::Fill(2)];

    let query = &app.leaders.query;
    let mut title = format!(" Leaders ({}) - {} ", visible.len(), query.group.label(groups));
    if !query.query.is_empty() {
        title.push_str(&format!("- \"{}\" ", query.query));
    }
    if app.leaders.store.is_loading() {
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
    state.select(Some(app.leader_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_leader_detail(frame: &mut Frame, app: &App, area: Rect) {
    let content = match app.selected_leader() {
        Some(leader) => {
            let phone = leader
                .phone
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(format_phone)
                .unwrap_or_else(|| "-".to_string());

            let mut lines = vec![
                Line::from(Span::styled(leader.name.clone(), styles::title_style())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Group:  ", styles::muted_style()),
                    Span::raw(group_name(app.groups.rows(), leader.group_id).to_string()),
                ]),
                Line::from(vec![
                    Span::styled("Role:   ", styles::muted_style()),
                    Span::raw(format_optional(&leader.role).to_string()),
                ]),
                Line::from(vec![
                    Span::styled("Gender: ", styles::muted_style()),
                    Span::raw(format_optional(&leader.gender).to_string()),
                ]),
                Line::from(""),
                Line::from(Span::styled("Contact", styles::highlight_style())),
                Line::from(vec![Span::styled("Phone:  ", styles::muted_style()), Span::raw(phone)]),
                Line::from(vec![
                    Span::styled("Email:  ", styles::muted_style()),
                    Span::raw(format_optional(&leader.email).to_string()),
                ]),
            ];

            if leader.is_deleted {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("Marked deleted on the server", styles::error_style())));
            }
            lines
        }
        None => vec![Line::from(Span::styled("No leader selected", styles::muted_style()))],
    };

    let block = Block::default()
        .title(" Details ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(content).block(block), area);
}
