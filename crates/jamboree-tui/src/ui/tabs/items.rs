use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use jamboree_core::models::Item;
use jamboree_core::utils::truncate_string;

use crate::app::App;
use crate::ui::styles;

/// Render the Items tab - equipment table plus the selected item's details
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    render_item_table(frame, app, chunks[0]);
    render_item_detail(frame, app, chunks[1]);
}

fn render_item_table(frame: &mut Frame, app: &App, area: Rect) {
    let visible = app.items.visible();
    let groups = app.groups.rows();

    let header = Row::new([
        Cell::from("Name"),
        Cell::from("Category"),
        Cell::from("Status"),
        Cell::from("Qty"),
        Cell::from("Bring"),
        Cell::from("Location"),
        Cell::from("Group"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == app.item_selection {
                styles::selected_style()
            } else if app.items.edit.is_editing(item.id) {
                styles::editing_style()
            } else {
                styles::list_item_style()
            };

            Row::new(vec![
                Cell::from(item.name.clone()),
                Cell::from(item.category.clone()),
                Cell::from(Span::styled(item.status.label().to_string(), styles::status_style(&item.status))),
                Cell::from(format!("{:>3}", item.quantity)),
                Cell::from(if item.bring_to_event { " ✓" } else { "" }),
                Cell::from(item.location.clone()),
                Cell::from(item.group_label(groups).to_string()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(3),    // Name
        Constraint::Fill(2),    // Category
        Constraint::Length(18), // Status
        Constraint::Length(4),  // Qty
        Constraint::Length(5),  // Bring
        Constraint::Fill(2),    // Location
        Constraint::Fill(2),    // Group
    ];

    let query = &app.items.query;
    let mut title = format!(" Items ({}) - {} ", visible.len(), query.status.label());
    if !query.search.is_empty() {
        title.push_str(&format!("- \"{}\" ", query.search));
    }
    if app.items.store.is_loading() {
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
    state.select(Some(app.item_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_item_detail(frame: &mut Frame, app: &App, area: Rect) {
    let content = match app.selected_item() {
        Some(item) => item_lines(app, item),
        None => vec![Line::from(Span::styled("No item selected", styles::muted_style()))],
    };

    let block = Block::default()
        .title(" Details ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn item_lines<'a>(app: &'a App, item: &'a Item) -> Vec<Line<'a>> {
    let groups = app.groups.rows();
    let group = item.group_label(groups);

    let field = |label: &'static str, value: String| {
        Line::from(vec![Span::styled(label, styles::muted_style()), Span::raw(value)])
    };

    let mut lines = vec![
        Line::from(Span::styled(truncate_string(&item.name, 40), styles::title_style())),
        Line::from(""),
        field("Category: ", item.category.clone()),
        Line::from(vec![
            Span::styled("Status:   ", styles::muted_style()),
            Span::styled(item.status.label().to_string(), styles::status_style(&item.status)),
        ]),
        field("Quantity: ", item.quantity.to_string()),
        field("Bring:    ", if item.bring_to_event { "yes" } else { "no" }.to_string()),
        field("Location: ", item.location.clone()),
        field("Group:    ", group.to_string()),
    ];

    if let Some(id) = item.approved_leader_id {
        let name = app.leaders.find(id).map(|l| l.name.clone()).unwrap_or_else(|| format!("#{}", id));
        lines.push(field("Approver: ", name));
    }
    if let Some(id) = item.responsible_scout_id {
        let name = app.scouts.find(id).map(|s| s.name.clone()).unwrap_or_else(|| format!("#{}", id));
        lines.push(field("Keeper:   ", name));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Note", styles::highlight_style())));
    lines.push(Line::from(item.note_display().to_string()));

    if app.items.edit.is_editing(item.id) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Unsaved edit - [e] to resume", styles::editing_style())));
    }

    lines
}
