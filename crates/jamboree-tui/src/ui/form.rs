//! Create/edit overlay. One renderer serves every payload type through
//! `FormFields`; the app state decides which payload is shown.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use jamboree_core::models::{FieldKind, FormFields, Group, ItemStatus};
use jamboree_core::sync::group_name;

use crate::app::{App, FormMode, FormState, Tab};

use super::styles;

/// Width of the label column, including the trailing space
const LABEL_WIDTH: usize = 11;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let groups = app.groups.rows();
    let form = &app.form;
    let title = match form.mode {
        FormMode::Create => format!(" New {} ", singular(app.current_tab)),
        FormMode::Edit => format!(" Edit {} ", singular(app.current_tab)),
    };

    let lines = match (app.current_tab, form.mode) {
        (Tab::Items, FormMode::Create) => field_lines(form, &app.items.form, groups),
        (Tab::Leaders, FormMode::Create) => field_lines(form, &app.leaders.form, groups),
        (Tab::Scouts, FormMode::Create) => field_lines(form, &app.scouts.form, groups),
        (Tab::Items, FormMode::Edit) => app.items.edit.draft().map(|d| field_lines(form, d, groups)).unwrap_or_default(),
        (Tab::Leaders, FormMode::Edit) => {
            app.leaders.edit.draft().map(|d| field_lines(form, d, groups)).unwrap_or_default()
        }
        (Tab::Scouts, FormMode::Edit) => app.scouts.edit.draft().map(|d| field_lines(form, d, groups)).unwrap_or_default(),
        (Tab::Summary, _) => return,
    };

    render_overlay(frame, title, lines, form.error.as_deref(), area);
}

fn singular(tab: Tab) -> &'static str {
    match tab {
        Tab::Items => "item",
        Tab::Leaders => "leader",
        Tab::Scouts => "scout",
        Tab::Summary => "",
    }
}

fn field_lines<F: FormFields>(form: &FormState, target: &F, groups: &[Group]) -> Vec<Line<'static>> {
    F::fields()
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let focused = index == form.focus;
            let raw = if focused { form.buffer.clone() } else { target.value(index) };
            let shown = display_value(spec.kind, &raw, groups);

            let label = format!("{:<width$}", spec.label, width = LABEL_WIDTH);
            let mut spans = vec![Span::styled(format!(" {}", label), styles::muted_style())];
            if focused {
                let cursor = if spec.kind.is_choice() { "" } else { "▌" };
                spans.push(Span::styled(format!("{}{}", shown, cursor), styles::selected_style()));
                if spec.kind.is_choice() {
                    spans.push(Span::styled("  ←/→", styles::help_key_style()));
                }
            } else {
                spans.push(Span::styled(shown, styles::list_item_style()));
            }
            Line::from(spans)
        })
        .collect()
}

/// Human-readable form of a field's text value
fn display_value(kind: FieldKind, raw: &str, groups: &[Group]) -> String {
    match kind {
        FieldKind::Group => match raw.parse::<i64>() {
            Ok(id) if id > 0 => group_name(groups, id).to_string(),
            _ => "(choose)".to_string(),
        },
        FieldKind::Status if !raw.is_empty() => ItemStatus::from(raw.to_string()).label().to_string(),
        FieldKind::Category | FieldKind::Status if raw.is_empty() => "(choose)".to_string(),
        _ => raw.to_string(),
    }
}

fn render_overlay(frame: &mut Frame, title: String, mut lines: Vec<Line<'static>>, error: Option<&str>, area: Rect) {
    lines.insert(0, Line::from(""));
    lines.push(Line::from(""));
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    }
    lines.push(Line::from(vec![
        Span::styled(" Tab/↑↓", styles::help_key_style()),
        Span::styled(" move  ", styles::muted_style()),
        Span::styled("Enter", styles::help_key_style()),
        Span::styled(" save  ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" cancel", styles::muted_style()),
    ]));

    let height = (lines.len() as u16) + 2;
    let rect = super::render::centered_rect_fixed(56, height, area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<Group> {
        vec![Group { id: 1, name: "Troop 7".into(), description: None }]
    }

    #[test]
    fn test_display_value() {
        let groups = groups();
        assert_eq!(display_value(FieldKind::Group, "1", &groups), "Troop 7");
        assert_eq!(display_value(FieldKind::Group, "0", &groups), "(choose)");
        assert_eq!(display_value(FieldKind::Status, "needs-maintenance", &groups), "Needs maintenance");
        assert_eq!(display_value(FieldKind::Status, "", &groups), "(choose)");
        assert_eq!(display_value(FieldKind::Category, "", &groups), "(choose)");
        assert_eq!(display_value(FieldKind::Text, "Tent", &groups), "Tent");
    }
}
