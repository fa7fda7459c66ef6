use super::app::App;
use nestkv::session::DialogState;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(1),    // Operations log grows
                Constraint::Length(3), // Prompt / status
                Constraint::Length(3), // Single-line input
            ]
            .as_ref(),
        )
        .split(f.area());

    // Only the last lines that fit
    let inner_height = chunks[0].height.saturating_sub(2) as usize;
    let skip_count = app.view.operations_log.len().saturating_sub(inner_height);

    let messages: Vec<ListItem> = app
        .view
        .operations_log
        .iter()
        .skip(skip_count)
        .map(|line| ListItem::new(line.as_str()))
        .collect();

    let title = format!(
        " Operations (depth {}, version {}) ",
        app.view.transaction_depth, app.view.state_version
    );
    let messages_panel = List::new(messages)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(Color::White));
    f.render_widget(messages_panel, chunks[0]);

    let status = match &app.view.dialog {
        DialogState::LastCommandConfirmation { message } => Line::from(Span::styled(
            message.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        DialogState::Hidden => Line::from(Span::styled(
            "set get delete count begin commit rollback",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(
        Paragraph::new(status).block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );

    let textarea_rect = chunks[2];
    f.render_widget(&app.textarea, textarea_rect);

    // Autocomplete Popup
    if app.popup_open && !app.suggestions.is_empty() {
        let (_, col) = app.textarea.cursor();

        let width = 20;
        let height = (app.suggestions.len() as u16 + 2).min(6);
        let popup_x = textarea_rect.x + (col as u16) + 1;
        // above the input, the screen ends right below it
        let popup_y = textarea_rect.y.saturating_sub(height);

        let area = Rect::new(
            popup_x.min(f.area().width.saturating_sub(width)),
            popup_y,
            width,
            height,
        );

        f.render_widget(Clear, area);

        let items: Vec<ListItem> = app
            .suggestions
            .iter()
            .map(|s| ListItem::new(s.as_str()))
            .collect();

        let mut state = ListState::default();
        state.select(Some(app.suggestion_index));

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Suggestions"))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol(">> ");

        f.render_stateful_widget(list, area, &mut state);
    }
}
