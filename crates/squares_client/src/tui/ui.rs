//! Stateless UI rendering.

use super::app::App;
use crate::repl::outcome_line;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use squares_board::{BoardState, Cell, Position};

/// Draws the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(5),    // Board
            Constraint::Length(3), // Status
            Constraint::Length(1), // Keys
        ])
        .split(frame.area());

    let title = Paragraph::new(format!("Squares - next game {0}x{0}", app.next_size()))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    match app.board() {
        Some(board) => draw_board(frame, chunks[1], board, app.cursor()),
        None => frame.render_widget(
            Paragraph::new("No game yet. Press 'n' to start.").alignment(Alignment::Center),
            chunks[1],
        ),
    }

    let status = Paragraph::new(app.status())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);

    let keys = Paragraph::new(
        "arrows move | enter place | n new | +/- size | r retry | q quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    frame.render_widget(keys, chunks[3]);

    if let Some(outcome) = app.game_over() {
        draw_game_over(frame, &outcome_line(outcome));
    }
}

fn draw_board(frame: &mut Frame, area: Rect, board: &BoardState, cursor: Position) {
    let lines: Vec<Line> = board
        .rows()
        .enumerate()
        .map(|(row, cells)| {
            let spans: Vec<Span> = cells
                .iter()
                .enumerate()
                .map(|(col, cell)| cell_span(*cell, Position::new(row, col) == cursor))
                .collect();
            Line::from(spans)
        })
        .collect();

    let width = (board.size() * 3) as u16 + 2;
    let height = board.size() as u16 + 2;
    let grid = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(grid, center_rect(area, width, height));
}

fn cell_span(cell: Cell, selected: bool) -> Span<'static> {
    let (text, mut style) = match cell {
        Cell::Empty => (" · ".to_string(), Style::default().fg(Color::DarkGray)),
        Cell::Occupied(color) => (
            format!(" {} ", color.symbol()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    };
    if selected {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Span::styled(text, style)
}

fn draw_game_over(frame: &mut Frame, text: &str) {
    let area = center_rect(frame.area(), 40, 5);
    let popup = Paragraph::new(vec![
        Line::from(text.to_string()),
        Line::from("enter: close | n: new game"),
    ])
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    .block(Block::default().title("Game over").borders(Borders::ALL));
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(horizontal[1])[1]
}
