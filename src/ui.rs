use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::session::{SessionPhase, SessionSnapshot, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;

/// Maps a logical canvas point onto a terminal rect.
pub fn scale_to_area(x: f64, y: f64, area: Rect) -> Option<(u16, u16)> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    let col = (x / CANVAS_WIDTH * area.width as f64) as i64;
    let row = (y / CANVAS_HEIGHT * area.height as f64) as i64;
    if col < 0 || row < 0 || col >= area.width as i64 || row >= area.height as i64 {
        return None;
    }
    Some((area.x + col as u16, area.y + row as u16))
}

fn put(buf: &mut Buffer, pos: Option<(u16, u16)>, symbol: &str, style: Style) {
    if let Some((x, y)) = pos {
        if let Some(cell) = buf.cell_mut((x, y)) {
            cell.set_symbol(symbol);
            cell.set_style(style);
        }
    }
}

fn render_battlefield(snapshot: &SessionSnapshot, area: Rect, buf: &mut Buffer) {
    let player_style = if snapshot.player_flash {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    };
    let boss_style = match snapshot.phase {
        SessionPhase::Victory => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        _ if snapshot.boss_flash => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };

    put(
        buf,
        scale_to_area(snapshot.player_pos.x, snapshot.player_pos.y, area),
        "■",
        player_style,
    );
    put(
        buf,
        scale_to_area(snapshot.boss_pos.x, snapshot.boss_pos.y, area),
        "◆",
        boss_style,
    );
    for p in &snapshot.projectiles {
        put(
            buf,
            scale_to_area(p.x, p.y, area),
            "●",
            Style::default().fg(Color::LightBlue),
        );
    }
}

fn status_line(snapshot: &SessionSnapshot) -> Line<'static> {
    let msg = match snapshot.phase {
        SessionPhase::Victory => Span::styled(
            format!("Victory! Cleared in {:.2}s", snapshot.elapsed_secs),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        SessionPhase::Defeat => Span::styled(
            format!("Defeat... survived {:.2}s", snapshot.elapsed_secs),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        _ => match snapshot.last_wrong {
            Some((typed, expected)) => Span::styled(
                format!("Wrong! typed '{typed}' / expected '{expected}'"),
                Style::default().fg(Color::Red),
            ),
            None => Span::styled(
                "Type each character exactly to fire at the boss".to_string(),
                Style::default().add_modifier(Modifier::DIM),
            ),
        },
    };
    Line::from(msg)
}

fn hp_line(snapshot: &SessionSnapshot) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!(
            "Boss {}/{} ({:.1}%)",
            snapshot.remaining_hits, snapshot.total_chars, snapshot.boss_health
        ),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )];
    if let Some(hp) = snapshot.player_health {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("You {hp}/100"),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::raw("   "));
    spans.push(Span::raw(format!("{:.2}s", snapshot.elapsed_secs)));
    Line::from(spans)
}

fn stats_line(snapshot: &SessionSnapshot) -> Line<'static> {
    // Speed is clamped for display only; the engine value is unbounded.
    let cpm = snapshot.chars_per_min.clamp(0.0, 800.0);
    Line::from(Span::styled(
        format!(
            "acc {:.1}%   err {:.1}%   {:.0} cpm",
            snapshot.accuracy, snapshot.error_rate, cpm
        ),
        Style::default().add_modifier(Modifier::ITALIC),
    ))
}

fn prompt_lines(snapshot: &SessionSnapshot) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let green_bold = bold.fg(Color::Green);
    let dim_bold = bold.add_modifier(Modifier::DIM);
    let cursor = dim_bold
        .fg(Color::Yellow)
        .add_modifier(Modifier::UNDERLINED);

    let Some(line) = &snapshot.line else {
        return Vec::new();
    };

    let chars: Vec<char> = line.text.chars().collect();
    let mut spans = Vec::with_capacity(3);
    if line.column > 0 {
        spans.push(Span::styled(
            chars[..line.column].iter().collect::<String>(),
            green_bold,
        ));
    }
    spans.push(Span::styled(chars[line.column].to_string(), cursor));
    if line.column + 1 < chars.len() {
        spans.push(Span::styled(
            chars[line.column + 1..].iter().collect::<String>(),
            dim_bold,
        ));
    }
    // Brief carriage marker while the line-bridge effect plays out.
    if snapshot.transition.is_some() {
        spans.push(Span::styled(" ↵".to_string(), green_bold));
    }

    vec![Line::from(spans)]
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.session.snapshot();

        let prompt_width = snapshot
            .line
            .as_ref()
            .map(|l| l.text.width())
            .unwrap_or(0);
        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let prompt_occupied_lines =
            ((prompt_width as f64 / max_chars_per_line as f64).ceil() as u16).max(1);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints(
                [
                    Constraint::Min(6),
                    Constraint::Length(1),
                    Constraint::Length(1),
                    Constraint::Length(1),
                    Constraint::Length(prompt_occupied_lines),
                    Constraint::Length(1),
                ]
                .as_ref(),
            )
            .split(area);

        render_battlefield(&snapshot, chunks[0], buf);

        Paragraph::new(hp_line(&snapshot))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        Paragraph::new(status_line(&snapshot))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        if snapshot.phase.is_terminal() {
            let hint = Paragraph::new(Span::styled(
                format!("[{}] (tab) restart / (esc) quit", snapshot.phase),
                Style::default().add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center);
            hint.render(chunks[4], buf);
        } else {
            Paragraph::new(prompt_lines(&snapshot))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: false })
                .render(chunks[4], buf);
        }

        Paragraph::new(stats_line(&snapshot))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
    }
}
