//! Rendering for the KoboLink TUI
//!
//! Draws the simulated phone-device frame (status bar, screen content, key
//! hints) centered in the terminal, with the debug control panel below it.

mod screens;

use crate::app::App;
use kobolink_core::flow::Screen;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

/// Inner width of the simulated device frame
const DEVICE_WIDTH: u16 = 46;

pub(crate) fn accent() -> Style {
    Style::default().fg(Color::Green)
}

pub(crate) fn accent_bold() -> Style {
    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
}

pub(crate) fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub(crate) fn border_type(ascii: bool) -> BorderType {
    if ascii {
        BorderType::Plain
    } else {
        BorderType::Rounded
    }
}

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    if area.width < 40 || area.height < 16 {
        let notice = Paragraph::new("Terminal too small (need at least 40x16)")
            .alignment(Alignment::Center);
        frame.render_widget(notice, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Device frame
            Constraint::Length(6), // Testing controls
        ])
        .split(area);

    draw_device(frame, app, chunks[0]);
    draw_debug_panel(frame, app, chunks[1]);
}

fn draw_device(frame: &mut Frame, app: &App, area: Rect) {
    let device = centered(area, DEVICE_WIDTH);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type(app.ascii()))
        .title(" KoboLink ")
        .title_alignment(Alignment::Center)
        .border_style(accent());
    let inner = block.inner(device);
    frame.render_widget(block, device);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(8),    // Screen content
            Constraint::Length(1), // Key hints
        ])
        .split(inner);

    draw_status_bar(frame, app, rows[0]);
    screens::draw_screen(frame, app, rows[1]);
    draw_hints(frame, app, rows[2]);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let clock = Paragraph::new("9:41").style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(clock, area);

    let signal = if app.ascii() { ".oO 100%" } else { "▂▄▆ 100%" };
    let right = Paragraph::new(signal)
        .alignment(Alignment::Right)
        .style(dim());
    frame.render_widget(right, area);
}

fn draw_hints(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.flow().screen() {
        Screen::Welcome => "Enter/g start · l sign in · q quit",
        Screen::Phone => "type number · Enter send · Esc back",
        Screen::Otp => "digits · r resend · w WhatsApp · Enter verify",
        Screen::Profile => "Tab field · Ctrl+P photo · Enter continue",
        Screen::Security => "digits · v show · f/d quick login · Enter done",
        Screen::Dashboard => "s send · b split · f fund · Enter start · q quit",
        Screen::Login => "Tab field · Ctrl+F/D biometrics · Enter sign in",
    };
    let line = Paragraph::new(hints).alignment(Alignment::Center).style(dim());
    frame.render_widget(line, area);
}

fn draw_debug_panel(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type(app.ascii()))
        .title("Testing Controls");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let mut spans = Vec::new();
    for (i, screen) in Screen::ALL.iter().enumerate() {
        let style = if *screen == app.flow().screen() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            dim()
        };
        spans.push(Span::styled(format!(" F{} {} ", i + 1, screen.as_str()), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), rows[0]);

    let mut lines: Vec<Line> = Vec::new();
    if let Some(code) = app.flow().last_code() {
        lines.push(Line::from(Span::styled(
            format!("last dispatched code: {code}"),
            accent(),
        )));
    }
    let remaining = (rows[1].height as usize).saturating_sub(lines.len());
    lines.extend(
        app.flow()
            .activity()
            .iter()
            .rev()
            .take(remaining)
            .map(|entry| {
                Line::from(format!(
                    "{} {}",
                    entry.at.format("%H:%M:%S"),
                    entry.message
                ))
            }),
    );
    frame.render_widget(Paragraph::new(lines).style(dim()), rows[1]);
}

/// Center a fixed-width rect horizontally within `area`
fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: area.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kobolink_core::config::Config;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(app: &App, width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
    }

    #[test]
    fn test_every_screen_renders() {
        for screen in Screen::ALL {
            let app = App::new(&Config::default(), Some(screen));
            render(&app, 80, 30);
        }
    }

    #[test]
    fn test_every_screen_renders_in_ascii_mode() {
        let mut config = Config::default();
        config.ui.ascii = true;
        for screen in Screen::ALL {
            let app = App::new(&config, Some(screen));
            render(&app, 80, 30);
        }
    }

    #[test]
    fn test_tiny_terminal_shows_notice_without_panicking() {
        let app = App::new(&Config::default(), None);
        render(&app, 20, 5);
    }

    #[test]
    fn test_narrow_and_short_terminals_do_not_panic() {
        let app = App::new(&Config::default(), Some(Screen::Dashboard));
        render(&app, 42, 17);
        render(&app, 200, 60);
    }

    #[test]
    fn test_centered_clamps_to_area() {
        let area = Rect::new(0, 0, 30, 10);
        let rect = centered(area, 46);
        assert_eq!(rect.width, 30);
        assert_eq!(rect.x, 0);

        let rect = centered(Rect::new(0, 0, 100, 10), 46);
        assert_eq!(rect.width, 46);
        assert_eq!(rect.x, 27);
    }
}
