//! Per-screen rendering
//!
//! One draw function per screen of the flow. Primary actions render as
//! filled "buttons" that dim while the screen's submit guard is unmet,
//! mirroring a disabled button.

use super::{accent, accent_bold, border_type, dim};
use crate::app::App;
use kobolink_core::flow::{Field, OTP_LEN, Screen};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

pub(crate) fn draw_screen(frame: &mut Frame, app: &App, area: Rect) {
    match app.flow().screen() {
        Screen::Welcome => draw_welcome(frame, app, area),
        Screen::Phone => draw_phone(frame, app, area),
        Screen::Otp => draw_otp(frame, app, area),
        Screen::Profile => draw_profile(frame, app, area),
        Screen::Security => draw_security(frame, app, area),
        Screen::Dashboard => draw_dashboard(frame, app, area),
        Screen::Login => draw_login(frame, app, area),
    }
}

fn draw_welcome(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // spacer
            Constraint::Length(1), // logo
            Constraint::Length(1), // name
            Constraint::Length(1), // tagline
            Constraint::Length(1), // spacer
            Constraint::Length(4), // feature tip
            Constraint::Min(0),
            Constraint::Length(1), // get started
            Constraint::Length(1), // spacer
            Constraint::Length(1), // existing account
        ])
        .split(area);

    frame.render_widget(logo_badge(), rows[1]);
    frame.render_widget(
        Paragraph::new("KoboLink")
            .style(accent_bold())
            .alignment(Alignment::Center),
        rows[2],
    );
    frame.render_widget(
        Paragraph::new("Share money like gist!")
            .style(dim())
            .alignment(Alignment::Center),
        rows[3],
    );

    let tip = Paragraph::new(vec![
        Line::from(Span::styled(
            "Fast transfers in seconds",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Send money faster than you can say \"send am\"",
            dim(),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(panel(app));
    frame.render_widget(tip, rows[5]);

    frame.render_widget(button("Get Started (g)", true), rows[7]);
    frame.render_widget(outline_button("I already have an account (l)"), rows[9]);
}

fn draw_phone(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(2), // progress
            Constraint::Length(1), // spacer
            Constraint::Length(1), // heading
            Constraint::Length(1), // subheading
            Constraint::Length(3), // input
            Constraint::Length(3), // why panel
            Constraint::Min(0),
            Constraint::Length(1), // action
            Constraint::Length(1), // sent confirmation
        ])
        .split(area);

    header(frame, app, rows[0]);
    wizard_progress(frame, app, rows[1]);
    heading(frame, rows[3], "What's your number?");
    sub(frame, rows[4], "We'll send you a quick verification code");

    let form = app.flow().form();
    let mut spans = vec![Span::styled(
        format!("{} ", app.flow().dialing_code()),
        accent_bold(),
    )];
    if form.phone.is_empty() {
        spans.push(Span::styled("801 234 5678", dim()));
    } else {
        spans.push(Span::raw(form.phone.clone()));
        spans.push(Span::styled("_", accent()));
    }
    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(border_type(app.ascii()))
            .title("Phone Number")
            .border_style(accent()),
    );
    frame.render_widget(input, rows[5]);

    let why = Paragraph::new(
        "Why we need this: your phone number helps your friends find you easily \
         and keeps your account secure.",
    )
    .style(dim())
    .wrap(Wrap { trim: true })
    .block(panel(app));
    frame.render_widget(why, rows[6]);

    frame.render_widget(
        button("Send Verification Code", app.flow().can_submit()),
        rows[8],
    );

    if app.flow().code_sent_pending() {
        frame.render_widget(
            Paragraph::new("OTP Sent! (Simulated)")
                .style(accent_bold())
                .alignment(Alignment::Center),
            rows[9],
        );
    }
}

fn draw_otp(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(2), // progress
            Constraint::Length(1), // spacer
            Constraint::Length(1), // heading
            Constraint::Length(1), // subheading
            Constraint::Length(1), // destination
            Constraint::Length(1), // spacer
            Constraint::Length(1), // code slots
            Constraint::Length(1), // spacer
            Constraint::Length(1), // resend question
            Constraint::Length(1), // resend actions
            Constraint::Min(0),
            Constraint::Length(1), // action
        ])
        .split(area);

    header(frame, app, rows[0]);
    wizard_progress(frame, app, rows[1]);
    heading(frame, rows[3], "Check your messages!");
    sub(frame, rows[4], "Enter the 6-digit code we sent to");
    frame.render_widget(
        Paragraph::new(app.flow().destination())
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        rows[5],
    );

    frame.render_widget(
        Paragraph::new(otp_slots(app)).alignment(Alignment::Center),
        rows[7],
    );

    sub(frame, rows[9], "Didn't receive the code?");
    let resend = if app.flow().resend_ready() {
        Span::styled("Resend code (r)", accent_bold())
    } else {
        Span::styled(format!("Resend in {}s", app.flow().countdown()), dim())
    };
    let actions = Line::from(vec![
        resend,
        Span::styled("  |  ", dim()),
        Span::styled("Use WhatsApp instead (w)", accent()),
    ]);
    frame.render_widget(
        Paragraph::new(actions).alignment(Alignment::Center),
        rows[10],
    );

    frame.render_widget(button("Verify Code", app.flow().can_submit()), rows[12]);
}

fn draw_profile(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(2), // progress
            Constraint::Length(1), // heading
            Constraint::Length(1), // subheading
            Constraint::Length(1), // photo placeholder
            Constraint::Length(3), // full name
            Constraint::Length(3), // username
            Constraint::Length(1), // helper
            Constraint::Min(0),
            Constraint::Length(1), // action
        ])
        .split(area);

    header(frame, app, rows[0]);
    wizard_progress(frame, app, rows[1]);
    heading(frame, rows[2], "Let's set up your profile!");
    sub(frame, rows[3], "This helps your friends recognize you");
    sub(frame, rows[4], "( + ) Add photo (optional, Ctrl+P)");

    input_box(frame, app, rows[5], "Full Name", Field::FullName, false, "e.g., Tobi Adebayo");
    input_box(
        frame,
        app,
        rows[6],
        "Choose Username",
        Field::Username,
        false,
        "e.g., @tobi_ada",
    );
    sub(frame, rows[7], "Your friends can send money using this username");

    frame.render_widget(button("Continue", app.flow().can_submit()), rows[9]);
}

fn draw_security(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(2), // progress
            Constraint::Length(1), // heading
            Constraint::Length(1), // subheading
            Constraint::Length(3), // pin input
            Constraint::Length(1), // helper
            Constraint::Length(4), // quick login options
            Constraint::Min(0),
            Constraint::Length(1), // action
        ])
        .split(area);

    header(frame, app, rows[0]);
    wizard_progress(frame, app, rows[1]);
    heading(frame, rows[2], "Secure your wallet!");
    sub(frame, rows[3], "Choose how you want to protect your money");

    input_box(
        frame,
        app,
        rows[4],
        "Create Transaction PIN",
        Field::Pin,
        !app.show_pin(),
        "Enter 4-digit PIN",
    );
    sub(frame, rows[5], "You'll use this to confirm transfers (v shows it)");

    let options = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("(f) Fingerprint Login", accent()),
            Span::styled("  Quick and secure access", dim()),
        ]),
        Line::from(vec![
            Span::styled("(d) Face ID Login", accent()),
            Span::styled("      Look and unlock instantly", dim()),
        ]),
    ])
    .block(panel(app).title("Quick Login Options"));
    frame.render_widget(options, rows[6]);

    frame.render_widget(button("Complete Setup", app.flow().can_submit()), rows[8]);
}

fn draw_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // wallet banner
            Constraint::Length(1), // spacer
            Constraint::Length(1), // quick actions heading
            Constraint::Length(3), // quick action tiles
            Constraint::Length(3), // pro tip
            Constraint::Min(0),
            Constraint::Length(1), // action
            Constraint::Length(1), // footer
        ])
        .split(area);

    let account = app.flow().account();
    let greeting = account.map_or("User".to_string(), |a| a.first_name().to_string());
    let user_id = account.map_or("-".to_string(), |a| a.user_id.to_string());
    let balance = account.map_or("₦0.00".to_string(), |a| a.format_balance());

    let banner = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Welcome, {greeting}!"),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("User ID: {user_id}")),
        Line::from(Span::styled(
            balance,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("Fund your wallet (f)"),
    ])
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::White).bg(Color::Green));
    frame.render_widget(banner, rows[0]);

    frame.render_widget(
        Paragraph::new("Quick Actions").style(Style::default().add_modifier(Modifier::BOLD)),
        rows[2],
    );

    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[3]);
    frame.render_widget(
        Paragraph::new("Send Money (s)")
            .alignment(Alignment::Center)
            .block(panel(app)),
        tiles[0],
    );
    frame.render_widget(
        Paragraph::new("Split Bill (b)")
            .alignment(Alignment::Center)
            .block(panel(app)),
        tiles[1],
    );

    let tip = Paragraph::new(
        "Pro tip: invite friends to get a ₦100 bonus when they complete their first transfer!",
    )
    .style(dim())
    .wrap(Wrap { trim: true })
    .block(panel(app));
    frame.render_widget(tip, rows[4]);

    frame.render_widget(button("Start Using KoboLink", true), rows[6]);
    sub(frame, rows[7], "Registration complete!");
}

fn draw_login(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1), // spacer
            Constraint::Length(1), // logo
            Constraint::Length(1), // heading
            Constraint::Length(1), // subheading
            Constraint::Length(3), // identifier input
            Constraint::Length(3), // pin input
            Constraint::Length(1), // action
            Constraint::Length(1), // spacer
            Constraint::Length(1), // biometrics
            Constraint::Length(1), // forgot pin
            Constraint::Min(0),
        ])
        .split(area);

    header(frame, app, rows[0]);
    frame.render_widget(logo_badge(), rows[2]);
    heading(frame, rows[3], "Welcome back!");
    sub(frame, rows[4], "Sign in to continue sending money to your squad");

    input_box(
        frame,
        app,
        rows[5],
        "Phone Number or Username",
        Field::LoginIdentifier,
        false,
        "Enter phone number or @username",
    );
    input_box(
        frame,
        app,
        rows[6],
        "PIN",
        Field::LoginPin,
        true,
        "Enter your 4-digit PIN",
    );

    frame.render_widget(button("Sign In", true), rows[7]);
    sub(frame, rows[9], "(Ctrl+F) Fingerprint   (Ctrl+D) Face ID");
    frame.render_widget(
        Paragraph::new("Forgot PIN? (Ctrl+P)")
            .style(accent())
            .alignment(Alignment::Center),
        rows[10],
    );
}

// ----------------------------------------------------------------------
// Shared pieces
// ----------------------------------------------------------------------

fn header(frame: &mut Frame, app: &App, area: Rect) {
    let screen = app.flow().screen();
    if screen.back_target().is_some() {
        frame.render_widget(Paragraph::new("< Esc").style(dim()), area);
    }
    frame.render_widget(
        Paragraph::new(screen.title())
            .style(accent_bold())
            .alignment(Alignment::Center),
        area,
    );
}

/// Progress dots plus gauge for the four onboarding steps
fn wizard_progress(frame: &mut Frame, app: &App, area: Rect) {
    let Some(progress) = app.flow().screen().step() else {
        return;
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let (filled, empty) = if app.ascii() { ("*", "o") } else { ("●", "○") };
    let mut spans = Vec::new();
    for i in 1..=progress.total {
        let (glyph, style) = if i <= progress.step {
            (filled, accent())
        } else {
            (empty, dim())
        };
        spans.push(Span::styled(glyph, style));
        if i < progress.total {
            spans.push(Span::raw(" "));
        }
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        rows[0],
    );

    let gauge = Gauge::default()
        .gauge_style(accent())
        .percent(progress.percent());
    frame.render_widget(gauge, rows[1]);
}

fn heading(frame: &mut Frame, area: Rect, text: &str) {
    frame.render_widget(
        Paragraph::new(text.to_string())
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        area,
    );
}

fn sub(frame: &mut Frame, area: Rect, text: &str) {
    frame.render_widget(
        Paragraph::new(text.to_string())
            .style(dim())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn logo_badge() -> Paragraph<'static> {
    Paragraph::new(Span::styled(
        "  K  ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
}

fn panel(app: &App) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(border_type(app.ascii()))
        .border_style(dim())
}

fn button(label: &str, enabled: bool) -> Paragraph<'static> {
    let style = if enabled {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Paragraph::new(Line::from(Span::styled(format!("  {label}  "), style)))
        .alignment(Alignment::Center)
}

fn outline_button(label: &str) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(format!("[ {label} ]"), accent())))
        .alignment(Alignment::Center)
}

/// One bracketed cell per code slot, active slot highlighted
fn otp_slots(app: &App) -> Line<'static> {
    let otp = &app.flow().form().otp;
    let mut spans = Vec::new();
    for (i, slot) in otp.slots().iter().enumerate() {
        let ch = slot.unwrap_or('_');
        let style = if i == otp.cursor() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else if slot.is_some() {
            accent_bold()
        } else {
            dim()
        };
        spans.push(Span::styled(format!("[{ch}]"), style));
        if i < OTP_LEN - 1 {
            spans.push(Span::raw(" "));
        }
    }
    Line::from(spans)
}

fn input_box(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    field: Field,
    masked: bool,
    placeholder: &str,
) {
    let focused = app.focused_field() == Some(field);
    let value = app.flow().form().value(field);
    let mask = if app.ascii() { '*' } else { '•' };
    let shown: String = if masked {
        std::iter::repeat(mask).take(value.chars().count()).collect()
    } else {
        value.to_string()
    };

    let mut spans: Vec<Span> = Vec::new();
    if shown.is_empty() {
        spans.push(Span::styled(placeholder.to_string(), dim()));
    } else {
        spans.push(Span::raw(shown));
    }
    if focused {
        spans.push(Span::styled("_", accent_bold()));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type(app.ascii()))
        .title(title.to_string())
        .border_style(if focused { accent() } else { dim() });
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
