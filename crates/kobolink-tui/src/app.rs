//! Application state and input routing
//!
//! `App` wraps the core flow controller with the view-only state the
//! terminal needs: which field owns keystrokes, whether the PIN is
//! visible, and the quit flag. Key events are routed per screen; mnemonic
//! letter keys are only used on screens whose inputs accept digits alone,
//! so they can never be swallowed by a text field.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kobolink_core::config::Config;
use kobolink_core::flow::{Field, FlowController, Screen};
use kobolink_core::sim::{Action, EventReceiver, SimulatedBackend};
use std::time::{Duration, Instant};
use tracing::debug;

/// Which text field on the current screen owns keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Primary,
    Secondary,
}

pub struct App {
    flow: FlowController,
    backend: SimulatedBackend,
    events: EventReceiver,
    focus: Focus,
    show_pin: bool,
    ascii: bool,
    tick_rate: Duration,
    last_countdown_tick: Instant,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config, start_screen: Option<Screen>) -> Self {
        let (backend, events) =
            SimulatedBackend::new(Duration::from_millis(config.flow.otp_send_delay_ms));
        let mut flow = FlowController::new(&config.flow);
        if let Some(screen) = start_screen {
            flow.jump_to(screen);
        }
        Self {
            flow,
            backend,
            events,
            focus: Focus::default(),
            show_pin: false,
            ascii: config.ui.ascii,
            tick_rate: Duration::from_millis(config.ui.tick_rate_ms),
            last_countdown_tick: Instant::now(),
            should_quit: false,
        }
    }

    pub fn flow(&self) -> &FlowController {
        &self.flow
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn show_pin(&self) -> bool {
        self.show_pin
    }

    pub fn ascii(&self) -> bool {
        self.ascii
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The field currently receiving typed characters, if any
    pub fn focused_field(&self) -> Option<Field> {
        match self.flow.screen() {
            Screen::Phone => Some(Field::Phone),
            Screen::Security => Some(Field::Pin),
            Screen::Profile => Some(match self.focus {
                Focus::Primary => Field::FullName,
                Focus::Secondary => Field::Username,
            }),
            Screen::Login => Some(match self.focus {
                Focus::Primary => Field::LoginIdentifier,
                Focus::Secondary => Field::LoginPin,
            }),
            Screen::Welcome | Screen::Otp | Screen::Dashboard => None,
        }
    }

    /// Drain backend events and fire the once-per-second countdown tick
    pub fn on_tick(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.flow.apply(event);
        }
        if self.last_countdown_tick.elapsed() >= Duration::from_secs(1) {
            self.last_countdown_tick = Instant::now();
            self.flow.tick_second();
        }
    }

    /// Bracketed paste lands on the verification slots only
    pub fn on_paste(&mut self, text: &str) {
        if self.flow.screen() == Screen::Otp {
            self.flow.paste_otp(text);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        let screen_before = self.flow.screen();

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            self.on_control_key(key);
        } else {
            match key.code {
                KeyCode::F(n @ 1..=7) => {
                    self.flow.jump_to(Screen::ALL[n as usize - 1]);
                }
                KeyCode::Esc => self.on_escape(),
                KeyCode::Enter => self.primary_action(),
                KeyCode::Tab => self.toggle_focus(),
                KeyCode::Backspace => self.on_backspace(),
                _ => match self.flow.screen() {
                    Screen::Welcome => self.on_welcome_key(key),
                    Screen::Phone => self.on_phone_key(key),
                    Screen::Otp => self.on_otp_key(key),
                    Screen::Security => self.on_security_key(key),
                    Screen::Dashboard => self.on_dashboard_key(key),
                    Screen::Profile | Screen::Login => self.on_text_key(key),
                },
            }
        }

        if self.flow.screen() != screen_before {
            self.focus = Focus::Primary;
        }
    }

    fn on_control_key(&mut self, key: KeyEvent) {
        match (self.flow.screen(), key.code) {
            // Global chords
            (_, KeyCode::Char('q')) => self.should_quit = true,
            (_, KeyCode::Char('s')) => self.dump_snapshot(),
            // Screen-local chords, kept off plain letters because these
            // screens have free-text fields
            (Screen::Login, KeyCode::Char('f')) => self.flow.simulate(Action::FingerprintLogin),
            (Screen::Login, KeyCode::Char('d')) => self.flow.simulate(Action::FaceIdLogin),
            (Screen::Login, KeyCode::Char('p')) => self.flow.simulate(Action::ForgotPin),
            (Screen::Profile, KeyCode::Char('p')) => self.flow.simulate(Action::AddProfilePhoto),
            _ => {}
        }
    }

    fn on_escape(&mut self) {
        if self.flow.screen() == Screen::Welcome {
            self.should_quit = true;
        } else {
            self.flow.go_back();
        }
    }

    fn on_backspace(&mut self) {
        if self.flow.screen() == Screen::Otp {
            self.flow.otp_backspace();
        } else if let Some(field) = self.focused_field() {
            self.flow.delete(field);
        }
    }

    fn toggle_focus(&mut self) {
        if matches!(self.flow.screen(), Screen::Profile | Screen::Login) {
            self.focus = match self.focus {
                Focus::Primary => Focus::Secondary,
                Focus::Secondary => Focus::Primary,
            };
        }
    }

    /// The current screen's primary action; guards make blocked submits a
    /// quiet no-op, mirroring a disabled button.
    fn primary_action(&mut self) {
        match self.flow.screen() {
            Screen::Welcome => self.flow.start_onboarding(),
            Screen::Phone => {
                if let Err(err) = self.flow.submit_phone(&self.backend) {
                    debug!(%err, "send code blocked");
                }
            }
            Screen::Otp => {
                if let Err(err) = self.flow.verify_otp() {
                    debug!(%err, "verify blocked");
                }
            }
            Screen::Profile => {
                if let Err(err) = self.flow.submit_profile() {
                    debug!(%err, "continue blocked");
                }
            }
            Screen::Security => {
                if let Err(err) = self.flow.complete_security() {
                    debug!(%err, "complete setup blocked");
                }
            }
            Screen::Dashboard => self.flow.simulate(Action::StartUsing),
            Screen::Login => self.flow.simulate(Action::SignIn),
        }
    }

    fn on_welcome_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('g') | KeyCode::Char('G') => self.flow.start_onboarding(),
            KeyCode::Char('l') | KeyCode::Char('L') => self.flow.open_login(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn on_phone_key(&mut self, key: KeyEvent) {
        if let KeyCode::Char(ch) = key.code {
            // The field filter rejects everything but digits and spaces
            self.flow.input(Field::Phone, ch);
        }
    }

    fn on_otp_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(ch) if ch.is_ascii_digit() => self.flow.otp_enter(ch),
            KeyCode::Char('r') => {
                if let Err(err) = self.flow.resend_otp(&self.backend) {
                    debug!(%err, "resend blocked");
                }
            }
            KeyCode::Char('w') => self.flow.simulate(Action::WhatsAppCode),
            _ => {}
        }
    }

    fn on_security_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(ch) if ch.is_ascii_digit() => self.flow.input(Field::Pin, ch),
            KeyCode::Char('v') => self.show_pin = !self.show_pin,
            KeyCode::Char('f') => self.flow.simulate(Action::FingerprintToggle),
            KeyCode::Char('d') => self.flow.simulate(Action::FaceIdToggle),
            _ => {}
        }
    }

    fn on_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('s') => self.flow.simulate(Action::SendMoney),
            KeyCode::Char('b') => self.flow.simulate(Action::SplitBill),
            KeyCode::Char('f') => self.flow.simulate(Action::FundWallet),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn on_text_key(&mut self, key: KeyEvent) {
        if let (Some(field), KeyCode::Char(ch)) = (self.focused_field(), key.code) {
            self.flow.input(field, ch);
        }
    }

    fn dump_snapshot(&self) {
        match serde_json::to_string(&self.flow.snapshot()) {
            Ok(json) => debug!(snapshot = %json, "state snapshot"),
            Err(err) => debug!(%err, "snapshot serialization failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(&Config::default(), None)
    }

    fn app_on(screen: Screen) -> App {
        App::new(&Config::default(), Some(screen))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_welcome_branches() {
        {
            let mut app = app();
            app.on_key(key(KeyCode::Char('g')));
            assert_eq!(app.flow().screen(), Screen::Phone);
        }
        {
            let mut app = app();
            app.on_key(key(KeyCode::Char('l')));
            assert_eq!(app.flow().screen(), Screen::Login);
        }
        {
            let mut app = app();
            app.on_key(key(KeyCode::Char('q')));
            assert!(app.should_quit());
        }
    }

    #[test]
    fn test_function_keys_jump_to_every_screen() {
        let mut app = app();
        for (i, screen) in Screen::ALL.iter().enumerate() {
            app.on_key(key(KeyCode::F(i as u8 + 1)));
            assert_eq!(app.flow().screen(), *screen);
        }
    }

    #[test]
    fn test_ctrl_q_quits_from_any_screen() {
        let mut app = app_on(Screen::Profile);
        app.on_key(ctrl('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_escape_walks_back_and_quits_from_welcome() {
        let mut app = app_on(Screen::Security);
        app.on_key(key(KeyCode::Esc));
        assert_eq!(app.flow().screen(), Screen::Profile);
        app.on_key(key(KeyCode::Esc));
        app.on_key(key(KeyCode::Esc));
        app.on_key(key(KeyCode::Esc));
        assert_eq!(app.flow().screen(), Screen::Welcome);
        assert!(!app.should_quit());

        app.on_key(key(KeyCode::Esc));
        assert!(app.should_quit());
    }

    #[test]
    fn test_phone_typing_filters_input() {
        let mut app = app_on(Screen::Phone);
        for ch in "801 234x5678".chars() {
            app.on_key(key(KeyCode::Char(ch)));
        }
        assert_eq!(app.flow().form().phone, "801 2345678");

        app.on_key(key(KeyCode::Backspace));
        assert_eq!(app.flow().form().phone, "801 234567");
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_on_phone_dispatches_and_event_advances_screen() {
        let mut app = app_on(Screen::Phone);
        for ch in "8012345678".chars() {
            app.on_key(key(KeyCode::Char(ch)));
        }
        app.on_key(key(KeyCode::Enter));
        assert!(app.flow().code_sent_pending());
        assert_eq!(app.flow().screen(), Screen::Phone);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        app.on_tick();
        assert_eq!(app.flow().screen(), Screen::Otp);
        assert!(!app.flow().code_sent_pending());
    }

    #[test]
    fn test_enter_on_phone_is_noop_while_invalid() {
        // Guard fails before any dispatch, so no runtime is needed
        let mut app = app_on(Screen::Phone);
        app.on_key(key(KeyCode::Char('8')));
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.flow().screen(), Screen::Phone);
        assert!(!app.flow().code_sent_pending());
    }

    #[test]
    fn test_otp_keys_fill_slots_and_verify() {
        let mut app = app_on(Screen::Otp);
        for ch in "123456".chars() {
            app.on_key(key(KeyCode::Char(ch)));
        }
        assert!(app.flow().form().otp.is_complete());

        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.flow().screen(), Screen::Profile);
    }

    #[test]
    fn test_otp_backspace_reverse_focuses() {
        let mut app = app_on(Screen::Otp);
        app.on_key(key(KeyCode::Char('1')));
        app.on_key(key(KeyCode::Char('2')));
        app.on_key(key(KeyCode::Backspace));
        app.on_key(key(KeyCode::Backspace));
        assert_eq!(app.flow().form().otp.filled(), 0);
    }

    #[test]
    fn test_paste_routes_to_otp_screen_only() {
        let mut app = app_on(Screen::Phone);
        app.on_paste("123456");
        assert_eq!(app.flow().form().otp.filled(), 0);

        let mut app = app_on(Screen::Otp);
        app.on_paste("123456");
        assert!(app.flow().form().otp.is_complete());
    }

    #[test]
    fn test_profile_tab_switches_fields() {
        let mut app = app_on(Screen::Profile);
        for ch in "Tobi".chars() {
            app.on_key(key(KeyCode::Char(ch)));
        }
        app.on_key(key(KeyCode::Tab));
        assert_eq!(app.focused_field(), Some(Field::Username));
        for ch in "tobi_ada".chars() {
            app.on_key(key(KeyCode::Char(ch)));
        }

        assert_eq!(app.flow().form().full_name, "Tobi");
        assert_eq!(app.flow().form().username, "tobi_ada");

        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.flow().screen(), Screen::Security);
        // Focus resets when the screen changes
        assert_eq!(app.focus(), Focus::Primary);
    }

    #[test]
    fn test_security_pin_entry_and_visibility_toggle() {
        let mut app = app_on(Screen::Security);
        assert!(!app.show_pin());
        app.on_key(key(KeyCode::Char('v')));
        assert!(app.show_pin());

        for ch in "12345".chars() {
            app.on_key(key(KeyCode::Char(ch)));
        }
        // PIN caps at four digits
        assert_eq!(app.flow().form().pin, "1234");
    }

    #[test]
    fn test_security_complete_requires_profile_for_account_name() {
        let mut app = app_on(Screen::Security);
        for ch in "1234".chars() {
            app.on_key(key(KeyCode::Char(ch)));
        }
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.flow().screen(), Screen::Dashboard);
        // Jumped straight here, so the greeting falls back
        assert_eq!(app.flow().account().unwrap().first_name(), "User");
    }

    #[test]
    fn test_login_chords_log_without_transition() {
        let mut app = app_on(Screen::Login);
        app.on_key(ctrl('f'));
        app.on_key(ctrl('d'));
        app.on_key(ctrl('p'));
        app.on_key(key(KeyCode::Enter));

        assert_eq!(app.flow().screen(), Screen::Login);
        assert_eq!(app.flow().activity().len(), 4);
    }

    #[test]
    fn test_login_typing_goes_to_focused_field() {
        let mut app = app_on(Screen::Login);
        for ch in "tobi".chars() {
            app.on_key(key(KeyCode::Char(ch)));
        }
        app.on_key(key(KeyCode::Tab));
        for ch in "12ab34".chars() {
            app.on_key(key(KeyCode::Char(ch)));
        }

        assert_eq!(app.flow().form().login_identifier, "tobi");
        // Login PIN filters to digits and caps at four
        assert_eq!(app.flow().form().login_pin, "1234");
    }

    #[test]
    fn test_dashboard_quick_actions() {
        let mut app = app_on(Screen::Dashboard);
        app.on_key(key(KeyCode::Char('s')));
        app.on_key(key(KeyCode::Char('b')));
        app.on_key(key(KeyCode::Char('f')));
        app.on_key(key(KeyCode::Enter));

        assert_eq!(app.flow().screen(), Screen::Dashboard);
        let messages: Vec<_> = app
            .flow()
            .activity()
            .iter()
            .map(|entry| entry.message.as_str())
            .collect();
        assert!(messages.contains(&"Simulating action: Send Money"));
        assert!(messages.contains(&"Simulating action: Split Bill"));
        assert!(messages.contains(&"Simulating action: Fund Wallet"));
        assert!(messages.contains(&"Simulating action: Start Using KoboLink"));
    }
}
