//! Screen flow state machine
//!
//! This module drives the single-screen-flow prototype:
//! - `Screen` - the fixed set of named screens
//! - `FlowController` - current screen, form state, countdown, and the
//!   transitions between screens
//! - per-screen submit guards mirroring the disabled-button checks
//!
//! Transitions are either immediate (verify, profile, security) or applied
//! when a delayed [`BackendEvent`] from the simulated backend arrives
//! (code dispatch).

pub mod form;
pub mod timer;

pub use form::{Field, FormData, OTP_LEN, OtpInput, PHONE_MIN_DIGITS, PIN_LEN};
pub use timer::ResendTimer;

use crate::account::Account;
use crate::config::FlowConfig;
use crate::error::{Error, Result};
use crate::sim::{Action, BackendEvent, OtpCode, SimulatedBackend};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// The fixed, enumerated set of screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Welcome,
    Phone,
    Otp,
    Profile,
    Security,
    Dashboard,
    Login,
}

impl Screen {
    /// Every screen, in debug-switcher order
    pub const ALL: [Screen; 7] = [
        Screen::Welcome,
        Screen::Phone,
        Screen::Otp,
        Screen::Profile,
        Screen::Security,
        Screen::Dashboard,
        Screen::Login,
    ];

    /// Stable identifier used by the debug switcher and `--screen`
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Welcome => "welcome",
            Screen::Phone => "phone",
            Screen::Otp => "otp",
            Screen::Profile => "profile",
            Screen::Security => "security",
            Screen::Dashboard => "dashboard",
            Screen::Login => "login",
        }
    }

    /// Header title shown at the top of the device frame
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Welcome => "KoboLink",
            Screen::Phone => "Phone Number",
            Screen::Otp => "Verification",
            Screen::Profile => "Profile Setup",
            Screen::Security => "Security Setup",
            Screen::Dashboard => "Dashboard",
            Screen::Login => "Welcome Back",
        }
    }

    /// Position within the onboarding wizard, where applicable
    pub fn step(&self) -> Option<Progress> {
        let step = match self {
            Screen::Phone => 1,
            Screen::Otp => 2,
            Screen::Profile => 3,
            Screen::Security => 4,
            _ => return None,
        };
        Some(Progress { step, total: 4 })
    }

    /// Where the back action leads from this screen
    pub fn back_target(&self) -> Option<Screen> {
        match self {
            Screen::Phone => Some(Screen::Welcome),
            Screen::Otp => Some(Screen::Phone),
            Screen::Profile => Some(Screen::Otp),
            Screen::Security => Some(Screen::Profile),
            Screen::Login => Some(Screen::Welcome),
            Screen::Welcome | Screen::Dashboard => None,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Screen {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "welcome" => Ok(Screen::Welcome),
            "phone" => Ok(Screen::Phone),
            "otp" => Ok(Screen::Otp),
            "profile" => Ok(Screen::Profile),
            "security" => Ok(Screen::Security),
            "dashboard" => Ok(Screen::Dashboard),
            "login" => Ok(Screen::Login),
            other => Err(Error::UnknownScreen(other.to_string())),
        }
    }
}

/// Onboarding wizard progress (1-based step out of a fixed total)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub step: usize,
    pub total: usize,
}

impl Progress {
    /// Completion percentage for the progress gauge
    pub fn percent(&self) -> u16 {
        (self.step * 100 / self.total) as u16
    }
}

/// One line of the session activity log (the console-output analog)
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

/// Serializable view of the whole flow state, for debug logging.
///
/// The PIN is reduced to a set/unset flag.
#[derive(Debug, Clone, Serialize)]
pub struct FlowSnapshot {
    pub screen: Screen,
    pub phone: String,
    pub otp_filled: usize,
    pub full_name: String,
    pub username: String,
    pub pin_set: bool,
    pub countdown_secs: u32,
    pub code_sent_pending: bool,
    pub account_ready: bool,
}

/// Owns the current screen, the form, the resend countdown, and the session
/// activity log, and applies every transition of the flow.
#[derive(Debug)]
pub struct FlowController {
    screen: Screen,
    form: FormData,
    timer: ResendTimer,
    dialing_code: String,
    code_sent_pending: bool,
    last_code: Option<OtpCode>,
    activity: Vec<ActivityEntry>,
    account: Option<Account>,
}

impl FlowController {
    /// Start a fresh session on the welcome screen
    pub fn new(config: &FlowConfig) -> Self {
        Self {
            screen: Screen::Welcome,
            form: FormData::default(),
            timer: ResendTimer::new(config.otp_resend_secs),
            dialing_code: config.dialing_code.clone(),
            code_sent_pending: false,
            last_code: None,
            activity: Vec::new(),
            account: None,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    /// Seconds left on the resend countdown
    pub fn countdown(&self) -> u32 {
        self.timer.remaining()
    }

    /// True once the countdown allows resending
    pub fn resend_ready(&self) -> bool {
        self.timer.is_expired()
    }

    /// True while the "code sent" confirmation is showing and the delayed
    /// dispatch has not landed yet
    pub fn code_sent_pending(&self) -> bool {
        self.code_sent_pending
    }

    /// The most recently dispatched code, once one has arrived
    pub fn last_code(&self) -> Option<&OtpCode> {
        self.last_code.as_ref()
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn activity(&self) -> &[ActivityEntry] {
        &self.activity
    }

    pub fn dialing_code(&self) -> &str {
        &self.dialing_code
    }

    /// Full destination number, dialing code included
    pub fn destination(&self) -> String {
        format!("{} {}", self.dialing_code, self.form.phone.trim())
    }

    // ------------------------------------------------------------------
    // Form input
    // ------------------------------------------------------------------

    /// Type one character into a text field
    pub fn input(&mut self, field: Field, ch: char) {
        self.form.insert(field, ch);
    }

    /// Delete the last character of a text field
    pub fn delete(&mut self, field: Field) {
        self.form.delete(field);
    }

    /// Type one digit into the active code slot
    pub fn otp_enter(&mut self, ch: char) {
        self.form.otp.enter(ch);
    }

    /// Backspace within the code slots
    pub fn otp_backspace(&mut self) {
        self.form.otp.backspace();
    }

    /// Paste a six-digit code into the slots. Returns whether it was
    /// accepted.
    pub fn paste_otp(&mut self, text: &str) -> bool {
        let accepted = self.form.otp.paste(text);
        if accepted {
            self.log("OTP pasted.");
        }
        accepted
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Welcome → Phone
    pub fn start_onboarding(&mut self) {
        self.screen = Screen::Phone;
    }

    /// Welcome → Login
    pub fn open_login(&mut self) {
        self.screen = Screen::Login;
    }

    /// Follow the fixed reverse map; no-op where there is no back target
    pub fn go_back(&mut self) {
        if let Some(target) = self.screen.back_target() {
            self.screen = target;
        }
    }

    /// Debug switcher: jump straight to any screen
    pub fn jump_to(&mut self, screen: Screen) {
        debug!(from = %self.screen, to = %screen, "debug screen jump");
        self.screen = screen;
    }

    /// Request a verification code for the entered phone number.
    ///
    /// Shows the "code sent" confirmation, resets the countdown, and asks
    /// the backend to dispatch; the screen advances only when the delayed
    /// [`BackendEvent::OtpDispatched`] is applied.
    pub fn submit_phone(&mut self, backend: &SimulatedBackend) -> Result<()> {
        if !self.form.phone_is_valid() {
            return Err(Error::PhoneTooShort(self.form.phone_digit_count()));
        }
        let destination = self.destination();
        self.code_sent_pending = true;
        self.timer.reset();
        self.log(format!("OTP sent to {destination}"));
        backend.send_otp(destination);
        Ok(())
    }

    /// Verify the entered code. Always succeeds once all six slots are
    /// filled; the simulation has no failure branch.
    pub fn verify_otp(&mut self) -> Result<()> {
        if !self.form.otp.is_complete() {
            return Err(Error::OtpIncomplete(self.form.otp.filled()));
        }
        self.log("OTP verification successful");
        self.screen = Screen::Profile;
        Ok(())
    }

    /// Profile → Security once both fields are filled
    pub fn submit_profile(&mut self) -> Result<()> {
        if !self.form.profile_is_complete() {
            return Err(Error::ProfileIncomplete);
        }
        self.screen = Screen::Security;
        Ok(())
    }

    /// Security → Dashboard once the PIN is complete; builds the account
    /// summary the dashboard shows.
    pub fn complete_security(&mut self) -> Result<()> {
        if !self.form.pin_is_valid() {
            return Err(Error::PinLength {
                expected: PIN_LEN,
                actual: self.form.pin.len(),
            });
        }
        self.account = Some(Account::from_onboarding(
            self.form.full_name.clone(),
            self.form.username.clone(),
            &self.dialing_code,
            &self.form.phone,
        ));
        self.log("Registration complete");
        self.screen = Screen::Dashboard;
        Ok(())
    }

    /// Resend the code once the countdown has expired
    pub fn resend_otp(&mut self, backend: &SimulatedBackend) -> Result<()> {
        if !self.timer.is_expired() {
            return Err(Error::ResendNotReady(self.timer.remaining()));
        }
        self.timer.reset();
        self.log("Resending OTP...");
        backend.resend_otp(self.destination());
        Ok(())
    }

    /// Log-only stub for every other business action
    pub fn simulate(&mut self, action: Action) {
        self.log(format!("Simulating action: {action}"));
    }

    // ------------------------------------------------------------------
    // Guards and ticks
    // ------------------------------------------------------------------

    /// True exactly when the current screen's minimum-input condition is
    /// met; drives disabled-button styling.
    pub fn can_submit(&self) -> bool {
        match self.screen {
            Screen::Phone => self.form.phone_is_valid(),
            Screen::Otp => self.form.otp.is_complete(),
            Screen::Profile => self.form.profile_is_complete(),
            Screen::Security => self.form.pin_is_valid(),
            Screen::Welcome | Screen::Dashboard | Screen::Login => true,
        }
    }

    /// One second of wall time elapsed; only the verification screen's
    /// countdown cares.
    pub fn tick_second(&mut self) {
        if self.screen == Screen::Otp {
            self.timer.tick();
        }
    }

    /// Apply a completion event from the simulated backend
    pub fn apply(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::OtpDispatched { destination, code } => {
                self.code_sent_pending = false;
                self.log(format!("Verification code delivered to {destination}"));
                self.last_code = Some(code);
                self.screen = Screen::Otp;
            }
        }
    }

    /// Serializable view of the current state
    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            screen: self.screen,
            phone: self.form.phone.clone(),
            otp_filled: self.form.otp.filled(),
            full_name: self.form.full_name.clone(),
            username: self.form.username.clone(),
            pin_set: self.form.pin_is_valid(),
            countdown_secs: self.timer.remaining(),
            code_sent_pending: self.code_sent_pending,
            account_ready: self.account.is_some(),
        }
    }

    fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(screen = %self.screen, "{message}");
        self.activity.push(ActivityEntry {
            at: Utc::now(),
            message,
        });
    }
}
