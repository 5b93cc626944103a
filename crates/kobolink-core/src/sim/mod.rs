//! Simulated backend actions
//!
//! Every business action in the prototype is a placeholder: it logs a
//! structured message, and the code dispatch additionally emits a completion
//! event after a fixed delay. There is no network layer and no
//! success/failure branching anywhere.

use crate::flow::form::OTP_LEN;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// A randomly generated six-digit verification code.
///
/// Cosmetic only: verification never compares against it. It exists so the
/// dispatch log line carries something that looks like a real code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpCode(String);

impl OtpCode {
    /// Generate a fresh six-digit code
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code: String = (0..OTP_LEN)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Completion events emitted by delayed simulated calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// The verification code "arrived" at the destination number
    OtpDispatched { destination: String, code: OtpCode },
}

/// Receiver half of the simulated backend's event channel
pub type EventReceiver = mpsc::UnboundedReceiver<BackendEvent>;

/// Log-only action stubs scattered across the screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SignIn,
    FingerprintLogin,
    FaceIdLogin,
    FingerprintToggle,
    FaceIdToggle,
    FundWallet,
    SendMoney,
    SplitBill,
    WhatsAppCode,
    ForgotPin,
    AddProfilePhoto,
    StartUsing,
}

impl Action {
    /// Human-readable label used in the simulated-action log line
    pub fn label(&self) -> &'static str {
        match self {
            Action::SignIn => "Sign In",
            Action::FingerprintLogin => "Fingerprint Login",
            Action::FaceIdLogin => "Face ID Login",
            Action::FingerprintToggle => "Fingerprint Login Toggle",
            Action::FaceIdToggle => "Face ID Login Toggle",
            Action::FundWallet => "Fund Wallet",
            Action::SendMoney => "Send Money",
            Action::SplitBill => "Split Bill",
            Action::WhatsAppCode => "Use WhatsApp for OTP",
            Action::ForgotPin => "Forgot PIN",
            Action::AddProfilePhoto => "Add profile photo",
            Action::StartUsing => "Start Using KoboLink",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fake asynchronous backend for code dispatch.
///
/// `send_otp` spawns a task that sleeps the configured delay and then emits
/// an [`BackendEvent::OtpDispatched`] on the event channel; the UI loop
/// drains the receiver and applies events to the flow. Dropping the receiver
/// silently discards pending events, which is the only cancellation semantic
/// the prototype has.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    tx: mpsc::UnboundedSender<BackendEvent>,
    send_delay: Duration,
}

impl SimulatedBackend {
    /// Create a backend and the receiver for its completion events
    pub fn new(send_delay: Duration) -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, send_delay }, rx)
    }

    /// Dispatch a verification code after the configured delay.
    ///
    /// Must be called from within a tokio runtime.
    pub fn send_otp(&self, destination: String) {
        self.dispatch(destination, self.send_delay);
    }

    /// Dispatch a fresh code immediately (resend path)
    pub fn resend_otp(&self, destination: String) {
        self.dispatch(destination, Duration::ZERO);
    }

    fn dispatch(&self, destination: String, delay: Duration) {
        let code = OtpCode::generate();
        info!(%destination, %code, delay_ms = delay.as_millis() as u64, "simulated OTP dispatch");

        let tx = self.tx.clone();
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let _ = tx.send(BackendEvent::OtpDispatched { destination, code });
        });
    }

    /// The configured dispatch delay
    pub fn send_delay(&self) -> Duration {
        self.send_delay
    }
}
