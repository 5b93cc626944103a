//! Form state for the onboarding and login screens
//!
//! Holds every editable field of the flow plus the six-slot verification
//! code input with its auto-advance cursor. Validation never goes beyond
//! the superficial checks the screens need to enable their submit actions.

use serde::Serialize;
use std::path::PathBuf;

/// Number of verification code slots
pub const OTP_LEN: usize = 6;
/// Required transaction PIN length
pub const PIN_LEN: usize = 4;
/// Minimum significant characters before a phone number can be submitted
pub const PHONE_MIN_DIGITS: usize = 10;

/// Editable text fields across all screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Phone,
    FullName,
    Username,
    Pin,
    LoginIdentifier,
    LoginPin,
}

impl Field {
    /// Whether `ch` may be typed into this field
    pub fn accepts(&self, ch: char) -> bool {
        match self {
            Field::Phone => ch.is_ascii_digit() || ch == ' ',
            Field::Pin | Field::LoginPin => ch.is_ascii_digit(),
            Field::FullName | Field::Username | Field::LoginIdentifier => {
                !ch.is_control()
            }
        }
    }

    /// Maximum length, where the field has one
    pub fn max_len(&self) -> Option<usize> {
        match self {
            Field::Pin | Field::LoginPin => Some(PIN_LEN),
            Field::Phone => Some(16),
            Field::FullName | Field::Username | Field::LoginIdentifier => Some(40),
        }
    }
}

/// Six single-character verification code slots with an active-slot cursor.
///
/// Entering a digit fills the active slot and advances the cursor; deleting
/// from an empty slot moves the cursor back first. A paste of exactly six
/// digits fills the whole sequence at once.
#[derive(Debug, Clone, Serialize)]
pub struct OtpInput {
    slots: [Option<char>; OTP_LEN],
    cursor: usize,
}

impl Default for OtpInput {
    fn default() -> Self {
        Self {
            slots: [None; OTP_LEN],
            cursor: 0,
        }
    }
}

impl OtpInput {
    /// Accept a single digit into the active slot, auto-advancing unless on
    /// the last slot. Non-digits are ignored.
    pub fn enter(&mut self, ch: char) {
        if !ch.is_ascii_digit() {
            return;
        }
        self.slots[self.cursor] = Some(ch);
        if self.cursor < OTP_LEN - 1 {
            self.cursor += 1;
        }
    }

    /// Clear the active slot, or move back one slot and clear that one when
    /// the active slot is already empty.
    pub fn backspace(&mut self) {
        if self.slots[self.cursor].is_some() {
            self.slots[self.cursor] = None;
        } else if self.cursor > 0 {
            self.cursor -= 1;
            self.slots[self.cursor] = None;
        }
    }

    /// Fill all six slots from a pasted six-digit string. Anything else is
    /// rejected without touching the slots. Returns whether the paste was
    /// accepted.
    pub fn paste(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.len() != OTP_LEN || !text.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        for (slot, ch) in self.slots.iter_mut().zip(text.chars()) {
            *slot = Some(ch);
        }
        self.cursor = OTP_LEN - 1;
        true
    }

    /// Empty every slot and rewind the cursor
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Number of filled slots
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// True when every slot holds a digit
    pub fn is_complete(&self) -> bool {
        self.filled() == OTP_LEN
    }

    /// The concatenated code, once complete
    pub fn code(&self) -> Option<String> {
        if self.is_complete() {
            Some(self.slots.iter().flatten().collect())
        } else {
            None
        }
    }

    /// Index of the active slot
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// All six slots in order
    pub fn slots(&self) -> &[Option<char>; OTP_LEN] {
        &self.slots
    }
}

/// Ephemeral, in-memory form state for the whole flow.
///
/// Nothing here survives the session; the profile photo is an unused
/// placeholder.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormData {
    pub phone: String,
    pub otp: OtpInput,
    pub full_name: String,
    pub username: String,
    pub pin: String,
    pub profile_photo: Option<PathBuf>,
    pub login_identifier: String,
    pub login_pin: String,
}

impl FormData {
    /// Append one character to a field, applying its filter and length cap
    pub fn insert(&mut self, field: Field, ch: char) {
        if !field.accepts(ch) {
            return;
        }
        let value = self.value_mut(field);
        if let Some(max) = field.max_len() {
            if value.chars().count() >= max {
                return;
            }
        }
        value.push(ch);
    }

    /// Remove the last character from a field
    pub fn delete(&mut self, field: Field) {
        self.value_mut(field).pop();
    }

    /// Current text of a field
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Phone => &self.phone,
            Field::FullName => &self.full_name,
            Field::Username => &self.username,
            Field::Pin => &self.pin,
            Field::LoginIdentifier => &self.login_identifier,
            Field::LoginPin => &self.login_pin,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Phone => &mut self.phone,
            Field::FullName => &mut self.full_name,
            Field::Username => &mut self.username,
            Field::Pin => &mut self.pin,
            Field::LoginIdentifier => &mut self.login_identifier,
            Field::LoginPin => &mut self.login_pin,
        }
    }

    /// Digits entered into the phone field, ignoring spacing
    pub fn phone_digit_count(&self) -> usize {
        self.phone.chars().filter(|c| c.is_ascii_digit()).count()
    }

    /// Minimum-length check gating the send-code action
    pub fn phone_is_valid(&self) -> bool {
        self.phone_digit_count() >= PHONE_MIN_DIGITS
    }

    /// Both profile fields filled, gating the continue action
    pub fn profile_is_complete(&self) -> bool {
        !self.full_name.trim().is_empty() && !self.username.trim().is_empty()
    }

    /// Exact-length check gating the complete-setup action
    pub fn pin_is_valid(&self) -> bool {
        self.pin.len() == PIN_LEN && self.pin.chars().all(|c| c.is_ascii_digit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_enter_auto_advances() {
        let mut otp = OtpInput::default();
        otp.enter('4');
        otp.enter('2');

        assert_eq!(otp.slots()[0], Some('4'));
        assert_eq!(otp.slots()[1], Some('2'));
        assert_eq!(otp.cursor(), 2);
        assert_eq!(otp.filled(), 2);
    }

    #[test]
    fn test_otp_enter_stays_on_last_slot() {
        let mut otp = OtpInput::default();
        for ch in "123456".chars() {
            otp.enter(ch);
        }
        assert_eq!(otp.cursor(), OTP_LEN - 1);
        assert!(otp.is_complete());

        // Overwriting the last slot must not move the cursor
        otp.enter('9');
        assert_eq!(otp.cursor(), OTP_LEN - 1);
        assert_eq!(otp.code(), Some("123459".to_string()));
    }

    #[test]
    fn test_otp_ignores_non_digits() {
        let mut otp = OtpInput::default();
        otp.enter('x');
        otp.enter(' ');
        assert_eq!(otp.filled(), 0);
        assert_eq!(otp.cursor(), 0);
    }

    #[test]
    fn test_otp_backspace_clears_then_moves_back() {
        let mut otp = OtpInput::default();
        otp.enter('1');
        otp.enter('2');
        // Cursor sits on empty slot 2
        otp.backspace();
        assert_eq!(otp.cursor(), 1);
        assert_eq!(otp.slots()[1], None);

        otp.backspace();
        assert_eq!(otp.cursor(), 0);
        assert_eq!(otp.slots()[0], None);
    }

    #[test]
    fn test_otp_backspace_on_first_empty_slot_is_noop() {
        let mut otp = OtpInput::default();
        otp.backspace();
        assert_eq!(otp.cursor(), 0);
        assert_eq!(otp.filled(), 0);
    }

    #[test]
    fn test_otp_backspace_clears_filled_last_slot_in_place() {
        let mut otp = OtpInput::default();
        for ch in "123456".chars() {
            otp.enter(ch);
        }
        otp.backspace();
        assert_eq!(otp.cursor(), OTP_LEN - 1);
        assert_eq!(otp.filled(), OTP_LEN - 1);
        assert!(otp.code().is_none());
    }

    #[test]
    fn test_otp_paste_six_digits() {
        let mut otp = OtpInput::default();
        assert!(otp.paste(" 987654 "));
        assert_eq!(otp.code(), Some("987654".to_string()));
        assert_eq!(otp.cursor(), OTP_LEN - 1);
    }

    #[test]
    fn test_otp_paste_rejects_bad_input() {
        let mut otp = OtpInput::default();
        otp.enter('1');

        assert!(!otp.paste("12345"));
        assert!(!otp.paste("1234567"));
        assert!(!otp.paste("12a456"));

        // Rejected pastes leave existing slots untouched
        assert_eq!(otp.slots()[0], Some('1'));
        assert_eq!(otp.filled(), 1);
    }

    #[test]
    fn test_otp_clear() {
        let mut otp = OtpInput::default();
        otp.paste("123456");
        otp.clear();
        assert_eq!(otp.filled(), 0);
        assert_eq!(otp.cursor(), 0);
    }

    #[test]
    fn test_field_filters() {
        let mut form = FormData::default();

        form.insert(Field::Phone, '8');
        form.insert(Field::Phone, ' ');
        form.insert(Field::Phone, 'x');
        assert_eq!(form.phone, "8 ");

        form.insert(Field::Pin, '1');
        form.insert(Field::Pin, 'a');
        assert_eq!(form.pin, "1");

        form.insert(Field::FullName, 'T');
        form.insert(Field::FullName, '\u{0007}');
        assert_eq!(form.full_name, "T");
    }

    #[test]
    fn test_pin_caps_at_four_digits() {
        let mut form = FormData::default();
        for ch in "123456".chars() {
            form.insert(Field::Pin, ch);
        }
        assert_eq!(form.pin, "1234");
        assert!(form.pin_is_valid());

        form.delete(Field::Pin);
        assert!(!form.pin_is_valid());
    }

    #[test]
    fn test_phone_validation_counts_digits_only() {
        let mut form = FormData::default();
        form.phone = "801 234 567".to_string();
        assert_eq!(form.phone_digit_count(), 9);
        assert!(!form.phone_is_valid());

        form.phone.push('8');
        assert!(form.phone_is_valid());
    }

    #[test]
    fn test_profile_completeness() {
        let mut form = FormData::default();
        assert!(!form.profile_is_complete());

        form.full_name = "Tobi Adebayo".to_string();
        assert!(!form.profile_is_complete());

        form.username = "tobi_ada".to_string();
        assert!(form.profile_is_complete());

        form.username = "   ".to_string();
        assert!(!form.profile_is_complete());
    }

    #[test]
    fn test_delete_on_empty_field_is_noop() {
        let mut form = FormData::default();
        form.delete(Field::Username);
        assert_eq!(form.username, "");
    }
}
