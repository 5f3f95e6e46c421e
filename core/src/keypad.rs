use log::trace;

use crate::constants::KEY_COUNT;
use crate::error::{Error, Result};

/// An edge on a single key, reported back to whoever changed the key's state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    Pressed(u8),
    Released(u8),
}

/// # Keypad
/// Input is generated with a 16 key hexadecimal keypad.
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
/// How physical keys map onto it is up to the host.
#[derive(Debug, Default, Copy, Clone)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Keypad::default()
    }

    /// Releases every key without reporting any edges
    pub fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    /// Sets the pressed status of a key
    ///
    /// Returns the edge this caused, if any: holding a key down or releasing an
    /// already released key reports nothing.
    ///
    /// # Arguments
    /// * `key` the key's value, 0x0..=0xF
    /// * `down` whether the key is now held
    pub fn set_key(&mut self, key: u8, down: bool) -> Result<Option<KeyEvent>> {
        let state = self
            .keys
            .get_mut(key as usize)
            .ok_or(Error::InvalidKeyIndex(key))?;

        let event = match (*state, down) {
            (false, true) => Some(KeyEvent::Pressed(key)),
            (true, false) => Some(KeyEvent::Released(key)),
            _ => None,
        };
        *state = down;

        if let Some(event) = event {
            trace!("key {:X}: {:?}", key, event);
        }
        Ok(event)
    }

    /// Whether a key is held; keys outside the keypad are never held
    pub fn is_key_down(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    pub fn keys(&self) -> &[bool; KEY_COUNT] {
        &self.keys
    }
}

#[cfg(test)]
mod test_keypad {
    use super::*;

    #[test]
    fn test_press_edge() {
        let mut keypad = Keypad::new();
        assert_eq!(keypad.set_key(0xE, true), Ok(Some(KeyEvent::Pressed(0xE))));
        assert!(keypad.is_key_down(0xE));
    }

    #[test]
    fn test_hold_is_not_an_edge() {
        let mut keypad = Keypad::new();
        keypad.set_key(0x3, true).unwrap();
        assert_eq!(keypad.set_key(0x3, true), Ok(None));
    }

    #[test]
    fn test_release_edge() {
        let mut keypad = Keypad::new();
        assert_eq!(keypad.set_key(0x3, false), Ok(None));
        keypad.set_key(0x3, true).unwrap();
        assert_eq!(keypad.set_key(0x3, false), Ok(Some(KeyEvent::Released(0x3))));
        assert!(!keypad.is_key_down(0x3));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let mut keypad = Keypad::new();
        assert_eq!(keypad.set_key(0x10, true), Err(Error::InvalidKeyIndex(0x10)));
        assert!(!keypad.is_key_down(0x10));
    }

    #[test]
    fn test_reset_releases_all() {
        let mut keypad = Keypad::new();
        keypad.set_key(0x0, true).unwrap();
        keypad.set_key(0xF, true).unwrap();
        keypad.reset();
        assert_eq!(keypad.keys(), &[false; KEY_COUNT]);
    }
}
