//! Input source
//!
//! Raw device events collapse into one "activate" level. A flap fires on the
//! rising edge of that level only, so holding Space (or key auto-repeat) does
//! not keep launching the bird.

/// Device-level input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Key pressed, identified by `KeyboardEvent.code`
    KeyDown(Key),
    KeyUp(Key),
    TouchStart,
    TouchEnd,
    PointerDown,
    PointerUp,
    /// Synthetic flap (demo autopilot, on-screen button)
    Flap,
}

/// Keys the game cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    ArrowUp,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Self {
        match code {
            "Space" => Key::Space,
            "ArrowUp" => Key::ArrowUp,
            _ => Key::Other,
        }
    }

    fn activates(self) -> bool {
        matches!(self, Key::Space | Key::ArrowUp)
    }
}

/// Owned input state, handed to the frame loop by reference
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Any activating source is down
    held: bool,
    /// Rising edge seen since the last `take_press`
    pending_press: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one device event
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) if key.activates() => self.press(),
            InputEvent::KeyUp(key) if key.activates() => self.release(),
            InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => {}
            InputEvent::TouchStart | InputEvent::PointerDown => self.press(),
            InputEvent::TouchEnd | InputEvent::PointerUp => self.release(),
            InputEvent::Flap => self.pending_press = true,
        }
    }

    /// Level signal: something is held down
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Consume the edge-triggered press, if any
    pub fn take_press(&mut self) -> bool {
        std::mem::take(&mut self.pending_press)
    }

    /// Drop held state (window blur, tab hidden)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn press(&mut self) {
        // Auto-repeat keydowns arrive while already held
        if !self.held {
            self.pending_press = true;
        }
        self.held = true;
    }

    fn release(&mut self) {
        self.held = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_fires_once_while_held() {
        let mut input = InputState::new();
        input.handle(InputEvent::KeyDown(Key::Space));
        assert!(input.is_held());
        assert!(input.take_press());
        assert!(!input.take_press());

        // Auto-repeat
        input.handle(InputEvent::KeyDown(Key::Space));
        assert!(!input.take_press());

        input.handle(InputEvent::KeyUp(Key::Space));
        assert!(!input.is_held());
        input.handle(InputEvent::KeyDown(Key::Space));
        assert!(input.take_press());
    }

    #[test]
    fn test_tap_between_frames_is_not_lost() {
        let mut input = InputState::new();
        input.handle(InputEvent::TouchStart);
        input.handle(InputEvent::TouchEnd);
        assert!(!input.is_held());
        assert!(input.take_press());
    }

    #[test]
    fn test_unrelated_keys_ignored() {
        let mut input = InputState::new();
        input.handle(InputEvent::KeyDown(Key::from_code("KeyQ")));
        assert!(!input.is_held());
        assert!(!input.take_press());
    }

    #[test]
    fn test_synthetic_flap() {
        let mut input = InputState::new();
        input.handle(InputEvent::Flap);
        assert!(!input.is_held());
        assert!(input.take_press());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut input = InputState::new();
        input.handle(InputEvent::PointerDown);
        input.reset();
        assert!(!input.is_held());
        assert!(!input.take_press());
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("Space"), Key::Space);
        assert_eq!(Key::from_code("ArrowUp"), Key::ArrowUp);
        assert_eq!(Key::from_code("Enter"), Key::Other);
    }
}
