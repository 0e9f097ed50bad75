//! Platform-agnostic input state
//!
//! The scene layer reads keyboard and mouse state from [`Input`]; windowing
//! adapters (see the `winit` feature) write into it. Transient state (keys
//! that went down, cursor and scroll deltas) lasts until the host calls
//! [`Input::start_frame`].

use glam::Vec2;
use rustc_hash::FxHashSet;

/// Keys the scene layer reacts to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    Space,
    Enter,
    Escape,
    Tab,

    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Default)]
struct Cursor {
    /// `None` until the first position sample
    position: Option<Vec2>,
    delta: Vec2,
    scroll: Vec2,
}

/// Keyboard, mouse and viewport state for one frame.
#[derive(Debug, Clone, Default)]
pub struct Input {
    held_keys: FxHashSet<Key>,
    pressed_this_frame: FxHashSet<Key>,
    held_buttons: FxHashSet<MouseButton>,
    cursor: Cursor,
    screen_size: Vec2,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Host / adapter side
    // ========================================================================

    /// Forgets keys pressed last frame and resets cursor and scroll deltas.
    pub fn start_frame(&mut self) {
        self.pressed_this_frame.clear();
        self.cursor.delta = Vec2::ZERO;
        self.cursor.scroll = Vec2::ZERO;
    }

    /// Key repeat while held does not count as a new press.
    pub fn inject_key(&mut self, key: Key, state: ButtonState) {
        match state {
            ButtonState::Pressed => {
                if self.held_keys.insert(key) {
                    self.pressed_this_frame.insert(key);
                }
            }
            ButtonState::Released => {
                self.held_keys.remove(&key);
            }
        }
    }

    pub fn inject_mouse_button(&mut self, button: MouseButton, state: ButtonState) {
        match state {
            ButtonState::Pressed => self.held_buttons.insert(button),
            ButtonState::Released => self.held_buttons.remove(&button),
        };
    }

    /// Cursor position in physical pixels. The first sample only sets the
    /// position, so a cursor entering the window does not register a jump.
    pub fn inject_mouse_position(&mut self, x: f32, y: f32) {
        let position = Vec2::new(x, y);
        if let Some(previous) = self.cursor.position {
            self.cursor.delta += position - previous;
        }
        self.cursor.position = Some(position);
    }

    pub fn inject_scroll(&mut self, delta_x: f32, delta_y: f32) {
        self.cursor.scroll += Vec2::new(delta_x, delta_y);
    }

    pub fn inject_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether `key` is held down.
    #[must_use]
    pub fn get_key(&self, key: Key) -> bool {
        self.held_keys.contains(&key)
    }

    /// Whether `key` went down since the last [`start_frame`](Self::start_frame).
    #[must_use]
    pub fn get_key_down(&self, key: Key) -> bool {
        self.pressed_this_frame.contains(&key)
    }

    #[must_use]
    pub fn get_mouse_button(&self, button: MouseButton) -> bool {
        self.held_buttons.contains(&button)
    }

    /// Last known cursor position, `Vec2::ZERO` before the first sample.
    #[must_use]
    pub fn mouse_position(&self) -> Vec2 {
        self.cursor.position.unwrap_or(Vec2::ZERO)
    }

    #[must_use]
    pub fn mouse_delta(&self) -> Vec2 {
        self.cursor.delta
    }

    #[must_use]
    pub fn scroll_delta(&self) -> Vec2 {
        self.cursor.scroll
    }

    #[must_use]
    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }
}
