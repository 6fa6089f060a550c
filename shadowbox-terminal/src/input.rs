/// Keyboard mapping and held-key tracking
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use shadowbox_core::animation::{COARSE_SPEED_STEP, FINE_SPEED_STEP};
use shadowbox_core::{AnimationChannel, CameraControl, ControlSet, LightDirection, PresetId};

/// Discrete actions triggered by a single key press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    ToggleChannel(AnimationChannel),
    ToggleEasing,
    TogglePause,
    AdjustSpeed(f32),
    ApplyPreset(PresetId),
    ResetAnimations,
    ResetAll,
    MoveLight(LightDirection),
    ToggleShadows,
    ToggleGround,
    ToggleWireframe,
}

/// Camera control bound to a key, if any.
pub fn camera_control(code: KeyCode) -> Option<CameraControl> {
    let control = match code {
        KeyCode::Left => CameraControl::OrbitLeft,
        KeyCode::Right => CameraControl::OrbitRight,
        KeyCode::Up => CameraControl::PitchUp,
        KeyCode::Down => CameraControl::PitchDown,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'a' => CameraControl::OrbitLeft,
            'd' => CameraControl::OrbitRight,
            'q' => CameraControl::PitchUp,
            'e' => CameraControl::PitchDown,
            'w' => CameraControl::ZoomIn,
            's' => CameraControl::ZoomOut,
            _ => return None,
        },
        _ => return None,
    };
    Some(control)
}

/// Command bound to a key press, if any.
pub fn command(key: &KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    let command = match key.code {
        KeyCode::Esc => Command::Quit,
        KeyCode::Char(' ') => Command::TogglePause,
        KeyCode::Char(c @ '1'..='5') => Command::ApplyPreset(c as PresetId - b'0'),
        KeyCode::Char('+') | KeyCode::Char('=') => Command::AdjustSpeed(COARSE_SPEED_STEP),
        KeyCode::Char('-') | KeyCode::Char('_') => Command::AdjustSpeed(-COARSE_SPEED_STEP),
        KeyCode::Char(']') => Command::AdjustSpeed(FINE_SPEED_STEP),
        KeyCode::Char('[') => Command::AdjustSpeed(-FINE_SPEED_STEP),
        KeyCode::Char(';') => Command::MoveLight(LightDirection::Right),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'p' => Command::ToggleChannel(AnimationChannel::Model),
            'l' => Command::ToggleChannel(AnimationChannel::Orbit),
            'b' => Command::ToggleChannel(AnimationChannel::Bobbing),
            'g' => Command::ToggleChannel(AnimationChannel::Path),
            'm' => Command::ToggleEasing,
            'x' => Command::ResetAnimations,
            'c' => Command::ResetAll,
            'r' => Command::ToggleShadows,
            't' => Command::ToggleGround,
            'f' => Command::ToggleWireframe,
            'j' => Command::MoveLight(LightDirection::Left),
            'i' => Command::MoveLight(LightDirection::Forward),
            'k' => Command::MoveLight(LightDirection::Back),
            'u' => Command::MoveLight(LightDirection::Up),
            'o' => Command::MoveLight(LightDirection::Down),
            _ => return None,
        },
        _ => return None,
    };
    Some(command)
}

/// Tracks which camera keys are currently held.
///
/// Terminals that report key releases end a hold on release. Others only
/// send repeated presses, so a hold ends once no press has arrived for
/// `hold_timeout`.
#[derive(Debug, Clone)]
pub struct HeldKeys {
    held: HashMap<CameraControl, Instant>,
    turbo: Option<Instant>,
    hold_timeout: Option<Duration>,
}

impl HeldKeys {
    pub fn new(hold_timeout: Option<Duration>) -> Self {
        Self {
            held: HashMap::new(),
            turbo: None,
            hold_timeout,
        }
    }

    /// Feed a key event. Returns the command for presses that are not holds.
    pub fn handle(&mut self, key: &KeyEvent, now: Instant) -> Option<Command> {
        let released = key.kind == KeyEventKind::Release;

        if key.code == KeyCode::Tab {
            self.turbo = if released { None } else { Some(now) };
            return None;
        }

        if let Some(control) = camera_control(key.code) {
            if released {
                self.held.remove(&control);
            } else {
                self.held.insert(control, now);
            }
            return None;
        }

        match key.kind {
            KeyEventKind::Press => command(key),
            _ => None,
        }
    }

    /// Drop holds whose last press is older than the timeout.
    pub fn expire(&mut self, now: Instant) {
        let Some(timeout) = self.hold_timeout else {
            return;
        };
        let alive = |at: &Instant| now.saturating_duration_since(*at) < timeout;
        self.held.retain(|_, at| alive(at));
        if !self.turbo.as_ref().map_or(false, alive) {
            self.turbo = None;
        }
    }

    pub fn controls(&self) -> ControlSet {
        self.held.keys().copied().collect()
    }

    pub fn turbo(&self) -> bool {
        self.turbo.is_some()
    }

    pub fn clear(&mut self) {
        self.held.clear();
        self.turbo = None;
    }
}

/// Degrees of model rotation per terminal column dragged.
pub const DRAG_DEGREES_PER_CELL: f32 = 6.0;

/// Turns left-button drags into model rotation.
#[derive(Debug, Clone, Default)]
pub struct MouseDrag {
    last: Option<(u16, u16)>,
}

impl MouseDrag {
    /// Feed a mouse event. Returns `(tilt, spin)` in degrees for each drag step.
    ///
    /// Rows count double since terminal cells are about twice as tall as wide.
    pub fn handle(&mut self, event: &MouseEvent) -> Option<(f32, f32)> {
        let position = (event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.last = Some(position);
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (column, row) = self.last.replace(position)?;
                let dx = position.0 as f32 - column as f32;
                let dy = position.1 as f32 - row as f32;
                Some((dy * 2.0 * DRAG_DEGREES_PER_CELL, dx * DRAG_DEGREES_PER_CELL))
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.last = None;
                None
            }
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }
}
