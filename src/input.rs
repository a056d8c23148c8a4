use crate::inertia::DirectionKey;
use crate::modifiers::{ButtonMask, Modifiers};
use glam::DVec2;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use smallvec::SmallVec;
use winit::keyboard::{Key, NamedKey, PhysicalKey};

const DEFAULT_PIXELS_PER_LINE: f64 = 20.0;

/// Commands the viewport controller recognizes, independent of any key code space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCommand {
    Direction(DirectionKey),
    /// Parameter selection digit, `0..=9`.
    Select(u8),
    ToggleAnimation,
    StopAnimations,
    Quit,
    ToggleAxis,
    ToggleGrid,
    VectorField,
    ToggleDisco,
    Clip,
    ClipLock,
    ViewTop,
    ViewFront,
    ViewSide,
    ResetCenter,
}

impl KeyCommand {
    const NAMED: [(&'static str, KeyCommand); 19] = [
        ("pan_left", KeyCommand::Direction(DirectionKey::Left)),
        ("pan_right", KeyCommand::Direction(DirectionKey::Right)),
        ("pan_up", KeyCommand::Direction(DirectionKey::Up)),
        ("pan_down", KeyCommand::Direction(DirectionKey::Down)),
        ("zoom_in", KeyCommand::Direction(DirectionKey::Plus)),
        ("zoom_out", KeyCommand::Direction(DirectionKey::Minus)),
        ("toggle_animation", KeyCommand::ToggleAnimation),
        ("stop_animations", KeyCommand::StopAnimations),
        ("quit", KeyCommand::Quit),
        ("toggle_axis", KeyCommand::ToggleAxis),
        ("toggle_grid", KeyCommand::ToggleGrid),
        ("vector_field", KeyCommand::VectorField),
        ("toggle_disco", KeyCommand::ToggleDisco),
        ("clip", KeyCommand::Clip),
        ("clip_lock", KeyCommand::ClipLock),
        ("view_top", KeyCommand::ViewTop),
        ("view_front", KeyCommand::ViewFront),
        ("view_side", KeyCommand::ViewSide),
        ("reset_center", KeyCommand::ResetCenter),
    ];

    fn from_str(value: &str) -> Option<Self> {
        if let Some(digit) = value.strip_prefix("select_") {
            return match digit.parse::<u8>() {
                Ok(d) if d <= 9 => Some(KeyCommand::Select(d)),
                _ => None,
            };
        }
        Self::NAMED.iter().find(|(name, _)| *name == value).map(|(_, command)| *command)
    }

    /// Whether the command keeps acting while held and therefore needs its release event.
    pub fn is_held(self) -> bool {
        matches!(self, KeyCommand::Direction(_) | KeyCommand::Select(_))
    }
}

/// Input as the viewport controller consumes it. Every event carries the live modifier state.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key { command: KeyCommand, pressed: bool, modifiers: Modifiers },
    PointerMoved { delta: DVec2, position: DVec2, buttons: ButtonMask, modifiers: Modifiers },
    Button { button: ButtonMask, pressed: bool, modifiers: Modifiers },
    /// `precise` carries fractional (trackpad) deltas, `coarse` the stepped wheel clicks.
    Wheel { precise: DVec2, coarse: DVec2, position: Option<DVec2>, buttons: ButtonMask, modifiers: Modifiers },
    Gesture { pinch: f64, rotation: f64, modifiers: Modifiers },
    ModifiersChanged(Modifiers),
    /// Held keys and buttons will not report their release.
    FocusLost,
    Exposed,
    Resized { width: u32, height: u32 },
    CloseRequested,
}

impl InputEvent {
    pub fn key(command: KeyCommand, pressed: bool) -> Self {
        InputEvent::Key { command, pressed, modifiers: Modifiers::empty() }
    }

    pub fn wheel_lines(lines: DVec2) -> Self {
        InputEvent::Wheel {
            precise: lines,
            coarse: lines,
            position: None,
            buttons: ButtonMask::empty(),
            modifiers: Modifiers::empty(),
        }
    }
}

/// Translates winit window events into [`InputEvent`]s, tracking modifiers, buttons and the
/// cursor between events.
pub struct Input {
    bindings: InputBindings,
    modifiers: Modifiers,
    buttons: ButtonMask,
    cursor: Option<DVec2>,
    pixels_per_line: f64,
    /// Held commands by the physical key that pressed them. Releases are matched here because the
    /// logical key changes with the modifiers held at release time ("-" comes back as "_").
    held: SmallVec<[(PhysicalKey, KeyCommand); 8]>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(path: impl AsRef<Path>) -> Self {
        let bindings = InputBindings::load_or_default(path);
        Self::with_bindings(bindings)
    }

    fn with_bindings(bindings: InputBindings) -> Self {
        Self {
            bindings,
            modifiers: Modifiers::empty(),
            buttons: ButtonMask::empty(),
            cursor: None,
            pixels_per_line: DEFAULT_PIXELS_PER_LINE,
            held: SmallVec::new(),
        }
    }

    pub fn set_pixels_per_line(&mut self, pixels: f64) {
        if pixels > 0.0 {
            self.pixels_per_line = pixels;
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn buttons(&self) -> ButtonMask {
        self.buttons
    }

    pub fn cursor_position(&self) -> Option<DVec2> {
        self.cursor
    }

    pub fn command_for(&self, key: &Key) -> Option<KeyCommand> {
        InputKeyBinding::from_event_key(key).and_then(|binding| self.bindings.command_for_key(&binding))
    }

    /// Translates a press or release of the physical key `physical`, which currently produces
    /// `logical`. A release reports the command its press was bound to.
    pub fn key(&mut self, physical: PhysicalKey, logical: &Key, pressed: bool) -> Option<InputEvent> {
        let held = self.held.iter().position(|(key, _)| *key == physical);
        let command = if pressed {
            let command = self.command_for(logical)?;
            if command.is_held() {
                match held {
                    Some(index) => self.held[index].1 = command,
                    None => self.held.push((physical, command)),
                }
            }
            command
        } else {
            match held {
                Some(index) => self.held.swap_remove(index).1,
                None => self.command_for(logical)?,
            }
        };
        Some(InputEvent::Key { command, pressed, modifiers: self.modifiers })
    }

    pub fn translate(&mut self, ev: &WindowEvent) -> Option<InputEvent> {
        match ev {
            WindowEvent::ModifiersChanged(mods) => {
                self.set_modifiers(Modifiers::from_winit(mods.state()));
                Some(InputEvent::ModifiersChanged(self.modifiers))
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return None;
                }
                self.key(event.physical_key, &event.logical_key, event.state == ElementState::Pressed)
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = DVec2::new(position.x, position.y);
                let previous = self.cursor.replace(position);
                let delta = previous.map(|last| position - last)?;
                Some(InputEvent::PointerMoved { delta, position, buttons: self.buttons, modifiers: self.modifiers })
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                None
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let mask = ButtonMask::from_winit(*button);
                if mask.is_empty() {
                    return None;
                }
                let pressed = *state == ElementState::Pressed;
                self.buttons.set(mask, pressed);
                Some(InputEvent::Button { button: mask, pressed, modifiers: self.modifiers })
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (precise, coarse) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => {
                        let lines = DVec2::new(*x as f64, *y as f64);
                        (lines, lines)
                    }
                    MouseScrollDelta::PixelDelta(p) => {
                        let lines = DVec2::new(p.x, p.y) / self.pixels_per_line;
                        (lines, lines.trunc())
                    }
                };
                Some(InputEvent::Wheel {
                    precise,
                    coarse,
                    position: self.cursor,
                    buttons: self.buttons,
                    modifiers: self.modifiers,
                })
            }
            WindowEvent::PinchGesture { delta, .. } => {
                Some(InputEvent::Gesture { pinch: *delta, rotation: 0.0, modifiers: self.modifiers })
            }
            WindowEvent::RotationGesture { delta, .. } => {
                Some(InputEvent::Gesture { pinch: 0.0, rotation: *delta as f64, modifiers: self.modifiers })
            }
            WindowEvent::Resized(size) => Some(InputEvent::Resized { width: size.width, height: size.height }),
            WindowEvent::CloseRequested | WindowEvent::Destroyed => Some(InputEvent::CloseRequested),
            WindowEvent::Occluded(false) | WindowEvent::Focused(true) => Some(InputEvent::Exposed),
            WindowEvent::Focused(false) => {
                // Releases are not delivered to an unfocused window.
                self.buttons = ButtonMask::empty();
                self.modifiers = Modifiers::empty();
                self.held.clear();
                Some(InputEvent::FocusLost)
            }
            _ => None,
        }
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::with_bindings(InputBindings::default())
    }
}

#[derive(Debug, Clone)]
struct InputBindings {
    key_to_command: HashMap<InputKeyBinding, KeyCommand>,
}

impl InputBindings {
    fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<InputConfigFile>(&contents) {
                Ok(config) => Self::from_config(config, &path.display().to_string()),
                Err(err) => {
                    warn!(path = %path.display(), "failed to parse key bindings: {err}; using defaults");
                    Self::default()
                }
            },
            Err(err) => {
                warn!(path = %path.display(), "failed to read key bindings: {err}; using defaults");
                Self::default()
            }
        }
    }

    fn from_config(config: InputConfigFile, origin: &str) -> Self {
        let overrides = config.into_overrides(origin);
        Self::with_overrides(overrides)
    }

    /// Overridden keys are taken away from their default commands so that no key ever maps to
    /// two commands.
    fn with_overrides(overrides: Vec<(KeyCommand, Vec<InputKeyBinding>)>) -> Self {
        let mut command_map = Self::default_command_map();
        for (command, keys) in overrides {
            if keys.is_empty() {
                continue;
            }
            for bound in command_map.values_mut() {
                bound.retain(|key| !keys.contains(key));
            }
            command_map.insert(command, keys);
        }
        Self::from_command_map(command_map)
    }

    fn default_command_map() -> HashMap<KeyCommand, Vec<InputKeyBinding>> {
        use InputKeyBinding as B;
        let mut map = HashMap::new();
        map.insert(KeyCommand::Direction(DirectionKey::Left), vec![B::named(NamedKeyCode::ArrowLeft)]);
        map.insert(KeyCommand::Direction(DirectionKey::Right), vec![B::named(NamedKeyCode::ArrowRight)]);
        map.insert(KeyCommand::Direction(DirectionKey::Up), vec![B::named(NamedKeyCode::ArrowUp)]);
        map.insert(KeyCommand::Direction(DirectionKey::Down), vec![B::named(NamedKeyCode::ArrowDown)]);
        map.insert(KeyCommand::Direction(DirectionKey::Plus), vec![B::character("+"), B::character("=")]);
        map.insert(KeyCommand::Direction(DirectionKey::Minus), vec![B::character("-")]);
        for digit in 0..=9u8 {
            map.insert(KeyCommand::Select(digit), vec![B::character(&digit.to_string())]);
        }
        map.insert(KeyCommand::ToggleAnimation, vec![B::named(NamedKeyCode::Space)]);
        map.insert(KeyCommand::StopAnimations, vec![B::character(".")]);
        map.insert(KeyCommand::Quit, vec![B::character("q")]);
        map.insert(KeyCommand::ToggleAxis, vec![B::character("a")]);
        map.insert(KeyCommand::ToggleGrid, vec![B::character("g")]);
        map.insert(KeyCommand::VectorField, vec![B::character("v")]);
        map.insert(KeyCommand::ToggleDisco, vec![B::character("d")]);
        map.insert(KeyCommand::Clip, vec![B::character("c")]);
        map.insert(KeyCommand::ClipLock, vec![B::character("l")]);
        map.insert(KeyCommand::ViewTop, vec![B::character("t")]);
        map.insert(KeyCommand::ViewFront, vec![B::character("f")]);
        map.insert(KeyCommand::ViewSide, vec![B::character("s")]);
        map.insert(KeyCommand::ResetCenter, vec![B::character("z")]);
        map
    }

    fn from_command_map(command_map: HashMap<KeyCommand, Vec<InputKeyBinding>>) -> Self {
        let mut key_to_command = HashMap::new();
        for (command, keys) in command_map {
            for key in keys {
                key_to_command.insert(key, command);
            }
        }
        Self { key_to_command }
    }

    fn command_for_key(&self, key: &InputKeyBinding) -> Option<KeyCommand> {
        self.key_to_command.get(key).copied()
    }
}

impl Default for InputBindings {
    fn default() -> Self {
        Self::from_command_map(Self::default_command_map())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum InputKeyBinding {
    Character(String),
    Named(NamedKeyCode),
}

impl InputKeyBinding {
    fn character(ch: &str) -> Self {
        Self::Character(ch.to_lowercase())
    }

    fn named(named: NamedKeyCode) -> Self {
        Self::Named(named)
    }

    fn from_event_key(key: &Key) -> Option<Self> {
        match key {
            Key::Character(ch) => {
                let s = ch.to_string();
                if s.is_empty() {
                    None
                } else {
                    Some(Self::Character(s.to_lowercase()))
                }
            }
            Key::Named(named) => NamedKeyCode::from_named_key(named).map(Self::Named),
            _ => None,
        }
    }

    fn from_config_value(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }
        if let Some(named) = NamedKeyCode::from_str(&normalized) {
            return Some(Self::Named(named));
        }
        if normalized.chars().count() == 1 {
            return Some(Self::Character(normalized));
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum NamedKeyCode {
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
}

impl NamedKeyCode {
    fn from_named_key(key: &NamedKey) -> Option<Self> {
        match key {
            NamedKey::Space => Some(Self::Space),
            NamedKey::ArrowLeft => Some(Self::ArrowLeft),
            NamedKey::ArrowRight => Some(Self::ArrowRight),
            NamedKey::ArrowUp => Some(Self::ArrowUp),
            NamedKey::ArrowDown => Some(Self::ArrowDown),
            _ => None,
        }
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "space" => Some(Self::Space),
            "left" | "arrow_left" | "arrowleft" => Some(Self::ArrowLeft),
            "right" | "arrow_right" | "arrowright" => Some(Self::ArrowRight),
            "up" | "arrow_up" | "arrowup" => Some(Self::ArrowUp),
            "down" | "arrow_down" | "arrowdown" => Some(Self::ArrowDown),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InputConfigFile {
    #[serde(default)]
    bindings: HashMap<String, Vec<String>>,
}

impl InputConfigFile {
    fn into_overrides(self, origin: &str) -> Vec<(KeyCommand, Vec<InputKeyBinding>)> {
        let mut overrides = Vec::new();
        let mut entries: Vec<_> = self.bindings.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for (action_name, keys) in entries {
            let action_key = action_name.trim().to_lowercase();
            let Some(command) = KeyCommand::from_str(&action_key) else {
                warn!("{origin}: unknown action '{action_name}', ignoring");
                continue;
            };
            let mut parsed = Vec::new();
            for key in keys {
                match InputKeyBinding::from_config_value(&key) {
                    Some(binding) => parsed.push(binding),
                    None => warn!("{origin}: unknown key '{key}' for action '{action_name}', ignoring"),
                }
            }
            if parsed.is_empty() {
                warn!("{origin}: action '{action_name}' has no valid keys, keeping defaults");
                continue;
            }
            overrides.push((command, parsed));
        }
        overrides
    }
}
