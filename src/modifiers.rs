use bitflags::bitflags;
use winit::event::MouseButton;
use winit::keyboard::ModifiersState;

bitflags! {
    /// Raw modifier keys as reported by the host, one bit per key family.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1;
        const CTRL = 2;
        const ALT = 4;
    }
}

impl Modifiers {
    pub fn from_winit(state: ModifiersState) -> Self {
        let mut mods = Modifiers::empty();
        mods.set(Modifiers::SHIFT, state.shift_key());
        mods.set(Modifiers::CTRL, state.control_key());
        mods.set(Modifiers::ALT, state.alt_key());
        mods
    }

    pub fn mode(self) -> ModifierMode {
        ModifierMode::resolve(self)
    }
}

bitflags! {
    /// Pointer buttons currently held down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ButtonMask: u8 {
        const PRIMARY = 1;
        const SECONDARY = 2;
        const TERTIARY = 4;
    }
}

impl ButtonMask {
    pub fn from_winit(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => ButtonMask::PRIMARY,
            MouseButton::Right => ButtonMask::SECONDARY,
            MouseButton::Middle => ButtonMask::TERTIARY,
            _ => ButtonMask::empty(),
        }
    }
}

/// The modifier combinations the dispatch tables understand.
///
/// Anything outside this set resolves to [`ModifierMode::Other`], which no table entry matches, so
/// the gesture is silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierMode {
    None,
    Shift,
    Ctrl,
    Alt,
    ShiftCtrl,
    ShiftAlt,
    Other,
}

impl ModifierMode {
    pub fn resolve(mods: Modifiers) -> Self {
        const SHIFT: u8 = Modifiers::SHIFT.bits();
        const CTRL: u8 = Modifiers::CTRL.bits();
        const ALT: u8 = Modifiers::ALT.bits();
        match mods.bits() {
            0 => ModifierMode::None,
            SHIFT => ModifierMode::Shift,
            CTRL => ModifierMode::Ctrl,
            ALT => ModifierMode::Alt,
            bits if bits == SHIFT | CTRL => ModifierMode::ShiftCtrl,
            bits if bits == SHIFT | ALT => ModifierMode::ShiftAlt,
            _ => ModifierMode::Other,
        }
    }

    pub fn is_none(self) -> bool {
        self == ModifierMode::None
    }
}
