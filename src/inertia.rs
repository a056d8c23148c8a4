use glam::{DVec3, IVec3};

/// Upper bound of a held key's inertia; caps keyboard panning speed.
pub const MAX_INERTIA: f64 = 5.0;

/// Keys that drive continuous navigation while held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionKey {
    Left,
    Right,
    Up,
    Down,
    Plus,
    Minus,
}

impl DirectionKey {
    pub const ALL: [DirectionKey; 6] = [
        DirectionKey::Left,
        DirectionKey::Right,
        DirectionKey::Up,
        DirectionKey::Down,
        DirectionKey::Plus,
        DirectionKey::Minus,
    ];

    const fn slot(self) -> usize {
        match self {
            DirectionKey::Left => 0,
            DirectionKey::Right => 1,
            DirectionKey::Up => 2,
            DirectionKey::Down => 3,
            DirectionKey::Plus => 4,
            DirectionKey::Minus => 5,
        }
    }

    /// Unit step this key contributes along (x, y, z).
    pub fn step(self) -> IVec3 {
        match self {
            DirectionKey::Left => IVec3::new(-1, 0, 0),
            DirectionKey::Right => IVec3::new(1, 0, 0),
            DirectionKey::Up => IVec3::new(0, -1, 0),
            DirectionKey::Down => IVec3::new(0, 1, 0),
            DirectionKey::Plus => IVec3::new(0, 0, 1),
            DirectionKey::Minus => IVec3::new(0, 0, -1),
        }
    }
}

/// Summed contribution of every held direction key for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionSample {
    /// Inertia-weighted motion per frame.
    pub delta: DVec3,
    /// Number of held keys per axis, signed. Used for discrete edits such as parameter nudging.
    pub steps: IVec3,
}

/// Held direction keys and their accumulated inertia.
#[derive(Debug, Clone, Default)]
pub struct KeyInertia {
    slots: [Option<f64>; 6],
}

impl KeyInertia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `key` with zero inertia. Returns `false` if it was already held.
    pub fn press(&mut self, key: DirectionKey) -> bool {
        let slot = &mut self.slots[key.slot()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(0.0);
        true
    }

    /// Stops tracking `key`. Returns `false` if it was not held.
    pub fn release(&mut self, key: DirectionKey) -> bool {
        self.slots[key.slot()].take().is_some()
    }

    pub fn is_held(&self, key: DirectionKey) -> bool {
        self.slots[key.slot()].is_some()
    }

    pub fn inertia(&self, key: DirectionKey) -> Option<f64> {
        self.slots[key.slot()]
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn clear(&mut self) {
        self.slots = [None; 6];
    }

    pub fn held(&self) -> impl Iterator<Item = DirectionKey> + '_ {
        DirectionKey::ALL.into_iter().filter(|key| self.is_held(*key))
    }

    /// Grows every held key's inertia by `dt` nominal frames and sums their contributions.
    ///
    /// Growth is self-reinforcing (`0.03 + 0.04 * inertia` per frame) and clamped at
    /// [`MAX_INERTIA`].
    pub fn tick(&mut self, dt: f64) -> MotionSample {
        let mut sample = MotionSample::default();
        for key in DirectionKey::ALL {
            let Some(inertia) = self.slots[key.slot()].as_mut() else {
                continue;
            };
            *inertia = (*inertia + (0.03 + *inertia * 0.04) * dt).min(MAX_INERTIA);
            let step = key.step();
            sample.steps += step;
            sample.delta += step.as_dvec3() * *inertia;
        }
        sample
    }
}

/// Digit keys held to pick parameters. Slot 0..=8 is digit 1..=9, slot 9 is digit 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionKeys {
    held: u16,
}

impl SelectionKeys {
    pub const SLOTS: usize = 10;

    pub fn slot_for_digit(digit: u8) -> Option<usize> {
        match digit {
            0 => Some(9),
            1..=9 => Some(digit as usize - 1),
            _ => None,
        }
    }

    pub fn digit_for_slot(slot: usize) -> Option<u8> {
        match slot {
            9 => Some(0),
            0..=8 => Some(slot as u8 + 1),
            _ => None,
        }
    }

    /// Returns `true` if the slot was not held before.
    pub fn press(&mut self, slot: usize) -> bool {
        debug_assert!(slot < Self::SLOTS, "selection slot {slot} out of range");
        if slot >= Self::SLOTS {
            return false;
        }
        let newly = !self.contains(slot);
        self.held |= 1 << slot;
        newly
    }

    /// Returns `true` if the slot was held before.
    pub fn release(&mut self, slot: usize) -> bool {
        if slot >= Self::SLOTS {
            return false;
        }
        let was = self.contains(slot);
        self.held &= !(1 << slot);
        was
    }

    pub fn contains(&self, slot: usize) -> bool {
        slot < Self::SLOTS && self.held & (1 << slot) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.held == 0
    }

    pub fn clear(&mut self) {
        self.held = 0;
    }

    /// Held slots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..Self::SLOTS).filter(|slot| self.contains(*slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_idempotent_and_release_forgets() {
        let mut keys = KeyInertia::new();
        assert!(keys.press(DirectionKey::Left));
        assert!(!keys.press(DirectionKey::Left));
        assert_eq!(keys.inertia(DirectionKey::Left), Some(0.0));
        assert!(keys.release(DirectionKey::Left));
        assert!(!keys.release(DirectionKey::Left));
        assert!(keys.is_empty());
    }

    #[test]
    fn inertia_grows_monotonically_and_saturates() {
        let mut keys = KeyInertia::new();
        keys.press(DirectionKey::Right);
        let mut previous = 0.0;
        for _ in 0..2_000 {
            keys.tick(1.0);
            let current = keys.inertia(DirectionKey::Right).unwrap();
            assert!(current >= previous);
            assert!(current <= MAX_INERTIA);
            previous = current;
        }
        assert_eq!(previous, MAX_INERTIA);
    }

    #[test]
    fn huge_dt_is_clamped() {
        let mut keys = KeyInertia::new();
        keys.press(DirectionKey::Plus);
        keys.tick(1.0e9);
        assert_eq!(keys.inertia(DirectionKey::Plus), Some(MAX_INERTIA));
    }

    #[test]
    fn first_tick_matches_growth_formula() {
        let mut keys = KeyInertia::new();
        keys.press(DirectionKey::Up);
        let sample = keys.tick(2.0);
        assert!((keys.inertia(DirectionKey::Up).unwrap() - 0.06).abs() < 1e-12);
        assert_eq!(sample.steps, IVec3::new(0, -1, 0));
        assert!((sample.delta.y + 0.06).abs() < 1e-12);
    }

    #[test]
    fn opposite_keys_cancel_steps() {
        let mut keys = KeyInertia::new();
        keys.press(DirectionKey::Left);
        keys.press(DirectionKey::Right);
        keys.press(DirectionKey::Minus);
        let sample = keys.tick(1.0);
        assert_eq!(sample.steps, IVec3::new(0, 0, -1));
        assert!(sample.delta.x.abs() < 1e-12);
        assert!(sample.delta.z < 0.0);
    }

    #[test]
    fn digit_zero_maps_to_last_slot() {
        assert_eq!(SelectionKeys::slot_for_digit(1), Some(0));
        assert_eq!(SelectionKeys::slot_for_digit(9), Some(8));
        assert_eq!(SelectionKeys::slot_for_digit(0), Some(9));
        assert_eq!(SelectionKeys::slot_for_digit(10), None);
        assert_eq!(SelectionKeys::digit_for_slot(9), Some(0));
    }

    #[test]
    fn selection_tracks_membership() {
        let mut selection = SelectionKeys::default();
        assert!(selection.press(2));
        assert!(!selection.press(2));
        assert!(selection.press(0));
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![0, 2]);
        assert!(selection.release(2));
        assert!(!selection.release(2));
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![0]);
    }
}
