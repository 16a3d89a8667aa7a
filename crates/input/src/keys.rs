use glam::Vec3;
use std::collections::HashMap;
use std::str::FromStr;

/// Logical keys the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Backward,
    Left,
    Right,
    /// Run modifier: scales movement speed.
    Run,
    /// Jump modifier. Tracked in the table; movement ignores it.
    Jump,
}

impl Key {
    pub const ALL: [Key; 6] = [
        Key::Forward,
        Key::Backward,
        Key::Left,
        Key::Right,
        Key::Run,
        Key::Jump,
    ];

    fn index(self) -> usize {
        match self {
            Self::Forward => 0,
            Self::Backward => 1,
            Self::Left => 2,
            Self::Right => 3,
            Self::Run => 4,
            Self::Jump => 5,
        }
    }

    /// Unit axis this key contributes to the movement intent.
    ///
    /// Forward is +Z and left is +X: the follow camera sits behind the player
    /// on -Z looking toward +Z, so screen-left is world +X.
    pub fn axis(self) -> Vec3 {
        match self {
            Self::Forward => Vec3::Z,
            Self::Backward => Vec3::NEG_Z,
            Self::Left => Vec3::X,
            Self::Right => Vec3::NEG_X,
            Self::Run | Self::Jump => Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown key action: {0}")]
    UnknownKey(String),
}

impl FromStr for Key {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "run" => Ok(Self::Run),
            "jump" => Ok(Self::Jump),
            other => Err(InputError::UnknownKey(other.to_string())),
        }
    }
}

/// Maps lowercase key names (as reported by the host) to logical keys.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<String, Key>,
}

impl Default for KeyBindings {
    /// WASD plus arrows, shift to run, space to jump.
    fn default() -> Self {
        let mut b = Self::empty();
        for (name, key) in [
            ("w", Key::Forward),
            ("arrowup", Key::Forward),
            ("s", Key::Backward),
            ("arrowdown", Key::Backward),
            ("a", Key::Left),
            ("arrowleft", Key::Left),
            ("d", Key::Right),
            ("arrowright", Key::Right),
            ("shift", Key::Run),
            (" ", Key::Jump),
            ("space", Key::Jump),
        ] {
            b.bind(name, key);
        }
        b
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Build from `(key name, action name)` pairs, e.g. `("k", "forward")`.
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, InputError> {
        let mut b = Self::empty();
        for (name, action) in pairs {
            b.bind(name, action.parse()?);
        }
        Ok(b)
    }

    pub fn bind(&mut self, name: &str, key: Key) {
        self.map.insert(normalize(name), key);
    }

    pub fn lookup(&self, name: &str) -> Option<Key> {
        self.map.get(&normalize(name)).copied()
    }
}

fn normalize(name: &str) -> String {
    if name == " " {
        return name.to_string();
    }
    name.trim().to_ascii_lowercase()
}

/// Movement requested for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveIntent {
    /// Sum of the held keys' unit axes. Not normalized: diagonals are longer.
    pub axis: Vec3,
    /// Run modifier held.
    pub running: bool,
}

impl MoveIntent {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn toward(axis: Vec3, running: bool) -> Self {
        Self { axis, running }
    }

    pub fn is_idle(&self) -> bool {
        self.axis == Vec3::ZERO
    }
}

/// Fixed table of held keys, updated from key-down/key-up events.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    bindings: KeyBindings,
    held: [bool; 6],
}

impl KeyState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: [false; 6],
        }
    }

    pub fn press(&mut self, key: Key) {
        self.held[key.index()] = true;
    }

    pub fn release(&mut self, key: Key) {
        self.held[key.index()] = false;
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held[key.index()]
    }

    /// Release every key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held = [false; 6];
    }

    /// Apply a raw key event by name. Returns the logical key if the name is
    /// bound; unbound names are ignored.
    pub fn handle(&mut self, name: &str, pressed: bool) -> Option<Key> {
        let Some(key) = self.bindings.lookup(name) else {
            tracing::trace!(name, "unbound key ignored");
            return None;
        };
        if pressed {
            self.press(key);
        } else {
            self.release(key);
        }
        Some(key)
    }

    /// Current movement intent from the held keys.
    pub fn intent(&self) -> MoveIntent {
        let axis: Vec3 = Key::ALL
            .iter()
            .filter(|k| self.is_held(**k))
            .map(|k| k.axis())
            .sum();
        MoveIntent {
            axis,
            running: self.is_held(Key::Run),
        }
    }
}
