/// Transform strategy selection
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// How rotation is composed with an object's placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformStrategy {
    /// Rotate about the object's own center.
    #[default]
    Spin,
    /// Orbit a world-space point shared by all objects.
    OrbitFixed,
    /// Orbit a point using each object's own offset from it.
    OrbitRelative,
}

impl TransformStrategy {
    pub const ALL: [TransformStrategy; 3] = [
        TransformStrategy::Spin,
        TransformStrategy::OrbitFixed,
        TransformStrategy::OrbitRelative,
    ];

    /// Map a key identifier to a strategy. Unmapped keys return `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "1" => Some(Self::Spin),
            "2" => Some(Self::OrbitFixed),
            "3" => Some(Self::OrbitRelative),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Spin => "spin",
            Self::OrbitFixed => "orbit-fixed",
            Self::OrbitRelative => "orbit-relative",
        }
    }
}

impl fmt::Display for TransformStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown strategy name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown transform strategy '{}' (expected spin, orbit-fixed or orbit-relative)",
            self.0
        )
    }
}

impl std::error::Error for UnknownStrategy {}

impl FromStr for TransformStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

/// Externally settable strategy mode.
///
/// Input events only change the selector; the frame driver is handed a copy
/// of `current()` when a frame starts, so a change lands on the next frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrategySelector {
    current: TransformStrategy,
}

impl StrategySelector {
    pub fn new(initial: TransformStrategy) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> TransformStrategy {
        self.current
    }

    pub fn set(&mut self, strategy: TransformStrategy) {
        if strategy != self.current {
            log::info!("transform strategy: {} -> {}", self.current, strategy);
        }
        self.current = strategy;
    }

    /// Apply a key event. Returns true when the mode changed.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match TransformStrategy::from_key(key) {
            Some(strategy) if strategy != self.current => {
                self.set(strategy);
                true
            }
            _ => false,
        }
    }
}
