use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical key code as reported by the host, e.g. `"KeyD"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(String);

impl KeyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for KeyCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn down(code: impl Into<String>) -> Self {
        Self {
            code: KeyCode::new(code),
            pressed: true,
        }
    }

    pub fn up(code: impl Into<String>) -> Self {
        Self {
            code: KeyCode::new(code),
            pressed: false,
        }
    }
}
