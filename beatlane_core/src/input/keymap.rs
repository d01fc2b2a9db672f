use serde::{Deserialize, Serialize};

use crate::chart::{check_lane, LANE_COUNT};
use crate::error::ChartError;
use crate::input::events::KeyCode;

/// One key per lane, kept 1:1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyMap {
    lanes: [KeyCode; LANE_COUNT as usize],
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            lanes: ["KeyD", "KeyF", "KeyJ", "KeyK"].map(KeyCode::from),
        }
    }
}

impl KeyMap {
    pub fn new(lanes: [KeyCode; LANE_COUNT as usize]) -> Self {
        let mut map = Self::default();
        for (lane, code) in lanes.into_iter().enumerate() {
            map.bind(lane, code);
        }
        map
    }

    pub fn lane_for(&self, code: &KeyCode) -> Option<u8> {
        self.lanes.iter().position(|k| k == code).map(|lane| lane as u8)
    }

    pub fn key_for(&self, lane: u8) -> Option<&KeyCode> {
        self.lanes.get(lane as usize)
    }

    pub fn keys(&self) -> &[KeyCode] {
        &self.lanes
    }

    /// Rebinds a lane. A key already bound elsewhere swaps with this lane's
    /// old key.
    pub fn set_lane_key(&mut self, lane: u8, code: KeyCode) -> Result<(), ChartError> {
        check_lane(lane)?;
        self.bind(lane as usize, code);
        Ok(())
    }

    fn bind(&mut self, lane: usize, code: KeyCode) {
        if let Some(other) = self.lanes.iter().position(|k| *k == code) {
            self.lanes.swap(lane, other);
        } else {
            self.lanes[lane] = code;
        }
    }
}
