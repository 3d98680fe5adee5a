use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::EyesError;
use crate::guard;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectangleSize {
    pub width: u32,
    pub height: u32,
}

impl RectangleSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl FromStr for RectangleSize {
    type Err = EyesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('x').collect();
        if parts.len() != 2 {
            return Err(EyesError::illegal_argument(format!(
                "invalid size '{s}': expected WIDTHxHEIGHT (e.g., 1200x800)"
            )));
        }

        let width: u32 = parts[0].trim().parse().map_err(|_| {
            EyesError::illegal_argument(format!("invalid width: {}", parts[0].trim()))
        })?;

        let height: u32 = parts[1].trim().parse().map_err(|_| {
            EyesError::illegal_argument(format!("invalid height: {}", parts[1].trim()))
        })?;

        guard::greater_than_zero(f64::from(width), "width", true)?;
        guard::greater_than_zero(f64::from(height), "height", true)?;

        Ok(RectangleSize { width, height })
    }
}

impl std::fmt::Display for RectangleSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
