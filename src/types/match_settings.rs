//! Comparison policy: match level, exactness thresholds and region lists.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EyesError, Result};
use crate::geometry::Region;
use crate::guard;

/// How strictly a checkpoint must match its baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchLevel {
    None,
    Layout,
    Layout2,
    Content,
    #[default]
    Strict,
    Exact,
}

impl MatchLevel {
    pub const fn all() -> [MatchLevel; 6] {
        [
            MatchLevel::None,
            MatchLevel::Layout,
            MatchLevel::Layout2,
            MatchLevel::Content,
            MatchLevel::Strict,
            MatchLevel::Exact,
        ]
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            MatchLevel::None => "None",
            MatchLevel::Layout => "Layout",
            MatchLevel::Layout2 => "Layout2",
            MatchLevel::Content => "Content",
            MatchLevel::Strict => "Strict",
            MatchLevel::Exact => "Exact",
        }
    }
}

impl fmt::Display for MatchLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchLevel {
    type Err = EyesError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        MatchLevel::all()
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EyesError::illegal_type(format!("{s} is not member of MatchLevel")))
    }
}

/// Thresholds applied when the match level is [`MatchLevel::Exact`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactMatchSettings {
    pub min_diff_intensity: u32,
    pub min_diff_width: u32,
    pub min_diff_height: u32,
    pub match_threshold: f64,
}

impl ExactMatchSettings {
    pub fn new(
        min_diff_intensity: u32,
        min_diff_width: u32,
        min_diff_height: u32,
        match_threshold: f64,
    ) -> Result<Self> {
        guard::greater_than_or_equal_to_zero(match_threshold, "matchThreshold", false)?;
        Ok(Self {
            min_diff_intensity,
            min_diff_width,
            min_diff_height,
            match_threshold,
        })
    }
}

/// Per-edge tolerance of a floating region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FloatingOffsets {
    pub max_up_offset: u32,
    pub max_down_offset: u32,
    pub max_left_offset: u32,
    pub max_right_offset: u32,
}

impl FloatingOffsets {
    pub const fn new(up: u32, down: u32, left: u32, right: u32) -> Self {
        Self {
            max_up_offset: up,
            max_down_offset: down,
            max_left_offset: left,
            max_right_offset: right,
        }
    }
}

/// A region allowed to move within its per-edge offsets and still match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatingMatchSettings {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
    pub max_up_offset: u32,
    pub max_down_offset: u32,
    pub max_left_offset: u32,
    pub max_right_offset: u32,
}

impl FloatingMatchSettings {
    pub fn new(region: Region, offsets: FloatingOffsets) -> Self {
        Self {
            left: region.left,
            top: region.top,
            width: region.width,
            height: region.height,
            max_up_offset: offsets.max_up_offset,
            max_down_offset: offsets.max_down_offset,
            max_left_offset: offsets.max_left_offset,
            max_right_offset: offsets.max_right_offset,
        }
    }

    pub fn region(&self) -> Region {
        Region::new(self.left, self.top, self.width, self.height)
    }

    pub fn offsets(&self) -> FloatingOffsets {
        FloatingOffsets::new(
            self.max_up_offset,
            self.max_down_offset,
            self.max_left_offset,
            self.max_right_offset,
        )
    }
}

/// Region lists of every kind, all expressed in screenshot coordinates.
/// Empty lists are left out of the wire form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRegions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<Region>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub floating: Vec<FloatingMatchSettings>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strict: Vec<Region>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layout: Vec<Region>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Region>,
}

impl MatchRegions {
    pub fn is_empty(&self) -> bool {
        self.ignore.is_empty()
            && self.floating.is_empty()
            && self.strict.is_empty()
            && self.layout.is_empty()
            && self.content.is_empty()
    }

    pub fn extend(&mut self, other: MatchRegions) {
        self.ignore.extend(other.ignore);
        self.floating.extend(other.floating);
        self.strict.extend(other.strict);
        self.layout.extend(other.layout);
        self.content.extend(other.content);
    }
}

/// Default comparison policy for a session, and the per-check settings
/// derived from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMatchSettings {
    pub match_level: MatchLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<ExactMatchSettings>,
    #[serde(default)]
    pub ignore_caret: bool,
    #[serde(flatten)]
    pub regions: MatchRegions,
}

impl ImageMatchSettings {
    pub fn new(match_level: MatchLevel) -> Self {
        Self {
            match_level,
            ..Self::default()
        }
    }

    /// Same comparison parameters with every region list emptied.
    pub fn without_regions(&self) -> Self {
        Self {
            regions: MatchRegions::default(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn match_level_defaults_to_strict() {
        assert_eq!(ImageMatchSettings::default().match_level, MatchLevel::Strict);
    }

    #[test]
    fn match_level_parses_case_insensitively() {
        assert_eq!("layout2".parse::<MatchLevel>().unwrap(), MatchLevel::Layout2);
        assert_eq!("EXACT".parse::<MatchLevel>().unwrap(), MatchLevel::Exact);
        assert!(matches!(
            "Fuzzy".parse::<MatchLevel>(),
            Err(EyesError::IllegalType(_))
        ));
    }

    #[test]
    fn exact_settings_reject_negative_threshold() {
        assert!(ExactMatchSettings::new(0, 0, 0, 0.5).is_ok());
        assert!(matches!(
            ExactMatchSettings::new(0, 0, 0, -0.1),
            Err(EyesError::IllegalArgument(_))
        ));
    }

    #[test]
    fn floating_settings_split_back_into_region_and_offsets() {
        let floating =
            FloatingMatchSettings::new(Region::new(1, 2, 3, 4), FloatingOffsets::new(5, 6, 7, 8));
        assert_eq!(floating.region(), Region::new(1, 2, 3, 4));
        assert_eq!(floating.offsets(), FloatingOffsets::new(5, 6, 7, 8));
    }

    #[test]
    fn empty_region_lists_are_omitted() {
        let settings = ImageMatchSettings::default();
        let value = serde_json::to_value(&settings).expect("serialize settings");
        assert_eq!(value, json!({"matchLevel": "Strict", "ignoreCaret": false}));
    }

    #[test]
    fn region_lists_flatten_into_settings() {
        let mut settings = ImageMatchSettings::new(MatchLevel::Layout);
        settings.regions.ignore.push(Region::new(0, 0, 10, 10));

        let value = serde_json::to_value(&settings).expect("serialize settings");
        assert_eq!(value["matchLevel"], "Layout");
        assert_eq!(value["ignore"][0]["width"], 10);

        let back: ImageMatchSettings = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, settings);
        assert!(back.without_regions().regions.is_empty());
    }

    #[test]
    fn extend_appends_every_kind() {
        let mut base = MatchRegions {
            ignore: vec![Region::new(0, 0, 1, 1)],
            ..MatchRegions::default()
        };
        base.extend(MatchRegions {
            ignore: vec![Region::new(1, 1, 1, 1)],
            content: vec![Region::new(2, 2, 2, 2)],
            ..MatchRegions::default()
        });
        assert_eq!(base.ignore.len(), 2);
        assert_eq!(base.content.len(), 1);
        assert!(!base.is_empty());
    }
}
