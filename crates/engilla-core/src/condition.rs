//! Condition tags and the recommendation value they resolve to.

use std::{borrow::Cow, fmt};

use serde::{Deserialize, Serialize};

// ─── ConditionTag ────────────────────────────────────────────────────────────

/// A driving condition selected by the user.
///
/// Tags arrive as snake_case strings. Values outside the known set are kept
/// as [`ConditionTag::Unrecognized`] rather than rejected, so that they reach
/// the generic fallback recommendation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionTag {
  Dusty,
  HeavyTraffic,
  Cold,
  HeavyLoad,
  LongTrips,
  ShortTrips,
  Smokey,
  HighMileage,
  Unrecognized(String),
}

impl ConditionTag {
  /// Every recognised tag, in declaration order.
  pub const KNOWN: [ConditionTag; 8] = [
    Self::Dusty,
    Self::HeavyTraffic,
    Self::Cold,
    Self::HeavyLoad,
    Self::LongTrips,
    Self::ShortTrips,
    Self::Smokey,
    Self::HighMileage,
  ];

  /// Parse a wire value. Never fails; unknown values become `Unrecognized`.
  pub fn parse(s: &str) -> Self {
    match s {
      "dusty" => Self::Dusty,
      "heavy_traffic" => Self::HeavyTraffic,
      "cold" => Self::Cold,
      "heavy_load" => Self::HeavyLoad,
      "long_trips" => Self::LongTrips,
      "short_trips" => Self::ShortTrips,
      "smokey" => Self::Smokey,
      "high_mileage" => Self::HighMileage,
      other => Self::Unrecognized(other.to_owned()),
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      Self::Dusty => "dusty",
      Self::HeavyTraffic => "heavy_traffic",
      Self::Cold => "cold",
      Self::HeavyLoad => "heavy_load",
      Self::LongTrips => "long_trips",
      Self::ShortTrips => "short_trips",
      Self::Smokey => "smokey",
      Self::HighMileage => "high_mileage",
      Self::Unrecognized(s) => s,
    }
  }

  pub fn is_recognized(&self) -> bool {
    !matches!(self, Self::Unrecognized(_))
  }
}

impl From<String> for ConditionTag {
  fn from(s: String) -> Self {
    match Self::parse(&s) {
      Self::Unrecognized(_) => Self::Unrecognized(s),
      known => known,
    }
  }
}

impl From<&str> for ConditionTag {
  fn from(s: &str) -> Self { Self::parse(s) }
}

impl From<ConditionTag> for String {
  fn from(tag: ConditionTag) -> Self {
    match tag {
      ConditionTag::Unrecognized(s) => s,
      known => known.as_str().to_owned(),
    }
  }
}

impl fmt::Display for ConditionTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Recommendation ──────────────────────────────────────────────────────────

/// An oil-grade recommendation and the rationale shown alongside it.
///
/// The wire names (`recommendation`, `response`) are what the front end reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
  pub recommendation: Cow<'static, str>,
  #[serde(rename = "response")]
  pub explanation:    Cow<'static, str>,
}

impl Recommendation {
  /// Build a recommendation from static text; usable in `const` items.
  pub const fn from_static(
    recommendation: &'static str,
    explanation: &'static str,
  ) -> Self {
    Self {
      recommendation: Cow::Borrowed(recommendation),
      explanation:    Cow::Borrowed(explanation),
    }
  }
}
