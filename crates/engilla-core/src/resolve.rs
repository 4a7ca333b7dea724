//! Resolve a set of selected conditions to one recommendation.
//!
//! Precedence, highest first:
//!
//! 1. no conditions → the manufacturer's specification;
//! 2. two or more conditions → one of the two named four-condition
//!    combinations when the set matches it exactly, else the mixed-conditions
//!    fallback;
//! 3. one condition → the [rule table](crate::rules) entry, else the
//!    mixed-conditions fallback.
//!
//! Selections are sets: order is irrelevant and duplicates collapse.

use std::collections::BTreeSet;

use crate::{
  condition::{ConditionTag, Recommendation},
  rules,
};

pub const MANUFACTURER_DEFAULT: Recommendation = Recommendation::from_static(
  "Go with Manufacturer's specification",
  "No specific conditions selected. Please refer to your vehicle's manual for the recommended oil type.",
);

pub const MIXED_CONDITIONS: Recommendation = Recommendation::from_static(
  "API SM, SN 5W-30, 5W-40, 10W-40",
  "High viscosity oils with good flow characteristics at low and high temperature, providing adequate protection under various operating conditions.",
);

/// Dusty, congested, cold, high-mileage driving.
pub const STRESSED_ENGINE: Recommendation = Recommendation::from_static(
  "API SM, SN 5w-30, 10w-30, 5w-40",
  "High viscosity oils, better engine protection against contaminants and wares. Good flow characteristics at low and high operating temperature in dusty, heavy traffic and engine stress conditions. Detergent additives in 5w-30 makes it more suitable to keep engine clean, and protect it against sludge buildup.",
);

/// Heavy loads on a mix of long and short trips, with a smoking engine.
pub const HEAVY_DUTY: Recommendation = Recommendation::from_static(
  "API SM, SN Thicker Engine oils: 10w-40, 15w-40. (Smokey: 20w 50, SAE 40)",
  "These oils are suitable for regular long or short trips. Better engine protection, Temperature stability, engine cleanness, corrosion prevention, engine better seal conditioning in a very heavy load environment. Contain additives that form protective layer on engine surface.",
);

const STRESSED_ENGINE_SET: [ConditionTag; 4] = [
  ConditionTag::Dusty,
  ConditionTag::HeavyTraffic,
  ConditionTag::Cold,
  ConditionTag::HighMileage,
];

const HEAVY_DUTY_SET: [ConditionTag; 4] = [
  ConditionTag::HeavyLoad,
  ConditionTag::LongTrips,
  ConditionTag::ShortTrips,
  ConditionTag::Smokey,
];

/// Pick the recommendation for a selection of conditions. Total: every input
/// resolves to something.
pub fn resolve<'a, I>(tags: I) -> Recommendation
where
  I: IntoIterator<Item = &'a ConditionTag>,
{
  let selected: BTreeSet<&ConditionTag> = tags.into_iter().collect();

  match selected.len() {
    0 => MANUFACTURER_DEFAULT,
    1 => selected
      .first()
      .and_then(|tag| rules::lookup(tag))
      .unwrap_or(MIXED_CONDITIONS),
    _ if is_exactly(&selected, &STRESSED_ENGINE_SET) => STRESSED_ENGINE,
    _ if is_exactly(&selected, &HEAVY_DUTY_SET) => HEAVY_DUTY,
    _ => MIXED_CONDITIONS,
  }
}

/// Set equality against a combination of distinct tags.
fn is_exactly(selected: &BTreeSet<&ConditionTag>, combo: &[ConditionTag]) -> bool {
  selected.len() == combo.len() && combo.iter().all(|tag| selected.contains(tag))
}
