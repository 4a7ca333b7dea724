//! The single-condition rule table.
//!
//! Seven hand-authored entries, one per driving condition. `high_mileage` has
//! no single-condition entry; it only matters as part of a combination (see
//! [`crate::resolve`]).

use crate::condition::{ConditionTag, Recommendation};

pub const DUSTY: Recommendation = Recommendation::from_static(
  "API SM, SN OR API SN PLUS 5W-30, 0W-40, 15W-40",
  "High viscosity oils, better protection against contaminants and engine wear. Viscosity grades offer a good balance between flow characteristics at low temperature and protection at high temperature essential for dusty conditions.",
);

pub const HEAVY_TRAFFIC: Recommendation = Recommendation::from_static(
  "API SM, SN 5W-30, 10W-30, 0W-40 10W-40 15W-40, (SYNTHETIC: OPTIONAL),(OIL BRAND: OPTIONAL)",
  "High viscosity index enhancer and detergent additives. These oils offer better engine protection, Temperature stability, engine cleanness, corrosion prevention and engine better seal conditioning.",
);

pub const COLD: Recommendation = Recommendation::from_static(
  "API SM, SN 0W-40, 5W-40, (0W-50 EXTREME COLD)",
  "Suitable for both cold starts and high temperature operation, good flow in cold weather while maintaining stability at high temperature. SYNTHETIC: OPTIONAL | OIL BRAND: OPTIONAL",
);

pub const HEAVY_LOAD: Recommendation = Recommendation::from_static(
  "API SM, API SN 10W-40, 15W-40, 20W-50, SAE 40, High viscosity oils",
  "(Trucks and Buses and Towing vehicle) good cold start capabilities formulated with additives to withstand additional stress and heat generated by heavy loads and extended driving period.",
);

pub const LONG_TRIPS: Recommendation = Recommendation::from_static(
  "API SM/API SN 5W-30, 10W-40, 15w 40. High viscosity oils.",
  "Driving for extended period offers good flow characteristics at low temperature while providing adequate viscosity at higher temperature to maintain proper lubrication for better protection against heat and engine wear during extended periods of driving. SYNTHETIC OIL: OPTIONAL | OIL BRAND: OPTIONAL",
);

pub const SHORT_TRIPS: Recommendation = Recommendation::from_static(
  "API SM, API SN 5W-30, 5W-40, 10W-30",
  "Frequent short trips can lead to increased moisture build up in the oil. Lower viscosity oil with good detergent properties is required to combat sludge formation and ensure proper lubrication during cold start and short operating cycles. 5w-30 oil is perfect, flows well at lower temperatures providing adequate protection during short trips, frequent starts and stops.",
);

pub const SMOKEY: Recommendation = Recommendation::from_static(
  "API SM, API SN 10W-30, 10W-40, 20W-50, SAE 40",
  "high viscosity oils to reduce oil consumption and smoke, compensate for engine wear, and maintain proper lubrication. Good flow characteristics at low temperature, provides adequate protection under normal driving conditions. Engine diagnosis may be your best option.",
);

/// Look up the recommendation for a single condition.
///
/// Returns `None` for `high_mileage` and for unrecognised tags.
pub fn lookup(tag: &ConditionTag) -> Option<Recommendation> {
  let rec = match tag {
    ConditionTag::Dusty => DUSTY,
    ConditionTag::HeavyTraffic => HEAVY_TRAFFIC,
    ConditionTag::Cold => COLD,
    ConditionTag::HeavyLoad => HEAVY_LOAD,
    ConditionTag::LongTrips => LONG_TRIPS,
    ConditionTag::ShortTrips => SHORT_TRIPS,
    ConditionTag::Smokey => SMOKEY,
    ConditionTag::HighMileage | ConditionTag::Unrecognized(_) => return None,
  };
  Some(rec)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn seven_conditions_have_entries() {
    let covered = ConditionTag::KNOWN
      .iter()
      .filter(|t| lookup(t).is_some())
      .count();
    assert_eq!(covered, 7);
  }

  #[test]
  fn high_mileage_alone_has_no_entry() {
    assert!(lookup(&ConditionTag::HighMileage).is_none());
  }

  #[test]
  fn unrecognized_has_no_entry() {
    assert!(lookup(&ConditionTag::parse("icy")).is_none());
  }

  #[test]
  fn cold_maps_to_cold_entry() {
    let rec = lookup(&ConditionTag::Cold).unwrap();
    assert!(rec.recommendation.contains("0W-50 EXTREME COLD"));
  }
}
