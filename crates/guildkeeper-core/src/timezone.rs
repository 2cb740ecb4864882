//! Timezone inference from a single self-reported local-time sample.
//!
//! The member tells the bot what hour it is for them right now; subtracting
//! the current UTC hour gives an offset guess, which is matched against the
//! static catalog for suggestions. This is an approximation twice over: one
//! sample says nothing about DST, and zones sharing an offset cannot be
//! told apart. The presentation layer must let the member override.

use crate::catalog::timezone::regions;

/// A suggested zone for an inferred offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneSuggestion {
    pub zone_id: &'static str,
    pub country: &'static str,
}

/// Raw offset guess: `selected_local_hour - current_utc_hour`.
///
/// Deliberately NOT wrapped to a canonical range. When the two hours
/// straddle midnight the naive subtraction lands outside [-12, +14] (e.g.
/// local 1:00 against UTC 23:00 gives -22); callers normalize with
/// [`normalize_offset`] before matching catalog entries.
pub fn infer_offset(selected_local_hour: i32, current_utc_hour: i32) -> i32 {
    selected_local_hour - current_utc_hour
}

/// Wrap a raw offset into the catalog range [-12, +14].
pub fn normalize_offset(offset_hours: i32) -> i32 {
    let mut offset = offset_hours;
    while offset > 14 {
        offset -= 24;
    }
    while offset < -12 {
        offset += 24;
    }
    offset
}

/// Every catalog zone whose fixed offset equals `offset_hours` (normalized
/// first).
///
/// An empty result is a normal outcome -- the caller falls back to the
/// manual region -> country -> zone drill-down rather than presenting an
/// empty suggestion list.
pub fn suggest_timezones(offset_hours: i32) -> Vec<ZoneSuggestion> {
    let offset = normalize_offset(offset_hours);
    let mut suggestions = Vec::new();
    for region in regions() {
        for country in region.countries {
            for zone in country.zones {
                if zone.utc_offset == offset {
                    suggestions.push(ZoneSuggestion {
                        zone_id: zone.id,
                        country: country.name,
                    });
                }
            }
        }
    }
    suggestions
}
