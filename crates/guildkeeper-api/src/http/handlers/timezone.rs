//! Timezone helper endpoints for the presentation layer.
//!
//! The chat layer asks the member "what time is it for you right now?",
//! calls `/timezone/suggest` with that hour, and shows the candidates. An
//! empty suggestion list means it must fall back to the manual
//! region/country drill-down served by `/timezone/regions`.

use axum::Json;
use axum::extract::Query;
use chrono::{Timelike, Utc};
use serde::{Deserialize, Serialize};

use guildkeeper_core::catalog::timezone as tz_catalog;
use guildkeeper_core::timezone::{infer_offset, normalize_offset, suggest_timezones};

use crate::http::error::AppError;

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    /// The member's self-reported current local hour (0-23).
    pub local_hour: i32,
}

#[derive(Debug, Serialize)]
pub struct Suggestion {
    pub zone_id: &'static str,
    pub country: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    /// The normalized UTC offset the suggestions are based on.
    pub offset_hours: i32,
    pub suggestions: Vec<Suggestion>,
    /// True when no catalog zone matches; the caller must use the manual
    /// drill-down instead of presenting an empty list.
    pub fallback_required: bool,
}

/// GET /api/v1/timezone/suggest?local_hour=18
///
/// Offset inference from one sample is approximate (no DST awareness,
/// shared offsets are ambiguous); the member must be able to override.
pub async fn suggest(
    Query(query): Query<SuggestQuery>,
) -> Result<Json<SuggestResponse>, AppError> {
    if !(0..24).contains(&query.local_hour) {
        return Err(AppError::Validation(format!(
            "local_hour must be 0-23, got {}",
            query.local_hour
        )));
    }

    let utc_hour = Utc::now().hour() as i32;
    let offset = normalize_offset(infer_offset(query.local_hour, utc_hour));
    let suggestions: Vec<Suggestion> = suggest_timezones(offset)
        .into_iter()
        .map(|s| Suggestion {
            zone_id: s.zone_id,
            country: s.country,
        })
        .collect();

    let fallback_required = suggestions.is_empty();
    Ok(Json(SuggestResponse {
        offset_hours: offset,
        suggestions,
        fallback_required,
    }))
}

#[derive(Debug, Serialize)]
pub struct ZoneEntry {
    pub zone_id: &'static str,
    pub utc_offset: i32,
}

#[derive(Debug, Serialize)]
pub struct CountryEntry {
    pub name: &'static str,
    pub zones: Vec<ZoneEntry>,
}

#[derive(Debug, Serialize)]
pub struct RegionEntry {
    pub name: &'static str,
    pub countries: Vec<CountryEntry>,
}

/// GET /api/v1/timezone/regions - The manual drill-down catalog.
pub async fn regions() -> Json<Vec<RegionEntry>> {
    let regions = tz_catalog::regions()
        .iter()
        .map(|region| RegionEntry {
            name: region.name,
            countries: region
                .countries
                .iter()
                .map(|country| CountryEntry {
                    name: country.name,
                    zones: country
                        .zones
                        .iter()
                        .map(|zone| ZoneEntry {
                            zone_id: zone.id,
                            utc_offset: zone.utc_offset,
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();
    Json(regions)
}
