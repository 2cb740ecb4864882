//! Region -> country -> timezone catalog.
//!
//! Offsets are fixed integers and do not track daylight-saving transitions.
//! That makes offset-based suggestions an approximation: a zone's real
//! offset can differ for part of the year, and several zones share an
//! offset. The presentation layer must always let the member override a
//! suggestion via the manual region/country drill-down.

/// One timezone entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    /// IANA zone identifier stored on the timezone assignment.
    pub id: &'static str,
    /// Fixed integer UTC offset in hours (non-DST-aware).
    pub utc_offset: i32,
}

/// A country (or country subdivision) with its zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub name: &'static str,
    pub zones: &'static [Zone],
}

/// A coarse region grouping for the drill-down path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub countries: &'static [Country],
}

const REGIONS: &[Region] = &[
    Region {
        name: "Asia (East)",
        countries: &[
            Country { name: "Japan", zones: &[Zone { id: "Asia/Tokyo", utc_offset: 9 }] },
            Country { name: "South Korea", zones: &[Zone { id: "Asia/Seoul", utc_offset: 9 }] },
            Country { name: "China", zones: &[Zone { id: "Asia/Shanghai", utc_offset: 8 }] },
            Country { name: "Taiwan", zones: &[Zone { id: "Asia/Taipei", utc_offset: 8 }] },
            Country { name: "Philippines", zones: &[Zone { id: "Asia/Manila", utc_offset: 8 }] },
            Country { name: "Singapore", zones: &[Zone { id: "Asia/Singapore", utc_offset: 8 }] },
        ],
    },
    Region {
        name: "Asia (South & Central)",
        countries: &[
            Country { name: "Pakistan", zones: &[Zone { id: "Asia/Karachi", utc_offset: 5 }] },
            Country { name: "Bangladesh", zones: &[Zone { id: "Asia/Dhaka", utc_offset: 6 }] },
            Country { name: "Thailand", zones: &[Zone { id: "Asia/Bangkok", utc_offset: 7 }] },
            Country { name: "Vietnam", zones: &[Zone { id: "Asia/Ho_Chi_Minh", utc_offset: 7 }] },
        ],
    },
    Region {
        name: "Middle East",
        countries: &[
            Country { name: "United Arab Emirates", zones: &[Zone { id: "Asia/Dubai", utc_offset: 4 }] },
            Country { name: "Saudi Arabia", zones: &[Zone { id: "Asia/Riyadh", utc_offset: 3 }] },
            Country { name: "Turkey", zones: &[Zone { id: "Europe/Istanbul", utc_offset: 3 }] },
        ],
    },
    Region {
        name: "Europe (West)",
        countries: &[
            Country { name: "United Kingdom", zones: &[Zone { id: "Europe/London", utc_offset: 0 }] },
            Country { name: "Ireland", zones: &[Zone { id: "Europe/Dublin", utc_offset: 0 }] },
            Country { name: "Portugal", zones: &[Zone { id: "Europe/Lisbon", utc_offset: 0 }] },
        ],
    },
    Region {
        name: "Europe (Central)",
        countries: &[
            Country { name: "Germany", zones: &[Zone { id: "Europe/Berlin", utc_offset: 1 }] },
            Country { name: "France", zones: &[Zone { id: "Europe/Paris", utc_offset: 1 }] },
            Country { name: "Netherlands", zones: &[Zone { id: "Europe/Amsterdam", utc_offset: 1 }] },
            Country { name: "Poland", zones: &[Zone { id: "Europe/Warsaw", utc_offset: 1 }] },
            Country { name: "Sweden", zones: &[Zone { id: "Europe/Stockholm", utc_offset: 1 }] },
        ],
    },
    Region {
        name: "Europe (East)",
        countries: &[
            Country { name: "Finland", zones: &[Zone { id: "Europe/Helsinki", utc_offset: 2 }] },
            Country { name: "Greece", zones: &[Zone { id: "Europe/Athens", utc_offset: 2 }] },
            Country { name: "Ukraine", zones: &[Zone { id: "Europe/Kyiv", utc_offset: 2 }] },
        ],
    },
    Region {
        name: "America (North)",
        countries: &[
            Country { name: "United States (East)", zones: &[Zone { id: "America/New_York", utc_offset: -5 }] },
            Country { name: "United States (Central)", zones: &[Zone { id: "America/Chicago", utc_offset: -6 }] },
            Country { name: "United States (Mountain)", zones: &[Zone { id: "America/Denver", utc_offset: -7 }] },
            Country { name: "United States (West)", zones: &[Zone { id: "America/Los_Angeles", utc_offset: -8 }] },
            Country { name: "Canada (East)", zones: &[Zone { id: "America/Toronto", utc_offset: -5 }] },
            Country { name: "Mexico", zones: &[Zone { id: "America/Mexico_City", utc_offset: -6 }] },
        ],
    },
    Region {
        name: "America (South)",
        countries: &[
            Country { name: "Brazil", zones: &[Zone { id: "America/Sao_Paulo", utc_offset: -3 }] },
            Country { name: "Argentina", zones: &[Zone { id: "America/Argentina/Buenos_Aires", utc_offset: -3 }] },
            Country { name: "Chile", zones: &[Zone { id: "America/Santiago", utc_offset: -4 }] },
            Country { name: "Peru", zones: &[Zone { id: "America/Lima", utc_offset: -5 }] },
        ],
    },
    Region {
        name: "Oceania",
        countries: &[
            Country { name: "Australia (East)", zones: &[Zone { id: "Australia/Sydney", utc_offset: 10 }] },
            Country { name: "Australia (West)", zones: &[Zone { id: "Australia/Perth", utc_offset: 8 }] },
            Country { name: "New Zealand", zones: &[Zone { id: "Pacific/Auckland", utc_offset: 12 }] },
        ],
    },
];

/// All regions, in display order.
pub fn regions() -> &'static [Region] {
    REGIONS
}

/// Look up a zone by its IANA identifier.
pub fn zone_by_id(id: &str) -> Option<(&'static Country, &'static Zone)> {
    for region in REGIONS {
        for country in region.countries {
            for zone in country.zones {
                if zone.id == id {
                    return Some((country, zone));
                }
            }
        }
    }
    None
}
