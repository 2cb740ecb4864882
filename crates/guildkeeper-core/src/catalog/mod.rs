//! Static lookup tables: classes, ability-score bands, timezones.
//!
//! All tables are compiled in and immutable. The guild list is the one
//! catalog that is NOT static -- it comes from configuration and is handed
//! to the wizard engine at construction.

pub mod ability;
pub mod class;
pub mod timezone;

pub use ability::{AbilityBand, band_for_label, bands, label_for_value};
pub use class::{ClassInfo, class_by_name, classes};
pub use timezone::{Country, Region, Zone, regions, zone_by_id};
