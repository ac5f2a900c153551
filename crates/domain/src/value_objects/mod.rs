//! Value Objects - Immutable, identity-less domain primitives

mod geo_location;
mod record_id;
mod timezone;

pub use geo_location::GeoLocation;
pub use record_id::RecordId;
pub use timezone::Timezone;
