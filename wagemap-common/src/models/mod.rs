//! Canonical data models shared across pipeline stages

pub mod geo;
pub mod observation;
pub mod occupation;
pub mod records;

pub use geo::{GeoKind, GeographicEntity};
pub use observation::SeriesObservation;
pub use occupation::{MajorGroup, OccupationRecord, WagePercentiles};
pub use records::{
    CountyRecord, CpiRow, DemographicsRow, EarningsRow, IncomeRow, JoltsRow, LaborForceRow,
    MetroRecord, NationalSnapshot, ProjectionRow, StateRecord,
};
