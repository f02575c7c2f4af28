pub mod julian;

pub use julian::{
    days_since_j2000, fix_hour, julian_day, local_instant, modified_julian_day, TimeRounding,
    J2000, MJD_OFFSET,
};
