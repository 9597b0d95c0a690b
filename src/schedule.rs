//! Weekly schedule resolution
//!
//! Given the current instant, a vehicle's recurring weekly rules and its
//! default SOC, work out the single nearest charge deadline and the SOC to
//! reach by then. Everything here is a pure function of its arguments: the
//! clock reading and the timezone are passed in, nothing is cached between
//! calls, and it is safe to call from any number of tasks at once.
//!
//! - `days`: day tokens (`monday`, `workday`, `weekend`, ...) to weekdays
//! - `occurrence`: next instant of one weekday + time-of-day in a zone
//! - `resolver`: earliest candidate over all rules, with stable tie-break

pub mod days;
pub mod occurrence;
pub mod resolver;


pub use days::resolve_days;
pub use occurrence::{next_occurrence, parse_time_of_day};
pub use resolver::{ResolvedPlan, resolve_next};
