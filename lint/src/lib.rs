pub mod checks;
pub mod query;
pub mod violation;

pub use checks::validate;
pub use query::{Find, find};
pub use violation::{Violation, ViolationKind, report};
