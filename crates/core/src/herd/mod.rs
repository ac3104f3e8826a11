// Herd module: individual records, the external lookup contract, and the
// in-memory reference registry.

pub mod individual;
pub mod registry;

pub use individual::{Individual, IndividualStore, Sex};
pub use registry::HerdRegistry;
