/// The scalar type used for coefficients and percentages.
pub type Scalar = f64;

/// Identifier for an individual bird. Ids are assigned by the surrounding
/// application; this crate treats them as opaque strings.
pub type IndividualId = String;
