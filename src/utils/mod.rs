pub mod constants;
pub mod convexity;
pub mod predicates;
pub mod types;
