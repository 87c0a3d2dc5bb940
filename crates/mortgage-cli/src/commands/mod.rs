pub mod calculators;
pub mod pipeline;
