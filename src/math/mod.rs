pub mod anomaly;
pub mod geometry;
pub mod root_finding;
