pub mod insights;
pub mod kpis;
pub mod stats;

pub use insights::generate_insight;
pub use kpis::{compute_kpis, Kpis};
