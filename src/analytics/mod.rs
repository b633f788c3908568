pub mod anomalies;
pub mod forecasting;
pub mod segmentation;

pub use anomalies::{detect_sales_anomalies, SalesAnomaly};
pub use forecasting::{forecast_sales, ForecastOutput, ForecastPoint};
pub use segmentation::{segment_customers, CustomerSegment, SegmentationOutput, SegmentSummary};
