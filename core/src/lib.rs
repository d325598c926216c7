pub mod metrics;

pub use metrics::{MetricsSink, NoOpMetrics, StopTimer, ValidatorStatus};
