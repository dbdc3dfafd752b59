pub mod liveness;
pub mod normalize;
pub mod scan;

pub use liveness::{Liveness, LivenessChecker, StoredStatusChecker};
pub use normalize::normalize_url;
pub use scan::{run_scan, CancelToken, ScanContext, ScanProgressEvent, ScanReport};
