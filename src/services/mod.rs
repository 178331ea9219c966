pub mod availability_prober;
pub mod download_reconciler;

pub use availability_prober::{Availability, AvailabilityProber, ERROR_BANNER};
pub use download_reconciler::{DirectorySnapshot, DownloadCandidate, DownloadReconciler};
