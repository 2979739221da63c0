pub mod error;
pub mod model;

pub use error::AppError;
pub use model::{Affordance, DownloadRecord, Platform, RecordId, RecordStatus, ResolvedDownload};
