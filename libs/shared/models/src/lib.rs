pub mod envelope;
pub mod error;
pub mod loose;
pub mod notice;
pub mod role;

pub use envelope::ApiEnvelope;
pub use error::PanelError;
pub use loose::{null_as_default, LooseValue};
pub use notice::{report_failure, Notice, NoticeLevel, Notifier, RecordingNotifier};
pub use role::Role;
