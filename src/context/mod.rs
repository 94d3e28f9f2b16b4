//! Context domain: frames, exception metadata, the merge engine and the merged record.
//! Pure data and functions; emitters and renderers consume these via explicit contracts.

pub mod exception;
pub mod frame;
pub mod merge;
pub mod record;

pub use exception::ExceptionInfo;
pub use frame::{ContextFrame, FrameSource};
pub use merge::{merge, merge_context, Reserved, RESERVED_KEYS};
pub use record::{check_datefmt, MergedRecord};
