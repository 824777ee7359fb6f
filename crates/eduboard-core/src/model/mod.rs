mod ai_job;
mod assignment;
mod course;
mod event;
mod nullable;
pub mod timestamp;
mod user;

pub use ai_job::*;
pub use assignment::*;
pub use course::*;
pub use event::*;
pub use user::*;

/// Overwrite `slot` when the patch carries a value; leave it alone otherwise.
pub(crate) fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}
