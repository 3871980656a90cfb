//! Approval state shared by moderated guest content.

use chrono::{DateTime, Utc};

/// Content that must be approved before it appears publicly.
///
/// ## Invariants
/// - `approved_at` is `Some` exactly when the record is approved.
/// - Re-approving moves `approved_at` to the new decision time.
pub trait Approvable {
    /// Current approval flag.
    fn is_approved(&self) -> bool;

    /// Record a moderation decision taken at `at`.
    fn set_approval(&mut self, approved: bool, at: DateTime<Utc>);
}

/// Expand an [`Approvable`] impl for a struct with `is_approved`,
/// `approved_at` and `updated_at` fields.
macro_rules! impl_approvable {
    ($ty:ty) => {
        impl $crate::domain::approval::Approvable for $ty {
            fn is_approved(&self) -> bool {
                self.is_approved
            }

            fn set_approval(&mut self, approved: bool, at: ::chrono::DateTime<::chrono::Utc>) {
                self.is_approved = approved;
                self.approved_at = approved.then_some(at);
                self.updated_at = at;
            }
        }
    };
}

pub(crate) use impl_approvable;
