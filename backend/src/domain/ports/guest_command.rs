//! Driving port for guest submissions.

use async_trait::async_trait;

use crate::domain::{
    Error, Message, MessageSubmission, Photo, PhotoUpload, RequestActor, Rsvp, RsvpSubmission,
};

/// Port for guest write use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuestCommand: Send + Sync {
    /// Record an RSVP.
    async fn submit_rsvp(
        &self,
        actor: &RequestActor,
        submission: RsvpSubmission,
    ) -> Result<Rsvp, Error>;

    /// Record a guestbook message awaiting approval.
    async fn submit_message(
        &self,
        actor: &RequestActor,
        submission: MessageSubmission,
    ) -> Result<Message, Error>;

    /// Store an uploaded photo awaiting approval.
    async fn upload_photo(&self, actor: &RequestActor, upload: PhotoUpload)
    -> Result<Photo, Error>;
}
