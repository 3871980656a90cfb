//! Guest-facing use-cases: RSVPs, guestbook messages and photo uploads.
//!
//! Every accepted submission is committed together with a `CREATE` ledger
//! entry attributed to the guest.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use rand::Rng;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    ContentChange, ContentRepository, GuestCommand, GuestQuery, PhotoStorage,
};
use crate::domain::repository_errors::{map_commit_error, map_content_error, map_storage_error};
use crate::domain::{
    AuditAction, AuditDraft, AuditRecorder, DEFAULT_MAX_UPLOAD_BYTES, Error, ErrorCode, Message,
    MessageSubmission, Photo, PhotoUpload, Record, RecordKind, RequestActor, Rsvp, RsvpSubmission,
    Wedding,
};

/// Guest service implementing [`GuestCommand`] and [`GuestQuery`].
#[derive(Clone)]
pub struct GuestService<R, S> {
    content: Arc<R>,
    storage: Arc<S>,
    recorder: AuditRecorder,
    clock: Arc<dyn Clock>,
    max_upload_bytes: u64,
}

impl<R, S> GuestService<R, S> {
    /// Create the service with the default upload limit.
    pub fn new(content: Arc<R>, storage: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            content,
            storage,
            recorder: AuditRecorder::new(Arc::clone(&clock)),
            clock,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Override the largest accepted upload.
    #[must_use]
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

impl<R, S> GuestService<R, S>
where
    R: ContentRepository,
    S: PhotoStorage,
{
    async fn ensure_wedding(&self, wedding_id: Uuid) -> Result<(), Error> {
        self.content
            .find_by_id(RecordKind::Wedding, &wedding_id)
            .await
            .map_err(map_content_error)?
            .map(|_| ())
            .ok_or_else(|| Error::from_code(ErrorCode::WeddingNotFound))
    }

    async fn create(&self, actor: &RequestActor, record: Record, operation: &str) -> Result<(), Error> {
        let draft = AuditDraft::between(
            AuditAction::Create,
            None,
            Some(&record),
            json!({ "operation": operation }),
        )?;
        let entry = self.recorder.entry(draft, actor);
        let change = ContentChange::Create(record);
        self.content
            .commit(&change, &entry)
            .await
            .map_err(map_commit_error(&change))
    }

    async fn discard_upload(&self, filename: &str) {
        if let Err(error) = self.storage.remove(filename).await {
            warn!(%filename, error = %error, "failed to remove orphaned upload");
        }
    }
}

#[async_trait]
impl<R, S> GuestCommand for GuestService<R, S>
where
    R: ContentRepository,
    S: PhotoStorage,
{
    async fn submit_rsvp(
        &self,
        actor: &RequestActor,
        submission: RsvpSubmission,
    ) -> Result<Rsvp, Error> {
        let valid = submission.validated()?;
        self.ensure_wedding(valid.wedding_id).await?;
        if let Some(email) = valid.guest_email.as_deref() {
            let existing = self
                .content
                .find_rsvp_by_email(&valid.wedding_id, email)
                .await
                .map_err(map_content_error)?;
            if existing.is_some() {
                return Err(Error::from_code(ErrorCode::RsvpAlreadyExists));
            }
        }

        let rsvp = valid.into_rsvp(Uuid::new_v4(), self.clock.utc());
        self.create(actor, Record::Rsvp(rsvp.clone()), "submit_rsvp")
            .await?;
        info!(
            rsvp_id = %rsvp.id,
            attendance = rsvp.attendance_status.as_str(),
            "rsvp recorded"
        );
        Ok(rsvp)
    }

    async fn submit_message(
        &self,
        actor: &RequestActor,
        submission: MessageSubmission,
    ) -> Result<Message, Error> {
        let submission = submission.validated()?;
        self.ensure_wedding(submission.wedding_id).await?;

        let message = submission.into_message(Uuid::new_v4(), self.clock.utc());
        self.create(actor, Record::Message(message.clone()), "submit_message")
            .await?;
        info!(message_id = %message.id, "guestbook message awaiting approval");
        Ok(message)
    }

    async fn upload_photo(&self, actor: &RequestActor, upload: PhotoUpload) -> Result<Photo, Error> {
        let upload = upload.validated(self.max_upload_bytes)?;
        self.ensure_wedding(upload.details.wedding_id).await?;

        let at = self.clock.utc();
        let filename = upload.generated_filename(at, rand::thread_rng().r#gen());
        let file_path = self
            .storage
            .store(&filename, &upload.bytes)
            .await
            .map_err(map_storage_error)?;
        let photo = upload.into_photo(Uuid::new_v4(), filename.clone(), file_path, at);

        if let Err(error) = self
            .create(actor, Record::Photo(photo.clone()), "upload_photo")
            .await
        {
            self.discard_upload(&filename).await;
            return Err(if error.code().is_internal() {
                Error::new(ErrorCode::PhotoUploadFailed, "Photo upload failed")
            } else {
                error
            });
        }
        info!(photo_id = %photo.id, size = photo.file_size, "photo awaiting approval");
        Ok(photo)
    }
}

#[async_trait]
impl<R, S> GuestQuery for GuestService<R, S>
where
    R: ContentRepository,
    S: PhotoStorage,
{
    async fn wedding(&self) -> Result<Wedding, Error> {
        self.content
            .current_wedding()
            .await
            .map_err(map_content_error)?
            .ok_or_else(|| Error::from_code(ErrorCode::WeddingNotFound))
    }

    async fn approved_messages(&self) -> Result<Vec<Message>, Error> {
        self.content
            .list_messages(true)
            .await
            .map_err(map_content_error)
    }

    async fn approved_photos(&self) -> Result<Vec<Photo>, Error> {
        self.content
            .list_photos(true)
            .await
            .map_err(map_content_error)
    }
}

#[cfg(test)]
#[path = "guest_service_tests.rs"]
mod tests;
