//! Test utilities for the backend crate.
//!
//! Compiled with the `test-support` feature so integration tests under
//! `tests/` can drive the real services and handlers without PostgreSQL.

pub mod clock {
    //! A clock tests can move forward.

    use std::sync::{Arc, Mutex, PoisonError};

    use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
    use mockable::Clock;

    /// Shared, manually advanced clock.
    #[derive(Debug, Clone)]
    pub struct MutableClock {
        now: Arc<Mutex<DateTime<Utc>>>,
    }

    impl MutableClock {
        pub fn new(now: DateTime<Utc>) -> Self {
            Self {
                now: Arc::new(Mutex::new(now)),
            }
        }

        /// A clock starting at 2024-11-02T15:45:00Z.
        pub fn fixed() -> Self {
            let start = Utc
                .with_ymd_and_hms(2024, 11, 2, 15, 45, 0)
                .single()
                .expect("valid fixed clock time");
            Self::new(start)
        }

        pub fn advance(&self, by: TimeDelta) {
            let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
            *now += by;
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }
}

pub mod memory {
    //! In-memory adapters mirroring the PostgreSQL semantics: soft deletes,
    //! the one-active-RSVP-per-email rule and atomic change plus audit.

    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::domain::ports::{
        AuditLogRepository, AuditLogRepositoryError, ContentChange, ContentRepository,
        ContentRepositoryError, ContentStats, ModerationStats, PhotoStorage, PhotoStorageError,
        RsvpStats,
    };
    use crate::domain::{
        AttendanceStatus, AuditEntry, AuditPage, Message, Photo, Record, RecordKind, Rsvp, Wedding,
    };

    #[derive(Default)]
    struct State {
        /// Records in insertion order.
        records: Vec<Record>,
        /// Audit entries in insertion order.
        audit: Vec<AuditEntry>,
    }

    impl State {
        fn position(&self, kind: RecordKind, id: Uuid) -> Option<usize> {
            self.records
                .iter()
                .position(|record| record.kind() == kind && record.id() == id)
        }

        fn find(&self, kind: RecordKind, id: Uuid, deleted: bool) -> Option<Record> {
            self.position(kind, id)
                .map(|index| self.records[index].clone())
                .filter(|record| record.deleted_at().is_some() == deleted)
        }

        fn active(&self) -> impl Iterator<Item = &Record> {
            self.records
                .iter()
                .filter(|record| record.deleted_at().is_none())
        }

        /// Newest first; insertion order breaks ties.
        fn active_newest_first<T>(&self, pick: impl Fn(&Record) -> Option<T>) -> Vec<T> {
            let mut picked: Vec<(usize, &Record)> = self.active().enumerate().collect();
            picked.sort_by(|(ia, a), (ib, b)| {
                b.created_at().cmp(&a.created_at()).then(ib.cmp(ia))
            });
            picked.into_iter().filter_map(|(_, record)| pick(record)).collect()
        }

        fn email_taken(&self, rsvp: &Rsvp) -> bool {
            let Some(email) = rsvp.guest_email.as_deref() else {
                return false;
            };
            self.active().any(|record| match record {
                Record::Rsvp(other) => {
                    other.id != rsvp.id
                        && other.wedding_id == rsvp.wedding_id
                        && other
                            .guest_email
                            .as_deref()
                            .is_some_and(|other| other.eq_ignore_ascii_case(email))
                }
                _ => false,
            })
        }

        fn apply(&mut self, change: &ContentChange) -> Result<(), ContentRepositoryError> {
            let (kind, id) = change.target();
            match change {
                ContentChange::Create(record) => {
                    if self.position(kind, id).is_some() {
                        return Err(ContentRepositoryError::duplicate(format!("{kind} {id}")));
                    }
                    if let Record::Rsvp(rsvp) = record
                        && self.email_taken(rsvp)
                    {
                        return Err(ContentRepositoryError::duplicate("rsvps_active_email_key"));
                    }
                    self.records.push(record.clone());
                }
                ContentChange::Update(record) => {
                    let index = self.active_index(kind, id)?;
                    if let Record::Rsvp(rsvp) = record
                        && self.email_taken(rsvp)
                    {
                        return Err(ContentRepositoryError::duplicate("rsvps_active_email_key"));
                    }
                    self.records[index] = record.clone();
                }
                ContentChange::SoftDelete { at, .. } => {
                    let index = self.active_index(kind, id)?;
                    let record = self.records[index].clone();
                    self.records[index] = record.with_deleted_at(Some(*at), *at);
                }
                ContentChange::Restore { at, .. } => {
                    let index = self
                        .position(kind, id)
                        .filter(|index| self.records[*index].deleted_at().is_some())
                        .ok_or_else(|| ContentRepositoryError::not_found(kind, id))?;
                    let record = self.records[index].clone();
                    if let Record::Rsvp(rsvp) = &record
                        && self.email_taken(rsvp)
                    {
                        return Err(ContentRepositoryError::duplicate("rsvps_active_email_key"));
                    }
                    self.records[index] = record.with_deleted_at(None, *at);
                }
            }
            Ok(())
        }

        fn active_index(&self, kind: RecordKind, id: Uuid) -> Result<usize, ContentRepositoryError> {
            self.position(kind, id)
                .filter(|index| self.records[*index].deleted_at().is_none())
                .ok_or_else(|| ContentRepositoryError::not_found(kind, id))
        }

        fn audit_newest_first(&self) -> impl Iterator<Item = &AuditEntry> {
            let mut indexed: Vec<(usize, &AuditEntry)> = self.audit.iter().enumerate().collect();
            indexed.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));
            indexed.into_iter().map(|(_, entry)| entry)
        }
    }

    /// Content store and audit ledger sharing one lock.
    #[derive(Default)]
    pub struct InMemoryStore {
        state: Mutex<State>,
        unavailable: Mutex<bool>,
        rejecting_commits: Mutex<bool>,
    }

    impl InMemoryStore {
        /// A store holding `wedding`.
        pub fn with_wedding(wedding: Wedding) -> Self {
            let store = Self::default();
            store.lock().records.push(Record::Wedding(wedding));
            store
        }

        /// Insert a record directly, bypassing the audit ledger.
        pub fn seed(&self, record: impl Into<Record>) {
            self.lock().records.push(record.into());
        }

        /// Every audit entry in insertion order.
        pub fn audit_entries(&self) -> Vec<AuditEntry> {
            self.lock().audit.clone()
        }

        /// Stored state of a record, deleted or not.
        pub fn record(&self, kind: RecordKind, id: Uuid) -> Option<Record> {
            let state = self.lock();
            state.position(kind, id).map(|index| state.records[index].clone())
        }

        /// Make every call fail with a connection error.
        pub fn set_unavailable(&self, unavailable: bool) {
            *self.unavailable.lock().unwrap_or_else(PoisonError::into_inner) = unavailable;
        }

        /// Make `commit` fail while reads keep working.
        pub fn set_rejecting_commits(&self, rejecting: bool) {
            *self
                .rejecting_commits
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = rejecting;
        }

        fn lock(&self) -> MutexGuard<'_, State> {
            self.state.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn check_available(&self) -> Result<(), String> {
            if *self.unavailable.lock().unwrap_or_else(PoisonError::into_inner) {
                return Err("store offline".to_owned());
            }
            Ok(())
        }

        fn content_state(&self) -> Result<MutexGuard<'_, State>, ContentRepositoryError> {
            self.check_available()
                .map_err(ContentRepositoryError::connection)?;
            Ok(self.lock())
        }

        fn audit_state(&self) -> Result<MutexGuard<'_, State>, AuditLogRepositoryError> {
            self.check_available()
                .map_err(AuditLogRepositoryError::connection)?;
            Ok(self.lock())
        }
    }

    fn moderation_stats(approvals: impl Iterator<Item = bool>) -> ModerationStats {
        let (total, approved) = approvals.fold((0, 0), |(total, approved), is_approved| {
            (total + 1, approved + i64::from(is_approved))
        });
        ModerationStats::from_counts(total, approved)
    }

    #[async_trait]
    impl ContentRepository for InMemoryStore {
        async fn find_by_id(
            &self,
            kind: RecordKind,
            id: &Uuid,
        ) -> Result<Option<Record>, ContentRepositoryError> {
            Ok(self.content_state()?.find(kind, *id, false))
        }

        async fn find_deleted_by_id(
            &self,
            kind: RecordKind,
            id: &Uuid,
        ) -> Result<Option<Record>, ContentRepositoryError> {
            Ok(self.content_state()?.find(kind, *id, true))
        }

        async fn current_wedding(&self) -> Result<Option<Wedding>, ContentRepositoryError> {
            let state = self.content_state()?;
            let wedding = state
                .active()
                .filter_map(|record| match record {
                    Record::Wedding(wedding) => Some(wedding),
                    _ => None,
                })
                .min_by_key(|wedding| wedding.created_at)
                .cloned();
            Ok(wedding)
        }

        async fn find_rsvp_by_email(
            &self,
            wedding_id: &Uuid,
            email: &str,
        ) -> Result<Option<Rsvp>, ContentRepositoryError> {
            let state = self.content_state()?;
            let found = state.active().find_map(|record| match record {
                Record::Rsvp(rsvp)
                    if rsvp.wedding_id == *wedding_id
                        && rsvp
                            .guest_email
                            .as_deref()
                            .is_some_and(|stored| stored.eq_ignore_ascii_case(email)) =>
                {
                    Some(rsvp.clone())
                }
                _ => None,
            });
            Ok(found)
        }

        async fn list_rsvps(&self) -> Result<Vec<Rsvp>, ContentRepositoryError> {
            Ok(self.content_state()?.active_newest_first(|record| match record {
                Record::Rsvp(rsvp) => Some(rsvp.clone()),
                _ => None,
            }))
        }

        async fn list_messages(
            &self,
            approved_only: bool,
        ) -> Result<Vec<Message>, ContentRepositoryError> {
            Ok(self.content_state()?.active_newest_first(|record| match record {
                Record::Message(message) if message.is_approved || !approved_only => {
                    Some(message.clone())
                }
                _ => None,
            }))
        }

        async fn list_photos(
            &self,
            approved_only: bool,
        ) -> Result<Vec<Photo>, ContentRepositoryError> {
            Ok(self.content_state()?.active_newest_first(|record| match record {
                Record::Photo(photo) if photo.is_approved || !approved_only => Some(photo.clone()),
                _ => None,
            }))
        }

        async fn stats(&self) -> Result<ContentStats, ContentRepositoryError> {
            let state = self.content_state()?;
            let rsvps: Vec<&Rsvp> = state
                .active()
                .filter_map(|record| match record {
                    Record::Rsvp(rsvp) => Some(rsvp),
                    _ => None,
                })
                .collect();
            let attending: Vec<&&Rsvp> = rsvps
                .iter()
                .filter(|rsvp| rsvp.attendance_status == AttendanceStatus::Attending)
                .collect();
            Ok(ContentStats {
                rsvps: RsvpStats {
                    total: rsvps.len() as i64,
                    attending: attending.len() as i64,
                    total_guests: attending
                        .iter()
                        .map(|rsvp| i64::from(rsvp.number_of_guests))
                        .sum(),
                },
                messages: moderation_stats(state.active().filter_map(|record| match record {
                    Record::Message(message) => Some(message.is_approved),
                    _ => None,
                })),
                photos: moderation_stats(state.active().filter_map(|record| match record {
                    Record::Photo(photo) => Some(photo.is_approved),
                    _ => None,
                })),
            })
        }

        async fn commit(
            &self,
            change: &ContentChange,
            audit: &AuditEntry,
        ) -> Result<(), ContentRepositoryError> {
            if *self
                .rejecting_commits
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
            {
                return Err(ContentRepositoryError::query("commit rejected"));
            }
            let mut state = self.content_state()?;
            state.apply(change)?;
            state.audit.push(audit.clone());
            Ok(())
        }
    }

    #[async_trait]
    impl AuditLogRepository for InMemoryStore {
        async fn trail(
            &self,
            table_name: &str,
            record_id: &str,
        ) -> Result<Vec<AuditEntry>, AuditLogRepositoryError> {
            let state = self.audit_state()?;
            Ok(state
                .audit_newest_first()
                .filter(|entry| entry.table_name == table_name && entry.record_id == record_id)
                .cloned()
                .collect())
        }

        async fn recent(&self, limit: i64) -> Result<Vec<AuditEntry>, AuditLogRepositoryError> {
            let state = self.audit_state()?;
            let limit = usize::try_from(limit).unwrap_or(0);
            Ok(state.audit_newest_first().take(limit).cloned().collect())
        }

        async fn page(&self, limit: i64, offset: i64) -> Result<AuditPage, AuditLogRepositoryError> {
            let state = self.audit_state()?;
            let limit = usize::try_from(limit).unwrap_or(0);
            let offset = usize::try_from(offset).unwrap_or(0);
            Ok(AuditPage {
                entries: state
                    .audit_newest_first()
                    .skip(offset)
                    .take(limit)
                    .cloned()
                    .collect(),
                total: state.audit.len() as i64,
            })
        }
    }

    /// Photo bytes kept in a map keyed by filename.
    #[derive(Default)]
    pub struct InMemoryPhotoStorage {
        files: Mutex<HashMap<String, Vec<u8>>>,
        failing: Mutex<bool>,
    }

    impl InMemoryPhotoStorage {
        /// Make `store` fail with an I/O error.
        pub fn set_failing(&self, failing: bool) {
            *self.failing.lock().unwrap_or_else(PoisonError::into_inner) = failing;
        }

        pub fn contains(&self, filename: &str) -> bool {
            self.files().contains_key(filename)
        }

        pub fn len(&self) -> usize {
            self.files().len()
        }

        pub fn is_empty(&self) -> bool {
            self.files().is_empty()
        }

        fn files(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
            self.files.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    #[async_trait]
    impl PhotoStorage for InMemoryPhotoStorage {
        async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, PhotoStorageError> {
            if *self.failing.lock().unwrap_or_else(PoisonError::into_inner) {
                return Err(PhotoStorageError::io("disk full"));
            }
            self.files().insert(filename.to_owned(), bytes.to_vec());
            Ok(format!("uploads/{filename}"))
        }

        async fn remove(&self, filename: &str) -> Result<(), PhotoStorageError> {
            self.files().remove(filename);
            Ok(())
        }
    }
}

pub mod fixtures {
    //! Records and credentials shared by integration tests.

    use std::sync::OnceLock;

    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
    use uuid::Uuid;

    use crate::domain::{Wedding, hash_admin_password};

    /// Admin password accepted by [`super::http::TestApp`].
    pub const ADMIN_PASSWORD: &str = "wedding2024";

    /// Argon2 hash of [`ADMIN_PASSWORD`], computed once per process.
    pub fn admin_password_hash() -> String {
        static HASH: OnceLock<String> = OnceLock::new();
        HASH.get_or_init(|| hash_admin_password(ADMIN_PASSWORD).expect("hash admin password"))
            .clone()
    }

    pub fn wedding_id() -> Uuid {
        Uuid::from_u128(0x5eed)
    }

    /// The seeded wedding.
    pub fn wedding() -> Wedding {
        let created = Utc
            .with_ymd_and_hms(2024, 6, 1, 9, 0, 0)
            .single()
            .expect("valid creation time");
        Wedding {
            id: wedding_id(),
            bride_name: "Sarah Johnson".to_owned(),
            groom_name: "Michael Davis".to_owned(),
            wedding_date: NaiveDate::from_ymd_opt(2024, 12, 15).expect("valid date"),
            wedding_time: NaiveTime::from_hms_opt(16, 0, 0),
            venue_name: "Grand Garden Hotel".to_owned(),
            venue_address: "123 Garden Lane, Springfield".to_owned(),
            ceremony_time: NaiveTime::from_hms_opt(16, 0, 0),
            ceremony_location: Some("Rose Garden".to_owned()),
            reception_time: NaiveTime::from_hms_opt(18, 0, 0),
            reception_location: Some("Grand Ballroom".to_owned()),
            created_at: created,
            updated_at: created,
            deleted_at: None,
        }
    }
}

pub mod http {
    //! Real services and handlers over the in-memory adapters.

    use std::sync::Arc;

    use actix_web::body::MessageBody;
    use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
    use actix_web::{App, web};
    use mockable::Clock;
    use zeroize::Zeroizing;

    use super::clock::MutableClock;
    use super::fixtures::{admin_password_hash, wedding};
    use super::memory::{InMemoryPhotoStorage, InMemoryStore};
    use crate::Trace;
    use crate::domain::{
        AccessGate, AdminQueryService, AuthConfig, DEFAULT_TOKEN_TTL, GuestService,
        ModerationService,
    };
    use crate::inbound::http::state::{HttpState, HttpStatePorts};
    use crate::inbound::http::validation::configure_extractors;
    use crate::inbound::http::{admin, guest};

    /// Handles to the adapters behind a test application.
    #[derive(Clone)]
    pub struct TestApp {
        pub store: Arc<InMemoryStore>,
        pub storage: Arc<InMemoryPhotoStorage>,
        pub clock: MutableClock,
        pub max_upload_bytes: u64,
        state: HttpState,
    }

    impl TestApp {
        /// Seeded wedding, empty ledger, fixed clock.
        pub fn new(max_upload_bytes: u64) -> Self {
            let store = Arc::new(InMemoryStore::with_wedding(wedding()));
            let storage = Arc::new(InMemoryPhotoStorage::default());
            let clock = MutableClock::fixed();
            let shared_clock: Arc<dyn Clock> = Arc::new(clock.clone());

            let access = Arc::new(
                AccessGate::new(
                    AuthConfig {
                        admin_password_hash: Zeroizing::new(admin_password_hash()),
                        signing_secret: Zeroizing::new(b"integration-secret".to_vec()),
                        token_ttl: DEFAULT_TOKEN_TTL,
                    },
                    Arc::clone(&shared_clock),
                )
                .expect("valid auth config"),
            );
            let guest_service = Arc::new(
                GuestService::new(Arc::clone(&store), Arc::clone(&storage), Arc::clone(&shared_clock))
                    .with_max_upload_bytes(max_upload_bytes),
            );
            let state = HttpState::new(
                access,
                HttpStatePorts {
                    moderation: Arc::new(ModerationService::new(Arc::clone(&store), shared_clock)),
                    admin_query: Arc::new(AdminQueryService::new(
                        Arc::clone(&store),
                        Arc::clone(&store),
                    )),
                    guest_command: guest_service.clone(),
                    guest_query: guest_service,
                },
            );

            Self {
                store,
                storage,
                clock,
                max_upload_bytes,
                state,
            }
        }

        /// Actix application with the production route layout.
        pub fn app(
            &self,
        ) -> App<
            impl ServiceFactory<
                ServiceRequest,
                Config = (),
                Response = ServiceResponse<impl MessageBody + use<>>,
                Error = actix_web::Error,
                InitError = (),
            > + use<>,
        > {
            App::new()
                .app_data(web::Data::new(self.state.clone()))
                .wrap(Trace)
                .configure(configure_extractors)
                .configure(admin::configure)
                .configure(guest::configure(self.max_upload_bytes))
        }
    }
}

pub mod storage {
    //! Directory-backed photo storage rooted in a temporary directory.

    use tempfile::TempDir;

    use crate::outbound::storage::DirPhotoStorage;

    /// Storage plus the directory guard keeping it alive.
    pub fn temp_photo_storage() -> (TempDir, DirPhotoStorage) {
        let root = tempfile::tempdir().expect("temp dir");
        let storage = DirPhotoStorage::open(root.path().join("uploads")).expect("open storage");
        (root, storage)
    }
}
