//! Badge issuing: generate, regenerate and download
//!
//! Each operation runs its steps in order and stops at the first failure.
//! A new number is claimed in the database before its image is uploaded, so
//! an object key only ever belongs to one registration. A registration only
//! counts as badged once the final database update succeeds.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    badge::{self, BadgeNumberAllocator, Photo},
    error::{AppError, AppResult},
    models::{BadgeNumber, BadgeResponse, BadgeState, Registration},
};

use super::storage::BucketStore;

const PNG_CONTENT_TYPE: &str = "image/png";

/// Claims tried before giving up when other writers keep taking numbers
const CLAIM_ATTEMPTS: usize = 5;

/// Registration store as seen by the badge pipeline
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgeLedger: Send + Sync {
    async fn registration(&self, id: Uuid) -> AppResult<Registration>;

    /// Highest issued or claimed sequence for `prefix`
    async fn last_sequence(&self, prefix: &str) -> AppResult<Option<u32>>;

    /// Reserve `number` for registration `id`. Returns `false` when the
    /// number is already claimed or issued.
    async fn claim_number(&self, id: Uuid, number: &str) -> AppResult<bool>;

    async fn record_badge(
        &self,
        id: Uuid,
        number: &str,
        url: &str,
        at: DateTime<Utc>,
        regenerated: bool,
    ) -> AppResult<Registration>;
}

/// Where attendee photos come from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoSource: Send + Sync {
    async fn fetch(&self, url: &str) -> AppResult<Vec<u8>>;
}

#[derive(Clone, Default)]
pub struct HttpPhotoSource {
    client: reqwest::Client,
}

#[async_trait]
impl PhotoSource for HttpPhotoSource {
    async fn fetch(&self, url: &str) -> AppResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AppError::Storage(format!("photo fetch failed: {}", e)))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Storage(format!("photo read failed: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

/// A rendered badge ready to send to the client
#[derive(Debug, Clone)]
pub struct BadgeImage {
    pub file_name: String,
    pub png: Vec<u8>,
}

#[derive(Clone)]
pub struct BadgeService {
    ledger: Arc<dyn BadgeLedger>,
    store: Arc<dyn BucketStore>,
    photos: Arc<dyn PhotoSource>,
    allocator: Arc<BadgeNumberAllocator>,
    event_name: String,
}

impl BadgeService {
    pub fn new(
        ledger: Arc<dyn BadgeLedger>,
        store: Arc<dyn BucketStore>,
        photos: Arc<dyn PhotoSource>,
        badge_prefix: &str,
        event_name: &str,
    ) -> Self {
        Self {
            ledger,
            store,
            photos,
            allocator: Arc::new(BadgeNumberAllocator::new(badge_prefix)),
            event_name: event_name.to_string(),
        }
    }

    /// Issue a first badge to an onsite attendee
    pub async fn generate(&self, id: Uuid) -> AppResult<BadgeResponse> {
        let registration = self.ledger.registration(id).await?;
        if !registration.is_onsite() {
            return Err(AppError::BusinessRule(
                "Badges are only issued to onsite attendees".to_string(),
            ));
        }
        if let Some(existing) = &registration.badge_number {
            return Err(AppError::Conflict(format!(
                "Registration already has badge {}; regenerate it instead",
                existing
            )));
        }

        let number = self.claim_next(id).await?;

        let png = self.render(&registration, &number).await?;
        let (url, at) = self.upload(&number, png).await?;
        let updated = self.persist(id, &number, &url, at, false).await?;

        tracing::info!(registration_id = %id, badge_number = %number, "Badge generated");
        Ok(response(&updated, &number, url, at))
    }

    /// Re-render an issued badge under its existing number
    pub async fn regenerate(&self, id: Uuid) -> AppResult<BadgeResponse> {
        let registration = self.ledger.registration(id).await?;
        let number = issued_number(&registration)?;

        let png = self.render(&registration, &number).await?;
        let (url, at) = self.upload(&number, png).await?;
        let updated = self.persist(id, &number, &url, at, true).await?;

        tracing::info!(registration_id = %id, badge_number = %number, "Badge regenerated");
        Ok(response(&updated, &number, url, at))
    }

    /// Render an issued badge for download without storing anything
    pub async fn download(&self, id: Uuid) -> AppResult<BadgeImage> {
        let registration = self.ledger.registration(id).await?;
        let number = issued_number(&registration)?;
        let png = self.render(&registration, &number).await?;
        Ok(BadgeImage {
            file_name: format!("{}.png", number),
            png,
        })
    }

    /// Allocate numbers until one is claimed for `id`. A taken number means
    /// another instance has moved past our counter, so reseed and retry.
    async fn claim_next(&self, id: Uuid) -> AppResult<BadgeNumber> {
        for _ in 0..CLAIM_ATTEMPTS {
            let prefix = self.allocator.prefix().to_string();
            let ledger = self.ledger.clone();
            let number = self
                .allocator
                .next(|| async move { ledger.last_sequence(&prefix).await })
                .await?;

            if self.ledger.claim_number(id, &number.to_string()).await? {
                return Ok(number);
            }
            tracing::warn!(badge_number = %number, "Badge number already taken, reseeding");
            self.allocator.reset().await;
        }
        Err(AppError::Conflict("Could not reserve a badge number, try again".to_string()))
    }

    async fn render(
        &self,
        registration: &Registration,
        number: &BadgeNumber,
    ) -> AppResult<Vec<u8>> {
        let photo = self.photo_for(registration).await;
        let registration = registration.clone();
        let number = number.clone();
        let event_name = self.event_name.clone();

        let png = tokio::task::spawn_blocking(move || {
            badge::render_png(&registration, &number, &event_name, photo.as_ref())
        })
        .await
        .map_err(|e| AppError::Internal(format!("badge render task failed: {}", e)))??;
        Ok(png)
    }

    /// The attendee photo, or `None` to fall back to initials
    async fn photo_for(&self, registration: &Registration) -> Option<Photo> {
        let url = registration
            .photo_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())?;

        match self.photos.fetch(url).await {
            Ok(bytes) => {
                let photo = Photo::from_bytes(bytes);
                if photo.is_none() {
                    tracing::warn!(
                        registration_id = %registration.id,
                        url,
                        "Unsupported photo format, using initials"
                    );
                }
                photo
            }
            Err(e) => {
                tracing::warn!(
                    registration_id = %registration.id,
                    url,
                    error = %e,
                    "Photo unavailable, using initials"
                );
                None
            }
        }
    }

    async fn upload(
        &self,
        number: &BadgeNumber,
        png: Vec<u8>,
    ) -> AppResult<(String, DateTime<Utc>)> {
        let key = number.storage_key();
        self.store
            .put_object(&key, Bytes::from(png), PNG_CONTENT_TYPE)
            .await?;
        Ok((self.store.public_url(&key), Utc::now()))
    }

    async fn persist(
        &self,
        id: Uuid,
        number: &BadgeNumber,
        url: &str,
        at: DateTime<Utc>,
        regenerated: bool,
    ) -> AppResult<Registration> {
        let number_text = number.to_string();
        let result = self
            .ledger
            .record_badge(id, &number_text, url, at, regenerated)
            .await;

        if let Err(e) = &result {
            if !regenerated {
                tracing::warn!(
                    registration_id = %id,
                    key = %number.storage_key(),
                    error = %e,
                    "Badge image uploaded but not recorded; object is orphaned"
                );
                if matches!(e, AppError::Conflict(_)) {
                    self.allocator.reset().await;
                }
            }
        }
        result
    }
}

fn issued_number(registration: &Registration) -> AppResult<BadgeNumber> {
    let raw = registration.badge_number.as_deref().ok_or_else(|| {
        AppError::BusinessRule("Registration has no badge yet; generate one first".to_string())
    })?;
    BadgeNumber::parse(raw)
        .ok_or_else(|| AppError::Internal(format!("Stored badge number {} is malformed", raw)))
}

fn response(
    registration: &Registration,
    number: &BadgeNumber,
    url: String,
    at: DateTime<Utc>,
) -> BadgeResponse {
    BadgeResponse {
        registration_id: registration.id,
        badge_number: number.to_string(),
        cache_busted_url: format!("{}?v={}", url, at.timestamp_millis()),
        badge_url: url,
        state: BadgeState::of(registration),
        issued_at: at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::registration::fixtures::{onsite, registration};
    use crate::models::LocationType;
    use crate::services::storage::MockBucketStore;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const BASE_URL: &str = "https://cdn.example.org";

    fn attendee() -> Registration {
        onsite("2025-01-01T10:00:00Z", LocationType::OutsideZaria, None, None)
    }

    fn store_accepting(key: &'static str) -> MockBucketStore {
        let mut store = MockBucketStore::new();
        store
            .expect_put_object()
            .withf(move |k, bytes, content_type| {
                k == key && content_type == "image/png" && bytes.starts_with(b"\x89PNG")
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        store
            .expect_public_url()
            .returning(|key| format!("{}/{}", BASE_URL, key));
        store
    }

    fn ledger_with(record: Registration) -> MockBadgeLedger {
        let mut ledger = MockBadgeLedger::new();
        ledger
            .expect_registration()
            .returning(move |_| Ok(record.clone()));
        ledger
    }

    fn service(ledger: MockBadgeLedger, store: MockBucketStore) -> BadgeService {
        service_with_photos(ledger, store, MockPhotoSource::new())
    }

    fn service_with_photos(
        ledger: MockBadgeLedger,
        store: MockBucketStore,
        photos: MockPhotoSource,
    ) -> BadgeService {
        BadgeService::new(
            Arc::new(ledger),
            Arc::new(store),
            Arc::new(photos),
            "GD2025",
            "GD 2025",
        )
    }

    fn badged(
        mut record: Registration,
        number: &str,
        url: &str,
        at: DateTime<Utc>,
        regenerated: bool,
    ) -> Registration {
        record.badge_number = Some(number.to_string());
        record.badge_url = Some(url.to_string());
        if regenerated {
            record.badge_regenerated_at = Some(at);
        } else {
            record.badge_generated_at = Some(at);
        }
        record
    }

    #[tokio::test]
    async fn test_generate_first_badge() {
        let record = attendee();
        let mut ledger = ledger_with(record.clone());
        ledger
            .expect_last_sequence()
            .withf(|prefix| prefix == "GD2025")
            .times(1)
            .returning(|_| Ok(None));
        ledger
            .expect_claim_number()
            .withf(|_, number| number == "GD2025-0001")
            .times(1)
            .returning(|_, _| Ok(true));
        ledger
            .expect_record_badge()
            .withf(|_, number, url, _, regenerated| {
                number == "GD2025-0001"
                    && url == "https://cdn.example.org/badges/GD2025-0001.png"
                    && !*regenerated
            })
            .times(1)
            .returning(move |_, number, url, at, _| {
                Ok(badged(record.clone(), number, url, at, false))
            });

        let svc = service(ledger, store_accepting("badges/GD2025-0001.png"));
        let badge = svc.generate(Uuid::new_v4()).await.unwrap();

        assert_eq!(badge.badge_number, "GD2025-0001");
        assert_eq!(badge.state, BadgeState::Generated);
        assert!(badge.cache_busted_url.starts_with(&badge.badge_url));
        assert!(badge.cache_busted_url.contains("?v="));
    }

    #[tokio::test]
    async fn test_generate_rejects_online_attendee() {
        let ledger = ledger_with(registration("2025-01-01T10:00:00Z"));
        let mut store = MockBucketStore::new();
        store.expect_put_object().times(0);

        let result = service(ledger, store).generate(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::BusinessRule(_))));
    }

    #[tokio::test]
    async fn test_generate_rejects_numbered_attendee() {
        let mut record = attendee();
        record.badge_number = Some("GD2025-0007".to_string());
        let mut ledger = ledger_with(record);
        ledger.expect_last_sequence().times(0);
        ledger.expect_claim_number().times(0);

        let result = service(ledger, MockBucketStore::new())
            .generate(Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_upload_failure_skips_persistence() {
        let mut ledger = ledger_with(attendee());
        ledger.expect_last_sequence().returning(|_| Ok(Some(4)));
        ledger.expect_claim_number().returning(|_, _| Ok(true));
        ledger.expect_record_badge().times(0);

        let mut store = MockBucketStore::new();
        store
            .expect_put_object()
            .returning(|_, _, _| Err(AppError::Storage("bucket unreachable".into())));

        let result = service(ledger, store).generate(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_persist_conflict_reseeds_allocator() {
        let mut ledger = ledger_with(attendee());
        // Reseeded after the conflict, so storage is asked twice
        ledger
            .expect_last_sequence()
            .times(2)
            .returning(|_| Ok(None));
        ledger.expect_claim_number().returning(|_, _| Ok(true));
        ledger
            .expect_record_badge()
            .returning(|_, _, _, _, _| Err(AppError::Conflict("raced".into())));

        let mut store = MockBucketStore::new();
        store
            .expect_put_object()
            .times(2)
            .returning(|_, _, _| Ok(()));
        store
            .expect_public_url()
            .returning(|key| format!("{}/{}", BASE_URL, key));

        let svc = service(ledger, store);
        for _ in 0..2 {
            let result = svc.generate(Uuid::new_v4()).await;
            assert!(matches!(result, Err(AppError::Conflict(_))));
        }
    }

    #[tokio::test]
    async fn test_taken_numbers_are_never_uploaded() {
        let mut ledger = ledger_with(attendee());
        ledger.expect_last_sequence().returning(|_| Ok(Some(9)));
        ledger
            .expect_claim_number()
            .times(CLAIM_ATTEMPTS)
            .returning(|_, _| Ok(false));
        ledger.expect_record_badge().times(0);
        let mut store = MockBucketStore::new();
        store.expect_put_object().times(0);

        let result = service(ledger, store).generate(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_regenerate_reuses_number_and_key() {
        let mut record = attendee();
        record.badge_number = Some("GD2025-0012".to_string());
        let mut ledger = ledger_with(record.clone());
        ledger.expect_last_sequence().times(0);
        ledger
            .expect_record_badge()
            .withf(|_, number, _, _, regenerated| number == "GD2025-0012" && *regenerated)
            .times(1)
            .returning(move |_, number, url, at, _| {
                Ok(badged(record.clone(), number, url, at, true))
            });

        let svc = service(ledger, store_accepting("badges/GD2025-0012.png"));
        let badge = svc.regenerate(Uuid::new_v4()).await.unwrap();
        assert_eq!(badge.badge_number, "GD2025-0012");
        assert_eq!(badge.state, BadgeState::Regenerated);
    }

    #[tokio::test]
    async fn test_regenerate_requires_number() {
        let ledger = ledger_with(attendee());
        let result = service(ledger, MockBucketStore::new())
            .regenerate(Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::BusinessRule(_))));
    }

    #[tokio::test]
    async fn test_download_renders_without_storing() {
        let mut record = attendee();
        record.badge_number = Some("GD2025-0003".to_string());
        record.photo_url = Some("https://photos.example.org/missing.jpg".to_string());
        let mut ledger = ledger_with(record);
        ledger.expect_record_badge().times(0);
        let mut store = MockBucketStore::new();
        store.expect_put_object().times(0);
        let mut photos = MockPhotoSource::new();
        photos
            .expect_fetch()
            .times(1)
            .returning(|_| Err(AppError::Storage("404".into())));

        let image = service_with_photos(ledger, store, photos)
            .download(Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(image.file_name, "GD2025-0003.png");
        assert!(image.png.starts_with(b"\x89PNG"));
    }

    /// Database stand-in shared by several service instances
    #[derive(Default)]
    struct SharedLedger {
        records: Mutex<HashMap<Uuid, Registration>>,
        claims: Mutex<HashMap<String, Uuid>>,
    }

    #[async_trait]
    impl BadgeLedger for SharedLedger {
        async fn registration(&self, id: Uuid) -> AppResult<Registration> {
            let records = self.records.lock().unwrap();
            records
                .get(&id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(id.to_string()))
        }

        async fn last_sequence(&self, prefix: &str) -> AppResult<Option<u32>> {
            let claims = self.claims.lock().unwrap();
            Ok(claims
                .keys()
                .filter_map(|n| BadgeNumber::parse(n))
                .filter(|n| n.prefix == prefix)
                .map(|n| n.sequence)
                .max())
        }

        async fn claim_number(&self, id: Uuid, number: &str) -> AppResult<bool> {
            let mut claims = self.claims.lock().unwrap();
            if claims.contains_key(number) {
                return Ok(false);
            }
            claims.insert(number.to_string(), id);
            Ok(true)
        }

        async fn record_badge(
            &self,
            id: Uuid,
            number: &str,
            url: &str,
            at: DateTime<Utc>,
            regenerated: bool,
        ) -> AppResult<Registration> {
            let mut records = self.records.lock().unwrap();
            if records
                .values()
                .any(|r| r.id != id && r.badge_number.as_deref() == Some(number))
            {
                return Err(AppError::Conflict(number.to_string()));
            }
            let record = records
                .get_mut(&id)
                .ok_or_else(|| AppError::NotFound(id.to_string()))?;
            *record = badged(record.clone(), number, url, at, regenerated);
            Ok(record.clone())
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        keys: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl BucketStore for RecordingStore {
        async fn put_object(&self, key: &str, _bytes: Bytes, _content_type: &str) -> AppResult<()> {
            self.keys.lock().unwrap().push(key.to_string());
            Ok(())
        }

        fn public_url(&self, key: &str) -> String {
            format!("{}/{}", BASE_URL, key)
        }
    }

    #[tokio::test]
    async fn test_instances_sharing_storage_never_reuse_a_key() {
        let attendees: Vec<Registration> = (0..3)
            .map(|_| {
                let mut r = attendee();
                r.id = Uuid::new_v4();
                r
            })
            .collect();
        let ledger = Arc::new(SharedLedger::default());
        ledger
            .records
            .lock()
            .unwrap()
            .extend(attendees.iter().map(|r| (r.id, r.clone())));
        let store = Arc::new(RecordingStore::default());

        let instance = || {
            BadgeService::new(
                ledger.clone(),
                store.clone(),
                Arc::new(MockPhotoSource::new()),
                "GD2025",
                "GD 2025",
            )
        };
        let first = instance();
        let second = instance();

        let a = first.generate(attendees[0].id).await.unwrap();
        let b = second.generate(attendees[1].id).await.unwrap();
        // `first` still believes 0001 is the latest; its claim on 0002 must fail
        let c = first.generate(attendees[2].id).await.unwrap();

        assert_eq!(a.badge_number, "GD2025-0001");
        assert_eq!(b.badge_number, "GD2025-0002");
        assert_eq!(c.badge_number, "GD2025-0003");
        assert_eq!(
            *store.keys.lock().unwrap(),
            [
                "badges/GD2025-0001.png",
                "badges/GD2025-0002.png",
                "badges/GD2025-0003.png",
            ]
        );

        let stored = ledger.registration(attendees[1].id).await.unwrap();
        assert_eq!(
            stored.badge_url.as_deref(),
            Some("https://cdn.example.org/badges/GD2025-0002.png")
        );
    }
}
