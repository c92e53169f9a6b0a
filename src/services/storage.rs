//! Object storage for badge images

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// Write `bytes` at `key`, replacing any existing object
    async fn put_object(&self, key: &str, bytes: Bytes, content_type: &str) -> AppResult<()>;

    /// URL the object at `key` is publicly served from
    fn public_url(&self, key: &str) -> String;
}

#[derive(Clone)]
pub struct S3BucketStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3BucketStore {
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::Storage("bucket name cannot be empty".into()));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(access_key), Some(secret_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            let credentials = Credentials::new(access_key, secret_key, None, None, "static");
            loader = loader.credentials_provider(SharedCredentialsProvider::new(credentials));
        }

        let shared_config = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl BucketStore for S3BucketStore {
    async fn put_object(&self, key: &str, bytes: Bytes, content_type: &str) -> AppResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("upload of {} failed: {}", key, e)))?;
        tracing::debug!(bucket = %self.bucket, key, "Object stored");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        public_url(&self.public_base_url, key)
    }
}

pub fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.trim_start_matches('/'))
}
