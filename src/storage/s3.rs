/// S3-compatible implementation of the asset store
///
/// Provides object writes with metadata, existence checks, streamed reads,
/// and a startup health check against the configured bucket.
use crate::config::S3Config;
use crate::error::{AppError, Result};
use crate::storage::{object_name, AssetStore, AssetStream};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use futures::stream;

/// Asset store backed by S3-compatible object storage
pub struct S3AssetStore {
    client: Client,
    bucket: String,
}

impl S3AssetStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build the store from configuration
    pub async fn from_config(config: &S3Config) -> Result<Self> {
        let client = get_s3_client(config).await?;
        Ok(Self::new(client, config.bucket.clone()))
    }

    /// Health check for S3 connectivity and bucket access
    ///
    /// Every pipeline depends on the store, so if this fails the process
    /// should not start.
    pub async fn health_check(&self) -> Result<()> {
        match self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .max_keys(1)
            .send()
            .await
        {
            Ok(_) => {
                tracing::info!(bucket = %self.bucket, "S3 connection validated");
                Ok(())
            }
            Err(e) => {
                let error_msg = e.to_string();

                let guidance = if error_msg.contains("InvalidAccessKeyId") {
                    "Invalid AWS Access Key ID. Check AWS_ACCESS_KEY_ID environment variable."
                } else if error_msg.contains("SignatureDoesNotMatch") {
                    "Invalid AWS Secret Access Key. Check AWS_SECRET_ACCESS_KEY environment variable."
                } else if error_msg.contains("NoSuchBucket") {
                    "Bucket does not exist. Check S3_BUCKET environment variable."
                } else if error_msg.contains("AccessDenied") {
                    "Access denied to S3 bucket. Ensure IAM user/role has S3 permissions."
                } else {
                    "S3 health check failed. Ensure the bucket is accessible and credentials are valid."
                };

                tracing::error!(bucket = %self.bucket, error = %error_msg, "S3 health check failed");

                Err(AppError::Store(format!(
                    "S3 health check failed: {}. {}",
                    error_msg, guidance
                )))
            }
        }
    }
}

#[async_trait::async_trait]
impl AssetStore for S3AssetStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(object_name(key))
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                let error_msg = e.to_string();
                if error_msg.contains("403") || error_msg.contains("Forbidden") {
                    AppError::Store("S3 auth failed (403): Check AWS credentials".to_string())
                } else if error_msg.contains("NoSuchBucket") {
                    AppError::Store(format!("S3 bucket not found: {}", self.bucket))
                } else {
                    AppError::Store(format!("S3 upload failed: {}", e))
                }
            })?;

        tracing::info!(key = %key, "asset stored");
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        // head_object checks existence without downloading
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(object_name(key))
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let error_msg = e.to_string();
                if error_msg.contains("404") || error_msg.contains("NotFound") {
                    Ok(false)
                } else {
                    Err(AppError::Store(format!(
                        "Failed to check S3 object: {e}"
                    )))
                }
            }
        }
    }

    async fn open_read_stream(&self, key: &str) -> Result<AssetStream> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(object_name(key))
            .send()
            .await
            .map_err(|e| {
                let error_msg = e.to_string();
                // The object can disappear between the exists check and the
                // open; surface that as not-found rather than a server fault.
                if error_msg.contains("NoSuchKey") || error_msg.contains("404") {
                    AppError::NotFound
                } else {
                    AppError::Store(format!("S3 read failed: {e}"))
                }
            })?;

        // Forward SDK body chunks as they arrive; the object is never
        // buffered whole. Dropping the stream releases the connection.
        let stream = stream::unfold(response.body, |mut body| async move {
            match body.try_next().await {
                Ok(Some(chunk)) => Some((Ok(chunk), body)),
                Ok(None) => None,
                Err(e) => Some((
                    Err(AppError::Store(format!("S3 stream read failed: {e}"))),
                    body,
                )),
            }
        });

        Ok(Box::pin(stream))
    }
}

/// Initialize an S3 client with credentials from config
///
/// Uses the default credential chain unless explicit keys are configured.
/// A custom endpoint supports S3-compatible storage like MinIO.
pub async fn get_s3_client(config: &S3Config) -> Result<Client> {
    use aws_sdk_s3::config::Region;

    let mut aws_config_builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.region.clone()));

    if let (Some(access_key_id), Some(secret_access_key)) =
        (&config.access_key_id, &config.secret_access_key)
    {
        use aws_sdk_s3::config::Credentials;

        let credentials = Credentials::new(
            access_key_id,
            secret_access_key,
            None, // No session token
            None, // No expiration
            "asset_service_s3",
        );

        aws_config_builder = aws_config_builder.credentials_provider(credentials);
    }

    if let Some(endpoint) = &config.endpoint {
        aws_config_builder = aws_config_builder.endpoint_url(endpoint);
    }

    let aws_config = aws_config_builder.load().await;

    Ok(Client::new(&aws_config))
}
