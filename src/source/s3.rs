//! # Amazon S3 Backend
//!
//! Wraps the async AWS SDK behind the blocking `ObjectStore` trait. Each
//! store owns a private current-thread runtime and drives one request at a
//! time on it, so it must not be used from inside another Tokio runtime.

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::runtime::{Builder, Runtime};

use super::backend::{ObjectMeta, ObjectStore};
use super::errors::{SourceError, SourceResult};

/// Connection settings for an S3 (or S3-compatible) store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Settings {
    /// Region override; otherwise taken from the environment
    #[serde(default)]
    pub region: Option<String>,

    /// Custom endpoint (e.g. MinIO, LocalStack). Enables path-style addressing.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Named credentials profile
    #[serde(default)]
    pub profile: Option<String>,
}

/// S3 object store
#[derive(Debug)]
pub struct S3ObjectStore {
    client: Client,
    runtime: Runtime,
}

impl S3ObjectStore {
    /// Resolve credentials and build a client from `settings`
    pub fn connect(settings: &S3Settings) -> SourceResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SourceError::IoError(e.to_string()))?;

        let client = runtime.block_on(async {
            let mut loader = aws_config::defaults(BehaviorVersion::latest());
            if let Some(region) = &settings.region {
                loader = loader.region(Region::new(region.clone()));
            }
            if let Some(profile) = &settings.profile {
                loader = loader.profile_name(profile);
            }
            let sdk_config = loader.load().await;

            let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
            if let Some(endpoint) = &settings.endpoint {
                builder = builder.endpoint_url(endpoint).force_path_style(true);
            }
            Client::from_conf(builder.build())
        });

        Ok(Self { client, runtime })
    }
}

impl ObjectStore for S3ObjectStore {
    fn list(&self, bucket: &str, prefix: &str) -> SourceResult<Vec<ObjectMeta>> {
        self.runtime.block_on(async {
            let mut objects = Vec::new();
            let mut continuation_token = None;

            loop {
                let resp = self
                    .client
                    .list_objects_v2()
                    .bucket(bucket)
                    .prefix(prefix)
                    .set_continuation_token(continuation_token.take())
                    .send()
                    .await
                    .map_err(|err| {
                        if err
                            .as_service_error()
                            .map(|e| e.is_no_such_bucket())
                            .unwrap_or(false)
                        {
                            SourceError::BucketNotFound(bucket.to_string())
                        } else {
                            SourceError::Request(format!(
                                "ListObjectsV2 {}: {}",
                                bucket,
                                DisplayErrorContext(&err)
                            ))
                        }
                    })?;

                for object in resp.contents() {
                    let Some(key) = object.key() else {
                        continue;
                    };
                    let modified = object.last_modified().ok_or_else(|| {
                        SourceError::Request(format!("object missing last_modified: {}", key))
                    })?;
                    let last_modified =
                        DateTime::<Utc>::from_timestamp(modified.secs(), modified.subsec_nanos())
                            .ok_or_else(|| {
                                SourceError::Request(format!(
                                    "object has out-of-range last_modified: {}",
                                    key
                                ))
                            })?;
                    objects.push(ObjectMeta {
                        key: key.to_string(),
                        last_modified,
                        size: object.size().unwrap_or(0).max(0) as u64,
                    });
                }

                match resp.next_continuation_token() {
                    Some(token) => continuation_token = Some(token.to_string()),
                    None => break,
                }
            }

            Ok(objects)
        })
    }

    fn get(&self, bucket: &str, key: &str) -> SourceResult<Vec<u8>> {
        self.runtime.block_on(async {
            let resp = self
                .client
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|err| {
                    if err
                        .as_service_error()
                        .map(|e| e.is_no_such_key())
                        .unwrap_or(false)
                    {
                        SourceError::ObjectNotFound {
                            bucket: bucket.to_string(),
                            key: key.to_string(),
                        }
                    } else {
                        SourceError::Request(format!(
                            "GetObject {}/{}: {}",
                            bucket,
                            key,
                            DisplayErrorContext(&err)
                        ))
                    }
                })?;

            let body = resp
                .body
                .collect()
                .await
                .map_err(|e| SourceError::Request(format!("reading {}/{}: {}", bucket, key, e)))?;

            Ok(body.into_bytes().to_vec())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings: S3Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, S3Settings::default());

        let settings: S3Settings =
            serde_json::from_str(r#"{"region": "us-west-2", "endpoint": "http://localhost:9000"}"#)
                .unwrap();
        assert_eq!(settings.region.as_deref(), Some("us-west-2"));
        assert_eq!(settings.endpoint.as_deref(), Some("http://localhost:9000"));
        assert!(settings.profile.is_none());
    }
}
