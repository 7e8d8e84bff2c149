//! Object-storage delivery for rendered documents

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_smithy_types::byte_stream::ByteStream;

use crate::{Error, Result};

/// Content type stored alongside every uploaded document
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Build an S3 client for the given region using the default credential chain.
pub async fn client(region: &str) -> Client {
    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await;
    Client::new(&config)
}

/// Put an object with the given content type. Returns the new ETag.
pub async fn put_object(
    client: &Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    content_type: &str,
) -> Result<String> {
    let resp = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body))
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| Error::Upload(e.into_service_error().to_string()))?;

    Ok(resp.e_tag().unwrap_or_default().to_string())
}

/// The reference URL handed back to callers of the persisted path.
pub fn object_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com/{key}")
}
