//! Request and response shapes for a single render invocation

use serde::{Deserialize, Serialize};

use crate::options::PdfOptions;
use crate::{Error, Result};

/// A single render request
///
/// Wire names are camelCase; every layout field not listed here is a print
/// option and deserializes into [`PdfOptions`] via the flattened `options`.
///
/// Exactly one of `url`/`data` is meaningful: `url` wins when both are
/// present. When `persisted` is set the destination bucket and key are
/// required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    /// Navigation target; takes precedence over `data`
    #[serde(default)]
    pub url: Option<String>,
    /// Inline markup rendered when no `url` is given
    #[serde(default)]
    pub data: Option<String>,
    /// Upload the document to object storage instead of returning it inline
    #[serde(default)]
    pub persisted: bool,
    /// Destination bucket when persisted
    #[serde(default)]
    pub s3_bucket: Option<String>,
    /// Destination object key when persisted
    #[serde(default)]
    pub s3_key: Option<String>,
    /// Layout options forwarded to the print engine
    #[serde(flatten)]
    pub options: PdfOptions,
}

/// Where the pipeline should navigate for this request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTarget<'a> {
    /// A caller-supplied URL
    Url(&'a str),
    /// Inline markup to persist to a scratch file first
    Markup(&'a str),
}

impl RenderRequest {
    /// Resolve the navigation target. `url` wins over `data`; an empty string
    /// counts as absent.
    pub fn target(&self) -> Result<RenderTarget<'_>> {
        if let Some(url) = self.url.as_deref() {
            if !url.is_empty() {
                return Ok(RenderTarget::Url(url));
            }
        }
        if let Some(data) = self.data.as_deref() {
            if !data.is_empty() {
                return Ok(RenderTarget::Markup(data));
            }
        }
        Err(Error::InvalidRequest(
            "one of `url` or `data` is required".into(),
        ))
    }

    /// Destination bucket and key, present only when `persisted` is set and
    /// both fields are usable.
    pub fn destination(&self) -> Option<(&str, &str)> {
        if !self.persisted {
            return None;
        }
        match (self.s3_bucket.as_deref(), self.s3_key.as_deref()) {
            (Some(bucket), Some(key)) if !bucket.is_empty() && !key.is_empty() => {
                Some((bucket, key))
            }
            _ => None,
        }
    }

    /// Check the request before any browser work happens.
    pub fn validate(&self) -> Result<()> {
        self.target()?;
        if self.persisted && self.destination().is_none() {
            return Err(Error::InvalidRequest(
                "`persisted` requires `s3Bucket` and `s3Key`".into(),
            ));
        }
        Ok(())
    }
}

/// The single response produced per invocation
///
/// Serializes to exactly one of `{"data": ...}`, `{"url": ...}` or
/// `{"error": ...}`. Failures are returned as data, never raised to the
/// caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RenderResponse {
    /// The PDF bytes, base64-encoded
    Document { data: String },
    /// A reference URL to the uploaded object
    Stored { url: String },
    /// A description of what went wrong
    Failure { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_shape() {
        let request: RenderRequest = serde_json::from_str(
            r#"{
                "data": "<h1>hi</h1>",
                "persisted": true,
                "s3Bucket": "invoices",
                "s3Key": "2026/42.pdf",
                "format": "a4",
                "printBackground": true
            }"#,
        )
        .unwrap();

        assert_eq!(request.data.as_deref(), Some("<h1>hi</h1>"));
        assert!(request.persisted);
        assert_eq!(request.destination(), Some(("invoices", "2026/42.pdf")));
        assert_eq!(request.options.print_background, Some(true));
    }

    #[test]
    fn test_url_takes_precedence_over_data() {
        let request: RenderRequest = serde_json::from_str(
            r#"{"url": "https://example.com", "data": "<p>unused</p>"}"#,
        )
        .unwrap();
        assert_eq!(
            request.target().unwrap(),
            RenderTarget::Url("https://example.com")
        );
    }

    #[test]
    fn test_markup_target_when_url_absent() {
        let request: RenderRequest = serde_json::from_str(r#"{"data": "<p>hi</p>"}"#).unwrap();
        assert_eq!(request.target().unwrap(), RenderTarget::Markup("<p>hi</p>"));
    }

    #[test]
    fn test_empty_url_falls_back_to_data() {
        let request: RenderRequest =
            serde_json::from_str(r#"{"url": "", "data": "<p>hi</p>"}"#).unwrap();
        assert_eq!(request.target().unwrap(), RenderTarget::Markup("<p>hi</p>"));
    }

    #[test]
    fn test_missing_target_is_invalid() {
        let request: RenderRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(matches!(request.validate(), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_persisted_requires_destination() {
        let request: RenderRequest =
            serde_json::from_str(r#"{"data": "<p>hi</p>", "persisted": true}"#).unwrap();
        assert!(matches!(request.validate(), Err(Error::InvalidRequest(_))));

        let request: RenderRequest = serde_json::from_str(
            r#"{"data": "<p>hi</p>", "persisted": true, "s3Bucket": "b", "s3Key": ""}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_response_shapes() {
        let document = RenderResponse::Document {
            data: "JVBERi0=".into(),
        };
        assert_eq!(
            serde_json::to_string(&document).unwrap(),
            r#"{"data":"JVBERi0="}"#
        );

        let stored = RenderResponse::Stored {
            url: "https://b.s3.eu-west-2.amazonaws.com/k".into(),
        };
        assert_eq!(
            serde_json::to_string(&stored).unwrap(),
            r#"{"url":"https://b.s3.eu-west-2.amazonaws.com/k"}"#
        );

        let failure = RenderResponse::Failure {
            error: "boom".into(),
        };
        assert_eq!(serde_json::to_string(&failure).unwrap(), r#"{"error":"boom"}"#);
    }

    #[test]
    fn test_response_roundtrip() {
        let parsed: RenderResponse = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert_eq!(parsed, RenderResponse::Failure { error: "boom".into() });
    }
}
