//! Request URI construction for the object-store JSON API.

use crate::storage::{Error, ErrorKind};
use hyper::Uri;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

/// Builds the per-operation URIs for one bucket on one endpoint.
#[derive(Clone, Debug)]
pub(crate) struct ObjectUri {
    base_url: String,
    bucket: String,
}

impl ObjectUri {
    pub fn new(endpoint: &str, bucket: &str, tls: bool) -> Self {
        let scheme = if tls { "https" } else { "http" };
        ObjectUri {
            base_url: format!("{}://{}", scheme, endpoint),
            bucket: bucket.to_string(),
        }
    }

    /// Metadata of a single object; doubles as the DELETE target.
    pub fn metadata(&self, key: &str) -> Result<Uri, Error> {
        make_uri(format!(
            "{}/storage/v1/b/{}/o/{}",
            self.base_url,
            self.bucket,
            encode(key)
        ))
    }

    /// Object content download.
    pub fn media(&self, key: &str) -> Result<Uri, Error> {
        make_uri(format!(
            "{}/storage/v1/b/{}/o/{}?alt=media",
            self.base_url,
            self.bucket,
            encode(key)
        ))
    }

    /// Streamed object upload.
    pub fn upload(&self, key: &str) -> Result<Uri, Error> {
        make_uri(format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.base_url,
            self.bucket,
            encode(key)
        ))
    }

    /// Listing under a prefix. `delimited` requests immediate children
    /// only; without it the listing is fully recursive.
    pub fn list(&self, prefix: &str, delimited: bool) -> Result<Uri, Error> {
        let delimiter = if delimited {
            "&delimiter=/&includeTrailingDelimiter=true"
        } else {
            ""
        };
        make_uri(format!(
            "{}/storage/v1/b/{}/o?prettyPrint=false&fields={}{}&prefix={}",
            self.base_url,
            self.bucket,
            "kind,prefixes,items(name,size,updated)",
            delimiter,
            encode(prefix)
        ))
    }

    /// Server-side copy of one object to a new key in the same bucket.
    pub fn copy(&self, from: &str, to: &str) -> Result<Uri, Error> {
        make_uri(format!(
            "{}/storage/v1/b/{}/o/{}/copyTo/b/{}/o/{}",
            self.base_url,
            self.bucket,
            encode(from),
            self.bucket,
            encode(to)
        ))
    }

    /// Server-side concatenation of source objects into `dest`.
    pub fn compose(&self, dest: &str) -> Result<Uri, Error> {
        make_uri(format!(
            "{}/storage/v1/b/{}/o/{}/compose",
            self.base_url,
            self.bucket,
            encode(dest)
        ))
    }
}

fn encode(key: &str) -> String {
    utf8_percent_encode(key, NON_ALPHANUMERIC).collect()
}

fn make_uri(path_and_query: String) -> Result<Uri, Error> {
    Uri::from_maybe_shared(path_and_query).map_err(|e| Error::new(ErrorKind::Io, e))
}
