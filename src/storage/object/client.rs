//! The HTTP client behind the object-store driver.
//!
//! Speaks the store's JSON object API: metadata and media reads, streamed
//! uploads, server-side copy and compose, prefix listings, deletes. Every
//! request is signed with the configured key pair.

use super::response_body::{Item, Listing};
use super::sign::{date_value, Credentials, DATE_HEADER};
use super::uri::ObjectUri;
use crate::storage::{Error, ErrorKind, FileStream};
use bytes::Buf;
use futures::TryStreamExt;
use hyper::client::connect::HttpConnector;
use hyper::http::{header, HeaderValue, Method, StatusCode, Uri};
use hyper::{body::aggregate, Body, Client, Request, Response};
use hyper_rustls::HttpsConnector;
use tokio_util::codec::{BytesCodec, FramedRead};

#[derive(Clone, Debug)]
pub(crate) struct ObjectClient {
    client: Client<HttpsConnector<HttpConnector>>,
    uris: ObjectUri,
    creds: Credentials,
}

impl ObjectClient {
    pub fn new(endpoint: &str, access_key: &str, secret_key: &str, bucket: &str, tls: bool) -> Self {
        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .https_or_http()
            .enable_http1()
            .build();
        ObjectClient {
            client: Client::builder().build(https),
            uris: ObjectUri::new(endpoint, bucket, tls),
            creds: Credentials {
                access_key: access_key.to_string(),
                secret_key: secret_key.to_string(),
            },
        }
    }

    fn request(&self, method: Method, uri: Uri, body: Body) -> Result<Request<Body>, Error> {
        let date = date_value(chrono::Utc::now());
        let path_and_query = uri
            .path_and_query()
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());
        let authorization = self.creds.authorization(method.as_str(), &path_and_query, &date);
        Request::builder()
            .uri(uri)
            .method(method)
            .header(DATE_HEADER, date)
            .header(header::AUTHORIZATION, authorization)
            .body(body)
            .map_err(|e| Error::new(ErrorKind::Io, e))
    }

    async fn send(&self, request: Request<Body>) -> Result<Response<Body>, Error> {
        self.client
            .request(request)
            .await
            .map_err(|e| Error::new(ErrorKind::Io, e))
    }

    /// Metadata of one object. A missing key surfaces as
    /// [`ErrorKind::NotFound`].
    pub async fn metadata(&self, key: &str) -> Result<Item, Error> {
        let request = self.request(Method::GET, self.uris.metadata(key)?, Body::empty())?;
        let response = self.send(request).await?;
        let body = unpack_response(response).await?;
        serde_json::from_reader(body.reader()).map_err(|e| Error::new(ErrorKind::Io, e))
    }

    /// Lists keys under `prefix`. `delimited` restricts the listing to
    /// immediate children; otherwise it is recursive.
    pub async fn list(&self, prefix: &str, delimited: bool) -> Result<Listing, Error> {
        let request = self.request(Method::GET, self.uris.list(prefix, delimited)?, Body::empty())?;
        let response = self.send(request).await?;
        let body = unpack_response(response).await?;
        serde_json::from_reader(body.reader()).map_err(|e| Error::new(ErrorKind::Io, e))
    }

    /// Opens the object's content for reading, starting at `offset`.
    pub async fn get(&self, key: &str, offset: u64) -> Result<FileStream, Error> {
        let mut request = self.request(Method::GET, self.uris.media(key)?, Body::empty())?;
        if offset > 0 {
            let range = format!("bytes={}-", offset)
                .parse()
                .map_err(|e| Error::new(ErrorKind::Io, e))?;
            request.headers_mut().insert(header::RANGE, range);
        }

        let response = self.send(request).await?;
        status_check(response.status())?;

        let body = response
            .into_body()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
            .into_async_read();
        Ok(Box::new(tokio_util::compat::FuturesAsyncReadCompatExt::compat(body)))
    }

    /// Streams `reader` into the object at `key`, replacing any previous
    /// content. Returns the stored object's resource.
    pub async fn put(&self, key: &str, reader: FileStream) -> Result<Item, Error> {
        let stream = FramedRead::new(reader, BytesCodec::new()).map_ok(|b| b.freeze());
        let mut request = self.request(Method::POST, self.uris.upload(key)?, Body::wrap_stream(stream))?;
        request.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );
        let response = self.send(request).await?;
        let body = unpack_response(response).await?;
        serde_json::from_reader(body.reader()).map_err(|e| Error::new(ErrorKind::Io, e))
    }

    /// Stores a zero-byte object; used for directory markers.
    pub async fn put_empty(&self, key: &str) -> Result<(), Error> {
        let mut request = self.request(Method::POST, self.uris.upload(key)?, Body::empty())?;
        request
            .headers_mut()
            .insert(header::CONTENT_LENGTH, HeaderValue::from_static("0"));
        let response = self.send(request).await?;
        unpack_response(response).await?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), Error> {
        let request = self.request(Method::DELETE, self.uris.metadata(key)?, Body::empty())?;
        let response = self.send(request).await?;
        unpack_response(response).await?;
        Ok(())
    }

    /// Server-side copy within the bucket.
    pub async fn copy(&self, from: &str, to: &str) -> Result<(), Error> {
        let request = self.request(Method::POST, self.uris.copy(from, to)?, Body::empty())?;
        let response = self.send(request).await?;
        unpack_response(response).await?;
        Ok(())
    }

    /// Server-side concatenation of `sources` (in order) into `dest`.
    pub async fn compose(&self, sources: &[&str], dest: &str) -> Result<Item, Error> {
        let body = serde_json::json!({
            "sourceObjects": sources.iter().map(|name| serde_json::json!({ "name": name })).collect::<Vec<_>>(),
            "destination": { "contentType": mime::APPLICATION_OCTET_STREAM.to_string() },
        });
        let request = self.request(Method::POST, self.uris.compose(dest)?, Body::from(body.to_string()))?;
        let response = self.send(request).await?;
        let body = unpack_response(response).await?;
        serde_json::from_reader(body.reader()).map_err(|e| Error::new(ErrorKind::Io, e))
    }
}

async fn unpack_response(response: Response<Body>) -> Result<impl Buf, Error> {
    let status = response.status();
    let body = aggregate(response).await.map_err(|e| Error::new(ErrorKind::Io, e))?;
    status_check(status)?;
    Ok(body)
}

fn status_check(status: StatusCode) -> Result<(), Error> {
    if status.is_success() {
        return Ok(());
    }
    let kind = match status.as_u16() {
        404 => ErrorKind::NotFound,
        401 | 403 => ErrorKind::PermissionDenied,
        507 => ErrorKind::InsufficientStorage,
        _ => ErrorKind::Io,
    };
    Err(Error::new(kind, format!("object store replied {}", status)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_mapping() {
        assert!(status_check(StatusCode::OK).is_ok());
        assert!(status_check(StatusCode::NO_CONTENT).is_ok());
        assert_eq!(
            status_check(StatusCode::NOT_FOUND).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            status_check(StatusCode::FORBIDDEN).unwrap_err().kind(),
            ErrorKind::PermissionDenied
        );
        assert_eq!(
            status_check(StatusCode::INSUFFICIENT_STORAGE).unwrap_err().kind(),
            ErrorKind::InsufficientStorage
        );
        assert_eq!(
            status_check(StatusCode::INTERNAL_SERVER_ERROR).unwrap_err().kind(),
            ErrorKind::Io
        );
    }
}
