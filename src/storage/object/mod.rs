//! A storage driver over a flat object store.
//!
//! The hierarchical view FTP clients expect is emulated on top of flat
//! keys: a directory is a zero-byte marker object whose key ends in `/`,
//! listing is a delimited prefix query, append is an upload to a `.tmp`
//! key followed by a server-side compose, and rename is copy-then-delete.

mod client;
mod response_body;
mod sign;
mod uri;

use crate::config::ObjectConfig;
use crate::storage::{
    DriverFactory, Error, ErrorKind, FileInfo, FileStream, ListFn, Permissions, Result, StorageDriver,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use client::ObjectClient;
use response_body::Item;

/// Builds [`ObjectStorage`] drivers against one bucket on one endpoint.
#[derive(Debug)]
pub struct ObjectStorageFactory {
    config: ObjectConfig,
}

impl ObjectStorageFactory {
    /// Creates the factory from the object-store configuration block.
    pub fn new(config: ObjectConfig) -> Self {
        ObjectStorageFactory { config }
    }
}

#[async_trait]
impl DriverFactory for ObjectStorageFactory {
    async fn new_driver(&self, home: &str) -> Result<Box<dyn StorageDriver>> {
        let c = &self.config;
        Ok(Box::new(ObjectStorage {
            client: ObjectClient::new(&c.endpoint, &c.access_key, &c.secret_key, &c.bucket, c.tls),
            home: home.trim_matches('/').to_string(),
        }))
    }
}

/// The object-store implementation of [`StorageDriver`]. Keys live under
/// the `home` prefix the driver was constructed for.
#[derive(Debug)]
pub struct ObjectStorage {
    client: ObjectClient,
    home: String,
}

impl ObjectStorage {
    /// The object key for a virtual path, without trailing slash.
    fn key(&self, path: &str) -> String {
        let rel = path.trim_matches('/');
        match (self.home.is_empty(), rel.is_empty()) {
            (true, _) => rel.to_string(),
            (false, true) => self.home.clone(),
            (false, false) => format!("{}/{}", self.home, rel),
        }
    }

    /// The directory key (and listing prefix) for a virtual path: the
    /// object key with a trailing slash, or empty for a shared-tree root.
    fn dir_key(&self, path: &str) -> String {
        let key = self.key(path);
        if key.is_empty() {
            key
        } else {
            format!("{}/", key)
        }
    }

    /// Entry name of a listed key relative to the listing prefix.
    fn entry_name(prefix: &str, key: &str) -> String {
        key.strip_prefix(prefix)
            .unwrap_or(key)
            .trim_end_matches('/')
            .to_string()
    }

    fn item_info(prefix: &str, item: &Item) -> FileInfo {
        FileInfo {
            name: Self::entry_name(prefix, &item.name),
            size: item.size(),
            mode: Permissions(0o777),
            modified: item.modified(),
            is_dir: item.name.ends_with('/'),
        }
    }
}

#[async_trait]
impl StorageDriver for ObjectStorage {
    async fn stat(&self, path: &str) -> Result<FileInfo> {
        if path == "/" {
            return Ok(FileInfo::root());
        }
        let key = self.key(path);
        match self.client.metadata(&key).await {
            Ok(item) => Ok(Self::item_info(&format!("{}/", parent_of(&key)), &item)),
            // A missing key still resolves to a directory entry: prefixes
            // exist implicitly, CWD into them must work.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(FileInfo::synthetic_dir(key)),
            Err(e) => Err(e),
        }
    }

    async fn chtimes(&self, _path: &str, _atime: DateTime<Utc>, _mtime: DateTime<Utc>) -> Result<()> {
        Err(Error::from(ErrorKind::Unsupported))
    }

    async fn make_dir(&self, path: &str) -> Result<()> {
        self.client.put_empty(&self.dir_key(path)).await
    }

    async fn delete_dir(&self, path: &str) -> Result<()> {
        let prefix = self.dir_key(path);
        let listing = self.client.list(&prefix, false).await?;
        for item in &listing.items {
            if item.name == prefix {
                continue;
            }
            self.client.delete(&item.name).await?;
        }
        // The marker itself may not exist for implicit prefixes.
        let _ = self.client.delete(&prefix).await;
        Ok(())
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        self.client.delete(&self.key(path)).await
    }

    async fn rename(&self, from: &str, to: &str) -> Result<()> {
        let from_key = self.key(from);
        let to_key = self.key(to);

        match self.client.copy(&from_key, &to_key).await {
            Ok(()) => self.client.delete(&from_key).await,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // Retry against the directory marker.
                let from_key = format!("{}/", from_key);
                let to_key = format!("{}/", to_key);
                self.client.copy(&from_key, &to_key).await?;
                self.client.delete(&from_key).await
            }
            Err(e) => Err(e),
        }
    }

    async fn list_dir(&self, path: &str, cb: &mut ListFn<'_>) -> Result<()> {
        let prefix = self.dir_key(path);
        let listing = self.client.list(&prefix, true).await?;

        for sub in &listing.prefixes {
            cb(&FileInfo::synthetic_dir(Self::entry_name(&prefix, sub)))?;
        }
        for item in &listing.items {
            // The prefix's own marker is not a child; sub-directory
            // markers are already covered by the prefixes.
            if item.name == prefix || item.name.ends_with('/') {
                continue;
            }
            cb(&Self::item_info(&prefix, item))?;
        }
        Ok(())
    }

    async fn get_file(&self, path: &str, offset: u64) -> Result<(u64, FileStream)> {
        let key = self.key(path);
        let item = self.client.metadata(&key).await?;
        let stream = self.client.get(&key, offset).await?;
        Ok((item.size().saturating_sub(offset), stream))
    }

    async fn put_file(&self, path: &str, offset: u64, reader: FileStream) -> Result<u64> {
        let key = self.key(path);

        match self.client.metadata(&self.dir_key(path)).await {
            Ok(_) => return Err(Error::from(ErrorKind::IsADirectory)),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        if offset == 0 {
            let item = self.client.put(&key, reader).await?;
            return Ok(item.size());
        }

        // Append: upload the new bytes next to the object, compose the two
        // server-side, then drop the temporary on every exit path.
        let tmp = format!("{}.tmp", key);
        let composed = async {
            self.client.put(&tmp, reader).await?;
            self.client.compose(&[&key, &tmp], &key).await
        }
        .await;
        let _ = self.client.delete(&tmp).await;

        Ok(composed?.size())
    }
}

fn parent_of(key: &str) -> &str {
    match key.rfind('/') {
        Some(idx) => &key[..idx],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn driver(home: &str) -> ObjectStorage {
        ObjectStorage {
            client: ObjectClient::new("store.local:9000", "ak", "sk", "bkt", false),
            home: home.to_string(),
        }
    }

    #[test]
    fn key_mapping_with_home() {
        let d = driver("alice");
        assert_eq!(d.key("/"), "alice");
        assert_eq!(d.key("/docs/a.txt"), "alice/docs/a.txt");
        assert_eq!(d.dir_key("/"), "alice/");
        assert_eq!(d.dir_key("/docs"), "alice/docs/");
    }

    #[test]
    fn key_mapping_shared_tree() {
        let d = driver("");
        assert_eq!(d.key("/a.txt"), "a.txt");
        assert_eq!(d.key("/"), "");
        assert_eq!(d.dir_key("/"), "");
        assert_eq!(d.dir_key("/docs"), "docs/");
    }

    #[test]
    fn entry_names_strip_prefix_and_slash() {
        assert_eq!(ObjectStorage::entry_name("alice/", "alice/a.txt"), "a.txt");
        assert_eq!(ObjectStorage::entry_name("alice/", "alice/docs/"), "docs");
        assert_eq!(ObjectStorage::entry_name("", "top/"), "top");
    }

    #[test]
    fn parent_extraction() {
        assert_eq!(parent_of("alice/docs/a.txt"), "alice/docs");
        assert_eq!(parent_of("a.txt"), "");
    }
}
