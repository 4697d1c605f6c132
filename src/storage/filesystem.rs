//! A storage driver that serves files from a local directory tree.

use crate::storage::{
    DriverFactory, Error, ErrorKind, FileInfo, FileStream, ListFn, Permissions, Result, StorageDriver,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fs::FileTimes;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncSeekExt, SeekFrom};

/// Builds [`Filesystem`] drivers under a common root directory. The root is
/// created when the factory is constructed; each user's home is created on
/// first login.
#[derive(Debug)]
pub struct FilesystemFactory {
    root: PathBuf,
}

impl FilesystemFactory {
    /// Creates the factory, making sure the root directory exists.
    pub fn new<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(FilesystemFactory { root })
    }
}

#[async_trait]
impl DriverFactory for FilesystemFactory {
    async fn new_driver(&self, home: &str) -> Result<Box<dyn StorageDriver>> {
        let root = self.root.join(home);
        tokio::fs::create_dir_all(&root).await?;
        Ok(Box::new(Filesystem { root }))
    }
}

/// The local-disk implementation of [`StorageDriver`]. All operations are
/// confined to the `root` the driver was constructed with.
#[derive(Debug)]
pub struct Filesystem {
    root: PathBuf,
}

impl Filesystem {
    /// Creates a driver rooted at `root` directly, bypassing the factory.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Filesystem { root: root.into() }
    }

    /// Maps a virtual path onto the physical tree. Virtual paths arrive
    /// canonical (no `..` components), so a plain join suffices.
    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

#[cfg(unix)]
fn mode_bits(meta: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn mode_bits(meta: &std::fs::Metadata) -> u32 {
    if meta.is_dir() {
        0o755
    } else {
        0o644
    }
}

fn file_info(name: String, meta: &std::fs::Metadata) -> FileInfo {
    let modified = meta
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());
    FileInfo {
        name,
        size: meta.len(),
        mode: Permissions(mode_bits(meta)),
        modified,
        is_dir: meta.is_dir(),
    }
}

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "/".to_string())
}

#[async_trait]
impl StorageDriver for Filesystem {
    async fn stat(&self, path: &str) -> Result<FileInfo> {
        let full = self.full_path(path);
        let meta = tokio::fs::symlink_metadata(&full).await?;
        let name = if path == "/" { "/".to_string() } else { entry_name(&full) };
        Ok(file_info(name, &meta))
    }

    async fn chtimes(&self, path: &str, atime: DateTime<Utc>, mtime: DateTime<Utc>) -> Result<()> {
        let full = self.full_path(path);
        tokio::task::spawn_blocking(move || {
            let file = std::fs::File::open(full)?;
            let times = FileTimes::new()
                .set_accessed(atime.into())
                .set_modified(mtime.into());
            file.set_times(times)
        })
        .await
        .map_err(|e| Error::new(ErrorKind::Io, e))??;
        Ok(())
    }

    async fn make_dir(&self, path: &str) -> Result<()> {
        tokio::fs::create_dir_all(self.full_path(path)).await?;
        Ok(())
    }

    async fn delete_dir(&self, path: &str) -> Result<()> {
        let full = self.full_path(path);
        let meta = tokio::fs::symlink_metadata(&full).await?;
        if !meta.is_dir() {
            return Err(Error::from(ErrorKind::NotADirectory));
        }
        tokio::fs::remove_dir_all(full).await?;
        Ok(())
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        let full = self.full_path(path);
        let meta = tokio::fs::symlink_metadata(&full).await?;
        if meta.is_dir() {
            return Err(Error::from(ErrorKind::IsADirectory));
        }
        tokio::fs::remove_file(full).await?;
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> Result<()> {
        tokio::fs::rename(self.full_path(from), self.full_path(to)).await?;
        Ok(())
    }

    async fn list_dir(&self, path: &str, cb: &mut ListFn<'_>) -> Result<()> {
        let mut rd = tokio::fs::read_dir(self.full_path(path)).await?;
        while let Some(entry) = rd.next_entry().await? {
            let meta = tokio::fs::symlink_metadata(entry.path()).await?;
            let info = file_info(entry.file_name().to_string_lossy().into_owned(), &meta);
            cb(&info)?;
        }
        Ok(())
    }

    async fn get_file(&self, path: &str, offset: u64) -> Result<(u64, FileStream)> {
        let mut file = tokio::fs::File::open(self.full_path(path)).await?;
        let meta = file.metadata().await?;
        if offset > 0 {
            file.seek(SeekFrom::Start(offset)).await?;
        }
        Ok((meta.len().saturating_sub(offset), Box::new(file)))
    }

    async fn put_file(&self, path: &str, offset: u64, mut reader: FileStream) -> Result<u64> {
        let full = self.full_path(path);
        if let Ok(meta) = tokio::fs::symlink_metadata(&full).await {
            if meta.is_dir() {
                return Err(Error::from(ErrorKind::IsADirectory));
            }
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true);
        if offset > 0 {
            options.append(true);
        } else {
            options.create(true).truncate(true);
        }
        let mut file = options.open(full).await?;

        let written = tokio::io::copy(&mut reader, &mut file).await?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tokio::io::AsyncReadExt;

    async fn read_all(mut stream: FileStream) -> Vec<u8> {
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        buf
    }

    #[tokio::test]
    async fn stat_and_root() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("a.txt"), b"abcd").unwrap();
        let fs = Filesystem::new(root.path());

        let info = fs.stat("/a.txt").await.unwrap();
        assert_eq!(info.name, "a.txt");
        assert_eq!(info.size, 4);
        assert!(!info.is_dir);

        let info = fs.stat("/").await.unwrap();
        assert_eq!(info.name, "/");
        assert!(info.is_dir);
    }

    #[tokio::test]
    async fn get_put_roundtrip() {
        let root = tempfile::tempdir().unwrap();
        let fs = Filesystem::new(root.path());

        let written = fs
            .put_file("/hello.txt", 0, Box::new(&b"abcd"[..]))
            .await
            .unwrap();
        assert_eq!(written, 4);

        let (size, stream) = fs.get_file("/hello.txt", 0).await.unwrap();
        assert_eq!(size, 4);
        assert_eq!(read_all(stream).await, b"abcd");
    }

    #[tokio::test]
    async fn get_with_offset() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("f"), b"abcd").unwrap();
        let fs = Filesystem::new(root.path());

        let (size, stream) = fs.get_file("/f", 2).await.unwrap();
        assert_eq!(size, 2);
        assert_eq!(read_all(stream).await, b"cd");
    }

    #[tokio::test]
    async fn put_appends_past_offset() {
        let root = tempfile::tempdir().unwrap();
        let fs = Filesystem::new(root.path());

        fs.put_file("/f", 0, Box::new(&b"abcd"[..])).await.unwrap();
        fs.put_file("/f", 4, Box::new(&b"efgh"[..])).await.unwrap();

        let (size, stream) = fs.get_file("/f", 0).await.unwrap();
        assert_eq!(size, 8);
        assert_eq!(read_all(stream).await, b"abcdefgh");
    }

    #[tokio::test]
    async fn put_onto_directory_fails() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("d")).unwrap();
        let fs = Filesystem::new(root.path());

        let err = fs.put_file("/d", 0, Box::new(&b"x"[..])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IsADirectory);
    }

    #[tokio::test]
    async fn delete_checks_entry_kind() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("d")).unwrap();
        std::fs::write(root.path().join("f"), b"x").unwrap();
        let fs = Filesystem::new(root.path());

        assert_eq!(
            fs.delete_file("/d").await.unwrap_err().kind(),
            ErrorKind::IsADirectory
        );
        assert_eq!(
            fs.delete_dir("/f").await.unwrap_err().kind(),
            ErrorKind::NotADirectory
        );

        fs.delete_file("/f").await.unwrap();
        fs.delete_dir("/d").await.unwrap();
        assert_eq!(
            fs.stat("/f").await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn delete_dir_is_recursive() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("d/sub")).unwrap();
        std::fs::write(root.path().join("d/sub/f"), b"x").unwrap();
        let fs = Filesystem::new(root.path());

        fs.delete_dir("/d").await.unwrap();
        assert!(fs.stat("/d").await.is_err());
    }

    #[tokio::test]
    async fn list_immediate_children_only() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("d/sub")).unwrap();
        std::fs::write(root.path().join("d/f1"), b"x").unwrap();
        std::fs::write(root.path().join("d/sub/nested"), b"x").unwrap();
        let fs = Filesystem::new(root.path());

        let mut names = Vec::new();
        fs.list_dir("/d", &mut |fi| {
            names.push(fi.name.clone());
            Ok(())
        })
        .await
        .unwrap();

        names.sort();
        assert_eq!(names, vec!["f1", "sub"]);
    }

    #[tokio::test]
    async fn list_callback_error_stops_walk() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("f1"), b"x").unwrap();
        std::fs::write(root.path().join("f2"), b"x").unwrap();
        let fs = Filesystem::new(root.path());

        let mut seen = 0;
        let err = fs
            .list_dir("/", &mut |_| {
                seen += 1;
                Err(Error::from(ErrorKind::Io))
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(seen, 1);
    }

    #[tokio::test]
    async fn rename_moves_files_and_dirs() {
        let root = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(root.path().join("old")).unwrap();
        f.write_all(b"abcd").unwrap();
        let fs = Filesystem::new(root.path());

        fs.rename("/old", "/new").await.unwrap();
        assert_eq!(fs.stat("/new").await.unwrap().size, 4);
        assert!(fs.stat("/old").await.is_err());
    }

    #[tokio::test]
    async fn chtimes_sets_mtime() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("f"), b"x").unwrap();
        let fs = Filesystem::new(root.path());

        let when = "2020-05-17T10:30:00Z".parse::<DateTime<Utc>>().unwrap();
        fs.chtimes("/f", when, when).await.unwrap();
        assert_eq!(fs.stat("/f").await.unwrap().modified, when);
    }

    #[tokio::test]
    async fn factory_creates_home() {
        let root = tempfile::tempdir().unwrap();
        let factory = FilesystemFactory::new(root.path()).unwrap();

        let driver = factory.new_driver("alice").await.unwrap();
        driver.put_file("/f", 0, Box::new(&b"hi"[..])).await.unwrap();

        assert!(root.path().join("alice/f").is_file());
    }
}
