use crate::foundation::catalog::{ArtistCatalog, ArtworkRecord};
use crate::http_client::Result;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions, Permissions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::debug;

const LOCK_RETRY_DELAY: Duration = Duration::from_millis(50);

/// The `artists.json` document shared by every run.
///
/// Writers coordinate through an advisory lock on a sidecar `<file>.lock`. The
/// document itself is replaced by renaming a fully written temporary file over it,
/// so a reader sees either the old or the new version.
pub struct CatalogStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut lock_path = path.clone().into_os_string();
        lock_path.push(".lock");

        Self {
            path,
            lock_path: PathBuf::from(lock_path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole document without locking. A missing file is an empty catalog.
    pub fn load(&self) -> Result<ArtistCatalog> {
        if !self.path.exists() {
            return Ok(ArtistCatalog::new());
        }

        let file = File::open(&self.path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Takes the exclusive lock, blocking until other writers release it, and loads
    /// the document. An empty document is created first if none exists.
    ///
    /// The lock is held until the returned guard is dropped.
    pub fn lock(&self) -> Result<CatalogGuard<'_>> {
        let lock_file = self.open_lock_file()?;
        lock_file.lock_exclusive()?;
        self.locked(lock_file)
    }

    /// Same as [`CatalogStore::lock`], but waits for other writers by sleeping on
    /// the tokio timer instead of blocking the worker thread.
    ///
    /// The pipeline holds this guard over the whole check, download and rewrite of
    /// one painting.
    pub async fn lock_async(&self) -> Result<CatalogGuard<'_>> {
        let lock_file = self.open_lock_file()?;
        let contended = fs2::lock_contended_error().raw_os_error();

        loop {
            match lock_file.try_lock_exclusive() {
                Ok(()) => break,
                Err(e) if e.raw_os_error() == contended => {
                    debug!(path = %self.path.display(), "catalog busy, waiting");
                    tokio::time::sleep(LOCK_RETRY_DELAY).await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.locked(lock_file)
    }

    fn open_lock_file(&self) -> Result<File> {
        Ok(OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?)
    }

    fn locked(&self, lock_file: File) -> Result<CatalogGuard<'_>> {
        debug!(path = %self.path.display(), "catalog locked");

        if !self.path.exists() {
            self.write(&ArtistCatalog::new())?;
        }
        let catalog = self.load()?;

        Ok(CatalogGuard {
            store: self,
            lock_file,
            catalog,
        })
    }

    fn write(&self, catalog: &ArtistCatalog) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, catalog)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        let permissions = self.document_permissions(tmp.as_file())?;
        tmp.as_file().set_permissions(permissions)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Permissions for a rewritten document: those of the current file, or
    /// `rw-r--r--` for a new one so the gallery can read it.
    fn document_permissions(&self, tmp: &File) -> io::Result<Permissions> {
        match fs::metadata(&self.path) {
            Ok(metadata) => Ok(metadata.permissions()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => new_document_permissions(tmp),
            Err(e) => Err(e),
        }
    }
}

#[cfg(unix)]
fn new_document_permissions(_tmp: &File) -> io::Result<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_document_permissions(tmp: &File) -> io::Result<Permissions> {
    Ok(tmp.metadata()?.permissions())
}

/// Locked, in-memory view of the catalog. Dropping it releases the lock.
pub struct CatalogGuard<'a> {
    store: &'a CatalogStore,
    lock_file: File,
    catalog: ArtistCatalog,
}

impl CatalogGuard<'_> {
    pub fn catalog(&self) -> &ArtistCatalog {
        &self.catalog
    }

    pub fn contains(&self, artist: &str, filename: &str) -> bool {
        self.catalog
            .get(artist)
            .is_some_and(|paintings| paintings.contains_key(filename))
    }

    /// Adds a record, creating the artist entry when needed. An existing record is
    /// left untouched and `false` is returned.
    pub fn insert(&mut self, artist: &str, filename: &str, record: ArtworkRecord) -> bool {
        let paintings = self.catalog.entry(artist.to_string()).or_default();
        if paintings.contains_key(filename) {
            return false;
        }
        paintings.insert(filename.to_string(), record);
        true
    }

    /// Rewrites the whole document with the in-memory catalog.
    pub fn commit(&self) -> Result<()> {
        self.store.write(&self.catalog)
    }
}

impl Drop for CatalogGuard<'_> {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.lock_file);
    }
}

/// Creates the directory holding `path` when it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::ScrapeError;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn record(date: Option<&str>) -> ArtworkRecord {
        ArtworkRecord {
            description: "A bowler hat.".to_string(),
            date: date.map(str::to_string),
            url: "https://www.renemagritte.org/the-son-of-man.jsp".to_string(),
        }
    }

    #[test]
    fn test_load_missing_document() {
        let temp_dir = tempdir().unwrap();
        let store = CatalogStore::new(temp_dir.path().join("artists.json"));

        let catalog = store.load().unwrap();
        assert!(catalog.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_lock_creates_empty_document() {
        let temp_dir = tempdir().unwrap();
        let store = CatalogStore::new(temp_dir.path().join("artists.json"));

        let guard = store.lock().unwrap();
        assert!(guard.catalog().is_empty());
        drop(guard);

        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{}");
    }

    #[test]
    fn test_commit_and_reload() {
        let temp_dir = tempdir().unwrap();
        let store = CatalogStore::new(temp_dir.path().join("artists.json"));

        let mut guard = store.lock().unwrap();
        assert!(guard.insert("rene magritte", "rene_magritte-the_son_of_man.jpg", record(Some("1964"))));
        guard.commit().unwrap();
        drop(guard);

        let catalog = store.load().unwrap();
        let stored = &catalog["rene magritte"]["rene_magritte-the_son_of_man.jpg"];
        assert_eq!(stored, &record(Some("1964")));

        // A second lock in the same process only succeeds once the first is released.
        let guard = store.lock().unwrap();
        assert!(guard.contains("rene magritte", "rene_magritte-the_son_of_man.jpg"));
        assert!(!guard.contains("rene magritte", "rene_magritte-golconda.jpg"));
        assert!(!guard.contains("paul delvaux", "rene_magritte-the_son_of_man.jpg"));
    }

    #[test]
    fn test_insert_never_overwrites() {
        let temp_dir = tempdir().unwrap();
        let store = CatalogStore::new(temp_dir.path().join("artists.json"));

        let mut guard = store.lock().unwrap();
        assert!(guard.insert("rene magritte", "a.jpg", record(Some("1964"))));
        assert!(!guard.insert("rene magritte", "a.jpg", record(None)));
        assert_eq!(guard.catalog()["rene magritte"]["a.jpg"].date.as_deref(), Some("1964"));
    }

    #[test]
    fn test_uncommitted_changes_are_not_persisted() {
        let temp_dir = tempdir().unwrap();
        let store = CatalogStore::new(temp_dir.path().join("artists.json"));

        let mut guard = store.lock().unwrap();
        guard.insert("rene magritte", "a.jpg", record(None));
        drop(guard);

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_ensure_parent_dir() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("assets").join("artists.json");

        ensure_parent_dir(&path).unwrap();
        assert!(temp_dir.path().join("assets").is_dir());
        ensure_parent_dir(Path::new("artists.json")).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_new_document_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let store = CatalogStore::new(temp_dir.path().join("artists.json"));

        let mut guard = store.lock().unwrap();
        guard.insert("rene magritte", "a.jpg", record(None));
        guard.commit().unwrap();
        drop(guard);

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_commit_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let store = CatalogStore::new(temp_dir.path().join("artists.json"));
        fs::write(store.path(), "{}").unwrap();
        fs::set_permissions(store.path(), Permissions::from_mode(0o640)).unwrap();

        let mut guard = store.lock().unwrap();
        guard.insert("rene magritte", "a.jpg", record(None));
        guard.commit().unwrap();
        drop(guard);

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
        assert_eq!(store.load().unwrap()["rene magritte"].len(), 1);
    }

    #[tokio::test]
    async fn test_lock_async_waits_for_release() {
        let temp_dir = tempdir().unwrap();
        let store = Arc::new(CatalogStore::new(temp_dir.path().join("artists.json")));

        let mut guard = store.lock().unwrap();

        let other = Arc::clone(&store);
        let waiter = tokio::spawn(async move {
            let guard = other.lock_async().await?;
            Ok::<_, ScrapeError>(guard.contains("rene magritte", "a.jpg"))
        });

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!waiter.is_finished());

        guard.insert("rene magritte", "a.jpg", record(None));
        guard.commit().unwrap();
        drop(guard);

        assert!(waiter.await.unwrap().unwrap());
    }
}
