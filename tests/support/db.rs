use scoreline::store::Store;

/// Temporary SQLite database for integration tests.
///
/// The backing directory is removed when the value drops.
pub struct TempDb {
    _dir: tempfile::TempDir,
    url: String,
}

impl TempDb {
    pub fn create() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let url = dir.path().join("scoreline.db").display().to_string();
        Self { _dir: dir, url }
    }

    /// Open a store over the temp database, running migrations if needed.
    pub fn store(&self) -> Store {
        Store::open(&self.url).expect("open temp store")
    }
}
