//! Test helpers for writing CLI datasets into a temporary directory.

use camino::Utf8PathBuf;
use tempfile::TempDir;
use trueplace_core::RawLocationMetrics;
#[cfg(feature = "store-sqlite")]
use trueplace_core::test_support::write_sqlite_dataset;
use trueplace_core::test_support::sample_locations;

pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write_locations(
        &self,
        name: &str,
        records: &[RawLocationMetrics],
    ) -> Utf8PathBuf {
        let path = self.path(name);
        let payload = serde_json::to_vec(records).expect("serialise locations");
        std::fs::write(&path, payload).expect("write locations file");
        path
    }

    pub(super) fn sample_json(&self) -> Utf8PathBuf {
        self.write_locations("locations.json", &sample_locations())
    }

    #[cfg(feature = "store-sqlite")]
    pub(super) fn sample_sqlite(&self) -> Utf8PathBuf {
        let path = self.path("dataset.db");
        write_sqlite_dataset(path.as_std_path()).expect("write sqlite dataset");
        path
    }

    pub(super) fn write_raw(&self, name: &str, contents: &[u8]) -> Utf8PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).expect("write file");
        path
    }
}
