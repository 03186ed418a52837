//! Test helpers for building datasets and SQLite directories on disk.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use volio_core::{Dataset, Event, Friendship, VolunteerProfile};

use crate::import::{ImportConfig, execute_import};

/// Temporary directory with UTF-8 paths that is removed on drop.
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

    /// Serialise `dataset` to `name` and return its path.
    pub(super) fn write_dataset(&self, name: &str, dataset: &Dataset) -> Utf8PathBuf {
        let path = self.path(name);
        let payload = serde_json::to_vec_pretty(dataset).expect("serialise dataset");
        write_utf8(&path, &payload);
        path
    }

    /// Import [`sample_dataset`] and return the database path.
    pub(super) fn imported_sample(&self) -> Utf8PathBuf {
        let config = ImportConfig {
            dataset: self.write_dataset("dataset.json", &sample_dataset()),
            database: self.path("volio.db"),
        };
        execute_import(&config).expect("sample dataset imports");
        config.database
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture");
}

/// Three volunteers, two events, and one friendship.
///
/// Scores against `evt-park`: ana 90, ben 40, cai 0.
pub(super) fn sample_dataset() -> Dataset {
    Dataset {
        volunteers: vec![
            VolunteerProfile::new("ana")
                .with_badge("eco-warrior")
                .with_interest("Environment")
                .with_location(43.25, 76.95),
            VolunteerProfile::new("ben").with_interest("Environment"),
            VolunteerProfile::new("cai").with_interest("Education"),
        ],
        events: vec![
            Event::new("evt-park", "Environment", "ben")
                .with_required_badge("eco-warrior")
                .with_location(43.25, 76.95)
                .with_participant("ben"),
            Event::new("evt-school", "Education", "org-1"),
        ],
        friendships: vec![Friendship::new("ana", "ben")],
    }
}
