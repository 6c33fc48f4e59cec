//! Object store over a local directory.
//!
//! Upload returns a durable URL stamped with a content digest, so a URL
//! identifies one revision of one file. Listing is the basis for the
//! "first file under the prefix" lookups used for photos and reports.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::models::Role;

use super::{photo_prefix, report_prefix, FileError, FileResult};

/// Placeholder shown whenever a profile photo cannot be resolved.
pub const DEFAULT_PHOTO_URL: &str = "/assets/default-profile-pic.jpeg";

/// Length of the digest suffix embedded in retrieval URLs.
const URL_DIGEST_LEN: usize = 16;

/// A stored medical report surfaced to a patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    /// Original file name, shown in the report card.
    pub name: String,
    /// Durable retrieval URL.
    pub url: String,
}

/// File store rooted at a local directory.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(root: P) -> FileResult<Self> {
        fs::create_dir_all(root.as_ref())?;
        Ok(Self {
            root: root.as_ref().to_path_buf(),
        })
    }

    /// Store bytes under a key and return the retrieval URL.
    /// Re-uploading the same key overwrites: last write wins per filename.
    pub fn upload(&self, key: &str, bytes: &[u8]) -> FileResult<String> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        Ok(retrieval_url(key, bytes))
    }

    /// List file names under a prefix, sorted.
    pub fn list(&self, prefix: &str) -> FileResult<Vec<String>> {
        let dir = self.resolve(prefix)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Retrieval URL for an already-stored key.
    pub fn url_for(&self, key: &str) -> FileResult<String> {
        let path = self.resolve(key)?;
        let bytes = fs::read(&path)?;
        Ok(retrieval_url(key, &bytes))
    }

    /// The current profile photo URL for a user.
    ///
    /// The first file under the user's photo prefix wins; any failure or
    /// an empty folder degrades to the placeholder, never an error.
    pub fn profile_photo_url(&self, role: Role, uid: &str) -> String {
        match self.first_url(photo_prefix(role, uid)) {
            Some(url) => url,
            None => DEFAULT_PHOTO_URL.to_string(),
        }
    }

    /// The current medical report for a patient, if one exists.
    ///
    /// The first file under the patient's report prefix wins; failure
    /// degrades to "no report", never an error.
    pub fn latest_report(&self, patient_id: &str) -> Option<ReportFile> {
        let prefix = match report_prefix(patient_id) {
            Ok(prefix) => prefix,
            Err(e) => {
                warn!("report lookup skipped: {}", e);
                return None;
            }
        };

        let names = match self.list(&prefix) {
            Ok(names) => names,
            Err(e) => {
                warn!("report listing failed for {}: {}", prefix, e);
                return None;
            }
        };

        let name = names.into_iter().next()?;
        let key = format!("{}/{}", prefix, name);
        match self.url_for(&key) {
            Ok(url) => Some(ReportFile { name, url }),
            Err(e) => {
                warn!("report url failed for {}: {}", key, e);
                None
            }
        }
    }

    fn first_url(&self, prefix: FileResult<String>) -> Option<String> {
        let prefix = match prefix {
            Ok(prefix) => prefix,
            Err(e) => {
                warn!("photo lookup skipped: {}", e);
                return None;
            }
        };
        let names = self.list(&prefix).ok()?;
        let name = names.first()?;
        self.url_for(&format!("{}/{}", prefix, name)).ok()
    }

    /// Map a validated key onto the store root. Keys are produced by the
    /// builders in [`super::keys`], but segments are re-checked here so a
    /// hand-built key cannot escape the root.
    fn resolve(&self, key: &str) -> FileResult<PathBuf> {
        let mut path = self.root.clone();
        for segment in key.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
                return Err(FileError::InvalidKey(key.to_string()));
            }
            path.push(segment);
        }
        Ok(path)
    }
}

fn retrieval_url(key: &str, bytes: &[u8]) -> String {
    let digest = hex::encode(Sha256::digest(bytes));
    format!("store://{}?rev={}", key, &digest[..URL_DIGEST_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::{photo_key, report_key};

    fn setup_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("objects")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_upload_and_list() {
        let (_dir, store) = setup_store();

        let key = report_key("pat-1", "bloodwork.pdf").unwrap();
        let url = store.upload(&key, b"report body").unwrap();
        assert!(url.starts_with("store://reports/pat-1/bloodwork.pdf?rev="));

        let names = store.list("reports/pat-1").unwrap();
        assert_eq!(names, vec!["bloodwork.pdf"]);
    }

    #[test]
    fn test_url_is_stable_per_content() {
        let (_dir, store) = setup_store();

        let key = report_key("pat-1", "scan.pdf").unwrap();
        let first = store.upload(&key, b"v1").unwrap();
        assert_eq!(store.url_for(&key).unwrap(), first);

        // Overwriting changes the revision: last write wins.
        let second = store.upload(&key, b"v2").unwrap();
        assert_ne!(first, second);
        assert_eq!(store.url_for(&key).unwrap(), second);
    }

    #[test]
    fn test_list_empty_prefix() {
        let (_dir, store) = setup_store();
        assert!(store.list("reports/nobody").unwrap().is_empty());
    }

    #[test]
    fn test_latest_report_takes_first_file() {
        let (_dir, store) = setup_store();

        store
            .upload(&report_key("pat-1", "b-followup.pdf").unwrap(), b"two")
            .unwrap();
        store
            .upload(&report_key("pat-1", "a-bloodwork.pdf").unwrap(), b"one")
            .unwrap();

        let report = store.latest_report("pat-1").unwrap();
        assert_eq!(report.name, "a-bloodwork.pdf");
        assert!(report.url.contains("a-bloodwork.pdf"));
    }

    #[test]
    fn test_no_report_is_none() {
        let (_dir, store) = setup_store();
        assert!(store.latest_report("pat-1").is_none());
        // A bad patient id degrades to "no report" rather than erroring.
        assert!(store.latest_report("../pat-1").is_none());
    }

    #[test]
    fn test_photo_falls_back_to_placeholder() {
        let (_dir, store) = setup_store();

        assert_eq!(
            store.profile_photo_url(Role::Doctor, "doc-1"),
            DEFAULT_PHOTO_URL
        );
        assert_eq!(
            store.profile_photo_url(Role::Unknown, "doc-1"),
            DEFAULT_PHOTO_URL
        );

        store
            .upload(&photo_key(Role::Doctor, "doc-1", "portrait.jpg").unwrap(), b"jpeg")
            .unwrap();
        let url = store.profile_photo_url(Role::Doctor, "doc-1");
        assert!(url.contains("doctors/doc-1/portrait.jpg"));
    }

    #[test]
    fn test_resolve_rejects_escape() {
        let (_dir, store) = setup_store();
        assert!(store.upload("reports/../../etc/passwd", b"x").is_err());
        assert!(store.list("..").is_err());
    }
}
