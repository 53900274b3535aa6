use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::data_source::{SnapshotFuture, SnapshotRequest, SnapshotSource, SourceError};
use crate::{FinancialSnapshot, ProviderId};

/// Reads `<TICKER>.json` snapshots from a directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, req: &SnapshotRequest) -> PathBuf {
        self.root.join(req.ticker.snapshot_file_name())
    }
}

impl SnapshotSource for FileSource {
    fn id(&self) -> ProviderId {
        ProviderId::File
    }

    fn fetch<'a>(&'a self, req: SnapshotRequest) -> SnapshotFuture<'a> {
        Box::pin(async move {
            let path = self.path_for(&req);
            let raw = tokio::fs::read_to_string(&path)
                .await
                .map_err(|error| match error.kind() {
                    ErrorKind::NotFound => SourceError::data_unavailable(format!(
                        "no snapshot file for '{}' at {}",
                        req.ticker,
                        path.display()
                    )),
                    _ => SourceError::internal(format!(
                        "failed to read {}: {error}",
                        path.display()
                    )),
                })?;

            let snapshot: FinancialSnapshot = serde_json::from_str(&raw).map_err(|error| {
                SourceError::malformed_payload(format!("{}: {error}", path.display()))
            })?;

            if snapshot.ticker != req.ticker {
                return Err(SourceError::malformed_payload(format!(
                    "{} holds ticker '{}', expected '{}'",
                    path.display(),
                    snapshot.ticker,
                    req.ticker
                )));
            }

            Ok(snapshot)
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::data_source::SourceErrorKind;

    #[tokio::test]
    async fn reads_snapshot_named_after_ticker() {
        let dir = tempdir().expect("tempdir");
        let snapshot = FinancialSnapshot::sample();
        std::fs::write(
            dir.path().join("AAPL.json"),
            serde_json::to_string(&snapshot).expect("serialize"),
        )
        .expect("write");

        let source = FileSource::new(dir.path());
        let request = SnapshotRequest::parse("aapl").expect("request");
        assert_eq!(source.fetch(request).await.expect("read"), snapshot);
    }

    #[tokio::test]
    async fn missing_file_is_data_unavailable() {
        let dir = tempdir().expect("tempdir");
        let source = FileSource::new(dir.path());
        let request = SnapshotRequest::parse("MSFT").expect("request");
        let err = source.fetch(request).await.expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::DataUnavailable);
    }

    #[tokio::test]
    async fn mismatched_ticker_is_malformed() {
        let dir = tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("MSFT.json"),
            serde_json::to_string(&FinancialSnapshot::sample()).expect("serialize"),
        )
        .expect("write");

        let source = FileSource::new(dir.path());
        let request = SnapshotRequest::parse("MSFT").expect("request");
        let err = source.fetch(request).await.expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::MalformedPayload);
    }
}
