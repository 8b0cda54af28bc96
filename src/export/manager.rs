use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::export::{
    export_image_async,
    file::{FileSaveConfig, save_export},
    types::{ExportError, ExportOutcome, ExportResult, ExportSettings, ExportStatus},
};
use crate::scene::RenderSnapshot;

struct ExportRequest {
    snapshot: RenderSnapshot,
    settings: ExportSettings,
    save_config: Option<FileSaveConfig>,
}

/// Runs exports on a background task so the editing side never waits on
/// rendering or encoding.
///
/// Each request carries its own snapshot; edits made after submitting do not
/// affect the export.
#[derive(Clone)]
pub struct ExportManager {
    request_tx: mpsc::UnboundedSender<ExportRequest>,
    status: Arc<Mutex<ExportStatus>>,
    last_result: Arc<Mutex<Option<ExportOutcome>>>,
}

impl ExportManager {
    /// Create a new export manager, spawning its worker on `runtime_handle`.
    pub fn new(runtime_handle: &tokio::runtime::Handle) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ExportRequest>();
        let status = Arc::new(Mutex::new(ExportStatus::Idle));
        let last_result = Arc::new(Mutex::new(None));

        let status_clone = status.clone();
        let result_clone = last_result.clone();

        runtime_handle.spawn(async move {
            while let Some(request) = request_rx.recv().await {
                log::debug!(
                    "Processing export request: {:?} at {}x",
                    request.settings.format,
                    request.settings.scale
                );
                *status_clone.lock().await = ExportStatus::InProgress;

                match perform_export(request).await {
                    Ok(result) => {
                        log::info!("Export successful: {:?}", result.saved_path);
                        *status_clone.lock().await = ExportStatus::Success;
                        *result_clone.lock().await = Some(ExportOutcome::Success(result));
                    }
                    Err(e) => {
                        let error_message = e.to_string();
                        log::error!("Export failed: {}", error_message);
                        *status_clone.lock().await = ExportStatus::Failed(error_message.clone());
                        *result_clone.lock().await = Some(ExportOutcome::Failed(error_message));
                    }
                }
            }
        });

        Self {
            request_tx,
            status,
            last_result,
        }
    }

    /// Queues an export of `snapshot`. Returns immediately.
    ///
    /// With a `save_config` the encoded image is also written to disk.
    pub fn request_export(
        &self,
        snapshot: RenderSnapshot,
        settings: ExportSettings,
        save_config: Option<FileSaveConfig>,
    ) -> Result<(), ExportError> {
        self.request_tx
            .send(ExportRequest {
                snapshot,
                settings,
                save_config,
            })
            .map_err(|_| ExportError::Task("Export manager not running".to_string()))
    }

    pub async fn get_status(&self) -> ExportStatus {
        self.status.lock().await.clone()
    }

    /// Get the result of the last export and clear it.
    pub async fn take_result(&self) -> Option<ExportOutcome> {
        self.last_result.lock().await.take()
    }

    /// Try to get the result without waiting (non-blocking).
    pub fn try_take_result(&self) -> Option<ExportOutcome> {
        self.last_result.try_lock().ok().and_then(|mut r| r.take())
    }

    /// Reset status to idle.
    pub async fn reset(&self) {
        *self.status.lock().await = ExportStatus::Idle;
    }
}

async fn perform_export(request: ExportRequest) -> Result<ExportResult, ExportError> {
    let format = request.settings.format;
    let data = export_image_async(request.snapshot, request.settings).await?;

    let saved_path = match request.save_config {
        Some(config) => {
            let bytes = data.clone();
            let path = tokio::task::spawn_blocking(move || save_export(&bytes, &config))
                .await
                .map_err(|e| ExportError::Task(e.to_string()))??;
            Some(path)
        }
        None => None,
    };

    Ok(ExportResult {
        data,
        format,
        saved_path,
    })
}

#[cfg(test)]
impl ExportManager {
    pub(crate) fn with_closed_channel_for_test() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<ExportRequest>();
        drop(rx);
        Self {
            request_tx: tx,
            status: Arc::new(Mutex::new(ExportStatus::Idle)),
            last_result: Arc::new(Mutex::new(None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportFormat;
    use crate::scene::SubjectImage;
    use std::time::Duration;

    fn snapshot() -> RenderSnapshot {
        let subject = SubjectImage::from_rgba(10, 10, &[90u8; 400]).unwrap();
        RenderSnapshot::default().with_subject(subject)
    }

    async fn wait_for_result(manager: &ExportManager) -> ExportOutcome {
        for _ in 0..200 {
            if let Some(outcome) = manager.take_result().await {
                return outcome;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("export did not finish");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn export_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ExportManager::new(&tokio::runtime::Handle::current());
        let save = FileSaveConfig {
            save_directory: dir.path().to_path_buf(),
            filename_template: "export".into(),
            format: ExportFormat::Png,
        };

        manager
            .request_export(snapshot(), ExportSettings::default(), Some(save))
            .unwrap();

        match wait_for_result(&manager).await {
            ExportOutcome::Success(result) => {
                let path = result.saved_path.unwrap();
                assert_eq!(std::fs::read(path).unwrap(), result.data);
            }
            ExportOutcome::Failed(err) => panic!("export failed: {err}"),
        }
        assert_eq!(manager.get_status().await, ExportStatus::Success);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_subject_reports_failure() {
        let manager = ExportManager::new(&tokio::runtime::Handle::current());
        manager
            .request_export(RenderSnapshot::default(), ExportSettings::default(), None)
            .unwrap();

        assert!(matches!(
            wait_for_result(&manager).await,
            ExportOutcome::Failed(_)
        ));
        assert!(matches!(
            manager.get_status().await,
            ExportStatus::Failed(_)
        ));
        manager.reset().await;
        assert_eq!(manager.get_status().await, ExportStatus::Idle);
    }

    #[test]
    fn closed_channel_rejects_requests() {
        let manager = ExportManager::with_closed_channel_for_test();
        let err = manager
            .request_export(snapshot(), ExportSettings::default(), None)
            .unwrap_err();
        assert!(matches!(err, ExportError::Task(_)));
        assert!(manager.try_take_result().is_none());
    }
}
