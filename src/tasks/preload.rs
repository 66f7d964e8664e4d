//! Preload Task
//!
//! Runs a preload batch on its own task so the caller is not held up by
//! network fetches.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::client::BlobLoader;

/// Spawns a task that preloads `urls` through `loader`.
///
/// Preloading never fails, so the handle only reports completion. Aborting
/// it cancels every fetch still in flight for this batch; nothing is stored
/// for a cancelled fetch.
///
/// # Example
/// ```ignore
/// let handle = spawn_preload_task(loader.clone(), vec![url_a, url_b]);
/// handle.await?;
/// ```
pub fn spawn_preload_task(loader: Arc<dyn BlobLoader>, urls: Vec<String>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let requested = urls.len();
        loader.preload_blobs(&urls).await;
        info!(requested, "Preload batch finished");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::error::Result;

    /// Records preload batches; loads always succeed.
    #[derive(Default)]
    struct RecordingLoader {
        batches: Mutex<Vec<Vec<String>>>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl BlobLoader for RecordingLoader {
        async fn load_blob(&self, _key: &str) -> Result<Bytes> {
            Ok(Bytes::new())
        }

        async fn preload_blobs(&self, keys: &[String]) {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.batches.lock().unwrap().push(keys.to_vec());
        }
    }

    #[tokio::test]
    async fn test_preload_task_runs_batch() {
        let loader = Arc::new(RecordingLoader::default());
        let urls = vec!["https://example.com/1.png".to_string()];

        spawn_preload_task(loader.clone(), urls.clone()).await.unwrap();

        assert_eq!(*loader.batches.lock().unwrap(), vec![urls]);
    }

    #[tokio::test]
    async fn test_preload_task_can_be_aborted() {
        let loader = Arc::new(RecordingLoader {
            delay: Some(Duration::from_secs(60)),
            ..RecordingLoader::default()
        });

        let handle = spawn_preload_task(loader.clone(), vec!["https://example.com/1.png".into()]);
        handle.abort();

        let result = handle.await;
        assert!(result.unwrap_err().is_cancelled());
        assert!(loader.batches.lock().unwrap().is_empty());
    }
}
