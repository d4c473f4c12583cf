use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::SharePlatform;
use crate::{
    entities::ShareData,
    error::{share_error, Error},
};

/// Terminal stand-in for the browser: there is no share sheet, and the
/// clipboard is the process's stdout.
#[derive(Clone, Debug, Default)]
pub struct ConsoleSharePlatform;

#[async_trait]
impl SharePlatform for ConsoleSharePlatform {
    fn supports_native_share(&self) -> bool {
        false
    }

    async fn share(&self, _data: &ShareData) -> Result<(), Error> {
        Err(share_error("NotSupportedError: native sharing is unavailable"))
    }

    #[tracing::instrument(skip(self))]
    async fn write_clipboard(&self, text: &str) -> Result<(), Error> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(format!("{}\n", text).as_bytes()).await?;
        stdout.flush().await?;

        Ok(())
    }
}
