//! Timeout wrapper for page operations

use std::future::Future;
use std::time::Duration;

use crate::error::RenderError;

/// Run `operation` under `tokio::time::timeout`.
///
/// Expiry becomes `RenderError::Timeout` naming `operation_name`; an error
/// from the operation itself is returned unchanged.
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout_secs: u64,
    operation_name: &str,
) -> Result<T, RenderError>
where
    F: Future<Output = Result<T, RenderError>>,
{
    match tokio::time::timeout(Duration::from_secs(timeout_secs), operation).await {
        Ok(result) => result,
        Err(_) => Err(RenderError::Timeout {
            operation: operation_name.to_string(),
            secs: timeout_secs,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_result() {
        let ok = with_page_timeout(async { Ok::<_, RenderError>(7) }, 1, "noop").await;
        assert_eq!(ok.unwrap(), 7);
    }

    #[tokio::test]
    async fn expiry_is_a_timeout_error() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, RenderError>(())
        };
        let err = with_page_timeout(slow, 1, "Navigation").await.unwrap_err();
        assert_eq!(err.to_string(), "Navigation timeout after 1 seconds");
    }
}
