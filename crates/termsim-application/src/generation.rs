use std::time::Duration;

use termsim_core::{GenerationRequest, Result, TermsimError, TextGenerator};

const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Calls the generator, converting an elapsed deadline into `TermsimError::Timeout`.
///
/// A retryable failure (rate limit, 5xx, connection error) is retried once.
pub(crate) async fn generate_with_timeout(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
    timeout: Duration,
) -> Result<String> {
    match attempt(generator, request, timeout).await {
        Err(err) if err.is_retryable() => {
            tracing::debug!(prompt = request.kind.label(), error = %err, "retrying generation once");
            tokio::time::sleep(RETRY_DELAY).await;
            attempt(generator, request, timeout).await
        }
        other => other,
    }
}

async fn attempt(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
    timeout: Duration,
) -> Result<String> {
    match tokio::time::timeout(timeout, generator.generate(request)).await {
        Ok(reply) => reply,
        Err(_) => Err(TermsimError::timeout(request.kind.label(), timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use termsim_core::PromptKind;

    /// Fails with the given error for the first `failures` calls.
    struct FlakyGenerator {
        failures: usize,
        retryable: bool,
        calls: AtomicUsize,
    }

    impl FlakyGenerator {
        fn new(failures: usize, retryable: bool) -> Self {
            Self {
                failures,
                retryable,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for FlakyGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(TermsimError::Generation {
                    message: "503 Service Unavailable".into(),
                    retryable: self.retryable,
                });
            }
            Ok("ok".into())
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new(PromptKind::ParseCommand)
    }

    #[tokio::test(start_paused = true)]
    async fn test_retryable_failure_is_retried_once() {
        let generator = FlakyGenerator::new(1, true);

        let reply = generate_with_timeout(&generator, &request(), Duration::from_secs(1)).await;

        assert_eq!(reply.unwrap(), "ok");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_failure_is_returned() {
        let generator = FlakyGenerator::new(5, true);

        let err = generate_with_timeout(&generator, &request(), Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_failure_is_not_retried() {
        let generator = FlakyGenerator::new(1, false);

        assert!(generate_with_timeout(&generator, &request(), Duration::from_secs(1)).await.is_err());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_not_retried() {
        struct Stalled(AtomicUsize);

        #[async_trait]
        impl TextGenerator for Stalled {
            async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
                self.0.fetch_add(1, Ordering::SeqCst);
                std::future::pending().await
            }
        }

        let generator = Stalled(AtomicUsize::new(0));
        let err = generate_with_timeout(&generator, &request(), Duration::from_millis(200))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(generator.0.load(Ordering::SeqCst), 1);
    }
}
