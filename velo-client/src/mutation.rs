use std::future::Future;

use crate::error::ClientError;

/// 一次“写请求 + 重新拉取”的结果
#[derive(Debug)]
pub enum MutationOutcome<T> {
    /// 写成功，`T` 是重新拉取到的数据
    Applied(T),
    /// 写失败，界面保持原样
    Failed(ClientError),
    /// 写成功，但重新拉取失败，界面上的数据已经过期
    RefreshFailed(ClientError),
}

impl<T> MutationOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied(_))
    }

    /// 服务端是否已经接受了这次修改
    pub fn was_written(&self) -> bool {
        !matches!(self, MutationOutcome::Failed(_))
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            MutationOutcome::Applied(_) => None,
            MutationOutcome::Failed(e) | MutationOutcome::RefreshFailed(e) => Some(e),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MutationOutcome<U> {
        match self {
            MutationOutcome::Applied(value) => MutationOutcome::Applied(f(value)),
            MutationOutcome::Failed(e) => MutationOutcome::Failed(e),
            MutationOutcome::RefreshFailed(e) => MutationOutcome::RefreshFailed(e),
        }
    }

    /// 给用户看的提示
    pub fn notice(&self, success: &str) -> String {
        match self {
            MutationOutcome::Applied(_) => success.to_string(),
            MutationOutcome::Failed(e) => e.user_message(),
            MutationOutcome::RefreshFailed(e) => {
                format!("{} (rechargement impossible : {})", success, e.user_message())
            }
        }
    }
}

/// 先发写请求，成功后再调用 `refresh` 重新拉取整张列表。
///
/// 写失败时不会调用 `refresh`。
pub async fn mutate<R, T, M, F, Fut>(request: M, refresh: F) -> MutationOutcome<T>
where
    M: Future<Output = Result<R, ClientError>>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    if let Err(e) = request.await {
        tracing::warn!(error = %e, "mutation failed");
        return MutationOutcome::Failed(e);
    }

    match refresh().await {
        Ok(value) => MutationOutcome::Applied(value),
        Err(e) => {
            tracing::warn!(error = %e, "refresh after mutation failed");
            MutationOutcome::RefreshFailed(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::cell::Cell;

    fn api_error(status: StatusCode) -> ClientError {
        ClientError::Api { status, message: "boom".to_string() }
    }

    #[tokio::test]
    async fn test_success_refreshes() {
        let outcome = mutate(async { Ok::<_, ClientError>(()) }, || async { Ok::<_, ClientError>(vec![1, 2]) }).await;

        assert!(outcome.is_applied());
        assert!(matches!(outcome, MutationOutcome::Applied(v) if v == vec![1, 2]));
    }

    #[tokio::test]
    async fn test_failed_request_skips_refresh() {
        let flag = Cell::new(false);
        let refreshed = &flag;

        let outcome = mutate(async { Err::<(), _>(api_error(StatusCode::NOT_FOUND)) }, move || async move {
            refreshed.set(true);
            Ok::<_, ClientError>(())
        })
            .await;

        assert!(!flag.get());
        assert!(!outcome.was_written());
        assert!(outcome.error().is_some_and(ClientError::is_not_found));
    }

    #[tokio::test]
    async fn test_refresh_failure_is_reported_separately() {
        let outcome = mutate(async { Ok::<_, ClientError>(()) }, || async {
            Err::<Vec<i32>, _>(api_error(StatusCode::INTERNAL_SERVER_ERROR))
        })
            .await;

        assert!(matches!(outcome, MutationOutcome::RefreshFailed(_)));
        assert!(outcome.was_written());
        assert!(outcome.notice("Produit supprimé").starts_with("Produit supprimé"));
    }

    #[test]
    fn test_map_keeps_errors() {
        let outcome: MutationOutcome<i32> = MutationOutcome::Failed(ClientError::NoSession);
        let mapped = outcome.map(|n| n * 2);
        assert!(matches!(mapped, MutationOutcome::Failed(ClientError::NoSession)));
        assert_eq!(mapped.notice("ok"), "Veuillez vous connecter");
    }
}
