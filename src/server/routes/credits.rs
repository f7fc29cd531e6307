use std::sync::Arc;

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::response::Json;
use chrono::Utc;
use tracing::info;

use crate::core::models::spending::CreditHistory;
use crate::core::spending::report::build_history;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// `GET /api/credits/history`, admin only.
pub async fn credit_history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<CreditHistory>, ApiError> {
    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let user = state.auth.require_admin(authorization)?;
    info!("Credit history requested by {}", user.uid);

    let history = build_history(state.store.clone(), state.balance.as_ref(), Utc::now()).await?;
    Ok(Json(history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::Authenticator;
    use crate::core::config::UserConfig;
    use crate::core::exaroton::{BalanceSource, BoxFuture, ExarotonError};
    use crate::core::models::credits::CreditSnapshot;
    use crate::core::store::memory::MemorySnapshotStore;
    use axum::http::{HeaderValue, StatusCode};
    use axum::response::IntoResponse;
    use chrono::{DateTime, Duration};

    struct FixedBalance(Option<f64>);

    impl BalanceSource for FixedBalance {
        fn current_credits(&self) -> BoxFuture<'_, Result<f64, ExarotonError>> {
            let result = self
                .0
                .ok_or_else(|| ExarotonError::Api("Exaroton is down".to_string()));
            Box::pin(async move { result })
        }
    }

    fn snap(ts: DateTime<Utc>, credits: f64) -> CreditSnapshot {
        CreditSnapshot {
            id: ts.timestamp_millis().to_string(),
            credits,
            timestamp: ts,
            snapshot_type: "scheduled".to_string(),
            server_states: vec![],
        }
    }

    fn state(balance: Option<f64>, snapshots: Vec<CreditSnapshot>) -> Arc<AppState> {
        let users = vec![
            UserConfig {
                uid: "alice".to_string(),
                token: "admin-token".to_string(),
                role: "admin".to_string(),
            },
            UserConfig {
                uid: "bob".to_string(),
                token: "viewer-token".to_string(),
                role: "viewer".to_string(),
            },
        ];
        Arc::new(AppState {
            store: Arc::new(MemorySnapshotStore::with_snapshots(snapshots)),
            balance: Arc::new(FixedBalance(balance)),
            auth: Authenticator::new(&users),
        })
    }

    fn headers(token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).unwrap();
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    #[tokio::test]
    async fn admin_gets_history() {
        let now = Utc::now();
        let snapshots = vec![
            snap(now - Duration::days(3), 200.0),
            snap(now - Duration::minutes(30), 150.0),
        ];
        let Json(history) = credit_history(
            State(state(Some(140.0), snapshots)),
            headers(Some("admin-token")),
        )
        .await
        .unwrap();

        assert_eq!(history.current_credits, 140.0);
        assert_eq!(history.total_snapshots, 2);
        assert_eq!(history.spending.month.start_credits, 200.0);
        assert_eq!(history.spending.month.spent, 60.0);
        assert!(history.daily_breakdown.len() <= 7);
        assert_eq!(
            history.last_snapshot.map(|s| s.credits),
            Some(150.0)
        );
    }

    #[tokio::test]
    async fn empty_store_reports_zero_spend() {
        let Json(history) = credit_history(
            State(state(Some(50.0), vec![])),
            headers(Some("admin-token")),
        )
        .await
        .unwrap();
        assert_eq!(history.spending.day.start_credits, 50.0);
        assert_eq!(history.spending.day.end_credits, 50.0);
        assert_eq!(history.spending.day.spent, 0.0);
        assert!(history.last_snapshot.is_none());
    }

    #[tokio::test]
    async fn missing_token_is_401() {
        let err = credit_history(State(state(Some(1.0), vec![])), headers(None))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_token_is_401() {
        let err = credit_history(State(state(Some(1.0), vec![])), headers(Some("guess")))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn viewer_is_403() {
        let err = credit_history(
            State(state(Some(1.0), vec![])),
            headers(Some("viewer-token")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn balance_failure_is_500_with_message() {
        let err = credit_history(State(state(None, vec![])), headers(Some("admin-token")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Exaroton is down"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
