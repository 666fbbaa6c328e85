//! Background worker persisting click events.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::NewClick;
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// Retries after the first failed write.
const MAX_RETRIES: usize = 3;

/// Consumes click events until every sender is dropped.
///
/// Up to `concurrency` writes run at once. Each write is retried with
/// jittered exponential backoff on infrastructure errors; clicks for links
/// that no longer exist are dropped immediately. In-flight writes are awaited
/// before the worker returns.
pub async fn run_click_worker<R>(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<R>,
    concurrency: usize,
) where
    R: ClickRepository + ?Sized + 'static,
{
    let concurrency = concurrency.max(1);
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        while in_flight.len() >= concurrency {
            in_flight.join_next().await;
        }

        let repository = repository.clone();
        in_flight.spawn(async move {
            record_with_retry(repository.as_ref(), event.into()).await;
        });
    }

    while in_flight.join_next().await.is_some() {}

    info!("Click worker stopped");
}

async fn record_with_retry<R>(repository: &R, click: NewClick)
where
    R: ClickRepository + ?Sized,
{
    // 50ms, 100ms, 200ms before jitter
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(25)
        .max_delay(Duration::from_secs(2))
        .map(jitter)
        .take(MAX_RETRIES);

    let result = RetryIf::start(
        strategy,
        || repository.record(click.clone()),
        |e: &AppError| matches!(e, AppError::Internal { .. }),
    )
    .await;

    match result {
        Ok(()) => {
            metrics::counter!("clicks_recorded_total").increment(1);
            debug!(link_id = click.link_id, "Click recorded");
        }
        Err(e) => {
            metrics::counter!("clicks_failed_total").increment(1);
            warn!(link_id = click.link_id, error = %e, "Dropping click after failed write");
        }
    }
}
