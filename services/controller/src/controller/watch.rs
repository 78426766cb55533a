//! Watch loop feeding the admission handler.

use futures::StreamExt;
use kombiner_api::PlacementRequest;
use kube::runtime::{watcher, WatchStreamExt};
use kube::{Api, Client};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::admission::Admission;

/// Watches PlacementRequests across all namespaces and routes every
/// delivered object through admission. Re-deliveries on resync are fine:
/// dispatch skips requests that already carry a terminal status, and
/// rejected requests are simply re-rejected.
pub async fn watch_placement_requests(
    client: Client,
    admission: Admission,
    shutdown: CancellationToken,
) {
    let api: Api<PlacementRequest> = Api::all(client);
    let mut stream = watcher(api, watcher::Config::default())
        .default_backoff()
        .applied_objects()
        .boxed();

    info!("watching placement requests");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("placement request watch stopping");
                return;
            }
            event = stream.next() => match event {
                Some(Ok(pr)) => admission.admit(pr).await,
                Some(Err(err)) => warn!(error = %err, "placement request watch error"),
                None => {
                    warn!("placement request watch stream ended");
                    return;
                }
            }
        }
    }
}
