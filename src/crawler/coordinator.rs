//! Crawl coordination
//!
//! This module owns the concurrent crawl engine:
//! - the work queue of URLs pending processing
//! - the worker tasks that fetch, extract, and mutate the stores
//! - redirect acceptance and sitemap rewriting
//! - the termination check that decides when the crawl has quiesced
//!
//! There is no counter of outstanding work. The crawl is finished exactly
//! when the queue is empty, no URL is in the visiting state, and every URL
//! ever enqueued has been visited; every worker re-evaluates that condition
//! after each unit of work, and the first one to observe it raises the
//! completion signal.

use crate::crawler::fetcher::{
    build_http_client, fetch_url_with_policy, FetchResult, RetryPolicy,
};
use crate::crawler::parser::extract_links;
use crate::sitemap::{Node, SitemapStore};
use crate::state::{ToVisitSet, VisitStateMap, VisitStatus};
use crate::url::normalize_url;
use parking_lot::Mutex;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Notify;
use url::Url;

/// Crawls a domain and returns the root of its sitemap tree
///
/// Workers fetch pages concurrently until every discovered same-domain URL
/// has been processed. Fetch failures never abort the crawl; a failing URL
/// simply keeps its childless node.
///
/// # Arguments
///
/// * `seed` - The canonical URL to start from (see
///   [`canonicalize_seed`](crate::canonicalize_seed))
/// * `workers` - Number of concurrent workers; values below 1 are treated
///   as 1
///
/// # Returns
///
/// * `Ok(Node)` - The sitemap root once the crawl has quiesced
/// * `Err(SitemapperError)` - The HTTP client could not be built
pub async fn crawl(seed: &str, workers: usize) -> crate::Result<Node> {
    crawl_with_policy(seed, workers, RetryPolicy::default()).await
}

/// Crawls a domain with a custom 5xx retry policy
///
/// This is [`crawl`] with the backoff schedule exposed; tests use it to
/// exercise retries on millisecond delays.
pub async fn crawl_with_policy(
    seed: &str,
    workers: usize,
    retry_policy: RetryPolicy,
) -> crate::Result<Node> {
    let client = build_http_client()?;
    let (queue_tx, queue_rx) = mpsc::unbounded_channel();

    let coordinator = Arc::new(Coordinator {
        sitemap: Mutex::new(SitemapStore::new(seed)),
        visit_state: VisitStateMap::new(),
        to_visit: ToVisitSet::new(),
        queue_tx,
        queue_depth: AtomicUsize::new(0),
        client,
        retry_policy,
        completed: AtomicBool::new(false),
        done: Notify::new(),
    });
    coordinator.to_visit.insert(seed);

    let queue_rx = Arc::new(tokio::sync::Mutex::new(queue_rx));
    let handles: Vec<_> = (0..workers.max(1))
        .map(|id| tokio::spawn(worker_loop(id, coordinator.clone(), queue_rx.clone())))
        .collect();

    tracing::info!("Initializing queue...");
    coordinator.enqueue(seed.to_string());

    coordinator.done.notified().await;
    tracing::info!("Done crawling...");

    // All work has quiesced; the workers are parked on the empty queue.
    for handle in &handles {
        handle.abort();
    }
    for handle in handles {
        let _ = handle.await;
    }

    let root = match Arc::try_unwrap(coordinator) {
        Ok(coordinator) => coordinator.sitemap.into_inner().into_root(),
        Err(coordinator) => coordinator.sitemap.lock().root().clone(),
    };
    Ok(root)
}

/// Shared state of one crawl invocation
struct Coordinator {
    sitemap: Mutex<SitemapStore>,
    visit_state: VisitStateMap,
    to_visit: ToVisitSet,
    queue_tx: UnboundedSender<String>,
    /// URLs sent but not yet received; the termination check's
    /// queue-empty test
    queue_depth: AtomicUsize,
    client: Client,
    retry_policy: RetryPolicy,
    completed: AtomicBool,
    done: Notify,
}

impl Coordinator {
    /// Puts a URL on the work queue without blocking
    fn enqueue(&self, url: String) {
        self.queue_depth.fetch_add(1, Ordering::SeqCst);
        if self.queue_tx.send(url).is_err() {
            // receiver gone, the crawl is already shutting down
            self.queue_depth.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Raises the completion signal if the crawl has quiesced
    ///
    /// Quiescence is: queue empty, nothing in the visiting state, and every
    /// URL in the to-visit set visited. The visit-state lock is held while
    /// the to-visit size is read; children are added to the to-visit set
    /// before their parent is marked visited, so a consistent snapshot can
    /// never under-count outstanding work. False negatives are fine (the
    /// next worker re-checks), false positives cannot happen.
    fn check_completion(&self) {
        if self.queue_depth.load(Ordering::SeqCst) != 0 {
            return;
        }

        let state = self.visit_state.guard();
        let still_visiting = state.values().any(|s| *s == VisitStatus::Visiting);
        let visited = state
            .values()
            .filter(|s| **s == VisitStatus::Visited)
            .count();
        let to_visit = self.to_visit.len();
        drop(state);

        if !still_visiting
            && visited == to_visit
            && !self.completed.swap(true, Ordering::SeqCst)
        {
            self.done.notify_one();
        }
    }
}

/// One worker: drains the queue until the crawl shuts down
async fn worker_loop(
    id: usize,
    coordinator: Arc<Coordinator>,
    queue_rx: Arc<tokio::sync::Mutex<UnboundedReceiver<String>>>,
) {
    loop {
        let received = { queue_rx.lock().await.recv().await };
        let Some(current) = received else {
            break;
        };
        coordinator.queue_depth.fetch_sub(1, Ordering::SeqCst);

        // at-most-once: skip URLs another worker already picked up
        if !coordinator.visit_state.claim(&current) {
            coordinator.check_completion();
            continue;
        }

        tracing::info!("Worker #{}: crawling {}", id, current);
        process_url(id, &coordinator, &current).await;

        coordinator.visit_state.mark_visited(&current);
        coordinator.check_completion();
    }
}

/// Fetches one claimed URL and applies its effects to the stores
///
/// The sitemap mutations for a URL complete before its children are
/// enqueued, so a dequeued child always finds its parent in the parent-of
/// index. The caller marks the URL visited afterwards, on every path.
async fn process_url(id: usize, coordinator: &Coordinator, current: &str) {
    let result =
        fetch_url_with_policy(&coordinator.client, current, &coordinator.retry_policy).await;

    match result {
        FetchResult::Success { body } => {
            let current_url = match Url::parse(current) {
                Ok(url) => url,
                Err(err) => {
                    tracing::error!("Worker #{}: invalid URL {}: {}", id, current, err);
                    return;
                }
            };

            let links = match extract_links(&current_url, &body) {
                Ok(links) => links,
                Err(err) => {
                    tracing::error!(
                        "Worker #{}: failed to extract links from {}: {}",
                        id,
                        current,
                        err
                    );
                    return;
                }
            };

            {
                // lock order: sitemap, then to-visit
                let mut sitemap = coordinator.sitemap.lock();
                sitemap.insert_children(current, &links);
                for link in &links {
                    coordinator.to_visit.insert(link);
                }
            }

            for link in links {
                coordinator.enqueue(link);
            }
        }

        FetchResult::Redirect { status, location } => {
            // redirects are a normal end for this URL, not an error
            tracing::debug!("Worker #{}: {} redirected with {}", id, current, status);

            let Some(target) = location else {
                return;
            };
            let Some(target) = accept_redirect(current, &target) else {
                return;
            };

            coordinator.to_visit.insert(&target);
            coordinator.sitemap.lock().rewrite_redirect(current, &target);
            coordinator.enqueue(target);
        }

        FetchResult::HttpError { status } => {
            tracing::error!("Worker #{}: giving up on {} (HTTP {})", id, current, status);
        }

        FetchResult::NetworkError { error } => {
            tracing::error!("Worker #{}: failed to fetch {}: {}", id, current, error);
        }
    }
}

/// Decides whether a redirect target replaces its source in the sitemap
///
/// The target is accepted when it stays on the source's host and, after
/// normalization, differs from the source URL. Cross-host redirects (for
/// example to another subdomain) are dropped; the source keeps its
/// childless node.
fn accept_redirect(current: &str, target: &str) -> Option<String> {
    let current_url = Url::parse(current).ok()?;
    let target_url = Url::parse(target).ok()?;

    if current_url.host_str() != target_url.host_str() {
        return None;
    }

    let normalized = normalize_url(target);
    if normalized == current {
        return None;
    }
    Some(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_redirect_same_host() {
        let target = accept_redirect("http://example.com/old", "http://example.com/new");
        assert_eq!(target.as_deref(), Some("http://example.com/new"));
    }

    #[test]
    fn test_accept_redirect_strips_query() {
        let target = accept_redirect("http://example.com/old", "http://example.com/new?from=old");
        assert_eq!(target.as_deref(), Some("http://example.com/new"));
    }

    #[test]
    fn test_reject_redirect_to_other_host() {
        let target = accept_redirect("http://example.com/blog", "http://blog.example.com/");
        assert_eq!(target, None);
    }

    #[test]
    fn test_reject_redirect_to_self() {
        let target = accept_redirect("http://example.com/page", "http://example.com/page#frag");
        assert_eq!(target, None);
    }

    #[test]
    fn test_reject_unparsable_target() {
        assert_eq!(accept_redirect("http://example.com/", "http://["), None);
    }
}
