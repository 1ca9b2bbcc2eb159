//! The asynchronous fetch operation.

use std::future::Future;
use std::sync::Arc;

use userlist_lib::UserSource;
use userlist_lib::api::query::{Page, PageRequest};
use userlist_lib::error::Error;

use super::Store;

/// How a fetch settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was stored.
    Loaded {
        /// Number of users in the page.
        count: usize,
    },
    /// The request failed; the loaded users are unchanged and `page` steps
    /// back to the last page that loaded.
    Failed,
    /// A newer fetch was issued before this one settled; the response was dropped.
    Stale,
}

impl Store {
    /// Fetches a page of users from `source` into the store.
    ///
    /// `loading` is raised before this returns; the returned future performs
    /// the request and settles the state. Page 1 replaces the loaded users,
    /// later pages append to them. Each call supersedes every earlier one:
    /// a response that arrives after a newer fetch was issued is discarded.
    pub fn fetch_users(
        &self,
        source: Arc<dyn UserSource>,
        request: PageRequest,
    ) -> impl Future<Output = FetchOutcome> + Send + 'static {
        let seq = self.begin_fetch(&request);
        let store = self.clone();
        async move {
            let result = source.fetch_users(&request).await;
            store.finish_fetch(seq, &request, result)
        }
    }

    fn begin_fetch(&self, request: &PageRequest) -> u64 {
        let seq = self.update_inner(|inner| {
            inner.latest_fetch += 1;
            inner.state.loading = true;
            inner.latest_fetch
        });
        log::debug!(
            "fetch #{} started: page {} (skip {}, limit {}), sort {} {}",
            seq,
            request.page,
            request.skip(),
            request.limit(),
            request.sort.key,
            request.sort.direction.as_str()
        );
        seq
    }

    fn finish_fetch(
        &self,
        seq: u64,
        request: &PageRequest,
        result: Result<Page, Error>,
    ) -> FetchOutcome {
        self.update_inner(|inner| {
            if seq != inner.latest_fetch {
                log::debug!(
                    "fetch #{} discarded, superseded by #{}",
                    seq,
                    inner.latest_fetch
                );
                return FetchOutcome::Stale;
            }

            let state = &mut inner.state;
            state.loading = false;

            match result {
                Ok(page) => {
                    let count = page.len();
                    state.has_more = !page.is_empty();
                    if request.page <= 1 {
                        state.all_users = page.into_users();
                    } else {
                        state.all_users.extend(page.into_users());
                    }
                    state.refilter();
                    inner.loaded = Some((request.page, request.sort));
                    log::info!(
                        "fetch #{} loaded {} users (page {}, {} total, {} shown)",
                        seq,
                        count,
                        request.page,
                        state.all_users.len(),
                        state.users.len()
                    );
                    FetchOutcome::Loaded { count }
                }
                Err(e) => {
                    log::warn!("fetch #{} failed: {}", seq, e);
                    // Step back so the failed page is requested again instead of skipped.
                    if let Some((page, sort)) = inner.loaded
                        && request.page > page
                        && request.sort == sort
                    {
                        state.page = page;
                        log::debug!("page rolled back to {}", page);
                    }
                    FetchOutcome::Failed
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::oneshot;
    use userlist_lib::api::query::{FilterSpec, Gender, SortKey, SortSpec};
    use userlist_lib::error::ApiError;

    use super::*;
    use crate::store::tests::users;

    /// Replies with queued results and records every request.
    #[derive(Default)]
    struct ScriptedSource {
        replies: Mutex<VecDeque<Result<Page, Error>>>,
        requests: Mutex<Vec<PageRequest>>,
    }

    impl ScriptedSource {
        fn with(replies: Vec<Result<Page, Error>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::default(),
            })
        }
    }

    #[async_trait]
    impl UserSource for ScriptedSource {
        async fn fetch_users(&self, request: &PageRequest) -> Result<Page, Error> {
            self.requests.lock().unwrap().push(*request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Page::new(Vec::new())))
        }
    }

    type Gate = oneshot::Receiver<Result<Page, Error>>;

    /// Each request waits on the reply channel registered for its sort key,
    /// so tests control the order in which requests settle.
    struct GatedSource {
        gates: Mutex<HashMap<SortKey, Gate>>,
    }

    impl GatedSource {
        fn with(gates: impl IntoIterator<Item = (SortKey, Gate)>) -> Arc<dyn UserSource> {
            Arc::new(Self {
                gates: Mutex::new(gates.into_iter().collect()),
            })
        }
    }

    #[async_trait]
    impl UserSource for GatedSource {
        async fn fetch_users(&self, request: &PageRequest) -> Result<Page, Error> {
            let gate = self.gates.lock().unwrap().remove(&request.sort.key).unwrap();
            gate.await.unwrap()
        }
    }

    fn network_error() -> Error {
        ApiError::http(502, "bad gateway").into()
    }

    #[tokio::test]
    async fn test_first_page_loads() {
        let store = Store::new();
        let source = ScriptedSource::with(vec![Ok(Page::new(users(1, 30)))]);

        let fut = store.fetch_users(source.clone(), PageRequest::new(1, 30));
        assert!(store.read(|s| s.loading));

        assert_eq!(fut.await, FetchOutcome::Loaded { count: 30 });
        let state = store.snapshot();
        assert!(!state.loading);
        assert!(state.has_more);
        assert_eq!(state.users.len(), 30);
        assert_eq!(state.all_users.len(), 30);

        let request = source.requests.lock().unwrap()[0];
        assert_eq!((request.skip(), request.limit()), (0, 30));
    }

    #[tokio::test]
    async fn test_empty_page_clears_has_more() {
        let store = Store::new();
        let source = ScriptedSource::with(vec![Ok(Page::new(Vec::new()))]);

        let outcome = store
            .fetch_users(source, PageRequest::new(1, 30))
            .await;

        assert_eq!(outcome, FetchOutcome::Loaded { count: 0 });
        assert!(!store.read(|s| s.has_more));
        assert!(!store.read(|s| s.loading));
    }

    #[tokio::test]
    async fn test_later_pages_append() {
        let store = Store::new();
        let source = ScriptedSource::with(vec![
            Ok(Page::new(users(1, 30))),
            Ok(Page::new(users(31, 30))),
        ]);

        store.fetch_users(source.clone(), PageRequest::new(1, 30)).await;
        store.fetch_users(source, PageRequest::new(2, 30)).await;

        let ids: Vec<u64> = store.read(|s| s.all_users.iter().map(|u| u.id).collect());
        assert_eq!(ids, (1..=60).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_first_page_replaces() {
        let store = Store::new();
        let source = ScriptedSource::with(vec![
            Ok(Page::new(users(1, 30))),
            Ok(Page::new(users(31, 30))),
            Ok(Page::new(users(100, 5))),
        ]);

        store.fetch_users(source.clone(), PageRequest::new(1, 30)).await;
        store.fetch_users(source.clone(), PageRequest::new(2, 30)).await;
        let request = PageRequest::new(1, 30).sort(SortSpec::desc(SortKey::Age));
        store.fetch_users(source, request).await;

        let ids: Vec<u64> = store.read(|s| s.all_users.iter().map(|u| u.id).collect());
        assert_eq!(ids, vec![100, 101, 102, 103, 104]);
    }

    #[tokio::test]
    async fn test_loaded_page_respects_active_filter() {
        let store = Store::new();
        store.set_filter(FilterSpec {
            gender: Some(Gender::Female),
            city: None,
        });
        let source = ScriptedSource::with(vec![Ok(Page::new(users(1, 10)))]);

        store.fetch_users(source, PageRequest::new(1, 30)).await;

        let state = store.snapshot();
        assert_eq!(state.all_users.len(), 10);
        assert!(state.users.iter().all(|u| u.gender == "female"));
        assert_eq!(state.users.len(), 5);
    }

    #[tokio::test]
    async fn test_failure_keeps_data() {
        let store = Store::new();
        let source = ScriptedSource::with(vec![
            Ok(Page::new(users(1, 30))),
            Err(network_error()),
        ]);

        store.fetch_users(source.clone(), PageRequest::new(1, 30)).await;
        let before = store.snapshot();

        let outcome = store.fetch_users(source, PageRequest::new(2, 30)).await;

        assert_eq!(outcome, FetchOutcome::Failed);
        let after = store.snapshot();
        assert!(!after.loading);
        assert_eq!(after.all_users, before.all_users);
        assert_eq!(after.has_more, before.has_more);
    }

    #[tokio::test]
    async fn test_failed_later_page_rolls_back_page() {
        let store = Store::new();
        let source = ScriptedSource::with(vec![
            Ok(Page::new(users(1, 30))),
            Ok(Page::new(users(31, 30))),
            Err(network_error()),
        ]);

        store.fetch_users(source.clone(), PageRequest::new(1, 30)).await;
        store.increment_page();
        store.fetch_users(source.clone(), PageRequest::new(2, 30)).await;
        assert_eq!(store.loaded(), Some((2, SortSpec::default())));

        store.increment_page();
        let outcome = store.fetch_users(source, PageRequest::new(3, 30)).await;

        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(store.read(|s| s.page), 2);
        assert_eq!(store.loaded(), Some((2, SortSpec::default())));
        assert_eq!(store.read(|s| s.all_users.len()), 60);
    }

    #[tokio::test]
    async fn test_failed_first_page_keeps_page() {
        let store = Store::new();
        let source = ScriptedSource::with(vec![Err(network_error())]);

        let outcome = store.fetch_users(source, PageRequest::new(1, 30)).await;

        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(store.read(|s| s.page), 1);
        assert_eq!(store.loaded(), None);
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let (old_tx, old_rx) = oneshot::channel();
        let (new_tx, new_rx) = oneshot::channel();
        let source = GatedSource::with([(SortKey::Id, old_rx), (SortKey::Age, new_rx)]);
        let store = Store::new();

        let old = tokio::spawn(store.fetch_users(source.clone(), PageRequest::new(1, 30)));
        let request = PageRequest::new(1, 30).sort(SortSpec::asc(SortKey::Age));
        let new = tokio::spawn(store.fetch_users(source, request));

        // Newer request settles first.
        new_tx.send(Ok(Page::new(users(50, 3)))).unwrap();
        assert_eq!(new.await.unwrap(), FetchOutcome::Loaded { count: 3 });

        old_tx.send(Ok(Page::new(users(1, 30)))).unwrap();
        assert_eq!(old.await.unwrap(), FetchOutcome::Stale);

        let ids: Vec<u64> = store.read(|s| s.users.iter().map(|u| u.id).collect());
        assert_eq!(ids, vec![50, 51, 52]);
    }

    #[tokio::test]
    async fn test_stale_response_keeps_loading() {
        let (old_tx, old_rx) = oneshot::channel();
        let (new_tx, new_rx) = oneshot::channel();
        let source = GatedSource::with([(SortKey::Id, old_rx), (SortKey::Name, new_rx)]);
        let store = Store::new();

        let old = tokio::spawn(store.fetch_users(source.clone(), PageRequest::new(1, 30)));
        let request = PageRequest::new(1, 30).sort(SortSpec::asc(SortKey::Name));
        let new = tokio::spawn(store.fetch_users(source, request));

        old_tx.send(Err(network_error())).unwrap();
        assert_eq!(old.await.unwrap(), FetchOutcome::Stale);
        assert!(store.read(|s| s.loading));

        new_tx.send(Ok(Page::new(users(1, 2)))).unwrap();
        assert_eq!(new.await.unwrap(), FetchOutcome::Loaded { count: 2 });
        assert!(!store.read(|s| s.loading));
    }
}
