use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use super::presenter::ArtifactPresenter;
use super::state::SessionState;
use crate::{
    api::DownloadService,
    domain::{Affordance, AppError, DownloadRecord, ResolvedDownload},
    utils::parse_media_url,
};

#[derive(Debug, Clone)]
pub enum SubmitResult {
    Completed(ResolvedDownload),
    Failed(AppError),
    /// Another submission was still outstanding; nothing was sent.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRefresh {
    Applied,
    Unavailable,
    /// A newer refresh already landed; this response was dropped.
    Stale,
}

/// One outstanding submission. Dropping it returns the session to idle,
/// including on early return or panic.
pub struct Submission {
    state: Arc<watch::Sender<SessionState>>,
    url_input: String,
}

impl Drop for Submission {
    fn drop(&mut self) {
        self.state.send_modify(|state| *state = state.finish_submission());
    }
}

/// Owns the session state and drives it through submissions and history refreshes.
pub struct SessionController<S, P> {
    service: S,
    presenter: P,
    state: Arc<watch::Sender<SessionState>>,
    history_requests: AtomicU64,
}

impl<S: DownloadService, P: ArtifactPresenter> SessionController<S, P> {
    pub fn new(service: S, presenter: P) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            service,
            presenter,
            state: Arc::new(state),
            history_requests: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn set_url_input(&self, text: String) {
        self.apply(|state| Some(state.with_url_input(text)));
    }

    /// Enter the submitting state, or `None` if a submission is already running.
    pub fn begin_submission(&self) -> Option<Submission> {
        let mut url_input = None;
        self.apply(|state| {
            let next = state.begin_submission()?;
            url_input = Some(state.url_input.clone());
            Some(next)
        });

        match url_input {
            Some(url_input) => Some(Submission {
                state: Arc::clone(&self.state),
                url_input,
            }),
            None => {
                log::debug!("Ignoring submission while another is in flight");
                None
            }
        }
    }

    pub async fn submit(&self) -> SubmitResult {
        match self.begin_submission() {
            Some(submission) => self.run(submission).await,
            None => SubmitResult::Rejected,
        }
    }

    pub async fn run(&self, submission: Submission) -> SubmitResult {
        let outcome = match parse_media_url(&submission.url_input) {
            Ok(url) => self.service.submit(&url).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(download) => {
                log::info!(
                    "Download ready: {} [{}] ({})",
                    download.title.as_deref().unwrap_or("untitled"),
                    download.platform.as_ref().map_or("unknown platform", |p| p.name()),
                    download.download_url
                );
                if let Err(e) = self.presenter.present(&download.download_url) {
                    log::warn!("Failed to open {}: {}", download.download_url, e);
                }
                self.apply(|state| Some(state.submission_succeeded()));
                self.refresh_history().await;
                SubmitResult::Completed(download)
            }
            Err(e) => {
                log::error!("Download request for {:?} failed: {}", submission.url_input, e);
                self.apply(|state| Some(state.submission_failed(&e)));
                SubmitResult::Failed(e)
            }
        }
    }

    /// Session start: load the history once, independent of any submission.
    pub async fn on_mount(&self) -> HistoryRefresh {
        log::info!("Session started, loading download history");
        self.refresh_history().await
    }

    pub async fn refresh_history(&self) -> HistoryRefresh {
        let revision = self.history_requests.fetch_add(1, Ordering::Relaxed) + 1;

        let (applied, refresh) = match self.service.fetch_history().await {
            Ok(records) => {
                log::debug!("Fetched {} history records", records.len());
                let applied = self.apply(|state| state.history_loaded(revision, records));
                (applied, HistoryRefresh::Applied)
            }
            Err(e) => {
                log::warn!("Failed to refresh download history: {}", e);
                let applied = self.apply(|state| state.history_failed(revision, &e));
                (applied, HistoryRefresh::Unavailable)
            }
        };

        if applied {
            refresh
        } else {
            log::debug!("Discarding stale history response #{}", revision);
            HistoryRefresh::Stale
        }
    }

    /// Open a history entry's artifact; only completed entries with a link have one.
    pub fn open_artifact(&self, record: &DownloadRecord) {
        match record.affordance() {
            Affordance::Download(url) => {
                if let Err(e) = self.presenter.present(url) {
                    log::warn!("Failed to open download {}: {}", record.id, e);
                }
            }
            _ => log::debug!("Download {} has no artifact to open", record.id),
        }
    }

    fn apply(&self, transition: impl FnOnce(&SessionState) -> Option<SessionState>) -> bool {
        self.state.send_if_modified(|state| match transition(state) {
            Some(next) => {
                *state = next;
                true
            }
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecordId, RecordStatus};
    use crate::utils::MediaUrl;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::sync::{oneshot, Notify};

    type HistoryResult = Result<Vec<DownloadRecord>, AppError>;

    enum HistoryReply {
        Now(HistoryResult),
        Later(oneshot::Receiver<HistoryResult>),
    }

    struct FakeService {
        submit_result: Result<ResolvedDownload, AppError>,
        submit_gate: Option<Arc<Notify>>,
        history: Mutex<VecDeque<HistoryReply>>,
        submitted: Mutex<Vec<String>>,
        history_calls: AtomicUsize,
    }

    impl FakeService {
        fn new(submit_result: Result<ResolvedDownload, AppError>) -> Self {
            Self {
                submit_result,
                submit_gate: None,
                history: Mutex::new(VecDeque::new()),
                submitted: Mutex::new(Vec::new()),
                history_calls: AtomicUsize::new(0),
            }
        }

        fn with_history(self, reply: HistoryReply) -> Self {
            self.history.lock().unwrap().push_back(reply);
            self
        }

        fn submit_calls(&self) -> usize {
            self.submitted.lock().unwrap().len()
        }

        fn history_calls(&self) -> usize {
            self.history_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DownloadService for Arc<FakeService> {
        async fn submit(&self, url: &MediaUrl) -> Result<ResolvedDownload, AppError> {
            self.submitted.lock().unwrap().push(url.as_str().to_string());
            if let Some(gate) = &self.submit_gate {
                gate.notified().await;
            }
            self.submit_result.clone()
        }

        async fn fetch_history(&self) -> HistoryResult {
            self.history_calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.history.lock().unwrap().pop_front();
            match reply {
                Some(HistoryReply::Now(result)) => result,
                Some(HistoryReply::Later(rx)) => rx.await.unwrap_or(Ok(Vec::new())),
                None => Ok(Vec::new()),
            }
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        opened: Mutex<Vec<String>>,
    }

    impl ArtifactPresenter for Arc<RecordingPresenter> {
        fn present(&self, download_url: &str) -> std::io::Result<()> {
            self.opened.lock().unwrap().push(download_url.to_string());
            Ok(())
        }
    }

    struct PanickingPresenter;

    impl ArtifactPresenter for PanickingPresenter {
        fn present(&self, _download_url: &str) -> std::io::Result<()> {
            panic!("presenter blew up");
        }
    }

    fn resolved(url: &str) -> ResolvedDownload {
        ResolvedDownload {
            download_url: url.to_string(),
            title: None,
            platform: None,
        }
    }

    fn record(id: i64, status: RecordStatus, download_url: Option<&str>) -> DownloadRecord {
        DownloadRecord {
            id: RecordId::Number(id),
            title: Some(format!("Video {}", id)),
            platform: Default::default(),
            status,
            download_url: download_url.map(str::to_string),
        }
    }

    fn session(
        service: FakeService,
    ) -> (
        SessionController<Arc<FakeService>, Arc<RecordingPresenter>>,
        Arc<FakeService>,
        Arc<RecordingPresenter>,
    ) {
        let service = Arc::new(service);
        let presenter = Arc::new(RecordingPresenter::default());
        let controller = SessionController::new(Arc::clone(&service), Arc::clone(&presenter));
        (controller, service, presenter)
    }

    #[tokio::test]
    async fn test_invalid_url_never_reaches_service() {
        let (controller, service, presenter) = session(FakeService::new(Ok(resolved("https://cdn/x.mp4"))));
        controller.refresh_history().await;
        let before = controller.snapshot();

        controller.set_url_input("not a url".into());
        let result = controller.submit().await;

        assert!(matches!(result, SubmitResult::Failed(AppError::InvalidUrl)));
        assert_eq!(service.submit_calls(), 0);
        assert!(presenter.opened.lock().unwrap().is_empty());

        let state = controller.snapshot();
        assert_eq!(state.last_error.as_deref(), Some("Please enter a valid URL"));
        assert_eq!(state.url_input, "not a url");
        assert!(!state.in_flight);
        assert_eq!(state.history, before.history);
        assert_eq!(service.history_calls(), 1);
    }

    #[tokio::test]
    async fn test_successful_submission() {
        let records = vec![record(1, RecordStatus::Completed, Some("https://cdn/x.mp4"))];
        let (controller, service, presenter) = session(
            FakeService::new(Ok(resolved("https://cdn/x.mp4"))).with_history(HistoryReply::Now(Ok(records.clone()))),
        );

        controller.set_url_input("https://youtube.com/watch?v=abc".into());
        let result = controller.submit().await;

        assert!(matches!(result, SubmitResult::Completed(ref d) if d.download_url == "https://cdn/x.mp4"));
        assert_eq!(
            service.submitted.lock().unwrap().as_slice(),
            ["https://youtube.com/watch?v=abc"]
        );
        assert_eq!(*presenter.opened.lock().unwrap(), ["https://cdn/x.mp4"]);
        assert_eq!(service.history_calls(), 1);

        let state = controller.snapshot();
        assert_eq!(state.url_input, "");
        assert!(!state.in_flight);
        assert_eq!(state.last_error, None);
        assert_eq!(*state.history, records);
    }

    #[tokio::test]
    async fn test_service_error_is_shown_verbatim() {
        let (controller, service, presenter) =
            session(FakeService::new(Err(AppError::Service("Video unavailable".into()))));

        controller.set_url_input("https://youtube.com/watch?v=abc".into());
        controller.submit().await;

        let state = controller.snapshot();
        assert_eq!(state.last_error.as_deref(), Some("Video unavailable"));
        assert_eq!(state.url_input, "https://youtube.com/watch?v=abc");
        assert!(!state.in_flight);
        assert!(presenter.opened.lock().unwrap().is_empty());
        assert_eq!(service.history_calls(), 0);
    }

    #[tokio::test]
    async fn test_failures_restore_idle_and_keep_input() {
        for error in [
            AppError::Network("connection reset".into()),
            AppError::MissingResult,
            AppError::Service("Private video".into()),
        ] {
            let (controller, _, _) = session(FakeService::new(Err(error.clone())));
            controller.set_url_input("https://instagram.com/p/xyz".into());

            let result = controller.submit().await;

            assert!(matches!(result, SubmitResult::Failed(ref e) if *e == error));
            let state = controller.snapshot();
            assert!(!state.in_flight);
            assert_eq!(state.url_input, "https://instagram.com/p/xyz");
            assert_eq!(state.last_error, Some(error.user_message()));
        }
    }

    #[tokio::test]
    async fn test_new_submission_clears_previous_error() {
        let (controller, _, _) = session(FakeService::new(Ok(resolved("https://cdn/x.mp4"))));
        controller.set_url_input("nope".into());
        controller.submit().await;
        assert!(controller.snapshot().last_error.is_some());

        let submission = controller.begin_submission().unwrap();
        assert_eq!(controller.snapshot().last_error, None);
        assert!(controller.snapshot().in_flight);
        drop(submission);
        assert!(!controller.snapshot().in_flight);
    }

    #[tokio::test]
    async fn test_second_submission_is_rejected_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let mut service = FakeService::new(Ok(resolved("https://cdn/x.mp4")));
        service.submit_gate = Some(Arc::clone(&gate));
        let (controller, service, _) = session(service);
        controller.set_url_input("https://facebook.com/watch/123".into());

        let (first, second) = tokio::join!(controller.submit(), async {
            let result = controller.submit().await;
            gate.notify_one();
            result
        });

        assert!(matches!(first, SubmitResult::Completed(_)));
        assert!(matches!(second, SubmitResult::Rejected));
        assert_eq!(service.submit_calls(), 1);
        assert!(!controller.snapshot().in_flight);
    }

    #[tokio::test]
    async fn test_panicking_presenter_still_returns_to_idle() {
        let service = Arc::new(FakeService::new(Ok(resolved("https://cdn/x.mp4"))));
        let controller = Arc::new(SessionController::new(service, PanickingPresenter));
        controller.set_url_input("https://youtube.com/watch?v=abc".into());

        let task = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.submit().await }
        });

        assert!(task.await.is_err());
        assert!(!controller.snapshot().in_flight);
    }

    #[tokio::test]
    async fn test_history_failure_keeps_previous_list() {
        let records = vec![record(7, RecordStatus::Failed, None)];
        let (controller, _, _) = session(
            FakeService::new(Ok(resolved("https://cdn/x.mp4")))
                .with_history(HistoryReply::Now(Ok(records.clone())))
                .with_history(HistoryReply::Now(Err(AppError::HistoryUnavailable("HTTP 500".into())))),
        );

        assert_eq!(controller.refresh_history().await, HistoryRefresh::Applied);
        assert_eq!(controller.refresh_history().await, HistoryRefresh::Unavailable);

        let state = controller.snapshot();
        assert_eq!(*state.history, records);
        assert_eq!(state.history_notice.as_deref(), Some("Failed to load download history"));
        assert_eq!(state.last_error, None);
    }

    #[tokio::test]
    async fn test_out_of_order_history_response_is_discarded() {
        let (older_tx, older_rx) = oneshot::channel();
        let (newer_tx, newer_rx) = oneshot::channel();
        let (controller, service, _) = session(
            FakeService::new(Ok(resolved("https://cdn/x.mp4")))
                .with_history(HistoryReply::Later(older_rx))
                .with_history(HistoryReply::Later(newer_rx)),
        );
        let controller = Arc::new(controller);

        let older = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.refresh_history().await }
        });
        while service.history_calls() < 1 {
            tokio::task::yield_now().await;
        }
        let newer = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.refresh_history().await }
        });
        while service.history_calls() < 2 {
            tokio::task::yield_now().await;
        }

        let newer_records = vec![record(2, RecordStatus::Pending, None)];
        newer_tx.send(Ok(newer_records.clone())).unwrap();
        assert_eq!(newer.await.unwrap(), HistoryRefresh::Applied);

        older_tx.send(Ok(vec![record(1, RecordStatus::Pending, None)])).unwrap();
        assert_eq!(older.await.unwrap(), HistoryRefresh::Stale);

        assert_eq!(*controller.snapshot().history, newer_records);
    }

    #[tokio::test]
    async fn test_mount_loads_history_once() {
        let records = vec![
            record(2, RecordStatus::Completed, Some("https://cdn/b.mp4")),
            record(1, RecordStatus::Failed, None),
        ];
        let (controller, service, _) = session(
            FakeService::new(Ok(resolved("https://cdn/x.mp4"))).with_history(HistoryReply::Now(Ok(records.clone()))),
        );

        assert_eq!(controller.on_mount().await, HistoryRefresh::Applied);

        assert_eq!(service.history_calls(), 1);
        assert_eq!(service.submit_calls(), 0);
        let state = controller.snapshot();
        assert_eq!(*state.history, records);
        assert!(!state.in_flight);
    }

    #[tokio::test]
    async fn test_open_artifact_only_for_completed_records() {
        let (controller, _, presenter) = session(FakeService::new(Ok(resolved("https://cdn/x.mp4"))));

        controller.open_artifact(&record(1, RecordStatus::Pending, Some("https://cdn/p.mp4")));
        controller.open_artifact(&record(2, RecordStatus::Failed, Some("https://cdn/f.mp4")));
        controller.open_artifact(&record(3, RecordStatus::Completed, Some("https://cdn/c.mp4")));

        assert_eq!(*presenter.opened.lock().unwrap(), ["https://cdn/c.mp4"]);
    }
}
