use std::sync::Arc;

use iced::Task;

use crate::api::{ApiClient, ApiConfig};
use crate::application::{
    BrowserPresenter, HistoryRefresh, SessionController, SessionState, SubmitResult,
};
use crate::ui::{self, DownloadMessage};

type Controller = SessionController<ApiClient, BrowserPresenter>;

pub struct DownloadApp {
    controller: Arc<Controller>,
    // Last snapshot taken from the controller; the view only ever reads this
    state: SessionState,
}

impl DownloadApp {
    /// Build the app and schedule the initial history load.
    pub fn new() -> (Self, Task<Message>) {
        let controller = Arc::new(SessionController::new(
            ApiClient::new(ApiConfig::default()),
            BrowserPresenter,
        ));
        let state = controller.snapshot();

        let mount = {
            let controller = Arc::clone(&controller);
            Task::perform(
                async move { controller.on_mount().await },
                Message::HistoryRefreshed,
            )
        };

        (Self { controller, state }, mount)
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    SubmissionSettled(SubmitResult),
    HistoryRefreshed(HistoryRefresh),
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    let task = match message {
        Message::UiMessage(DownloadMessage::UrlChanged(text)) => {
            app.controller.set_url_input(text);
            Task::none()
        }
        Message::UiMessage(DownloadMessage::DownloadPressed) => {
            match app.controller.begin_submission() {
                Some(submission) => {
                    let controller = Arc::clone(&app.controller);
                    // iced Task::perform runs in the background tokio executor
                    Task::perform(
                        async move { controller.run(submission).await },
                        Message::SubmissionSettled,
                    )
                }
                None => Task::none(),
            }
        }
        Message::UiMessage(DownloadMessage::OpenArtifact(record)) => {
            app.controller.open_artifact(&record);
            Task::none()
        }
        Message::SubmissionSettled(result) => {
            log::debug!("Submission settled: {:?}", result);
            Task::none()
        }
        Message::HistoryRefreshed(refresh) => {
            log::debug!("History refresh finished: {:?}", refresh);
            Task::none()
        }
    };

    app.state = app.controller.snapshot();
    task
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    ui::view(&app.state).map(Message::UiMessage)
}
