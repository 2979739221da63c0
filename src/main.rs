mod api;
mod app;
mod application;
mod domain;
mod ui;
mod utils;

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application(app::DownloadApp::new, app::update, app::view)
        .title("Video Downloader")
        .run()
}
