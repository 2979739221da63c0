use std::io;

/// Hands a finished artifact's URL to whatever can retrieve it for the user.
pub trait ArtifactPresenter: Send + Sync {
    fn present(&self, download_url: &str) -> io::Result<()>;
}

/// Opens the artifact in the system browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserPresenter;

impl ArtifactPresenter for BrowserPresenter {
    fn present(&self, download_url: &str) -> io::Result<()> {
        webbrowser::open(download_url)
    }
}
