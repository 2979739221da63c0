pub mod presenter;
pub mod session;
pub mod state;

pub use presenter::BrowserPresenter;
pub use session::{HistoryRefresh, SessionController, SubmitResult};
pub use state::SessionState;
