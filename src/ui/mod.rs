use iced::{
    widget::{button, column, row, scrollable, text, text_input, Column, Space},
    Element, Length,
};

use crate::application::SessionState;
use crate::domain::{Affordance, DownloadRecord, Platform};

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    DownloadPressed,
    OpenArtifact(DownloadRecord),
}

/// Render one session snapshot. Holds no state of its own.
pub fn view(state: &SessionState) -> Element<'_, DownloadMessage> {
    let supported = Platform::SUPPORTED
        .iter()
        .map(Platform::name)
        .collect::<Vec<_>>()
        .join("  ·  ");

    let download_button = button(if state.in_flight { "Downloading..." } else { "Download" })
        .on_press_maybe((!state.in_flight).then_some(DownloadMessage::DownloadPressed))
        .padding([10, 20]);

    let mut content = column![
        text("Video Downloader").size(32),
        text(format!("Supported platforms: {}", supported)).size(14),
        Space::new().height(Length::Fixed(20.0)),
        row![
            text_input("Paste video URL here", &state.url_input)
                .on_input(DownloadMessage::UrlChanged)
                .on_submit(DownloadMessage::DownloadPressed)
                .padding(10),
            download_button,
        ]
        .spacing(10),
    ]
    .padding(20)
    .spacing(10);

    if let Some(error) = &state.last_error {
        content = content.push(text(error).size(14));
    }

    content = content
        .push(Space::new().height(Length::Fixed(20.0)))
        .push(text("Recent Downloads").size(22));

    if let Some(notice) = &state.history_notice {
        content = content.push(text(notice).size(12));
    }

    let history: Element<'_, DownloadMessage> = if state.history.is_empty() {
        text("No downloads yet").size(14).into()
    } else {
        scrollable(Column::with_children(state.history.iter().map(history_entry)).spacing(12)).into()
    };

    content.push(history).into()
}

fn history_entry(record: &DownloadRecord) -> Element<'_, DownloadMessage> {
    let details = column![
        text(record.display_title()).size(18),
        text(format!(
            "[{}] {}    [{}] {}",
            record.platform.icon_key(),
            record.platform,
            record.status.icon_key(),
            record.status.label()
        ))
        .size(12),
    ]
    .spacing(4)
    .width(Length::Fill);

    let action: Element<'_, DownloadMessage> = match record.affordance() {
        Affordance::Download(_) => button("Download")
            .on_press(DownloadMessage::OpenArtifact(record.clone()))
            .padding([6, 14])
            .into(),
        Affordance::InProgress => text("...").into(),
        Affordance::Failed => text("✕").into(),
        Affordance::Unavailable => Space::new().into(),
    };

    row![details, action].spacing(10).into()
}
