//! Status Bar (Bottom)
//!
//! Displays:
//! - Engineering position under the pointer
//! - Store version
//! - Status messages

use iced::widget::{row, text, Space};
use iced::{Element, Length, Padding};

use crate::Message;

/// Render the status bar
pub fn view_status_bar<'a>(
    pointer_position: Option<f64>,
    length_unit: &'static str,
    version: u64,
    status: &'a str,
) -> Element<'a, Message> {
    let position = match pointer_position {
        Some(x) => format!("x = {:.2} {}", x, length_unit),
        None => "x = -".to_string(),
    };

    row![
        text(position).size(10),
        text(format!("  v{}", version)).size(10).color([0.5, 0.5, 0.5]),
        Space::new().width(Length::Fill),
        text(status).size(10),
    ]
    .padding(Padding::from([4, 0]))
    .into()
}
