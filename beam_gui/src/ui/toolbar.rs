//! Toolbar component
//!
//! Buttons that add supports and loads at the pointer, delete the selection
//! and toggle the background grid and the dimension lines.

use iced::widget::{button, row, text, Space};
use iced::{Alignment, Element, Length, Padding};

use beam_core::model::{LoadKind, SupportKind};

use crate::Message;

/// Render the application header with title
pub fn view_header(beam_label: String) -> Element<'static, Message> {
    row![
        text("Beamline").size(28),
        Space::new().width(Length::Fill),
        text(beam_label).size(14),
    ]
    .align_y(Alignment::Center)
    .into()
}

/// Render the toolbar
pub fn view_toolbar(show_grid: bool, show_dimensions: bool, has_selection: bool) -> Element<'static, Message> {
    let support_buttons = SupportKind::ALL.iter().fold(row![].spacing(4), |r, kind| {
        r.push(
            button(text(format!("+ {}", kind.display_name())).size(11))
                .on_press(Message::AddSupport(*kind))
                .padding(Padding::from([4, 8]))
                .style(button::secondary),
        )
    });

    let load_buttons = LoadKind::ALL.iter().fold(row![].spacing(4), |r, kind| {
        r.push(
            button(text(format!("+ {}", kind.display_name())).size(11))
                .on_press(Message::AddLoad(*kind))
                .padding(Padding::from([4, 8]))
                .style(button::secondary),
        )
    });

    let delete_button = button(text("Delete").size(11))
        .on_press_maybe(has_selection.then_some(Message::DeleteSelected))
        .padding(Padding::from([4, 8]))
        .style(button::danger);

    let grid_button = button(text(if show_grid { "Grid ■" } else { "Grid □" }).size(11))
        .on_press(Message::ToggleGrid)
        .padding(Padding::from([4, 8]))
        .style(if show_grid { button::primary } else { button::secondary });

    let dimensions_button = button(text(if show_dimensions { "Dimensions ■" } else { "Dimensions □" }).size(11))
        .on_press(Message::ToggleDimensions)
        .padding(Padding::from([4, 8]))
        .style(if show_dimensions { button::primary } else { button::secondary });

    row![
        support_buttons,
        Space::new().width(12),
        load_buttons,
        Space::new().width(12),
        delete_button,
        Space::new().width(Length::Fill),
        dimensions_button,
        Space::new().width(4),
        grid_button,
    ]
    .padding(Padding::from([4, 0]))
    .align_y(Alignment::Center)
    .into()
}
