//! Beams Panel (Left Sidebar)
//!
//! Lists the beams of the session; the active one is highlighted. The [+]
//! button starts a new sample beam.

use iced::widget::{button, column, row, rule, scrollable, text, Column, Space};
use iced::{Alignment, Element, Length, Padding};

use beam_core::store::ModelStore;

use crate::Message;

/// Render the beams panel
pub fn view_beams_panel(store: &ModelStore, width: f32) -> Element<'_, Message> {
    let active = store.active_beam_id();
    let count = store.beams().count();

    let header = row![
        text(format!("Beams ({})", count)).size(11),
        Space::new().width(Length::Fill),
        button(text("+").size(11))
            .on_press(Message::NewBeam)
            .padding(Padding::from([2, 6]))
            .style(button::secondary),
    ]
    .align_y(Alignment::Center);

    let mut list: Column<'_, Message> = column![].spacing(2).padding(Padding::from([4, 8]));
    for beam in store.beams() {
        let style = if active == Some(beam.id) {
            button::primary
        } else {
            button::secondary
        };
        let content = column![
            text(&beam.label).size(10),
            text(format!("{:.2} m, {} supports, {} loads", beam.length, beam.supports.len(), beam.loads.len()))
                .size(9)
                .color([0.5, 0.5, 0.5]),
        ];
        list = list.push(
            button(content)
                .on_press(Message::SelectBeam(beam.id))
                .padding(Padding::from([3, 6]))
                .style(style)
                .width(Length::Fill),
        );
    }
    if count == 0 {
        list = list.push(text("(none)").size(10).color([0.5, 0.5, 0.5]));
    }

    column![header, rule::horizontal(1), scrollable(list)]
        .spacing(4)
        .width(Length::Fixed(width))
        .into()
}
