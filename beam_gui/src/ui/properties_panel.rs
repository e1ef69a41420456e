//! Properties Panel (Right Sidebar)
//!
//! Displays:
//! - Active beam length, edited through a text field and applied on demand
//! - The selected element's position, magnitude and extent
//! - Delete for the selected element

use iced::widget::{button, column, row, rule, text, text_input, Column, Space};
use iced::{Alignment, Element, Length, Padding};

use beam_core::model::Element as ModelElement;

use crate::{App, Message};

/// Render the properties panel
pub fn view_properties_panel(app: &App, width: f32) -> Element<'_, Message> {
    let length_unit = app.diagram.style().units.length();
    let beam_section: Column<'_, Message> = if app.store.active_beam_id().is_some() {
        column![
            text("Beam").size(14),
            labeled_input(
                format!("Length ({}):", length_unit),
                &app.beam_length_input,
                Message::BeamLengthChanged,
            ),
            row![
                Space::new().width(Length::Fill),
                button(text("Apply").size(11))
                    .on_press(Message::ApplyBeamLength)
                    .padding(Padding::from([4, 8]))
                    .style(button::secondary),
            ],
        ]
        .spacing(6)
    } else {
        column![text("No active beam").size(11).color([0.5, 0.5, 0.5])]
    };

    column![
        beam_section,
        Space::new().height(10),
        rule::horizontal(1),
        Space::new().height(10),
        view_selection(app, length_unit),
    ]
    .spacing(4)
    .width(Length::Fixed(width))
    .into()
}

fn view_selection<'a>(app: &'a App, length_unit: &'static str) -> Column<'a, Message> {
    let Some(selected) = app.diagram.selection().selected() else {
        return column![
            text("Selection").size(14),
            text("Click a support or load to edit it").size(10).color([0.5, 0.5, 0.5]),
        ]
        .spacing(6);
    };

    let mut fields = column![
        text("Selection").size(14),
        text(selected.describe()).size(11),
        Space::new().height(4),
        labeled_input(
            format!("Position ({}):", length_unit),
            &app.position_input,
            Message::PositionChanged,
        ),
    ]
    .spacing(6);

    if let ModelElement::Load(load) = selected {
        let unit = app.diagram.style().units.load_unit(load.kind);
        fields = fields.push(labeled_input(
            format!("Value ({}):", unit),
            &app.magnitude_input,
            Message::MagnitudeChanged,
        ));
        if load.kind.requires_extent() {
            fields = fields.push(labeled_input(
                format!("Extent ({}):", length_unit),
                &app.extent_input,
                Message::ExtentChanged,
            ));
        }
    }

    fields.push(
        row![
            button(text("Delete").size(11))
                .on_press(Message::DeleteSelected)
                .padding(Padding::from([4, 8]))
                .style(button::danger),
            Space::new().width(Length::Fill),
            button(text("Apply").size(11))
                .on_press(Message::ApplyEdits)
                .padding(Padding::from([4, 8]))
                .style(button::primary),
        ]
        .spacing(4),
    )
}

fn labeled_input<'a>(
    label: String,
    value: &'a str,
    on_change: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    row![
        text(label).size(11).width(Length::Fixed(80.0)),
        text_input("", value)
            .on_input(on_change)
            .width(Length::Fill)
            .padding(4)
            .size(11),
    ]
    .align_y(Alignment::Center)
    .into()
}
