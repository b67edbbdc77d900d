use iced::widget::{button, container};
use iced::{Background, Border, Color, Shadow, Theme};

use crate::core::models::ThemeMode;

pub const PLACEHOLDER_LINE_COLOR: Color = Color::from_rgb(0.0, 0.0, 1.0);
pub const SCREEN_BORDER_COLOR: Color = Color::from_rgb(0.4, 0.4, 0.4);

pub fn get_theme(mode: &ThemeMode) -> Theme {
    match mode {
        ThemeMode::Dark => Theme::custom(
            "Dark".to_string(),
            iced::theme::Palette {
                background: Color::from_rgb(0.08, 0.08, 0.09),
                text: Color::from_rgb(1.0, 1.0, 1.0),
                primary: Color::from_rgb(0.4, 0.6, 1.0),
                success: Color::from_rgb(0.2, 0.9, 0.4),
                danger: Color::from_rgb(1.0, 0.3, 0.3),
                warning: Color::from_rgb(1.0, 0.7, 0.0),
            },
        ),
        ThemeMode::Light => Theme::custom(
            "Light".to_string(),
            iced::theme::Palette {
                background: Color::from_rgb(0.95, 0.95, 0.97),
                text: Color::from_rgb(0.1, 0.1, 0.1),
                primary: Color::from_rgb(0.2, 0.4, 0.9),
                success: Color::from_rgb(0.1, 0.7, 0.3),
                danger: Color::from_rgb(0.9, 0.2, 0.2),
                warning: Color::from_rgb(0.9, 0.6, 0.0),
            },
        ),
    }
}

struct ButtonShades {
    active: Color,
    hovered: Color,
    pressed: Color,
    text: Color,
}

fn shaded_button_style(shades: ButtonShades, status: button::Status) -> button::Style {
    let (background, text_color, snap) = match status {
        button::Status::Active => (shades.active, shades.text, false),
        button::Status::Hovered => (shades.hovered, shades.text, false),
        button::Status::Pressed => (shades.pressed, shades.text, true),
        button::Status::Disabled => (
            Color::from_rgb(0.3, 0.3, 0.3),
            Color::from_rgb(0.5, 0.5, 0.5),
            false,
        ),
    };

    button::Style {
        background: Some(Background::Color(background)),
        text_color,
        border: Border {
            color: background,
            width: 1.0,
            radius: 6.0.into(),
        },
        shadow: Shadow::default(),
        snap,
    }
}

/// Capture actions: refresh, rotate, save, copy.
pub fn primary_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    shaded_button_style(
        ButtonShades {
            active: Color::from_rgb(0.098, 0.529, 0.329),
            hovered: Color::from_rgb(0.122, 0.655, 0.408),
            pressed: Color::from_rgb(0.078, 0.420, 0.263),
            text: Color::WHITE,
        },
        status,
    )
}

/// Device navigation keys and closing the window.
pub fn secondary_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    shaded_button_style(
        ButtonShades {
            active: Color::from_rgb(0.25, 0.25, 0.25),
            hovered: Color::from_rgb(0.32, 0.32, 0.32),
            pressed: Color::from_rgb(0.2, 0.2, 0.2),
            text: Color::from_rgb(0.85, 0.85, 0.85),
        },
        status,
    )
}

pub fn screen_frame_style(_theme: &Theme) -> container::Style {
    container::Style {
        border: Border {
            color: SCREEN_BORDER_COLOR,
            width: 1.0,
            radius: 0.0.into(),
        },
        ..Default::default()
    }
}
