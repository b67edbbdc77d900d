use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use iced::widget::{button, column, container, row, text, text_input, Space};
use iced::{Alignment, Background, Color, Element, Length, Point, Task};

use crate::core::interfaces::ports::{DeviceBridge, ImageClipboard, InputRelay};
use crate::core::models::save_target::{default_file_name, resolve_save_path};
use crate::core::models::{
    DeviceInfo, DeviceInputEvent, DisplayScale, DisplayedImage, KeyCode, RawCapture, Rotation,
    UserSettings,
};
use crate::core::pipeline::{CapturePipeline, RefreshOutcome};
use crate::global_constants::{
    LOG_TAG_SESSION, STATUS_CAPTURED, STATUS_CAPTURING, STATUS_PREPARING, STATUS_UNAVAILABLE,
};
use crate::presentation::app_theme;
use crate::presentation::{render_screen, ScreenViewMessage};

/// One capture session against one device.
pub struct AppOrchestrator {
    pipeline: CapturePipeline,
    input_relay: Arc<dyn InputRelay>,
    clipboard: Arc<dyn ImageClipboard>,
    device: DeviceInfo,
    scale: DisplayScale,
    rotation: Rotation,
    base_capture: Option<RawCapture>,
    displayed_image: Option<DisplayedImage>,
    pointer_down: Option<Point>,
    status: String,
    save_file_name: String,
    last_saved_path: Option<PathBuf>,
    settings: UserSettings,
}

#[derive(Debug, Clone)]
pub enum OrchestratorMessage {
    Refresh,
    Rotate,
    Save,
    SaveFileNameChanged(String),
    Copy,
    Done,
    Home,
    Back,
    Screen(ScreenViewMessage),
    RelaySettled,
}

impl AppOrchestrator {
    pub fn build(
        bridge: Arc<dyn DeviceBridge>,
        input_relay: Arc<dyn InputRelay>,
        clipboard: Arc<dyn ImageClipboard>,
        device: DeviceInfo,
        scale: DisplayScale,
        settings: UserSettings,
    ) -> Self {
        Self {
            pipeline: CapturePipeline::build(bridge),
            input_relay,
            clipboard,
            device,
            scale,
            rotation: Rotation::default(),
            base_capture: None,
            displayed_image: None,
            pointer_down: None,
            status: STATUS_PREPARING.to_string(),
            save_file_name: default_file_name(&chrono::Local::now()),
            last_saved_path: None,
            settings,
        }
    }

    pub fn get_window_title(&self) -> String {
        format!(
            "{} - {}",
            crate::global_constants::APPLICATION_TITLE,
            self.device.serial
        )
    }

    pub fn is_save_enabled(&self) -> bool {
        self.displayed_image.is_some()
    }

    pub fn update(&mut self, message: OrchestratorMessage) -> Task<OrchestratorMessage> {
        log::debug!("{} Received message: {:?}", LOG_TAG_SESSION, message);

        match message {
            OrchestratorMessage::Refresh | OrchestratorMessage::RelaySettled => {
                self.handle_refresh();
            }
            OrchestratorMessage::Rotate => {
                self.handle_rotate();
            }
            OrchestratorMessage::Save => {
                self.handle_save();
            }
            OrchestratorMessage::SaveFileNameChanged(file_name) => {
                self.save_file_name = file_name;
            }
            OrchestratorMessage::Copy => {
                self.handle_copy();
            }
            OrchestratorMessage::Done => {
                log::info!("{} Done pressed, closing session", LOG_TAG_SESSION);
                return iced::exit();
            }
            OrchestratorMessage::Home => {
                return self.handle_relay(DeviceInputEvent::KeyEvent(KeyCode::Home));
            }
            OrchestratorMessage::Back => {
                return self.handle_relay(DeviceInputEvent::KeyEvent(KeyCode::Back));
            }
            OrchestratorMessage::Screen(screen_message) => {
                return self.handle_screen_message(screen_message);
            }
        }

        Task::none()
    }

    fn handle_refresh(&mut self) {
        log::info!(
            "{} Refreshing capture from {} (rotation {}, scale {})",
            LOG_TAG_SESSION,
            self.device.serial,
            self.rotation,
            self.scale
        );
        self.status = STATUS_CAPTURING.to_string();

        let outcome = self.pipeline.refresh(&self.device, self.rotation, self.scale);
        match outcome {
            RefreshOutcome::Captured { base, image } => {
                self.base_capture = Some(base);
                self.replace_displayed_image(Some(image));
                self.status = STATUS_CAPTURED.to_string();
            }
            RefreshOutcome::Unavailable => {
                self.base_capture = None;
                self.replace_displayed_image(None);
                self.status = STATUS_UNAVAILABLE.to_string();
            }
        }
    }

    fn handle_rotate(&mut self) {
        let Some(base) = self.base_capture.as_ref() else {
            log::debug!("{} Rotate ignored, no capture displayed", LOG_TAG_SESSION);
            return;
        };

        self.rotation = self.rotation.next_clockwise();
        log::info!("{} Rotation now {}", LOG_TAG_SESSION, self.rotation);

        let image = CapturePipeline::render(base, self.rotation, self.scale);
        self.replace_displayed_image(Some(image));
    }

    /// Drops the previous image before installing the next one.
    fn replace_displayed_image(&mut self, next: Option<DisplayedImage>) {
        drop(self.displayed_image.take());
        self.displayed_image = next;
    }

    fn handle_save(&mut self) {
        let Some(image) = self.displayed_image.as_ref() else {
            log::debug!("{} Save ignored, nothing to save", LOG_TAG_SESSION);
            return;
        };

        if self.save_file_name.trim().is_empty() {
            self.save_file_name = default_file_name(&chrono::Local::now());
        }
        let path = resolve_save_path(&self.settings.save_directory, &self.save_file_name);
        log::debug!("{} Saving image to {:?}", LOG_TAG_SESSION, path);

        match CapturePipeline::save_as_png(image, &path) {
            Ok(written) => {
                self.last_saved_path = Some(written);
                self.save_file_name = default_file_name(&chrono::Local::now());
            }
            Err(error) => {
                log::warn!("{} Unable to save {:?}: {}", LOG_TAG_SESSION, path, error);
            }
        }
    }

    fn handle_copy(&mut self) {
        match self.displayed_image.as_ref() {
            Some(image) => {
                CapturePipeline::copy_to_clipboard(self.clipboard.as_ref(), image);
            }
            None => log::debug!("{} Copy ignored, nothing displayed", LOG_TAG_SESSION),
        }
    }

    fn handle_screen_message(&mut self, message: ScreenViewMessage) -> Task<OrchestratorMessage> {
        match message {
            ScreenViewMessage::PointerPressed(point) => {
                log::debug!("{} Pointer down at {:?}", LOG_TAG_SESSION, point);
                self.pointer_down = Some(point);
                Task::none()
            }
            ScreenViewMessage::PointerReleased(point) => {
                log::debug!("{} Pointer up at {:?}", LOG_TAG_SESSION, point);
                let down = self.pointer_down.take().unwrap_or(point);
                let event = DeviceInputEvent::from_pointer_gesture(down, point, self.scale);
                self.handle_relay(event)
            }
        }
    }

    /// Relays `event`, then refreshes once the device has had time to react.
    fn handle_relay(&mut self, event: DeviceInputEvent) -> Task<OrchestratorMessage> {
        log::info!("{} Relaying {:?}", LOG_TAG_SESSION, event);

        if let Err(error) = self.input_relay.relay(&event) {
            log::warn!("{} Input relay failed: {:#}", LOG_TAG_SESSION, error);
        }

        let settle_delay = Duration::from_millis(self.settings.relay_settle_delay_ms);
        Task::future(async move {
            tokio::time::sleep(settle_delay).await;
            OrchestratorMessage::RelaySettled
        })
    }

    pub fn render_view(&self) -> Element<'_, OrchestratorMessage> {
        let theme = app_theme::get_theme(&self.settings.theme_mode);

        let capture_button = |label: &'static str, message: Option<OrchestratorMessage>| {
            button(text(label).size(14))
                .padding([8, 16])
                .style(|theme, status| app_theme::primary_button_style(theme, status))
                .on_press_maybe(message)
        };
        let device_button = |label: &'static str, message: OrchestratorMessage| {
            button(text(label).size(14))
                .padding([8, 16])
                .style(|theme, status| app_theme::secondary_button_style(theme, status))
                .on_press(message)
        };

        let image_actions_enabled = self.is_save_enabled();
        let button_row = row![
            capture_button("Refresh", Some(OrchestratorMessage::Refresh)),
            capture_button(
                "Rotate",
                image_actions_enabled.then_some(OrchestratorMessage::Rotate)
            ),
            capture_button(
                "Save",
                image_actions_enabled.then_some(OrchestratorMessage::Save)
            ),
            capture_button(
                "Copy",
                image_actions_enabled.then_some(OrchestratorMessage::Copy)
            ),
            device_button("Done", OrchestratorMessage::Done),
            device_button("Home", OrchestratorMessage::Home),
            device_button("Back", OrchestratorMessage::Back),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let file_name_row = row![
            text("Save as").size(13),
            text_input("device-screenshot.png", &self.save_file_name)
                .on_input(OrchestratorMessage::SaveFileNameChanged)
                .on_submit_maybe(image_actions_enabled.then_some(OrchestratorMessage::Save))
                .padding(6)
                .size(13),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let saved_hint = text(
            self.last_saved_path
                .as_ref()
                .map(|path| format!("Last saved: {}", path.display()))
                .unwrap_or_default(),
        )
        .size(11)
        .style(|_theme: &iced::Theme| iced::widget::text::Style {
            color: Some(Color::from_rgba(0.6, 0.6, 0.6, 1.0)),
        });

        let status_label = text(&self.status).size(14);

        let screen = render_screen(self.displayed_image.as_ref()).map(OrchestratorMessage::Screen);

        let content = column![
            button_row,
            file_name_row,
            saved_hint,
            Space::new().height(Length::Fixed(4.0)),
            status_label,
            screen,
        ]
        .spacing(8)
        .padding(16)
        .align_x(Alignment::Start);

        container(iced::widget::scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_theme| {
                let palette = theme.palette();
                iced::widget::container::Style {
                    background: Some(Background::Color(palette.background)),
                    text_color: Some(palette.text),
                    ..Default::default()
                }
            })
            .into()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::core::interfaces::ports::BridgeError;
    use crate::core::models::raw_capture::test_support::indexed_capture;
    use crate::core::models::DevicePoint;
    use crate::core::pipeline::test_support::{FailureKind, MockDeviceBridge};

    #[derive(Default)]
    struct RecordingInputRelay {
        events: Mutex<Vec<DeviceInputEvent>>,
    }

    impl InputRelay for RecordingInputRelay {
        fn relay(&self, event: &DeviceInputEvent) -> anyhow::Result<()> {
            self.events.lock().unwrap().push(*event);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingClipboard {
        copies: Mutex<Vec<(u32, u32)>>,
    }

    impl ImageClipboard for RecordingClipboard {
        fn copy_image(&self, image: &DisplayedImage) -> anyhow::Result<()> {
            self.copies.lock().unwrap().push((image.width, image.height));
            Ok(())
        }
    }

    struct Harness {
        orchestrator: AppOrchestrator,
        bridge: Arc<MockDeviceBridge>,
        relay: Arc<RecordingInputRelay>,
        clipboard: Arc<RecordingClipboard>,
        _save_dir: tempfile::TempDir,
    }

    fn create_test_harness(
        frames: Vec<Result<RawCapture, BridgeError>>,
        scale: DisplayScale,
    ) -> Harness {
        let bridge = Arc::new(MockDeviceBridge::returning(frames));
        let relay = Arc::new(RecordingInputRelay::default());
        let clipboard = Arc::new(RecordingClipboard::default());
        let save_dir = tempfile::tempdir().unwrap();
        let settings = UserSettings {
            save_directory: save_dir.path().to_path_buf(),
            relay_settle_delay_ms: 0,
            ..UserSettings::default()
        };

        let orchestrator = AppOrchestrator::build(
            bridge.clone(),
            relay.clone(),
            clipboard.clone(),
            DeviceInfo::new("emulator-5554", "device"),
            scale,
            settings,
        );

        Harness {
            orchestrator,
            bridge,
            relay,
            clipboard,
            _save_dir: save_dir,
        }
    }

    fn displayed_dimensions(orchestrator: &AppOrchestrator) -> Option<(u32, u32)> {
        orchestrator
            .displayed_image
            .as_ref()
            .map(|image| (image.width, image.height))
    }

    #[test]
    fn test_build_starts_preparing_with_save_disabled() {
        let harness = create_test_harness(vec![], DisplayScale::IDENTITY);

        assert_eq!(harness.orchestrator.status, STATUS_PREPARING);
        assert!(!harness.orchestrator.is_save_enabled());
        assert_eq!(harness.orchestrator.rotation, Rotation::Deg0);
        assert!(harness.orchestrator.save_file_name.starts_with("device-"));
        assert!(harness.orchestrator.save_file_name.ends_with(".png"));
    }

    #[test]
    fn test_refresh_displays_scaled_capture_and_enables_save() {
        let mut harness = create_test_harness(
            vec![Ok(indexed_capture(8, 4))],
            DisplayScale::new(0.5).unwrap(),
        );

        let _ = harness.orchestrator.update(OrchestratorMessage::Refresh);

        assert_eq!(harness.orchestrator.status, STATUS_CAPTURED);
        assert!(harness.orchestrator.is_save_enabled());
        assert_eq!(displayed_dimensions(&harness.orchestrator), Some((4, 2)));
    }

    #[test]
    fn test_failed_refresh_shows_placeholder_instead_of_stale_image() {
        for kind in [FailureKind::Io, FailureKind::Timeout, FailureKind::Rejected] {
            let failure = MockDeviceBridge::failing(kind).frames.into_inner().unwrap();
            let mut frames = vec![Ok(indexed_capture(4, 4))];
            frames.extend(failure);
            let mut harness = create_test_harness(frames, DisplayScale::IDENTITY);

            let _ = harness.orchestrator.update(OrchestratorMessage::Refresh);
            assert!(harness.orchestrator.is_save_enabled());

            let _ = harness.orchestrator.update(OrchestratorMessage::Refresh);

            assert_eq!(harness.orchestrator.status, STATUS_UNAVAILABLE);
            assert!(!harness.orchestrator.is_save_enabled());
            assert!(harness.orchestrator.displayed_image.is_none());
            assert!(harness.orchestrator.base_capture.is_none());
        }
    }

    #[test]
    fn test_rotate_without_capture_is_ignored() {
        let mut harness = create_test_harness(vec![], DisplayScale::IDENTITY);

        let _ = harness.orchestrator.update(OrchestratorMessage::Rotate);

        assert_eq!(harness.orchestrator.rotation, Rotation::Deg0);
    }

    #[test]
    fn test_rotate_rerenders_without_recapturing() {
        let mut harness = create_test_harness(vec![Ok(indexed_capture(6, 2))], DisplayScale::IDENTITY);
        let _ = harness.orchestrator.update(OrchestratorMessage::Refresh);

        let _ = harness.orchestrator.update(OrchestratorMessage::Rotate);

        assert_eq!(harness.orchestrator.rotation, Rotation::Deg90);
        assert_eq!(displayed_dimensions(&harness.orchestrator), Some((2, 6)));
        assert_eq!(*harness.bridge.capture_calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_rotation_persists_across_refresh() {
        let capture = indexed_capture(6, 2);
        let mut harness = create_test_harness(
            vec![Ok(capture.clone()), Ok(capture)],
            DisplayScale::IDENTITY,
        );
        let _ = harness.orchestrator.update(OrchestratorMessage::Refresh);
        let _ = harness.orchestrator.update(OrchestratorMessage::Rotate);

        let _ = harness.orchestrator.update(OrchestratorMessage::Refresh);

        assert_eq!(harness.orchestrator.rotation, Rotation::Deg90);
        assert_eq!(displayed_dimensions(&harness.orchestrator), Some((2, 6)));
    }

    #[test]
    fn test_four_rotations_restore_original_image() {
        let mut harness = create_test_harness(vec![Ok(indexed_capture(5, 3))], DisplayScale::IDENTITY);
        let _ = harness.orchestrator.update(OrchestratorMessage::Refresh);
        let original = harness.orchestrator.displayed_image.clone().unwrap();

        for _ in 0..4 {
            let _ = harness.orchestrator.update(OrchestratorMessage::Rotate);
        }

        assert_eq!(harness.orchestrator.rotation, Rotation::Deg0);
        let restored = harness.orchestrator.displayed_image.as_ref().unwrap();
        assert_eq!(restored.pixels(), original.pixels());
    }

    #[test]
    fn test_save_writes_png_into_save_directory() {
        let mut harness = create_test_harness(vec![Ok(indexed_capture(4, 4))], DisplayScale::IDENTITY);
        let _ = harness.orchestrator.update(OrchestratorMessage::Refresh);
        let _ = harness
            .orchestrator
            .update(OrchestratorMessage::SaveFileNameChanged("home-screen".to_string()));

        let _ = harness.orchestrator.update(OrchestratorMessage::Save);

        let expected = harness.orchestrator.settings.save_directory.join("home-screen.png");
        assert!(expected.exists());
        assert_eq!(harness.orchestrator.last_saved_path, Some(expected));
        assert!(harness.orchestrator.save_file_name.starts_with("device-"));
    }

    #[test]
    fn test_save_while_unavailable_writes_nothing() {
        let mut harness = create_test_harness(vec![], DisplayScale::IDENTITY);
        let _ = harness.orchestrator.update(OrchestratorMessage::Refresh);

        let _ = harness.orchestrator.update(OrchestratorMessage::Save);

        assert!(harness.orchestrator.last_saved_path.is_none());
        let entries = std::fs::read_dir(&harness.orchestrator.settings.save_directory)
            .unwrap()
            .count();
        assert_eq!(entries, 0);
    }

    #[test]
    fn test_save_failure_leaves_state_unchanged() {
        let mut harness = create_test_harness(vec![Ok(indexed_capture(4, 4))], DisplayScale::IDENTITY);
        let _ = harness.orchestrator.update(OrchestratorMessage::Refresh);
        let _ = harness.orchestrator.update(OrchestratorMessage::SaveFileNameChanged(
            "missing-dir/shot".to_string(),
        ));

        let _ = harness.orchestrator.update(OrchestratorMessage::Save);

        assert!(harness.orchestrator.last_saved_path.is_none());
        assert_eq!(harness.orchestrator.save_file_name, "missing-dir/shot");
        assert!(harness.orchestrator.is_save_enabled());
        assert_eq!(harness.orchestrator.status, STATUS_CAPTURED);
    }

    #[test]
    fn test_copy_hands_displayed_image_to_clipboard() {
        let mut harness = create_test_harness(
            vec![Ok(indexed_capture(4, 2))],
            DisplayScale::new(2.0).unwrap(),
        );
        let _ = harness.orchestrator.update(OrchestratorMessage::Refresh);

        let _ = harness.orchestrator.update(OrchestratorMessage::Copy);

        assert_eq!(*harness.clipboard.copies.lock().unwrap(), vec![(8, 4)]);
    }

    #[test]
    fn test_tap_relays_device_coordinates() {
        let mut harness = create_test_harness(vec![], DisplayScale::new(0.5).unwrap());
        let point = Point::new(100.0, 250.0);

        let _ = harness
            .orchestrator
            .update(OrchestratorMessage::Screen(ScreenViewMessage::PointerPressed(point)));
        let _ = harness
            .orchestrator
            .update(OrchestratorMessage::Screen(ScreenViewMessage::PointerReleased(point)));

        assert_eq!(
            *harness.relay.events.lock().unwrap(),
            vec![DeviceInputEvent::Tap(DevicePoint { x: 200, y: 500 })]
        );
        assert!(harness.orchestrator.pointer_down.is_none());
    }

    #[test]
    fn test_drag_relays_swipe() {
        let mut harness = create_test_harness(vec![], DisplayScale::IDENTITY);

        let _ = harness.orchestrator.update(OrchestratorMessage::Screen(
            ScreenViewMessage::PointerPressed(Point::new(10.0, 400.0)),
        ));
        let _ = harness.orchestrator.update(OrchestratorMessage::Screen(
            ScreenViewMessage::PointerReleased(Point::new(10.0, 100.0)),
        ));

        assert_eq!(
            *harness.relay.events.lock().unwrap(),
            vec![DeviceInputEvent::Swipe {
                from: DevicePoint { x: 10, y: 400 },
                to: DevicePoint { x: 10, y: 100 },
            }]
        );
    }

    #[test]
    fn test_home_and_back_relay_key_events() {
        let mut harness = create_test_harness(vec![], DisplayScale::IDENTITY);

        let _ = harness.orchestrator.update(OrchestratorMessage::Home);
        let _ = harness.orchestrator.update(OrchestratorMessage::Back);

        assert_eq!(
            *harness.relay.events.lock().unwrap(),
            vec![
                DeviceInputEvent::KeyEvent(KeyCode::Home),
                DeviceInputEvent::KeyEvent(KeyCode::Back),
            ]
        );
    }

    #[test]
    fn test_relay_settled_triggers_fresh_capture() {
        let mut harness = create_test_harness(vec![Ok(indexed_capture(2, 2))], DisplayScale::IDENTITY);

        let _ = harness.orchestrator.update(OrchestratorMessage::RelaySettled);

        assert_eq!(*harness.bridge.capture_calls.lock().unwrap(), 1);
        assert_eq!(harness.orchestrator.status, STATUS_CAPTURED);
    }

    #[test]
    fn test_get_window_title_names_device() {
        let harness = create_test_harness(vec![], DisplayScale::IDENTITY);

        assert_eq!(
            harness.orchestrator.get_window_title(),
            "Device Screen Capture - emulator-5554"
        );
    }
}
