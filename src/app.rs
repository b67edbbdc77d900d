use std::sync::Arc;

use iced::{Element, Task, Theme};

use crate::adapters::{AdbCliInputRelay, ArboardClipboard};
use crate::core::interfaces::ports::DeviceBridge;
use crate::core::models::{DeviceInfo, DisplayScale, UserSettings};
use crate::core::orchestrators::app_orchestrator::{AppOrchestrator, OrchestratorMessage};
use crate::global_constants::LOG_TAG_APP;
use crate::presentation::app_theme;

/// Everything the window needs, resolved before the event loop starts.
#[derive(Clone)]
pub struct SessionConfig {
    pub bridge: Arc<dyn DeviceBridge>,
    pub device: DeviceInfo,
    pub scale: DisplayScale,
    pub settings: UserSettings,
}

pub struct ScreenCaptureApp {
    orchestrator: AppOrchestrator,
    theme: Theme,
}

impl ScreenCaptureApp {
    pub fn build(config: SessionConfig) -> (Self, Task<OrchestratorMessage>) {
        log::info!(
            "{} Initializing session for {} at scale {}",
            LOG_TAG_APP,
            config.device.serial,
            config.scale
        );

        let input_relay = Arc::new(AdbCliInputRelay::initialize(
            config.settings.adb_program(),
            &config.device.serial,
        ));
        let theme = app_theme::get_theme(&config.settings.theme_mode);

        let orchestrator = AppOrchestrator::build(
            config.bridge,
            input_relay,
            Arc::new(ArboardClipboard::initialize()),
            config.device,
            config.scale,
            config.settings,
        );

        (
            Self {
                orchestrator,
                theme,
            },
            Task::done(OrchestratorMessage::Refresh),
        )
    }

    pub fn handle_update(&mut self, message: OrchestratorMessage) -> Task<OrchestratorMessage> {
        self.orchestrator.update(message)
    }

    pub fn render_view(&self) -> Element<'_, OrchestratorMessage> {
        self.orchestrator.render_view()
    }

    pub fn get_title(&self) -> String {
        self.orchestrator.get_window_title()
    }

    pub fn get_theme(&self) -> Theme {
        self.theme.clone()
    }
}
