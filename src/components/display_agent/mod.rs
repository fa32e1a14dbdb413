//! Wake, fetch, render and sleep cycle of the e-paper room display.

#[cfg(feature = "png-surface")]
pub mod image_surface;
pub mod network;
pub mod render;
pub mod sleep;
pub mod source;
pub mod state;
pub mod surface;

pub use network::{connect_with_backoff, Network, RouteCheckNetwork};
pub use sleep::{DeepSleep, TimerSleep};
pub use source::{HttpSummarySource, SummarySource};
pub use state::{store_for, EphemeralState, FileStateStore, StateStore};
pub use surface::{Color, DisplaySurface, FontSize, LogSurface, Palette};

use crate::components::room_summary::RoomSummary;
use crate::config::AgentConfig;
use crate::error::AppResult;
use std::fmt;
use tracing::{error, info, warn};

/// Shown when the network cannot be joined
pub const CONNECT_ERROR_MESSAGE: &str = "Unable to connect to WiFi";

/// How a wake cycle ended. Every outcome is followed by deep sleep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    ConnectFailed(String),
    FetchFailed(String),
    ParseFailed(String),
    Unchanged,
    Rendered,
    DisplayFailed(String),
}

impl CycleOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, CycleOutcome::Unchanged | CycleOutcome::Rendered)
    }

    /// Whether the screen contents changed, so the stored state must be rewritten
    pub fn changes_state(&self) -> bool {
        matches!(
            self,
            CycleOutcome::Rendered | CycleOutcome::ConnectFailed(_) | CycleOutcome::DisplayFailed(_)
        )
    }

    /// Report the outcome of a cycle
    pub fn log(&self, room: &str) {
        if self.is_failure() {
            warn!("Wake cycle for {} failed: {}", room, self);
        } else {
            info!("Wake cycle for {}: {}", room, self);
        }
    }
}

impl fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleOutcome::ConnectFailed(e) => write!(f, "connect failed: {}", e),
            CycleOutcome::FetchFailed(e) => write!(f, "fetch failed: {}", e),
            CycleOutcome::ParseFailed(e) => write!(f, "parse failed: {}", e),
            CycleOutcome::Unchanged => f.write_str("no change"),
            CycleOutcome::Rendered => f.write_str("rendered"),
            CycleOutcome::DisplayFailed(e) => write!(f, "display failed: {}", e),
        }
    }
}

/// Result of one wake cycle with the state to carry into the next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub outcome: CycleOutcome,
    /// Summary currently on screen, `None` when unknown
    pub last_rendered: Option<RoomSummary>,
}

impl CycleReport {
    fn new(outcome: CycleOutcome, last_rendered: Option<RoomSummary>) -> Self {
        Self {
            outcome,
            last_rendered,
        }
    }
}

/// The device program for one power-on
pub struct DisplayAgent {
    config: AgentConfig,
    network: Box<dyn Network>,
    source: Box<dyn SummarySource>,
    surface: Box<dyn DisplaySurface>,
}

impl DisplayAgent {
    pub fn new(
        config: AgentConfig,
        network: Box<dyn Network>,
        source: Box<dyn SummarySource>,
        surface: Box<dyn DisplaySurface>,
    ) -> Self {
        Self {
            config,
            network,
            source,
            surface,
        }
    }

    /// Build an agent from the host implementations of each collaborator
    pub fn for_host(config: &AgentConfig) -> AppResult<Self> {
        let network = RouteCheckNetwork::new(&config.server_address)?;
        let source = HttpSummarySource::new(config)?;
        let surface = host_surface(config)?;

        Ok(Self::new(
            config.clone(),
            Box::new(network),
            Box::new(source),
            surface,
        ))
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Run init, connect, fetch and render. The caller sleeps afterwards.
    pub async fn run_cycle(&mut self, last_rendered: Option<RoomSummary>) -> CycleReport {
        if let Err(e) = self.surface.init(Palette::default()) {
            return CycleReport::new(CycleOutcome::DisplayFailed(e.to_string()), None);
        }

        if let Err(e) = connect_with_backoff(self.network.as_mut(), &self.config).await {
            if let Err(display_err) = render::render_message(self.surface.as_mut(), CONNECT_ERROR_MESSAGE) {
                error!("Failed to show connection error: {}", display_err);
            }
            // The screen no longer shows the last summary
            return CycleReport::new(CycleOutcome::ConnectFailed(e.to_string()), None);
        }

        let body = match self.source.fetch(&self.config.room_name).await {
            Ok(body) => body,
            Err(e) => {
                return CycleReport::new(CycleOutcome::FetchFailed(e.to_string()), last_rendered)
            }
        };

        let summary: RoomSummary = match serde_json::from_str(&body) {
            Ok(summary) => summary,
            Err(e) => {
                return CycleReport::new(CycleOutcome::ParseFailed(e.to_string()), last_rendered)
            }
        };

        if last_rendered.as_ref() == Some(&summary) {
            return CycleReport::new(CycleOutcome::Unchanged, last_rendered);
        }

        match render::render_summary(self.surface.as_mut(), &summary) {
            Ok(blocks) => {
                info!("Rendered {} with {} text blocks", summary.room_name, blocks);
                CycleReport::new(CycleOutcome::Rendered, Some(summary))
            }
            Err(e) => CycleReport::new(CycleOutcome::DisplayFailed(e.to_string()), None),
        }
    }
}

/// One power-on: restore state, run the cycle, persist what is on screen
pub async fn boot(agent: &mut DisplayAgent, store: &dyn StateStore) -> CycleOutcome {
    let last_rendered = store.load();
    let report = agent.run_cycle(last_rendered).await;

    if report.outcome.changes_state() {
        if let Err(e) = store.save(report.last_rendered.as_ref()) {
            warn!("Failed to store display state: {}", e);
        }
    }

    report.outcome.log(&agent.config().room_name);
    report.outcome
}

#[cfg(feature = "png-surface")]
fn host_surface(config: &AgentConfig) -> AppResult<Box<dyn DisplaySurface>> {
    match &config.font_path {
        Some(font_path) => Ok(Box::new(image_surface::ImageSurface::from_font_file(
            font_path,
            &config.output_path,
        )?)),
        None => Ok(Box::new(LogSurface::default())),
    }
}

#[cfg(not(feature = "png-surface"))]
fn host_surface(_config: &AgentConfig) -> AppResult<Box<dyn DisplaySurface>> {
    Ok(Box::new(LogSurface::default()))
}
