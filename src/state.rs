//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::watch;

use crate::application::jobs::SchedulerState;
use crate::application::services::{AnalyticsAggregator, ClickRecorder, LinkService};
use crate::domain::repositories::{AnalyticsRepository, LinkRepository};
use crate::utils::code_generator::CodeGenerator;

pub type DynLinkService = LinkService<dyn LinkRepository, dyn AnalyticsRepository>;
pub type DynClickRecorder = ClickRecorder<dyn LinkRepository, dyn AnalyticsRepository>;
pub type DynAnalyticsAggregator = AnalyticsAggregator<dyn AnalyticsRepository>;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
    pub click_recorder: DynClickRecorder,
    pub analytics: DynAnalyticsAggregator,
    pub links: Arc<dyn LinkRepository>,
    pub base_url: String,
    pub reset_state: Option<watch::Receiver<SchedulerState>>,
}

impl AppState {
    /// Wires the services over the given stores.
    pub fn new(
        links: Arc<dyn LinkRepository>,
        analytics: Arc<dyn AnalyticsRepository>,
        generator: CodeGenerator,
        base_url: impl Into<String>,
    ) -> Self {
        let aggregator = AnalyticsAggregator::new(analytics);

        Self {
            link_service: Arc::new(LinkService::new(
                Arc::clone(&links),
                aggregator.clone(),
                generator,
            )),
            click_recorder: ClickRecorder::new(Arc::clone(&links), aggregator.clone()),
            analytics: aggregator,
            links,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            reset_state: None,
        }
    }

    /// Exposes the daily reset scheduler's state to the health check.
    pub fn with_reset_state(mut self, reset_state: watch::Receiver<SchedulerState>) -> Self {
        self.reset_state = Some(reset_state);
        self
    }

    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}
