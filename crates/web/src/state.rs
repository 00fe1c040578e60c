use chrono::NaiveDate;
use services::{AppServices, Clock};

/// Shared handler state, provided by the application composition root
/// (e.g. `crates/app`).
#[derive(Clone)]
pub struct AppState {
    services: AppServices,
    clock: Clock,
}

impl AppState {
    #[must_use]
    pub fn new(services: AppServices, clock: Clock) -> Self {
        Self { services, clock }
    }

    #[must_use]
    pub fn services(&self) -> &AppServices {
        &self.services
    }

    /// Default value for date inputs.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
