use std::cell::{Cell, RefCell};

use super::{Alert, AlertKind, AppService};

/// App-shell state: the global loading flag and the pending alerts.
///
/// The front end polls it after every editor call and renders what it finds.
#[derive(Debug, Default)]
pub struct AppStatus {
    loading: Cell<bool>,
    alerts: RefCell<Vec<Alert>>,
}

impl AppStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.borrow().clone()
    }

    pub fn take_alerts(&self) -> Vec<Alert> {
        self.alerts.take()
    }
}

impl AppService for AppStatus {
    fn set_global_loading(&self, loading: bool) {
        self.loading.set(loading);
    }

    fn set_app_alerts(&self, alerts: Vec<Alert>) {
        for alert in &alerts {
            match alert.kind {
                AlertKind::Success => log::info!("{}", alert.message),
                AlertKind::Danger => log::warn!("{}", alert.message),
            }
        }
        self.alerts.borrow_mut().extend(alerts);
    }
}
