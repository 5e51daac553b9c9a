//! Paced refresh of a display surface.

use crate::metrics::format::DisplayText;
use crate::metrics::traits::MetricsProvider;
use crate::refresh::display::DisplaySurface;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Drives a display from a metrics provider.
///
/// A refresh disables the control and shows the busy indicator right away,
/// then re-reads every metric once the delay has elapsed. The control
/// stays disabled while a refresh is pending, so refreshes never overlap.
///
/// Dropping the controller aborts a pending refresh; this is what keeps a
/// refresh from landing on a torn-down display. The task itself holds only
/// a weak display handle, so a refresh that was already running when the
/// display went away skips its update.
pub struct RefreshController<M, D> {
    provider: Arc<M>,
    display: Arc<Mutex<D>>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl<M, D> RefreshController<M, D>
where
    M: MetricsProvider + Send + Sync + 'static,
    D: DisplaySurface + Send + 'static,
{
    /// Create a controller refreshing `display` from `provider` after `delay`.
    pub fn new(provider: Arc<M>, display: Arc<Mutex<D>>, delay: Duration) -> Self {
        Self {
            provider,
            display,
            delay,
            pending: None,
        }
    }

    pub fn display(&self) -> &Arc<Mutex<D>> {
        &self.display
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Fill the display immediately, without the busy cycle.
    pub fn load_initial(&self) {
        let text = DisplayText::from(&self.provider.collect_report());
        let mut display = self.display.lock();
        display.show_text(&text);
        display.render();
    }

    /// Request a refresh.
    ///
    /// Returns `false` without scheduling anything when the control is
    /// disabled. Must be called from within a tokio runtime.
    pub fn trigger(&mut self) -> bool {
        {
            let mut display = self.display.lock();
            if !display.is_refresh_enabled() {
                debug!("Refresh control disabled, ignoring request");
                return false;
            }
            display.set_refresh_enabled(false);
            display.set_busy(true);
            display.render();
        }

        info!("Refresh scheduled in {}ms", self.delay.as_millis());
        let provider = Arc::clone(&self.provider);
        let display = Arc::downgrade(&self.display);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            apply_refresh(provider.as_ref(), &display);
        }));
        true
    }

    /// Whether a scheduled refresh has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Wait for the scheduled refresh, if any, to finish.
    pub async fn wait_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(err) = handle.await {
                if !err.is_cancelled() {
                    warn!("Refresh task failed: {}", err);
                }
            }
        }
    }
}

impl<M, D> Drop for RefreshController<M, D> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

fn apply_refresh<M, D>(provider: &M, display: &Weak<Mutex<D>>)
where
    M: MetricsProvider,
    D: DisplaySurface,
{
    let Some(display) = display.upgrade() else {
        debug!("Display torn down before refresh fired");
        return;
    };

    let _restore = RestoreControl(&display);
    let text = DisplayText::from(&provider.collect_report());
    display.lock().show_text(&text);
}

/// Clears the busy indicator and re-enables the control on drop, so a
/// panicking provider cannot leave the control disabled.
struct RestoreControl<'a, D: DisplaySurface>(&'a Mutex<D>);

impl<D: DisplaySurface> Drop for RestoreControl<'_, D> {
    fn drop(&mut self) {
        let mut display = self.0.lock();
        display.set_busy(false);
        display.set_refresh_enabled(true);
        display.render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::data::{BatteryLevel, DeviceReport, RamSummary, StorageSummary};
    use crate::refresh::display::DisplayState;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl MetricsProvider for CountingProvider {
        fn collect_report(&self) -> DeviceReport {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) as u8;
            DeviceReport::new(
                BatteryLevel::Percent(50 + call),
                RamSummary::Gigabytes(4),
                StorageSummary {
                    total_gb: 32,
                    used_gb: 12,
                    free_gb: 20,
                },
                Vec::new(),
            )
        }
    }

    fn controller(
        provider: &Arc<CountingProvider>,
    ) -> RefreshController<CountingProvider, DisplayState> {
        RefreshController::new(
            Arc::clone(provider),
            Arc::new(Mutex::new(DisplayState::default())),
            Duration::from_millis(1500),
        )
    }

    #[test]
    fn test_load_initial_fills_fields() {
        let provider = Arc::new(CountingProvider::default());
        let controller = controller(&provider);
        controller.load_initial();

        let display = controller.display().lock();
        assert_eq!(display.battery_text, "Battery Level: 50%");
        assert_eq!(display.ram_text, "RAM Usage: 4 GB");
        assert_eq!(display.storage_text, "Internal: 12 GB used / 32 GB total");
        assert!(display.refresh_enabled);
        assert!(!display.busy);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_defers_refresh() {
        let provider = Arc::new(CountingProvider::default());
        let mut controller = controller(&provider);

        assert!(controller.trigger());
        {
            let display = controller.display().lock();
            assert!(!display.refresh_enabled);
            assert!(display.busy);
        }

        tokio::time::sleep(Duration::from_millis(1400)).await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert!(controller.is_pending());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        let display = controller.display().lock();
        assert_eq!(display.battery_text, "Battery Level: 50%");
        assert!(display.refresh_enabled);
        assert!(!display.busy);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_trigger_is_ignored_while_pending() {
        let provider = Arc::new(CountingProvider::default());
        let mut controller = controller(&provider);

        assert!(controller.trigger());
        assert!(!controller.trigger());
        controller.wait_pending().await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        assert!(controller.trigger());
        controller.wait_pending().await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            controller.display().lock().battery_text,
            "Battery Level: 51%"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_refresh() {
        let provider = Arc::new(CountingProvider::default());
        let mut controller = controller(&provider);
        assert!(controller.trigger());
        drop(controller);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    struct PanickingProvider;

    impl MetricsProvider for PanickingProvider {
        fn collect_report(&self) -> DeviceReport {
            panic!("metrics backend crashed");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_control_reenabled_after_provider_panic() {
        let mut controller = RefreshController::new(
            Arc::new(PanickingProvider),
            Arc::new(Mutex::new(DisplayState::default())),
            Duration::from_millis(1500),
        );

        assert!(controller.trigger());
        controller.wait_pending().await;

        {
            let display = controller.display().lock();
            assert!(display.refresh_enabled);
            assert!(!display.busy);
        }
        assert!(controller.trigger());
    }

    #[test]
    fn test_refresh_skipped_without_display() {
        let provider = CountingProvider::default();
        let display: Weak<Mutex<DisplayState>> = {
            let strong = Arc::new(Mutex::new(DisplayState::default()));
            Arc::downgrade(&strong)
        };
        apply_refresh(&provider, &display);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
