//! Hooks for following a run as it happens

use super::executor::RunReport;
use crate::common::CallFailure;
use crate::results::CapturedResponse;

/// Receives progress events from the executor
///
/// All methods default to doing nothing. Iterations are 0-based.
pub trait RunObserver: Send {
    fn on_iteration_start(&mut self, _iteration: usize, _total: usize) {}

    /// Called right before the request of `api` is sent
    fn on_progress(&mut self, _api: &str, _iteration: usize, _total: usize) {}

    fn on_skip(&mut self, _api: &str, _reason: &CallFailure) {}

    /// `counted` is true when the call was added to the API's pass count
    fn on_response(
        &mut self,
        _api: &str,
        _iteration: usize,
        _response: &CapturedResponse,
        _counted: bool,
    ) {
    }

    fn on_finished(&mut self, _report: &RunReport) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
