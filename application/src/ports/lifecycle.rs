//! Lifecycle notification port
//!
//! Lets a rendering layer follow the busy/idle transitions of the
//! controller, e.g. to show a typing indicator and repaint the transcript.

use duck_domain::Turn;

/// Callback for busy/idle transitions
///
/// Both callbacks receive a snapshot of the transcript at that moment.
/// They must not block: they run on the submitting task.
pub trait LifecycleObserver: Send + Sync {
    /// Called once the user turn is appended and the request is about to go out
    fn on_busy(&self, transcript: &[Turn]);

    /// Called once the request is resolved and the controller is idle again
    fn on_idle(&self, transcript: &[Turn]);
}

/// No-op observer
pub struct NoLifecycleObserver;

impl LifecycleObserver for NoLifecycleObserver {
    fn on_busy(&self, _transcript: &[Turn]) {}
    fn on_idle(&self, _transcript: &[Turn]) {}
}
