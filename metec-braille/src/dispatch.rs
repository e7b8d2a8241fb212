//! Gesture dispatch collaborator

use crate::gesture::Gesture;

/// Receives decoded gestures from the poller
pub trait Dispatch: Send {
    /// Execute the gesture; false means no action is bound to it
    fn handle(&mut self, gesture: &Gesture) -> bool;

    /// Tell the user that nothing is bound to `gesture`
    ///
    /// Called after `handle` returned false. Polling continues either way.
    fn notify_unbound(&mut self, _gesture: &Gesture) {}
}

impl<F> Dispatch for F
where
    F: FnMut(&Gesture) -> bool + Send,
{
    fn handle(&mut self, gesture: &Gesture) -> bool {
        self(gesture)
    }
}
