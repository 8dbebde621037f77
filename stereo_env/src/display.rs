//! Display sink abstraction.

use crate::error::EnvError;
use crate::observation::CompositeFrame;

/// A window-like target for composite frames.
///
/// Both calls block: `show` until the frame is handed to the backend,
/// `wait_key` until the backend reports input (or decides there is none).
pub trait DisplaySink {
    /// Renders `frame` into the window called `window`.
    fn show(&mut self, window: &str, frame: &CompositeFrame) -> Result<(), EnvError>;

    /// Waits for a key press.
    ///
    /// Returns `None` when the backend has no keyboard or no key was read.
    fn wait_key(&mut self) -> Result<Option<char>, EnvError>;
}
