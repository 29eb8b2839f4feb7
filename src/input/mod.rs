//! Input - everything between a key press and a pipeline update.
//!
//! - [`keyboard`] - crossterm key events converted to [`KeyboardEvent`]
//! - [`bindings`] - keyboard events resolved to session [`Action`]s
//! - [`query_line`] - the editable pattern text
//! - [`debounce`] - quiet-interval coalescing of pattern updates

pub mod bindings;
pub mod debounce;
pub mod keyboard;
pub mod query_line;

pub use bindings::{action_for, Action, Scroll};
pub use debounce::{Debouncer, PendingToken};
pub use keyboard::{convert_key_event, KeyState, KeyboardEvent, Modifiers};
pub use query_line::{Edit, QueryLine};
