pub mod debounce;
pub mod protocol;

pub use debounce::{Debouncer, KeyedDebouncer};
pub use protocol::OutlineEditor;
