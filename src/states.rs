pub mod autosave;
pub mod form_store;

pub use autosave::AutosaveState;
pub use form_store::{FormStore, StoreEvent};
