// Form access and floor table import.
pub mod floor_csv;
pub mod form_store;
pub mod memory_store;

pub use floor_csv::FloorCsvParser;
pub use form_store::{ControlKind, FormControl, FormStore};
pub use memory_store::MemoryFormStore;
