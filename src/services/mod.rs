//! Services separating I/O, naming and reporting from controller logic

pub mod format;
pub mod io;
pub mod progress;

pub use format::MediaFormatHandler;
pub use io::ImageIoService;
pub use progress::{NoOpObserver, RecordingObserver, StateChange, StateObserver, TracingObserver};
