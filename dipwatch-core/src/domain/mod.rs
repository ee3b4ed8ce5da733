//! Domain types shared by every stage of the pipeline.

pub mod bar;
pub mod event;
pub mod frame;

pub use bar::Bar;
pub use event::{EventKind, ParseEventKindError, SignalEvent};
pub use frame::IndicatorFrame;
