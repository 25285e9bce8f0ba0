//! List engine and the bidirectional paging wrapper around it

mod bidirectional;
mod engine;

pub use bidirectional::{
    BidirectionalList, BidirectionalListProps, EngineRef, ListCallbacks, ScrollCallback, SizeCallback,
};
pub use engine::{EngineOptions, ListEvent, MaintainVisibleContentPosition, MeasureFn, VirtualList};
