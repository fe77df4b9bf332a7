//! File actions: moving redundant copies to a recoverable holding area.

pub mod relocate;

pub use relocate::{
    holding_area, relocate_redundant, HoldingArea, PermanentDelete, RelocateError,
    RelocateSummary, SystemTrash,
};
