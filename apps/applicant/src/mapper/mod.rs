//! Step Data Mapper: pure transforms between UI-shaped form state and the
//! backend's wire shapes. Nothing in here performs I/O.

pub mod normalize;
pub mod prefill;
pub mod review;
pub mod wire;

pub use prefill::{from_wire, ApplicationPatch, TextField};
pub use review::review_view;
pub use wire::{to_wire, StepPayload};
