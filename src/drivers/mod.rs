//! Signal conditioning for raw peripheral inputs.

pub mod debounce;
