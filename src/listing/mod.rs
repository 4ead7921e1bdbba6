//! Pure listing logic: the local sort overlay, optimistic deletes, and the
//! pagination window. Nothing in here does I/O.

pub mod delete;
pub mod pagination;
pub mod sort;
