//! Repositories over an `ItemStore`.
//!
//! [`GenericRepository`] does the work; [`TimeoutRepository`] and
//! [`CancellableRepository`] are decorators that wrap any `Repository`.

mod cancellable;
mod generic;
mod timeout;

#[cfg(test)]
mod testing;

pub use cancellable::CancellableRepository;
pub use generic::GenericRepository;
pub use timeout::TimeoutRepository;
