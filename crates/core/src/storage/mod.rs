mod cancel;
mod error;
mod traits;
mod types;

pub use cancel::{CancellationHandle, CancellationSignal};
pub use error::{RepositoryError, Result};
pub use traits::{ItemStore, Repository};
pub use types::{CreatePolicy, TableDescription, WriteCondition, WriteOutcome};
