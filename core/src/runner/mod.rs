mod drain;
mod executor;
pub mod exit;
mod toolchain;

pub use drain::{drain_into_state, StreamKind, READ_CHUNK_BYTES};
pub use executor::{RunExecutor, RunOutcome};
pub use toolchain::{CommandSpec, CoverageToolchain};
