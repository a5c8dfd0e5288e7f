//! Dependency resolution and sequenced execution

mod executor;
mod lookup;
mod observer;
mod resolver;
mod state;
mod substitute;

pub use executor::{ApiTally, RunReport, SequenceExecutor};
pub use lookup::{find_nested, is_present};
pub use observer::{NoopObserver, RunObserver};
pub use resolver::{apply_inputs, resolve};
pub use state::WorkingGraph;
pub use substitute::{strip_marker, substitute, EQ_MARKER};
