pub mod task;

pub use task::{DocumentId, SequentialId, Task, TaskKey};
