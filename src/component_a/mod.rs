// Component A: sensor side of the pipeline.
// Reading sources, the periodic sampler task, and the single-slot cell
// it publishes into.

pub mod sensor;
pub mod sampler;
pub mod shared_cell;
