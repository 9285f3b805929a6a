pub mod async_cell;
pub mod async_pipeline;
