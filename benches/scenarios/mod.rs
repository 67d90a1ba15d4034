//! Benchmarks for whole render blocks.

mod render;

pub use render::bench_render;
