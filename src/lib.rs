pub mod cli;
pub mod depth_pipeline;
pub mod logger;
