pub mod completion;
pub mod config;
pub mod extensions;
pub mod generate;
pub mod preview;
pub mod search;
pub mod stats;
pub mod tree;
