pub mod partition;
pub mod props;
pub mod root;
pub mod runner;
pub mod shell;
