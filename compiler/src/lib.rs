pub mod tast;
pub mod hierarchy;
pub mod logging;
