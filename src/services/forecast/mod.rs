pub mod client;
pub mod flow;
pub mod interface;
