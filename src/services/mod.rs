pub mod amount;
pub mod rpc;
pub mod token;
