pub mod cli;
pub mod op_arg;
