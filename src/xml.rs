pub mod ejb;
pub mod printer;
pub mod server;
pub mod tree;
