pub mod trit;
pub mod trit_array;
pub mod alu;
pub mod memory;
pub mod register_file;
pub mod tvm;
pub mod isa;
pub mod interpreter;

pub use trit::Trit;
pub use interpreter::Interpreter;
