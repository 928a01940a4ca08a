pub mod callable;
pub mod control;
pub mod environment;
pub mod error;
pub mod function;
pub mod interpreter;
pub mod stack;
pub mod value;

pub use callable::{Callable, Evaluator, NativeFunction};
pub use control::FlowSignal;
pub use environment::Environment;
pub use error::{RuntimeError, RuntimeResult};
pub use function::UserFunction;
pub use interpreter::{Interpreter, InterpreterConfig};
pub use value::{Instance, Value};
