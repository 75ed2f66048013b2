//! This contains the script side abstractions: the error type executed code raises, the Script struct
//! which carries inline code through the preprocessors and the ScriptExecutor trait hosts implement
//!

use backtrace::Backtrace;
use std::fmt::{Debug, Error, Formatter};

pub mod modules;

/// a preprocessor is run for every inline script before it is handed to the ScriptExecutor
pub trait ScriptPreProcessor {
    fn process(&self, script: &mut Script) -> Result<(), ScriptError>;
}

/// an error raised by executed code
#[derive(Debug, Clone)]
pub struct ScriptError {
    name: String,
    message: String,
    stack: String,
}

impl ScriptError {
    pub fn new(name: String, message: String, stack: String) -> Self {
        Self {
            name,
            message,
            stack,
        }
    }
    pub fn new_str(err: &str) -> Self {
        Self::new_string(err.to_string())
    }
    pub fn new_string(err: String) -> Self {
        let bt = Backtrace::new();
        ScriptError {
            name: "Error".to_string(),
            message: err,
            stack: format!("{bt:?}"),
        }
    }
    pub fn get_message(&self) -> &str {
        self.message.as_str()
    }
    pub fn get_stack(&self) -> &str {
        self.stack.as_str()
    }
    pub fn get_name(&self) -> &str {
        self.name.as_str()
    }
}

impl std::error::Error for ScriptError {}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        let e = format!("{}: {}\n{}", self.name, self.message, self.stack);
        f.write_str(e.as_str())
    }
}

/// the code of an inline module script together with the url it should perceive as its own
#[derive(Clone)]
pub struct Script {
    path: String,
    code: String,
}

impl Debug for Script {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(format!("Script:{}", self.path.as_str()).as_str())
    }
}

impl Script {
    pub fn new(absolute_path: &str, script_code: &str) -> Self {
        Self {
            path: absolute_path.to_string(),
            code: script_code.to_string(),
        }
    }
    pub fn get_path(&self) -> &str {
        self.path.as_str()
    }
    pub fn get_code(&self) -> &str {
        self.code.as_str()
    }
    pub fn set_code(&mut self, code: String) {
        self.code = code;
    }
}
