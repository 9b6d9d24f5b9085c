#![deny(unsafe_code)]
//! # sdevo-formulation
//!
//! Turns synthesized model equations into a steppable numeric program.
//!
//! A [`FormulationSource`] holds four parts: state declarations, the knit
//! statements, the split statements and a fitness expression. Building it
//! parses every statement into an operation tree whose variables are resolved
//! to register slots. Each call to [`Formulation::step`] runs the knit
//! statements and then the split statements over those registers.
//!
//! The [`FormulationSandbox`] trait is the seam the genome uses to evaluate
//! models; [`InterpreterSandbox`] is the default in-process implementation.

pub mod ast;
pub mod builtins;
pub mod error;
pub mod formulation;
pub mod lexer;
pub mod parser;
pub mod sandbox;
pub mod source;

pub use ast::{AssignOp, BinaryOp, Expr, Statement};
pub use builtins::Builtin;
pub use error::{FormulationError, FormulationResult};
pub use formulation::Formulation;
pub use parser::Parser;
pub use sandbox::{FormulationSandbox, InterpreterSandbox};
pub use source::{Declaration, FormulationSource, STEP_SIZE};
