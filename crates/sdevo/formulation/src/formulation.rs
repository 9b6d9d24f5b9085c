//! Compiled formulation: register-resolved statements and the step loop.

use std::collections::HashMap;

use crate::ast::{AssignOp, BinaryOp, Expr};
use crate::builtins::{Builtin, Signature};
use crate::error::{FormulationError, FormulationResult};
use crate::parser::Parser;
use crate::source::{FormulationSource, STEP_SIZE};

/// An expression with every name resolved.
#[derive(Clone, Debug)]
enum Node {
    Const(f64),
    Load(usize),
    StepSize,
    Negate(Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    Call(Builtin, Vec<Node>),
    TableCall(Builtin, Box<Node>, Vec<(f64, f64)>),
}

impl Node {
    fn eval(&self, registers: &[f64], step_size: f64) -> f64 {
        match self {
            Node::Const(value) => *value,
            Node::Load(slot) => registers[*slot],
            Node::StepSize => step_size,
            Node::Negate(inner) => -inner.eval(registers, step_size),
            Node::Binary(op, left, right) => op.apply(
                left.eval(registers, step_size),
                right.eval(registers, step_size),
            ),
            Node::Call(builtin, args) => {
                let values: Vec<f64> = args
                    .iter()
                    .map(|arg| arg.eval(registers, step_size))
                    .collect();
                builtin.apply(&values)
            }
            Node::TableCall(builtin, x, table) => {
                builtin.apply_table(x.eval(registers, step_size), table)
            }
        }
    }
}

#[derive(Clone, Debug)]
struct Assignment {
    target: usize,
    op: AssignOp,
    value: Node,
}

impl Assignment {
    fn execute(&self, registers: &mut [f64], step_size: f64) {
        let value = self.value.eval(registers, step_size);
        match self.op {
            AssignOp::Set => registers[self.target] = value,
            AssignOp::Accumulate => registers[self.target] += value,
        }
    }
}

/// Symbol table used while compiling.
#[derive(Default)]
struct Symbols {
    names: Vec<String>,
    slots: HashMap<String, usize>,
}

impl Symbols {
    fn declare(&mut self, name: &str) -> FormulationResult<usize> {
        if name == STEP_SIZE {
            return Err(FormulationError::ReservedSymbol(name.to_string()));
        }
        if self.slots.contains_key(name) {
            return Err(FormulationError::DuplicateDeclaration(name.to_string()));
        }
        let slot = self.names.len();
        self.names.push(name.to_string());
        self.slots.insert(name.to_string(), slot);
        Ok(slot)
    }

    fn target(&self, name: &str) -> FormulationResult<usize> {
        if name == STEP_SIZE {
            return Err(FormulationError::ReservedSymbol(name.to_string()));
        }
        self.slots
            .get(name)
            .copied()
            .ok_or_else(|| FormulationError::UndeclaredTarget(name.to_string()))
    }

    fn resolve(&self, expr: &Expr) -> FormulationResult<Node> {
        match expr {
            Expr::Number(value) => Ok(Node::Const(*value)),
            Expr::Variable(name) if name == STEP_SIZE => Ok(Node::StepSize),
            Expr::Variable(name) => self
                .slots
                .get(name)
                .map(|slot| Node::Load(*slot))
                .ok_or_else(|| FormulationError::UnknownSymbol(name.clone())),
            Expr::Negate(inner) => Ok(Node::Negate(Box::new(self.resolve(inner)?))),
            Expr::Binary { op, left, right } => Ok(Node::Binary(
                *op,
                Box::new(self.resolve(left)?),
                Box::new(self.resolve(right)?),
            )),
            Expr::Call { name, args } => self.resolve_call(name, args),
            Expr::Table(_) => Err(FormulationError::InvalidArgument {
                function: "<expression>".into(),
                message: "a table literal is only valid as an interpolation argument".into(),
            }),
        }
    }

    fn resolve_call(&self, name: &str, args: &[Expr]) -> FormulationResult<Node> {
        let builtin =
            Builtin::lookup(name).ok_or_else(|| FormulationError::UnknownFunction(name.into()))?;
        match builtin.signature() {
            Signature::Fixed(expected) => {
                if args.len() != expected {
                    return Err(FormulationError::Arity {
                        name: name.into(),
                        expected,
                        found: args.len(),
                    });
                }
                let nodes = args
                    .iter()
                    .map(|arg| self.resolve(arg))
                    .collect::<FormulationResult<Vec<_>>>()?;
                Ok(Node::Call(builtin, nodes))
            }
            Signature::Table => {
                if args.len() != 2 {
                    return Err(FormulationError::Arity {
                        name: name.into(),
                        expected: 2,
                        found: args.len(),
                    });
                }
                let Expr::Table(points) = &args[1] else {
                    return Err(FormulationError::InvalidArgument {
                        function: name.into(),
                        message: "second argument must be a table literal".into(),
                    });
                };
                let x = self.resolve(&args[0])?;
                Ok(Node::TableCall(builtin, Box::new(x), points.clone()))
            }
        }
    }
}

/// A built, steppable formulation.
///
/// Registers hold every declared state value. [`Formulation::step`] executes
/// the knit statements and then the split statements in source order; `+=`
/// statements carry their register value across steps.
#[derive(Clone, Debug)]
pub struct Formulation {
    registers: Vec<f64>,
    names: Vec<String>,
    slots: HashMap<String, usize>,
    knit: Vec<Assignment>,
    split: Vec<Assignment>,
    fitness: Node,
    step_size: f64,
    first_step: bool,
}

impl Formulation {
    /// Parse and resolve every part of `source`. Declarations are evaluated
    /// in order and may refer to earlier declarations and `stepSize`.
    pub fn compile(source: &FormulationSource, step_size: f64) -> FormulationResult<Self> {
        let mut symbols = Symbols::default();
        let mut registers = Vec::with_capacity(source.declarations.len());

        for declaration in &source.declarations {
            let initial = Parser::parse_expression(&declaration.initial)?;
            let node = symbols.resolve(&initial)?;
            let value = node.eval(&registers, step_size);
            symbols.declare(&declaration.name)?;
            registers.push(value);
        }

        let knit = Self::compile_statements(&symbols, &source.knit)?;
        let split = Self::compile_statements(&symbols, &source.split)?;

        if source.fitness.trim().is_empty() {
            return Err(FormulationError::EmptyFitness);
        }
        let fitness = symbols.resolve(&Parser::parse_expression(&source.fitness)?)?;

        Ok(Self {
            registers,
            names: symbols.names,
            slots: symbols.slots,
            knit,
            split,
            fitness,
            step_size,
            first_step: true,
        })
    }

    fn compile_statements(
        symbols: &Symbols,
        lines: &[String],
    ) -> FormulationResult<Vec<Assignment>> {
        lines
            .iter()
            .map(|line| {
                let statement = Parser::parse_statement(line)?;
                Ok(Assignment {
                    target: symbols.target(&statement.target)?,
                    op: statement.op,
                    value: symbols.resolve(&statement.value)?,
                })
            })
            .collect()
    }

    /// Run the knit statements, then the split statements.
    pub fn step(&mut self) {
        for assignment in &self.knit {
            assignment.execute(&mut self.registers, self.step_size);
        }
        for assignment in &self.split {
            assignment.execute(&mut self.registers, self.step_size);
        }
        self.first_step = false;
    }

    pub fn run(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Evaluate the fitness expression over the current registers.
    pub fn calculate_fitness(&self) -> FormulationResult<f64> {
        let value = self.fitness.eval(&self.registers, self.step_size);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(FormulationError::NonFiniteFitness(value))
        }
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.slots.get(name).map(|slot| self.registers[*slot])
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn is_first_step(&self) -> bool {
        self.first_step
    }
}
