//! Line dispatcher: built-ins, registry resolution and argument evaluation.
//!
//! Each call to [`Dispatcher::execute`] walks one line. Sub-expressions in
//! parentheses are executed by recursing with their own argument list and
//! value vector, so nested evaluations never share scratch state.

use std::borrow::Cow;

use super::{
    ArgSource, CVar, ConCmd, ConsoleError, ConsoleRegistry, Resolved, ScrollbackLog, Value,
    ValueType, split_arguments, split_identifier,
};

/// Maximum number of parameters a command may declare.
pub const MAX_ARITY: usize = 4;

/// Maximum depth of nested `( … )` sub-expressions.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Built-in commands: name, usage, description.
const BUILTINS: &[(&str, &str, &str)] = &[
    ("set", "set <id> <value>", "Write a variable"),
    ("get", "get <id>", "Print the value of a variable"),
    ("help", "help [id]", "List built-ins, or describe a command or variable"),
    ("listcvars", "listcvars [prefix]", "List variables"),
    ("listcmd", "listcmd [prefix]", "List commands"),
    ("echo", "echo <args…>", "Print the evaluated arguments"),
    ("clear", "clear", "Clear the scrollback"),
    ("+", "+ <a> <b>", "Add two numbers"),
    ("-", "- <a> <b>", "Subtract b from a"),
    ("*", "* <a> <b>", "Multiply two numbers"),
    ("/", "/ <a> <b>", "Divide a by b (integer division for integers)"),
    ("%", "% <a> <b>", "Remainder of a divided by b"),
];

/// Check whether `name` is reserved by a built-in.
pub fn is_builtin(name: &str) -> bool {
    BUILTINS.iter().any(|(builtin, _, _)| *builtin == name)
}

/// Names of all built-ins, in help order.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|(name, _, _)| *name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Builtin {
    Set,
    Get,
    Help,
    ListCvars,
    ListCmd,
    Echo,
    Clear,
    Arith(ArithOp),
}

impl Builtin {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "set" => Builtin::Set,
            "get" => Builtin::Get,
            "help" => Builtin::Help,
            "listcvars" => Builtin::ListCvars,
            "listcmd" => Builtin::ListCmd,
            "echo" => Builtin::Echo,
            "clear" => Builtin::Clear,
            "+" => Builtin::Arith(ArithOp::Add),
            "-" => Builtin::Arith(ArithOp::Sub),
            "*" => Builtin::Arith(ArithOp::Mul),
            "/" => Builtin::Arith(ArithOp::Div),
            "%" => Builtin::Arith(ArithOp::Rem),
            _ => return None,
        })
    }
}

/// Executes console lines against a registry.
///
/// The dispatcher borrows the scrollback only so that `clear` can empty it.
/// Echoing the request and printing the result is left to the caller.
///
/// # Examples
///
/// ```
/// use bevy_dropdown_console::core::{ConsoleRegistry, Dispatcher, ScrollbackLog};
///
/// let registry = ConsoleRegistry::new();
/// let mut log = ScrollbackLog::new(1024);
/// let mut dispatcher = Dispatcher::new(&registry, &mut log);
///
/// assert_eq!(dispatcher.execute("+ (- 3 2) (* 4 5)").unwrap(), "21");
/// ```
pub struct Dispatcher<'a> {
    registry: &'a ConsoleRegistry,
    log: &'a mut ScrollbackLog,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a ConsoleRegistry, log: &'a mut ScrollbackLog) -> Self {
        Self { registry, log }
    }

    /// Execute one line and return its printed result.
    pub fn execute(&mut self, line: &str) -> Result<String, ConsoleError> {
        self.run(line, 0)
    }

    fn run(&mut self, line: &str, depth: usize) -> Result<String, ConsoleError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(ConsoleError::NestingTooDeep);
        }

        let (name, rest) = split_identifier(line)?;
        if let Some(builtin) = Builtin::parse(name) {
            return self.run_builtin(builtin, name, rest, depth);
        }

        let registry = self.registry;
        match registry.resolve(name) {
            Resolved::Cmd(cmd) => self.run_command(cmd, rest, depth),
            Resolved::Var(var) => {
                let args = split_arguments(rest)?;
                match args.as_slice() {
                    [] => read_var(var),
                    [value] => self.write_var(var, *value, depth),
                    _ => Err(arity_error(name, 1, args.len())),
                }
            }
            Resolved::NotFound => Err(ConsoleError::UnknownIdentifier(name.to_string())),
        }
    }

    /// Validate arity, evaluate every argument, then invoke exactly once.
    fn run_command(&mut self, cmd: &ConCmd, rest: &str, depth: usize) -> Result<String, ConsoleError> {
        let args = split_arguments(rest)?;
        if args.len() != cmd.arity() {
            return Err(arity_error(cmd.name(), cmd.arity(), args.len()));
        }

        let mut values = Vec::with_capacity(args.len());
        for (arg, ty) in args.iter().zip(cmd.signature()) {
            values.push(self.evaluate(*arg, *ty, depth)?);
        }

        cmd.invoke(&values)
    }

    fn run_builtin(
        &mut self,
        builtin: Builtin,
        name: &str,
        rest: &str,
        depth: usize,
    ) -> Result<String, ConsoleError> {
        let args = split_arguments(rest)?;
        match builtin {
            Builtin::Set => {
                let [id, value] = exact::<2>(name, &args)?;
                let var = self.lookup_var(id, depth)?;
                self.write_var(var, value, depth)
            }
            Builtin::Get => {
                let [id] = exact::<1>(name, &args)?;
                let var = self.lookup_var(id, depth)?;
                read_var(var)
            }
            Builtin::Help => match at_most_one(name, &args)? {
                None => Ok(self.help_overview()),
                Some(id) => {
                    let id = self.evaluate_text(id, depth)?;
                    self.help_for(&id)
                }
            },
            Builtin::ListCvars => {
                let prefix = self.optional_text(name, &args, depth)?;
                let mut lines: Vec<String> =
                    self.registry.vars(&prefix).map(ToString::to_string).collect();
                lines.push(format!("{} cvars", lines.len()));
                Ok(lines.join("\n"))
            }
            Builtin::ListCmd => {
                let prefix = self.optional_text(name, &args, depth)?;
                let mut lines: Vec<String> = self.registry.cmds(&prefix).map(describe_cmd).collect();
                lines.push(format!("{} commands", lines.len()));
                Ok(lines.join("\n"))
            }
            Builtin::Echo => {
                let mut words = Vec::with_capacity(args.len());
                for arg in &args {
                    words.push(self.evaluate_text(*arg, depth)?);
                }
                Ok(words.join(" "))
            }
            Builtin::Clear => {
                exact::<0>(name, &args)?;
                self.log.clear();
                Ok(String::new())
            }
            Builtin::Arith(op) => {
                let [a, b] = exact::<2>(name, &args)?;
                let a = self.evaluate_number(a, depth)?;
                let b = self.evaluate_number(b, depth)?;
                arithmetic(op, a, b).map(|v| v.to_string())
            }
        }
    }

    /// Resolve one argument to the requested type.
    ///
    /// Nested lines run through the full dispatcher one level deeper. Their
    /// side effects have happened by the time a later argument fails.
    fn evaluate(&mut self, arg: ArgSource<'_>, ty: ValueType, depth: usize) -> Result<Value, ConsoleError> {
        let text = self.argument_text(arg, depth)?;
        let text = text.trim();
        Value::coerce(text, ty).ok_or_else(|| ConsoleError::TypeError {
            expected: ty,
            found: text.to_string(),
        })
    }

    fn evaluate_text(&mut self, arg: ArgSource<'_>, depth: usize) -> Result<String, ConsoleError> {
        Ok(self.argument_text(arg, depth)?.trim().to_string())
    }

    fn evaluate_number(&mut self, arg: ArgSource<'_>, depth: usize) -> Result<Value, ConsoleError> {
        let text = self.argument_text(arg, depth)?;
        let text = text.trim();
        Value::parse_number(text).ok_or_else(|| ConsoleError::TypeError {
            expected: ValueType::Float,
            found: text.to_string(),
        })
    }

    fn argument_text<'s>(&mut self, arg: ArgSource<'s>, depth: usize) -> Result<Cow<'s, str>, ConsoleError> {
        match arg {
            ArgSource::Token(token) => Ok(Cow::Borrowed(token)),
            ArgSource::Nested(line) => self.run(line, depth + 1).map(Cow::Owned),
        }
    }

    fn optional_text(&mut self, name: &str, args: &[ArgSource<'_>], depth: usize) -> Result<String, ConsoleError> {
        match at_most_one(name, args)? {
            Some(arg) => self.evaluate_text(arg, depth),
            None => Ok(String::new()),
        }
    }

    fn lookup_var(&mut self, arg: ArgSource<'_>, depth: usize) -> Result<&'a CVar, ConsoleError> {
        let id = self.evaluate_text(arg, depth)?;
        self.registry
            .var(&id)
            .ok_or(ConsoleError::UnknownIdentifier(id))
    }

    fn write_var(&mut self, var: &CVar, arg: ArgSource<'_>, depth: usize) -> Result<String, ConsoleError> {
        let value = self.evaluate(arg, var.value_type(), depth)?;
        var.write(&value)?;
        read_var(var)
    }

    fn help_overview(&self) -> String {
        let mut lines = vec!["Built-ins:".to_string()];
        lines.extend(
            BUILTINS
                .iter()
                .map(|(_, usage, desc)| format!("  {usage} - {desc}")),
        );
        lines.push(format!(
            "{} commands, {} variables bound. Use 'listcmd' and 'listcvars' to list them",
            self.registry.cmds("").count(),
            self.registry.vars("").count(),
        ));
        lines.join("\n")
    }

    fn help_for(&self, id: &str) -> Result<String, ConsoleError> {
        if let Some((_, usage, desc)) = BUILTINS.iter().find(|(name, _, _)| *name == id) {
            return Ok(format!("{usage} - {desc}"));
        }
        match self.registry.resolve(id) {
            Resolved::Cmd(cmd) => Ok(describe_cmd(cmd)),
            Resolved::Var(var) => Ok(var.to_string()),
            Resolved::NotFound => Err(ConsoleError::UnknownIdentifier(id.to_string())),
        }
    }
}

fn read_var(var: &CVar) -> Result<String, ConsoleError> {
    var.read().map(|value| value.to_string())
}

fn describe_cmd(cmd: &ConCmd) -> String {
    match cmd.get_description() {
        "" => cmd.usage(),
        desc => format!("{} - {}", cmd.usage(), desc),
    }
}

fn arity_error(name: &str, expected: usize, found: usize) -> ConsoleError {
    ConsoleError::ArityError {
        name: name.to_string(),
        expected,
        found,
    }
}

fn exact<'s, const N: usize>(name: &str, args: &[ArgSource<'s>]) -> Result<[ArgSource<'s>; N], ConsoleError> {
    <[ArgSource<'s>; N]>::try_from(args).map_err(|_| arity_error(name, N, args.len()))
}

fn at_most_one<'s>(name: &str, args: &[ArgSource<'s>]) -> Result<Option<ArgSource<'s>>, ConsoleError> {
    match args {
        [] => Ok(None),
        [arg] => Ok(Some(*arg)),
        _ => Err(arity_error(name, 1, args.len())),
    }
}

fn arithmetic(op: ArithOp, a: Value, b: Value) -> Result<Value, ConsoleError> {
    if let (Value::Integer(x), Value::Integer(y)) = (&a, &b) {
        let (x, y) = (*x, *y);
        if y == 0 && matches!(op, ArithOp::Div | ArithOp::Rem) {
            return Err(ConsoleError::Arithmetic("division by zero".into()));
        }
        let result = match op {
            ArithOp::Add => x.checked_add(y),
            ArithOp::Sub => x.checked_sub(y),
            ArithOp::Mul => x.checked_mul(y),
            ArithOp::Div => x.checked_div(y),
            ArithOp::Rem => x.checked_rem(y),
        };
        return result
            .map(Value::Integer)
            .ok_or_else(|| ConsoleError::Arithmetic("integer overflow".into()));
    }

    let (Some(x), Some(y)) = (a.as_float(), b.as_float()) else {
        return Err(ConsoleError::Arithmetic("operands must be numbers".into()));
    };
    let result = match op {
        ArithOp::Add => x + y,
        ArithOp::Sub => x - y,
        ArithOp::Mul => x * y,
        ArithOp::Div => x / y,
        ArithOp::Rem => x % y,
    };
    if result.is_finite() {
        Ok(Value::Float(result))
    } else {
        Err(ConsoleError::Arithmetic(format!("{a} and {b} give a non-finite result")))
    }
}
