//! Console command (ConCmd) implementation.
//!
//! A ConCmd declares a fixed, typed signature at registration time. The
//! dispatcher validates the arguments against it before the handler runs.

use super::{ConsoleError, MAX_ARITY, Value, ValueType};

/// Arguments passed to a command handler, already validated against the
/// command's signature.
#[derive(Debug, Clone)]
pub struct CommandArgs<'a> {
    name: &'a str,
    values: &'a [Value],
}

impl<'a> CommandArgs<'a> {
    /// Create new command args for the command `name`.
    pub fn new(name: &'a str, values: &'a [Value]) -> Self {
        Self { name, values }
    }

    /// Name of the command being invoked.
    #[inline]
    pub fn name(&self) -> &str {
        self.name
    }

    /// Get the number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no arguments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get an argument by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get an integer argument.
    pub fn int(&self, index: usize) -> Result<i64, ConsoleError> {
        self.typed(index, ValueType::Integer, Value::as_integer)
    }

    /// Get a float argument. Integer arguments widen.
    pub fn float(&self, index: usize) -> Result<f64, ConsoleError> {
        self.typed(index, ValueType::Float, Value::as_float)
    }

    /// Get a text argument.
    pub fn text(&self, index: usize) -> Result<&str, ConsoleError> {
        self.typed(index, ValueType::Text, Value::as_text)
    }

    fn typed<T>(
        &self,
        index: usize,
        expected: ValueType,
        extract: impl Fn(&'a Value) -> Option<T>,
    ) -> Result<T, ConsoleError> {
        match self.values.get(index) {
            Some(value) => extract(value).ok_or_else(|| ConsoleError::TypeError {
                expected,
                found: value.to_string(),
            }),
            None => Err(ConsoleError::ArityError {
                name: self.name.to_string(),
                expected: index + 1,
                found: self.values.len(),
            }),
        }
    }

    /// Get all arguments as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        self.values
    }

    /// Iterate over arguments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }
}

/// Type alias for command handler functions.
///
/// The returned text is printed to the scrollback (and becomes the value of the
/// sub-expression when the command is called inside parentheses).
pub type CommandHandler = Box<dyn Fn(&CommandArgs) -> Result<String, ConsoleError> + Send + Sync>;

/// A console command with a typed signature and a handler.
///
/// # Examples
///
/// ```
/// use bevy_dropdown_console::core::{ConCmd, ValueType};
///
/// let cmd = ConCmd::new("add", [ValueType::Integer, ValueType::Integer], |args| {
///     Ok((args.int(0)? + args.int(1)?).to_string())
/// })
/// .description("Add two integers");
///
/// assert_eq!(cmd.arity(), 2);
/// ```
pub struct ConCmd {
    name: Box<str>,
    signature: Vec<ValueType>,
    description: &'static str,
    handler: CommandHandler,
}

impl ConCmd {
    /// Create a new command with the given name, signature and handler.
    ///
    /// The signature length is checked when the command is registered.
    pub fn new<F>(
        name: impl Into<Box<str>>,
        signature: impl IntoIterator<Item = ValueType>,
        handler: F,
    ) -> Self
    where
        F: Fn(&CommandArgs) -> Result<String, ConsoleError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature: signature.into_iter().collect(),
            description: "",
            handler: Box::new(handler),
        }
    }

    /// Set the description.
    pub fn description(mut self, desc: &'static str) -> Self {
        self.description = desc;
        self
    }

    /// Get the command name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter types, in order.
    #[inline]
    pub fn signature(&self) -> &[ValueType] {
        &self.signature
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.signature.len()
    }

    #[inline]
    pub fn get_description(&self) -> &'static str {
        self.description
    }

    /// Check the signature against [`MAX_ARITY`].
    pub(crate) fn validate(&self) -> Result<(), ConsoleError> {
        if self.signature.len() > MAX_ARITY {
            return Err(ConsoleError::SignatureTooLong {
                name: self.name.to_string(),
                len: self.signature.len(),
            });
        }
        Ok(())
    }

    /// Usage string, e.g. `spawn <int> <text>`.
    pub fn usage(&self) -> String {
        self.signature
            .iter()
            .fold(self.name.to_string(), |mut usage, ty| {
                usage.push_str(" <");
                usage.push_str(ty.name());
                usage.push('>');
                usage
            })
    }

    /// Invoke the handler. The caller is responsible for having validated
    /// `values` against the signature.
    pub fn invoke(&self, values: &[Value]) -> Result<String, ConsoleError> {
        (self.handler)(&CommandArgs::new(&self.name, values))
    }
}

impl std::fmt::Debug for ConCmd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConCmd")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
