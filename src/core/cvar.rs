//! Console variable (CVar) bindings.
//!
//! A CVar does not own its value. It is a typed read/write accessor onto a
//! primitive owned by some other object, which must unbind it before that
//! object goes away.

use std::fmt::{self, Display};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use super::{ConsoleError, ConsoleValue, Value, ValueType};

/// Flags controlling CVar behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CVarFlags(u32);

impl CVarFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);

    /// Cannot be modified from the console.
    pub const READ_ONLY: Self = Self(1 << 0);

    /// Hidden from listings and completion.
    pub const HIDDEN: Self = Self(1 << 1);

    /// Check if a flag is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Combine two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check if no flags are set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for CVarFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

type ReadFn = Box<dyn Fn() -> Option<Value> + Send + Sync>;
type WriteFn = Box<dyn Fn(&Value) -> Result<(), WriteFailure> + Send + Sync>;

/// Why a write accessor refused a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteFailure {
    /// The value does not fit the bound primitive.
    OutOfRange,
    /// The bound memory is gone.
    Expired,
}

/// A console variable binding.
///
/// # Examples
///
/// ```
/// use std::sync::{Arc, RwLock};
/// use bevy_dropdown_console::core::{CVar, Value};
///
/// let gravity = Arc::new(RwLock::new(800.0f32));
/// let cvar = CVar::bind("sv_gravity", &gravity).description("World gravity");
///
/// cvar.write(&Value::Float(9.8)).unwrap();
/// assert_eq!(*gravity.read().unwrap(), 9.8);
///
/// drop(gravity);
/// assert!(cvar.read().is_err());
/// ```
pub struct CVar {
    name: Box<str>,
    ty: ValueType,
    description: &'static str,
    flags: CVarFlags,
    read: ReadFn,
    write: WriteFn,
}

impl CVar {
    /// Bind to a primitive shared through an `Arc<RwLock<T>>`.
    ///
    /// Only a weak reference is kept; once the owner drops the value, reads and
    /// writes fail with [`ConsoleError::BindingExpired`].
    pub fn bind<T: ConsoleValue>(name: impl Into<Box<str>>, target: &Arc<RwLock<T>>) -> Self {
        let weak_read: Weak<RwLock<T>> = Arc::downgrade(target);
        let weak_write = weak_read.clone();

        Self::from_parts(
            name.into(),
            T::TYPE,
            Box::new(move || {
                let target = weak_read.upgrade()?;
                // Poisoning leaves the value intact
                let value = target.read().unwrap_or_else(PoisonError::into_inner).clone();
                Some(value.into_value())
            }),
            Box::new(move |value| {
                let target = weak_write.upgrade().ok_or(WriteFailure::Expired)?;
                let typed = T::from_value(value).ok_or(WriteFailure::OutOfRange)?;
                let mut guard = target.write().unwrap_or_else(PoisonError::into_inner);
                *guard = typed;
                Ok(())
            }),
        )
    }

    /// Bind through arbitrary accessor closures.
    ///
    /// Useful when the primitive lives somewhere the console cannot hold a
    /// reference to, e.g. behind a channel or an atomic.
    pub fn from_accessors<T, R, W>(name: impl Into<Box<str>>, read: R, write: W) -> Self
    where
        T: ConsoleValue,
        R: Fn() -> T + Send + Sync + 'static,
        W: Fn(T) + Send + Sync + 'static,
    {
        Self::from_parts(
            name.into(),
            T::TYPE,
            Box::new(move || Some(read().into_value())),
            Box::new(move |value| {
                let typed = T::from_value(value).ok_or(WriteFailure::OutOfRange)?;
                write(typed);
                Ok(())
            }),
        )
    }

    fn from_parts(name: Box<str>, ty: ValueType, read: ReadFn, write: WriteFn) -> Self {
        Self {
            name,
            ty,
            description: "",
            flags: CVarFlags::NONE,
            read,
            write,
        }
    }

    /// Set the description.
    pub fn description(mut self, desc: &'static str) -> Self {
        self.description = desc;
        self
    }

    /// Set the flags.
    pub fn flags(mut self, flags: CVarFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Get the name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the declared type.
    #[inline]
    pub fn value_type(&self) -> ValueType {
        self.ty
    }

    #[inline]
    pub fn get_description(&self) -> &'static str {
        self.description
    }

    #[inline]
    pub fn get_flags(&self) -> CVarFlags {
        self.flags
    }

    /// Read the current value of the bound primitive.
    pub fn read(&self) -> Result<Value, ConsoleError> {
        (self.read)().ok_or_else(|| ConsoleError::BindingExpired(self.name.to_string()))
    }

    /// Write a value of the declared type to the bound primitive.
    pub fn write(&self, value: &Value) -> Result<(), ConsoleError> {
        if self.flags.contains(CVarFlags::READ_ONLY) {
            return Err(ConsoleError::ReadOnly(self.name.to_string()));
        }
        (self.write)(value).map_err(|failure| match failure {
            WriteFailure::Expired => ConsoleError::BindingExpired(self.name.to_string()),
            WriteFailure::OutOfRange => ConsoleError::TypeError {
                expected: self.ty,
                found: value.to_string(),
            },
        })
    }
}

impl Display for CVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.read() {
            Ok(value) => write!(f, "{} ({}) = {}", self.name, self.ty, value)?,
            Err(_) => write!(f, "{} ({}) = <expired>", self.name, self.ty)?,
        }
        if !self.description.is_empty() {
            write!(f, " - {}", self.description)?;
        }
        Ok(())
    }
}

impl fmt::Debug for CVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CVar")
            .field("name", &self.name)
            .field("type", &self.ty)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[test]
    fn test_cvar_bind_read_write() {
        let fov = Arc::new(RwLock::new(90i32));
        let cvar = CVar::bind("cl_fov", &fov);

        assert_eq!(cvar.value_type(), ValueType::Integer);
        assert_eq!(cvar.read(), Ok(Value::Integer(90)));

        cvar.write(&Value::Integer(110)).unwrap();
        assert_eq!(*fov.read().unwrap(), 110);
    }

    #[test]
    fn test_cvar_out_of_range() {
        let fov = Arc::new(RwLock::new(90i32));
        let cvar = CVar::bind("cl_fov", &fov);

        let err = cvar.write(&Value::Integer(i64::MAX)).unwrap_err();
        assert!(matches!(err, ConsoleError::TypeError { .. }));
        assert_eq!(*fov.read().unwrap(), 90);
    }

    #[test]
    fn test_cvar_expired() {
        let value = Arc::new(RwLock::new(String::from("hello")));
        let cvar = CVar::bind("name", &value);
        drop(value);

        assert_eq!(cvar.read(), Err(ConsoleError::BindingExpired("name".into())));
        assert_eq!(
            cvar.write(&Value::Text("x".into())),
            Err(ConsoleError::BindingExpired("name".into()))
        );
    }

    #[test]
    fn test_cvar_poisoned_lock_still_usable() {
        let value = Arc::new(RwLock::new(5i32));
        let poison = value.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poison.write().unwrap();
            panic!("host panicked while holding the lock");
        })
        .join();
        assert!(value.is_poisoned());

        let cvar = CVar::bind("sv_lives", &value);
        assert_eq!(cvar.read(), Ok(Value::Integer(5)));
        cvar.write(&Value::Integer(7)).unwrap();
        assert_eq!(cvar.read(), Ok(Value::Integer(7)));
    }

    #[test]
    fn test_cvar_readonly() {
        let value = Arc::new(RwLock::new(1.5f64));
        let cvar = CVar::bind("version", &value).flags(CVarFlags::READ_ONLY);

        assert_eq!(cvar.write(&Value::Float(2.0)), Err(ConsoleError::ReadOnly("version".into())));
        assert_eq!(cvar.read(), Ok(Value::Float(1.5)));
    }

    #[test]
    fn test_cvar_accessors() {
        let ticks = Arc::new(AtomicI64::new(3));
        let (r, w) = (ticks.clone(), ticks.clone());
        let cvar = CVar::from_accessors(
            "ticks",
            move || r.load(Ordering::Relaxed),
            move |v: i64| w.store(v, Ordering::Relaxed),
        );

        cvar.write(&Value::Integer(7)).unwrap();
        assert_eq!(ticks.load(Ordering::Relaxed), 7);
        assert_eq!(cvar.to_string(), "ticks (int) = 7");
    }

    #[test]
    fn test_cvar_flags() {
        let flags = CVarFlags::READ_ONLY | CVarFlags::HIDDEN;
        assert!(flags.contains(CVarFlags::READ_ONLY));
        assert!(flags.contains(CVarFlags::HIDDEN));
        assert!(!CVarFlags::NONE.contains(CVarFlags::HIDDEN));
        assert!(CVarFlags::NONE.is_empty());
    }
}
