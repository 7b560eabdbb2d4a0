//! Parsed values, their kinds, and typed handles into a Context's slots.

use std::fmt;
use std::marker::PhantomData;

// ============================================================================
// Value: a parsed or defaulted slot value
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Str(String),
    Int(i32),
    Double(f64),
    /// Enum entries are kept wide; the option's repr decides what fits.
    Enum(i128),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Str(_) => ValueKind::Str,
            Value::Int(_) => ValueKind::Int,
            Value::Double(_) => ValueKind::Double,
            Value::Enum(_) => ValueKind::Enum,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Str,
    Int,
    Double,
    Enum,
}

impl ValueKind {
    /// Everything but a flag consumes a value token.
    pub fn takes_value(self) -> bool {
        !matches!(self, ValueKind::Bool)
    }
}

// ============================================================================
// EnumRepr: storage type behind an enum option
// ============================================================================

/// Integer storage for an enum option.
///
/// Entry values are declared as `i128` so any primitive repr can be
/// described; `from_wide` rejects anything that does not fit `Self`.
pub trait EnumRepr: Copy + fmt::Debug + 'static {
    const BYTES: usize;
    const SIGNED: bool;

    fn from_wide(v: i128) -> Option<Self>;
    fn to_wide(self) -> i128;
}

macro_rules! impl_enum_repr {
    ($($t:ty => $signed:expr),* $(,)?) => {
        $(
            impl EnumRepr for $t {
                const BYTES: usize = std::mem::size_of::<$t>();
                const SIGNED: bool = $signed;

                fn from_wide(v: i128) -> Option<Self> {
                    <$t>::try_from(v).ok()
                }

                fn to_wide(self) -> i128 {
                    self as i128
                }
            }
        )*
    };
}

impl_enum_repr! {
    i8 => true,
    i16 => true,
    i32 => true,
    i64 => true,
    isize => true,
    u8 => false,
    u16 => false,
    u32 => false,
    u64 => false,
    usize => false,
}

/// Inclusive range representable by a repr of the given width and sign.
pub(crate) fn repr_range(bytes: usize, signed: bool) -> (i128, i128) {
    assert!(
        matches!(bytes, 1 | 2 | 4 | 8),
        "Cannot write enum value for a storage width of {} bytes",
        bytes
    );
    let bits = (bytes * 8) as u32;
    if signed {
        (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)
    } else {
        (0, (1i128 << bits) - 1)
    }
}

// ============================================================================
// FromValue: typed read-back
// ============================================================================

pub trait FromValue: Sized {
    fn from_value(v: &Value) -> Option<Self>;
}

impl FromValue for bool {
    fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::Int(n) => Some(*n),
            Value::Enum(n) => i32::try_from(*n).ok(),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

// ============================================================================
// Handles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Option(usize),
    Positional(usize),
}

/// Typed reference to a registered option or positional.
///
/// Returned by a builder's `done()`; pass it back to
/// [`Context::value`](crate::Context::value) after parsing.
pub struct Handle<T> {
    pub(crate) slot: Slot,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) fn new(slot: Slot) -> Self {
        Handle {
            slot,
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle").field("slot", &self.slot).finish()
    }
}

/// Handle to an enum option, typed by its storage repr.
pub struct EnumHandle<R: EnumRepr> {
    pub(crate) index: usize,
    _marker: PhantomData<fn() -> R>,
}

impl<R: EnumRepr> EnumHandle<R> {
    pub(crate) fn new(index: usize) -> Self {
        EnumHandle {
            index,
            _marker: PhantomData,
        }
    }
}

impl<R: EnumRepr> Clone for EnumHandle<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: EnumRepr> Copy for EnumHandle<R> {}

impl<R: EnumRepr> fmt::Debug for EnumHandle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumHandle").field("index", &self.index).finish()
    }
}
