//! Element type tags: the small integer identifiers the block list and the
//! element-block registry dispatch on.

use core::fmt;

/// Identifies the element type stored in a block, or the absence of storage
/// (`Empty`). Built-in tags are fixed; callers may register additional tags
/// at or above [`ElementTag::USER_START`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementTag {
    Empty,
    Bool,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float32,
    Float64,
    String,
    /// A caller-registered tag. The payload must be `>= USER_START`.
    User(u32),
}

impl ElementTag {
    /// Smallest value a [`ElementTag::User`] tag may carry.
    pub const USER_START: u32 = 64;

    /// True for `ElementTag::User(_)`.
    pub fn is_user(&self) -> bool {
        matches!(self, ElementTag::User(_))
    }

    /// True for `ElementTag::Empty`.
    pub fn is_empty(&self) -> bool {
        matches!(self, ElementTag::Empty)
    }
}

impl fmt::Display for ElementTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementTag::Empty => write!(f, "empty"),
            ElementTag::Bool => write!(f, "bool"),
            ElementTag::Int8 => write!(f, "i8"),
            ElementTag::Uint8 => write!(f, "u8"),
            ElementTag::Int16 => write!(f, "i16"),
            ElementTag::Uint16 => write!(f, "u16"),
            ElementTag::Int32 => write!(f, "i32"),
            ElementTag::Uint32 => write!(f, "u32"),
            ElementTag::Int64 => write!(f, "i64"),
            ElementTag::Uint64 => write!(f, "u64"),
            ElementTag::Float32 => write!(f, "f32"),
            ElementTag::Float64 => write!(f, "f64"),
            ElementTag::String => write!(f, "string"),
            ElementTag::User(t) => write!(f, "user({t})"),
        }
    }
}

/// Maps a statically-typed value to its tag, so the container can decide
/// block compatibility on writes without runtime registration.
pub trait TypedElement {
    fn element_tag() -> ElementTag;
}

macro_rules! impl_typed_element {
    ($ty:ty, $tag:ident) => {
        impl TypedElement for $ty {
            fn element_tag() -> ElementTag {
                ElementTag::$tag
            }
        }
    };
}

impl_typed_element!(bool, Bool);
impl_typed_element!(i8, Int8);
impl_typed_element!(u8, Uint8);
impl_typed_element!(i16, Int16);
impl_typed_element!(u16, Uint16);
impl_typed_element!(i32, Int32);
impl_typed_element!(u32, Uint32);
impl_typed_element!(i64, Int64);
impl_typed_element!(u64, Uint64);
impl_typed_element!(f32, Float32);
impl_typed_element!(f64, Float64);
impl_typed_element!(std::string::String, String);
