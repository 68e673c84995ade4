//! Element-block registry (§4.1): per-type dense storage dispatched by a
//! small integer tag, plus the user-tag side-table described in Design
//! Notes §9 ("variant (a) ... user-extensible tags grafted via a side-table
//! of trait objects keyed by the user portion of the tag range").

use std::any::Any;
use std::fmt;

use crate::error::{MtvError, MtvResult};
use crate::tag::{ElementTag, TypedElement};

/// Per-type dense storage for one run of same-tagged positions. `Empty`
/// blocks carry no storage at all and are represented by `BlockRecord::data
/// == None` in `lib.rs`, so this enum only ever holds non-empty tags.
pub enum ElementBlock {
    Bool(Vec<bool>),
    Int8(Vec<i8>),
    Uint8(Vec<u8>),
    Int16(Vec<i16>),
    Uint16(Vec<u16>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    Int64(Vec<i64>),
    Uint64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    String(Vec<String>),
    /// A caller-registered element type. Values are type-erased; the tag's
    /// registered [`UserTagOps`] (held in a [`BlockConfig`]) supplies the
    /// default/clone/release/equal hooks a concrete `Vec<T>` would provide
    /// for built-ins.
    User(u32, Vec<Box<dyn Any>>),
}

impl fmt::Debug for ElementBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementBlock({}, len={})", self.tag(), self.len())
    }
}

/// Hooks a caller supplies for a user-registered tag. Mirrors the "managed
/// pointer block" behavior of §4.1 and §9 without template specialization:
/// `release` is the tag-specific destruction hook, a no-op for plain value
/// types and meaningful for types that own external resources.
pub trait UserTagOps: fmt::Debug {
    fn default_value(&self) -> Box<dyn Any>;
    fn clone_value(&self, value: &dyn Any) -> Box<dyn Any>;
    fn equal_value(&self, a: &dyn Any, b: &dyn Any) -> bool;
    fn release_value(&self, value: &mut dyn Any);
}

/// The compile-time-ish tag configuration of §6: built-ins are always
/// available: this table only needs to carry the registrations for tags
/// `>= ElementTag::USER_START`.
#[derive(Default)]
pub struct BlockConfig {
    user_ops: std::collections::HashMap<u32, Box<dyn UserTagOps>>,
}

impl BlockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers hooks for a user tag. Panics if `tag < ElementTag::USER_START`,
    /// since that range is reserved for built-ins.
    pub fn register(&mut self, tag: u32, ops: Box<dyn UserTagOps>) {
        assert!(
            tag >= ElementTag::USER_START,
            "user tags must be >= ElementTag::USER_START"
        );
        self.user_ops.insert(tag, ops);
    }

    fn ops(&self, tag: u32) -> MtvResult<&dyn UserTagOps> {
        self.user_ops
            .get(&tag)
            .map(|b| b.as_ref())
            .ok_or_else(|| MtvError::general(format!("user tag {tag} is not registered")))
    }
}

/// Maps a concrete Rust type to the [`ElementBlock`] variant it lives in.
/// Implemented for every built-in tag; user tags go through [`BlockConfig`]
/// and `Box<dyn Any>` instead, since their concrete type isn't known here.
pub trait BlockElement: TypedElement + Clone + Default + PartialEq + 'static {
    fn wrap(values: Vec<Self>) -> ElementBlock;
    fn unwrap(block: &ElementBlock) -> Option<&Vec<Self>>;
    fn unwrap_mut(block: &mut ElementBlock) -> Option<&mut Vec<Self>>;
}

macro_rules! impl_block_element {
    ($ty:ty, $variant:ident) => {
        impl BlockElement for $ty {
            fn wrap(values: Vec<Self>) -> ElementBlock {
                ElementBlock::$variant(values)
            }
            fn unwrap(block: &ElementBlock) -> Option<&Vec<Self>> {
                match block {
                    ElementBlock::$variant(v) => Some(v),
                    _ => None,
                }
            }
            fn unwrap_mut(block: &mut ElementBlock) -> Option<&mut Vec<Self>> {
                match block {
                    ElementBlock::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_block_element!(bool, Bool);
impl_block_element!(i8, Int8);
impl_block_element!(u8, Uint8);
impl_block_element!(i16, Int16);
impl_block_element!(u16, Uint16);
impl_block_element!(i32, Int32);
impl_block_element!(u32, Uint32);
impl_block_element!(i64, Int64);
impl_block_element!(u64, Uint64);
impl_block_element!(f32, Float32);
impl_block_element!(f64, Float64);
impl_block_element!(String, String);

/// Applies `$body` with `$v` bound to the inner `Vec` of whichever variant
/// `$self` is, for operations that need no type bound beyond "it's a `Vec`"
/// (length, truncate, drain, splice by index). Keeps the thirteen-arm match
/// out of every such method.
macro_rules! for_each_vec {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            ElementBlock::Bool($v) => $body,
            ElementBlock::Int8($v) => $body,
            ElementBlock::Uint8($v) => $body,
            ElementBlock::Int16($v) => $body,
            ElementBlock::Uint16($v) => $body,
            ElementBlock::Int32($v) => $body,
            ElementBlock::Uint32($v) => $body,
            ElementBlock::Int64($v) => $body,
            ElementBlock::Uint64($v) => $body,
            ElementBlock::Float32($v) => $body,
            ElementBlock::Float64($v) => $body,
            ElementBlock::String($v) => $body,
            ElementBlock::User(_, $v) => $body,
        }
    };
}

impl ElementBlock {
    pub fn from_values<T: BlockElement>(values: Vec<T>) -> Self {
        T::wrap(values)
    }

    pub fn tag(&self) -> ElementTag {
        match self {
            ElementBlock::Bool(_) => ElementTag::Bool,
            ElementBlock::Int8(_) => ElementTag::Int8,
            ElementBlock::Uint8(_) => ElementTag::Uint8,
            ElementBlock::Int16(_) => ElementTag::Int16,
            ElementBlock::Uint16(_) => ElementTag::Uint16,
            ElementBlock::Int32(_) => ElementTag::Int32,
            ElementBlock::Uint32(_) => ElementTag::Uint32,
            ElementBlock::Int64(_) => ElementTag::Int64,
            ElementBlock::Uint64(_) => ElementTag::Uint64,
            ElementBlock::Float32(_) => ElementTag::Float32,
            ElementBlock::Float64(_) => ElementTag::Float64,
            ElementBlock::String(_) => ElementTag::String,
            ElementBlock::User(t, _) => ElementTag::User(*t),
        }
    }

    pub fn len(&self) -> usize {
        for_each_vec!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Typed accessor. Fails with `TypeError` if `T`'s tag doesn't match this
    /// block's tag, `OutOfRange` if `pos` is beyond the block.
    pub fn get_value<T: BlockElement>(&self, pos: usize) -> MtvResult<&T> {
        let values = T::unwrap(self).ok_or_else(|| {
            MtvError::type_error(format!(
                "block holds {} but {} was requested",
                self.tag(),
                T::element_tag()
            ))
        })?;
        values
            .get(pos)
            .ok_or_else(|| MtvError::out_of_range(format!("position {pos} in block of len {}", values.len())))
    }

    pub fn set_value<T: BlockElement>(&mut self, pos: usize, value: T) -> MtvResult<()> {
        let tag = self.tag();
        let values = T::unwrap_mut(self).ok_or_else(|| {
            MtvError::type_error(format!(
                "block holds {tag} but {} was assigned",
                T::element_tag()
            ))
        })?;
        let slot = values
            .get_mut(pos)
            .ok_or_else(|| MtvError::out_of_range(format!("position {pos} in block of len {}", values.len())))?;
        *slot = value;
        Ok(())
    }

    pub fn set_values<T: BlockElement>(&mut self, pos: usize, new_values: &[T]) -> MtvResult<()> {
        let tag = self.tag();
        let values = T::unwrap_mut(self).ok_or_else(|| {
            MtvError::type_error(format!("block holds {tag} but {} was assigned", T::element_tag()))
        })?;
        if pos + new_values.len() > values.len() {
            return Err(MtvError::out_of_range(format!(
                "range [{pos}, {}) exceeds block length {}",
                pos + new_values.len(),
                values.len()
            )));
        }
        values[pos..pos + new_values.len()].clone_from_slice(new_values);
        Ok(())
    }

    pub fn append_value<T: BlockElement>(&mut self, value: T) -> MtvResult<()> {
        let tag = self.tag();
        let values = T::unwrap_mut(self).ok_or_else(|| {
            MtvError::type_error(format!("block holds {tag} but {} was appended", T::element_tag()))
        })?;
        values.push(value);
        Ok(())
    }

    pub fn append_values<T: BlockElement>(&mut self, new_values: &[T]) -> MtvResult<()> {
        let tag = self.tag();
        let values = T::unwrap_mut(self).ok_or_else(|| {
            MtvError::type_error(format!("block holds {tag} but {} was appended", T::element_tag()))
        })?;
        values.extend_from_slice(new_values);
        Ok(())
    }

    pub fn prepend_value<T: BlockElement>(&mut self, value: T) -> MtvResult<()> {
        let tag = self.tag();
        let values = T::unwrap_mut(self).ok_or_else(|| {
            MtvError::type_error(format!("block holds {tag} but {} was prepended", T::element_tag()))
        })?;
        values.insert(0, value);
        Ok(())
    }

    pub fn prepend_values<T: BlockElement>(&mut self, new_values: &[T]) -> MtvResult<()> {
        let tag = self.tag();
        let values = T::unwrap_mut(self).ok_or_else(|| {
            MtvError::type_error(format!("block holds {tag} but {} was prepended", T::element_tag()))
        })?;
        values.splice(0..0, new_values.iter().cloned());
        Ok(())
    }

    pub fn insert_values<T: BlockElement>(&mut self, pos: usize, new_values: &[T]) -> MtvResult<()> {
        let tag = self.tag();
        let values = T::unwrap_mut(self).ok_or_else(|| {
            MtvError::type_error(format!("block holds {tag} but {} was inserted", T::element_tag()))
        })?;
        if pos > values.len() {
            return Err(MtvError::out_of_range(format!(
                "insert position {pos} exceeds block length {}",
                values.len()
            )));
        }
        values.splice(pos..pos, new_values.iter().cloned());
        Ok(())
    }

    /// Erases a single position.
    pub fn erase(&mut self, pos: usize) -> MtvResult<()> {
        self.erase_range(pos, 1)
    }

    /// Erases `[pos, pos+len)` in place.
    pub fn erase_range(&mut self, pos: usize, len: usize) -> MtvResult<()> {
        let total = self.len();
        if len == 0 {
            return Ok(());
        }
        if pos + len > total {
            return Err(MtvError::out_of_range(format!(
                "erase range [{pos}, {}) exceeds block length {total}",
                pos + len
            )));
        }
        for_each_vec!(self, v => { v.drain(pos..pos + len); });
        Ok(())
    }

    /// Splits off the tail starting at `pos`, returning it as a new block of
    /// the same tag. Used when a mutation splits a block in two.
    pub fn split_off(&mut self, pos: usize) -> MtvResult<ElementBlock> {
        if pos > self.len() {
            return Err(MtvError::out_of_range(format!(
                "split position {pos} exceeds block length {}",
                self.len()
            )));
        }
        Ok(match self {
            ElementBlock::Bool(v) => ElementBlock::Bool(v.split_off(pos)),
            ElementBlock::Int8(v) => ElementBlock::Int8(v.split_off(pos)),
            ElementBlock::Uint8(v) => ElementBlock::Uint8(v.split_off(pos)),
            ElementBlock::Int16(v) => ElementBlock::Int16(v.split_off(pos)),
            ElementBlock::Uint16(v) => ElementBlock::Uint16(v.split_off(pos)),
            ElementBlock::Int32(v) => ElementBlock::Int32(v.split_off(pos)),
            ElementBlock::Uint32(v) => ElementBlock::Uint32(v.split_off(pos)),
            ElementBlock::Int64(v) => ElementBlock::Int64(v.split_off(pos)),
            ElementBlock::Uint64(v) => ElementBlock::Uint64(v.split_off(pos)),
            ElementBlock::Float32(v) => ElementBlock::Float32(v.split_off(pos)),
            ElementBlock::Float64(v) => ElementBlock::Float64(v.split_off(pos)),
            ElementBlock::String(v) => ElementBlock::String(v.split_off(pos)),
            ElementBlock::User(t, v) => ElementBlock::User(*t, v.split_off(pos)),
        })
    }

    /// Appends all elements of `other` onto `self`. Both must share a tag.
    pub fn append_block(&mut self, mut other: ElementBlock, config: &BlockConfig) -> MtvResult<()> {
        if self.tag() != other.tag() {
            return Err(MtvError::type_error(format!(
                "cannot append block of tag {} onto block of tag {}",
                other.tag(),
                self.tag()
            )));
        }
        match (self, &mut other) {
            (ElementBlock::Bool(a), ElementBlock::Bool(b)) => a.append(b),
            (ElementBlock::Int8(a), ElementBlock::Int8(b)) => a.append(b),
            (ElementBlock::Uint8(a), ElementBlock::Uint8(b)) => a.append(b),
            (ElementBlock::Int16(a), ElementBlock::Int16(b)) => a.append(b),
            (ElementBlock::Uint16(a), ElementBlock::Uint16(b)) => a.append(b),
            (ElementBlock::Int32(a), ElementBlock::Int32(b)) => a.append(b),
            (ElementBlock::Uint32(a), ElementBlock::Uint32(b)) => a.append(b),
            (ElementBlock::Int64(a), ElementBlock::Int64(b)) => a.append(b),
            (ElementBlock::Uint64(a), ElementBlock::Uint64(b)) => a.append(b),
            (ElementBlock::Float32(a), ElementBlock::Float32(b)) => a.append(b),
            (ElementBlock::Float64(a), ElementBlock::Float64(b)) => a.append(b),
            (ElementBlock::String(a), ElementBlock::String(b)) => a.append(b),
            (ElementBlock::User(_, a), ElementBlock::User(_, b)) => a.append(b),
            _ => unreachable!("tag equality checked above"),
        }
        let _ = config;
        Ok(())
    }

    /// Grows the block by `extra` positions, filling the new trailing slots
    /// with the type's default value (or the user tag's registered default).
    pub fn grow(&mut self, extra: usize, config: &BlockConfig) -> MtvResult<()> {
        if extra == 0 {
            return Ok(());
        }
        match self {
            ElementBlock::Bool(v) => v.resize(v.len() + extra, bool::default()),
            ElementBlock::Int8(v) => v.resize(v.len() + extra, i8::default()),
            ElementBlock::Uint8(v) => v.resize(v.len() + extra, u8::default()),
            ElementBlock::Int16(v) => v.resize(v.len() + extra, i16::default()),
            ElementBlock::Uint16(v) => v.resize(v.len() + extra, u16::default()),
            ElementBlock::Int32(v) => v.resize(v.len() + extra, i32::default()),
            ElementBlock::Uint32(v) => v.resize(v.len() + extra, u32::default()),
            ElementBlock::Int64(v) => v.resize(v.len() + extra, i64::default()),
            ElementBlock::Uint64(v) => v.resize(v.len() + extra, u64::default()),
            ElementBlock::Float32(v) => v.resize(v.len() + extra, f32::default()),
            ElementBlock::Float64(v) => v.resize(v.len() + extra, f64::default()),
            ElementBlock::String(v) => v.resize(v.len() + extra, String::default()),
            ElementBlock::User(t, v) => {
                let ops = config.ops(*t)?;
                v.reserve(extra);
                for _ in 0..extra {
                    v.push(ops.default_value());
                }
            }
        }
        Ok(())
    }

    /// Shrinks the block to `new_len`, releasing trailing slots. For user
    /// tags this invokes the registered release hook on each discarded slot.
    pub fn shrink(&mut self, new_len: usize, config: &BlockConfig) -> MtvResult<()> {
        let len = self.len();
        if new_len > len {
            return Err(MtvError::invalid_arg(format!(
                "shrink target {new_len} exceeds current length {len}"
            )));
        }
        if let ElementBlock::User(t, v) = self {
            let ops = config.ops(*t)?;
            for slot in v[new_len..].iter_mut() {
                ops.release_value(slot.as_mut());
            }
        }
        for_each_vec!(self, v => { v.truncate(new_len); });
        Ok(())
    }

    pub fn resize(&mut self, new_len: usize, config: &BlockConfig) -> MtvResult<()> {
        let len = self.len();
        if new_len > len {
            self.grow(new_len - len, config)
        } else if new_len < len {
            self.shrink(new_len, config)
        } else {
            Ok(())
        }
    }

    pub fn clone_block(&self, config: &BlockConfig) -> MtvResult<ElementBlock> {
        Ok(match self {
            ElementBlock::Bool(v) => ElementBlock::Bool(v.clone()),
            ElementBlock::Int8(v) => ElementBlock::Int8(v.clone()),
            ElementBlock::Uint8(v) => ElementBlock::Uint8(v.clone()),
            ElementBlock::Int16(v) => ElementBlock::Int16(v.clone()),
            ElementBlock::Uint16(v) => ElementBlock::Uint16(v.clone()),
            ElementBlock::Int32(v) => ElementBlock::Int32(v.clone()),
            ElementBlock::Uint32(v) => ElementBlock::Uint32(v.clone()),
            ElementBlock::Int64(v) => ElementBlock::Int64(v.clone()),
            ElementBlock::Uint64(v) => ElementBlock::Uint64(v.clone()),
            ElementBlock::Float32(v) => ElementBlock::Float32(v.clone()),
            ElementBlock::Float64(v) => ElementBlock::Float64(v.clone()),
            ElementBlock::String(v) => ElementBlock::String(v.clone()),
            ElementBlock::User(t, v) => {
                let ops = config.ops(*t)?;
                ElementBlock::User(*t, v.iter().map(|b| ops.clone_value(b.as_ref())).collect())
            }
        })
    }

    pub fn equal(&self, other: &ElementBlock, config: &BlockConfig) -> bool {
        match (self, other) {
            (ElementBlock::Bool(a), ElementBlock::Bool(b)) => a == b,
            (ElementBlock::Int8(a), ElementBlock::Int8(b)) => a == b,
            (ElementBlock::Uint8(a), ElementBlock::Uint8(b)) => a == b,
            (ElementBlock::Int16(a), ElementBlock::Int16(b)) => a == b,
            (ElementBlock::Uint16(a), ElementBlock::Uint16(b)) => a == b,
            (ElementBlock::Int32(a), ElementBlock::Int32(b)) => a == b,
            (ElementBlock::Uint32(a), ElementBlock::Uint32(b)) => a == b,
            (ElementBlock::Int64(a), ElementBlock::Int64(b)) => a == b,
            (ElementBlock::Uint64(a), ElementBlock::Uint64(b)) => a == b,
            (ElementBlock::Float32(a), ElementBlock::Float32(b)) => a == b,
            (ElementBlock::Float64(a), ElementBlock::Float64(b)) => a == b,
            (ElementBlock::String(a), ElementBlock::String(b)) => a == b,
            (ElementBlock::User(ta, a), ElementBlock::User(tb, b)) => {
                ta == tb
                    && a.len() == b.len()
                    && match config.ops(*ta) {
                        Ok(ops) => a
                            .iter()
                            .zip(b.iter())
                            .all(|(x, y)| ops.equal_value(x.as_ref(), y.as_ref())),
                        Err(_) => false,
                    }
            }
            _ => false,
        }
    }

    /// Tag-specific hook invoked before the block is dropped (used by
    /// user-managed pointer blocks to release owned resources). A no-op for
    /// built-in value types.
    pub fn release(&mut self, config: &BlockConfig) -> MtvResult<()> {
        if let ElementBlock::User(t, v) = self {
            let ops = config.ops(*t)?;
            for slot in v.iter_mut() {
                ops.release_value(slot.as_mut());
            }
        }
        Ok(())
    }
}
