use crate::jvm::FieldType;
use crate::util::Width;

/// Number of operand stack words a value occupies
///
/// Only `long` and `double` are [`StackSize::Double`]; `void` (the absent
/// return type) is [`StackSize::Zero`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum StackSize {
    Zero,
    Single,
    Double,
}

impl StackSize {
    /// Stack size of a value of the given field type
    pub fn of<C>(field_type: &FieldType<C>) -> StackSize {
        match field_type.width() {
            2 => StackSize::Double,
            _ => StackSize::Single,
        }
    }

    /// Stack size of a method return value, where `None` is `void`
    pub fn of_return<C>(return_type: &Option<FieldType<C>>) -> StackSize {
        match return_type {
            None => StackSize::Zero,
            Some(field_type) => StackSize::of(field_type),
        }
    }

    /// Number of words
    pub const fn word_count(self) -> u32 {
        match self {
            StackSize::Zero => 0,
            StackSize::Single => 1,
            StackSize::Double => 2,
        }
    }

    /// Size of an operation that pushes this many words and never shrinks the
    /// stack below its starting height
    pub const fn to_increasing_size(self) -> Size {
        Size {
            size_impact: self.word_count() as i32,
            maximal_size: self.word_count(),
        }
    }

    /// Size of an operation that only ever consumes this many words
    pub const fn to_decreasing_size(self) -> Size {
        Size {
            size_impact: -(self.word_count() as i32),
            maximal_size: 0,
        }
    }
}

/// Effect of an instruction sequence on the operand stack
///
/// `size_impact` is the net change in stack height after the sequence runs
/// (possibly negative); `maximal_size` is the peak growth over the starting
/// height reached at any point while it runs (never negative).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Size {
    pub size_impact: i32,
    pub maximal_size: u32,
}

impl Size {
    /// Size of a sequence that emits nothing or leaves the stack untouched
    pub const ZERO: Size = Size {
        size_impact: 0,
        maximal_size: 0,
    };

    pub const fn new(size_impact: i32, maximal_size: u32) -> Size {
        Size {
            size_impact,
            maximal_size,
        }
    }

    /// Size of this sequence followed by another
    ///
    /// This is the only correct way to fold sizes of chained manipulations:
    /// the peak of the combined sequence is either the first peak, or the
    /// second peak shifted by the first sequence's net impact.
    pub fn merge(self, other: Size) -> Size {
        let shifted_peak = self.size_impact + other.maximal_size as i32;
        Size {
            size_impact: self.size_impact + other.size_impact,
            maximal_size: self.maximal_size.max(shifted_peak.max(0) as u32),
        }
    }
}
