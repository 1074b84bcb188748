//! Physical input lines and their debounced state.
//!
//! Buttons are wired to physical lines organised in groups of eight.
//! Each scheduler tick a [`PortSampler`] captures one [`RawSample`]
//! (a byte per group) and the [`debounce::DebounceFilter`] folds it into
//! the [`StableState`] bitset that report synthesis reads.
//!
//! Line `n` of the flat bitset is `group * 8 + bit`.

pub mod debounce;

use crate::config::{INPUT_GROUPS, LINES_PER_GROUP};

/// One snapshot of every input group, captured once per tick.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// One byte per group, bit `n` = line `n` of that group (1 = active).
    pub groups: [u8; INPUT_GROUPS],
}

impl RawSample {
    /// A sample with every line inactive.
    pub const fn idle() -> Self {
        Self {
            groups: [0; INPUT_GROUPS],
        }
    }

    /// A sample with exactly the given lines active.
    pub fn with_lines(lines: &[PhysicalLine]) -> Self {
        let mut sample = Self::idle();
        for line in lines {
            sample.set(*line, true);
        }
        sample
    }

    /// Set or clear a single line.
    pub fn set(&mut self, line: PhysicalLine, active: bool) {
        let mask = 1u8 << line.bit();
        let group = &mut self.groups[line.group() as usize];
        if active {
            *group |= mask;
        } else {
            *group &= !mask;
        }
    }

    /// Read a single line.
    pub fn line(&self, line: PhysicalLine) -> bool {
        self.groups[line.group() as usize] & (1 << line.bit()) != 0
    }
}

/// Address of one physical input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhysicalLine {
    group: u8,
    bit: u8,
}

impl PhysicalLine {
    /// Build a line address. Panics (at compile time in const context)
    /// when the group or bit is out of range.
    pub const fn new(group: u8, bit: u8) -> Self {
        assert!((group as usize) < INPUT_GROUPS, "input group out of range");
        assert!((bit as usize) < LINES_PER_GROUP, "line bit out of range");
        Self { group, bit }
    }

    pub const fn group(&self) -> u8 {
        self.group
    }

    pub const fn bit(&self) -> u8 {
        self.bit
    }

    /// Position in the flat [`StableState`] bitset.
    pub const fn index(&self) -> u32 {
        self.group as u32 * LINES_PER_GROUP as u32 + self.bit as u32
    }

    const fn same_as(&self, other: &Self) -> bool {
        self.group == other.group && self.bit == other.bit
    }
}

/// Debounced reading of every physical line.
///
/// Written only by the debounce filter. A set bit means the line has been
/// active for the full debounce window.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StableState(u32);

impl StableState {
    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Debounced value of one line.
    pub const fn is_active(&self, line: PhysicalLine) -> bool {
        self.0 & (1 << line.index()) != 0
    }

    /// `true` while any line is debounced-active.
    pub const fn any(&self) -> bool {
        self.0 != 0
    }

    /// Debounced byte of one group. Panics when `group` is out of range.
    #[cfg(test)]
    pub(crate) const fn group(&self, group: u8) -> u8 {
        assert!((group as usize) < INPUT_GROUPS, "input group out of range");
        (self.0 >> (group as usize * LINES_PER_GROUP)) as u8
    }

    pub(crate) fn set_line(&mut self, index: u32, active: bool) {
        if active {
            self.0 |= 1 << index;
        } else {
            self.0 &= !(1 << index);
        }
    }
}

/// Named logical inputs of the pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogicalInput {
    Plus,
    Minus,
    Left,
    L,
    Zr,
    A,
}

impl LogicalInput {
    pub const ALL: [LogicalInput; 6] = [
        LogicalInput::Plus,
        LogicalInput::Minus,
        LogicalInput::Left,
        LogicalInput::L,
        LogicalInput::Zr,
        LogicalInput::A,
    ];
}

/// Binding of each logical input to the physical line it is wired to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineMap {
    pub plus: PhysicalLine,
    pub minus: PhysicalLine,
    pub left: PhysicalLine,
    pub l: PhysicalLine,
    pub zr: PhysicalLine,
    pub a: PhysicalLine,
}

impl LineMap {
    /// Physical line bound to `input`.
    pub const fn line(&self, input: LogicalInput) -> PhysicalLine {
        match input {
            LogicalInput::Plus => self.plus,
            LogicalInput::Minus => self.minus,
            LogicalInput::Left => self.left,
            LogicalInput::L => self.l,
            LogicalInput::Zr => self.zr,
            LogicalInput::A => self.a,
        }
    }

    /// First pair of logical inputs that share a physical line, if any.
    pub const fn find_alias(&self) -> Option<(LogicalInput, LogicalInput)> {
        let all = LogicalInput::ALL;
        let mut i = 0;
        while i < all.len() {
            let mut j = i + 1;
            while j < all.len() {
                if self.line(all[i]).same_as(&self.line(all[j])) {
                    return Some((all[i], all[j]));
                }
                j += 1;
            }
            i += 1;
        }
        None
    }

    /// Debounced value of a logical input.
    pub const fn is_pressed(&self, state: &StableState, input: LogicalInput) -> bool {
        state.is_active(self.line(input))
    }
}

/// Source of one raw snapshot per tick.
///
/// Reading hardware lines cannot fail, so neither can sampling.
pub trait PortSampler {
    fn sample(&mut self) -> RawSample;
}
