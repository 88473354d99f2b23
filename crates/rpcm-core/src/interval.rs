use std::fmt;

const OPEN_MIN: u32 = 1 << 0;
const OPEN_MAX: u32 = 1 << 1;
const INTEGER: u32 = 1 << 2;
const EMPTY: u32 = 1 << 3;

/// Allowed range of an interval parameter.
///
/// The driver may return open (exclusive) bounds; [`Interval::bounds`]
/// folds them to the nearest closed value, and nothing else reads the raw
/// fields. The `integer` flag asks the driver to keep the range on whole
/// units during refinement.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Interval {
    min: u32,
    max: u32,
    flags: u32,
}

impl Interval {
    pub const fn new() -> Interval {
        Interval {
            min: 0,
            max: 0,
            flags: 0,
        }
    }

    /// An interval as the driver would report it, with explicit bound
    /// openness. Application narrowing goes through [`Interval::set_range`]
    /// instead, which always produces closed bounds.
    pub fn with_bounds(min: u32, max: u32, open_min: bool, open_max: bool) -> Interval {
        let mut flags = INTEGER;
        if open_min {
            flags |= OPEN_MIN;
        }
        if open_max {
            flags |= OPEN_MAX;
        }
        Interval { min, max, flags }
    }

    /// Allows the full unsigned range.
    pub fn fill(&mut self) {
        *self = Interval {
            min: 0,
            max: u32::MAX,
            // integer keeps the bounds closed through refinement
            flags: INTEGER,
        };
    }

    /// Replaces the range with `[min, max]`, closing both ends. Unlike the
    /// mask's accumulate-after-collapse rule this is a plain overwrite:
    /// the range is the application's current request, not a set being
    /// built up.
    pub fn set_range(&mut self, min: u32, max: u32) {
        self.flags = INTEGER;
        self.min = min;
        self.max = max;
    }

    /// Collapses the range to a single value.
    pub fn set(&mut self, value: u32) {
        self.set_range(value, value);
    }

    /// Effective closed bounds, with open ends folded inward by one.
    pub fn bounds(&self) -> (u32, u32) {
        let min = if self.flags & OPEN_MIN != 0 {
            self.min.saturating_add(1)
        } else {
            self.min
        };
        let max = if self.flags & OPEN_MAX != 0 {
            self.max.saturating_sub(1)
        } else {
            self.max
        };
        (min, max)
    }

    /// The effective minimum; once a commit has collapsed the range this
    /// is the negotiated value.
    pub fn value(&self) -> u32 {
        self.bounds().0
    }

    /// Whether the driver flagged the range as empty. Never set locally:
    /// an infeasible request only surfaces as a driver rejection.
    pub fn is_empty(&self) -> bool {
        self.flags & EMPTY != 0
    }

    pub fn is_integer(&self) -> bool {
        self.flags & INTEGER != 0
    }
}

impl Default for Interval {
    fn default() -> Interval {
        Interval::new()
    }
}

impl fmt::Debug for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (min, max) = self.bounds();
        write!(f, "[{min}, {max}]")
    }
}
