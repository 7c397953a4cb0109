//! Boolean row selectors

use std::ops::{BitAnd, BitOr, Not};

/// One flag per row; `true` keeps the row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mask {
    flags: Vec<bool>,
}

impl Mask {
    pub fn new(flags: Vec<bool>) -> Self {
        Self { flags }
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Number of selected rows
    pub fn count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.flags.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.flags.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }

    fn zip_with(self, other: Mask, f: impl Fn(bool, bool) -> bool) -> Mask {
        // Shorter operand wins; a later filter() reports the shape mismatch.
        let flags = self
            .flags
            .into_iter()
            .zip(other.flags)
            .map(|(a, b)| f(a, b))
            .collect();
        Mask { flags }
    }
}

impl From<Vec<bool>> for Mask {
    fn from(flags: Vec<bool>) -> Self {
        Mask::new(flags)
    }
}

impl FromIterator<bool> for Mask {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Mask::new(iter.into_iter().collect())
    }
}

impl BitAnd for Mask {
    type Output = Mask;

    fn bitand(self, rhs: Mask) -> Mask {
        self.zip_with(rhs, |a, b| a && b)
    }
}

impl BitOr for Mask {
    type Output = Mask;

    fn bitor(self, rhs: Mask) -> Mask {
        self.zip_with(rhs, |a, b| a || b)
    }
}

impl Not for Mask {
    type Output = Mask;

    fn not(self) -> Mask {
        self.flags.into_iter().map(|f| !f).collect()
    }
}
