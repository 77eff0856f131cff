//! Breakpoint indicator returned by a segmentation run.

use std::ops::RangeInclusive;

/// 0/1 indicator over bins; the last bin is always 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BreakpointSet {
    flags: Vec<u8>,
}

impl BreakpointSet {
    /// Indicator of length `n` with 1 at every position in `ends` and at `n - 1`.
    pub fn from_positions(n: usize, ends: impl IntoIterator<Item = usize>) -> Self {
        let mut flags = vec![0u8; n];
        for end in ends {
            if end < n {
                flags[end] = 1;
            }
        }
        if let Some(last) = flags.last_mut() {
            *last = 1;
        }
        Self { flags }
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// True for a zero-bin set.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// The raw 0/1 vector.
    pub fn as_slice(&self) -> &[u8] {
        &self.flags
    }

    /// Consume into the raw 0/1 vector.
    pub fn into_vec(self) -> Vec<u8> {
        self.flags
    }

    /// Interior breakpoints, i.e. segment ends before the last bin.
    pub fn positions(&self) -> Vec<usize> {
        let interior = self.flags.len().saturating_sub(1);
        self.flags[..interior]
            .iter()
            .enumerate()
            .filter_map(|(idx, &flag)| (flag == 1).then_some(idx))
            .collect()
    }

    /// Domains as inclusive bin ranges, in order.
    pub fn domains(&self) -> Vec<RangeInclusive<usize>> {
        let mut domains = Vec::new();
        let mut start = 0;
        for (idx, &flag) in self.flags.iter().enumerate() {
            if flag == 1 {
                domains.push(start..=idx);
                start = idx + 1;
            }
        }
        domains
    }
}
