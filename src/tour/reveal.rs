use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::ir::Step;

/// Function icons revealed so far across a step range.
///
/// Moving forward adds the icons highlighted by every step passed; moving backward rebuilds
/// from the start of the range; the overview clears everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealAccumulator {
    range: Option<RangeInclusive<usize>>,
    revealed: BTreeSet<String>,
    last: usize,
}

impl RevealAccumulator {
    pub fn new(range: Option<(usize, usize)>) -> Self {
        Self {
            range: range.map(|(start, end)| start.min(end)..=start.max(end)),
            revealed: BTreeSet::new(),
            last: 0,
        }
    }

    pub fn revealed(&self) -> &BTreeSet<String> {
        &self.revealed
    }

    pub fn in_range(&self, index: usize) -> bool {
        self.range.as_ref().is_some_and(|range| range.contains(&index))
    }

    pub fn reset(&mut self) {
        self.revealed.clear();
        self.last = 0;
    }

    pub fn advance(&mut self, steps: &[Step], index: usize) {
        if index == 0 {
            self.reset();
            return;
        }
        if index < self.last {
            self.reset();
        }
        for idx in (self.last + 1)..=index {
            if !self.in_range(idx) {
                continue;
            }
            if let Some(step) = steps.get(idx) {
                self.revealed
                    .extend(step.highlighted_function_icons.iter().cloned());
            }
        }
        self.last = index;
    }
}
