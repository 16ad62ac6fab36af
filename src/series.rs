/// Generator of stepped numbers series.
use crate::field::FieldValue;

/// Generator (iterator) state: `start, start + step, ...` up to `end` inclusively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct SeriesWithStep {
    next: Option<FieldValue>,
    end: FieldValue,
    step: FieldValue,
}

impl SeriesWithStep {
    /// Returns `None` if `step` is zero since such a series never advances.
    ///
    /// Empty series is produced if `start` is greater than `end`.
    #[inline]
    pub(crate) fn new(start: FieldValue, end: FieldValue, step: FieldValue) -> Option<Self> {
        if step == 0 {
            return None;
        }

        Some(Self {
            next: (start <= end).then_some(start),
            end,
            step,
        })
    }
}

impl Iterator for SeriesWithStep {
    type Item = FieldValue;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.checked_add(self.step).filter(|next| *next <= self.end);
        Some(current)
    }
}
