use crate::engine::EmptyDomain;
use crate::engine::TrailedInteger;
use crate::engine::TrailedValues;

/// An integer variable represented by its bounds; only used for objectives.
#[derive(Debug, Clone)]
pub(crate) struct IntegerDomain {
    lower_bound: TrailedInteger,
    upper_bound: TrailedInteger,
}

impl IntegerDomain {
    pub(crate) fn new(
        lower_bound: i64,
        upper_bound: i64,
        trailed_values: &mut TrailedValues,
    ) -> IntegerDomain {
        IntegerDomain {
            lower_bound: trailed_values.grow(lower_bound),
            upper_bound: trailed_values.grow(upper_bound),
        }
    }

    pub(crate) fn lower_bound(&self, trailed_values: &TrailedValues) -> i64 {
        trailed_values.read(self.lower_bound)
    }

    pub(crate) fn upper_bound(&self, trailed_values: &TrailedValues) -> i64 {
        trailed_values.read(self.upper_bound)
    }

    /// Returns whether the bound changed.
    pub(crate) fn tighten_lower_bound(
        &self,
        value: i64,
        trailed_values: &mut TrailedValues,
    ) -> Result<bool, EmptyDomain> {
        if value <= self.lower_bound(trailed_values) {
            return Ok(false);
        }
        if value > self.upper_bound(trailed_values) {
            return Err(EmptyDomain);
        }
        trailed_values.assign(self.lower_bound, value);
        Ok(true)
    }

    /// Returns whether the bound changed.
    pub(crate) fn tighten_upper_bound(
        &self,
        value: i64,
        trailed_values: &mut TrailedValues,
    ) -> Result<bool, EmptyDomain> {
        if value >= self.upper_bound(trailed_values) {
            return Ok(false);
        }
        if value < self.lower_bound(trailed_values) {
            return Err(EmptyDomain);
        }
        trailed_values.assign(self.upper_bound, value);
        Ok(true)
    }
}
