use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use wavefill_core::mask::PatternMask;

/// A pattern weight that cannot be sampled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BadWeight {
    pub bit: u32,
    pub weight: f64,
}

/// Pick one set bit of `mask`, weighted by `weight(bit)` and normalized over
/// the set bits only. A mask with a single bit returns it without drawing.
///
/// Weights are divided by the largest set weight before sampling, so sets of
/// huge weights whose sum overflows still draw in proportion.
pub(crate) fn choose_weighted<M, R>(
    mask: M,
    weight: impl Fn(u32) -> f64,
    rng: &mut R,
) -> Result<Option<u32>, BadWeight>
where
    M: PatternMask,
    R: Rng + ?Sized,
{
    let Some(last) = mask.iter_bits().last() else {
        return Ok(None);
    };
    if mask.is_collapsed() {
        return Ok(Some(last));
    }

    if let Some(bit) = mask.iter_bits().find(|&b| {
        let w = weight(b);
        !w.is_finite() || w <= 0.0
    }) {
        return Err(BadWeight {
            bit,
            weight: weight(bit),
        });
    }

    let max = mask.iter_bits().map(&weight).fold(0.0, f64::max);
    let dist = WeightedIndex::new(mask.iter_bits().map(|b| weight(b) / max))
        .map_err(|_| BadWeight {
            bit: last,
            weight: max,
        })?;
    Ok(mask.iter_bits().nth(dist.sample(rng)))
}
