use crate::domain::model::{Category, Distribution};

/// Ratios below this are treated as 0 when weighting the redistribution.
pub const ZERO_THRESHOLD: f64 = 0.01;

/// Slack allowed when deciding whether a category fits in the remainder.
pub const SATURATION_TOLERANCE: f64 = 1e-9;

/// Set `changed` to `new_value` and rebalance the other categories so the
/// distribution sums to 1 again.
///
/// `categories` is the full ordered category list. When the changed ratio
/// grows, the other categories are walked in order and each one whose old
/// ratio still fits in the remainder keeps its value ("saturates"). The rest
/// share the remainder in proportion to their old ratios, with ratios below
/// [`ZERO_THRESHOLD`] counted as 0 and an equal split when every weight is 0.
///
/// `new_value` must lie in `[0, 1]`; clamping is the caller's job.
pub fn rebalance(
    categories: &[Category],
    old: &Distribution,
    changed: &Category,
    new_value: f64,
) -> Distribution {
    let mut next = old.clone();
    next.set(changed.clone(), new_value);

    let others: Vec<&Category> = categories.iter().filter(|c| *c != changed).collect();
    let mut remainder = 1.0 - new_value;

    let mut first_rescaled = 0;
    if new_value > old.get(changed) {
        let (saturated, left) = saturate(old, &others, remainder);
        // only possible when the input had drifted below 1
        if saturated < others.len() {
            first_rescaled = saturated;
            remainder = left;
        }
    }

    let rescaled = &others[first_rescaled..];
    if rescaled.is_empty() {
        return next;
    }

    let weights: Vec<f64> = rescaled.iter().map(|c| squash(old.get(c))).collect();
    let sum: f64 = weights.iter().sum();
    for (category, weight) in rescaled.iter().zip(weights) {
        let share = if sum > 0.0 {
            weight / sum
        } else {
            1.0 / rescaled.len() as f64
        };
        next.set((*category).clone(), remainder * share);
    }

    next
}

/// Count of leading `others` that fit in `remainder`, and what is left of it.
fn saturate(old: &Distribution, others: &[&Category], mut remainder: f64) -> (usize, f64) {
    let mut count = 0;
    for category in others {
        let old_ratio = old.get(category);
        if old_ratio > remainder + SATURATION_TOLERANCE {
            break;
        }
        remainder = (remainder - old_ratio).max(0.0);
        count += 1;
    }
    (count, remainder)
}

fn squash(ratio: f64) -> f64 {
    if ratio < ZERO_THRESHOLD {
        0.0
    } else {
        ratio
    }
}
