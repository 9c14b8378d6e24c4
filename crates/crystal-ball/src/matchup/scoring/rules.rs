use super::noise::NoiseSource;
use super::Normalization;
use crate::matchup::domain::AttributeMap;

pub(crate) const LINEAR_JITTER: f64 = 2.0;
pub(crate) const MAGNITUDE_EXPONENT: f64 = 1.2;
pub(crate) const DAILY_FORM_LOW: f64 = 0.9;
pub(crate) const DAILY_FORM_HIGH: f64 = 1.1;
pub(crate) const PERFORMANCE_STD_DEV: f64 = 1.5;

fn attribute_value(attributes: &AttributeMap, attribute: &str) -> f64 {
    attributes.get(attribute).copied().unwrap_or(0.0)
}

/// Weighted sum plus a single uniform jitter draw.
pub(crate) fn linear_score(
    attributes: &AttributeMap,
    weights: &AttributeMap,
    noise: &mut dyn NoiseSource,
) -> f64 {
    let total: f64 = weights
        .iter()
        .map(|(attribute, weight)| attribute_value(attributes, attribute) * weight)
        .sum();

    total + noise.uniform(-LINEAR_JITTER, LINEAR_JITTER)
}

/// Super-linear magnitude that keeps the sign of the input.
pub(crate) fn scale_magnitude(value: f64) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    value.signum() * value.abs().powf(MAGNITUDE_EXPONENT)
}

/// Sum of absolute weights, with zero replaced by one.
pub(crate) fn weight_sum(weights: &AttributeMap) -> f64 {
    let sum: f64 = weights.values().map(|weight| weight.abs()).sum();
    if sum == 0.0 {
        1.0
    } else {
        sum
    }
}

/// Scaled attributes, a per-attribute form multiplier, normalization, and Gaussian noise.
///
/// With [`Normalization::PerAttribute`] the divide-and-perturb step runs inside the loop,
/// so earlier attributes are divided by the weight sum once per later attribute and the
/// result carries one noise draw per attribute.
pub(crate) fn normalized_score(
    attributes: &AttributeMap,
    weights: &AttributeMap,
    normalization: Normalization,
    noise: &mut dyn NoiseSource,
) -> f64 {
    let divisor = weight_sum(weights);
    let mut total = 0.0;

    for (attribute, weight) in weights {
        let scaled = scale_magnitude(attribute_value(attributes, attribute));
        let form = noise.uniform(DAILY_FORM_LOW, DAILY_FORM_HIGH);
        total += scaled * weight * form;

        if normalization == Normalization::PerAttribute {
            total /= divisor;
            total += noise.gaussian(0.0, PERFORMANCE_STD_DEV);
        }
    }

    if normalization == Normalization::Once {
        total /= divisor;
        total += noise.gaussian(0.0, PERFORMANCE_STD_DEV);
    }

    total
}
