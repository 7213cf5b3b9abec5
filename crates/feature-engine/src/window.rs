//! Sliding-Window Signal Transforms

use crate::statistics::round_to;
use crate::FeatureError;
use tracing::debug;

/// Peak absolute value of a normalized signal
pub const NORMALIZED_PEAK: f64 = 10.0;

/// Decimal places kept by [`normalize_signal`]
pub const NORMALIZED_PRECISION: i32 = 5;

/// Energy contributions are scaled down by this factor
const ENERGY_SCALE: f64 = 1e4;

/// Windowed analyzer over one recorded sample
///
/// Window lengths are given in milliseconds and converted to a sample count
/// with `len * window_ms / audio_length_ms` (truncating). Every transform
/// returns exactly one value per input sample.
#[derive(Debug, Clone, Copy)]
pub struct WindowedSignalAnalyzer<'a> {
    /// Raw amplitude readings
    samples: &'a [f64],
    /// Duration covered by `samples`
    audio_length_ms: u32,
}

impl<'a> WindowedSignalAnalyzer<'a> {
    /// Create an analyzer for a sample spanning `audio_length_ms`
    pub fn new(samples: &'a [f64], audio_length_ms: u32) -> Self {
        Self {
            samples,
            audio_length_ms,
        }
    }

    /// Number of samples covered by a window of `window_ms`
    pub fn window_size(&self, window_ms: u32) -> Result<usize, FeatureError> {
        if self.audio_length_ms == 0 {
            return Err(FeatureError::InvalidAudioLength);
        }

        let size = self.samples.len() * window_ms as usize / self.audio_length_ms as usize;
        if size == 0 {
            return Err(FeatureError::WindowTooSmall {
                window_ms,
                sample_len: self.samples.len(),
                audio_length_ms: self.audio_length_ms,
            });
        }

        Ok(size)
    }

    /// Peak-normalized copy of the raw sample
    pub fn original_normalized(&self) -> Vec<f64> {
        normalize_signal(self.samples.to_vec())
    }

    /// Sample delayed by `delay_ms`: zero-filled at the front, truncated at
    /// the back, then normalized
    pub fn ideal_delay(&self, delay_ms: u32) -> Result<Vec<f64>, FeatureError> {
        if self.audio_length_ms == 0 {
            return Err(FeatureError::InvalidAudioLength);
        }

        let n = self.samples.len();
        let shift = (n * delay_ms as usize / self.audio_length_ms as usize).min(n);

        let mut shifted = vec![0.0; shift];
        shifted.extend_from_slice(&self.samples[..n - shift]);
        Ok(normalize_signal(shifted))
    }

    /// Centered moving average, normalized
    ///
    /// With window size `w` and `h = w / 2`, output `k` averages
    /// `samples[k + h - w .. k + h]` clipped to the sample bounds, always
    /// dividing by `w`.
    pub fn moving_average(&self, window_ms: u32) -> Result<Vec<f64>, FeatureError> {
        let size = self.window_size(window_ms)?;
        let samples = self.samples;
        let n = samples.len();
        let half = size / 2;
        let width = size as f64;

        let mut average = Vec::with_capacity(n);
        let mut sum = 0.0;

        // Prime with the leading half window, nothing emitted
        let primed = half.min(n);
        for &sample in &samples[..primed] {
            sum += sample;
        }

        // Ramp-up: emit, then take the incoming sample without eviction
        let ramp_end = size.min(n);
        for &sample in &samples[primed..ramp_end] {
            average.push(sum / width);
            sum += sample;
        }

        // Steady state: emit, evict the sample a full window back, take the incoming one
        for i in ramp_end..n {
            average.push(sum / width);
            sum -= samples[i - size];
            sum += samples[i];
        }

        // Ramp-down: nothing left to take, keep evicting from the original positions
        for k in average.len()..n {
            average.push(sum / width);
            if let Some(leaving) = (k + half).checked_sub(size) {
                sum -= samples[leaving];
            }
        }

        debug!(window_size = size, "Computed moving average over {} samples", n);
        Ok(normalize_signal(average))
    }

    /// Trailing running sum over the window, normalized
    pub fn convolution(&self, window_ms: u32) -> Result<Vec<f64>, FeatureError> {
        let size = self.window_size(window_ms)?;
        Ok(normalize_signal(sliding_sum(self.samples, size)))
    }

    /// Trailing running sum of `sample² / 10⁴` over the window
    pub fn energy(&self, window_ms: u32) -> Result<Vec<f64>, FeatureError> {
        let size = self.window_size(window_ms)?;
        let contributions: Vec<f64> = self.samples.iter().map(|s| s.powi(2) / ENERGY_SCALE).collect();
        Ok(non_negative(sliding_sum(&contributions, size)))
    }

    /// Trailing running sum of `|sample|` over the window
    pub fn magnitude(&self, window_ms: u32) -> Result<Vec<f64>, FeatureError> {
        let size = self.window_size(window_ms)?;
        let contributions: Vec<f64> = self.samples.iter().map(|s| s.abs()).collect();
        Ok(non_negative(sliding_sum(&contributions, size)))
    }

    /// Zero crossings in the trailing window divided by `2 * window_ms`
    ///
    /// The denominator is the window length in milliseconds, not in samples.
    /// The sign state starts non-negative, so a leading negative sample counts
    /// as a crossing.
    pub fn zero_crossing_rate(&self, window_ms: u32) -> Result<Vec<f64>, FeatureError> {
        let size = self.window_size(window_ms)?;
        let denominator = 2.0 * f64::from(window_ms);

        let mut previous_non_negative = true;
        let crossings: Vec<f64> = self
            .samples
            .iter()
            .map(|&sample| {
                let non_negative = sample >= 0.0;
                let crossed = non_negative != previous_non_negative;
                previous_non_negative = non_negative;
                if crossed {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();

        Ok(sliding_sum(&crossings, size)
            .into_iter()
            .map(|count| count / denominator)
            .collect())
    }
}

/// Running sum over a trailing window of `size` values
fn sliding_sum(values: &[f64], size: usize) -> Vec<f64> {
    let mut sums = Vec::with_capacity(values.len());
    let mut sum = 0.0;

    // Ramp-up: the window is still filling
    let ramp_end = size.min(values.len());
    for &value in &values[..ramp_end] {
        sum += value;
        sums.push(sum);
    }

    // Steady state: evict the value a full window back
    for i in ramp_end..values.len() {
        sum -= values[i - size];
        sum += values[i];
        sums.push(sum);
    }

    sums
}

/// Clamp eviction drift on sums of non-negative terms
fn non_negative(mut sums: Vec<f64>) -> Vec<f64> {
    for sum in &mut sums {
        *sum = sum.max(0.0);
    }
    sums
}

/// Scale a signal so its peak absolute value is [`NORMALIZED_PEAK`], rounding
/// every element to [`NORMALIZED_PRECISION`] decimal places
///
/// Empty and all-zero signals are returned unchanged.
pub fn normalize_signal(mut signal: Vec<f64>) -> Vec<f64> {
    let peak = signal
        .iter()
        .fold(0.0_f64, |peak, value| if value.abs() > peak { value.abs() } else { peak });

    if peak == 0.0 {
        return signal;
    }

    let divisor = peak / NORMALIZED_PEAK;
    for value in &mut signal {
        *value = round_to(*value / divisor, NORMALIZED_PRECISION);
    }

    signal
}
