//! Butterworth high-pass filtering for microphone noise reduction.
//!
//! The recording chain applies a high-pass filter (default: 100 Hz cutoff,
//! order 4) to strip low-frequency rumble before transcription.  The filter
//! is built as a cascade of second-order sections with Butterworth Q values
//! (plus one first-order section for odd orders) and applied
//! forward-then-backward ([`highpass_filtfilt`]) so the result has zero
//! phase distortion.

// ---------------------------------------------------------------------------
// Biquad
// ---------------------------------------------------------------------------

/// One second-order IIR section in normalized direct form II transposed.
#[derive(Debug, Clone, Copy)]
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Biquad {
    /// High-pass section with cutoff `fc` Hz at sample rate `fs` Hz and the
    /// given Q (RBJ audio-EQ cookbook coefficients).
    fn highpass(fc: f64, fs: f64, q: f64) -> Self {
        let w0 = 2.0 * std::f64::consts::PI * fc / fs;
        let cw = w0.cos();
        let alpha = w0.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;

        Self {
            b0: ((1.0 + cw) / 2.0) / a0,
            b1: (-(1.0 + cw)) / a0,
            b2: ((1.0 + cw) / 2.0) / a0,
            a1: (-2.0 * cw) / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    /// First-order high-pass expressed as a degenerate biquad (`b2 = a2 = 0`),
    /// used as the extra section for odd filter orders.
    fn highpass_first_order(fc: f64, fs: f64) -> Self {
        let k = (std::f64::consts::PI * fc / fs).tan();

        Self {
            b0: 1.0 / (1.0 + k),
            b1: -1.0 / (1.0 + k),
            b2: 0.0,
            a1: (k - 1.0) / (1.0 + k),
            a2: 0.0,
        }
    }

    /// Run the section over `samples` in place.
    fn apply(&self, samples: &mut [f32]) {
        let mut z1 = 0.0_f64;
        let mut z2 = 0.0_f64;

        for s in samples.iter_mut() {
            let x = f64::from(*s);
            let y = self.b0 * x + z1;
            z1 = self.b1 * x - self.a1 * y + z2;
            z2 = self.b2 * x - self.a2 * y;
            *s = y as f32;
        }
    }
}

// ---------------------------------------------------------------------------
// Cascade design
// ---------------------------------------------------------------------------

/// Build the section cascade for an order-`order` Butterworth high-pass.
///
/// Even orders become `order / 2` biquads whose Q values place the poles on
/// the Butterworth circle; odd orders get one extra first-order section.
fn design_highpass(order: usize, cutoff_hz: f64, sample_rate: f64) -> Vec<Biquad> {
    let pairs = order / 2;
    let mut sections = Vec::with_capacity(pairs + order % 2);

    for k in 0..pairs {
        // Pole angle for the k-th conjugate pair of an order-n Butterworth.
        let theta = std::f64::consts::PI * (2.0 * k as f64 + 1.0) / (2.0 * order as f64);
        let q = 1.0 / (2.0 * theta.cos());
        sections.push(Biquad::highpass(cutoff_hz, sample_rate, q));
    }

    if order % 2 == 1 {
        sections.push(Biquad::highpass_first_order(cutoff_hz, sample_rate));
    }

    sections
}

// ---------------------------------------------------------------------------
// highpass_filtfilt
// ---------------------------------------------------------------------------

/// Apply an order-`order` Butterworth high-pass at `cutoff_hz`,
/// forward-then-backward for zero phase shift.
///
/// Degenerate parameters fall back to a pass-through: `order == 0`, a
/// non-positive cutoff, or a cutoff at/above the Nyquist rate return the
/// input unchanged.
///
/// # Example
///
/// ```rust
/// use charla::audio::highpass_filtfilt;
///
/// // A DC offset is low-frequency content — the filter removes it.
/// let dc = vec![0.8_f32; 16_000];
/// let out = highpass_filtfilt(&dc, 16_000, 100.0, 4);
/// let tail_peak = out[8_000..].iter().fold(0.0_f32, |m, s| m.max(s.abs()));
/// assert!(tail_peak < 0.01);
/// ```
pub fn highpass_filtfilt(
    samples: &[f32],
    sample_rate: u32,
    cutoff_hz: f32,
    order: usize,
) -> Vec<f32> {
    let nyquist = sample_rate as f64 / 2.0;
    if samples.is_empty()
        || order == 0
        || cutoff_hz <= 0.0
        || f64::from(cutoff_hz) >= nyquist
    {
        return samples.to_vec();
    }

    let sections = design_highpass(order, f64::from(cutoff_hz), f64::from(sample_rate));
    let mut out = samples.to_vec();

    // Forward pass
    for section in &sections {
        section.apply(&mut out);
    }

    // Backward pass cancels the phase shift of the forward pass.
    out.reverse();
    for section in &sections {
        section.apply(&mut out);
    }
    out.reverse();

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
