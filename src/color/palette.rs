//! Dominant color extraction via median-cut quantization.
//!
//! The pipeline needs one representative color per image. We stride through
//! the pixel data to build a small sample set, then run median cut — split
//! the box with the largest spread at its median, repeat — and report the
//! average color of the most populous box as "dominant".
//!
//! Everything here is deterministic: the split axis priority (r, then g,
//! then b on equal ranges), the sort key (channel value, then full triple),
//! and first-found-wins selection of the box to split and of the dominant
//! box are all fixed. Re-running on the same pixels yields the same color.

/// Sample every Nth pixel by default.
pub const DEFAULT_STRIDE: usize = 10;

/// Pixels with alpha below this are excluded from the sample set.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 125;

/// Number of palette boxes to cut; only the dominant entry is consumed.
pub const DEFAULT_PALETTE_SIZE: usize = 4;

/// Build the working sample set from interleaved RGBA bytes.
///
/// Strides through pixels (not bytes) at the given interval and drops
/// pixels whose alpha is below `alpha_threshold`.
pub fn sample_pixels(rgba: &[u8], stride: usize, alpha_threshold: u8) -> Vec<[u8; 3]> {
    let stride = stride.max(1);
    rgba.chunks_exact(4)
        .step_by(stride)
        .filter(|px| px[3] >= alpha_threshold)
        .map(|px| [px[0], px[1], px[2]])
        .collect()
}

/// A box of samples for median-cut subdivision.
#[derive(Debug)]
struct ColorBox {
    samples: Vec<[u8; 3]>,
}

impl ColorBox {
    /// Per-channel range (max - min) across all samples.
    fn ranges(&self) -> [u8; 3] {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        for s in &self.samples {
            for c in 0..3 {
                min[c] = min[c].min(s[c]);
                max[c] = max[c].max(s[c]);
            }
        }
        [max[0] - min[0], max[1] - min[1], max[2] - min[2]]
    }

    /// Axis with the largest range; r wins ties over g, g over b.
    fn widest_axis(&self) -> (usize, u8) {
        let ranges = self.ranges();
        let mut axis = 0;
        for c in 1..3 {
            if ranges[c] > ranges[axis] {
                axis = c;
            }
        }
        (axis, ranges[axis])
    }

    /// Split priority: populous boxes with more color variation split first.
    fn priority(&self) -> u64 {
        self.samples.len() as u64 * self.widest_axis().1 as u64
    }

    fn splittable(&self) -> bool {
        self.samples.len() >= 2 && self.widest_axis().1 > 0
    }

    /// Split along the widest axis at the median sample.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let (axis, _) = self.widest_axis();
        // Secondary keys make the order a total one, so equal channel
        // values cannot reorder between runs.
        self.samples.sort_unstable_by_key(|s| (s[axis], *s));

        let split_idx = (self.samples.len() / 2).max(1);
        let right = self.samples.split_off(split_idx);
        (self, ColorBox { samples: right })
    }

    /// Rounded mean color of the box.
    fn average(&self) -> [u8; 3] {
        let n = self.samples.len() as u64;
        let mut sums = [0u64; 3];
        for s in &self.samples {
            for c in 0..3 {
                sums[c] += s[c] as u64;
            }
        }
        [
            ((sums[0] + n / 2) / n) as u8,
            ((sums[1] + n / 2) / n) as u8,
            ((sums[2] + n / 2) / n) as u8,
        ]
    }
}

/// Quantize the sample set to at most `palette_size` boxes and return the
/// average color of the most populous one.
///
/// Returns `None` when the sample set is empty (fully transparent or
/// zero-size image) — the pipeline turns that into a skip.
pub fn dominant_color(samples: &[[u8; 3]], palette_size: usize) -> Option<[u8; 3]> {
    if samples.is_empty() {
        return None;
    }

    let mut boxes = vec![ColorBox {
        samples: samples.to_vec(),
    }];

    while boxes.len() < palette_size.max(1) {
        // Highest-priority splittable box; first found wins ties.
        let mut best: Option<(usize, u64)> = None;
        for (i, b) in boxes.iter().enumerate() {
            if !b.splittable() {
                continue;
            }
            let p = b.priority();
            if best.is_none_or(|(_, bp)| p > bp) {
                best = Some((i, p));
            }
        }
        let Some((idx, _)) = best else { break };

        let (left, right) = boxes.swap_remove(idx).split();
        boxes.push(left);
        boxes.push(right);
    }

    // Dominant box = largest population; first found wins ties.
    let mut dominant = &boxes[0];
    for b in &boxes[1..] {
        if b.samples.len() > dominant.samples.len() {
            dominant = b;
        }
    }
    Some(dominant.average())
}
