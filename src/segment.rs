use crate::encoding::{EncodingMode, Repertoire, classify_with};
use serde::Serialize;

/// How many segments a body occupies under one encoding mode.
///
/// Every segment is assumed to carry the full per-mode capacity; the smaller
/// payload of concatenated multi-part messages is not modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SegmentReport {
    pub capacity_per_segment: usize,
    pub segment_count: usize,
    pub total_capacity: usize,
}

impl SegmentReport {
    pub fn from_length(length: usize, mode: EncodingMode) -> Self {
        let capacity_per_segment = mode.capacity();
        let segment_count = length.div_ceil(capacity_per_segment).max(1);
        Self {
            capacity_per_segment,
            segment_count,
            total_capacity: capacity_per_segment * segment_count,
        }
    }

    /// True when `length` does not fit in a single segment.
    #[inline]
    pub fn single_segment_exceeded(&self, length: usize) -> bool {
        length > self.capacity_per_segment
    }
}

/// Length is counted in code points, not bytes.
pub fn segment(body: &str, mode: EncodingMode) -> SegmentReport {
    SegmentReport::from_length(body.chars().count(), mode)
}

/// Classification, length and segmentation of one body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Measurement {
    pub mode: EncodingMode,
    pub characters: usize,
    pub report: SegmentReport,
}

pub fn measure(body: &str, repertoire: Repertoire) -> Measurement {
    let mode = classify_with(body, repertoire);
    let characters = body.chars().count();
    Measurement {
        mode,
        characters,
        report: SegmentReport::from_length(characters, mode),
    }
}
