//! Growing-buffer probe.
//!
//! Profile APIs copy their answer into a caller-supplied buffer and signal
//! truncation only through the number of units they wrote. The probe asks
//! with a modest buffer, and doubles it until the reply fits with room to
//! spare for its terminator(s).

use tracing::debug;

use crate::error::{ProfileError, Result};

/// Shape of the payload being probed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// A single NUL-terminated string. One unit is reserved.
    Single,
    /// A NUL-separated list closed by a double NUL. Two units are reserved.
    MultiString,
}

impl Payload {
    /// Number of buffer units the backend keeps for terminators.
    #[must_use]
    pub const fn reserved(self) -> usize {
        match self {
            Self::Single => 1,
            Self::MultiString => 2,
        }
    }
}

/// Starting capacities and ceiling for the probe, in UTF-16 code units.
///
/// # Examples
///
/// ```
/// use profile_store::probe::BufferLimits;
///
/// let limits = BufferLimits::default();
/// assert_eq!(limits.initial_value, 250);
/// assert_eq!(limits.initial_list, 500);
/// assert_eq!(limits.max, 1 << 24);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLimits {
    /// First capacity tried for single values.
    pub initial_value: usize,
    /// First capacity tried for section and key name lists.
    pub initial_list: usize,
    /// Largest capacity ever allocated.
    pub max: usize,
}

impl BufferLimits {
    /// Smallest capacity that can hold an empty multi-string reply.
    pub const MIN_CAPACITY: usize = 3;

    /// Initial capacity for the given payload shape.
    #[must_use]
    pub const fn initial(&self, payload: Payload) -> usize {
        match payload {
            Payload::Single => self.initial_value,
            Payload::MultiString => self.initial_list,
        }
    }
}

impl Default for BufferLimits {
    fn default() -> Self {
        Self {
            initial_value: 250,
            initial_list: 500,
            max: 1 << 24,
        }
    }
}

/// Call `fill` with growing buffers until its payload fits.
///
/// `fill` receives a zeroed buffer and returns the number of payload units it
/// wrote. The reply is complete when that count is strictly less than the
/// capacity minus the units reserved for terminators. The returned vector is
/// truncated to the payload.
///
/// # Errors
///
/// Propagates any error from `fill`, and returns
/// [`ProfileError::OversizedPayload`] when the payload still does not fit at
/// `limits.max`.
pub fn probe<F>(limits: &BufferLimits, payload: Payload, mut fill: F) -> Result<Vec<u16>>
where
    F: FnMut(&mut [u16]) -> Result<usize>,
{
    let reserved = payload.reserved();
    let mut capacity = limits
        .initial(payload)
        .clamp(BufferLimits::MIN_CAPACITY, limits.max.max(BufferLimits::MIN_CAPACITY));

    loop {
        let mut buf = vec![0u16; capacity];
        let written = fill(&mut buf)?;
        if written < capacity - reserved {
            buf.truncate(written);
            return Ok(buf);
        }
        if capacity >= limits.max {
            return Err(ProfileError::OversizedPayload { limit: limits.max });
        }
        let next = capacity.saturating_mul(2).min(limits.max);
        debug!(capacity, next, ?payload, "profile buffer too small, growing");
        capacity = next;
    }
}

/// Decode a single-string payload.
#[must_use]
pub fn decode_single(units: &[u16]) -> String {
    String::from_utf16_lossy(units)
}

/// Split a multi-string payload on its NUL separators.
///
/// Empty elements (the artifact of the closing terminator, or of an empty
/// reply) are dropped, so the result only ever contains real names.
///
/// # Examples
///
/// ```
/// use profile_store::probe::decode_multi;
///
/// let blob: Vec<u16> = "a\0b\0c\0".encode_utf16().collect();
/// assert_eq!(decode_multi(&blob), ["a", "b", "c"]);
/// assert!(decode_multi(&[]).is_empty());
/// ```
#[must_use]
pub fn decode_multi(units: &[u16]) -> Vec<String> {
    units
        .split(|&u| u == 0)
        .filter(|part| !part.is_empty())
        .map(String::from_utf16_lossy)
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    /// Simulate a profile API holding `text`: copy as much as fits, following
    /// the single-value truncation rule.
    fn single_source(text: &str) -> impl FnMut(&mut [u16]) -> Result<usize> {
        let units: Vec<u16> = text.encode_utf16().collect();
        move |buf: &mut [u16]| {
            let n = units.len().min(buf.len() - 1);
            buf[..n].copy_from_slice(&units[..n]);
            buf[n] = 0;
            Ok(n)
        }
    }

    fn limits(initial: usize, max: usize) -> BufferLimits {
        BufferLimits {
            initial_value: initial,
            initial_list: initial,
            max,
        }
    }

    #[test]
    fn short_value_fits_first_time() {
        let mut calls = 0;
        let mut source = single_source("hello");
        let units = probe(&BufferLimits::default(), Payload::Single, |buf| {
            calls += 1;
            source(buf)
        })
        .unwrap();
        assert_eq!(decode_single(&units), "hello");
        assert_eq!(calls, 1);
    }

    #[test]
    fn long_value_grows_until_it_fits() {
        let text = "x".repeat(1000);
        let mut capacities = Vec::new();
        let mut source = single_source(&text);
        let units = probe(&BufferLimits::default(), Payload::Single, |buf| {
            capacities.push(buf.len());
            source(buf)
        })
        .unwrap();
        assert_eq!(decode_single(&units), text);
        assert_eq!(capacities, [250, 500, 1000, 2000]);
    }

    #[test]
    fn value_exactly_capacity_minus_one_triggers_growth() {
        // 9 units in a 10-unit buffer looks truncated, so the probe must retry.
        let text = "123456789";
        let mut capacities = Vec::new();
        let mut source = single_source(text);
        let units = probe(&limits(10, 100), Payload::Single, |buf| {
            capacities.push(buf.len());
            source(buf)
        })
        .unwrap();
        assert_eq!(decode_single(&units), text);
        assert_eq!(capacities, [10, 20]);
    }

    #[test]
    fn multi_string_reserves_two_units() {
        let mut capacities = Vec::new();
        let units = probe(&limits(10, 100), Payload::MultiString, |buf| {
            capacities.push(buf.len());
            // 8 units in a 10-unit buffer is the cap - 2 truncation mark.
            Ok(8)
        })
        .unwrap();
        assert_eq!(units.len(), 8);
        assert_eq!(capacities, [10, 20]);
    }

    #[test]
    fn growth_is_clamped_to_the_ceiling() {
        let text = "y".repeat(70);
        let mut capacities = Vec::new();
        let mut source = single_source(&text);
        let units = probe(&limits(25, 80), Payload::Single, |buf| {
            capacities.push(buf.len());
            source(buf)
        })
        .unwrap();
        assert_eq!(units.len(), 70);
        assert_eq!(capacities, [25, 50, 80]);
    }

    #[test]
    fn oversized_payload_is_an_error() {
        let text = "z".repeat(500);
        let mut source = single_source(&text);
        let err = probe(&limits(16, 64), Payload::Single, |buf| source(buf)).unwrap_err();
        assert!(
            matches!(err, ProfileError::OversizedPayload { limit: 64 }),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn fill_errors_propagate_without_retry() {
        let mut calls = 0;
        let err = probe(&BufferLimits::default(), Payload::Single, |_| {
            calls += 1;
            Err(ProfileError::unavailable(
                "/x.ini",
                std::io::Error::other("locked"),
            ))
        })
        .unwrap_err();
        assert!(matches!(err, ProfileError::StoreUnavailable { .. }));
        assert_eq!(calls, 1);
    }

    #[test]
    fn tiny_initial_capacity_is_raised_to_minimum() {
        let mut capacities = Vec::new();
        probe(&limits(0, 100), Payload::MultiString, |buf| {
            capacities.push(buf.len());
            Ok(0)
        })
        .unwrap();
        assert_eq!(capacities, [BufferLimits::MIN_CAPACITY]);
    }

    #[test]
    fn decode_multi_drops_terminator_artifacts() {
        let blob: Vec<u16> = "s1\0s2\0\0".encode_utf16().collect();
        assert_eq!(decode_multi(&blob), ["s1", "s2"]);
    }

    #[test]
    fn decode_multi_handles_unicode_names() {
        let blob: Vec<u16> = "Größe\0名前\0".encode_utf16().collect();
        assert_eq!(decode_multi(&blob), ["Größe", "名前"]);
    }

    #[test]
    fn decode_single_empty() {
        assert_eq!(decode_single(&[]), "");
    }
}
