//! Per-channel oscilloscope buffers

/// Entries in an oscilloscope ring; the needle wraps at this length.
pub const OSC_BUFFER_LEN: usize = 65536;

/// Ring of raw channel samples for visualization
///
/// The needle is a `u16`, so it wraps exactly at [`OSC_BUFFER_LEN`] and a
/// reader can follow it without bounds checks.
#[derive(Debug, Clone)]
pub struct OscBuffer {
    data: Box<[i16]>,
    needle: u16,
    rate: u32,
}

impl OscBuffer {
    /// Create a zeroed buffer sampled at `rate` Hz.
    pub fn new(rate: u32) -> Self {
        Self {
            data: vec![0; OSC_BUFFER_LEN].into_boxed_slice(),
            needle: 0,
            rate,
        }
    }

    /// Store a sample at the needle and advance it.
    #[inline]
    pub fn push(&mut self, sample: i16) {
        self.data[self.needle as usize] = sample;
        self.needle = self.needle.wrapping_add(1);
    }

    /// Index the next sample will be written to.
    pub fn needle(&self) -> u16 {
        self.needle
    }

    /// The whole ring.
    pub fn data(&self) -> &[i16] {
        &self.data
    }

    /// Sample rate in Hz.
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Zero the ring and rewind the needle.
    pub fn clear(&mut self) {
        self.data.fill(0);
        self.needle = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needle_wraps_around() {
        let mut buf = OscBuffer::new(223_721);
        for i in 0..OSC_BUFFER_LEN + 3 {
            buf.push(i as i16);
        }
        assert_eq!(buf.needle(), 3);
        assert_eq!(buf.data()[2], (OSC_BUFFER_LEN + 2) as i16);
        assert_eq!(buf.data()[3], 3);
        assert_eq!(buf.rate(), 223_721);
        buf.clear();
        assert_eq!(buf.needle(), 0);
        assert!(buf.data().iter().all(|&s| s == 0));
    }
}
