//! SequenceSource trait for seeded uniform streams.
//!
//! Defines the interface the transformation generator draws from. An
//! implementation must be fully determined by its seed: the same seed always
//! replays the same infinite stream of values in `[0, 1)`.

/// A stateful, seeded stream of uniform floats in `[0, 1)`.
///
/// Each call advances the stream. Implementations are owned by exactly one
/// mapping generation at a time; nothing here is shared or global.
pub trait SequenceSource {
    /// Returns the next value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Returns `floor(next_f64() * n)`, an index in `[0, n)`.
    ///
    /// Returns 0 without consuming a value when `n == 0`.
    fn next_below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let idx = (self.next_f64() * n as f64) as usize;
        idx.min(n - 1)
    }
}

impl<S: SequenceSource + ?Sized> SequenceSource for &mut S {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of values, cycling.
    struct Scripted {
        values: Vec<f64>,
        pos: usize,
    }

    impl SequenceSource for Scripted {
        fn next_f64(&mut self) -> f64 {
            let v = self.values[self.pos % self.values.len()];
            self.pos += 1;
            v
        }
    }

    #[test]
    fn test_next_below_floors() {
        let mut s = Scripted {
            values: vec![0.0, 0.5, 0.999_999],
            pos: 0,
        };
        assert_eq!(s.next_below(26), 0);
        assert_eq!(s.next_below(26), 13);
        assert_eq!(s.next_below(26), 25);
    }

    #[test]
    fn test_next_below_zero_consumes_nothing() {
        let mut s = Scripted {
            values: vec![0.25],
            pos: 0,
        };
        assert_eq!(s.next_below(0), 0);
        assert_eq!(s.pos, 0);
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut s = Scripted {
            values: vec![0.5],
            pos: 0,
        };
        fn draw(mut source: impl SequenceSource) -> usize {
            source.next_below(4)
        }
        assert_eq!(draw(&mut s), 2);
        assert_eq!(s.pos, 1);
    }
}
