/// Chain counter that moves forward every time it is observed.
///
/// Models "every observation of chain time costs chain time": reading the
/// value through [`ChainCounter::advance`] steps it first, so two reads never
/// return the same value.
#[derive(Debug, Clone)]
pub struct ChainCounter {
    value: u64,
    step: u64,
}

impl ChainCounter {
    pub const fn new(start: u64, step: u64) -> Self {
        Self { value: start, step }
    }

    /// Step the counter and return the new value.
    pub fn advance(&mut self) -> u64 {
        self.value = self.value.saturating_add(self.step);
        self.value
    }

    /// Last value handed out, without advancing.
    pub fn peek(&self) -> u64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_is_strictly_increasing() {
        let mut counter = ChainCounter::new(100, 5);
        assert_eq!(counter.advance(), 105);
        assert_eq!(counter.advance(), 110);
        assert_eq!(counter.peek(), 110);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let counter = ChainCounter::new(7, 25);
        assert_eq!(counter.peek(), 7);
        assert_eq!(counter.peek(), 7);
    }
}
