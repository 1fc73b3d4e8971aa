//! Two-bit gray-code phase sequencing for stepper coils.

/// Coil codes in sequence order: consecutive entries differ by exactly one bit.
pub const GRAY_CODE: [u8; 4] = [0b00, 0b01, 0b11, 0b10];

/// Direction of travel for a step sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepDirection {
    /// Position increases.
    Forward,
    /// Position decreases.
    Reverse,
}

impl StepDirection {
    /// Direction of a signed step count (zero counts as forward).
    #[inline]
    pub fn of(steps: i64) -> Self {
        if steps < 0 {
            StepDirection::Reverse
        } else {
            StepDirection::Forward
        }
    }

    /// Get the sign multiplier (+1 or -1).
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            StepDirection::Forward => 1,
            StepDirection::Reverse => -1,
        }
    }
}

/// Two-bit code driven onto a stepper's coil pins.
///
/// Always one of the four [`GRAY_CODE`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Phase(u8);

impl Phase {
    /// Phase of the home position.
    pub const ZERO: Self = Self(GRAY_CODE[0]);

    /// Phase for an absolute position reached while travelling `direction`.
    ///
    /// Forward travel indexes the table by `position mod 4`; reverse travel by
    /// the mirrored index `3 - ((3 - position) mod 4)`, so a reversed sequence
    /// retraces the forward one code for code.
    pub fn for_step(position: i64, direction: StepDirection) -> Self {
        let index = match direction {
            StepDirection::Forward => position.rem_euclid(4),
            StepDirection::Reverse => 3 - 3i64.wrapping_sub(position).rem_euclid(4),
        };
        Self(GRAY_CODE[index as usize])
    }

    /// Phase held at an absolute position.
    #[inline]
    pub fn at(position: i64) -> Self {
        Self::for_step(position, StepDirection::Forward)
    }

    /// Get the raw 2-bit code.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_cycle() {
        let codes: [u8; 4] = core::array::from_fn(|i| Phase::at(i as i64 + 1).bits());
        assert_eq!(codes, [1, 3, 2, 0]);
    }

    #[test]
    fn test_reverse_retraces_forward() {
        for position in -9..9 {
            assert_eq!(
                Phase::for_step(position, StepDirection::Reverse),
                Phase::for_step(position, StepDirection::Forward)
            );
        }
    }

    #[test]
    fn test_negative_positions_stay_in_table() {
        assert_eq!(Phase::at(-1).bits(), 0b10);
        assert_eq!(Phase::at(-2).bits(), 0b11);
        assert_eq!(Phase::at(-4), Phase::ZERO);
    }

    #[test]
    fn test_direction_of() {
        assert_eq!(StepDirection::of(-3), StepDirection::Reverse);
        assert_eq!(StepDirection::of(0), StepDirection::Forward);
        assert_eq!(StepDirection::of(5).sign(), 1);
    }
}
