/*! Time structures.

The `time` module contains structures used to represent both absolute and relative time of the
simulated network. There is no connection to any wall clock: an [Instant] only ever advances
when a component is ticked.

 - [Instant] is used to represent absolute time.
 - [Duration] is used to represet relative time.

[Instant]: struct.Instant.html
[Duration]: struct.Duration.html
*/
use core::{fmt, ops};
pub use core::time::Duration;

/// A representation of an absolute time value.
///
/// The `Instant` type is a wrapper around a `u64` value that represents a number of
/// milliseconds, monotonically increasing since the component owning the clock was created.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    millis: u64,
}

impl Instant {
    /// The moment a simulated clock starts at.
    pub const ZERO: Instant = Instant { millis: 0 };

    /// Create a new `Instant` from a number of milliseconds.
    pub fn from_millis<T: Into<u64>>(millis: T) -> Instant {
        Instant { millis: millis.into() }
    }

    /// Create a new `Instant` from a number of seconds.
    pub fn from_secs<T: Into<u64>>(secs: T) -> Instant {
        Instant { millis: secs.into() * 1000 }
    }

    /// The fractional number of milliseconds that have passed
    /// since the beginning of time.
    pub fn millis(&self) -> u64 {
        self.millis % 1000
    }

    /// The number of whole seconds that have passed since the
    /// beginning of time.
    pub fn secs(&self) -> u64 {
        self.millis / 1000
    }

    /// The total number of milliseconds that have passed since
    /// the biginning of time.
    pub fn total_millis(&self) -> u64 {
        self.millis
    }

    /// The time passed from an earlier instant until this one.
    ///
    /// Saturates at zero if `earlier` is in fact later.
    pub fn duration_since(&self, earlier: Instant) -> Duration {
        Duration::from_millis(self.millis.saturating_sub(earlier.millis))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{:03}s", self.secs(), self.millis())
    }
}

impl ops::Add<Duration> for Instant {
    type Output = Instant;

    fn add(mut self, rhs: Duration) -> Instant {
        self += rhs;
        self
    }
}

impl ops::AddAssign<Duration> for Instant {
    /// Saturates at the largest representable instant.
    fn add_assign(&mut self, rhs: Duration) {
        let millis = u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX);
        self.millis = self.millis.saturating_add(millis);
    }
}

impl ops::Sub<Instant> for Instant {
    type Output = Duration;

    fn sub(self, rhs: Instant) -> Duration {
        self.duration_since(rhs)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_instant_ops() {
        assert_eq!(Instant::from_millis(4u64) + Duration::from_millis(6), Instant::from_millis(10u64));
        assert_eq!(Instant::from_millis(7u64) - Instant::from_millis(5u64), Duration::from_millis(2));
        assert_eq!(Instant::from_millis(5u64) - Instant::from_millis(7u64), Duration::from_millis(0));
    }

    #[test]
    fn test_instant_assign_ops() {
        let mut now = Instant::ZERO;
        now += Duration::from_secs(5);
        now += Duration::from_millis(674);
        assert_eq!(now, Instant::from_millis(5674u64));
    }

    #[test]
    fn test_instant_saturates() {
        let far = Instant::ZERO + Duration::MAX;
        assert_eq!(far.total_millis(), u64::MAX);
        let mut now = Instant::from_millis(5u64);
        now += Duration::from_millis(u64::MAX);
        assert_eq!(now, far);
        assert_eq!(far - Instant::ZERO, Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_instant_getters() {
        let instant = Instant::from_millis(5674u64);
        assert_eq!(instant.secs(), 5);
        assert_eq!(instant.millis(), 674);
        assert_eq!(instant.total_millis(), 5674);
        assert_eq!(Instant::from_secs(3u64).total_millis(), 3000);
    }

    #[test]
    fn test_instant_display() {
        assert_eq!(format!("{}", Instant::from_millis(5674u64)), "5.674s");
        assert_eq!(format!("{}", Instant::from_millis(5000u64)), "5.000s");
    }
}
