use std::time::Duration;

/// Hard ceiling on search depth. Requests for "unbounded" depth clamp here;
/// nothing searches 80 plies deep within a sane time budget anyway.
pub const DEPTH_MAX: usize = 80;

/// Wall-clock budget used when none has been configured.
pub const TIME_DEFAULT: Duration = Duration::from_secs(15);

/// Bounds on a single search: a maximum tree height and a wall-clock
/// budget. Both are clamped on the way in, so a search never sees an
/// unusable configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_depth: usize,
    pub max_time: Duration,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth: DEPTH_MAX,
            max_time: TIME_DEFAULT,
        }
    }
}

impl SearchLimits {
    /// Sets the depth limit in plies. Zero (and anything unparseable that
    /// arrives as zero or negative) means unbounded, as does any request
    /// beyond [`DEPTH_MAX`].
    pub fn set_depth(&mut self, plies: i64) {
        self.max_depth = if (1..=DEPTH_MAX as i64).contains(&plies) {
            plies as usize
        } else {
            DEPTH_MAX
        };
    }

    /// Sets the time budget in seconds. Zero or negative means the default.
    pub fn set_time(&mut self, seconds: i64) {
        self.max_time = if seconds > 0 {
            Duration::from_secs(seconds as u64)
        } else {
            TIME_DEFAULT
        };
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn depth_clamps() {
        let mut limits = SearchLimits::default();

        limits.set_depth(3);
        assert_eq!(limits.max_depth, 3);

        limits.set_depth(0);
        assert_eq!(limits.max_depth, DEPTH_MAX);

        limits.set_depth(81);
        assert_eq!(limits.max_depth, DEPTH_MAX);

        limits.set_depth(-7);
        assert_eq!(limits.max_depth, DEPTH_MAX);
    }

    #[test]
    fn time_clamps() {
        let mut limits = SearchLimits::default();

        limits.set_time(60);
        assert_eq!(limits.max_time, Duration::from_secs(60));

        limits.set_time(0);
        assert_eq!(limits.max_time, TIME_DEFAULT);

        limits.set_time(-1);
        assert_eq!(limits.max_time, TIME_DEFAULT);
    }
}
