/// Conflicts per Luby term.
pub const LUBY_UNIT: u64 = 512;

/// Decides how many conflicts the search runs before the next restart.
#[cfg_attr(test, mockall::automock)]
pub trait RestartPolicy {
    fn next_interval(&mut self) -> u64;
}

/// Luby-sequence restarts: 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, ... times a fixed
/// conflict unit. The sequence is generated incrementally with D. Knuth's
/// reluctant-doubling pair, no precomputed table.
pub struct LubyRestarts {
    u: i64,
    v: i64,
    unit: u64,
}

impl LubyRestarts {
    pub fn new(unit: u64) -> LubyRestarts {
        LubyRestarts { u: 1, v: 1, unit }
    }

    fn luby(&mut self) -> u64 {
        let term = self.v;
        if (self.u & -self.u) == self.v {
            self.u += 1;
            self.v = 1;
        } else {
            self.v *= 2;
        }
        term as u64
    }
}

impl RestartPolicy for LubyRestarts {
    fn next_interval(&mut self) -> u64 {
        self.luby() * self.unit
    }
}
