//! Simulation calendar: 365-day years, weekdays, months and decision steps.

/// Days in a simulated year. Leap days are not represented.
pub const DAYS_PER_YEAR: usize = 365;

pub const DAYS_PER_WEEK: usize = 7;

pub const MONTHS_PER_YEAR: usize = 12;

pub const HOURS_PER_DAY: usize = 24;

pub const DAYS_IN_MONTH: [usize; MONTHS_PER_YEAR] =
    [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Calendar month (0-based) of a day of year (0-based).
pub fn month_of_day(day_of_year: usize) -> usize {
    let mut remaining = day_of_year % DAYS_PER_YEAR;
    for (month, &days) in DAYS_IN_MONTH.iter().enumerate() {
        if remaining < days {
            return month;
        }
        remaining -= days;
    }
    MONTHS_PER_YEAR - 1
}

/// One simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationDay {
    /// Day index since the start of the horizon.
    pub index: usize,
    pub day_of_year: usize,
    /// 0 = Sunday.
    pub day_of_week: usize,
    pub year: usize,
}

impl SimulationDay {
    pub fn month(&self) -> usize {
        month_of_day(self.day_of_year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    NotStarted,
    Running(SimulationDay),
    Complete,
}

/// Iterator over the days of a multi-year horizon.
#[derive(Debug, Clone)]
pub struct HorizonClock {
    n_days: usize,
    first_weekday: usize,
    state: ClockState,
}

impl HorizonClock {
    pub fn new(n_years: usize, first_weekday: usize) -> Self {
        Self {
            n_days: n_years * DAYS_PER_YEAR,
            first_weekday: first_weekday % DAYS_PER_WEEK,
            state: ClockState::NotStarted,
        }
    }

    pub fn n_days(&self) -> usize {
        self.n_days
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    fn day(&self, index: usize) -> SimulationDay {
        SimulationDay {
            index,
            day_of_year: index % DAYS_PER_YEAR,
            day_of_week: (self.first_weekday + index) % DAYS_PER_WEEK,
            year: index / DAYS_PER_YEAR,
        }
    }
}

impl Iterator for HorizonClock {
    type Item = SimulationDay;

    fn next(&mut self) -> Option<SimulationDay> {
        let next_index = match self.state {
            ClockState::NotStarted => 0,
            ClockState::Running(d) => d.index + 1,
            ClockState::Complete => return None,
        };
        if next_index >= self.n_days {
            self.state = ClockState::Complete;
            return None;
        }
        let day = self.day(next_index);
        self.state = ClockState::Running(day);
        Some(day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn months_cover_the_year() {
        assert_eq!(DAYS_IN_MONTH.iter().sum::<usize>(), DAYS_PER_YEAR);
        assert_eq!(month_of_day(0), 0);
        assert_eq!(month_of_day(30), 0);
        assert_eq!(month_of_day(31), 1);
        assert_eq!(month_of_day(58), 1);
        assert_eq!(month_of_day(59), 2);
        assert_eq!(month_of_day(364), 11);
    }

    #[test]
    fn clock_yields_full_horizon() {
        let days: Vec<_> = HorizonClock::new(2, 5).collect();
        assert_eq!(days.len(), 730);
        assert_eq!(days[0].day_of_week, 5);
        assert_eq!(days[2].day_of_week, 0);
        assert_eq!(days[365].day_of_year, 0);
        assert_eq!(days[365].year, 1);
        assert_eq!(days[729].day_of_year, 364);
    }

    #[test]
    fn clock_state_machine() {
        let mut clock = HorizonClock::new(1, 0);
        assert_eq!(clock.state(), ClockState::NotStarted);
        let first = clock.next().unwrap();
        assert_eq!(clock.state(), ClockState::Running(first));
        for _ in clock.by_ref() {}
        assert_eq!(clock.state(), ClockState::Complete);
        assert!(clock.next().is_none());
    }

    #[test]
    fn zero_years_is_immediately_complete() {
        let mut clock = HorizonClock::new(0, 0);
        assert!(clock.next().is_none());
        assert_eq!(clock.state(), ClockState::Complete);
    }
}
