//! Temperature state machine.

/// Phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Temperature is above the lower bound; another round will run.
    Running,
    /// Temperature reached the lower bound. Terminal.
    Converged,
}

/// Geometric cooling `T_{k+1} = (1 - rate) * T_k` down to a lower bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSchedule {
    temperature: f64,
    min_temperature: f64,
    cooling_rate: f64,
}

impl TemperatureSchedule {
    pub fn new(initial_temperature: f64, min_temperature: f64, cooling_rate: f64) -> Self {
        Self {
            temperature: initial_temperature,
            min_temperature,
            cooling_rate,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn phase(&self) -> Phase {
        if self.temperature > self.min_temperature {
            Phase::Running
        } else {
            Phase::Converged
        }
    }

    /// Cools by one step. No-op once converged.
    pub fn cool(&mut self) -> Phase {
        if self.phase() == Phase::Running {
            self.temperature *= 1.0 - self.cooling_rate;
        }
        self.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halving_from_ten_takes_four_steps() {
        let mut schedule = TemperatureSchedule::new(10.0, 1.0, 0.5);
        let mut steps = 0;
        while schedule.phase() == Phase::Running {
            schedule.cool();
            steps += 1;
        }
        assert_eq!(steps, 4);
        assert!((schedule.temperature() - 0.625).abs() < 1e-12);
    }

    #[test]
    fn test_bound_is_inclusive() {
        let schedule = TemperatureSchedule::new(1.0, 1.0, 0.5);
        assert_eq!(schedule.phase(), Phase::Converged);
    }

    #[test]
    fn test_converged_is_terminal() {
        let mut schedule = TemperatureSchedule::new(2.0, 1.0, 0.5);
        assert_eq!(schedule.cool(), Phase::Converged);
        let frozen = schedule.temperature();
        assert_eq!(schedule.cool(), Phase::Converged);
        assert_eq!(schedule.temperature(), frozen);
    }

    #[test]
    fn test_default_schedule_round_count() {
        // ln(1000) / -ln(0.997) ~= 2299.1
        let mut schedule = TemperatureSchedule::new(1000.0, 1.0, 0.003);
        let mut rounds = 0;
        while schedule.phase() == Phase::Running {
            schedule.cool();
            rounds += 1;
        }
        assert_eq!(rounds, 2300);
    }
}
