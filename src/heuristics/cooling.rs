//! Geometric cooling schedule: `T_{k+1} = rate * T_k`, stopping once the
//! temperature is no longer above the floor.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometricCooling {
    pub initial_temperature: f64,
    /// Multiplicative decay in (0, 1)
    pub cooling_rate: f64,
    /// The schedule ends at the first temperature `<= min_temperature`
    pub min_temperature: f64,
}

impl GeometricCooling {
    pub fn new(initial_temperature: f64, cooling_rate: f64, min_temperature: f64) -> Self {
        GeometricCooling {
            initial_temperature,
            cooling_rate,
            min_temperature,
        }
    }

    /// Temperatures at which an inner loop runs, hottest first.
    ///
    /// Finite only for a rate in (0, 1) and a positive floor.
    pub fn temperatures(&self) -> impl Iterator<Item = f64> {
        let rate = self.cooling_rate;
        let floor = self.min_temperature;
        std::iter::successors(Some(self.initial_temperature), move |t| Some(t * rate))
            .take_while(move |&t| t > floor)
    }

    /// Number of temperature steps in the schedule
    pub fn steps(&self) -> usize {
        self.temperatures().count()
    }

    /// Temperature once the schedule has run out
    pub fn final_temperature(&self) -> f64 {
        match self.temperatures().last() {
            Some(t) => t * self.cooling_rate,
            None => self.initial_temperature,
        }
    }
}
