use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    OdeModel,
    errors::SolverErrors,
    rk::RungeKutta,
    saving::MemoryResult,
    stepping::AdaptiveStepControl,
    tableau::ButcherTableau,
};

/// Enum representing the embedded Runge-Kutta pairs supported by the framework.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RungeKuttaMethods {
    /// Bogacki-Shampine 3(2) method.
    BogackiShampine32,
    /// Runge-Kutta-Fehlberg 4(5) method.
    Fehlberg45,
    /// Dormand-Prince 5(4) method.
    #[default]
    DormandPrince45,
}

impl RungeKuttaMethods {
    pub const ALL: [RungeKuttaMethods; 3] = [
        RungeKuttaMethods::BogackiShampine32,
        RungeKuttaMethods::Fehlberg45,
        RungeKuttaMethods::DormandPrince45,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RungeKuttaMethods::BogackiShampine32 => "bs32",
            RungeKuttaMethods::Fehlberg45 => "rkf45",
            RungeKuttaMethods::DormandPrince45 => "dopri45",
        }
    }

    pub fn solve_grid<Model>(
        &self,
        model: &mut Model,
        x0: &Model::State,
        grid: &[f64],
        controller: &mut AdaptiveStepControl,
        result: &mut MemoryResult<Model::State>,
    ) -> Result<(), SolverErrors>
    where
        Model: OdeModel,
    {
        match self {
            RungeKuttaMethods::BogackiShampine32 => {
                let mut solver =
                    RungeKutta::<Model::State, 4>::new(ButcherTableau::<4>::BOGACKISHAMPINE32);
                solver.solve_grid(model, x0, grid, controller, result)
            }
            RungeKuttaMethods::Fehlberg45 => {
                let mut solver =
                    RungeKutta::<Model::State, 6>::new(ButcherTableau::<6>::FEHLBERG45);
                solver.solve_grid(model, x0, grid, controller, result)
            }
            RungeKuttaMethods::DormandPrince45 => {
                let mut solver =
                    RungeKutta::<Model::State, 7>::new(ButcherTableau::<7>::DORMANDPRINCE45);
                solver.solve_grid(model, x0, grid, controller, result)
            }
        }
    }
}

impl fmt::Display for RungeKuttaMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RungeKuttaMethods {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RungeKuttaMethods::ALL
            .into_iter()
            .find(|method| method.name() == s)
            .ok_or_else(|| format!("unknown Runge-Kutta method '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names_round_trip() {
        for method in RungeKuttaMethods::ALL {
            assert_eq!(method.name().parse::<RungeKuttaMethods>(), Ok(method));
        }
        assert!("rk4".parse::<RungeKuttaMethods>().is_err());
    }
}
