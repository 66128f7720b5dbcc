//! Bounded increment/decrement for numeric quick-strip settings.

/// Step size and optional bounds of a stepper setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepperParams {
    pub divisible_by: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub value: f64,
    /// The unclamped step fell outside the bounds.
    pub hit_bound: bool,
}

/// Move `value` one step in `direction`, clamped to the configured bounds.
pub fn restricted_step(
    value: f64,
    params: &StepperParams,
    direction: StepDirection,
) -> StepOutcome {
    let step = match direction {
        StepDirection::Increment => params.divisible_by,
        StepDirection::Decrement => -params.divisible_by,
    };
    let stepped = value + step;

    let mut restricted = stepped;
    if let Some(max) = params.max {
        restricted = restricted.min(max);
    }
    if let Some(min) = params.min {
        restricted = restricted.max(min);
    }

    StepOutcome {
        value: restricted,
        hit_bound: restricted != stepped,
    }
}
