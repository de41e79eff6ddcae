use std::{fmt::Display, ops::Deref};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentage(f64);

/// Width and precision are applied to the number, the `%` sign is appended after it.
/// `format!("{:4.1}", p)` gives `" 5.0%"`.
impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)?;
        f.write_str("%")
    }
}

impl Percentage {
    pub fn new_opt(value: f64) -> Option<Percentage> {
        if value < 0. || value.is_nan() {
            None
        } else {
            Some(Percentage(value))
        }
    }

    pub fn zero() -> Percentage {
        Percentage(0.)
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Share of `part` in `whole`. An empty whole gives 0%.
pub fn ratio_percentage(part: f64, whole: f64) -> Percentage {
    if whole <= 0. {
        return Percentage::zero();
    }
    Percentage::new_opt(part / whole * 100.).unwrap_or_else(Percentage::zero)
}

/// Share of `count` in `total`, for tallies of records.
pub fn count_percentage(count: usize, total: usize) -> Percentage {
    ratio_percentage(count as f64, total as f64)
}
