use thiserror::Error;

/// A closed interval `[min, max]`, inclusive at both ends.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    min: f64,
    max: f64,
}

/// The widest GC content range, in percent.
pub const GC_FULL: Bounds = Bounds { min: 0.0, max: 100.0 };

/// The widest length range.
pub const LENGTH_FULL: Bounds = Bounds {
    min: 0.0,
    max: 4_294_967_296.0,
};

#[derive(Error, Debug, PartialEq)]
pub enum BoundsError {
    #[error(
        "expected '<max>' or '<min>,<max>', got '{0}'. For example:
  --gc-bounds 80
  --gc-bounds 20,80
  --length-bounds 50,inf"
    )]
    Format(String),

    #[error("invalid {which} value: '{value}'")]
    Value { which: &'static str, value: String },

    #[error("lower bound {min} is greater than upper bound {max}")]
    Inverted { min: f64, max: f64 },

    #[error("bounds must be non-negative numbers, got {0}")]
    Negative(f64),
}

impl Bounds {
    /// Creates `[min, max]`.
    ///
    /// # Errors
    ///
    /// Fails if either end is negative or NaN, or if `min > max`.
    pub fn new(min: f64, max: f64) -> Result<Self, BoundsError> {
        for v in [min, max] {
            if v.is_nan() || v < 0.0 {
                return Err(BoundsError::Negative(v));
            }
        }

        if min > max {
            return Err(BoundsError::Inverted { min, max });
        }

        Ok(Bounds { min, max })
    }

    /// A lone value is an upper bound: `[0, max]`.
    pub fn upper(max: f64) -> Result<Self, BoundsError> {
        Self::new(0.0, max)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, v: f64) -> bool {
        (self.min <= v) && (v <= self.max)
    }
}

fn parse_value(which: &'static str, s: &str) -> Result<f64, BoundsError> {
    let s = s.trim();
    let invalid = || BoundsError::Value {
        which,
        value: s.to_string(),
    };

    // only the upper end may be `inf`
    match s.parse::<f64>() {
        Ok(v) if v.is_nan() => Err(invalid()),
        Ok(v) if v.is_infinite() && which == "minimum" => Err(invalid()),
        Ok(v) => Ok(v),
        Err(_) => Err(invalid()),
    }
}

impl<'a> TryFrom<&'a str> for Bounds {
    type Error = BoundsError;

    fn try_from(arg: &'a str) -> Result<Bounds, Self::Error> {
        let arg_lc = arg.to_lowercase();
        let parts: Vec<&str> = arg_lc.split(',').collect();

        match parts.as_slice() {
            [max] => Bounds::upper(parse_value("maximum", max)?),
            [min, max] => Bounds::new(
                parse_value("minimum", min)?,
                parse_value("maximum", max)?,
            ),
            _ => Err(BoundsError::Format(arg.to_string())),
        }
    }
}

/// Formats as `min,max`, which parses back into the same bounds.
impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.min, self.max)
    }
}
