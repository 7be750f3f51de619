//! Calculation preferences threaded through reduction, evaluation and display

/// Unit in which trigonometric arguments (and inverse results) are expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AngleUnit {
    #[default]
    Radian,
    Degree,
}

/// How complex results are presented. Never changes the computed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComplexFormat {
    /// Only real results are shown, others render as `nonreal`
    Real,
    /// `a+b*i`
    #[default]
    Cartesian,
    /// `r*e^(θ*i)`
    Polar,
}

/// Float notation used by serialization and layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrintFloatMode {
    #[default]
    Decimal,
    Scientific,
}

/// Working precision of numeric approximation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Precision {
    /// `f32`
    Single,
    /// `f64`
    #[default]
    Double,
}

/// Default number of significant digits shown for floats
pub const DEFAULT_SIGNIFICANT_DIGITS: usize = 10;

/// Bundle of user preferences
///
/// # Example
/// ```ignore
/// let prefs = Preferences::new()
///     .angle_unit(AngleUnit::Degree)
///     .precision(Precision::Single);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub angle_unit: AngleUnit,
    pub complex_format: ComplexFormat,
    pub float_display_mode: PrintFloatMode,
    pub significant_digits: usize,
    pub precision: Precision,
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new()
    }
}

impl Preferences {
    pub fn new() -> Self {
        Preferences {
            angle_unit: AngleUnit::Radian,
            complex_format: ComplexFormat::Cartesian,
            float_display_mode: PrintFloatMode::Decimal,
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
            precision: Precision::Double,
        }
    }

    pub fn angle_unit(mut self, unit: AngleUnit) -> Self {
        self.angle_unit = unit;
        self
    }

    pub fn complex_format(mut self, format: ComplexFormat) -> Self {
        self.complex_format = format;
        self
    }

    pub fn float_display_mode(mut self, mode: PrintFloatMode) -> Self {
        self.float_display_mode = mode;
        self
    }

    /// Set significant digits for float display (clamped to 1..=17)
    pub fn significant_digits(mut self, digits: usize) -> Self {
        self.significant_digits = digits.clamp(1, 17);
        self
    }

    pub fn precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }
}
