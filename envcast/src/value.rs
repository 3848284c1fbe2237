use std::fmt;

/// The closed set of results a decoder can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Boolean(bool),
    Absent,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(boolean) => Some(*boolean),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => f.write_str(&format_number(*number)),
            Self::Boolean(boolean) => write!(f, "{boolean}"),
            Self::Absent => Ok(()),
        }
    }
}

/// Types a decoder may produce.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Types that can be read back out of a [`Value`].
///
/// Returns `None` when the value has a different shape.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Option<Self>;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Number(self)
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Boolean(self)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Absent, IntoValue::into_value)
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Option<Self> {
        value.as_number()
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Option<Self> {
        value.as_bool()
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Absent => Some(None),
            value => T::from_value(value).map(Some),
        }
    }
}

/// Renders a number without a trailing `.0` for integral values, with
/// infinities spelled `Infinity` and negative zero as `0`.
///
/// Magnitudes from `1e21` up and below `1e-6` use exponent form with an
/// explicit sign, as in `1e+21` and `1.5e-7`.
pub(crate) fn format_number(number: f64) -> String {
    if number.is_infinite() {
        if number.is_sign_positive() {
            "Infinity".to_owned()
        } else {
            "-Infinity".to_owned()
        }
    } else if number == 0.0 {
        "0".to_owned()
    } else if number.abs() >= 1e21 || number.abs() < 1e-6 {
        let formatted = format!("{number:e}");
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        }
    } else {
        number.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_render_without_fraction() {
        assert_eq!(format_number(1994.0), "1994");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn extreme_magnitudes_use_exponent_form() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e30), "-2.5e+30");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn accessors_match_the_variant() {
        let text = Value::Text("info".to_owned());

        assert_eq!(text.as_str(), Some("info"));
        assert_eq!(text.as_number(), None);
        assert_eq!(Value::Number(3.0).as_str(), None);
        assert_eq!(Value::Absent.as_str(), None);
        assert_eq!(Value::Boolean(true).as_bool(), Some(true));
        assert!(Value::Absent.is_absent());
        assert_eq!(Value::Number(1e21).to_string(), "1e+21");
    }

    #[test]
    fn option_maps_to_absent() {
        assert_eq!(None::<String>.into_value(), Value::Absent);
        assert_eq!(Some(true).into_value(), Value::Boolean(true));
        assert_eq!(Option::<f64>::from_value(Value::Absent), Some(None));
        assert_eq!(Option::<f64>::from_value(Value::Number(2.0)), Some(Some(2.0)));
    }

    #[test]
    fn mismatched_shape_is_none() {
        assert_eq!(String::from_value(Value::Boolean(false)), None);
        assert_eq!(bool::from_value(Value::Text("true".into())), None);
    }
}
