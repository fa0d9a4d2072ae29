//! SML attributes: a name followed by one or more string-or-null values.
//!
//! ```text
//! Point 1.5 -2 "label with spaces" -
//! ```
//!
//! An attribute always holds at least one value; every constructor and
//! setter that could leave the list empty fails with
//! [`Error::Construction`].
//!
//! ## Typed access
//!
//! Values are stored as text. The `get_*` accessors read one value by index,
//! the `get_*_array` accessors read every value from an offset on, and the
//! `as_*` accessors additionally require the value count to match. Lexical
//! rules are strict; see [`crate::value`].
//!
//! ```rust
//! use sml::Attribute;
//!
//! let mut attr = Attribute::new("Size", vec![Some("3".into()), Some("4.5".into())]).unwrap();
//! assert_eq!(attr.get_int(0).unwrap(), 3);
//! assert_eq!(attr.get_float(1).unwrap(), 4.5);
//! assert!(attr.as_int().is_err());
//!
//! attr.set_bool(true);
//! assert_eq!(attr.as_bool().unwrap(), true);
//! ```

use crate::error::{Error, Result};
use crate::node::{equals_ignore_case, trivia_accessors, Trivia};
use crate::value;
use crate::wsv::WsvLine;

/// A named list of values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    values: Vec<Option<String>>,
    pub(crate) trivia: Trivia,
}

fn require_values(name: &str, values: &[Option<String>]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::construction(format!(
            "Attribute \"{}\" must contain at least one value",
            name
        )));
    }
    Ok(())
}

impl Attribute {
    /// Creates an attribute.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if `values` is empty.
    pub fn new(name: impl Into<String>, values: Vec<Option<String>>) -> Result<Self> {
        let name = name.into();
        require_values(&name, &values)?;
        Ok(Attribute {
            name,
            values,
            trivia: Trivia::default(),
        })
    }

    /// Creates an attribute from a mandatory first value and any further values.
    #[must_use]
    pub fn from_first(
        name: impl Into<String>,
        first: Option<String>,
        rest: impl IntoIterator<Item = Option<String>>,
    ) -> Self {
        let mut values = vec![first];
        values.extend(rest);
        Attribute {
            name: name.into(),
            values,
            trivia: Trivia::default(),
        }
    }

    /// Creates a single-value attribute holding `value`.
    #[must_use]
    pub fn with_string(name: impl Into<String>, value: &str) -> Self {
        Self::from_first(name, Some(value.to_string()), [])
    }

    /// Parses one attribute line such as `Attr 1 2 #comment`.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed lines and [`Error::Construction`]
    /// for fewer than two values or a null name.
    pub fn parse(line: &str) -> Result<Self> {
        let line = WsvLine::parse(line, 0)?;
        if line.values.len() < 2 {
            return Err(Error::construction("Attribute line must contain at least two values"));
        }
        let mut values = line.values.into_iter();
        let name = values
            .next()
            .flatten()
            .ok_or_else(|| Error::construction("Attribute name must not be null"))?;
        let mut attribute = Attribute {
            name,
            values: values.collect(),
            trivia: Trivia::default(),
        };
        attribute.set_whitespaces(Some(line.whitespaces))?;
        attribute.set_comment(line.comment.as_deref())?;
        Ok(attribute)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Case-insensitive name comparison.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        equals_ignore_case(&self.name, name)
    }

    /// Returns a copy of the values.
    #[must_use]
    pub fn values(&self) -> Vec<Option<String>> {
        self.values.clone()
    }

    /// Borrowed view of the values.
    #[must_use]
    pub fn values_ref(&self) -> &[Option<String>] {
        &self.values
    }

    #[must_use]
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// `true` when the only value is null.
    #[must_use]
    pub fn is_null_value(&self) -> bool {
        matches!(self.values.as_slice(), [None])
    }

    /// Replaces all values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if `values` is empty.
    pub fn set_values(&mut self, values: Vec<Option<String>>) -> Result<&mut Self> {
        require_values(&self.name, &values)?;
        self.values = values;
        Ok(self)
    }

    trivia_accessors!(trivia);

    pub fn minify(&mut self) {
        self.trivia.clear();
    }

    // Shape assertions

    /// # Errors
    ///
    /// Returns [`Error::Query`] if the name differs (ignoring case).
    pub fn assure_name(&self, name: &str) -> Result<&Self> {
        if !self.has_name(name) {
            return Err(Error::query(format!(
                "Attribute with name \"{}\" expected but has name \"{}\"",
                name, self.name
            )));
        }
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] unless the attribute has exactly `count` values.
    pub fn assure_value_count(&self, count: usize) -> Result<&Self> {
        if self.values.len() != count {
            return Err(Error::query(format!(
                "Attribute \"{}\" must have a value count of {} but has {}",
                self.name,
                count,
                self.values.len()
            )));
        }
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if the value count is outside `min..=max`.
    pub fn assure_value_count_min_max(&self, min: Option<usize>, max: Option<usize>) -> Result<&Self> {
        let count = self.values.len();
        if let Some(min) = min {
            if count < min {
                return Err(Error::query(format!(
                    "Attribute \"{}\" must have a minimum value count of {} but has {}",
                    self.name, min, count
                )));
            }
        }
        if let Some(max) = max {
            if count > max {
                return Err(Error::query(format!(
                    "Attribute \"{}\" must have a maximum value count of {} but has {}",
                    self.name, max, count
                )));
            }
        }
        Ok(self)
    }

    // Typed getters

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.values.len() {
            return Err(Error::query(format!(
                "Index of {} for attribute \"{}\" is out of range",
                index, self.name
            )));
        }
        Ok(())
    }

    fn value_error(&self, index: usize, what: &str) -> Error {
        Error::query(format!(
            "Value of attribute \"{}\" at index {} is not {}",
            self.name, index, what
        ))
    }

    fn get_typed<T>(&self, index: usize, what: &str, convert: impl Fn(&str) -> Option<T>) -> Result<T> {
        let text = self.get_string(index)?;
        convert(text).ok_or_else(|| self.value_error(index, what))
    }

    fn get_typed_array<T>(
        &self,
        offset: usize,
        what: &str,
        convert: impl Fn(&str) -> Option<T>,
    ) -> Result<Vec<T>> {
        self.check_index(offset)?;
        (offset..self.values.len())
            .map(|index| self.get_typed(index, what, &convert))
            .collect()
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if `index` is out of range.
    pub fn get_nullable_string(&self, index: usize) -> Result<Option<&str>> {
        self.check_index(index)?;
        Ok(self.values[index].as_deref())
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if `index` is out of range or the value is null.
    pub fn get_string(&self, index: usize) -> Result<&str> {
        self.get_nullable_string(index)?.ok_or_else(|| {
            Error::query(format!(
                "Value of attribute \"{}\" at index {} is null",
                self.name, index
            ))
        })
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if `offset` is out of range.
    pub fn get_nullable_string_array(&self, offset: usize) -> Result<Vec<Option<String>>> {
        self.check_index(offset)?;
        Ok(self.values[offset..].to_vec())
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if `offset` is out of range or any value is null.
    pub fn get_string_array(&self, offset: usize) -> Result<Vec<String>> {
        self.get_typed_array(offset, "a string", |s| Some(s.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] unless the value is `true` or `false` in any case.
    pub fn get_bool(&self, index: usize) -> Result<bool> {
        self.get_typed(index, "a bool", value::parse_bool)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] unless the value is a decimal `i64`.
    pub fn get_int(&self, index: usize) -> Result<i64> {
        self.get_typed(index, "an integer", value::parse_int)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] unless the value is a strict decimal float.
    pub fn get_float(&self, index: usize) -> Result<f64> {
        self.get_typed(index, "a float", value::parse_float)
    }

    /// Matches the value case-insensitively against `enum_values` and returns its position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Query`] if no entry matches.
    pub fn get_enum(&self, index: usize, enum_values: &[&str]) -> Result<usize> {
        self.get_typed(index, "a valid enum value", |text| {
            enum_values.iter().position(|v| equals_ignore_case(v, text))
        })
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] unless the value is a reliable base64 string.
    pub fn get_bytes(&self, index: usize) -> Result<Vec<u8>> {
        self.get_typed(index, "a Reliable Base64 string", value::decode_base64)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] for an out of range offset or any non-integer value.
    pub fn get_int_array(&self, offset: usize) -> Result<Vec<i64>> {
        self.get_typed_array(offset, "an integer", value::parse_int)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] for an out of range offset or any non-float value.
    pub fn get_float_array(&self, offset: usize) -> Result<Vec<f64>> {
        self.get_typed_array(offset, "a float", value::parse_float)
    }

    // Single-value accessors

    /// # Errors
    ///
    /// Returns [`Error::Query`] unless there is exactly one value.
    pub fn as_nullable_string(&self) -> Result<Option<&str>> {
        self.assure_value_count(1)?;
        self.get_nullable_string(0)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] unless there is exactly one non-null value.
    pub fn as_string(&self) -> Result<&str> {
        self.assure_value_count(1)?;
        self.get_string(0)
    }

    /// # Errors
    ///
    /// See [`Attribute::get_bool`]; additionally requires exactly one value.
    pub fn as_bool(&self) -> Result<bool> {
        self.assure_value_count(1)?;
        self.get_bool(0)
    }

    /// # Errors
    ///
    /// See [`Attribute::get_int`]; additionally requires exactly one value.
    pub fn as_int(&self) -> Result<i64> {
        self.assure_value_count(1)?;
        self.get_int(0)
    }

    /// # Errors
    ///
    /// See [`Attribute::get_float`]; additionally requires exactly one value.
    pub fn as_float(&self) -> Result<f64> {
        self.assure_value_count(1)?;
        self.get_float(0)
    }

    /// # Errors
    ///
    /// See [`Attribute::get_enum`]; additionally requires exactly one value.
    pub fn as_enum(&self, enum_values: &[&str]) -> Result<usize> {
        self.assure_value_count(1)?;
        self.get_enum(0, enum_values)
    }

    /// # Errors
    ///
    /// See [`Attribute::get_bytes`]; additionally requires exactly one value.
    pub fn as_bytes(&self) -> Result<Vec<u8>> {
        self.assure_value_count(1)?;
        self.get_bytes(0)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if the value count is outside `min..=max`.
    pub fn as_nullable_string_array(&self, min: Option<usize>, max: Option<usize>) -> Result<Vec<Option<String>>> {
        self.assure_value_count_min_max(min, max)?;
        self.get_nullable_string_array(0)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] for a bad count or a null value.
    pub fn as_string_array(&self, min: Option<usize>, max: Option<usize>) -> Result<Vec<String>> {
        self.assure_value_count_min_max(min, max)?;
        self.get_string_array(0)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] for a bad count or a non-integer value.
    pub fn as_int_array(&self, min: Option<usize>, max: Option<usize>) -> Result<Vec<i64>> {
        self.assure_value_count_min_max(min, max)?;
        self.get_int_array(0)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] for a bad count or a non-float value.
    pub fn as_float_array(&self, min: Option<usize>, max: Option<usize>) -> Result<Vec<f64>> {
        self.assure_value_count_min_max(min, max)?;
        self.get_float_array(0)
    }

    // Setters. Scalar setters replace the whole list with one value.

    pub fn set_nullable_string(&mut self, value: Option<&str>) -> &mut Self {
        self.values = vec![value.map(str::to_string)];
        self
    }

    pub fn set_string(&mut self, value: &str) -> &mut Self {
        self.set_nullable_string(Some(value))
    }

    /// Replaces the values with a single null.
    pub fn set_null(&mut self) -> &mut Self {
        self.set_nullable_string(None)
    }

    pub fn set_bool(&mut self, value: bool) -> &mut Self {
        self.set_string(if value { "true" } else { "false" })
    }

    pub fn set_int(&mut self, value: i64) -> &mut Self {
        self.set_string(&value.to_string())
    }

    /// # Errors
    ///
    /// Returns [`Error::Construction`] for NaN or infinite values.
    pub fn set_float(&mut self, value: f64) -> Result<&mut Self> {
        let text = float_string(value)?;
        Ok(self.set_string(&text))
    }

    /// Stores `enum_values[index]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if `index` is out of range.
    pub fn set_enum(&mut self, index: usize, enum_values: &[&str]) -> Result<&mut Self> {
        let text = enum_values
            .get(index)
            .ok_or_else(|| Error::construction(format!("Enum value \"{}\" is out of range", index)))?;
        Ok(self.set_string(text))
    }

    pub fn set_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.set_string(&value::encode_base64(bytes))
    }

    /// Overwrites the value at `index` and leaves the others untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Query`] if `index` is out of range.
    pub fn set_nullable_string_at(&mut self, index: usize, value: Option<&str>) -> Result<&mut Self> {
        self.check_index(index)?;
        self.values[index] = value.map(str::to_string);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`Error::Query`] if `index` is out of range.
    pub fn set_null_at(&mut self, index: usize) -> Result<&mut Self> {
        self.set_nullable_string_at(index, None)
    }

    /// # Errors
    ///
    /// Returns [`Error::Construction`] if `values` is empty.
    pub fn set_string_array(&mut self, values: &[&str]) -> Result<&mut Self> {
        self.set_values(values.iter().map(|v| Some(v.to_string())).collect())
    }

    /// # Errors
    ///
    /// Returns [`Error::Construction`] if `values` is empty.
    pub fn set_int_array(&mut self, values: &[i64]) -> Result<&mut Self> {
        if values.is_empty() {
            return Err(Error::construction("Int array must contain at least one value"));
        }
        self.values = values.iter().map(|v| Some(v.to_string())).collect();
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`Error::Construction`] if `values` is empty or holds a non-finite float.
    pub fn set_float_array(&mut self, values: &[f64]) -> Result<&mut Self> {
        if values.is_empty() {
            return Err(Error::construction("Float array must contain at least one value"));
        }
        self.values = values
            .iter()
            .map(|&v| float_string(v).map(Some))
            .collect::<Result<_>>()?;
        Ok(self)
    }
}

fn float_string(value: f64) -> Result<String> {
    value::format_float(value)
        .ok_or_else(|| Error::construction(format!("Value \"{}\" is not a valid float", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(values: &[Option<&str>]) -> Attribute {
        Attribute::new("Test", values.iter().map(|v| v.map(str::to_string)).collect()).unwrap()
    }

    #[test]
    fn test_requires_one_value() {
        assert!(matches!(Attribute::new("A", vec![]), Err(Error::Construction(_))));
        let mut a = attr(&[Some("1")]);
        assert!(a.set_values(vec![]).is_err());
        assert!(a.set_int_array(&[]).is_err());
        assert!(a.set_float_array(&[]).is_err());
        assert!(a.set_string_array(&[]).is_err());
        assert_eq!(a.value_count(), 1);
    }

    #[test]
    fn test_string_getters() {
        let a = attr(&[Some("a"), None, Some("c")]);
        assert_eq!(a.get_nullable_string(1).unwrap(), None);
        assert_eq!(a.get_string(2).unwrap(), "c");
        assert!(a.get_string(1).is_err());
        assert!(a.get_string(3).is_err());
        assert_eq!(a.get_nullable_string_array(1).unwrap(), vec![None, Some("c".into())]);
        assert!(a.get_nullable_string_array(3).is_err());
        assert!(a.get_string_array(0).is_err());
        assert_eq!(a.get_string_array(2).unwrap(), vec!["c".to_string()]);
    }

    #[test]
    fn test_typed_getters() {
        let a = attr(&[Some("TRUE"), Some("-12"), Some("1.5E2"), Some("Green"), Some("Base64|TWFuTQ|")]);
        assert!(a.get_bool(0).unwrap());
        assert_eq!(a.get_int(1).unwrap(), -12);
        assert_eq!(a.get_float(2).unwrap(), 150.0);
        assert_eq!(a.get_enum(3, &["red", "green", "blue"]).unwrap(), 1);
        assert_eq!(a.get_bytes(4).unwrap(), vec![0x4d, 0x61, 0x6e, 0x4d]);
        assert!(a.get_int(2).is_err());
        assert!(a.get_bool(1).is_err());
        assert!(a.get_enum(3, &["red"]).is_err());
    }

    #[test]
    fn test_array_getters() {
        let a = attr(&[Some("1"), Some("2"), Some("3")]);
        assert_eq!(a.get_int_array(0).unwrap(), vec![1, 2, 3]);
        assert_eq!(a.get_float_array(1).unwrap(), vec![2.0, 3.0]);
        assert_eq!(a.as_int_array(Some(1), Some(3)).unwrap(), vec![1, 2, 3]);
        assert!(a.as_int_array(Some(4), None).is_err());
        assert!(a.as_int_array(None, Some(2)).is_err());
        assert!(attr(&[Some("1"), None]).get_int_array(0).is_err());
    }

    #[test]
    fn test_as_requires_single_value() {
        assert_eq!(attr(&[Some("7")]).as_int().unwrap(), 7);
        assert!(attr(&[Some("7"), Some("8")]).as_int().is_err());
        assert_eq!(attr(&[None]).as_nullable_string().unwrap(), None);
        assert!(attr(&[None]).as_string().is_err());
        assert!(attr(&[None]).is_null_value());
    }

    #[test]
    fn test_setters() {
        let mut a = attr(&[Some("x"), Some("y")]);
        a.set_int(5);
        assert_eq!(a.values(), vec![Some("5".to_string())]);
        a.set_float(-0.0).unwrap();
        assert_eq!(a.as_string().unwrap(), "0");
        a.set_float(2.5).unwrap();
        assert_eq!(a.as_float().unwrap(), 2.5);
        assert!(a.set_float(f64::NAN).is_err());
        assert_eq!(a.as_float().unwrap(), 2.5);
        a.set_enum(2, &["a", "b", "c"]).unwrap();
        assert_eq!(a.as_string().unwrap(), "c");
        assert!(a.set_enum(3, &["a", "b", "c"]).is_err());
        a.set_bytes(b"ManM");
        assert_eq!(a.as_string().unwrap(), "Base64|TWFuTQ|");
        a.set_float_array(&[1.0, 0.5]).unwrap();
        assert_eq!(a.values(), vec![Some("1".into()), Some("0.5".into())]);
        a.set_null_at(1).unwrap();
        assert_eq!(a.values(), vec![Some("1".into()), None]);
        assert!(a.set_nullable_string_at(2, Some("z")).is_err());
        a.set_null();
        assert!(a.is_null_value());
    }

    #[test]
    fn test_values_are_copied() {
        let a = attr(&[Some("1")]);
        let mut copy = a.values();
        copy.clear();
        assert_eq!(a.value_count(), 1);
    }

    #[test]
    fn test_assertions() {
        let a = attr(&[Some("1"), Some("2")]);
        assert!(a.assure_name("TEST").is_ok());
        assert!(a.assure_name("Other").is_err());
        assert!(a.assure_value_count(2).is_ok());
        assert!(a.assure_value_count(1).is_err());
        assert!(a.assure_value_count_min_max(Some(1), Some(2)).is_ok());
        assert!(a.assure_value_count_min_max(Some(3), None).is_err());
    }

    #[test]
    fn test_parse_line() {
        let a = Attribute::parse("  Attr 1 - #c").unwrap();
        assert_eq!(a.name(), "Attr");
        assert_eq!(a.values(), vec![Some("1".into()), None]);
        assert_eq!(a.comment(), Some("c"));
        assert!(Attribute::parse("Attr").is_err());
        assert!(Attribute::parse("- 1").is_err());
    }
}
