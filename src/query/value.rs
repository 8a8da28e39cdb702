//! Typed values and per-type comparison
//!
//! Every leaf condition carries one or more [`Value`]s together with the
//! [`FieldType`] of its field. Values are only ever compared under a field
//! type, and only when that type's family matches the values' shape.

use crate::schema::{FieldType, TypeFamily};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::fmt;
use std::net::IpAddr;

/// A typed scalar value
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Int(i64),
    UInt(u64),
    Float(OrderedFloat<f64>),
    Bool(bool),
    Date(DateTime<Utc>),
    Ip(IpValue),
    Version(VersionValue),
    Str(String),
}

/// An IP address with an optional CIDR prefix
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IpValue {
    pub addr: IpAddr,
    pub prefix: u8,
}

/// A dotted version string, e.g. `1.10.2` or `2.0.0-beta.1`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VersionValue(pub String);

impl Value {
    /// Create a float value
    pub fn float(value: f64) -> Self {
        Value::Float(OrderedFloat(value))
    }

    /// Create a string value
    pub fn string(value: impl Into<String>) -> Self {
        Value::Str(value.into())
    }

    /// Get the string content for string values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Version(v) => Some(&v.0),
            _ => None,
        }
    }

    /// Get the value kind name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Date(_) => "date",
            Value::Ip(_) => "ip",
            Value::Version(_) => "version",
            Value::Str(_) => "string",
        }
    }

    /// Check if this value is the reserved lower unbounded sentinel of its type
    pub fn is_min_infinity(&self) -> bool {
        match self {
            Value::Int(v) => *v == i64::MIN,
            Value::Float(v) => v.0 == f64::NEG_INFINITY,
            Value::Date(d) => *d == DateTime::<Utc>::MIN_UTC,
            _ => false,
        }
    }

    /// Check if this value is the reserved upper unbounded sentinel of its type
    pub fn is_max_infinity(&self) -> bool {
        match self {
            Value::Int(v) => *v == i64::MAX,
            Value::UInt(v) => *v == u64::MAX,
            Value::Float(v) => v.0 == f64::INFINITY,
            Value::Date(d) => *d == DateTime::<Utc>::MAX_UTC,
            _ => false,
        }
    }

    /// Parse a raw string into a value of the given field type
    pub fn parse(raw: &str, field_type: FieldType) -> std::result::Result<Value, String> {
        let raw = raw.trim();
        match field_type {
            FieldType::Integer => {
                let v: i64 = raw
                    .parse()
                    .map_err(|_| "Integer field requires an integer value".to_string())?;
                if v < i32::MIN as i64 || v > i32::MAX as i64 {
                    return Err("Integer value out of 32-bit range".to_string());
                }
                Ok(Value::Int(v))
            }
            FieldType::Long => raw
                .parse()
                .map(Value::Int)
                .map_err(|_| "Long field requires an integer value".to_string()),
            FieldType::UnsignedLong => raw
                .parse()
                .map(Value::UInt)
                .map_err(|_| "Unsigned long field requires a non-negative integer".to_string()),
            FieldType::Float | FieldType::Double => {
                let v: f64 = raw
                    .parse()
                    .map_err(|_| "Floating point field requires a numeric value".to_string())?;
                if v.is_nan() {
                    return Err("NaN is not a valid field value".to_string());
                }
                Ok(Value::float(v))
            }
            FieldType::Keyword | FieldType::Text => Ok(Value::Str(raw.to_string())),
            FieldType::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err("Boolean field requires true or false".to_string()),
            },
            FieldType::Date => parse_date(raw).map(Value::Date),
            FieldType::Ip => parse_ip(raw).map(Value::Ip),
            FieldType::Version => {
                if raw.is_empty() || raw.contains(char::is_whitespace) {
                    return Err("Version must be a non-empty dotted string".to_string());
                }
                Ok(Value::Version(VersionValue(raw.to_string())))
            }
        }
    }

    /// Convert to the print representation used in rendered documents
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Int(v) => serde_json::Value::from(*v),
            Value::UInt(v) => serde_json::Value::from(*v),
            Value::Float(v) => serde_json::Number::from_f64(v.0)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Date(d) => serde_json::Value::from(d.timestamp_millis()),
            Value::Ip(ip) => serde_json::Value::String(ip.to_string()),
            Value::Version(v) => serde_json::Value::String(v.0.clone()),
            Value::Str(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v.0),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.to_rfc3339()),
            Value::Ip(ip) => write!(f, "{}", ip),
            Value::Version(v) => write!(f, "{}", v.0),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl IpValue {
    /// Create a single-address value (full-length prefix)
    pub fn addr(addr: IpAddr) -> Self {
        Self {
            addr,
            prefix: max_prefix(&addr),
        }
    }

    /// Network address with host bits cleared, widened to 128 bits
    fn network_bits(&self) -> u128 {
        match self.addr {
            IpAddr::V4(v4) => {
                let bits = u32::from(v4);
                let mask = if self.prefix == 0 {
                    0
                } else {
                    u32::MAX << (32 - u32::from(self.prefix.min(32)))
                };
                u128::from(bits & mask)
            }
            IpAddr::V6(v6) => {
                let bits = u128::from(v6);
                let mask = if self.prefix == 0 {
                    0
                } else {
                    u128::MAX << (128 - u32::from(self.prefix.min(128)))
                };
                bits & mask
            }
        }
    }
}

impl fmt::Display for IpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix == max_prefix(&self.addr) {
            write!(f, "{}", self.addr)
        } else {
            write!(f, "{}/{}", self.addr, self.prefix)
        }
    }
}

fn max_prefix(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

fn parse_ip(raw: &str) -> std::result::Result<IpValue, String> {
    let (addr_part, prefix_part) = match raw.split_once('/') {
        Some((a, p)) => (a, Some(p)),
        None => (raw, None),
    };
    let addr: IpAddr = addr_part
        .parse()
        .map_err(|_| format!("'{}' is not an IP address", addr_part))?;
    let max = max_prefix(&addr);
    let prefix = match prefix_part {
        Some(p) => {
            let prefix: u8 = p
                .parse()
                .map_err(|_| format!("'{}' is not a CIDR prefix length", p))?;
            if prefix > max {
                return Err(format!("CIDR prefix {} exceeds {}", prefix, max));
            }
            prefix
        }
        None => max,
    };
    Ok(IpValue { addr, prefix })
}

fn parse_date(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(millis) = raw.parse::<i64>() {
        if let Some(dt) = DateTime::from_timestamp_millis(millis) {
            return Ok(dt);
        }
    }
    Err(format!("'{}' is not a supported date", raw))
}

/// Compare two values under a field type
///
/// Values whose shapes do not belong to the field type's family are a
/// programming error; in release builds they fall back to ordering by kind.
pub fn compare(a: &Value, b: &Value, field_type: FieldType) -> Ordering {
    match field_type.family() {
        TypeFamily::Numeric => match compare_numeric(a, b) {
            Some(ord) => ord,
            None => incompatible(a, b, field_type),
        },
        TypeFamily::String => match (a.as_str(), b.as_str()) {
            (Some(x), Some(y)) => x.as_bytes().cmp(y.as_bytes()),
            _ => incompatible(a, b, field_type),
        },
        TypeFamily::Date => match (a, b) {
            (Value::Date(x), Value::Date(y)) => x.cmp(y),
            (Value::Date(x), Value::Int(y)) => x.timestamp_millis().cmp(y),
            (Value::Int(x), Value::Date(y)) => x.cmp(&y.timestamp_millis()),
            _ => incompatible(a, b, field_type),
        },
        TypeFamily::Ip => match (a, b) {
            (Value::Ip(x), Value::Ip(y)) => compare_ip(x, y),
            _ => incompatible(a, b, field_type),
        },
        TypeFamily::Version => match (a.as_str(), b.as_str()) {
            (Some(x), Some(y)) => compare_versions(x, y),
            _ => incompatible(a, b, field_type),
        },
        TypeFamily::Boolean => match (a, b) {
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            _ => incompatible(a, b, field_type),
        },
    }
}

/// Check two values for equality under a field type
pub fn values_equal(a: &Value, b: &Value, field_type: FieldType) -> bool {
    compare(a, b, field_type) == Ordering::Equal
}

fn incompatible(a: &Value, b: &Value, field_type: FieldType) -> Ordering {
    debug_assert!(
        false,
        "cannot compare {} with {} as {}",
        a.kind(),
        b.kind(),
        field_type.name()
    );
    rank(a).cmp(&rank(b))
}

fn rank(v: &Value) -> u8 {
    match v {
        Value::Int(_) | Value::UInt(_) | Value::Float(_) => 0,
        Value::Bool(_) => 1,
        Value::Date(_) => 2,
        Value::Ip(_) => 3,
        Value::Version(_) => 4,
        Value::Str(_) => 5,
    }
}

fn compare_numeric(a: &Value, b: &Value) -> Option<Ordering> {
    let ord = match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::UInt(x), Value::UInt(y)) => x.cmp(y),
        (Value::Int(x), Value::UInt(y)) => i128::from(*x).cmp(&i128::from(*y)),
        (Value::UInt(x), Value::Int(y)) => i128::from(*x).cmp(&i128::from(*y)),
        (Value::Float(x), Value::Float(y)) => x.cmp(y),
        (Value::Float(x), y) => x.cmp(&OrderedFloat(as_f64(y)?)),
        (x, Value::Float(y)) => OrderedFloat(as_f64(x)?).cmp(y),
        _ => return None,
    };
    Some(ord)
}

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Int(i) => Some(*i as f64),
        Value::UInt(u) => Some(*u as f64),
        Value::Float(f) => Some(f.0),
        _ => None,
    }
}

fn compare_ip(a: &IpValue, b: &IpValue) -> Ordering {
    let family = |ip: &IpValue| matches!(ip.addr, IpAddr::V6(_)) as u8;
    family(a)
        .cmp(&family(b))
        .then_with(|| a.network_bits().cmp(&b.network_bits()))
        .then_with(|| a.prefix.cmp(&b.prefix))
}

/// Compare dotted versions component by component
///
/// Numeric components compare numerically and sort before alphanumeric
/// ones; missing components count as zero. A pre-release (`-` suffix)
/// sorts before the same release without one.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (a_core, a_pre) = split_prerelease(a);
    let (b_core, b_pre) = split_prerelease(b);

    let ord = compare_components(a_core, b_core, true);
    if ord != Ordering::Equal {
        return ord;
    }
    match (a_pre, b_pre) {
        (None, None) => Ordering::Equal,
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some(x), Some(y)) => compare_components(x, y, false),
    }
}

fn split_prerelease(v: &str) -> (&str, Option<&str>) {
    match v.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (v, None),
    }
}

fn compare_components(a: &str, b: &str, pad_with_zero: bool) -> Ordering {
    let a_parts: Vec<&str> = a.split('.').collect();
    let b_parts: Vec<&str> = b.split('.').collect();
    let len = a_parts.len().max(b_parts.len());

    for i in 0..len {
        let (x, y) = match (a_parts.get(i), b_parts.get(i)) {
            (Some(x), Some(y)) => (*x, *y),
            (Some(_), None) if !pad_with_zero => return Ordering::Greater,
            (None, Some(_)) if !pad_with_zero => return Ordering::Less,
            (x, y) => (x.copied().unwrap_or("0"), y.copied().unwrap_or("0")),
        };
        let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
            (Ok(n), Ok(m)) => n.cmp(&m),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => x.cmp(y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_widening() {
        let ft = FieldType::Double;
        assert_eq!(compare(&Value::Int(3), &Value::float(3.0), ft), Ordering::Equal);
        assert_eq!(compare(&Value::Int(-1), &Value::UInt(0), ft), Ordering::Less);
        assert_eq!(
            compare(&Value::UInt(u64::MAX), &Value::Int(i64::MAX), ft),
            Ordering::Greater
        );
        assert_eq!(compare(&Value::float(2.5), &Value::Int(2), ft), Ordering::Greater);
    }

    #[test]
    fn test_string_bytes() {
        let ft = FieldType::Keyword;
        assert_eq!(compare(&"B".into(), &"a".into(), ft), Ordering::Less);
        assert_eq!(compare(&"abc".into(), &"abd".into(), ft), Ordering::Less);
        assert!(values_equal(&"x".into(), &"x".into(), ft));
    }

    #[test]
    fn test_dates() {
        let a = Value::parse("2024-01-01", FieldType::Date).unwrap();
        let b = Value::parse("2024-01-01T00:00:00Z", FieldType::Date).unwrap();
        let c = Value::parse("1704067200001", FieldType::Date).unwrap();
        assert!(values_equal(&a, &b, FieldType::Date));
        assert_eq!(compare(&a, &c, FieldType::Date), Ordering::Less);
        assert_eq!(a.to_json(), serde_json::json!(1704067200000i64));
    }

    #[test]
    fn test_ip_prefix_aware() {
        let ft = FieldType::Ip;
        let net = Value::parse("10.0.0.0/8", ft).unwrap();
        let host = Value::parse("10.1.2.3", ft).unwrap();
        let other = Value::parse("11.0.0.1", ft).unwrap();
        let v6 = Value::parse("::1", ft).unwrap();

        assert_eq!(compare(&net, &host, ft), Ordering::Less);
        assert_eq!(compare(&host, &other, ft), Ordering::Less);
        assert_eq!(compare(&other, &v6, ft), Ordering::Less);
        assert_eq!(net.to_string(), "10.0.0.0/8");
        assert_eq!(host.to_string(), "10.1.2.3");
        assert!(Value::parse("10.0.0.0/33", ft).is_err());
    }

    #[test]
    fn test_versions() {
        assert_eq!(compare_versions("1.2", "1.10"), Ordering::Less);
        assert_eq!(compare_versions("1.2", "1.2.0"), Ordering::Equal);
        assert_eq!(compare_versions("2.0.0-beta", "2.0.0"), Ordering::Less);
        assert_eq!(compare_versions("2.0.0-beta.2", "2.0.0-beta.10"), Ordering::Less);
        assert_eq!(compare_versions("2.0.0-beta", "2.0.0-alpha"), Ordering::Greater);
    }

    #[test]
    fn test_infinity_sentinels() {
        assert!(Value::Int(i64::MIN).is_min_infinity());
        assert!(Value::Int(i64::MAX).is_max_infinity());
        assert!(Value::float(f64::NEG_INFINITY).is_min_infinity());
        assert!(!Value::Int(0).is_min_infinity());
        assert!(!Value::string("zzz").is_max_infinity());
    }

    #[test]
    fn test_parse_errors() {
        assert!(Value::parse("abc", FieldType::Long).is_err());
        assert!(Value::parse("3000000000", FieldType::Integer).is_err());
        assert!(Value::parse("-1", FieldType::UnsignedLong).is_err());
        assert!(Value::parse("yes", FieldType::Boolean).is_err());
        assert!(Value::parse("not a date", FieldType::Date).is_err());
        assert_eq!(Value::parse("TRUE", FieldType::Boolean), Ok(Value::Bool(true)));
        assert_eq!(Value::parse("10", FieldType::Double), Ok(Value::float(10.0)));
    }
}
