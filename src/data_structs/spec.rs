use std::fmt::Display;
use std::str::FromStr;

use itertools::Itertools;
use serde::{
    Deserialize,
    Serialize,
};

/// A vector of values as handed over by the host, before any validation.
///
/// Only [`RawVector::Integer`], [`RawVector::Long`] and [`RawVector::Double`]
/// are accepted as starts or counts; the other variants exist so that host
/// bindings can pass whatever they received and get a proper diagnostic back.
/// Missing integers are `None`; missing doubles are represented by `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawVector {
    Integer(Vec<Option<i32>>),
    /// 64-bit integers, for extents past the `i32` range.
    Long(Vec<Option<i64>>),
    Double(Vec<f64>),
    Logical(Vec<Option<bool>>),
    Character(Vec<Option<String>>),
}

impl RawVector {
    pub fn len(&self) -> usize {
        match self {
            RawVector::Integer(v) => v.len(),
            RawVector::Long(v) => v.len(),
            RawVector::Double(v) => v.len(),
            RawVector::Logical(v) => v.len(),
            RawVector::Character(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            RawVector::Integer(_) | RawVector::Long(_) | RawVector::Double(_)
        )
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            RawVector::Integer(_) => "integer",
            RawVector::Long(_) => "integer64",
            RawVector::Double(_) => "double",
            RawVector::Logical(_) => "logical",
            RawVector::Character(_) => "character",
        }
    }
}

impl From<Vec<i32>> for RawVector {
    fn from(value: Vec<i32>) -> Self {
        RawVector::Integer(value.into_iter().map(Some).collect())
    }
}

impl From<Vec<f64>> for RawVector {
    fn from(value: Vec<f64>) -> Self {
        RawVector::Double(value)
    }
}

impl From<Vec<i64>> for RawVector {
    fn from(value: Vec<i64>) -> Self {
        RawVector::Long(value.into_iter().map(Some).collect())
    }
}

impl From<Vec<u64>> for RawVector {
    /// Values are kept exact: `Integer` when all fit an `i32`, `Long`
    /// otherwise. Values above `i64::MAX` are carried as doubles, which are
    /// rejected as too large when the region table is built.
    fn from(value: Vec<u64>) -> Self {
        if value.iter().all(|v| *v <= i32::MAX as u64) {
            RawVector::Integer(value.into_iter().map(|v| Some(v as i32)).collect())
        }
        else if value.iter().all(|v| *v <= i64::MAX as u64) {
            RawVector::Long(value.into_iter().map(|v| Some(v as i64)).collect())
        }
        else {
            RawVector::Double(value.into_iter().map(|v| v as f64).collect())
        }
    }
}

impl FromStr for RawVector {
    type Err = anyhow::Error;

    /// Parses a comma separated list of numbers. `NA` marks a missing value,
    /// `NaN`, `Inf` and `-Inf` are accepted so that they can be rejected
    /// later with a precise diagnostic. An empty string is an empty vector.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect_vec();

        let as_int = tokens
            .iter()
            .map(|t| {
                if t.eq_ignore_ascii_case("na") {
                    Some(None)
                }
                else {
                    t.parse::<i32>().ok().map(Some)
                }
            })
            .collect::<Option<Vec<_>>>();
        if let Some(values) = as_int {
            return Ok(RawVector::Integer(values));
        }

        let as_long = tokens
            .iter()
            .map(|t| {
                if t.eq_ignore_ascii_case("na") {
                    Some(None)
                }
                else {
                    t.parse::<i64>().ok().map(Some)
                }
            })
            .collect::<Option<Vec<_>>>();
        if let Some(values) = as_long {
            return Ok(RawVector::Long(values));
        }

        let values = tokens
            .iter()
            .map(|t| {
                match t.to_ascii_lowercase().as_str() {
                    "na" | "nan" => Ok(f64::NAN),
                    "inf" | "+inf" => Ok(f64::INFINITY),
                    "-inf" => Ok(f64::NEG_INFINITY),
                    other => {
                        other
                            .parse::<f64>()
                            .map_err(|e| anyhow::anyhow!("invalid number '{}': {}", t, e))
                    },
                }
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(RawVector::Double(values))
    }
}

impl Display for RawVector {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let body = match self {
            RawVector::Integer(v) => {
                v.iter()
                    .map(|x| x.map_or("NA".to_string(), |x| x.to_string()))
                    .join(",")
            },
            RawVector::Long(v) => {
                v.iter()
                    .map(|x| x.map_or("NA".to_string(), |x| x.to_string()))
                    .join(",")
            },
            RawVector::Double(v) => v.iter().join(","),
            RawVector::Logical(v) => {
                v.iter()
                    .map(|x| x.map_or("NA".to_string(), |x| x.to_string()))
                    .join(",")
            },
            RawVector::Character(v) => {
                v.iter()
                    .map(|x| x.clone().unwrap_or_else(|| "NA".to_string()))
                    .join(",")
            },
        };
        write!(f, "{}", body)
    }
}

/// Caller-supplied description of the regions to read: one starts vector
/// per axis and, optionally, one counts vector per axis.
///
/// When `counts` is `None` every interval has a count of 1. Axes are given
/// in the caller's natural order (outermost first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSpec {
    starts: Vec<RawVector>,
    counts: Option<Vec<RawVector>>,
}

impl SelectionSpec {
    pub fn new(starts: Vec<RawVector>) -> Self {
        Self {
            starts,
            counts: None,
        }
    }

    pub fn with_counts(
        mut self,
        counts: Option<Vec<RawVector>>,
    ) -> Self {
        self.counts = counts;
        self
    }

    /// Builds a spec from `(start, count)` pairs per axis.
    pub fn from_intervals<I, A>(axes: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: IntoIterator<Item = (u64, u64)>, {
        let (starts, counts): (Vec<RawVector>, Vec<RawVector>) = axes
            .into_iter()
            .map(|axis| {
                let (s, c): (Vec<u64>, Vec<u64>) = axis.into_iter().unzip();
                (RawVector::from(s), RawVector::from(c))
            })
            .unzip();
        Self::new(starts).with_counts(Some(counts))
    }

    /// Parses the console syntax: axes separated by `;`, entries by `,`.
    ///
    /// `"1,5;2"` selects starts `[1, 5]` on the first axis and `[2]` on the
    /// second. An empty axis (`"1;;3"`) is an empty interval list.
    pub fn parse(
        starts: &str,
        counts: Option<&str>,
    ) -> anyhow::Result<Self> {
        fn parse_axes(s: &str) -> anyhow::Result<Vec<RawVector>> {
            s.split(';')
                .map(RawVector::from_str)
                .collect::<anyhow::Result<Vec<_>>>()
        }

        let starts = parse_axes(starts)?;
        let counts = counts.map(parse_axes).transpose()?;
        Ok(Self::new(starts).with_counts(counts))
    }

    pub fn starts(&self) -> &[RawVector] {
        &self.starts
    }

    pub fn counts(&self) -> Option<&[RawVector]> {
        self.counts.as_deref()
    }

    /// Number of axes described by `starts`.
    pub fn rank(&self) -> usize {
        self.starts.len()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1,2,3", RawVector::Integer(vec![Some(1), Some(2), Some(3)]))]
    #[case("4, NA", RawVector::Integer(vec![Some(4), None]))]
    #[case("", RawVector::Integer(vec![]))]
    #[case("1.5,2", RawVector::Double(vec![1.5, 2.0]))]
    #[case("3000000000", RawVector::Long(vec![Some(3_000_000_000)]))]
    #[case("3000000000,NA", RawVector::Long(vec![Some(3_000_000_000), None]))]
    #[case("1e10", RawVector::Double(vec![1e10]))]
    #[case("-Inf,inf", RawVector::Double(vec![f64::NEG_INFINITY, f64::INFINITY]))]
    fn test_raw_vector_parse(
        #[case] input: &str,
        #[case] expected: RawVector,
    ) {
        assert_eq!(RawVector::from_str(input).unwrap(), expected);
    }

    #[test]
    fn test_raw_vector_parse_nan() {
        match RawVector::from_str("1,NaN").unwrap() {
            RawVector::Double(v) => {
                assert_eq!(v[0], 1.0);
                assert!(v[1].is_nan());
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_raw_vector_parse_garbage() {
        assert!(RawVector::from_str("1,x").is_err());
    }

    #[test]
    fn test_spec_parse() {
        let spec = SelectionSpec::parse("1,5;;2", Some("2,1;;3")).unwrap();
        assert_eq!(spec.rank(), 3);
        assert!(spec.starts()[1].is_empty());
        assert_eq!(spec.counts().unwrap()[2], RawVector::from(vec![3i32]));
    }

    #[test]
    fn test_from_intervals() {
        let spec = SelectionSpec::from_intervals(vec![vec![(1, 2), (5, 1)], vec![]]);
        assert_eq!(spec.starts()[0], RawVector::from(vec![1i32, 5]));
        assert_eq!(spec.counts().unwrap()[0], RawVector::from(vec![2i32, 1]));
        assert!(spec.counts().unwrap()[1].is_empty());
    }

    #[rstest]
    #[case(vec![1u64, 1 << 40], RawVector::Long(vec![Some(1), Some(1 << 40)]))]
    #[case(vec![(1u64 << 53) + 1], RawVector::Long(vec![Some((1i64 << 53) + 1)]))]
    #[case(vec![1u64 << 63], RawVector::Double(vec![(1u64 << 63) as f64]))]
    fn test_from_u64_wide_values(
        #[case] input: Vec<u64>,
        #[case] expected: RawVector,
    ) {
        assert_eq!(RawVector::from(input), expected);
    }

    #[test]
    fn test_from_u64_keeps_every_digit() {
        let v = RawVector::from(vec![1u64, (1 << 53) + 1]);
        assert_eq!(v.to_string(), "1,9007199254740993");
        assert_eq!(v.type_name(), "integer64");
        assert!(v.is_numeric());
    }
}
