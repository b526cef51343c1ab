use std::fmt::Display;
use std::str::FromStr;

use num::{
    NumCast,
    ToPrimitive,
};
use serde::{
    Deserialize,
    Serialize,
};

/// Numeric element types an array can be stored as.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
pub enum ElementType {
    U8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl ElementType {
    /// Size of one element in bytes.
    pub fn size(&self) -> usize {
        match self {
            ElementType::U8 => 1,
            ElementType::I16 => 2,
            ElementType::I32 | ElementType::F32 => 4,
            ElementType::I64 | ElementType::F64 => 8,
        }
    }

    /// Code used in the raw array file header.
    pub fn code(&self) -> u8 {
        match self {
            ElementType::U8 => 1,
            ElementType::I16 => 2,
            ElementType::I32 => 3,
            ElementType::I64 => 4,
            ElementType::F32 => 5,
            ElementType::F64 => 6,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ElementType::U8),
            2 => Some(ElementType::I16),
            3 => Some(ElementType::I32),
            4 => Some(ElementType::I64),
            5 => Some(ElementType::F32),
            6 => Some(ElementType::F64),
            _ => None,
        }
    }

    /// Decodes the little-endian element at the start of `bytes` and casts it
    /// to `T`. Returns `None` when the value is not representable in `T`.
    pub fn decode_as<T: Element>(
        &self,
        bytes: &[u8],
    ) -> Option<T> {
        match self {
            ElementType::U8 => num::cast(bytes[0]),
            ElementType::I16 => num::cast(i16::from_le_bytes(bytes[..2].try_into().ok()?)),
            ElementType::I32 => num::cast(i32::from_le_bytes(bytes[..4].try_into().ok()?)),
            ElementType::I64 => num::cast(i64::from_le_bytes(bytes[..8].try_into().ok()?)),
            ElementType::F32 => num::cast(f32::from_le_bytes(bytes[..4].try_into().ok()?)),
            ElementType::F64 => num::cast(f64::from_le_bytes(bytes[..8].try_into().ok()?)),
        }
    }

    /// Casts `value` to this type and appends its little-endian encoding to
    /// `out`. Returns `None`, leaving `out` untouched, when the value is not
    /// representable.
    pub fn encode<T: Element>(
        &self,
        value: T,
        out: &mut Vec<u8>,
    ) -> Option<()> {
        match self {
            ElementType::U8 => num::cast::<T, u8>(value)?.write_le(out),
            ElementType::I16 => num::cast::<T, i16>(value)?.write_le(out),
            ElementType::I32 => num::cast::<T, i32>(value)?.write_le(out),
            ElementType::I64 => num::cast::<T, i64>(value)?.write_le(out),
            ElementType::F32 => num::cast::<T, f32>(value)?.write_le(out),
            ElementType::F64 => num::cast::<T, f64>(value)?.write_le(out),
        }
        Some(())
    }
}

impl Display for ElementType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let name = match self {
            ElementType::U8 => "u8",
            ElementType::I16 => "i16",
            ElementType::I32 => "i32",
            ElementType::I64 => "i64",
            ElementType::F32 => "f32",
            ElementType::F64 => "f64",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ElementType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "u8" => Ok(ElementType::U8),
            "i16" => Ok(ElementType::I16),
            "i32" | "int" => Ok(ElementType::I32),
            "i64" => Ok(ElementType::I64),
            "f32" => Ok(ElementType::F32),
            "f64" | "double" => Ok(ElementType::F64),
            other => anyhow::bail!("Unknown element type: {}", other),
        }
    }
}

/// A Rust type that array elements can be read into.
pub trait Element:
    NumCast + ToPrimitive + Copy + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static
{
    const TYPE: ElementType;

    /// Appends the little-endian encoding of `self` to `out`.
    fn write_le(
        &self,
        out: &mut Vec<u8>,
    );
}

macro_rules! impl_element {
    ($ty: ty, $variant: ident) => {
        impl Element for $ty {
            const TYPE: ElementType = ElementType::$variant;

            fn write_le(
                &self,
                out: &mut Vec<u8>,
            ) {
                out.extend_from_slice(&self.to_le_bytes());
            }
        }
    };
}

impl_element!(u8, U8);
impl_element!(i16, I16);
impl_element!(i32, I32);
impl_element!(i64, I64);
impl_element!(f32, F32);
impl_element!(f64, F64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for t in [
            ElementType::U8,
            ElementType::I16,
            ElementType::I32,
            ElementType::I64,
            ElementType::F32,
            ElementType::F64,
        ] {
            assert_eq!(ElementType::from_code(t.code()), Some(t));
            assert_eq!(ElementType::from_str(&t.to_string()).unwrap(), t);
        }
        assert_eq!(ElementType::from_code(0), None);
    }

    #[test]
    fn test_decode_casts() {
        let mut buf = Vec::new();
        (-3i16).write_le(&mut buf);
        assert_eq!(ElementType::I16.decode_as::<i32>(&buf), Some(-3));
        assert_eq!(ElementType::I16.decode_as::<u8>(&buf), None);

        let mut buf = Vec::new();
        2.5f64.write_le(&mut buf);
        assert_eq!(ElementType::F64.decode_as::<f32>(&buf), Some(2.5));
        assert_eq!(ElementType::F64.decode_as::<i32>(&buf), Some(2));

        let mut buf = Vec::new();
        f64::NAN.write_le(&mut buf);
        assert_eq!(ElementType::F64.decode_as::<i64>(&buf), None);
    }

    #[test]
    fn test_encode() {
        let mut buf = Vec::new();
        assert_eq!(ElementType::I16.encode(300i64, &mut buf), Some(()));
        assert_eq!(ElementType::I16.decode_as::<i64>(&buf), Some(300));

        let mut buf = Vec::new();
        assert_eq!(ElementType::U8.encode(256i32, &mut buf), None);
        assert!(buf.is_empty());
    }
}
