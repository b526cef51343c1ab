use crate::data_structs::SelectionSpec;
use crate::error::{
    SlabError,
    SlabResult,
};

/// Checks the structure of `spec` against an array of rank `rank`: one
/// starts vector per axis, one counts vector per axis when counts are given,
/// numeric vectors only, and matching starts/counts lengths.
///
/// Element values are not looked at here; see
/// [`build_region_table`](super::build_region_table).
pub fn check_spec_shape(
    spec: &SelectionSpec,
    rank: usize,
) -> SlabResult<()> {
    if spec.rank() != rank {
        return Err(SlabError::shape(format!(
            "'starts' must be a list with one list element per dimension in the \
             array (expected {}, got {})",
            rank,
            spec.rank()
        )));
    }
    if let Some(counts) = spec.counts() {
        if counts.len() != rank {
            return Err(SlabError::shape(format!(
                "'counts' must be a list with one list element per dimension in \
                 the array (expected {}, got {})",
                rank,
                counts.len()
            )));
        }
    }

    for (along, start) in spec.starts().iter().enumerate() {
        if !start.is_numeric() {
            return Err(SlabError::shape(format!(
                "'starts[[{}]]' must be an integer vector (got {})",
                along + 1,
                start.type_name()
            )));
        }
        if let Some(counts) = spec.counts() {
            let count = &counts[along];
            if !count.is_numeric() {
                return Err(SlabError::shape(format!(
                    "'counts[[{}]]' must be an integer vector (got {})",
                    along + 1,
                    count.type_name()
                )));
            }
            if count.len() != start.len() {
                return Err(SlabError::shape(format!(
                    "'counts[[{}]]' must have the same length as 'starts[[{}]]'",
                    along + 1,
                    along + 1
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structs::RawVector;
    use crate::error::ErrorKind;

    fn ints(v: &[i32]) -> RawVector {
        RawVector::from(v.to_vec())
    }

    #[test]
    fn test_valid_shapes() {
        let spec = SelectionSpec::new(vec![ints(&[1, 3]), ints(&[])]);
        assert!(check_spec_shape(&spec, 2).is_ok());

        let spec = spec.with_counts(Some(vec![ints(&[1, 1]), ints(&[])]));
        assert!(check_spec_shape(&spec, 2).is_ok());
    }

    #[test]
    fn test_wrong_arity() {
        let spec = SelectionSpec::new(vec![ints(&[1])]);
        let err = check_spec_shape(&spec, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSpecShape);
        assert!(err.to_string().contains("expected 2, got 1"));

        let spec = SelectionSpec::new(vec![ints(&[1]), ints(&[2])])
            .with_counts(Some(vec![ints(&[1])]));
        let err = check_spec_shape(&spec, 2).unwrap_err();
        assert!(err.to_string().starts_with("'counts' must be a list"));
    }

    #[test]
    fn test_non_numeric() {
        let spec = SelectionSpec::new(vec![
            ints(&[1]),
            RawVector::Character(vec![Some("a".into())]),
        ]);
        let err = check_spec_shape(&spec, 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "'starts[[2]]' must be an integer vector (got character)"
        );

        let spec = SelectionSpec::new(vec![ints(&[1])])
            .with_counts(Some(vec![RawVector::Logical(vec![Some(true)])]));
        let err = check_spec_shape(&spec, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSpecShape);
    }

    #[test]
    fn test_length_mismatch() {
        let spec = SelectionSpec::new(vec![ints(&[1, 5])])
            .with_counts(Some(vec![RawVector::Double(vec![2.0])]));
        let err = check_spec_shape(&spec, 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "'counts[[1]]' must have the same length as 'starts[[1]]'"
        );
    }
}
