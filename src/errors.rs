use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("invalid BND record: ALT {spec} does not follow BND spec")]
    InvalidBNDRecordAlt { spec: String },
    #[error("invalid breakend type {bnd_type}: a single breakend requires a single-ended type")]
    InvalidSingleBreakendType { bnd_type: String },
    #[error("invalid breakend type {bnd_type}: a paired breakend requires a specified, non-single type")]
    InvalidPairedBreakendType { bnd_type: String },
    #[error("invalid breakend bases {bases}: only IUPAC nucleotide codes are allowed")]
    InvalidBreakendBases { bases: String },
    #[error("breakend bases may only be empty for a left-ended paired breakend")]
    EmptyBreakendBases,
    #[error("invalid mate position, must be 1 or greater")]
    InvalidMatePosition,
    #[error("symbolic allele type name cannot be empty")]
    EmptySymbolicAlleleTypeName,
    #[error("empty component in symbolic allele type name {name}")]
    EmptySymbolicAlleleTypeNameComponent { name: String },
    #[error("invalid character in symbolic allele type name {name}")]
    InvalidSymbolicAlleleTypeNameCharacter { name: String },
    #[error("invalid allele: {spec} is not a supported allele representation")]
    InvalidAlleleSpec { spec: String },
}

pub(crate) fn invalid_bnd_record_alt(spec: &[u8]) -> Error {
    Error::InvalidBNDRecordAlt {
        spec: String::from_utf8_lossy(spec).into_owned(),
    }
}
