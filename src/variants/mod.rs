// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::str;

use anyhow::{bail, Result};
use bio_types::genome;

use crate::errors::Error;

pub mod breakend_type;
pub mod breakends;
pub mod symbolic;

pub use breakend_type::BreakendType;
pub use breakends::{looks_like_breakend, looks_like_single_breakend, Breakend, MateLocus};
pub use symbolic::{StructuralVariantType, SymbolicAlleleType};

/// An allele as it occurs in the REF or ALT column of a VCF record, tagged
/// by its flavour. Breakend and symbolic alleles carry their decoded
/// representation; plain alleles carry their bases.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Allele {
    Breakend(Breakend),
    Reference(Vec<u8>),
    Alternative(Vec<u8>),
    Missing,
    Symbolic(&'static SymbolicAlleleType),
}

impl Allele {
    /// Decodes an ALT field allele spec. Breakend parsing is only attempted
    /// when the cheap classifier deems the spec breakend-shaped; since the
    /// classifier is advisory, a breakend-shaped but malformed spec still
    /// fails here.
    pub fn from_alt_spec(spec: &[u8]) -> Result<Self> {
        if spec == b"." || spec == b"*" {
            return Ok(Allele::Missing);
        }
        if looks_like_breakend(spec) {
            return Ok(Allele::Breakend(Breakend::from_spec(spec)?));
        }
        if spec.len() > 2 && spec[0] == b'<' && spec[spec.len() - 1] == b'>' {
            let name = str::from_utf8(&spec[1..spec.len() - 1]).map_err(|_| {
                Error::InvalidAlleleSpec {
                    spec: String::from_utf8_lossy(spec).into_owned(),
                }
            })?;
            return Ok(Allele::Symbolic(SymbolicAlleleType::of(name)?));
        }
        if !breakends::is_valid_bases(spec) {
            bail!(Error::InvalidAlleleSpec {
                spec: String::from_utf8_lossy(spec).into_owned(),
            });
        }
        Ok(Allele::Alternative(spec.to_owned()))
    }

    /// Validated factory for the REF column allele.
    pub fn reference(bases: &[u8]) -> Result<Self> {
        if bases.is_empty() || !breakends::is_valid_bases(bases) {
            bail!(Error::InvalidAlleleSpec {
                spec: String::from_utf8_lossy(bases).into_owned(),
            });
        }
        Ok(Allele::Reference(bases.to_owned()))
    }

    pub fn is_breakend(&self) -> bool {
        matches!(self, Allele::Breakend(_))
    }

    pub fn as_breakend(&self) -> Option<&Breakend> {
        match self {
            Allele::Breakend(breakend) => Some(breakend),
            _ => None,
        }
    }

    /// Mate location of the underlying breakend, if this is a paired
    /// breakend allele.
    pub fn mate_locus(&self) -> Option<genome::Locus> {
        self.as_breakend().and_then(Breakend::mate_locus)
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, Allele::Symbolic(_))
    }

    pub fn as_symbolic_type(&self) -> Option<&'static SymbolicAlleleType> {
        match self {
            Allele::Symbolic(symbolic_type) => Some(*symbolic_type),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Allele::Missing)
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Allele::Reference(_))
    }

    pub fn is_alternative(&self) -> bool {
        !self.is_reference() && !self.is_missing()
    }

    /// Bases carried by this allele; empty for missing and symbolic
    /// alleles.
    pub fn bases(&self) -> &[u8] {
        match self {
            Allele::Breakend(breakend) => breakend.bases(),
            Allele::Reference(bases) | Allele::Alternative(bases) => bases,
            Allele::Missing | Allele::Symbolic(_) => &[],
        }
    }

    /// Structural variant classification: `BND` for breakend alleles, the
    /// (possibly inherited) classification of symbolic alleles, `None`
    /// otherwise.
    pub fn structural_variant_type(&self) -> Option<StructuralVariantType> {
        match self {
            Allele::Breakend(_) => Some(StructuralVariantType::Bnd),
            Allele::Symbolic(symbolic_type) => symbolic_type.structural_variant_type(),
            _ => None,
        }
    }

    /// Serializes this allele into its VCF column representation.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Allele::Breakend(breakend) => breakend.encode(),
            Allele::Reference(bases) | Allele::Alternative(bases) => bases.clone(),
            Allele::Missing => b".".to_vec(),
            Allele::Symbolic(symbolic_type) => {
                let name = symbolic_type.name().as_bytes();
                let mut buf = Vec::with_capacity(name.len() + 2);
                buf.push(b'<');
                buf.extend_from_slice(name);
                buf.push(b'>');
                buf
            }
        }
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // encoded alleles are valid UTF-8 by construction
        f.write_str(str::from_utf8(&self.encode()).unwrap())
    }
}
