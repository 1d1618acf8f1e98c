// Copyright 2020 Johannes Köster.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::cmp;
use std::convert::TryFrom;
use std::fmt;
use std::str;

use anyhow::{bail, Result};
use bio::alphabets::{self, Alphabet};
use bio_types::genome;
use itertools::Itertools;

use crate::errors::{self, Error};
use crate::variants::breakend_type::BreakendType;

lazy_static! {
    static ref IUPAC_ALPHABET: Alphabet = alphabets::dna::iupac_alphabet();
}

/// Checks whether bases are valid IUPAC nucleotide codes and free of the
/// single breakend sentinel `.`.
pub(crate) fn is_valid_bases(bases: &[u8]) -> bool {
    !bases.contains(&b'.') && IUPAC_ALPHABET.is_word(bases)
}

/// Checks whether an ALT allele spec is likely to be a breakend spec by
/// looking at its first and last byte only.
///
/// This is an advisory O(1) check: it can approximate in both directions,
/// hence callers deciding to run the full parser still have to handle its
/// failure.
pub fn looks_like_breakend(spec: &[u8]) -> bool {
    if spec.len() < 2 {
        return false;
    }
    let first = spec[0];
    let last = spec[spec.len() - 1];
    let is_bracket = |ch: u8| ch == b'[' || ch == b']';
    if first == b'.' && last != b'.' {
        true
    } else if last == b'.' && first != b'.' {
        true
    } else if is_bracket(first) && !is_bracket(last) {
        true
    } else {
        !is_bracket(first) && is_bracket(last)
    }
}

/// Advisory check for the single (mate-less) flavour of the notation, with
/// the same caveats as `looks_like_breakend`.
pub fn looks_like_single_breakend(spec: &[u8]) -> bool {
    if spec.len() < 2 {
        return false;
    }
    let first = spec[0];
    let last = spec[spec.len() - 1];
    if first == b'.' && last != b'.' {
        true
    } else {
        first != b'.' && last != b'.'
    }
}

/// Contig and 1-based position of the mate of a paired breakend.
#[derive(new, Debug, Clone, PartialEq, Eq, Hash, Getters, CopyGetters)]
pub struct MateLocus {
    #[getset(get = "pub")]
    contig: String,
    #[getset(get_copy = "pub")]
    pos: u32,
}

impl MateLocus {
    pub fn locus(&self) -> genome::Locus {
        genome::Locus::new(self.contig.clone(), u64::from(self.pos))
    }
}

/// A breakend as representable in a VCF ALT allele spec (VCF 4.3,
/// section 5.4): one endpoint of an adjacency between two genomic
/// locations, or an unresolved single end.
///
/// Instances are immutable and only created through the validated entry
/// points `from_spec`, `single` and `paired`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, CopyGetters, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Breakend {
    #[getset(get_copy = "pub")]
    bnd_type: BreakendType,
    bases: Vec<u8>,
    mate: Option<MateLocus>,
}

impl Breakend {
    /// Parses a full ALT allele spec, e.g. `G[chr1:100[` or `.G`.
    pub fn from_spec(spec: &[u8]) -> Result<Self> {
        if spec.len() < 2 {
            bail!(errors::invalid_bnd_record_alt(spec));
        }
        match spec.iter().find_position(|&&ch| ch == b'[' || ch == b']') {
            Some((offset, &bracket)) => Self::from_spec_paired(spec, offset, bracket),
            None => Self::from_spec_single(spec),
        }
    }

    fn from_spec_single(spec: &[u8]) -> Result<Self> {
        let (bnd_type, bases) = if spec[0] == b'.' {
            (BreakendType::RightSingle, &spec[1..])
        } else if spec[spec.len() - 1] == b'.' {
            (BreakendType::LeftSingle, &spec[..spec.len() - 1])
        } else {
            bail!(errors::invalid_bnd_record_alt(spec));
        };
        if !is_valid_bases(bases) {
            bail!(errors::invalid_bnd_record_alt(spec));
        }
        Ok(Breakend {
            bnd_type,
            bases: bases.to_owned(),
            mate: None,
        })
    }

    /// Proceeds assuming the spec is a mated (non-single) breakend, given
    /// the offset and value of its first bracket.
    fn from_spec_paired(spec: &[u8], opening: usize, bracket: u8) -> Result<Self> {
        let mut closing = None;
        let mut last_colon = None;
        let mut mate_pos: Option<u64> = None;
        for (i, &ch) in spec.iter().enumerate().skip(opening + 1) {
            if ch == bracket {
                closing = Some(i);
                break;
            } else if ch == b':' {
                // capture the last colon between the brackets
                last_colon = Some(i);
                mate_pos = Some(0);
            } else if let Some(pos) = mate_pos {
                // accumulate the numeric value after the last colon
                mate_pos = if ch.is_ascii_digit() {
                    Some(pos.saturating_mul(10).saturating_add(u64::from(ch - b'0')))
                } else {
                    None
                };
            }
        }

        let invalid = || errors::invalid_bnd_record_alt(spec);

        let closing = closing.ok_or_else(invalid)?;
        let last_colon = last_colon.ok_or_else(invalid)?;
        let mate_pos = match mate_pos {
            Some(pos) if pos >= 1 && pos <= u64::from(u32::MAX) => pos as u32,
            _ => return Err(invalid().into()),
        };

        let at_end = closing == spec.len() - 1;
        let (is_left, bases) = if at_end {
            // left breakend; a lone sentinel before the brackets (or nothing
            // at all) stands for an insertion before the contig start
            let leading = &spec[..opening];
            let bases = if leading == b"." { &[] as &[u8] } else { leading };
            (true, bases)
        } else if opening == 0 {
            (false, &spec[closing + 1..])
        } else {
            // bases on both sides of the bracket pair
            return Err(invalid().into());
        };
        if !is_valid_bases(bases) {
            return Err(invalid().into());
        }

        let is_forward = bracket == b'[';
        let bnd_type = match (is_left, is_forward) {
            (true, true) => BreakendType::LeftForward,
            (true, false) => BreakendType::LeftReverse,
            (false, true) => BreakendType::RightForward,
            (false, false) => BreakendType::RightReverse,
        };
        let contig = str::from_utf8(&spec[opening + 1..last_colon])
            .map_err(|_| invalid())?
            .to_owned();

        Ok(Breakend {
            bnd_type,
            bases: bases.to_owned(),
            mate: Some(MateLocus::new(contig, mate_pos)),
        })
    }

    /// Validated factory for a single (mate-less) breakend.
    pub fn single(bnd_type: BreakendType, bases: &[u8]) -> Result<Self> {
        if !bnd_type.is_single() {
            bail!(Error::InvalidSingleBreakendType {
                bnd_type: bnd_type.to_string(),
            });
        }
        if bases.is_empty() {
            bail!(Error::EmptyBreakendBases);
        }
        if !is_valid_bases(bases) {
            bail!(Error::InvalidBreakendBases {
                bases: String::from_utf8_lossy(bases).into_owned(),
            });
        }
        Ok(Breakend {
            bnd_type,
            bases: bases.to_owned(),
            mate: None,
        })
    }

    /// Validated factory for a paired breakend with an explicit mate
    /// location.
    pub fn paired(
        bnd_type: BreakendType,
        bases: &[u8],
        mate_contig: &str,
        mate_pos: u32,
    ) -> Result<Self> {
        if bnd_type.is_single() || !bnd_type.is_specified() {
            bail!(Error::InvalidPairedBreakendType {
                bnd_type: bnd_type.to_string(),
            });
        }
        if bases.is_empty() && bnd_type.is_right_end() {
            bail!(Error::EmptyBreakendBases);
        }
        if !is_valid_bases(bases) {
            bail!(Error::InvalidBreakendBases {
                bases: String::from_utf8_lossy(bases).into_owned(),
            });
        }
        if mate_pos < 1 {
            bail!(Error::InvalidMatePosition);
        }
        Ok(Breakend {
            bnd_type,
            bases: bases.to_owned(),
            mate: Some(MateLocus::new(mate_contig.to_owned(), mate_pos)),
        })
    }

    pub fn bases(&self) -> &[u8] {
        &self.bases
    }

    pub fn is_single(&self) -> bool {
        self.bnd_type.is_single()
    }

    pub fn has_mate(&self) -> bool {
        !self.is_single()
    }

    pub fn mate(&self) -> Option<&MateLocus> {
        self.mate.as_ref()
    }

    /// Mate location as a 1-based locus for use by the surrounding variant
    /// model.
    pub fn mate_locus(&self) -> Option<genome::Locus> {
        self.mate.as_ref().map(MateLocus::locus)
    }

    /// Serializes this breakend into its ALT allele spec, reproducing the
    /// original bytes of a parsed spec (with the left-ended empty-bases form
    /// canonicalized to a leading `.`).
    pub fn encode(&self) -> Vec<u8> {
        match self.mate {
            None => self.encode_single(),
            Some(ref mate) => self.encode_paired(mate),
        }
    }

    fn encode_single(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.bases.len() + 1);
        if self.bnd_type.is_right_end() {
            buf.push(b'.');
        }
        buf.extend_from_slice(&self.bases);
        if self.bnd_type.is_left_end() {
            buf.push(b'.');
        }
        buf
    }

    fn encode_paired(&self, mate: &MateLocus) -> Vec<u8> {
        let contig = mate.contig().as_bytes();
        let digits = number_of_digits(mate.pos());
        let is_left = self.bnd_type.is_left_end();
        let leading = if is_left {
            cmp::max(self.bases.len(), 1)
        } else {
            0
        };
        let trailing = if is_left { 0 } else { self.bases.len() };
        // 3 = both brackets and the colon
        let mut buf = Vec::with_capacity(leading + trailing + contig.len() + digits + 3);
        if is_left {
            if self.bases.is_empty() {
                // insertion before the contig start
                buf.push(b'.');
            } else {
                buf.extend_from_slice(&self.bases);
            }
        }
        let bracket = if self.bnd_type.is_forward() {
            b'['
        } else {
            b']'
        };
        buf.push(bracket);
        buf.extend_from_slice(contig);
        buf.push(b':');
        let digit_start = buf.len();
        buf.resize(digit_start + digits, 0);
        let mut q = mate.pos();
        for slot in buf[digit_start..].iter_mut().rev() {
            *slot = b'0' + (q % 10) as u8;
            q /= 10;
        }
        buf.push(bracket);
        if !is_left {
            buf.extend_from_slice(&self.bases);
        }
        buf
    }
}

impl fmt::Display for Breakend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // encoded specs are ASCII by construction
        f.write_str(str::from_utf8(&self.encode()).unwrap())
    }
}

impl TryFrom<String> for Breakend {
    type Error = anyhow::Error;

    fn try_from(spec: String) -> Result<Self> {
        Self::from_spec(spec.as_bytes())
    }
}

impl From<Breakend> for String {
    fn from(breakend: Breakend) -> String {
        breakend.to_string()
    }
}

/// Number of decimal digits of a 1-based genomic position (1 to 10),
/// determined by direct range comparisons instead of iterative division.
fn number_of_digits(i: u32) -> usize {
    if i < 1_000_000 {
        if i >= 10_000 {
            if i < 100_000 {
                5
            } else {
                6
            }
        } else if i >= 100 {
            if i < 1_000 {
                3
            } else {
                4
            }
        } else if i < 10 {
            1
        } else {
            2
        }
    } else if i < 100_000_000 {
        if i < 10_000_000 {
            7
        } else {
            8
        }
    } else if i < 1_000_000_000 {
        9
    } else {
        10
    }
}
