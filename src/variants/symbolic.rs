// Copyright 2021 Johannes Köster.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::errors::Error;

/// Coarse classification of a structural variant as used in the SVTYPE
/// field and attached to symbolic allele types.
#[derive(
    Display,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum StructuralVariantType {
    #[strum(serialize = "DEL")]
    Del,
    #[strum(serialize = "INS")]
    Ins,
    #[strum(serialize = "DUP")]
    Dup,
    #[strum(serialize = "INV")]
    Inv,
    #[strum(serialize = "CNV")]
    Cnv,
    #[strum(serialize = "BND")]
    Bnd,
}

lazy_static! {
    /// Process-wide interning cache. Instances live for the life of the
    /// process and are never destroyed; the standard types are registered
    /// before any caller can intern a name.
    static ref INSTANCES: Mutex<HashMap<String, &'static SymbolicAlleleType>> = {
        let mut instances = HashMap::new();
        {
            let mut seed = |name: &str, sv_type| {
                let instance: &'static SymbolicAlleleType =
                    Box::leak(Box::new(SymbolicAlleleType {
                        name: name.to_owned(),
                        sv_type: Some(sv_type),
                    }));
                instances.insert(name.to_owned(), instance);
            };
            seed("DEL", StructuralVariantType::Del);
            seed("INS", StructuralVariantType::Ins);
            seed("DUP", StructuralVariantType::Dup);
            seed("INV", StructuralVariantType::Inv);
            seed("CNV", StructuralVariantType::Cnv);
            seed("BND", StructuralVariantType::Bnd);
            seed("DUP:TANDEM", StructuralVariantType::Dup);
            seed("DEL:ME", StructuralVariantType::Del);
            seed("INS:ME", StructuralVariantType::Ins);
        }
        Mutex::new(instances)
    };

    pub static ref DEL: &'static SymbolicAlleleType = SymbolicAlleleType::intern("DEL", None);
    pub static ref INS: &'static SymbolicAlleleType = SymbolicAlleleType::intern("INS", None);
    pub static ref DUP: &'static SymbolicAlleleType = SymbolicAlleleType::intern("DUP", None);
    pub static ref INV: &'static SymbolicAlleleType = SymbolicAlleleType::intern("INV", None);
    pub static ref CNV: &'static SymbolicAlleleType = SymbolicAlleleType::intern("CNV", None);
    pub static ref BND: &'static SymbolicAlleleType = SymbolicAlleleType::intern("BND", None);
    pub static ref DUP_TANDEM: &'static SymbolicAlleleType =
        SymbolicAlleleType::intern("DUP:TANDEM", None);
    pub static ref DEL_ME: &'static SymbolicAlleleType = SymbolicAlleleType::intern("DEL:ME", None);
    pub static ref INS_ME: &'static SymbolicAlleleType = SymbolicAlleleType::intern("INS:ME", None);
}

/// An interned symbolic allele type token, organized as a colon-delimited
/// hierarchy (e.g. `DEL`, `DEL:ME`), with an optional directly attached
/// structural variant classification.
///
/// There is exactly one live instance per distinct name; use
/// `SymbolicAlleleType::of` to obtain it.
#[derive(Derefable, Debug, PartialEq, Eq, Hash)]
pub struct SymbolicAlleleType {
    #[deref]
    name: String,
    sv_type: Option<StructuralVariantType>,
}

impl SymbolicAlleleType {
    /// Returns the interned type of the given name, creating it on first
    /// use.
    pub fn of(name: &str) -> Result<&'static Self> {
        Self::validate_name(name)?;
        Ok(Self::intern(name, None))
    }

    /// Like `of`, but attaches the given structural variant classification
    /// if the name is interned for the first time. When the name is already
    /// interned, the existing instance is returned unchanged.
    pub fn with_sv_type(name: &str, sv_type: StructuralVariantType) -> Result<&'static Self> {
        Self::validate_name(name)?;
        Ok(Self::intern(name, Some(sv_type)))
    }

    /// Get-or-create on the interning cache. Callers must have validated
    /// the name; concurrent creation of the same name converges on a single
    /// winner.
    fn intern(name: &str, sv_type: Option<StructuralVariantType>) -> &'static Self {
        let mut instances = INSTANCES.lock().unwrap();
        if let Some(&instance) = instances.get(name) {
            return instance;
        }
        debug!("interning symbolic allele type {}", name);
        let instance: &'static SymbolicAlleleType = Box::leak(Box::new(SymbolicAlleleType {
            name: name.to_owned(),
            sv_type,
        }));
        instances.insert(name.to_owned(), instance);
        instance
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() {
            bail!(Error::EmptySymbolicAlleleTypeName);
        }
        if name.split(':').any(str::is_empty) {
            bail!(Error::EmptySymbolicAlleleTypeNameComponent {
                name: name.to_owned(),
            });
        }
        // deny-list as mandated by the VCF spec for symbolic IDs; other
        // punctuation is currently accepted
        if name
            .chars()
            .any(|ch| matches!(ch, '[' | ']' | '<' | '>' | '=') || ch.is_whitespace())
        {
            bail!(Error::InvalidSymbolicAlleleTypeNameCharacter {
                name: name.to_owned(),
            });
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type obtained by dropping the last `:`-separated component of
    /// the name, or `None` for a top-level type.
    pub fn supertype(&self) -> Option<&'static Self> {
        // any prefix of a valid name up to a colon is itself valid
        self.name
            .rfind(':')
            .map(|idx| Self::intern(&self.name[..idx], None))
    }

    /// The type obtained by appending `:suffix` to the name.
    pub fn subtype(&self, suffix: &str) -> Result<&'static Self> {
        Self::of(&format!("{}:{}", self.name, suffix))
    }

    /// Purely lexical subtype relation: the name of `other` is a prefix of
    /// this name ending on a component boundary.
    pub fn is_subtype_of(&self, other: &Self) -> bool {
        self.name.starts_with(other.name.as_str())
            && (self.name.len() == other.name.len()
                || self.name.as_bytes()[other.name.len()] == b':')
    }

    pub fn is_supertype_of(&self, other: &Self) -> bool {
        other.is_subtype_of(self)
    }

    /// The attached structural variant classification, or the nearest
    /// ancestor's if this type has none attached.
    pub fn structural_variant_type(&self) -> Option<StructuralVariantType> {
        self.sv_type
            .or_else(|| self.supertype().and_then(Self::structural_variant_type))
    }
}

impl fmt::Display for SymbolicAlleleType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use std::ptr;
    use std::thread;

    use super::*;

    #[test]
    fn test_interning_identity() {
        let a = SymbolicAlleleType::of("DUP:TANDEM").unwrap();
        let b = SymbolicAlleleType::of("DUP:TANDEM").unwrap();
        assert!(ptr::eq(a, b));
        assert!(ptr::eq(a, *DUP_TANDEM));
    }

    #[test]
    fn test_standard_types() {
        assert_eq!(
            DEL.structural_variant_type(),
            Some(StructuralVariantType::Del)
        );
        assert_eq!(
            BND.structural_variant_type(),
            Some(StructuralVariantType::Bnd)
        );
        assert_eq!(
            DUP_TANDEM.structural_variant_type(),
            Some(StructuralVariantType::Dup)
        );
    }

    #[test]
    fn test_supertype() {
        assert!(ptr::eq(
            SymbolicAlleleType::of("DUP:TANDEM")
                .unwrap()
                .supertype()
                .unwrap(),
            *DUP
        ));
        assert!(DEL.supertype().is_none());
        let nested = SymbolicAlleleType::of("INS:ME:ALU").unwrap();
        assert_eq!(nested.supertype().unwrap().name(), "INS:ME");
    }

    #[test]
    fn test_subtype_navigation() {
        let del_me = DEL.subtype("ME").unwrap();
        assert!(ptr::eq(del_me, *DEL_ME));
        assert!(DEL.subtype("").is_err());
        assert!(DEL.subtype("M E").is_err());
    }

    #[test]
    fn test_inherited_structural_variant_type() {
        assert_eq!(
            DEL_ME.structural_variant_type(),
            Some(StructuralVariantType::Del)
        );
        let alu = SymbolicAlleleType::of("INS:ME:ALU").unwrap();
        assert_eq!(
            alu.structural_variant_type(),
            Some(StructuralVariantType::Ins)
        );
        let custom = SymbolicAlleleType::of("CUSTOM:SUB").unwrap();
        assert_eq!(custom.structural_variant_type(), None);
    }

    #[test]
    fn test_subtype_relation_is_a_partial_order() {
        let dup = *DUP;
        let tandem = *DUP_TANDEM;
        let deeper = tandem.subtype("X").unwrap();
        // reflexive
        for t in &[dup, tandem, deeper] {
            assert!(t.is_subtype_of(t));
            assert!(t.is_supertype_of(t));
        }
        // transitive along the chain
        assert!(tandem.is_subtype_of(dup));
        assert!(deeper.is_subtype_of(tandem));
        assert!(deeper.is_subtype_of(dup));
        // antisymmetric
        assert!(!dup.is_subtype_of(tandem));
        assert!(!tandem.is_subtype_of(deeper));
    }

    #[test]
    fn test_subtype_relation_needs_component_boundary() {
        let dup = *DUP;
        let dupx = SymbolicAlleleType::of("DUPX").unwrap();
        assert!(!dupx.is_subtype_of(dup));
        assert!(!dup.is_supertype_of(dupx));
    }

    #[test]
    fn test_name_validation() {
        assert!(SymbolicAlleleType::of("").is_err());
        assert!(SymbolicAlleleType::of(":DEL").is_err());
        assert!(SymbolicAlleleType::of("DEL:").is_err());
        assert!(SymbolicAlleleType::of("DEL::ME").is_err());
        for name in &["DEL[", "DEL]", "<DEL>", "DEL=1", "DEL ME", "DEL\tME"] {
            assert!(
                SymbolicAlleleType::of(name).is_err(),
                "expected {:?} to be rejected",
                name
            );
        }
        // the deny-list leaves other punctuation alone
        assert!(SymbolicAlleleType::of("DEL:ME-ALU").is_ok());
        assert!(SymbolicAlleleType::of("DEL:ME_ALU").is_ok());
    }

    #[test]
    fn test_attached_type_of_loser_is_ignored() {
        let winner =
            SymbolicAlleleType::with_sv_type("RACE:WINNER", StructuralVariantType::Inv).unwrap();
        let loser =
            SymbolicAlleleType::with_sv_type("RACE:WINNER", StructuralVariantType::Cnv).unwrap();
        assert!(ptr::eq(winner, loser));
        assert_eq!(
            loser.structural_variant_type(),
            Some(StructuralVariantType::Inv)
        );
    }

    #[test]
    fn test_concurrent_interning_converges() {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                thread::spawn(move || {
                    let sv_type = if i % 2 == 0 {
                        StructuralVariantType::Del
                    } else {
                        StructuralVariantType::Ins
                    };
                    SymbolicAlleleType::with_sv_type("CONCURRENT:TEST", sv_type).unwrap()
                        as *const SymbolicAlleleType as usize
                })
            })
            .collect();
        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.iter().all(|&addr| addr == addrs[0]));
    }

    #[test]
    fn test_deref_and_display() {
        assert_eq!(DEL_ME.to_string(), "DEL:ME");
        assert_eq!(DEL_ME.len(), 6);
        assert!(DEL_ME.starts_with("DEL"));
    }
}
