//! Encoding and decoding of the VCF breakend (BND) allele notation and the
//! hierarchical namespace of symbolic allele types (e.g. `DEL`, `DEL:ME`)
//! used to classify structural variants.

#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate derive_new;
#[macro_use]
extern crate getset;
#[macro_use]
extern crate derefable;
#[macro_use]
extern crate strum_macros;
#[macro_use]
extern crate serde_derive;

pub mod errors;
pub mod variants;

pub use crate::variants::breakend_type::BreakendType;
pub use crate::variants::breakends::{
    looks_like_breakend, looks_like_single_breakend, Breakend, MateLocus,
};
pub use crate::variants::symbolic::{StructuralVariantType, SymbolicAlleleType};
pub use crate::variants::Allele;
