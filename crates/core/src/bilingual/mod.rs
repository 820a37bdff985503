//! Bilingual section documents.
//!
//! Sections are stored as two locale documents (`dataFr`, `dataEn`) of the
//! same shape. Pages work on a single mixed document whose text leaves are
//! `{fr, en}` pairs. [`split`] and [`reconstruct`] convert between the two.

mod field;
mod reconstruct;
mod split;

pub use field::{Locale, LocalizedField};
pub use reconstruct::{reconstruct, reconstruct_with_template, ReconstructError, ELEMENT_ID_KEY};
pub use split::{localize, split, LocaleDocuments};
