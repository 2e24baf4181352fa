//! Pipeline stages for document translation.
//!
//! Each submodule implements exactly one transformation step, so each is
//! testable on its own and a backend can be swapped (Google for a chat
//! model, LibreOffice for textutil) without touching the other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ pages ──────────────▶ compose
//! (stage)   (pdfium,     (segment ▶ translator) (docx-rs / pdfium)
//!            docx-rs,
//!            legacy)
//! ```
//!
//! 1. [`input`]     — sniff the format by extension, validate the path, stage
//!    uploaded bytes in a temp directory
//! 2. [`extract`]   — one text blob per page; PDF work runs in
//!    `spawn_blocking` because pdfium is synchronous. `.doc` files go through
//!    [`legacy`] first
//! 3. [`normalize`] — deterministic cleanup of extracted text
//! 4. [`pages`]     — split each page with [`segment`], translate chunks in
//!    order through a [`translator::TranslatorAdapter`], reassemble
//! 5. [`compose`]   — emit the translated pages as DOCX or PDF
//!
//! [`google`] and [`llm`] are the two network backends; [`mock`] is a
//! deterministic stand-in for tests and dry runs.

pub mod compose;
pub mod extract;
pub mod google;
pub mod input;
pub mod legacy;
pub mod llm;
pub mod mock;
pub mod normalize;
pub mod pages;
pub mod segment;
pub mod translator;
