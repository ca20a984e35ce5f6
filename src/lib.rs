//! # slang
//!
//! A grammar-driven tree rewriting parser for the slang language.
//!
//! The parser takes the flat token sequence produced by a tokenizer, wraps it in an `entry`
//! root and then folds runs of sibling nodes into named composite nodes, one pass at a time,
//! until a pass changes nothing. See [parsing](slang::parsing) for the pipeline and
//! [grammar](slang::grammar) for the rule notation.
//!
//! File Layout
//!
//! src/slang
//!   ├── token       Tokens handed over by the tokenizer
//!   ├── tree        The value-oriented node tree and its traversal cursor
//!   ├── grammar     Rules, atoms and grammar loading
//!   ├── parsing     Rewriter, fixpoint driver and entry points
//!   └── testing     Factories shared by the test suites

pub mod slang;
