//! # How a PGT file runs
//!
//! User's source code:
//!
//! ``` text
//! package main
//! total + int = 0
//! function(main()){
//!     total + int = total + 2
//!     print(total, "{int}")
//!     return 1
//! }
//! return 0
//! ```

//! ## Scanning
//!
//! The [`scanner`] turns characters into tokens. Every token remembers its
//! line and column. `//` comments and whitespace vanish, stray characters
//! such as `;` are skipped with a warning instead of failing the scan.

//! ## Parsing
//!
//! The [`parser`] builds a [`statement::Program`]: function definitions,
//! global variable declarations and imports at top level, ordinary
//! statements inside bodies. `return` leaves no node behind, it only marks
//! the `return 0` and `return 1` sentinels that every entry file needs
//! together with `package main` and a `main` function.

//! ## Imports
//!
//! `from "lib" import f` pulls the functions and globals of `lib.pgt` into
//! the program before anything is checked, see [`import`].

//! ## Static analysis
//!
//! The [`analyzer`] registers every function and global first, so order of
//! declaration never matters, then walks each body with a stack of scopes.
//! Undefined names, duplicate functions, wrong argument counts and string
//! arithmetic other than `+` are reported here. `run --unchecked` skips it.

//! ## Running
//!
//! The [`interpreter`] walks the tree. Values are dynamically typed
//! (`int`, `float`, `string`), ints are promoted to floats when mixed, and
//! a name that exists as a global is always written there.

//! ## Building
//!
//! Instead of running, [`codegen`] can transpile the program to C with a
//! tiny tagged-value runtime, which the system C compiler turns into a
//! native executable.

pub mod analyzer;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod environment;
pub mod error;
pub mod import;
pub mod interpreter;
pub mod location;
pub mod parser;
mod pgt;
pub mod scanner;
pub mod statement;

pub use config::Config;
pub use error::PgtError;
pub use pgt::Pgt;
