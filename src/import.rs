//! Multi-file programs.
//!
//! `from "lib/math" import add, sub` names a file relative to the importing
//! file's directory, `.pgt` is appended when missing. The target is parsed,
//! its own imports are resolved first, and then its functions (except
//! `main`) and global declarations are spliced in front of the importing
//! program. Each file is spliced at most once, however often it is imported.

use std::{
	collections::{HashMap, HashSet},
	fs,
	path::{Path, PathBuf},
	sync::Arc,
};

use tracing::debug;

use crate::{
	error::{
		PgtError,
		import::{ImportError, ImportErrorType},
	},
	location::SourceLocation,
	parser::Parser,
	scanner::Scanner,
	statement::{Program, Statement},
};

const SOURCE_EXTENSION: &str = ".pgt";

#[derive(Debug, Default)]
pub struct ImportResolver {
	/// Files whose imports are being resolved, for cycle detection.
	visiting:  Vec<PathBuf>,
	/// Function names of every file already spliced.
	functions: HashMap<PathBuf, HashSet<String>>,
}

impl ImportResolver {
	pub fn new() -> Self { Self::default() }

	/// Replace the imports of `program`, parsed from `path`, with the
	/// declarations they name.
	pub fn resolve(&mut self, program: Program, path: &Path) -> Result<Program, PgtError> {
		let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
		let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

		self.visiting.push(canonical.clone());
		let result = self.splice(program, &base_dir);
		self.visiting.pop();

		let program = result?;
		let exported = program.functions().filter(|f| f.name != "main").map(|f| f.name.clone()).collect();
		self.functions.insert(canonical, exported);
		Ok(program)
	}

	fn splice(&mut self, program: Program, base_dir: &Path) -> Result<Program, PgtError> {
		let Program { items, has_package_main, has_return_zero, end } = program;
		let mut spliced = Vec::new();
		let mut own = Vec::new();

		for item in items {
			let (file_path, import_names, location) = match item {
				Statement::Import { file_path, import_names, location } => (file_path, import_names, location),
				item => {
					own.push(item);
					continue;
				}
			};

			let target = module_path(base_dir, &file_path);
			let source = fs::read_to_string(&target).map_err(|source| {
				ImportError::new(location.clone(), ImportErrorType::NotFound {
					path: target.display().to_string(),
					source,
				})
			})?;
			let canonical = fs::canonicalize(&target).unwrap_or_else(|_| target.clone());

			if self.visiting.contains(&canonical) {
				return Err(ImportError::new(location, ImportErrorType::Cycle(file_path)).into());
			}

			if !self.functions.contains_key(&canonical) {
				debug!("importing {}", target.display());
				let file: Arc<str> = target.display().to_string().into();
				let imported = Parser::new(Scanner::new(&source).scan_tokens()).with_file(Some(file)).parse()?;
				let imported = self.resolve(imported, &target)?;
				spliced.extend(imported.items.into_iter().filter(|item| match item {
					Statement::FunctionDef(function) => function.name != "main",
					Statement::VarDecl { .. } => true,
					_ => false,
				}));
			}

			self.check_names(&canonical, &import_names, &file_path, &location)?;
		}

		spliced.extend(own);
		Ok(Program { items: spliced, has_package_main, has_return_zero, end })
	}

	fn check_names(
		&self,
		canonical: &Path,
		names: &[String],
		file_path: &str,
		location: &SourceLocation,
	) -> Result<(), ImportError> {
		let functions = self.functions.get(canonical);
		match names.iter().find(|name| !functions.is_some_and(|functions| functions.contains(*name))) {
			Some(name) => Err(ImportError::new(location.clone(), ImportErrorType::MissingName {
				name: name.clone(),
				path: file_path.to_string(),
			})),
			None => Ok(()),
		}
	}
}

/// Resolve an import path against the importing file's directory.
pub fn module_path(base_dir: &Path, file_path: &str) -> PathBuf {
	if file_path.ends_with(SOURCE_EXTENSION) {
		base_dir.join(file_path)
	} else {
		base_dir.join(format!("{file_path}{SOURCE_EXTENSION}"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn appends_extension_when_missing() {
		assert_eq!(module_path(Path::new("src"), "lib/math"), PathBuf::from("src/lib/math.pgt"));
		assert_eq!(module_path(Path::new("src"), "util.pgt"), PathBuf::from("src/util.pgt"));
		assert_eq!(module_path(Path::new(""), "util"), PathBuf::from("util.pgt"));
	}
}
