use std::collections::HashMap;
use std::fmt;

use derive_more::Deref;
use derive_more::DerefMut;
use derive_more::Display;

/// Name given to a function until its `name:` tag is seen.
pub const UNSET_FUNCTION_NAME: &str = "unset";

/// Free text accumulated one comment line at a time.
///
/// Lines are joined with `\n`. An empty line is kept so that paragraph
/// breaks written as a bare `//` survive into the rendered output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut, Display)]
pub struct Description(String);

impl Description {
	pub fn new(text: impl Into<String>) -> Self {
		Self(text.into())
	}

	/// Append one line, inserting a newline separator when the description is
	/// not empty yet.
	pub fn push_line(&mut self, line: &str) {
		if !self.0.is_empty() {
			self.0.push('\n');
		}
		self.0.push_str(line);
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for Description {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
	pub name: String,
	/// Free-form Lua type expression, possibly empty.
	pub r#type: String,
	pub description: Description,
}

impl fmt::Display for Field {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Field: {}", self.name)?;
		writeln!(f, "Type: {}", self.r#type)?;
		writeln!(f, "Description: {}", self.description.trim())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameter {
	pub name: String,
	pub r#type: String,
	pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constructor {
	/// Name of the class this constructor instantiates.
	pub class: String,
	pub parameters: Vec<Parameter>,
	pub description: Description,
}

/// The table or class a function belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Owner {
	Table(String),
	Class(String),
}

impl Owner {
	pub fn name(&self) -> &str {
		match self {
			Self::Table(name) | Self::Class(name) => name,
		}
	}

	/// Member access separator used in Lua call syntax: `.` for tables and
	/// `:` for methods on class instances.
	pub fn member_separator(&self) -> char {
		match self {
			Self::Table(_) => '.',
			Self::Class(_) => ':',
		}
	}
}

impl fmt::Display for Owner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Table(name) => write!(f, "table `{name}`"),
			Self::Class(name) => write!(f, "class `{name}`"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
	pub name: String,
	pub owner: Owner,
	pub parameters: Vec<Parameter>,
	pub return_type: Option<String>,
	pub return_description: String,
	pub description: Description,
}

impl Function {
	pub fn new(owner: Owner) -> Self {
		Self {
			name: UNSET_FUNCTION_NAME.to_string(),
			owner,
			parameters: Vec::new(),
			return_type: None,
			return_description: String::new(),
			description: Description::default(),
		}
	}

	/// The return type when one was declared with a non-empty value.
	pub fn declared_return_type(&self) -> Option<&str> {
		self.return_type.as_deref().filter(|ty| !ty.is_empty())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
	pub name: String,
	pub fields: Vec<Field>,
	pub functions: Vec<Function>,
	pub description: Description,
}

impl Table {
	pub fn new(name: &str) -> Self {
		Self {
			name: name.trim().to_string(),
			..Self::default()
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Class {
	pub name: String,
	/// Names of inherited classes, in declaration order, without repeats.
	pub inheritance: Vec<String>,
	pub fields: Vec<Field>,
	pub constructors: Vec<Constructor>,
	pub functions: Vec<Function>,
	pub description: Description,
}

impl Class {
	pub fn new(name: &str) -> Self {
		Self {
			name: name.trim().to_string(),
			..Self::default()
		}
	}

	/// Record an inherited class name. Returns `false` when it was already
	/// listed.
	pub fn inherit(&mut self, parent: &str) -> bool {
		let parent = parent.trim();
		if self.inheritance.iter().any(|existing| existing == parent) {
			return false;
		}
		self.inheritance.push(parent.to_string());
		true
	}
}

/// Location of a function inside the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionRef {
	Table { table: usize, function: usize },
	Class { class: usize, function: usize },
}

/// Every documented entity discovered during one run.
///
/// Tables and classes are memoized by name and kept in first-seen order, so
/// annotations spread over several files accumulate into one entity.
#[derive(Debug, Clone, Default)]
pub struct ApiRegistry {
	tables: Vec<Table>,
	table_index: HashMap<String, usize>,
	classes: Vec<Class>,
	class_index: HashMap<String, usize>,
	functions: HashMap<String, FunctionRef>,
	namespace: Option<String>,
}

impl ApiRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Resolve a table by name, creating it when it does not exist yet.
	/// Returns its index.
	pub fn table_entry(&mut self, name: &str) -> usize {
		let name = name.trim();
		if let Some(&index) = self.table_index.get(name) {
			return index;
		}
		let index = self.tables.len();
		self.tables.push(Table::new(name));
		self.table_index.insert(name.to_string(), index);
		index
	}

	/// Resolve a class by name, creating it when it does not exist yet.
	/// Returns its index.
	pub fn class_entry(&mut self, name: &str) -> usize {
		let name = name.trim();
		if let Some(&index) = self.class_index.get(name) {
			return index;
		}
		let index = self.classes.len();
		self.classes.push(Class::new(name));
		self.class_index.insert(name.to_string(), index);
		index
	}

	pub fn tables(&self) -> &[Table] {
		&self.tables
	}

	pub fn classes(&self) -> &[Class] {
		&self.classes
	}

	pub fn table(&self, name: &str) -> Option<&Table> {
		self.table_index.get(name).map(|&index| &self.tables[index])
	}

	pub fn class(&self, name: &str) -> Option<&Class> {
		self.class_index.get(name).map(|&index| &self.classes[index])
	}

	pub(crate) fn table_mut(&mut self, index: usize) -> &mut Table {
		&mut self.tables[index]
	}

	pub(crate) fn class_mut(&mut self, index: usize) -> &mut Class {
		&mut self.classes[index]
	}

	pub(crate) fn function_mut(&mut self, location: FunctionRef) -> &mut Function {
		match location {
			FunctionRef::Table { table, function } => &mut self.tables[table].functions[function],
			FunctionRef::Class { class, function } => &mut self.classes[class].functions[function],
		}
	}

	/// Register `name` in the by-name function index. A later registration
	/// of the same name replaces the earlier one.
	pub(crate) fn index_function(&mut self, name: &str, location: FunctionRef) {
		self.functions.insert(name.to_string(), location);
	}

	/// Look up a function by its name through the function index.
	pub fn function(&self, name: &str) -> Option<&Function> {
		let location = self.functions.get(name)?;
		Some(match *location {
			FunctionRef::Table { table, function } => &self.tables[table].functions[function],
			FunctionRef::Class { class, function } => &self.classes[class].functions[function],
		})
	}

	pub fn namespace(&self) -> Option<&str> {
		self.namespace.as_deref()
	}

	/// Set the namespace applied to every rendered name. An empty value
	/// clears it.
	pub fn set_namespace(&mut self, namespace: &str) {
		let namespace = namespace.trim();
		self.namespace = if namespace.is_empty() {
			None
		} else {
			Some(namespace.to_string())
		};
	}

	pub fn is_empty(&self) -> bool {
		self.tables.is_empty() && self.classes.is_empty()
	}
}
